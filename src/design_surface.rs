use web_sys::{Element, MouseEvent};
use yew::prelude::*;

use crate::editor::{ElementId, ElementKind, Page};
use crate::types::{Point, Size};

/// Map a click to page coordinates. The SVG is scaled to fit its container,
/// so client pixels are rescaled by the viewBox.
fn client_to_page_coords(event: &MouseEvent, svg: &Element, page_size: &Size) -> Option<Point> {
    let rect = svg.get_bounding_client_rect();
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return None;
    }

    let x = (event.client_x() as f64 - rect.left()) * page_size.width / rect.width();
    let y = (event.client_y() as f64 - rect.top()) * page_size.height / rect.height();
    Some(Point::new(x, y))
}

#[derive(Properties, PartialEq)]
pub struct DesignSurfaceProps {
    pub page: Option<Page>,
    pub page_size: Size,
    pub selection: Vec<ElementId>,
    /// Element under the click, or `None` for empty space
    pub on_select: Callback<Option<ElementId>>,
}

#[function_component(DesignSurface)]
pub fn design_surface(props: &DesignSurfaceProps) -> Html {
    let svg_ref = use_node_ref();

    let Some(page) = props.page.as_ref() else {
        return html! {
            <div class="flex-1 flex items-center justify-center bg-gray-100 text-sm text-gray-500">
                {"Add a page to start designing"}
            </div>
        };
    };

    let onclick = {
        let svg_ref = svg_ref.clone();
        let page = page.clone();
        let page_size = props.page_size;
        let on_select = props.on_select.clone();
        Callback::from(move |e: MouseEvent| {
            let Some(svg) = svg_ref.cast::<Element>() else {
                return;
            };
            if let Some(point) = client_to_page_coords(&e, &svg, &page_size) {
                on_select.emit(page.hit_test(&point));
            }
        })
    };

    let Size { width, height } = props.page_size;

    html! {
        <div class="flex-1 flex items-center justify-center bg-gray-100 p-8 overflow-auto">
            <svg
                ref={svg_ref}
                {onclick}
                viewBox={format!("0 0 {} {}", width, height)}
                class="bg-white shadow max-h-full max-w-full"
                style={format!("aspect-ratio: {} / {}", width, height)}
            >
                {
                    page.elements.iter().map(|element| {
                        match &element.kind {
                            ElementKind::Image { src } => html! {
                                <image
                                    key={element.id.0}
                                    href={src.clone()}
                                    x={element.position.x.to_string()}
                                    y={element.position.y.to_string()}
                                    width={element.size.width.to_string()}
                                    height={element.size.height.to_string()}
                                    preserveAspectRatio="none"
                                />
                            },
                        }
                    }).collect::<Html>()
                }

                // Selection outlines
                {
                    page.elements.iter().filter(|e| props.selection.contains(&e.id)).map(|element| {
                        html! {
                            <rect
                                key={format!("sel-{}", element.id.0)}
                                x={element.position.x.to_string()}
                                y={element.position.y.to_string()}
                                width={element.size.width.to_string()}
                                height={element.size.height.to_string()}
                                fill="none"
                                stroke="#3b82f6"
                                stroke-width="2"
                                stroke-dasharray="6 4"
                                pointer-events="none"
                            />
                        }
                    }).collect::<Html>()
                }
            </svg>
        </div>
    }
}
