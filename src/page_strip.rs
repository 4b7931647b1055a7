use yew::prelude::*;

use crate::editor::PageId;

#[derive(Properties, PartialEq)]
pub struct PageStripProps {
    pub pages: Vec<PageId>,
    pub active: Option<PageId>,
    pub on_select: Callback<PageId>,
}

#[function_component(PageStrip)]
pub fn page_strip(props: &PageStripProps) -> Html {
    html! {
        <div class="flex items-center gap-2 px-4 py-2 bg-white border-t border-gray-300 overflow-x-auto">
            {
                props.pages.iter().enumerate().map(|(idx, &page)| {
                    let is_active = props.active == Some(page);
                    let onclick = {
                        let on_select = props.on_select.clone();
                        Callback::from(move |_: MouseEvent| on_select.emit(page))
                    };

                    html! {
                        <button
                            key={page.0}
                            {onclick}
                            class={classes!(
                                "px-3",
                                "py-1",
                                "rounded",
                                "text-sm",
                                "border",
                                if is_active {
                                    "bg-blue-50 border-blue-300"
                                } else {
                                    "bg-gray-50 border-gray-200 hover:bg-gray-100"
                                }
                            )}
                        >
                            {format!("Page {}", idx + 1)}
                        </button>
                    }
                }).collect::<Html>()
            }
        </div>
    }
}
