use yew::prelude::*;

use crate::types::SidePanelSection;

#[derive(Properties, PartialEq)]
pub struct SidePanelProps {
    pub active: SidePanelSection,
    pub on_select: Callback<SidePanelSection>,
    /// Content of the active section
    #[prop_or_default]
    pub children: Children,
}

#[function_component(SidePanel)]
pub fn side_panel(props: &SidePanelProps) -> Html {
    html! {
        <div class="flex flex-none h-full bg-white border-r border-gray-300">
            <nav class="w-20 flex-none flex flex-col border-r border-gray-200 py-2">
                {
                    SidePanelSection::ALL.iter().map(|&section| {
                        let is_active = props.active == section;
                        let onclick = {
                            let on_select = props.on_select.clone();
                            Callback::from(move |_: MouseEvent| on_select.emit(section))
                        };

                        html! {
                            <button
                                key={section.label()}
                                {onclick}
                                class={classes!(
                                    "px-2",
                                    "py-3",
                                    "text-xs",
                                    "font-medium",
                                    if is_active { "text-blue-600 bg-blue-50" } else { "text-gray-600 hover:bg-gray-100" }
                                )}
                            >
                                {section.label()}
                            </button>
                        }
                    }).collect::<Html>()
                }
            </nav>

            <div class="w-64 p-4 overflow-y-auto">
                <h2 class="text-lg font-semibold pb-3 mb-4 border-b border-gray-200">{props.active.label()}</h2>
                { for props.children.iter() }
            </div>
        </div>
    }
}
