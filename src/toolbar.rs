use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ToolbarProps {
    /// True while an export is rendering
    pub exporting: bool,
    pub has_selection: bool,
    pub on_export: Callback<String>,
    pub on_add_page: Callback<()>,
    pub on_bring_to_front: Callback<()>,
    pub on_send_to_back: Callback<()>,
}

#[function_component(Toolbar)]
pub fn toolbar(props: &ToolbarProps) -> Html {
    let file_name = use_state(|| String::from("design"));

    let on_input = {
        let file_name = file_name.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                file_name.set(input.value());
            }
        })
    };

    let on_download = {
        let file_name = file_name.clone();
        let on_export = props.on_export.clone();
        Callback::from(move |_: MouseEvent| on_export.emit((*file_name).clone()))
    };

    let button = "px-3 py-1.5 rounded border border-gray-300 bg-white text-sm hover:bg-gray-100 disabled:opacity-50";

    html! {
        <div class="flex items-center gap-2 px-4 py-2 bg-white border-b border-gray-300">
            <button class={button} onclick={props.on_add_page.reform(|_: MouseEvent| ())}>
                {"Add page"}
            </button>
            <button
                class={button}
                disabled={!props.has_selection}
                onclick={props.on_bring_to_front.reform(|_: MouseEvent| ())}
            >
                {"Bring to front"}
            </button>
            <button
                class={button}
                disabled={!props.has_selection}
                onclick={props.on_send_to_back.reform(|_: MouseEvent| ())}
            >
                {"Send to back"}
            </button>

            <div class="flex-1" />

            <input
                type="text"
                value={(*file_name).clone()}
                oninput={on_input}
                placeholder="File name"
                class="w-48 px-2 py-1 border border-gray-300 rounded text-sm bg-white text-gray-900"
            />
            <span class="text-sm text-gray-500">{".png"}</span>
            <button
                onclick={on_download}
                disabled={props.exporting}
                class="px-4 py-1.5 bg-blue-500 text-white rounded text-sm font-medium hover:bg-blue-600 transition-colors disabled:opacity-50"
            >
                { if props.exporting { "Exporting…" } else { "Download" } }
            </button>
        </div>
    }
}
