use gloo::file::{File, FileList};
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::uploads::{UploadId, UploadRecord};

#[derive(Properties, PartialEq)]
pub struct UploadsPanelProps {
    pub uploads: Vec<UploadRecord>,
    pub accept: AttrValue,
    #[prop_or_default]
    pub errors: Vec<String>,
    pub on_files: Callback<Vec<File>>,
    pub on_insert: Callback<UploadId>,
    pub on_remove: Callback<UploadId>,
}

#[function_component(UploadsPanel)]
pub fn uploads_panel(props: &UploadsPanelProps) -> Html {
    let onchange = {
        let on_files = props.on_files.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            if let Some(list) = input.files() {
                let files = FileList::from(list).to_vec();
                if !files.is_empty() {
                    on_files.emit(files);
                }
            }
            // Allow picking the same file again
            input.set_value("");
        })
    };

    html! {
        <div class="flex flex-col gap-4">
            <label class="block w-full px-4 py-2 bg-blue-500 text-white rounded-lg text-sm font-medium text-center cursor-pointer hover:bg-blue-600 transition-colors">
                {"Upload images"}
                <input
                    type="file"
                    multiple=true
                    accept={props.accept.clone()}
                    {onchange}
                    class="hidden"
                />
            </label>

            if !props.errors.is_empty() {
                <ul class="text-xs text-red-600 space-y-1">
                    { for props.errors.iter().map(|err| html! { <li>{err.clone()}</li> }) }
                </ul>
            }

            <div class="grid grid-cols-2 gap-2">
                {
                    props.uploads.iter().map(|upload| {
                        let id = upload.id;
                        let onclick = {
                            let on_insert = props.on_insert.clone();
                            Callback::from(move |_: MouseEvent| on_insert.emit(id))
                        };
                        let on_delete = {
                            let on_remove = props.on_remove.clone();
                            Callback::from(move |e: MouseEvent| {
                                e.stop_propagation();
                                on_remove.emit(id);
                            })
                        };

                        html! {
                            <div
                                key={id.to_string()}
                                {onclick}
                                title={upload.name.clone()}
                                class="relative group rounded border border-gray-200 bg-white hover:border-blue-300 cursor-pointer overflow-hidden"
                            >
                                <img src={upload.url.clone()} alt={upload.name.clone()} class="w-full h-24 object-contain" />
                                <button
                                    onclick={on_delete}
                                    class="absolute top-1 right-1 hidden group-hover:block px-1.5 text-xs bg-white/90 text-red-600 rounded border border-gray-300"
                                >
                                    {"×"}
                                </button>
                            </div>
                        }
                    }).collect::<Html>()
                }
            </div>

            if props.uploads.is_empty() {
                <p class="text-sm text-gray-500 text-center py-4">
                    {"No uploads yet. Images you upload appear here; click one to add it to the page."}
                </p>
            }
        </div>
    }
}
