use gloo::events::EventListener;
use gloo::file::File;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::config::EditorConfig;
use crate::design_surface::DesignSurface;
use crate::editor::{DesignEditor, DesignStore, ElementId, PageId};
use crate::export::{export_png, AnchorDownloader, CanvasRasterizer, ExportError};
use crate::insertion::{insert_image, BrowserProbe, InsertionPolicy};
use crate::page_strip::PageStrip;
use crate::side_panel::SidePanel;
use crate::toolbar::Toolbar;
use crate::types::SidePanelSection;
use crate::uploads::{apply_decoded, decode_files, UploadId, UploadRecord, UploadStore};
use crate::uploads_panel::UploadsPanel;
use crate::utils::alert;

#[function_component(App)]
pub fn app() -> Html {
    let config = use_memo((), |_| EditorConfig::from_document());
    let uploads = use_mut_ref(UploadStore::new);
    let design = {
        let page_size = config.page_size;
        use_mut_ref(move || DesignStore::with_blank_page(page_size))
    };

    let upload_list = use_state(Vec::<UploadRecord>::new);
    let decode_errors = use_state(Vec::<String>::new);
    let design_revision = use_state(|| 0u64);
    let active_section = use_state(|| SidePanelSection::Uploads);
    let exporting = use_state(|| false);

    // Mirror the upload store into component state. Mutations go through
    // add_shared/remove_shared so this listener never runs under a borrow.
    {
        let uploads = uploads.clone();
        let upload_list = upload_list.clone();
        use_effect_with((), move |_| {
            let subscription = uploads
                .borrow_mut()
                .subscribe(move |records| upload_list.set(records.to_vec()));
            move || uploads.borrow_mut().unsubscribe(subscription)
        });
    }

    let refresh_design = {
        let design = design.clone();
        let design_revision = design_revision.clone();
        Callback::from(move |_: ()| design_revision.set(design.borrow().revision()))
    };

    // Delete removes the selected elements unless a text field has focus
    {
        let design = design.clone();
        let refresh_design = refresh_design.clone();
        use_effect_with((), move |_| {
            let listener = EventListener::new(&gloo_utils::document(), "keydown", move |event| {
                let Some(keyboard_event) = event.dyn_ref::<web_sys::KeyboardEvent>() else {
                    return;
                };
                if keyboard_event.key() != "Delete" {
                    return;
                }
                let typing = keyboard_event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                    .is_some();
                if typing {
                    return;
                }

                let selected: Vec<ElementId> = design.borrow().selection().to_vec();
                if !selected.is_empty() {
                    let mut design = design.borrow_mut();
                    for id in selected {
                        design.remove_element(id);
                    }
                    drop(design);
                    refresh_design.emit(());
                }
            });

            move || drop(listener)
        });
    }

    let on_files = {
        let uploads = uploads.clone();
        let decode_errors = decode_errors.clone();
        Callback::from(move |files: Vec<File>| {
            let uploads = uploads.clone();
            let decode_errors = decode_errors.clone();
            spawn_local(async move {
                let results = decode_files(files).await;
                decode_errors.set(apply_decoded(&uploads, results));
            });
        })
    };

    let on_insert = {
        let uploads = uploads.clone();
        let design = design.clone();
        let refresh_design = refresh_design.clone();
        let policy = InsertionPolicy::new(config.max_image_size);
        Callback::from(move |id: UploadId| {
            let Some(src) = uploads.borrow().get(id).map(|r| r.url.clone()) else {
                return;
            };
            let design = design.clone();
            let refresh_design = refresh_design.clone();
            spawn_local(async move {
                if insert_image(&*design, &BrowserProbe, &policy, &src).await.is_ok() {
                    refresh_design.emit(());
                }
            });
        })
    };

    let on_remove = {
        let uploads = uploads.clone();
        Callback::from(move |id: UploadId| {
            UploadStore::remove_shared(&uploads, id);
        })
    };

    let on_export = {
        let design = design.clone();
        let exporting = exporting.clone();
        let config = config.clone();
        Callback::from(move |name: String| {
            let page = design.borrow().active_page().cloned();
            let exporting = exporting.clone();
            let rasterizer = CanvasRasterizer::new(config.page_size, config.pixel_ratio);
            spawn_local(async move {
                let set_busy = |busy: bool| exporting.set(busy);
                let result =
                    export_png(&name, page.as_ref(), &rasterizer, &AnchorDownloader, &set_busy).await;
                if let Err(e @ ExportError::EmptyName) = result {
                    alert(&e.to_string());
                }
            });
        })
    };

    let on_add_page = {
        let design = design.clone();
        let refresh_design = refresh_design.clone();
        Callback::from(move |_: ()| {
            design.borrow_mut().add_page();
            refresh_design.emit(());
        })
    };

    let on_select_page = {
        let design = design.clone();
        let refresh_design = refresh_design.clone();
        Callback::from(move |id: PageId| {
            design.borrow_mut().activate_page(id);
            refresh_design.emit(());
        })
    };

    let on_select_element = {
        let design = design.clone();
        let refresh_design = refresh_design.clone();
        Callback::from(move |hit: Option<ElementId>| {
            match hit {
                Some(id) => design.borrow_mut().select_elements(&[id]),
                None => design.borrow_mut().clear_selection(),
            }
            refresh_design.emit(());
        })
    };

    let on_bring_to_front = {
        let design = design.clone();
        let refresh_design = refresh_design.clone();
        Callback::from(move |_: ()| {
            let selected: Vec<ElementId> = design.borrow().selection().to_vec();
            for id in selected {
                design.borrow_mut().bring_to_front(id);
            }
            refresh_design.emit(());
        })
    };

    let on_send_to_back = {
        let design = design.clone();
        let refresh_design = refresh_design.clone();
        Callback::from(move |_: ()| {
            let selected: Vec<ElementId> = design.borrow().selection().to_vec();
            for id in selected.into_iter().rev() {
                design.borrow_mut().send_to_back(id);
            }
            refresh_design.emit(());
        })
    };

    let on_select_section = {
        let active_section = active_section.clone();
        Callback::from(move |section: SidePanelSection| active_section.set(section))
    };

    let store = design.borrow();
    let page = store.active_page().cloned();
    let page_ids: Vec<PageId> = store.pages().iter().map(|p| p.id).collect();
    let active_page = store.active_page_id();
    let selection = store.selection().to_vec();
    let page_size = store.page_size();
    drop(store);

    html! {
        <div class="flex h-screen bg-gray-100" data-revision={design_revision.to_string()}>
            <SidePanel active={*active_section} on_select={on_select_section}>
                {
                    match *active_section {
                        SidePanelSection::Uploads => html! {
                            <UploadsPanel
                                uploads={(*upload_list).clone()}
                                accept={AttrValue::from(config.accept.clone())}
                                errors={(*decode_errors).clone()}
                                {on_files}
                                {on_insert}
                                {on_remove}
                            />
                        },
                    }
                }
            </SidePanel>

            <div class="flex-1 flex flex-col min-w-0">
                <Toolbar
                    exporting={*exporting}
                    has_selection={!selection.is_empty()}
                    {on_export}
                    {on_add_page}
                    {on_bring_to_front}
                    {on_send_to_back}
                />
                <DesignSurface
                    {page}
                    {page_size}
                    {selection}
                    on_select={on_select_element}
                />
                <PageStrip pages={page_ids} active={active_page} on_select={on_select_page} />
            </div>
        </div>
    }
}
