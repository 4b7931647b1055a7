mod app;
mod design_surface;
mod page_strip;
mod side_panel;
mod toolbar;
mod uploads_panel;
mod utils;

pub mod config;
pub mod editor;
pub mod export;
pub mod insertion;
pub mod types;
pub mod uploads;

use app::App;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn run_app() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
