/// Tab Saver - Browser extension that saves open tabs as markdown
/// Built with Rust + WASM + Yew

mod background;
pub mod editor_state;
pub mod markdown;
pub mod preview;
pub mod storage;
pub mod tab_data;
pub mod tracker;
pub mod ui;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export the filename convention for JavaScript access
#[wasm_bindgen]
pub fn export_filename(timestamp: f64) -> String {
    markdown::export_filename_at(timestamp)
}

// Start tab tracking in the background page
#[wasm_bindgen]
pub fn start_background() {
    wasm_bindgen_futures::spawn_local(background::run());
}

// Start the Yew app for the editor page
#[wasm_bindgen]
pub fn start_editor() {
    yew::Renderer::<ui::editor::Editor>::new().render();
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}

// Start the Yew app for the options page
#[wasm_bindgen]
pub fn start_options() {
    yew::Renderer::<ui::options::OptionsPage>::new().render();
}
