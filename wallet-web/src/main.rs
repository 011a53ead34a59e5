//! Infinite Rainbow browser client
//!
//! Mounts the Leptos app once the WASM module loads.

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

mod app;
mod components;
mod pages;
mod services;
mod state;
mod utils;

use app::App;

#[wasm_bindgen(start)]
pub fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Initialize logger (tracing events from the libraries arrive as `log` records)
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Infinite Rainbow starting...");

    leptos::mount::mount_to_body(|| view! { <App/> });
}
