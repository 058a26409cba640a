//! StaffDesk admin dashboard - Yew WASM frontend
//!
//! Hosts the store, the global loading bar and push notification setup.

mod app;
mod components;
pub mod config;
mod context;
mod pages;
mod thunks;

pub use app::App;

use wasm_bindgen::prelude::*;

/// WASM entry point.
#[wasm_bindgen(start)]
pub fn main() {
    wasm_logger::init(wasm_logger::Config::new(log::Level::Info));
    yew::Renderer::<App>::new().render();
}
