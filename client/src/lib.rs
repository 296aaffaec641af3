//! # client
//!
//! Leptos + WASM frontend for InsightDeck.
//!
//! This crate contains the pages, the browser session store and the REST
//! helpers. Everything that touches `web-sys` sits behind the `csr` feature;
//! native builds compile the same logic against in-memory stand-ins so it
//! can be unit tested.

pub mod app;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install logging and mount the app.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::mount_to_body(app::App);
}
