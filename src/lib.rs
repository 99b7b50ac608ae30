// Library target holds the adaptive engine, catalog, sessions and storage.
// The terminal front end in main.rs (app, event, ui) is built on top of it;
// integration tests and benchmarks import through `adaptutor::*`.

#[macro_use]
extern crate rust_i18n;

i18n!("locales", fallback = "en");

pub mod catalog;
pub mod config;
pub mod engine;
pub mod session;
pub mod store;

/// Locales with a bundled message catalog.
pub fn available_locales() -> Vec<&'static str> {
    rust_i18n::available_locales!()
}
