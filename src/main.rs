//! Project Tracker Frontend Entry Point

mod models;
mod commands;
mod context;
mod store;
mod logger;
mod components;
mod app;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    logger::init(log::LevelFilter::Debug);
    mount_to_body(App);
}
