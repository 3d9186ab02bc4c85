mod bridge;
mod components;
mod context;
mod history;
mod leaflet;
mod pages;
mod spans;
mod surface;

use dioxus::prelude::*;

#[derive(Routable, Clone, PartialEq)]
enum Route {
    #[route("/")]
    Home {},
}

#[component]
fn Home() -> Element {
    rsx! {
        pages::map_page::MapPage {}
    }
}

const CSS: Asset = asset!("/assets/main.css");
const FAVICON: Asset = asset!("/assets/favicon.svg");

#[allow(non_snake_case)]
fn App() -> Element {
    rsx! {
        document::Link { rel: "icon", r#type: "image/svg+xml", href: FAVICON }
        document::Stylesheet { href: CSS }
        Router::<Route> {}
    }
}

fn main() {
    dioxus::logger::initialize_default();
    if let Err(e) = bridge::install() {
        tracing::error!("script bridge unavailable: {:?}", e);
    }
    launch(App);
}
