use dioxus::prelude::*;
use homemap_shared::ControllerConfig;

use crate::components::map_view::MapView;

#[component]
pub fn MapPage() -> Element {
    rsx! {
        main { class: "map-page",
            MapView { config: ControllerConfig::default() }
        }
    }
}
