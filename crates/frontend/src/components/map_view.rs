use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use homemap_shared::{ControllerConfig, InteractionMode};

use crate::bridge;
use crate::components::mode_selector::ModeSelector;
use crate::context::{self, MapContext};

const MAP_CONTAINER_ID: &str = "map";

type ContextSlot = Rc<RefCell<Option<Rc<MapContext>>>>;

/// The Leaflet map plus its mode selector. The map is created after the
/// container is in the DOM and destroyed when the component unmounts.
#[component]
pub fn MapView(config: ControllerConfig) -> Element {
    let mode = use_signal(context::initial_mode);
    let slot: ContextSlot = use_hook(|| Rc::new(RefCell::new(None)));

    {
        let slot = slot.clone();
        use_effect(move || {
            if slot.borrow().is_some() {
                return;
            }
            let follow_mode = move |m: InteractionMode| {
                let mut mode = mode;
                mode.set(m);
            };
            match MapContext::mount(MAP_CONTAINER_ID, config.clone(), follow_mode) {
                Ok(ctx) => {
                    let ctx = Rc::new(ctx);
                    bridge::register(ctx.clone());
                    *slot.borrow_mut() = Some(ctx);
                }
                Err(e) => tracing::error!("map failed to start: {}", e),
            }
        });
    }

    {
        let slot = slot.clone();
        use_drop(move || {
            if let Some(ctx) = slot.borrow_mut().take() {
                bridge::unregister(&ctx);
            }
        });
    }

    let on_change = move |selected: InteractionMode| match slot.borrow().as_ref() {
        Some(ctx) => ctx.set_mode(selected),
        None => tracing::warn!("mode changed before the map mounted"),
    };

    rsx! {
        div { id: MAP_CONTAINER_ID, class: "map",
            ModeSelector { mode, on_change }
        }
    }
}
