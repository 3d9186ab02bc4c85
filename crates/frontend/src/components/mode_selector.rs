use dioxus::prelude::*;
use gloo_timers::callback::Timeout;
use homemap_shared::InteractionMode;

/// Element id of the `<select>`.
pub const MODE_SELECTOR_ID: &str = "mode";

/// Class of the control's container. Leaflet still reports clicks on it as
/// map clicks, so the map context checks for this ancestor.
pub const MODE_CONTROL_CLASS: &str = "tools";

const HIGHLIGHT_CLASS: &str = "highlight";
const HIGHLIGHT_DURATION_MS: u32 = 2_000;

#[component]
pub fn ModeSelector(
    mode: Signal<InteractionMode>,
    on_change: EventHandler<InteractionMode>,
) -> Element {
    rsx! {
        div { class: MODE_CONTROL_CLASS,
            select {
                id: MODE_SELECTOR_ID,
                class: "modeset",
                name: "mode",
                "aria-label": "Interaction mode",
                onchange: move |evt: Event<FormData>| {
                    match InteractionMode::from_selector_value(&evt.value()) {
                        Ok(selected) => on_change.call(selected),
                        Err(e) => tracing::warn!("mode selector: {}", e),
                    }
                },
                for option_mode in InteractionMode::ALL {
                    option {
                        value: option_mode.selector_value(),
                        selected: *mode.read() == option_mode,
                        "{option_mode.selector_label()}"
                    }
                }
            }
        }
    }
}

/// Outline the selector for a couple of seconds. Dropping the returned timer
/// cancels the fade, leaving the highlight on.
pub fn flag() -> Option<Timeout> {
    let element = web_sys::window()?
        .document()?
        .get_element_by_id(MODE_SELECTOR_ID)?;
    if let Err(e) = element.class_list().add_1(HIGHLIGHT_CLASS) {
        tracing::warn!("could not highlight mode selector: {:?}", e);
        return None;
    }
    Some(Timeout::new(HIGHLIGHT_DURATION_MS, move || {
        let _ = element.class_list().remove_1(HIGHLIGHT_CLASS);
    }))
}
