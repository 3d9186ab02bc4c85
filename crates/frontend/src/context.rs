//! The application context: one mounted map with its controller and the
//! event handlers wired to it.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_timers::future::TimeoutFuture;
use homemap_shared::url_state::HistoryBackend;
use homemap_shared::view_state::ViewState;
use homemap_shared::scan::ScanCount;
use homemap_shared::{
    ClickOrigin, ControllerConfig, InteractionMode, LatLng, MapClick, MapController,
};
use serde_json::json;
use wasm_bindgen::prelude::*;
use web_sys::Document;

use crate::components::mode_selector::MODE_CONTROL_CLASS;
use crate::history::BrowserHistory;
use crate::leaflet::{self, Control, MapEvent};
use crate::spans;
use crate::surface::LeafletSurface;

pub type Controller = MapController<LeafletSurface, BrowserHistory>;

type Handler = Closure<dyn FnMut(MapEvent)>;
type DomHandler = Closure<dyn FnMut(web_sys::Event)>;

/// Fired by htmx on the document after it swaps in new content.
const HTMX_AFTER_SWAP: &str = "htmx:afterSwap";

const OSM_TILES: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
const OSM_HOT_TILES: &str = "https://{s}.tile.openstreetmap.fr/hot/{z}/{x}/{y}.png";
const MAX_ZOOM: u32 = 19;

pub struct MapContext {
    controller: Rc<RefCell<Controller>>,
    handlers: Vec<(&'static str, Handler)>,
    document: Document,
    swap_handler: DomHandler,
    layer_control: Control,
    on_mode: Box<dyn Fn(InteractionMode)>,
}

impl MapContext {
    /// Create the map inside `container_id` and wire its events. `on_mode`
    /// is told about every accepted mode change so the UI can follow.
    pub fn mount(
        container_id: &str,
        config: ControllerConfig,
        on_mode: impl Fn(InteractionMode) + 'static,
    ) -> Result<MapContext, String> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("no document")?;
        if document.get_element_by_id(container_id).is_none() {
            return Err(format!("map container #{} not found", container_id));
        }

        let map = leaflet::new_map(container_id, &leaflet::options(&json!({})))
            .map_err(|e| format!("Leaflet failed to create the map: {:?}", e))?;

        let osm = leaflet::tile_layer(
            OSM_TILES,
            &leaflet::options(&json!({ "maxZoom": MAX_ZOOM, "attribution": "© OpenStreetMap" })),
        );
        let osm_hot = leaflet::tile_layer(
            OSM_HOT_TILES,
            &leaflet::options(&json!({
                "maxZoom": MAX_ZOOM,
                "attribution": "© OpenStreetMap contributors, Tiles style by Humanitarian OpenStreetMap Team hosted by OpenStreetMap France",
            })),
        );
        osm.add_to(&map);

        let segment = config.segment_layers_by_kind;
        let controller = MapController::new(LeafletSurface::new(map), BrowserHistory, config);
        let view = controller.initial_view();
        let center = leaflet::lat_lng(LatLng::new(view.latitude, view.longitude));
        controller
            .surface()
            .map()
            .set_view(&center, view.zoom_level as f64);

        let base_maps = js_sys::Object::new();
        let _ = js_sys::Reflect::set(&base_maps, &"OpenStreetMap".into(), &osm);
        let _ = js_sys::Reflect::set(&base_maps, &"OpenStreetMap.HOT".into(), &osm_hot);
        let overlays = if segment {
            controller.surface().overlay_object()
        } else {
            js_sys::Object::new().into()
        };
        let layer_control = leaflet::layers_control(
            &base_maps,
            &overlays,
            &leaflet::options(&json!({ "collapsed": false })),
        );
        layer_control.add_to_map(controller.surface().map());

        let controller = Rc::new(RefCell::new(controller));
        let handlers = vec![
            ("click", click_handler(Rc::downgrade(&controller))),
            ("moveend", view_change_handler(Rc::downgrade(&controller))),
            ("zoomend", view_change_handler(Rc::downgrade(&controller))),
            ("popupopen", popup_open_handler()),
        ];
        {
            let controller = controller.borrow();
            for (event, handler) in &handlers {
                controller
                    .surface()
                    .map()
                    .on(event, handler.as_ref().unchecked_ref());
            }
        }

        let swap_handler = swap_handler(Rc::downgrade(&controller), document.clone());
        let listener: &js_sys::Function = swap_handler.as_ref().unchecked_ref();
        if let Err(e) = document.add_event_listener_with_callback(HTMX_AFTER_SWAP, listener) {
            tracing::warn!("could not listen for {}: {:?}", HTMX_AFTER_SWAP, e);
        }
        let count = spans::render(&mut controller.borrow_mut(), &document);

        tracing::info!(
            lat = view.latitude,
            lng = view.longitude,
            zoom = view.zoom_level,
            mode = %view.mode,
            shapes = count.shapes,
            homes = count.homes,
            "map mounted"
        );
        Ok(MapContext {
            controller,
            handlers,
            document,
            swap_handler,
            layer_control,
            on_mode: Box::new(on_mode),
        })
    }

    pub fn set_mode(&self, mode: InteractionMode) {
        self.with_controller(|c| c.set_mode(mode));
        (self.on_mode)(mode);
    }

    /// Draw record spans present in the page but not yet on the map.
    pub fn render_spans(&self) -> Option<ScanCount> {
        self.with_controller(|c| spans::render(c, &self.document))
    }

    /// Run `f` against the controller. Re-entrant calls (a script reacting
    /// to a map event mid-dispatch) are logged and dropped.
    pub fn with_controller<R>(&self, f: impl FnOnce(&mut Controller) -> R) -> Option<R> {
        match self.controller.try_borrow_mut() {
            Ok(mut controller) => Some(f(&mut controller)),
            Err(_) => {
                tracing::warn!("map controller busy; call dropped");
                None
            }
        }
    }
}

impl Drop for MapContext {
    fn drop(&mut self) {
        let _ = self.document.remove_event_listener_with_callback(
            HTMX_AFTER_SWAP,
            self.swap_handler.as_ref().unchecked_ref(),
        );
        if let Ok(mut controller) = self.controller.try_borrow_mut() {
            controller.cancel_view_change();
            let map = controller.surface().map();
            for (event, handler) in &self.handlers {
                map.off(event, handler.as_ref().unchecked_ref());
            }
            self.layer_control.remove_control();
            map.destroy();
        }
        tracing::info!("map torn down");
    }
}

fn click_handler(controller: Weak<RefCell<Controller>>) -> Handler {
    Closure::wrap(Box::new(move |event: MapEvent| {
        let Some(controller) = controller.upgrade() else {
            return;
        };
        let Some(at) = event.latlng() else {
            return;
        };
        let click = MapClick {
            at: LatLng::new(at.lat(), at.lng()),
            origin: click_origin(&event),
        };
        let Ok(mut controller) = controller.try_borrow_mut() else {
            tracing::warn!("map click during another update; ignored");
            return;
        };
        let outcome = controller.handle_map_click(click);
        tracing::debug!(?outcome, "map click handled");
    }) as Box<dyn FnMut(MapEvent)>)
}

/// Clicks anywhere on the mode control bubble up to the map container.
fn click_origin(event: &MapEvent) -> ClickOrigin {
    let selector = format!(".{}", MODE_CONTROL_CLASS);
    let inside_selector = event
        .original_event()
        .and_then(|e| e.target())
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        .and_then(|el| el.closest(&selector).ok().flatten())
        .is_some();
    if inside_selector {
        ClickOrigin::ModeSelector
    } else {
        ClickOrigin::MapSurface
    }
}

fn view_change_handler(controller: Weak<RefCell<Controller>>) -> Handler {
    Closure::wrap(Box::new(move |_event: MapEvent| {
        let Some(strong) = controller.upgrade() else {
            return;
        };
        let Ok(mut c) = strong.try_borrow_mut() else {
            return;
        };
        let center = c.surface().map().get_center();
        let zoom = c.surface().map().get_zoom().round() as i32;
        let ticket = c.handle_view_change(LatLng::new(center.lat(), center.lng()), zoom);
        let delay = c.config().debounce.as_millis() as u32;
        drop(c);

        let controller = controller.clone();
        wasm_bindgen_futures::spawn_local(async move {
            TimeoutFuture::new(delay).await;
            // Torn down while waiting: nothing to write.
            if let Some(controller) = controller.upgrade() {
                if let Ok(mut c) = controller.try_borrow_mut() {
                    c.flush_view_change(ticket);
                }
            }
        });
    }) as Box<dyn FnMut(MapEvent)>)
}

/// New content may carry record spans; draw them.
fn swap_handler(controller: Weak<RefCell<Controller>>, document: Document) -> DomHandler {
    Closure::wrap(Box::new(move |_event: web_sys::Event| {
        let Some(controller) = controller.upgrade() else {
            return;
        };
        let Ok(mut controller) = controller.try_borrow_mut() else {
            tracing::warn!("swap during another update; spans left for the next scan");
            return;
        };
        spans::render(&mut controller, &document);
    }) as Box<dyn FnMut(web_sys::Event)>)
}

/// Fragments inside a freshly opened popup need htmx to see them before
/// their `revealed` trigger can fire.
fn popup_open_handler() -> Handler {
    Closure::wrap(Box::new(move |event: MapEvent| {
        let Some(element) = event.popup().and_then(|p| p.get_element()) else {
            return;
        };
        if let Err(e) = leaflet::htmx_process(&element) {
            tracing::warn!("htmx.process failed: {:?}", e);
        }
    }) as Box<dyn FnMut(MapEvent)>)
}

/// Mode the page should start with, read before the map exists.
pub fn initial_mode() -> InteractionMode {
    ViewState::from_query(&BrowserHistory.query()).mode
}
