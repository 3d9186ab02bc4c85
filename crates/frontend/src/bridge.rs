//! Entry points for scripts in server-rendered fragments, e.g.
//! `homemap.addPolygon(shapeData, { shapeKind: "good", shapeId: "4" }, "edit-area")`.
//!
//! [`install`] publishes them on `window.homemap` once per page. Calls are
//! routed to whichever map is currently mounted; with none mounted they are
//! logged and dropped.

use std::cell::RefCell;
use std::rc::Rc;

use homemap_shared::fragment::{PopupOptions, PopupStyle};
use homemap_shared::geo::VertexInput;
use homemap_shared::records::{AreaOptions, MarkerRecord, RawMarkerOptions};
use homemap_shared::InteractionMode;
use serde::de::DeserializeOwned;
use wasm_bindgen::closure::WasmClosure;
use wasm_bindgen::prelude::*;

use crate::context::MapContext;

const GLOBAL_NAME: &str = "homemap";

thread_local! {
    static ACTIVE: RefCell<Option<Rc<MapContext>>> = const { RefCell::new(None) };
}

pub fn register(context: Rc<MapContext>) {
    ACTIVE.with(|active| *active.borrow_mut() = Some(context));
}

/// Forget `context` if it is the registered one.
pub fn unregister(context: &Rc<MapContext>) {
    ACTIVE.with(|active| {
        let mut active = active.borrow_mut();
        if active.as_ref().is_some_and(|c| Rc::ptr_eq(c, context)) {
            *active = None;
        }
    });
}

/// Expose the entry points on `window.homemap`.
pub fn install() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let api = js_sys::Object::new();

    export(
        &api,
        "setMode",
        Closure::<dyn Fn(String) -> Result<(), JsValue>>::new(|mode: String| {
            set_mode(&mode).map_err(JsValue::from)
        }),
    );
    export(
        &api,
        "addMarker",
        Closure::<dyn Fn(f64, f64, JsValue)>::new(add_marker),
    );
    export(
        &api,
        "addMarkersFromData",
        Closure::<dyn Fn(JsValue) -> u32>::new(add_markers_from_data),
    );
    export(
        &api,
        "addPolygon",
        Closure::<dyn Fn(JsValue, JsValue, JsValue)>::new(add_polygon),
    );
    export(&api, "clearMarkers", Closure::<dyn Fn()>::new(clear_markers));
    export(&api, "clearPolygons", Closure::<dyn Fn()>::new(clear_polygons));
    export(
        &api,
        "draftVertices",
        Closure::<dyn Fn() -> Option<String>>::new(draft_vertices),
    );
    export(&api, "renderSpans", Closure::<dyn Fn()>::new(render_spans));

    js_sys::Reflect::set(&window, &GLOBAL_NAME.into(), &api)?;
    tracing::debug!("bridge installed on window.{}", GLOBAL_NAME);
    Ok(())
}

fn export<T: ?Sized + WasmClosure>(api: &js_sys::Object, name: &str, closure: Closure<T>) {
    // Ownership passes to the JS object; the page keeps it for its lifetime.
    if let Err(e) = js_sys::Reflect::set(api, &name.into(), &closure.into_js_value()) {
        tracing::warn!("could not export {}: {:?}", name, e);
    }
}

fn with_active<R>(call: &str, f: impl FnOnce(&MapContext) -> R) -> Option<R> {
    let context = ACTIVE.with(|active| active.borrow().clone());
    match context {
        Some(context) => Some(f(&context)),
        None => {
            tracing::warn!("{}: no map mounted", call);
            None
        }
    }
}

pub fn set_mode(mode: &str) -> Result<(), JsError> {
    let mode = mode.parse::<InteractionMode>()?;
    with_active("setMode", |ctx| ctx.set_mode(mode));
    Ok(())
}

pub fn add_marker(lat: f64, lng: f64, options: JsValue) {
    let options: RawMarkerOptions = decode_options("addMarker", &options);
    let record = MarkerRecord { lat, lng, options };
    with_active("addMarker", |ctx| {
        ctx.with_controller(|c| c.add_marker_record(&record))
    });
}

/// Accepts an array of records or its JSON text. Returns how many markers
/// were added.
pub fn add_markers_from_data(data: JsValue) -> u32 {
    let records: Vec<MarkerRecord> = match decode(&data) {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("addMarkersFromData - {}", e);
            return 0;
        }
    };
    with_active("addMarkersFromData", |ctx| {
        ctx.with_controller(|c| c.add_markers_from_data(&records))
    })
    .flatten()
    .unwrap_or(0) as u32
}

/// `latlngs` is an array of `[lat, lng]` pairs or its JSON text.
/// `popup` names a preset such as `"edit-area"` or is an options object
/// like `{ color: "blue", minWidth: "300" }`.
pub fn add_polygon(latlngs: JsValue, area_options: JsValue, popup: JsValue) {
    let vertices = vertex_input(&latlngs);
    let area: AreaOptions = decode_options("addPolygon", &area_options);
    let style = popup_style(&popup);
    // Failures are logged by the controller.
    with_active("addPolygon", |ctx| {
        ctx.with_controller(|c| c.add_polygon(vertices, &area, style))
    });
}

pub fn clear_markers() {
    with_active("clearMarkers", |ctx| ctx.with_controller(|c| c.clear_markers()));
}

pub fn clear_polygons() {
    with_active("clearPolygons", |ctx| ctx.with_controller(|c| c.clear_polygons()));
}

/// Outline of the area being drafted as `[[lat, lng], ...]` JSON text, or
/// `null` when nothing is being drafted.
pub fn draft_vertices() -> Option<String> {
    with_active("draftVertices", |ctx| ctx.with_controller(|c| c.draft_json()))
        .flatten()
        .flatten()
}

/// Draw record spans inserted outside an htmx swap.
pub fn render_spans() {
    with_active("renderSpans", |ctx| ctx.render_spans());
}

fn popup_style(popup: &JsValue) -> PopupStyle {
    match popup.as_string() {
        Some(name) => PopupStyle::preset(&name).unwrap_or_else(|| {
            tracing::warn!("addPolygon - unknown popup preset {:?}", name);
            PopupStyle::default()
        }),
        None => decode_options::<PopupOptions>("addPolygon", popup).style(),
    }
}

fn vertex_input(value: &JsValue) -> VertexInput {
    if let Some(text) = value.as_string() {
        return VertexInput::Serialized(text);
    }
    if value.is_undefined() || value.is_null() {
        return VertexInput::Structured(Vec::new());
    }
    match js_sys::JSON::stringify(value) {
        Ok(text) => VertexInput::Serialized(String::from(text)),
        Err(_) => VertexInput::Structured(Vec::new()),
    }
}

/// Deserialize a JS value (or JSON text) through `serde_json`. Missing
/// values decode as JSON `null`.
fn decode<T: DeserializeOwned>(value: &JsValue) -> Result<T, String> {
    let text = match value.as_string() {
        Some(text) => text,
        None if value.is_undefined() => "null".to_string(),
        None => js_sys::JSON::stringify(value)
            .map(String::from)
            .map_err(|e| format!("{:?}", e))?,
    };
    decode_json(&text)
}

/// Options objects are optional; a missing or undecodable one is empty.
fn decode_options<T: DeserializeOwned + Default>(call: &str, value: &JsValue) -> T {
    if value.is_undefined() || value.is_null() {
        return T::default();
    }
    decode(value).unwrap_or_else(|e| {
        tracing::warn!("{} - bad options: {}", call, e);
        T::default()
    })
}

fn decode_json<T: DeserializeOwned>(text: &str) -> Result<T, String> {
    serde_json::from_str(text).map_err(|e| e.to_string())
}
