//! Bindings to the Leaflet global `L` and to `htmx.process`.
//!
//! Only the calls the map context makes are bound. Option objects are built
//! from `serde_json` values with [`options`].

use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    pub type Map;

    #[wasm_bindgen(catch, js_namespace = L, js_name = map)]
    pub fn new_map(container_id: &str, options: &JsValue) -> Result<Map, JsValue>;

    #[wasm_bindgen(method, js_name = setView)]
    pub fn set_view(this: &Map, center: &JsValue, zoom: f64) -> Map;

    #[wasm_bindgen(method)]
    pub fn on(this: &Map, event: &str, handler: &js_sys::Function) -> Map;

    #[wasm_bindgen(method)]
    pub fn off(this: &Map, event: &str, handler: &js_sys::Function) -> Map;

    #[wasm_bindgen(method, js_name = getCenter)]
    pub fn get_center(this: &Map) -> LatLng;

    #[wasm_bindgen(method, js_name = getZoom)]
    pub fn get_zoom(this: &Map) -> f64;

    #[wasm_bindgen(method, js_name = remove)]
    pub fn destroy(this: &Map) -> Map;

    pub type LatLng;

    #[wasm_bindgen(method, getter)]
    pub fn lat(this: &LatLng) -> f64;

    #[wasm_bindgen(method, getter)]
    pub fn lng(this: &LatLng) -> f64;

    /// Anything with `addTo`/`remove`: tile layers, groups, markers, polygons.
    pub type Layer;

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn add_to(this: &Layer, target: &JsValue) -> Layer;

    #[wasm_bindgen(method)]
    pub fn remove(this: &Layer) -> Layer;

    #[wasm_bindgen(method, js_name = bindPopup)]
    pub fn bind_popup(this: &Layer, content: &str, options: &JsValue) -> Layer;

    #[wasm_bindgen(method, js_name = openPopup)]
    pub fn open_popup(this: &Layer) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    pub fn tile_layer(url: &str, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = layerGroup)]
    pub fn layer_group() -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = marker)]
    pub fn marker(at: &JsValue, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = circleMarker)]
    pub fn circle_marker(at: &JsValue, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = polygon)]
    pub fn polygon(vertices: &JsValue, options: &JsValue) -> Layer;

    #[wasm_bindgen(js_namespace = L, js_name = divIcon)]
    pub fn div_icon(options: &JsValue) -> JsValue;

    pub type Control;

    #[wasm_bindgen(js_namespace = ["L", "control"], js_name = layers)]
    pub fn layers_control(base: &JsValue, overlays: &JsValue, options: &JsValue) -> Control;

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn add_to_map(this: &Control, map: &Map) -> Control;

    #[wasm_bindgen(method, js_name = remove)]
    pub fn remove_control(this: &Control) -> Control;

    /// Payload of `click`, `moveend` and `popupopen` events.
    pub type MapEvent;

    #[wasm_bindgen(method, getter)]
    pub fn latlng(this: &MapEvent) -> Option<LatLng>;

    #[wasm_bindgen(method, getter = originalEvent)]
    pub fn original_event(this: &MapEvent) -> Option<web_sys::Event>;

    #[wasm_bindgen(method, getter)]
    pub fn popup(this: &MapEvent) -> Option<Popup>;

    pub type Popup;

    #[wasm_bindgen(method, js_name = getElement)]
    pub fn get_element(this: &Popup) -> Option<web_sys::Element>;

    #[wasm_bindgen(catch, js_namespace = htmx, js_name = process)]
    pub fn htmx_process(element: &web_sys::Element) -> Result<(), JsValue>;
}

/// Build a plain JS options object from anything serializable.
pub fn options<T: Serialize>(value: &T) -> JsValue {
    match serde_json::to_string(value).map(|s| js_sys::JSON::parse(&s)) {
        Ok(Ok(parsed)) => parsed,
        _ => {
            tracing::warn!("could not build Leaflet options");
            js_sys::Object::new().into()
        }
    }
}

/// `[lat, lng]` array as Leaflet expects it.
pub fn lat_lng(at: homemap_shared::LatLng) -> JsValue {
    js_sys::Array::of2(&at.lat.into(), &at.lng.into()).into()
}

pub fn lat_lngs(vertices: &[homemap_shared::LatLng]) -> JsValue {
    vertices
        .iter()
        .map(|v| lat_lng(*v))
        .collect::<js_sys::Array>()
        .into()
}
