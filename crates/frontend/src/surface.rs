use std::collections::HashMap;

use gloo_timers::callback::Timeout;
use homemap_shared::fragment::Popup;
use homemap_shared::kinds::{OverlayGroup, PointKind};
use homemap_shared::surface::{MapSurface, Primitive, Shape, TargetLayer};
use serde_json::json;
use wasm_bindgen::JsValue;

use crate::components::mode_selector;
use crate::leaflet::{self, Layer, Map};

/// Icon markers are drawn from inline SVG at this size in pixels.
const ICON_SIZE: [u32; 2] = [24, 24];

/// [`MapSurface`] over a live Leaflet map.
pub struct LeafletSurface {
    map: Map,
    overlays: HashMap<OverlayGroup, Layer>,
    highlight: Option<Timeout>,
}

impl LeafletSurface {
    /// Wrap `map` and attach one layer group per overlay.
    pub fn new(map: Map) -> Self {
        let overlays = OverlayGroup::ALL
            .into_iter()
            .map(|group| {
                let layer = leaflet::layer_group();
                layer.add_to(&map);
                (group, layer)
            })
            .collect();
        LeafletSurface {
            map,
            overlays,
            highlight: None,
        }
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    /// `{ name: layerGroup }` for the layer-toggle control.
    pub fn overlay_object(&self) -> JsValue {
        let object = js_sys::Object::new();
        for group in OverlayGroup::ALL {
            if let Some(layer) = self.overlays.get(&group) {
                let _ = js_sys::Reflect::set(&object, &group.name().into(), layer);
            }
        }
        object.into()
    }

    fn build(&self, shape: &Shape) -> Layer {
        let style = shape_options(shape);
        match shape {
            Shape::CircleMarker { at, .. } => {
                leaflet::circle_marker(&leaflet::lat_lng(*at), &leaflet::options(&style))
            }
            Shape::IconMarker { at, kind, .. } => {
                let options = leaflet::options(&style);
                let icon = leaflet::div_icon(&leaflet::options(&icon_options(*kind)));
                if let Err(e) = js_sys::Reflect::set(&options, &"icon".into(), &icon) {
                    tracing::warn!("could not attach marker icon: {:?}", e);
                }
                leaflet::marker(&leaflet::lat_lng(*at), &options)
            }
            Shape::Polygon { vertices, .. } => {
                leaflet::polygon(&leaflet::lat_lngs(vertices), &leaflet::options(&style))
            }
        }
    }

    fn bind(layer: &Layer, popup: &Popup) {
        layer.bind_popup(&popup.html(), &leaflet::options(&popup.style));
    }
}

impl MapSurface for LeafletSurface {
    type Handle = Layer;

    fn add(&mut self, primitive: Primitive) -> Layer {
        let layer = self.build(&primitive.shape);
        if let Some(popup) = &primitive.popup {
            Self::bind(&layer, popup);
        }

        match primitive.layer {
            TargetLayer::Map => layer.add_to(&self.map),
            TargetLayer::Overlay(group) => match self.overlays.get(&group) {
                Some(target) => layer.add_to(target),
                None => layer.add_to(&self.map),
            },
        };

        // Leaflet only opens popups for layers that are on a map.
        if primitive.popup.as_ref().is_some_and(|p| p.open) {
            layer.open_popup();
        }
        layer
    }

    fn remove(&mut self, handle: &Layer) {
        handle.remove();
    }

    fn flag_mode_selector(&mut self) {
        // Replacing the timer cancels a fade still in flight.
        self.highlight = mode_selector::flag();
    }
}

/// Leaflet style options for a shape, without the icon.
fn shape_options(shape: &Shape) -> serde_json::Value {
    match shape {
        Shape::CircleMarker { radius, color, .. } => json!({ "color": color, "radius": radius }),
        Shape::IconMarker { title, .. } => match title {
            Some(title) => json!({ "title": title }),
            None => json!({}),
        },
        Shape::Polygon { color, .. } => match color {
            Some(color) => json!({ "color": color }),
            None => json!({}),
        },
    }
}

fn icon_options(kind: PointKind) -> serde_json::Value {
    json!({
        "className": "custom-icon",
        "html": kind.icon_svg(),
        "iconSize": ICON_SIZE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use homemap_shared::LatLng;

    #[test]
    fn test_circle_marker_options() {
        let shape = Shape::CircleMarker {
            at: LatLng::new(0.0, 0.0),
            radius: 10.0,
            color: "green",
        };
        assert_eq!(shape_options(&shape), json!({ "color": "green", "radius": 10.0 }));
    }

    #[test]
    fn test_polygon_without_color_uses_leaflet_default() {
        let shape = Shape::Polygon {
            vertices: vec![LatLng::new(1.0, 1.0)],
            color: None,
        };
        assert_eq!(shape_options(&shape), json!({}));
    }

    #[test]
    fn test_icon_marker_title_is_forwarded() {
        let shape = Shape::IconMarker {
            at: LatLng::new(1.0, 1.0),
            kind: PointKind::Home,
            title: Some("Cottage".to_string()),
        };
        assert_eq!(shape_options(&shape)["title"], "Cottage");
    }

    #[test]
    fn test_icon_options_embed_svg() {
        let options = icon_options(PointKind::RedFlag);
        assert_eq!(options["className"], "custom-icon");
        assert_eq!(options["iconSize"], json!([24, 24]));
        assert!(options["html"].as_str().unwrap().starts_with("<svg"));
    }
}
