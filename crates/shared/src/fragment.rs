//! Server-rendered fragments requested from popups.
//!
//! A popup never carries content of its own. It holds a placeholder that
//! asks the server for an HTML fragment once it scrolls into view; the
//! fragment is then activated so its interactive attributes work.

use serde::{Deserialize, Serialize};

use crate::geo::LatLng;
use crate::lenient;

/// Form field the drafted outline is submitted under.
pub const SHAPE_DATA_FIELD: &str = "shapeData";

#[derive(Debug, Clone, PartialEq)]
pub enum FragmentRequest {
    /// Creation form for a point at a clicked coordinate.
    NewPoint { at: LatLng },
    /// Details for a stored point, or the generic point view without an id.
    Point { home_id: Option<String> },
    /// Creation form for the area being drafted, sent its outline so far.
    NewArea { vertices: Vec<LatLng> },
    /// Details for a stored area.
    Shape { shape_id: Option<String> },
}

impl FragmentRequest {
    pub fn url(&self) -> String {
        match self {
            FragmentRequest::NewPoint { at } => format!("/homes?lat={}&lng={}", at.lat, at.lng),
            FragmentRequest::Point { home_id: Some(id) } => format!("/homes/{}", id),
            FragmentRequest::Point { home_id: None } => "/homes".to_string(),
            FragmentRequest::NewArea { .. } => "/shapes?mode=area".to_string(),
            FragmentRequest::Shape { shape_id: Some(id) } => format!("/shapes/{}", id),
            FragmentRequest::Shape { shape_id: None } => "/shapes".to_string(),
        }
    }

    fn loading_text(&self) -> &'static str {
        match self {
            FragmentRequest::NewPoint { .. } => "loading point..",
            FragmentRequest::Point { .. } => "",
            FragmentRequest::NewArea { .. } => "loading..",
            FragmentRequest::Shape { .. } => "loading...",
        }
    }

    /// Extra request parameters, as the JSON object `hx-vals` takes.
    fn values(&self) -> Option<String> {
        match self {
            FragmentRequest::NewArea { vertices } if !vertices.is_empty() => {
                let outline = serde_json::to_string(vertices).ok()?;
                let mut values = serde_json::Map::new();
                values.insert(SHAPE_DATA_FIELD.to_string(), outline.into());
                Some(serde_json::Value::Object(values).to_string())
            }
            _ => None,
        }
    }

    /// Placeholder element that issues the request when revealed.
    pub fn placeholder_html(&self) -> String {
        let values = match self.values() {
            Some(values) => format!(r#" hx-vals="{}""#, escape_attr(&values)),
            None => String::new(),
        };
        format!(
            r#"<div hx-get="{}"{} hx-trigger="revealed">{}</div>"#,
            escape_attr(&self.url()),
            values,
            self.loading_text()
        )
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Popup presentation. Serialized straight into the map library's popup
/// options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupStyle {
    #[serde(rename = "className", skip_serializing_if = "Option::is_none")]
    pub class_name: Option<&'static str>,
    pub min_width: u32,
}

impl PopupStyle {
    pub const CREATE_POINT: PopupStyle = PopupStyle {
        class_name: Some("popup-green"),
        min_width: 300,
    };
    pub const CREATE_AREA: PopupStyle = PopupStyle {
        class_name: Some("popup-red"),
        min_width: 300,
    };
    pub const EDIT_POINT: PopupStyle = PopupStyle {
        class_name: Some("popup-blue"),
        min_width: 300,
    };
    pub const EDIT_AREA: PopupStyle = PopupStyle {
        class_name: Some("popup-blue"),
        min_width: 300,
    };
    pub const SHAPE_DETAIL: PopupStyle = PopupStyle {
        class_name: None,
        min_width: 200,
    };

    /// Look up a preset by the name scripts pass in, e.g. `"edit-area"`.
    pub fn preset(name: &str) -> Option<PopupStyle> {
        match name {
            "create-point" => Some(PopupStyle::CREATE_POINT),
            "create-area" => Some(PopupStyle::CREATE_AREA),
            "edit-point" => Some(PopupStyle::EDIT_POINT),
            "edit-area" => Some(PopupStyle::EDIT_AREA),
            "shape-detail" => Some(PopupStyle::SHAPE_DETAIL),
            _ => None,
        }
    }
}

/// Popup options object passed by scripts in place of a preset name, e.g.
/// `{ color: "blue", minWidth: "300" }`. Only the stylesheet's popup
/// classes are honoured.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupOptions {
    #[serde(default, deserialize_with = "lenient::text")]
    pub class_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "lenient::pixels")]
    pub min_width: Option<u32>,
}

fn popup_class(name: &str) -> Option<&'static str> {
    match name.trim() {
        "green" | "popup-green" => Some("popup-green"),
        "red" | "popup-red" => Some("popup-red"),
        "blue" | "popup-blue" => Some("popup-blue"),
        other => {
            tracing::warn!("unknown popup class {:?}", other);
            None
        }
    }
}

impl PopupOptions {
    /// Fields left out keep the detail style's values.
    pub fn style(&self) -> PopupStyle {
        let base = PopupStyle::SHAPE_DETAIL;
        PopupStyle {
            class_name: self
                .class_name
                .as_deref()
                .or(self.color.as_deref())
                .and_then(popup_class),
            min_width: self.min_width.unwrap_or(base.min_width),
        }
    }
}

impl Default for PopupStyle {
    fn default() -> Self {
        PopupStyle::SHAPE_DETAIL
    }
}

/// Content and style of a popup bound to a primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub request: FragmentRequest,
    pub style: PopupStyle,
    /// Open the popup immediately after binding it.
    pub open: bool,
}

impl Popup {
    pub fn html(&self) -> String {
        self.request.placeholder_html()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_point_url_carries_coordinate() {
        let req = FragmentRequest::NewPoint {
            at: LatLng::new(-43.5, 172.25),
        };
        assert_eq!(req.url(), "/homes?lat=-43.5&lng=172.25");
    }

    #[test]
    fn test_point_url_with_and_without_id() {
        let req = FragmentRequest::Point {
            home_id: Some("12".to_string()),
        };
        assert_eq!(req.url(), "/homes/12");
        assert_eq!(FragmentRequest::Point { home_id: None }.url(), "/homes");
    }

    #[test]
    fn test_area_urls() {
        let draft = FragmentRequest::NewArea { vertices: vec![] };
        assert_eq!(draft.url(), "/shapes?mode=area");
        let shape = FragmentRequest::Shape {
            shape_id: Some("4".to_string()),
        };
        assert_eq!(shape.url(), "/shapes/4");
    }

    #[test]
    fn test_placeholder_triggers_on_reveal() {
        let html = FragmentRequest::Point { home_id: None }.placeholder_html();
        assert_eq!(html, r#"<div hx-get="/homes" hx-trigger="revealed"></div>"#);
    }

    #[test]
    fn test_area_form_request_carries_outline() {
        let html = FragmentRequest::NewArea {
            vertices: vec![LatLng::new(1.0, 2.0), LatLng::new(3.5, 4.0)],
        }
        .placeholder_html();
        assert_eq!(
            html,
            concat!(
                r#"<div hx-get="/shapes?mode=area" "#,
                r#"hx-vals="{&quot;shapeData&quot;:&quot;[[1.0,2.0],[3.5,4.0]]&quot;}" "#,
                r#"hx-trigger="revealed">loading..</div>"#
            )
        );
    }

    #[test]
    fn test_placeholder_escapes_ampersand() {
        let html = FragmentRequest::NewPoint {
            at: LatLng::new(1.0, 2.0),
        }
        .placeholder_html();
        assert!(html.contains(r#"hx-get="/homes?lat=1&amp;lng=2""#));
    }

    #[test]
    fn test_presets_by_name() {
        assert_eq!(PopupStyle::preset("edit-area"), Some(PopupStyle::EDIT_AREA));
        assert_eq!(PopupStyle::preset("create-point"), Some(PopupStyle::CREATE_POINT));
        assert_eq!(PopupStyle::preset("huge"), None);
    }

    #[test]
    fn test_popup_options_object() {
        let opts: PopupOptions =
            serde_json::from_str(r#"{"color":"blue","minWidth":"300"}"#).unwrap();
        assert_eq!(opts.style(), PopupStyle::EDIT_AREA);

        let opts: PopupOptions =
            serde_json::from_str(r#"{"className":"popup-red","minWidth":"200px"}"#).unwrap();
        assert_eq!(
            opts.style(),
            PopupStyle {
                class_name: Some("popup-red"),
                min_width: 200,
            }
        );
    }

    #[test]
    fn test_popup_options_fall_back_per_field() {
        let opts: PopupOptions =
            serde_json::from_str(r#"{"className":"sparkly","minWidth":"wide"}"#).unwrap();
        assert_eq!(opts.style(), PopupStyle::SHAPE_DETAIL);
        let opts: PopupOptions = serde_json::from_str(r#"{"minWidth":450}"#).unwrap();
        assert_eq!(opts.style().min_width, 450);
        assert_eq!(opts.style().class_name, None);
    }

    #[test]
    fn test_popup_style_serializes_for_leaflet() {
        let json = serde_json::to_value(PopupStyle::CREATE_POINT).unwrap();
        assert_eq!(json["minWidth"], 300);
        assert_eq!(json["className"], "popup-green");
        let json = serde_json::to_value(PopupStyle::SHAPE_DETAIL).unwrap();
        assert!(json.get("className").is_none());
        assert_eq!(json["minWidth"], 200);
    }
}
