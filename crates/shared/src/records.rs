//! Marker and area data as the server sends it.
//!
//! Ids may arrive as numbers or strings. A field that cannot be used is
//! dropped on its own; the rest of the options object still applies.

use serde::Deserialize;

use crate::geo::LatLng;
use crate::kinds::{PointKind, UnknownKindError};
use crate::lenient;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMarkerOptions {
    #[serde(default, deserialize_with = "lenient::text")]
    pub point_kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::id")]
    pub home_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: Option<String>,
}

/// One entry of a bulk marker payload:
/// `{"lat": .., "lng": .., "options": {"pointKind": "Home", "homeId": 3}}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MarkerRecord {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub options: RawMarkerOptions,
}

/// Validated marker options.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerOptions {
    pub kind: PointKind,
    pub home_id: Option<String>,
    pub title: Option<String>,
}

impl MarkerOptions {
    pub fn new(kind: PointKind) -> Self {
        MarkerOptions {
            kind,
            home_id: None,
            title: None,
        }
    }
}

impl TryFrom<&RawMarkerOptions> for MarkerOptions {
    type Error = UnknownKindError;

    fn try_from(raw: &RawMarkerOptions) -> Result<Self, Self::Error> {
        let kind = raw.point_kind.as_deref().unwrap_or("").parse::<PointKind>()?;
        Ok(MarkerOptions {
            kind,
            home_id: raw.home_id.clone(),
            title: raw.title.clone(),
        })
    }
}

impl MarkerRecord {
    pub fn at(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

/// Options accompanying a polygon: `{"shapeKind": "no-go", "shapeId": 4}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaOptions {
    #[serde(default, deserialize_with = "lenient::text")]
    pub shape_kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::id")]
    pub shape_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub shape_title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_record_deserializes() {
        let json = r#"[{"lat":-43.5,"lng":172.5,"options":{"pointKind":"RedFlag","homeId":7,"title":"Damp"}}]"#;
        let records: Vec<MarkerRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].at(), LatLng::new(-43.5, 172.5));
        let opts = MarkerOptions::try_from(&records[0].options).unwrap();
        assert_eq!(opts.kind, PointKind::RedFlag);
        assert_eq!(opts.home_id.as_deref(), Some("7"));
        assert_eq!(opts.title.as_deref(), Some("Damp"));
    }

    #[test]
    fn test_marker_record_without_options_has_no_kind() {
        let record: MarkerRecord = serde_json::from_str(r#"{"lat":1,"lng":2}"#).unwrap();
        let err = MarkerOptions::try_from(&record.options).unwrap_err();
        assert_eq!(err.value, "");
    }

    #[test]
    fn test_string_home_id_keeps_kind() {
        let raw: RawMarkerOptions =
            serde_json::from_str(r#"{"pointKind":"Home","homeId":"7"}"#).unwrap();
        let opts = MarkerOptions::try_from(&raw).unwrap();
        assert_eq!(opts.kind, PointKind::Home);
        assert_eq!(opts.home_id.as_deref(), Some("7"));
    }

    #[test]
    fn test_bad_marker_field_is_dropped_alone() {
        let raw: RawMarkerOptions =
            serde_json::from_str(r#"{"pointKind":"RedFlag","homeId":{"x":1},"title":false}"#)
                .unwrap();
        assert_eq!(raw.point_kind.as_deref(), Some("RedFlag"));
        assert_eq!(raw.home_id, None);
        assert_eq!(raw.title, None);
    }

    #[test]
    fn test_area_options_deserialize_camel_case() {
        let opts: AreaOptions =
            serde_json::from_str(r#"{"shapeKind":"no-go","shapeId":4,"shapeTitle":"Flood zone"}"#)
                .unwrap();
        assert_eq!(opts.shape_kind.as_deref(), Some("no-go"));
        assert_eq!(opts.shape_id.as_deref(), Some("4"));
        assert_eq!(opts.shape_title.as_deref(), Some("Flood zone"));
    }

    #[test]
    fn test_string_shape_id_keeps_kind() {
        let opts: AreaOptions =
            serde_json::from_str(r#"{"shapeKind":"good","shapeId":"4"}"#).unwrap();
        assert_eq!(opts.shape_kind.as_deref(), Some("good"));
        assert_eq!(opts.shape_id.as_deref(), Some("4"));
    }

    #[test]
    fn test_bad_shape_id_is_dropped_alone() {
        let opts: AreaOptions =
            serde_json::from_str(r#"{"shapeKind":"warning","shapeId":[4]}"#).unwrap();
        assert_eq!(opts.shape_kind.as_deref(), Some("warning"));
        assert_eq!(opts.shape_id, None);
    }

    #[test]
    fn test_area_options_empty_object() {
        let opts: AreaOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, AreaOptions::default());
    }
}
