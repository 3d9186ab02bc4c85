use serde::{Deserialize, Serialize};

/// A geographic coordinate in degrees.
///
/// Serializes as a `[lat, lng]` pair, which is what the map library accepts
/// for polygon vertices and what stored shape data looks like. Deserializes
/// from either that pair or a `{ "lat": .., "lng": .. }` object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawLatLng", into = "[f64; 2]")]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(p: LatLng) -> Self {
        [p.lat, p.lng]
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLatLng {
    Pair([f64; 2]),
    Object { lat: f64, lng: f64 },
}

impl From<RawLatLng> for LatLng {
    fn from(raw: RawLatLng) -> Self {
        match raw {
            RawLatLng::Pair([lat, lng]) => LatLng { lat, lng },
            RawLatLng::Object { lat, lng } => LatLng { lat, lng },
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum GeometryError {
    #[error("vertices are required for a polygon")]
    MissingVertices,
    #[error("vertex data is not valid JSON: {0}")]
    Malformed(String),
}

/// Polygon vertices as handed to the controller: already structured, or
/// still JSON-encoded (as stored by the server).
#[derive(Debug, Clone, PartialEq)]
pub enum VertexInput {
    Structured(Vec<LatLng>),
    Serialized(String),
}

impl VertexInput {
    /// Decode into an owned vertex list. Empty input of either form is
    /// `MissingVertices`.
    pub fn resolve(self) -> Result<Vec<LatLng>, GeometryError> {
        let vertices = match self {
            VertexInput::Structured(v) => v,
            VertexInput::Serialized(s) => {
                if s.trim().is_empty() {
                    return Err(GeometryError::MissingVertices);
                }
                serde_json::from_str::<Vec<LatLng>>(&s)
                    .map_err(|e| GeometryError::Malformed(e.to_string()))?
            }
        };
        if vertices.is_empty() {
            return Err(GeometryError::MissingVertices);
        }
        Ok(vertices)
    }
}

impl From<Vec<LatLng>> for VertexInput {
    fn from(v: Vec<LatLng>) -> Self {
        VertexInput::Structured(v)
    }
}

impl From<&str> for VertexInput {
    fn from(s: &str) -> Self {
        VertexInput::Serialized(s.to_string())
    }
}
