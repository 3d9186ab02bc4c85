//! View state carried in the page's query string.
//!
//! `lat`, `lng`, `zoom` and `mode` are read on load so a reload restores the
//! view, and rewritten as the user pans, zooms or switches mode. Parameters
//! this module does not own are passed through untouched.

use crate::mode::InteractionMode;

pub const DEFAULT_LATITUDE: f64 = -43.53937676715642;
pub const DEFAULT_LONGITUDE: f64 = 172.55882263183597;
pub const DEFAULT_ZOOM: i32 = 13;

pub const LAT_PARAM: &str = "lat";
pub const LNG_PARAM: &str = "lng";
pub const ZOOM_PARAM: &str = "zoom";
pub const MODE_PARAM: &str = "mode";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom_level: i32,
    pub mode: InteractionMode,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            zoom_level: DEFAULT_ZOOM,
            mode: InteractionMode::None,
        }
    }
}

/// Any subset of [`ViewState`] fields to write back.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewPatch {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub zoom_level: Option<i32>,
    pub mode: Option<InteractionMode>,
}

impl ViewPatch {
    pub fn mode(mode: InteractionMode) -> Self {
        ViewPatch {
            mode: Some(mode),
            ..Default::default()
        }
    }

    /// Camera update emitted after a pan or zoom gesture. Mode is left out:
    /// it is written immediately whenever it changes.
    pub fn camera(latitude: f64, longitude: f64, zoom_level: i32) -> Self {
        ViewPatch {
            latitude: Some(latitude),
            longitude: Some(longitude),
            zoom_level: Some(zoom_level),
            mode: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.latitude.is_none()
            && self.longitude.is_none()
            && self.zoom_level.is_none()
            && self.mode.is_none()
    }

    fn entries(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::with_capacity(4);
        if let Some(lat) = self.latitude {
            out.push((LAT_PARAM, lat.to_string()));
        }
        if let Some(lng) = self.longitude {
            out.push((LNG_PARAM, lng.to_string()));
        }
        if let Some(zoom) = self.zoom_level {
            out.push((ZOOM_PARAM, zoom.to_string()));
        }
        if let Some(mode) = self.mode {
            out.push((MODE_PARAM, mode.as_str().to_string()));
        }
        out
    }
}

fn parse_coordinate(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Integer zoom; a fractional value is truncated toward zero.
fn parse_zoom(value: &str) -> Option<i32> {
    let value = value.trim();
    value.parse::<i32>().ok().or_else(|| {
        value
            .parse::<f64>()
            .ok()
            .filter(|z| z.is_finite() && z.abs() < i32::MAX as f64)
            .map(|z| z.trunc() as i32)
    })
}

fn split_pairs(query: &str) -> impl Iterator<Item = (&str, &str)> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let mut kv = pair.splitn(2, '=');
            let key = kv.next().unwrap_or("");
            let value = kv.next().unwrap_or("");
            (key, value)
        })
}

impl ViewState {
    /// Parse view state from a query string (with or without the leading
    /// `?`). Missing or malformed fields fall back to their defaults.
    pub fn from_query(query: &str) -> Self {
        Self::from_query_with(query, &ViewState::default())
    }

    /// Like [`ViewState::from_query`] with caller-supplied fallbacks.
    pub fn from_query_with(query: &str, defaults: &ViewState) -> Self {
        let mut state = *defaults;
        for (key, value) in split_pairs(query) {
            match key {
                LAT_PARAM => {
                    state.latitude = parse_coordinate(value).unwrap_or(defaults.latitude);
                }
                LNG_PARAM => {
                    state.longitude = parse_coordinate(value).unwrap_or(defaults.longitude);
                }
                ZOOM_PARAM => state.zoom_level = parse_zoom(value).unwrap_or(defaults.zoom_level),
                MODE_PARAM => state.mode = InteractionMode::from_query_value(value),
                _ => {}
            }
        }
        state
    }
}

/// Merge `patch` into `existing`, returning the new query string with a
/// leading `?`. Patched keys are rewritten in place (duplicates collapse to
/// the first occurrence), other parameters keep their order, and keys that
/// were absent are appended.
pub fn merge_query(existing: &str, patch: &ViewPatch) -> String {
    let mut pending = patch.entries();
    let patched: Vec<&str> = pending.iter().map(|(k, _)| *k).collect();
    let mut parts: Vec<String> = Vec::new();

    for raw in existing.trim_start_matches('?').split('&') {
        if raw.is_empty() {
            continue;
        }
        let key = raw.split('=').next().unwrap_or("");
        if let Some(idx) = pending.iter().position(|(k, _)| *k == key) {
            let (k, v) = pending.remove(idx);
            parts.push(format!("{}={}", k, v));
        } else if patched.contains(&key) {
            // Later duplicate of a key already rewritten.
            continue;
        } else {
            parts.push(raw.to_string());
        }
    }
    for (k, v) in pending {
        parts.push(format!("{}={}", k, v));
    }

    format!("?{}", parts.join("&"))
}
