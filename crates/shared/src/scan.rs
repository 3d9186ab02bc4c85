//! Shapes and homes embedded in server-rendered HTML.
//!
//! List fragments carry one `<span>` per stored record:
//!
//! ```html
//! <span data-shape-id="4" data-shape-kind="no-go" data-shape-data="[[1,2],[3,4]]"></span>
//! <span data-home-id="7" data-home='{"ID":7,"Lat":1.5,"Lng":2.5,"PointType":"RedFlag"}'></span>
//! ```
//!
//! Each span is drawn once and then marked `rendered="true"`, so rescanning
//! after every swap only picks up new ones.

use serde::Deserialize;

use crate::controller::MapController;
use crate::fragment::PopupStyle;
use crate::geo::VertexInput;
use crate::lenient;
use crate::records::{AreaOptions, MarkerRecord, RawMarkerOptions};
use crate::surface::MapSurface;
use crate::url_state::HistoryBackend;

pub const SHAPE_SELECTOR: &str = "span[data-shape-id]";
pub const HOME_SELECTOR: &str = "span[data-home-id]";

pub const RENDERED_ATTR: &str = "rendered";
const SHAPE_ID_ATTR: &str = "data-shape-id";
const SHAPE_DATA_ATTR: &str = "data-shape-data";
const SHAPE_KIND_ATTR: &str = "data-shape-kind";
const HOME_ATTR: &str = "data-home";

const DEFAULT_POINT_TYPE: &str = "Home";

/// An element the scan can read attributes from and flag as drawn.
pub trait DataSpan {
    fn attribute(&self, name: &str) -> Option<String>;
    fn mark_rendered(&self);

    fn is_rendered(&self) -> bool {
        self.attribute(RENDERED_ATTR).as_deref() == Some("true")
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpanError {
    #[error("{0} attribute missing")]
    Missing(&'static str),
    #[error("data-home is not a home record: {0}")]
    BadHome(String),
}

/// The `data-home` payload, in the server's field naming.
#[derive(Deserialize)]
struct HomeAttr {
    #[serde(rename = "Lat")]
    lat: f64,
    #[serde(rename = "Lng")]
    lng: f64,
    #[serde(rename = "ID", default, deserialize_with = "lenient::id")]
    id: Option<String>,
    #[serde(rename = "PointType", default, deserialize_with = "lenient::text")]
    point_type: Option<String>,
}

/// Marker record from a `data-home` attribute. A missing or empty
/// `PointType` means a home.
pub fn home_record(data_home: &str) -> Result<MarkerRecord, SpanError> {
    let home: HomeAttr =
        serde_json::from_str(data_home).map_err(|e| SpanError::BadHome(e.to_string()))?;
    let kind = home
        .point_type
        .unwrap_or_else(|| DEFAULT_POINT_TYPE.to_string());
    Ok(MarkerRecord {
        lat: home.lat,
        lng: home.lng,
        options: RawMarkerOptions {
            point_kind: Some(kind),
            home_id: home.id,
            title: None,
        },
    })
}

/// Outline and options of a shape span. The outline is resolved later, so
/// a span without `data-shape-data` fails when drawn.
pub fn shape_parts(span: &impl DataSpan) -> (VertexInput, AreaOptions) {
    let vertices = VertexInput::Serialized(span.attribute(SHAPE_DATA_ATTR).unwrap_or_default());
    let options = AreaOptions {
        shape_kind: span.attribute(SHAPE_KIND_ATTR).filter(|k| !k.is_empty()),
        shape_id: span
            .attribute(SHAPE_ID_ATTR)
            .and_then(|id| lenient::id_from_text(&id)),
        shape_title: None,
    };
    (vertices, options)
}

/// What one scan drew.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanCount {
    pub shapes: usize,
    pub homes: usize,
}

impl<S: MapSurface, H: HistoryBackend> MapController<S, H> {
    /// Draw every span not yet rendered: shapes with the edit-area popup,
    /// homes as markers. Spans are marked whether or not their data was
    /// usable, so a bad one is reported once.
    pub fn render_spans<E: DataSpan>(&mut self, shapes: &[E], homes: &[E]) -> ScanCount {
        let mut count = ScanCount::default();

        for span in shapes.iter().filter(|s| !s.is_rendered()) {
            let (vertices, options) = shape_parts(span);
            if self
                .add_polygon(vertices, &options, PopupStyle::EDIT_AREA)
                .is_ok()
            {
                count.shapes += 1;
            }
            span.mark_rendered();
        }

        for span in homes.iter().filter(|s| !s.is_rendered()) {
            let drawn = match span.attribute(HOME_ATTR) {
                Some(data) => home_record(&data),
                None => Err(SpanError::Missing(HOME_ATTR)),
            }
            .inspect_err(|e| tracing::warn!("home span skipped: {}", e))
            .is_ok_and(|record| self.add_marker_record(&record));
            if drawn {
                count.homes += 1;
            }
            span.mark_rendered();
        }

        tracing::debug!(shapes = count.shapes, homes = count.homes, "spans rendered");
        count
    }
}
