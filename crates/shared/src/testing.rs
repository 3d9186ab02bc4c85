//! In-memory stand-ins for the browser used by unit tests.

use crate::geo::LatLng;
use crate::surface::{MapSurface, Primitive, Shape};
use crate::url_state::{HistoryBackend, HistoryWrite};

pub(crate) struct MemoryHistory {
    query: String,
    pub writes: Vec<(String, HistoryWrite)>,
}

impl MemoryHistory {
    pub fn new(query: &str) -> Self {
        MemoryHistory {
            query: query.to_string(),
            writes: Vec::new(),
        }
    }
}

impl HistoryBackend for MemoryHistory {
    fn query(&self) -> String {
        self.query.clone()
    }

    fn write(&mut self, query: &str, how: HistoryWrite) {
        self.query = query.to_string();
        self.writes.push((query.to_string(), how));
    }
}

/// Records every primitive ever drawn; removed slots become `None`.
#[derive(Default)]
pub(crate) struct RecordingSurface {
    drawn: Vec<Option<Primitive>>,
    pub flags: usize,
    pub removals: usize,
}

impl RecordingSurface {
    pub fn live(&self, handle: usize) -> Option<&Primitive> {
        self.drawn.get(handle).and_then(Option::as_ref)
    }

    pub fn all_live(&self) -> Vec<Primitive> {
        self.drawn.iter().flatten().cloned().collect()
    }

    pub fn live_polygons(&self) -> Vec<&Vec<LatLng>> {
        self.drawn
            .iter()
            .flatten()
            .filter_map(|p| match &p.shape {
                Shape::Polygon { vertices, .. } => Some(vertices),
                _ => None,
            })
            .collect()
    }
}

impl MapSurface for RecordingSurface {
    type Handle = usize;

    fn add(&mut self, primitive: Primitive) -> usize {
        self.drawn.push(Some(primitive));
        self.drawn.len() - 1
    }

    fn remove(&mut self, handle: &usize) {
        if let Some(slot) = self.drawn.get_mut(*handle) {
            if slot.take().is_some() {
                self.removals += 1;
            }
        }
    }

    fn flag_mode_selector(&mut self) {
        self.flags += 1;
    }
}
