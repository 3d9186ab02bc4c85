use crate::fragment::Popup;
use crate::geo::LatLng;
use crate::kinds::{OverlayGroup, PointKind};

/// Where a primitive is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetLayer {
    /// Directly on the map; not listed in the layer-toggle control.
    Map,
    Overlay(OverlayGroup),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Transient marker for a point that does not exist yet.
    CircleMarker {
        at: LatLng,
        radius: f64,
        color: &'static str,
    },
    IconMarker {
        at: LatLng,
        kind: PointKind,
        title: Option<String>,
    },
    Polygon {
        vertices: Vec<LatLng>,
        /// `None` keeps the map library's default stroke.
        color: Option<&'static str>,
    },
}

/// Everything the surface needs to draw one marker or polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub shape: Shape,
    pub layer: TargetLayer,
    pub popup: Option<Popup>,
}

/// The map widget, seen from the controller.
pub trait MapSurface {
    /// Opaque reference to a drawn primitive.
    type Handle;

    fn add(&mut self, primitive: Primitive) -> Self::Handle;
    fn remove(&mut self, handle: &Self::Handle);

    /// Draw the user's attention to the mode selector.
    fn flag_mode_selector(&mut self);
}
