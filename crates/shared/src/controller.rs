//! Interaction mode controller.
//!
//! Owns the current mode, turns map clicks into markers, draft polygons or
//! a nudge towards the mode selector, and keeps ownership lists of what it
//! drew so they can be removed in bulk. Rendering goes through
//! [`MapSurface`], URL persistence through [`HistoryBackend`]; both are
//! supplied by the host.

use std::time::Duration;

use crate::debounce::{Ticket, DEFAULT_DEBOUNCE};
use crate::fragment::{FragmentRequest, Popup, PopupStyle};
use crate::geo::{GeometryError, LatLng, VertexInput};
use crate::kinds::{OverlayGroup, ShapeKind, DRAFT_COLOR, DRAFT_MARKER_RADIUS};
use crate::mode::{InteractionMode, InvalidModeError};
use crate::records::{AreaOptions, MarkerOptions, MarkerRecord};
use crate::surface::{MapSurface, Primitive, Shape, TargetLayer};
use crate::url_state::{HistoryBackend, HistoryWrite, UrlStateSync};
use crate::view_state::{ViewPatch, ViewState};

#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
    /// Put markers and shapes into per-kind overlay groups listed in the
    /// layer control. When off, everything is drawn straight onto the map.
    pub segment_layers_by_kind: bool,
    /// View used for any field the URL does not supply.
    pub default_view: ViewState,
    /// Quiescence window for pan/zoom URL writes.
    pub debounce: Duration,
    /// History behaviour of mode changes.
    pub mode_history: HistoryWrite,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig {
            segment_layers_by_kind: true,
            default_view: ViewState::default(),
            debounce: DEFAULT_DEBOUNCE,
            mode_history: HistoryWrite::Replace,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOrigin {
    MapSurface,
    /// The click landed on the mode selector chrome and bubbled to the map.
    ModeSelector,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapClick {
    pub at: LatLng,
    pub origin: ClickOrigin,
}

impl MapClick {
    pub fn on_map(at: LatLng) -> Self {
        MapClick {
            at,
            origin: ClickOrigin::MapSurface,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    PointPlaced,
    DraftStarted,
    DraftExtended { vertices: usize },
    ModeRequired,
}

struct AreaDraft<H> {
    vertices: Vec<LatLng>,
    rendered: Option<H>,
}

pub struct MapController<S: MapSurface, H: HistoryBackend> {
    surface: S,
    url: UrlStateSync<H>,
    config: ControllerConfig,
    mode: InteractionMode,
    markers: Vec<S::Handle>,
    polygons: Vec<S::Handle>,
    draft: Option<AreaDraft<S::Handle>>,
}

impl<S: MapSurface, H: HistoryBackend> MapController<S, H> {
    /// Build a controller whose mode is seeded from the URL.
    pub fn new(surface: S, history: H, config: ControllerConfig) -> Self {
        let url = UrlStateSync::new(history, config.mode_history);
        let mode = url.current().mode;
        MapController {
            surface,
            url,
            config,
            mode,
            markers: Vec::new(),
            polygons: Vec::new(),
            draft: None,
        }
    }

    /// View to open the map with: the URL's values over the configured
    /// defaults, with the controller's mode.
    pub fn initial_view(&self) -> ViewState {
        let query = self.url.history().query();
        let mut view = ViewState::from_query_with(&query, &self.config.default_view);
        view.mode = self.mode;
        view
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn set_mode(&mut self, mode: InteractionMode) {
        if mode != self.mode {
            tracing::info!(from = %self.mode, to = %mode, "interaction mode changed");
        }
        self.mode = mode;
        self.url.set_mode_param(mode);
    }

    /// String form of [`MapController::set_mode`]; only `none`, `point` and
    /// `area` are accepted.
    pub fn set_mode_str(&mut self, mode: &str) -> Result<(), InvalidModeError> {
        let mode = mode.parse::<InteractionMode>()?;
        self.set_mode(mode);
        Ok(())
    }

    pub fn handle_map_click(&mut self, click: MapClick) -> ClickOutcome {
        if click.origin == ClickOrigin::ModeSelector {
            tracing::debug!("ignoring click on mode selector");
            return ClickOutcome::Ignored;
        }
        tracing::debug!(lat = click.at.lat, lng = click.at.lng, mode = %self.mode, "map click");

        match self.mode {
            InteractionMode::Point => {
                self.place_point_draft(click.at);
                ClickOutcome::PointPlaced
            }
            InteractionMode::Area => self.extend_area_draft(click.at),
            InteractionMode::None => {
                tracing::warn!("map clicked with no interaction mode selected");
                self.surface.flag_mode_selector();
                ClickOutcome::ModeRequired
            }
        }
    }

    fn place_point_draft(&mut self, at: LatLng) {
        let handle = self.surface.add(Primitive {
            shape: Shape::CircleMarker {
                at,
                radius: DRAFT_MARKER_RADIUS,
                color: DRAFT_COLOR,
            },
            layer: TargetLayer::Map,
            popup: Some(Popup {
                request: FragmentRequest::NewPoint { at },
                style: PopupStyle::CREATE_POINT,
                open: true,
            }),
        });
        self.markers.push(handle);
    }

    fn extend_area_draft(&mut self, at: LatLng) -> ClickOutcome {
        let started = self.draft.is_none();
        let draft = self.draft.get_or_insert_with(|| AreaDraft {
            vertices: Vec::new(),
            rendered: None,
        });
        draft.vertices.push(at);

        if let Some(previous) = draft.rendered.take() {
            self.surface.remove(&previous);
        }
        // A lone vertex is drawn without a form; there is nothing to save yet.
        let popup = (!started).then(|| Popup {
            request: FragmentRequest::NewArea {
                vertices: draft.vertices.clone(),
            },
            style: PopupStyle::CREATE_AREA,
            open: true,
        });
        let handle = self.surface.add(Primitive {
            shape: Shape::Polygon {
                vertices: draft.vertices.clone(),
                color: Some(DRAFT_COLOR),
            },
            layer: TargetLayer::Map,
            popup,
        });
        draft.rendered = Some(handle);

        if started {
            ClickOutcome::DraftStarted
        } else {
            ClickOutcome::DraftExtended {
                vertices: draft.vertices.len(),
            }
        }
    }

    /// Vertices of the area being drafted, in click order.
    pub fn draft_vertices(&self) -> Option<&[LatLng]> {
        self.draft.as_ref().map(|d| d.vertices.as_slice())
    }

    /// The draft outline as stored shape data: `[[lat, lng], ...]`.
    pub fn draft_json(&self) -> Option<String> {
        let vertices = self.draft_vertices()?;
        serde_json::to_string(vertices)
            .inspect_err(|e| tracing::error!("could not encode draft: {}", e))
            .ok()
    }

    fn layer_for(&self, group: OverlayGroup) -> TargetLayer {
        if self.config.segment_layers_by_kind {
            TargetLayer::Overlay(group)
        } else {
            TargetLayer::Map
        }
    }

    pub fn add_marker(&mut self, at: LatLng, options: &MarkerOptions) {
        let primitive = Primitive {
            shape: Shape::IconMarker {
                at,
                kind: options.kind,
                title: options.title.clone(),
            },
            layer: self.layer_for(options.kind.overlay()),
            popup: Some(Popup {
                request: FragmentRequest::Point {
                    home_id: options.home_id.clone(),
                },
                style: PopupStyle::EDIT_POINT,
                open: false,
            }),
        };
        let handle = self.surface.add(primitive);
        self.markers.push(handle);
    }

    /// Add a marker from server data. An unrecognized `pointKind` is logged
    /// and skipped.
    pub fn add_marker_record(&mut self, record: &MarkerRecord) -> bool {
        match MarkerOptions::try_from(&record.options) {
            Ok(options) => {
                self.add_marker(record.at(), &options);
                true
            }
            Err(e) => {
                tracing::warn!("addMarker - {}", e);
                false
            }
        }
    }

    /// Returns how many records produced a marker.
    pub fn add_markers_from_data(&mut self, records: &[MarkerRecord]) -> usize {
        records
            .iter()
            .filter(|record| self.add_marker_record(record))
            .count()
    }

    pub fn add_polygon(
        &mut self,
        vertices: VertexInput,
        area: &AreaOptions,
        popup_style: PopupStyle,
    ) -> Result<(), GeometryError> {
        let vertices = vertices.resolve().inspect_err(|e| {
            tracing::error!(shape_id = ?area.shape_id, "addPolygon rejected: {}", e);
        })?;

        let kind = area.shape_kind.as_deref().map(str::parse::<ShapeKind>);
        let (color, layer) = match kind {
            Some(Ok(kind)) => (Some(kind.color()), self.layer_for(kind.overlay())),
            Some(Err(e)) => {
                tracing::error!("{}", e);
                (None, TargetLayer::Map)
            }
            None => {
                tracing::error!("shapeKind missing for shape {:?}", area.shape_id);
                (None, TargetLayer::Map)
            }
        };

        let handle = self.surface.add(Primitive {
            shape: Shape::Polygon { vertices, color },
            layer,
            popup: Some(Popup {
                request: FragmentRequest::Shape {
                    shape_id: area.shape_id.clone(),
                },
                style: popup_style,
                open: false,
            }),
        });
        self.polygons.push(handle);
        Ok(())
    }

    pub fn clear_markers(&mut self) {
        for marker in self.markers.drain(..) {
            self.surface.remove(&marker);
        }
    }

    pub fn clear_polygons(&mut self) {
        for polygon in self.polygons.drain(..) {
            self.surface.remove(&polygon);
        }
    }

    pub fn markers(&self) -> &[S::Handle] {
        &self.markers
    }

    pub fn polygons(&self) -> &[S::Handle] {
        &self.polygons
    }

    /// Queue a URL write for the map's new camera. Arm a timer for
    /// [`ControllerConfig::debounce`] and pass the ticket to
    /// [`MapController::flush_view_change`].
    pub fn handle_view_change(&mut self, center: LatLng, zoom: i32) -> Ticket {
        self.url
            .schedule_view_update(ViewPatch::camera(center.lat, center.lng, zoom))
    }

    pub fn flush_view_change(&mut self, ticket: Ticket) -> bool {
        self.url.flush(ticket)
    }

    /// Drop a queued camera write, e.g. when the map goes away before its
    /// timer fires.
    pub fn cancel_view_change(&mut self) {
        self.url.cancel_pending();
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn url_state(&self) -> &UrlStateSync<H> {
        &self.url
    }
}
