//! Map interaction core shared by the browser frontend and its tests.
//!
//! Nothing here touches the DOM. The frontend implements [`surface::MapSurface`]
//! and [`url_state::HistoryBackend`] over the map library and the browser
//! history, then drives a [`controller::MapController`].

pub mod controller;
pub mod debounce;
pub mod fragment;
pub mod geo;
pub mod kinds;
mod lenient;
pub mod mode;
pub mod records;
pub mod scan;
pub mod surface;
pub mod url_state;
pub mod view_state;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::{ClickOrigin, ClickOutcome, ControllerConfig, MapClick, MapController};
pub use geo::LatLng;
pub use mode::InteractionMode;
