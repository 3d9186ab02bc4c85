//! Point and shape kinds, and the overlay groups they land in.
//!
//! Kinds arrive as strings from server data; they are parsed once at that
//! boundary and matched exhaustively everywhere else.

use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{what} \"{value}\" not found")]
pub struct UnknownKindError {
    pub what: &'static str,
    pub value: String,
}

/// Independently toggleable layer. The names are the keys shown in the
/// layer-toggle control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayGroup {
    Warning,
    NoGo,
    Good,
    Homes,
    RedFlags,
}

impl OverlayGroup {
    /// Control order, top to bottom.
    pub const ALL: [OverlayGroup; 5] = [
        OverlayGroup::Warning,
        OverlayGroup::NoGo,
        OverlayGroup::Good,
        OverlayGroup::Homes,
        OverlayGroup::RedFlags,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OverlayGroup::Warning => "warning",
            OverlayGroup::NoGo => "noGo",
            OverlayGroup::Good => "good",
            OverlayGroup::Homes => "homes",
            OverlayGroup::RedFlags => "redFlags",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointKind {
    Home,
    RedFlag,
}

const HOME_ICON_SVG: &str = r##"<svg height="2rem" width="2rem" viewBox="0 0 24 24" xmlns="http://www.w3.org/2000/svg"><path fill="#000000" d="M12 3 2 12h3v8h5v-5h4v5h5v-8h3z"/></svg>"##;

const RED_FLAG_ICON_SVG: &str = r##"<svg height="2rem" width="2rem" viewBox="0 0 24 24" xmlns="http://www.w3.org/2000/svg"><circle cx="12" cy="12" r="11" fill="#DF5C4E" stroke="#000" stroke-width="0.5"/><rect x="11" y="5" width="2" height="9" rx="1" fill="#F4EFEF"/><circle cx="12" cy="17.5" r="1.4" fill="#F4EFEF"/></svg>"##;

impl PointKind {
    pub fn overlay(self) -> OverlayGroup {
        match self {
            PointKind::Home => OverlayGroup::Homes,
            PointKind::RedFlag => OverlayGroup::RedFlags,
        }
    }

    /// Inline SVG used for the marker's div icon.
    pub fn icon_svg(self) -> &'static str {
        match self {
            PointKind::Home => HOME_ICON_SVG,
            PointKind::RedFlag => RED_FLAG_ICON_SVG,
        }
    }
}

impl FromStr for PointKind {
    type Err = UnknownKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Home" => Ok(PointKind::Home),
            "RedFlag" => Ok(PointKind::RedFlag),
            other => Err(UnknownKindError {
                what: "pointKind",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Good,
    NoGo,
    Warning,
}

impl ShapeKind {
    pub fn color(self) -> &'static str {
        match self {
            ShapeKind::Good => "#169016",
            ShapeKind::NoGo => "black",
            ShapeKind::Warning => "red",
        }
    }

    pub fn overlay(self) -> OverlayGroup {
        match self {
            ShapeKind::Good => OverlayGroup::Good,
            ShapeKind::NoGo => OverlayGroup::NoGo,
            ShapeKind::Warning => OverlayGroup::Warning,
        }
    }
}

impl FromStr for ShapeKind {
    type Err = UnknownKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "good" => Ok(ShapeKind::Good),
            "no-go" => Ok(ShapeKind::NoGo),
            "warning" => Ok(ShapeKind::Warning),
            other => Err(UnknownKindError {
                what: "shapeKind",
                value: other.to_string(),
            }),
        }
    }
}

/// Colour of shapes and transient markers the user is still drawing.
pub const DRAFT_COLOR: &str = "green";

/// Radius of the transient circle marker placed in point mode.
pub const DRAFT_MARKER_RADIUS: f64 = 10.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_kinds_parse_and_map_to_groups() {
        assert_eq!("Home".parse::<PointKind>().unwrap().overlay(), OverlayGroup::Homes);
        assert_eq!(
            "RedFlag".parse::<PointKind>().unwrap().overlay(),
            OverlayGroup::RedFlags
        );
    }

    #[test]
    fn test_unknown_point_kind_is_rejected() {
        let err = "Castle".parse::<PointKind>().unwrap_err();
        assert_eq!(err.to_string(), r#"pointKind "Castle" not found"#);
    }

    #[test]
    fn test_shape_kinds_pick_colors() {
        assert_eq!("good".parse::<ShapeKind>().unwrap().color(), "#169016");
        assert_eq!("no-go".parse::<ShapeKind>().unwrap().color(), "black");
        assert_eq!("warning".parse::<ShapeKind>().unwrap().color(), "red");
    }

    #[test]
    fn test_shape_kind_tokens() {
        assert_eq!("good".parse::<ShapeKind>(), Ok(ShapeKind::Good));
        assert_eq!("no-go".parse::<ShapeKind>(), Ok(ShapeKind::NoGo));
        assert_eq!("warning".parse::<ShapeKind>(), Ok(ShapeKind::Warning));
        // Group key and kind token differ for no-go.
        assert_eq!(ShapeKind::NoGo.overlay().name(), "noGo");
        assert!("noGo".parse::<ShapeKind>().is_err());
    }

    #[test]
    fn test_overlay_names_are_unique() {
        let mut names: Vec<&str> = OverlayGroup::ALL.iter().map(|g| g.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), OverlayGroup::ALL.len());
    }

    #[test]
    fn test_icons_are_svg() {
        for kind in [PointKind::Home, PointKind::RedFlag] {
            assert!(kind.icon_svg().starts_with("<svg"));
        }
    }
}
