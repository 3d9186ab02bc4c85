use std::fmt;
use std::str::FromStr;

/// What a click on the map surface means right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    #[default]
    None,
    Point,
    Area,
}

/// Selector value shown for [`InteractionMode::None`].
pub const NONE_SELECTOR_VALUE: &str = "---";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid mode: {0}")]
pub struct InvalidModeError(pub String);

impl InteractionMode {
    pub const ALL: [InteractionMode; 3] = [
        InteractionMode::None,
        InteractionMode::Point,
        InteractionMode::Area,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InteractionMode::None => "none",
            InteractionMode::Point => "point",
            InteractionMode::Area => "area",
        }
    }

    /// Value of the matching `<option>` in the mode selector.
    pub fn selector_value(self) -> &'static str {
        match self {
            InteractionMode::None => NONE_SELECTOR_VALUE,
            other => other.as_str(),
        }
    }

    pub fn selector_label(self) -> &'static str {
        match self {
            InteractionMode::None => NONE_SELECTOR_VALUE,
            InteractionMode::Point => "Create Points",
            InteractionMode::Area => "Create Areas",
        }
    }

    /// Map a selector value back to a mode. The selector's `---` placeholder
    /// means `none`; everything else goes through the strict parser.
    pub fn from_selector_value(value: &str) -> Result<Self, InvalidModeError> {
        if value == NONE_SELECTOR_VALUE {
            Ok(InteractionMode::None)
        } else {
            value.parse()
        }
    }

    /// Lenient parse used for URL state: anything unrecognized is `none`.
    pub fn from_query_value(value: &str) -> Self {
        Self::from_selector_value(value).unwrap_or_default()
    }
}

impl FromStr for InteractionMode {
    type Err = InvalidModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(InteractionMode::None),
            "point" => Ok(InteractionMode::Point),
            "area" => Ok(InteractionMode::Area),
            other => Err(InvalidModeError(other.to_string())),
        }
    }
}

impl fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_exactly_three_modes() {
        assert_eq!("none".parse::<InteractionMode>(), Ok(InteractionMode::None));
        assert_eq!("point".parse::<InteractionMode>(), Ok(InteractionMode::Point));
        assert_eq!("area".parse::<InteractionMode>(), Ok(InteractionMode::Area));
    }

    #[test]
    fn test_parse_rejects_everything_else() {
        for bad in ["---", "", "Point", "AREA", "points", " none", "line"] {
            let err = bad.parse::<InteractionMode>().unwrap_err();
            assert_eq!(err, InvalidModeError(bad.to_string()));
        }
    }

    #[test]
    fn test_error_message_names_the_value() {
        let err = "polygon".parse::<InteractionMode>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid mode: polygon");
    }

    #[test]
    fn test_selector_round_trip() {
        for mode in InteractionMode::ALL {
            assert_eq!(
                InteractionMode::from_selector_value(mode.selector_value()),
                Ok(mode)
            );
        }
        assert_eq!(InteractionMode::None.selector_value(), "---");
    }

    #[test]
    fn test_query_value_defaults_to_none() {
        assert_eq!(InteractionMode::from_query_value("area"), InteractionMode::Area);
        assert_eq!(InteractionMode::from_query_value("---"), InteractionMode::None);
        assert_eq!(InteractionMode::from_query_value("bogus"), InteractionMode::None);
        assert_eq!(InteractionMode::from_query_value(""), InteractionMode::None);
    }
}
