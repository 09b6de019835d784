//! Zone view modes and their transition tables.
//!
//! Zone A cycles through a total, guard-free three-state loop; every state
//! has exactly one successor, so the cycle cannot deadlock. The table is an
//! exhaustive match rather than a runtime-configured machine — the domain
//! only ever needs this one finite cycle.

use serde::{Deserialize, Serialize};

/// View mode of the three-column Zone-A region.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneAMode {
    /// Three-column workspace layout.
    #[default]
    Normal,
    /// Center content fills the viewport; side panels are hidden.
    Fullscreen,
    /// Zone A is hidden entirely; Zone B becomes the sole visible content.
    Hidden,
}

impl ZoneAMode {
    /// Advance one step along the cycle `normal → fullscreen → hidden → normal`.
    pub fn next(self) -> Self {
        match self {
            Self::Normal => Self::Fullscreen,
            Self::Fullscreen => Self::Hidden,
            Self::Hidden => Self::Normal,
        }
    }

    /// Persisted string form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Fullscreen => "fullscreen",
            Self::Hidden => "hidden",
        }
    }

    /// Parse a persisted string; unrecognized values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "normal" => Some(Self::Normal),
            "fullscreen" => Some(Self::Fullscreen),
            "hidden" => Some(Self::Hidden),
            _ => None,
        }
    }
}

/// Display mode of the bottom Zone-B console band.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneBMode {
    /// Reserves layout space, shrinking the center content.
    #[default]
    Push,
    /// Floats above the content without reserving space.
    Overlay,
}

impl ZoneBMode {
    /// Persisted string form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Overlay => "overlay",
        }
    }

    /// Parse a persisted string; unrecognized values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "push" => Some(Self::Push),
            "overlay" => Some(Self::Overlay),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_is_total_and_order_preserving() {
        // Starting from hidden, three cycles visit normal, fullscreen, hidden.
        let mut mode = ZoneAMode::Hidden;
        let seen: Vec<ZoneAMode> = (0..3)
            .map(|_| {
                mode = mode.next();
                mode
            })
            .collect();
        assert_eq!(seen, vec![ZoneAMode::Normal, ZoneAMode::Fullscreen, ZoneAMode::Hidden]);

        // Period 3: a fourth step repeats the sequence.
        assert_eq!(mode.next(), ZoneAMode::Normal);
    }

    #[test]
    fn test_mode_string_round_trip() {
        for mode in [ZoneAMode::Normal, ZoneAMode::Fullscreen, ZoneAMode::Hidden] {
            assert_eq!(ZoneAMode::parse(mode.as_str()), Some(mode));
        }
        for mode in [ZoneBMode::Push, ZoneBMode::Overlay] {
            assert_eq!(ZoneBMode::parse(mode.as_str()), Some(mode));
        }
        assert_eq!(ZoneAMode::parse("sideways"), None);
        assert_eq!(ZoneBMode::parse(""), None);
    }

    #[test]
    fn test_serde_uses_lowercase_strings() {
        assert_eq!(serde_json::to_value(ZoneAMode::Fullscreen).unwrap(), "fullscreen");
        assert_eq!(serde_json::to_value(ZoneBMode::Overlay).unwrap(), "overlay");
    }
}
