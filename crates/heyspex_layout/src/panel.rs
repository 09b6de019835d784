//! Side panel open/width state.
//!
//! One `SidePanel` exists per side of Zone A. The width invariant is
//! maintained at every mutation: the left panel is clamped into
//! `[MIN_PANEL_WIDTH, MAX_PANEL_WIDTH]`, the right Zone-A panel has a lower
//! bound only. `preferred_width` remembers the width to restore when the
//! panel reopens after a collapse.

use crate::geometry::{clamp_panel_width, clamp_panel_width_min, DEFAULT_PANEL_WIDTH};

/// Which side of Zone A a panel occupies.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PanelSide {
    Left,
    Right,
}

impl PanelSide {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Two-state left rail used when rail mode is enabled.
///
/// In rail mode the panel's own `is_open` stays `true` so width math is
/// uniform; only this flag toggles visually.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum RailState {
    #[default]
    Open,
    Collapsed,
}

impl RailState {
    pub fn toggled(self) -> Self {
        match self {
            Self::Open => Self::Collapsed,
            Self::Collapsed => Self::Open,
        }
    }

    /// Persisted string form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Collapsed => "collapsed",
        }
    }

    /// Parse a persisted string; unrecognized values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(Self::Open),
            "collapsed" => Some(Self::Collapsed),
            _ => None,
        }
    }
}

/// Snapshot of a panel's geometry state.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PanelState {
    /// Whether the panel is expanded.
    pub is_open: bool,
    /// Last-committed rendered width.
    pub width: i32,
    /// Width to restore when reopened after a collapse.
    pub preferred_width: i32,
}

impl Default for PanelState {
    fn default() -> Self {
        Self { is_open: true, width: DEFAULT_PANEL_WIDTH, preferred_width: DEFAULT_PANEL_WIDTH }
    }
}

/// A resizable, collapsible side panel.
pub struct SidePanel {
    side: PanelSide,
    state: PanelState,
    /// Whether the width has an upper bound. The right Zone-A panel does not.
    bounded: bool,
}

impl SidePanel {
    /// Create a panel with default state.
    pub fn new(side: PanelSide, bounded: bool) -> Self {
        Self { side, state: PanelState::default(), bounded }
    }

    pub fn side(&self) -> PanelSide {
        self.side
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open
    }

    pub fn width(&self) -> i32 {
        self.state.width
    }

    /// Clamp a width according to this panel's bounds.
    pub fn clamp(&self, width: i32) -> i32 {
        if self.bounded {
            clamp_panel_width(width)
        } else {
            clamp_panel_width_min(width)
        }
    }

    /// Flip open/closed. Returns the new open flag.
    ///
    /// Opening restores `width = preferred_width`; closing snapshots the
    /// current width into `preferred_width` first, so a manual resize
    /// performed while open is remembered.
    pub fn toggle(&mut self) -> bool {
        let open = !self.state.is_open;
        self.set_open(open);
        open
    }

    /// Idempotent explicit form of `toggle`.
    ///
    /// Returns `true` when the flag actually changed.
    pub fn set_open(&mut self, open: bool) -> bool {
        if open == self.state.is_open {
            return false;
        }
        if open {
            self.state.width = self.clamp(self.state.preferred_width);
        } else {
            self.state.preferred_width = self.state.width;
        }
        self.state.is_open = open;
        true
    }

    /// Set the rendered width, clamped to this panel's bounds.
    ///
    /// A width set while the panel is collapsed is discarded, not queued.
    /// Returns the applied width, or `None` when discarded.
    pub fn set_width(&mut self, width: i32) -> Option<i32> {
        if !self.state.is_open {
            return None;
        }
        let clamped = self.clamp(width);
        self.state.width = clamped;
        self.state.preferred_width = clamped;
        Some(clamped)
    }

    /// Resynchronize from persisted state without firing the open/close
    /// snapshot rules. Widths are still clamped.
    pub fn restore(&mut self, state: PanelState) {
        self.state = PanelState {
            is_open: state.is_open,
            width: self.clamp(state.width),
            preferred_width: self.clamp(state.preferred_width),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{MAX_PANEL_WIDTH, MIN_PANEL_WIDTH};

    #[test]
    fn test_width_clamp_invariant() {
        let mut panel = SidePanel::new(PanelSide::Left, true);
        for requested in [-50, 0, 199, 200, 244, 500, 501, 5000] {
            if let Some(applied) = panel.set_width(requested) {
                assert!((MIN_PANEL_WIDTH..=MAX_PANEL_WIDTH).contains(&applied));
                assert_eq!(panel.width(), applied);
            }
        }
    }

    #[test]
    fn test_right_panel_width_unbounded_above() {
        let mut panel = SidePanel::new(PanelSide::Right, false);
        assert_eq!(panel.set_width(900), Some(900));
        assert_eq!(panel.set_width(100), Some(MIN_PANEL_WIDTH));
    }

    #[test]
    fn test_open_close_round_trip_preserves_width() {
        let mut panel = SidePanel::new(PanelSide::Left, true);
        panel.set_width(350);
        panel.set_open(false);
        assert!(!panel.is_open());
        panel.set_open(true);
        assert_eq!(panel.width(), 350);
    }

    #[test]
    fn test_close_snapshots_manual_resize() {
        let mut panel = SidePanel::new(PanelSide::Left, true);
        panel.set_width(310);
        panel.toggle();
        assert_eq!(panel.state().preferred_width, 310);
    }

    #[test]
    fn test_width_while_closed_is_discarded() {
        let mut panel = SidePanel::new(PanelSide::Left, true);
        panel.set_open(false);
        assert_eq!(panel.set_width(400), None);
        panel.set_open(true);
        // The discarded width was not queued.
        assert_eq!(panel.width(), DEFAULT_PANEL_WIDTH);
    }

    #[test]
    fn test_set_open_is_idempotent() {
        let mut panel = SidePanel::new(PanelSide::Left, true);
        assert!(!panel.set_open(true));
        assert!(panel.set_open(false));
        assert!(!panel.set_open(false));
    }

    #[test]
    fn test_restore_clamps_out_of_range() {
        let mut panel = SidePanel::new(PanelSide::Left, true);
        panel.restore(PanelState { is_open: true, width: 10_000, preferred_width: 1 });
        assert_eq!(panel.width(), MAX_PANEL_WIDTH);
        assert_eq!(panel.state().preferred_width, MIN_PANEL_WIDTH);
    }

    #[test]
    fn test_rail_state_round_trip() {
        assert_eq!(RailState::Open.toggled(), RailState::Collapsed);
        assert_eq!(RailState::parse("collapsed"), Some(RailState::Collapsed));
        assert_eq!(RailState::parse("ajar"), None);
    }
}
