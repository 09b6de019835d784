//! Zone-B (bottom console) geometry and mode state.
//!
//! The height ceiling depends on the display mode: push mode may take at
//! most half the viewport, overlay mode may reach from the main container's
//! top offset to the bottom. Switching push → overlay is free; switching
//! overlay → push clamps the height down to the push ceiling.

use crate::geometry::{
    overlay_max_height, push_max_height, DEFAULT_ZONE_B_HEIGHT, ZONE_B_MIN_HEIGHT,
};
use crate::mode::ZoneBMode;

/// Snapshot of Zone-B state.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ZoneBState {
    /// Stored display mode. The *effective* mode may differ while Zone A is
    /// hidden; see [`ZoneB::effective_mode`].
    pub mode: ZoneBMode,
    /// Current height.
    pub height: i32,
    /// Whether the console is shown at all.
    pub is_visible: bool,
    /// Horizontal offset of the floating overlay.
    pub overlay_position: i32,
}

impl Default for ZoneBState {
    fn default() -> Self {
        Self {
            mode: ZoneBMode::Push,
            height: DEFAULT_ZONE_B_HEIGHT,
            is_visible: false,
            overlay_position: 0,
        }
    }
}

/// The bottom console zone.
pub struct ZoneB {
    state: ZoneBState,
}

impl ZoneB {
    pub fn new() -> Self {
        Self { state: ZoneBState::default() }
    }

    pub fn state(&self) -> ZoneBState {
        self.state
    }

    pub fn mode(&self) -> ZoneBMode {
        self.state.mode
    }

    pub fn height(&self) -> i32 {
        self.state.height
    }

    pub fn is_visible(&self) -> bool {
        self.state.is_visible
    }

    /// Mode-dependent height ceiling.
    pub fn max_height(&self, viewport_height: i32, main_top: i32) -> i32 {
        Self::max_height_for(self.state.mode, viewport_height, main_top)
    }

    fn max_height_for(mode: ZoneBMode, viewport_height: i32, main_top: i32) -> i32 {
        match mode {
            ZoneBMode::Push => push_max_height(viewport_height),
            ZoneBMode::Overlay => overlay_max_height(viewport_height, main_top),
        }
    }

    /// The mode actually displayed: overlay is forced while Zone A is hidden,
    /// regardless of the stored mode.
    pub fn effective_mode(&self, zone_a_hidden: bool) -> ZoneBMode {
        if zone_a_hidden {
            ZoneBMode::Overlay
        } else {
            self.state.mode
        }
    }

    /// Switch display mode. Returns `true` when the mode changed.
    ///
    /// Overlay → push clamps the height down if it exceeds the push ceiling.
    pub fn set_mode(&mut self, mode: ZoneBMode, viewport_height: i32, main_top: i32) -> bool {
        if mode == self.state.mode {
            return false;
        }
        self.state.mode = mode;
        let max = self.max_height(viewport_height, main_top);
        if self.state.height > max {
            self.state.height = max;
        }
        true
    }

    /// Set the height, clamped into `[ZONE_B_MIN_HEIGHT, max_height]`.
    /// Returns the applied height.
    pub fn set_height(&mut self, height: i32, viewport_height: i32, main_top: i32) -> i32 {
        let max = self.max_height(viewport_height, main_top);
        let clamped = height.clamp(ZONE_B_MIN_HEIGHT, max);
        self.state.height = clamped;
        clamped
    }

    /// Re-apply the height invariant after a viewport change.
    pub fn reclamp(&mut self, viewport_height: i32, main_top: i32) {
        let height = self.state.height;
        self.set_height(height, viewport_height, main_top);
    }

    /// Show or hide the console. Enabling guarantees at least the minimum
    /// height. Returns `true` when the flag changed.
    pub fn set_visible(&mut self, visible: bool) -> bool {
        if visible == self.state.is_visible {
            return false;
        }
        self.state.is_visible = visible;
        if visible && self.state.height < ZONE_B_MIN_HEIGHT {
            self.state.height = ZONE_B_MIN_HEIGHT;
        }
        true
    }

    /// Whether the console is at its mode-appropriate ceiling, with a
    /// one-pixel tolerance for rounding.
    pub fn is_full(&self, viewport_height: i32, main_top: i32) -> bool {
        self.state.height >= self.max_height(viewport_height, main_top) - 1
    }

    /// Binary height toggle between the minimum and the mode-appropriate
    /// ceiling. Returns the new height.
    pub fn toggle_full(&mut self, viewport_height: i32, main_top: i32) -> i32 {
        let target = if self.is_full(viewport_height, main_top) {
            ZONE_B_MIN_HEIGHT
        } else {
            self.max_height(viewport_height, main_top)
        };
        self.set_height(target, viewport_height, main_top)
    }

    /// Set the floating overlay's horizontal position.
    pub fn set_overlay_position(&mut self, position: i32) {
        self.state.overlay_position = position;
    }

    /// Resynchronize from persisted state. Heights are re-clamped against
    /// the stored mode's ceiling.
    pub fn restore(&mut self, state: ZoneBState, viewport_height: i32, main_top: i32) {
        self.state = state;
        self.reclamp(viewport_height, main_top);
    }
}

impl Default for ZoneB {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT_H: i32 = 800;
    const MAIN_TOP: i32 = 56;

    #[test]
    fn test_height_clamped_to_push_ceiling() {
        let mut zone = ZoneB::new();
        assert_eq!(zone.set_height(10_000, VIEWPORT_H, MAIN_TOP), 400);
        assert_eq!(zone.set_height(0, VIEWPORT_H, MAIN_TOP), ZONE_B_MIN_HEIGHT);
    }

    #[test]
    fn test_overlay_ceiling_is_taller() {
        let mut zone = ZoneB::new();
        zone.set_mode(ZoneBMode::Overlay, VIEWPORT_H, MAIN_TOP);
        assert_eq!(zone.set_height(10_000, VIEWPORT_H, MAIN_TOP), 744);
    }

    #[test]
    fn test_overlay_to_push_clamps_down() {
        let mut zone = ZoneB::new();
        zone.set_mode(ZoneBMode::Overlay, VIEWPORT_H, MAIN_TOP);
        zone.set_height(700, VIEWPORT_H, MAIN_TOP);

        assert!(zone.set_mode(ZoneBMode::Push, VIEWPORT_H, MAIN_TOP));
        assert_eq!(zone.height(), 400);
    }

    #[test]
    fn test_push_to_overlay_keeps_height() {
        let mut zone = ZoneB::new();
        zone.set_height(300, VIEWPORT_H, MAIN_TOP);
        zone.set_mode(ZoneBMode::Overlay, VIEWPORT_H, MAIN_TOP);
        assert_eq!(zone.height(), 300);
    }

    #[test]
    fn test_effective_mode_forced_overlay_when_zone_a_hidden() {
        let zone = ZoneB::new();
        assert_eq!(zone.mode(), ZoneBMode::Push);
        assert_eq!(zone.effective_mode(true), ZoneBMode::Overlay);
        assert_eq!(zone.effective_mode(false), ZoneBMode::Push);
    }

    #[test]
    fn test_toggle_full_with_one_pixel_tolerance() {
        let mut zone = ZoneB::new();
        // 399 counts as full against a 400 ceiling.
        zone.set_height(399, VIEWPORT_H, MAIN_TOP);
        assert!(zone.is_full(VIEWPORT_H, MAIN_TOP));
        assert_eq!(zone.toggle_full(VIEWPORT_H, MAIN_TOP), ZONE_B_MIN_HEIGHT);
        assert_eq!(zone.toggle_full(VIEWPORT_H, MAIN_TOP), 400);
    }

    #[test]
    fn test_enable_guarantees_minimum_height() {
        let mut zone = ZoneB::new();
        zone.state.height = 0;
        assert!(zone.set_visible(true));
        assert_eq!(zone.height(), ZONE_B_MIN_HEIGHT);
        assert!(!zone.set_visible(true));
    }

    #[test]
    fn test_restore_reclamps() {
        let mut zone = ZoneB::new();
        zone.restore(
            ZoneBState {
                mode: ZoneBMode::Push,
                height: 5_000,
                is_visible: true,
                overlay_position: 12,
            },
            VIEWPORT_H,
            MAIN_TOP,
        );
        assert_eq!(zone.height(), 400);
        assert_eq!(zone.state().overlay_position, 12);
    }
}
