//! Geometry constants and clamp helpers for workspace zones.
//!
//! All dimensions are logical pixels. Zone A is the three-column main region
//! (left panel / center / right panel); Zone B is the bottom console band.

/// Minimum side panel width.
pub const MIN_PANEL_WIDTH: i32 = 200;
/// Maximum side panel width (left panel; the right Zone-A panel is unbounded).
pub const MAX_PANEL_WIDTH: i32 = 500;
/// Default side panel width.
pub const DEFAULT_PANEL_WIDTH: i32 = 244;

/// Minimum Zone-B height.
pub const ZONE_B_MIN_HEIGHT: i32 = 40;
/// Default Zone-B height.
pub const DEFAULT_ZONE_B_HEIGHT: i32 = 200;
/// Push-mode Zone-B ceiling as a fraction of viewport height.
pub const ZONE_B_PUSH_RATIO: f32 = 0.5;

/// Right panel auto-collapse threshold as a fraction of viewport width.
pub const RIGHT_PANEL_COLLAPSE_RATIO: f32 = 0.2;

/// Default viewport dimensions used before the host reports real bounds.
pub const DEFAULT_VIEWPORT_WIDTH: i32 = 1280;
pub const DEFAULT_VIEWPORT_HEIGHT: i32 = 800;

/// Clamp a width into the bounded panel range `[MIN, MAX]`.
pub fn clamp_panel_width(width: i32) -> i32 {
    width.clamp(MIN_PANEL_WIDTH, MAX_PANEL_WIDTH)
}

/// Clamp a width to the panel minimum only (unbounded right Zone-A panel).
pub fn clamp_panel_width_min(width: i32) -> i32 {
    width.max(MIN_PANEL_WIDTH)
}

/// Maximum Zone-B height in push mode: half the viewport height.
pub fn push_max_height(viewport_height: i32) -> i32 {
    let max = (viewport_height.max(0) as f32 * ZONE_B_PUSH_RATIO) as i32;
    max.max(ZONE_B_MIN_HEIGHT)
}

/// Maximum Zone-B height in overlay mode: viewport minus the main
/// container's top offset.
pub fn overlay_max_height(viewport_height: i32, main_top: i32) -> i32 {
    let max = viewport_height.max(0) - main_top.max(0);
    max.max(ZONE_B_MIN_HEIGHT)
}

/// Width at or below which the right panel auto-collapses.
pub fn collapse_threshold(viewport_width: i32) -> i32 {
    (viewport_width.max(0) as f32 * RIGHT_PANEL_COLLAPSE_RATIO) as i32
}
