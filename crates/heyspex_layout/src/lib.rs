//! Workspace layout engine: zone geometry, panel visibility, view modes,
//! drag-resize sessions, and hydration-safe persistence.

pub mod command;
pub mod drag;
pub mod geometry;
pub mod keymap;
pub mod mode;
pub mod panel;
pub mod workspace;
pub mod zone_b;

pub use command::LayoutCommand;
pub use drag::{DragState, DragTarget};
pub use keymap::{Keymap, Keystroke};
pub use mode::{ZoneAMode, ZoneBMode};
pub use panel::{PanelSide, PanelState, RailState, SidePanel};
pub use workspace::{ComputedLayout, LayoutConfig, LayoutEvent, Viewport, WorkspaceLayout};
pub use zone_b::{ZoneB, ZoneBState};
