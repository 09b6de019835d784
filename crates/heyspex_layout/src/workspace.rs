//! Workspace layout engine - the single source of truth for zone geometry.
//!
//! `WorkspaceLayout` composes the side panel stores, the Zone-A mode cycle,
//! Zone-B state, and drag sessions, and owns their persistence. It is an
//! explicit owned object handed to whichever subsystem needs to read or
//! mutate layout - consumers receive it by reference, there are no ambient
//! globals.
//!
//! Persistence discipline: nothing is written until `hydrate` has loaded the
//! stored preferences once (setters called earlier still apply in memory);
//! after that, booleans and enums write synchronously while widths, heights,
//! and the center/bottom split are debounced to coalesce drag bursts.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use heyspex_core::services::debounce::DEFAULT_DEBOUNCE;
use heyspex_core::{AppState, Debouncer, PreferenceStore};
use serde_json::json;

use crate::command::LayoutCommand;
use crate::drag::{DragSession, DragState, DragTarget};
use crate::geometry::{
    collapse_threshold, overlay_max_height, DEFAULT_PANEL_WIDTH, DEFAULT_VIEWPORT_HEIGHT,
    DEFAULT_VIEWPORT_WIDTH, MAX_PANEL_WIDTH, MIN_PANEL_WIDTH, ZONE_B_MIN_HEIGHT,
};
use crate::mode::{ZoneAMode, ZoneBMode};
use crate::panel::{PanelSide, PanelState, RailState, SidePanel};
use crate::zone_b::{ZoneB, ZoneBState};

/// Persisted preference keys.
pub mod keys {
    pub const LEFT_OPEN: &str = "sidebar-left-open";
    pub const LEFT_WIDTH: &str = "sidebar-left-width";
    pub const LEFT_PREFERRED_WIDTH: &str = "sidebar-left-preferred-width";
    pub const RIGHT_OPEN: &str = "sidebar-right-open";
    pub const RIGHT_WIDTH: &str = "sidebar-right-width";
    pub const RIGHT_PREFERRED_WIDTH: &str = "sidebar-right-preferred-width";
    pub const LEFT_RAIL_STATE: &str = "ui:leftState";
    pub const ZONE_A_MODE: &str = "ui:workspaceZoneAMode";
    pub const ZONE_B_MODE: &str = "ui:workspaceZoneBMode";
    pub const ZONE_B_HEIGHT: &str = "ui:workspaceZoneBHeight";
    pub const ZONE_B_VISIBLE: &str = "ui:workspaceZoneBVisible";
    pub const ZONE_B_OVERLAY_POSITION: &str = "ui:workspaceZoneBOverlayPosition";
    pub const CENTER_BOTTOM_SPLIT: &str = "ui:centerBottomSplit";
    /// Superseded by `ZONE_A_MODE` but still written for backward compat.
    pub const MAIN_FULLSCREEN: &str = "ui:mainFullscreen";
}

/// Viewport geometry reported by the host window.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
    /// Top offset of the main container; bounds the overlay console height.
    pub main_top: i32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: DEFAULT_VIEWPORT_WIDTH, height: DEFAULT_VIEWPORT_HEIGHT, main_top: 0 }
    }
}

/// Events emitted by the layout engine, drained via
/// [`WorkspaceLayout::take_events`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LayoutEvent {
    PanelToggled { side: PanelSide, open: bool },
    PanelResized { side: PanelSide, width: i32 },
    RailToggled { state: RailState },
    ZoneAModeChanged { mode: ZoneAMode },
    ZoneBModeChanged { mode: ZoneBMode },
    ZoneBResized { height: i32 },
    ZoneBVisibilityChanged { visible: bool },
    ControlBarToggled { visible: bool },
    CenterBottomSplitChanged { split: i32 },
    DragStarted { target: DragTarget },
    DragEnded { target: DragTarget },
}

/// Engine construction options.
#[derive(Clone, Copy, Debug)]
pub struct LayoutConfig {
    /// Use the two-state left rail instead of the boolean open/closed panel.
    pub rail_mode: bool,
    /// Settle delay for debounced persistence writes.
    pub debounce: Duration,
    /// Initial viewport, replaced by the host's first real measurement.
    pub viewport: Viewport,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { rail_mode: false, debounce: DEFAULT_DEBOUNCE, viewport: Viewport::default() }
    }
}

/// Resolved zone geometry for the renderer (or the CLI) to consume.
///
/// During an active drag the dragged dimension comes from the ephemeral
/// visual override, not the committed store.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ComputedLayout {
    pub zone_a_visible: bool,
    pub left_width: i32,
    pub center_width: i32,
    pub right_width: i32,
    pub zone_b_visible: bool,
    pub zone_b_height: i32,
    pub zone_b_overlay: bool,
}

/// The workspace layout engine.
pub struct WorkspaceLayout {
    app: Arc<AppState>,
    rail_mode: bool,
    left: SidePanel,
    right: SidePanel,
    rail: RailState,
    zone_a_mode: ZoneAMode,
    zone_b: ZoneB,
    drag: Option<DragSession>,
    is_hydrated: bool,
    is_control_bar_visible: bool,
    center_bottom_split: i32,
    viewport: Viewport,
    events: VecDeque<LayoutEvent>,
    left_width_debounce: Debouncer,
    right_width_debounce: Debouncer,
    zone_b_height_debounce: Debouncer,
    split_debounce: Debouncer,
}

impl WorkspaceLayout {
    /// Create an engine with compiled-in defaults.
    ///
    /// Call [`hydrate`](Self::hydrate) afterwards to load persisted
    /// preferences; until then setters apply in memory only.
    pub fn new(app: Arc<AppState>, config: LayoutConfig) -> Self {
        let handle = app.runtime().handle().clone();
        Self {
            rail_mode: config.rail_mode,
            left: SidePanel::new(PanelSide::Left, true),
            right: SidePanel::new(PanelSide::Right, false),
            rail: RailState::default(),
            zone_a_mode: ZoneAMode::default(),
            zone_b: ZoneB::new(),
            drag: None,
            is_hydrated: false,
            is_control_bar_visible: true,
            center_bottom_split: 0,
            viewport: config.viewport,
            events: VecDeque::new(),
            left_width_debounce: Debouncer::new(handle.clone(), config.debounce),
            right_width_debounce: Debouncer::new(handle.clone(), config.debounce),
            zone_b_height_debounce: Debouncer::new(handle.clone(), config.debounce),
            split_debounce: Debouncer::new(handle, config.debounce),
            app,
        }
    }

    // ========== Accessors ==========

    pub fn left_panel(&self) -> PanelState {
        self.left.state()
    }

    pub fn right_panel(&self) -> PanelState {
        self.right.state()
    }

    pub fn rail(&self) -> RailState {
        self.rail
    }

    pub fn zone_a_mode(&self) -> ZoneAMode {
        self.zone_a_mode
    }

    pub fn zone_b(&self) -> ZoneBState {
        self.zone_b.state()
    }

    /// Zone B's displayed mode: overlay is forced while Zone A is hidden.
    pub fn effective_zone_b_mode(&self) -> ZoneBMode {
        self.zone_b.effective_mode(self.zone_a_mode == ZoneAMode::Hidden)
    }

    pub fn is_hydrated(&self) -> bool {
        self.is_hydrated
    }

    pub fn is_control_bar_visible(&self) -> bool {
        self.is_control_bar_visible
    }

    pub fn center_bottom_split(&self) -> i32 {
        self.center_bottom_split
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn drag_state(&self) -> DragState {
        match &self.drag {
            Some(session) => DragState { is_dragging: true, target: Some(session.target()) },
            None => DragState::default(),
        }
    }

    /// The ephemeral dimension the renderer should display for the dragged
    /// target instead of the committed store value.
    pub fn visual_override(&self) -> Option<(DragTarget, i32)> {
        self.drag.as_ref().map(|s| (s.target(), s.visual()))
    }

    /// Drain events emitted since the last call.
    pub fn take_events(&mut self) -> Vec<LayoutEvent> {
        self.events.drain(..).collect()
    }

    fn push_event(&mut self, event: LayoutEvent) {
        self.events.push_back(event);
    }

    // ========== Hydration ==========

    /// One-shot load of every persisted preference.
    ///
    /// Stored values are validated defensively: missing keys, unparsable
    /// values, and out-of-range numbers fall back to compiled-in defaults.
    /// Only after this completes are setters permitted to write back.
    pub fn hydrate(&mut self) {
        if self.is_hydrated {
            return;
        }
        let store = self.app.storage();

        self.left.restore(PanelState {
            is_open: store.get_bool_or(keys::LEFT_OPEN, true),
            width: read_bounded_width(store, keys::LEFT_WIDTH),
            preferred_width: read_bounded_width(store, keys::LEFT_PREFERRED_WIDTH),
        });
        self.right.restore(PanelState {
            is_open: store.get_bool_or(keys::RIGHT_OPEN, true),
            width: read_min_width(store, keys::RIGHT_WIDTH),
            preferred_width: read_min_width(store, keys::RIGHT_PREFERRED_WIDTH),
        });

        if self.rail_mode {
            let raw = store.get_str_or(keys::LEFT_RAIL_STATE, RailState::default().as_str());
            self.rail = RailState::parse(&raw).unwrap_or_default();
        }

        self.zone_a_mode = read_zone_a_mode(store);

        let mode_raw = store.get_str_or(keys::ZONE_B_MODE, ZoneBMode::default().as_str());
        let height = store.get_i64_or(keys::ZONE_B_HEIGHT, i64::from(self.zone_b.height()));
        let overlay_position = store.get_i64_or(keys::ZONE_B_OVERLAY_POSITION, 0);
        self.zone_b.restore(
            ZoneBState {
                mode: ZoneBMode::parse(&mode_raw).unwrap_or_default(),
                height: i32::try_from(height).unwrap_or(self.zone_b.height()),
                is_visible: store.get_bool_or(keys::ZONE_B_VISIBLE, false),
                overlay_position: i32::try_from(overlay_position).unwrap_or(0),
            },
            self.viewport.height,
            self.viewport.main_top,
        );

        let split = store.get_i64_or(keys::CENTER_BOTTOM_SPLIT, 0);
        self.center_bottom_split = i32::try_from(split).unwrap_or(0).max(0);

        self.is_hydrated = true;
        tracing::debug!("Workspace layout hydrated");
    }

    // ========== Left panel ==========

    /// Toggle the left panel (or the rail in rail mode).
    pub fn toggle_left_panel(&mut self) {
        if self.rail_mode {
            // The panel's own is_open stays true; only the rail flag toggles.
            self.rail = self.rail.toggled();
            self.persist_value(keys::LEFT_RAIL_STATE, json!(self.rail.as_str()));
            self.push_event(LayoutEvent::RailToggled { state: self.rail });
            return;
        }
        let open = !self.left.is_open();
        self.set_left_panel_open(open);
    }

    /// Explicit open/close form.
    pub fn set_left_panel_open(&mut self, open: bool) {
        if self.rail_mode {
            let rail = if open { RailState::Open } else { RailState::Collapsed };
            if rail != self.rail {
                self.rail = rail;
                self.persist_value(keys::LEFT_RAIL_STATE, json!(rail.as_str()));
                self.push_event(LayoutEvent::RailToggled { state: rail });
            }
            return;
        }
        if self.left.set_open(open) {
            self.persist_value(keys::LEFT_OPEN, json!(open));
            self.schedule_panel_persist(PanelSide::Left);
            self.push_event(LayoutEvent::PanelToggled { side: PanelSide::Left, open });
        }
    }

    /// Set the left panel width; discarded while the panel is collapsed.
    pub fn set_left_panel_width(&mut self, width: i32) {
        if let Some(applied) = self.left.set_width(width) {
            self.schedule_panel_persist(PanelSide::Left);
            self.push_event(LayoutEvent::PanelResized { side: PanelSide::Left, width: applied });
        }
    }

    // ========== Right panel ==========

    pub fn toggle_right_panel(&mut self) {
        let open = !self.right.is_open();
        self.set_right_panel_open(open);
    }

    pub fn set_right_panel_open(&mut self, open: bool) {
        if self.right.set_open(open) {
            self.persist_value(keys::RIGHT_OPEN, json!(open));
            self.schedule_panel_persist(PanelSide::Right);
            self.push_event(LayoutEvent::PanelToggled { side: PanelSide::Right, open });
        }
    }

    /// Set the right panel width, then re-evaluate the breakpoint so a drag
    /// crossing it collapses without waiting for a resize event.
    pub fn set_right_panel_width(&mut self, width: i32) {
        if let Some(applied) = self.right.set_width(width) {
            self.schedule_panel_persist(PanelSide::Right);
            self.push_event(LayoutEvent::PanelResized { side: PanelSide::Right, width: applied });
            self.auto_collapse_right_panel();
        }
    }

    /// Force the right panel closed once its width falls to or below the
    /// viewport-relative breakpoint.
    fn auto_collapse_right_panel(&mut self) {
        if self.right.is_open() && self.right.width() <= collapse_threshold(self.viewport.width) {
            tracing::debug!(
                width = self.right.width(),
                viewport_width = self.viewport.width,
                "Right panel crossed breakpoint, auto-collapsing"
            );
            self.set_right_panel_open(false);
        }
    }

    // ========== Viewport ==========

    /// Update viewport bounds from the host window.
    ///
    /// Nonpositive dimensions indicate a failed measurement and are ignored.
    pub fn set_viewport(&mut self, width: i32, height: i32) {
        if width <= 0 || height <= 0 {
            tracing::warn!(width, height, "Ignoring degenerate viewport measurement");
            return;
        }
        if (width, height) == (self.viewport.width, self.viewport.height) {
            return;
        }
        self.viewport.width = width;
        self.viewport.height = height;

        let before = self.zone_b.height();
        self.zone_b.reclamp(height, self.viewport.main_top);
        if self.zone_b.height() != before {
            self.schedule_zone_b_height_persist();
            self.push_event(LayoutEvent::ZoneBResized { height: self.zone_b.height() });
        }

        self.auto_collapse_right_panel();
    }

    /// Update the main container's measured top offset.
    pub fn set_main_content_top(&mut self, main_top: i32) {
        if main_top < 0 {
            tracing::warn!(main_top, "Negative main container offset, treating as zero");
        }
        self.viewport.main_top = main_top.max(0);
        self.zone_b.reclamp(self.viewport.height, self.viewport.main_top);
    }

    // ========== Zone A mode ==========

    /// Advance the mode cycle `normal → fullscreen → hidden → normal`.
    pub fn cycle_zone_a_mode(&mut self) {
        self.set_zone_a_mode(self.zone_a_mode.next());
    }

    /// Force a Zone-A mode, driving the Zone-B coupling on the hidden edges:
    /// entering hidden puts Zone B in overlay at full height (it becomes the
    /// sole visible content); leaving hidden restores push mode, clamping
    /// the height back under the push ceiling.
    pub fn set_zone_a_mode(&mut self, mode: ZoneAMode) {
        if mode == self.zone_a_mode {
            return;
        }
        let was_hidden = self.zone_a_mode == ZoneAMode::Hidden;
        self.zone_a_mode = mode;
        self.persist_value(keys::ZONE_A_MODE, json!(mode.as_str()));
        self.persist_value(keys::MAIN_FULLSCREEN, json!(mode == ZoneAMode::Fullscreen));
        self.push_event(LayoutEvent::ZoneAModeChanged { mode });

        if mode == ZoneAMode::Hidden {
            self.force_zone_b_overlay();
        } else if was_hidden {
            self.restore_zone_b_push();
        }
    }

    fn force_zone_b_overlay(&mut self) {
        let (vh, top) = (self.viewport.height, self.viewport.main_top);
        if self.zone_b.set_mode(ZoneBMode::Overlay, vh, top) {
            self.persist_value(keys::ZONE_B_MODE, json!(ZoneBMode::Overlay.as_str()));
            self.push_event(LayoutEvent::ZoneBModeChanged { mode: ZoneBMode::Overlay });
        }
        let before = self.zone_b.height();
        let height = self.zone_b.set_height(overlay_max_height(vh, top), vh, top);
        if height != before {
            self.schedule_zone_b_height_persist();
            self.push_event(LayoutEvent::ZoneBResized { height });
        }
        if self.zone_b.set_visible(true) {
            self.persist_value(keys::ZONE_B_VISIBLE, json!(true));
            self.push_event(LayoutEvent::ZoneBVisibilityChanged { visible: true });
        }
    }

    fn restore_zone_b_push(&mut self) {
        let (vh, top) = (self.viewport.height, self.viewport.main_top);
        let before = self.zone_b.height();
        if self.zone_b.set_mode(ZoneBMode::Push, vh, top) {
            self.persist_value(keys::ZONE_B_MODE, json!(ZoneBMode::Push.as_str()));
            self.push_event(LayoutEvent::ZoneBModeChanged { mode: ZoneBMode::Push });
        }
        if self.zone_b.height() != before {
            self.schedule_zone_b_height_persist();
            self.push_event(LayoutEvent::ZoneBResized { height: self.zone_b.height() });
        }
    }

    // ========== Zone B ==========

    /// Toggle console visibility, auto-enabling with a minimum height.
    pub fn toggle_zone_b(&mut self) {
        let visible = !self.zone_b.is_visible();
        if self.zone_b.set_visible(visible) {
            self.persist_value(keys::ZONE_B_VISIBLE, json!(visible));
            self.push_event(LayoutEvent::ZoneBVisibilityChanged { visible });
        }
    }

    pub fn set_zone_b_mode(&mut self, mode: ZoneBMode) {
        let (vh, top) = (self.viewport.height, self.viewport.main_top);
        let before = self.zone_b.height();
        if self.zone_b.set_mode(mode, vh, top) {
            self.persist_value(keys::ZONE_B_MODE, json!(mode.as_str()));
            self.push_event(LayoutEvent::ZoneBModeChanged { mode });
            if self.zone_b.height() != before {
                self.schedule_zone_b_height_persist();
                self.push_event(LayoutEvent::ZoneBResized { height: self.zone_b.height() });
            }
        }
    }

    pub fn set_zone_b_height(&mut self, height: i32) {
        let applied =
            self.zone_b.set_height(height, self.viewport.height, self.viewport.main_top);
        self.schedule_zone_b_height_persist();
        self.push_event(LayoutEvent::ZoneBResized { height: applied });
    }

    /// Binary height toggle between the minimum and the mode ceiling.
    pub fn toggle_zone_b_full(&mut self) {
        let height = self.zone_b.toggle_full(self.viewport.height, self.viewport.main_top);
        self.schedule_zone_b_height_persist();
        self.push_event(LayoutEvent::ZoneBResized { height });
    }

    pub fn set_zone_b_overlay_position(&mut self, position: i32) {
        self.zone_b.set_overlay_position(position);
        self.persist_value(keys::ZONE_B_OVERLAY_POSITION, json!(position));
    }

    // ========== Misc UI state ==========

    /// Control bar visibility is transient; it is not persisted.
    pub fn toggle_control_bar(&mut self) {
        self.is_control_bar_visible = !self.is_control_bar_visible;
        self.push_event(LayoutEvent::ControlBarToggled {
            visible: self.is_control_bar_visible,
        });
    }

    pub fn set_center_bottom_split(&mut self, split: i32) {
        let split = split.max(0);
        if split != self.center_bottom_split {
            self.center_bottom_split = split;
            self.schedule_split_persist();
            self.push_event(LayoutEvent::CenterBottomSplitChanged { split });
        }
    }

    // ========== Command dispatch ==========

    /// Apply a typed layout command.
    pub fn apply(&mut self, command: LayoutCommand) {
        match command {
            LayoutCommand::ToggleLeftPanel => self.toggle_left_panel(),
            LayoutCommand::OpenLeftPanel => self.set_left_panel_open(true),
            LayoutCommand::CloseLeftPanel => self.set_left_panel_open(false),
            LayoutCommand::SetLeftPanelWidth(w) => self.set_left_panel_width(w),
            LayoutCommand::ToggleRightPanel => self.toggle_right_panel(),
            LayoutCommand::OpenRightPanel => self.set_right_panel_open(true),
            LayoutCommand::CloseRightPanel => self.set_right_panel_open(false),
            LayoutCommand::SetRightPanelWidth(w) => self.set_right_panel_width(w),
            LayoutCommand::SetZoneAMode(mode) => self.set_zone_a_mode(mode),
            LayoutCommand::CycleZoneAMode => self.cycle_zone_a_mode(),
            LayoutCommand::ToggleZoneB => self.toggle_zone_b(),
            LayoutCommand::SetZoneBMode(mode) => self.set_zone_b_mode(mode),
            LayoutCommand::SetZoneBHeight(h) => self.set_zone_b_height(h),
            LayoutCommand::ToggleZoneBFull => self.toggle_zone_b_full(),
            LayoutCommand::SetZoneBOverlayPosition(p) => self.set_zone_b_overlay_position(p),
            LayoutCommand::ToggleControlBar => self.toggle_control_bar(),
            LayoutCommand::SetCenterBottomSplit(s) => self.set_center_bottom_split(s),
        }
    }

    // ========== Drag sessions ==========

    /// Begin a drag on a resize handle at the given pointer coordinate.
    ///
    /// A closed target is opened first so the drag has a dimension to grow.
    pub fn begin_drag(&mut self, target: DragTarget, start_coord: i32) {
        if self.drag.is_some() {
            tracing::debug!(?target, "Drag already in progress, ignoring");
            return;
        }
        let start_size = match target {
            DragTarget::LeftPanel => {
                if !self.left.is_open() || (self.rail_mode && self.rail == RailState::Collapsed) {
                    self.set_left_panel_open(true);
                }
                self.left.width()
            }
            DragTarget::RightPanel => {
                if !self.right.is_open() {
                    self.set_right_panel_open(true);
                }
                self.right.width()
            }
            DragTarget::ZoneB => {
                if !self.zone_b.is_visible() {
                    self.toggle_zone_b();
                }
                self.zone_b.height()
            }
        };
        self.drag = Some(DragSession::new(target, start_coord, start_size));
        self.push_event(LayoutEvent::DragStarted { target });
    }

    /// Apply a pointer move to the active drag.
    ///
    /// Updates only the visual override; the store is untouched until
    /// release. Returns the clamped visual dimension when the move applied.
    pub fn update_drag(&mut self, coord: i32) -> Option<i32> {
        self.update_drag_at(coord, Instant::now())
    }

    pub(crate) fn update_drag_at(&mut self, coord: i32, now: Instant) -> Option<i32> {
        let (vh, top) = (self.viewport.height, self.viewport.main_top);
        let session = self.drag.as_mut()?;
        let raw = session.update(coord, now)?;
        let clamped = match session.target() {
            DragTarget::LeftPanel => crate::geometry::clamp_panel_width(raw),
            DragTarget::RightPanel => crate::geometry::clamp_panel_width_min(raw),
            DragTarget::ZoneB => {
                raw.clamp(ZONE_B_MIN_HEIGHT, self.zone_b.max_height(vh, top))
            }
        };
        session.set_visual(clamped);
        Some(clamped)
    }

    /// Commit the drag: the final visual dimension lands in the store,
    /// triggering the debounced persistence write. Pointer-leave is handled
    /// identically to pointer-up.
    pub fn end_drag(&mut self) {
        let Some(session) = self.drag.take() else {
            return;
        };
        let target = session.target();
        let visual = session.visual();
        match target {
            DragTarget::LeftPanel => self.set_left_panel_width(visual),
            DragTarget::RightPanel => self.set_right_panel_width(visual),
            DragTarget::ZoneB => self.set_zone_b_height(visual),
        }
        self.push_event(LayoutEvent::DragEnded { target });
    }

    // ========== Layout composition ==========

    /// Resolve the current zone geometry for a renderer.
    pub fn computed_layout(&self) -> ComputedLayout {
        let override_for = |target: DragTarget, committed: i32| match self.visual_override() {
            Some((t, v)) if t == target => v,
            _ => committed,
        };

        let zone_b_height = override_for(DragTarget::ZoneB, self.zone_b.height());
        let zone_b_visible =
            self.zone_b.is_visible() || self.zone_a_mode == ZoneAMode::Hidden;
        let zone_b_overlay = self.effective_zone_b_mode() == ZoneBMode::Overlay;

        match self.zone_a_mode {
            ZoneAMode::Normal => {
                let left_visible =
                    self.left.is_open() && !(self.rail_mode && self.rail == RailState::Collapsed);
                let left_width = if left_visible {
                    override_for(DragTarget::LeftPanel, self.left.width())
                } else {
                    0
                };
                let right_width = if self.right.is_open() {
                    override_for(DragTarget::RightPanel, self.right.width())
                } else {
                    0
                };
                ComputedLayout {
                    zone_a_visible: true,
                    left_width,
                    center_width: (self.viewport.width - left_width - right_width).max(0),
                    right_width,
                    zone_b_visible,
                    zone_b_height: if zone_b_visible { zone_b_height } else { 0 },
                    zone_b_overlay,
                }
            }
            ZoneAMode::Fullscreen => ComputedLayout {
                zone_a_visible: true,
                left_width: 0,
                center_width: self.viewport.width,
                right_width: 0,
                zone_b_visible,
                zone_b_height: if zone_b_visible { zone_b_height } else { 0 },
                zone_b_overlay,
            },
            ZoneAMode::Hidden => ComputedLayout {
                zone_a_visible: false,
                left_width: 0,
                center_width: 0,
                right_width: 0,
                zone_b_visible: true,
                zone_b_height,
                zone_b_overlay: true,
            },
        }
    }

    // ========== Persistence plumbing ==========

    /// Synchronous write for booleans and enums. No-op before hydration.
    fn persist_value(&self, key: &str, value: serde_json::Value) {
        if !self.is_hydrated {
            return;
        }
        if let Err(e) = self.app.storage().set(key, &value) {
            tracing::warn!(key, error = %e, "Failed to persist layout preference");
        }
    }

    /// Debounced write of a panel's width pair.
    fn schedule_panel_persist(&self, side: PanelSide) {
        if !self.is_hydrated {
            return;
        }
        let (debouncer, state, width_key, preferred_key) = match side {
            PanelSide::Left => (
                &self.left_width_debounce,
                self.left.state(),
                keys::LEFT_WIDTH,
                keys::LEFT_PREFERRED_WIDTH,
            ),
            PanelSide::Right => (
                &self.right_width_debounce,
                self.right.state(),
                keys::RIGHT_WIDTH,
                keys::RIGHT_PREFERRED_WIDTH,
            ),
        };
        let app = Arc::clone(&self.app);
        debouncer.schedule(move || {
            write_or_warn(&app, width_key, json!(state.width));
            write_or_warn(&app, preferred_key, json!(state.preferred_width));
        });
    }

    fn schedule_zone_b_height_persist(&self) {
        if !self.is_hydrated {
            return;
        }
        let app = Arc::clone(&self.app);
        let height = self.zone_b.height();
        self.zone_b_height_debounce.schedule(move || {
            write_or_warn(&app, keys::ZONE_B_HEIGHT, json!(height));
        });
    }

    fn schedule_split_persist(&self) {
        if !self.is_hydrated {
            return;
        }
        let app = Arc::clone(&self.app);
        let split = self.center_bottom_split;
        self.split_debounce.schedule(move || {
            write_or_warn(&app, keys::CENTER_BOTTOM_SPLIT, json!(split));
        });
    }

    /// Cancel pending debounced writes and flush their values synchronously.
    /// Used at shutdown so the last drag of a session is never lost.
    pub fn flush(&self) {
        self.left_width_debounce.cancel();
        self.right_width_debounce.cancel();
        self.zone_b_height_debounce.cancel();
        self.split_debounce.cancel();

        if !self.is_hydrated {
            return;
        }
        let left = self.left.state();
        let right = self.right.state();
        self.persist_value(keys::LEFT_WIDTH, json!(left.width));
        self.persist_value(keys::LEFT_PREFERRED_WIDTH, json!(left.preferred_width));
        self.persist_value(keys::RIGHT_WIDTH, json!(right.width));
        self.persist_value(keys::RIGHT_PREFERRED_WIDTH, json!(right.preferred_width));
        self.persist_value(keys::ZONE_B_HEIGHT, json!(self.zone_b.height()));
        self.persist_value(keys::CENTER_BOTTOM_SPLIT, json!(self.center_bottom_split));
    }
}

fn write_or_warn(app: &AppState, key: &str, value: serde_json::Value) {
    if let Err(e) = app.storage().set(key, &value) {
        tracing::warn!(key, error = %e, "Failed to persist layout preference");
    }
}

fn read_bounded_width(store: &PreferenceStore, key: &str) -> i32 {
    let raw = store.get_i64_or(key, i64::from(DEFAULT_PANEL_WIDTH));
    match i32::try_from(raw) {
        Ok(w) if (MIN_PANEL_WIDTH..=MAX_PANEL_WIDTH).contains(&w) => w,
        _ => {
            if raw != i64::from(DEFAULT_PANEL_WIDTH) {
                tracing::warn!(key, value = raw, "Stored width out of range, using default");
            }
            DEFAULT_PANEL_WIDTH
        }
    }
}

fn read_min_width(store: &PreferenceStore, key: &str) -> i32 {
    let raw = store.get_i64_or(key, i64::from(DEFAULT_PANEL_WIDTH));
    match i32::try_from(raw) {
        Ok(w) if w >= MIN_PANEL_WIDTH => w,
        _ => {
            if raw != i64::from(DEFAULT_PANEL_WIDTH) {
                tracing::warn!(key, value = raw, "Stored width out of range, using default");
            }
            DEFAULT_PANEL_WIDTH
        }
    }
}

fn read_zone_a_mode(store: &PreferenceStore) -> ZoneAMode {
    match store.get(keys::ZONE_A_MODE) {
        Ok(Some(serde_json::Value::String(s))) => ZoneAMode::parse(&s).unwrap_or_default(),
        // Fall back to the legacy fullscreen flag when the mode key was
        // never written.
        Ok(None) => {
            if store.get_bool_or(keys::MAIN_FULLSCREEN, false) {
                ZoneAMode::Fullscreen
            } else {
                ZoneAMode::default()
            }
        }
        Ok(Some(other)) => {
            tracing::warn!(value = %other, "Stored zone mode is not a string, using default");
            ZoneAMode::default()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read zone mode, using default");
            ZoneAMode::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_engine() -> (WorkspaceLayout, tempfile::TempDir) {
        test_engine_with(LayoutConfig {
            debounce: Duration::from_millis(10),
            ..LayoutConfig::default()
        })
    }

    fn test_engine_with(config: LayoutConfig) -> (WorkspaceLayout, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = Arc::new(AppState::with_data_dir(dir.path().to_path_buf()).expect("app state"));
        let mut engine = WorkspaceLayout::new(app, config);
        engine.hydrate();
        (engine, dir)
    }

    #[test]
    fn test_hidden_forces_zone_b_overlay_and_back() {
        let (mut engine, _dir) = test_engine();
        engine.set_viewport(1280, 800);

        engine.set_zone_a_mode(ZoneAMode::Hidden);
        assert_eq!(engine.effective_zone_b_mode(), ZoneBMode::Overlay);
        assert_eq!(engine.zone_b().mode, ZoneBMode::Overlay);
        assert!(engine.zone_b().is_visible);
        // Full overlay height: viewport minus main top (0 here).
        assert_eq!(engine.zone_b().height, 800);

        engine.set_zone_a_mode(ZoneAMode::Normal);
        assert_eq!(engine.effective_zone_b_mode(), ZoneBMode::Push);
        // Height clamped back under the push ceiling.
        assert_eq!(engine.zone_b().height, 400);
    }

    #[test]
    fn test_cycle_emits_mode_changes_in_order() {
        let (mut engine, _dir) = test_engine();
        engine.take_events();

        engine.cycle_zone_a_mode();
        engine.cycle_zone_a_mode();
        engine.cycle_zone_a_mode();

        let modes: Vec<ZoneAMode> = engine
            .take_events()
            .into_iter()
            .filter_map(|e| match e {
                LayoutEvent::ZoneAModeChanged { mode } => Some(mode),
                _ => None,
            })
            .collect();
        assert_eq!(modes, vec![ZoneAMode::Fullscreen, ZoneAMode::Hidden, ZoneAMode::Normal]);
    }

    #[test]
    fn test_breakpoint_auto_collapse() {
        let (mut engine, _dir) = test_engine();
        engine.set_viewport(1000, 800);

        // 150 clamps to the 200 minimum, which sits exactly on the 20%
        // threshold: the panel must collapse.
        engine.set_right_panel_width(150);
        assert!(!engine.right_panel().is_open);

        engine.set_right_panel_open(true);
        engine.set_right_panel_width(250);
        assert!(engine.right_panel().is_open);
    }

    #[test]
    fn test_viewport_resize_reevaluates_breakpoint() {
        let (mut engine, _dir) = test_engine();
        engine.set_viewport(1000, 800);
        engine.set_right_panel_width(250);
        assert!(engine.right_panel().is_open);

        // 250 <= 20% of 2000: the panel is now proportionally tiny.
        engine.set_viewport(2000, 800);
        assert!(!engine.right_panel().is_open);
    }

    #[test]
    fn test_hydration_gates_persistence() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = Arc::new(AppState::with_data_dir(dir.path().to_path_buf()).expect("app state"));
        let mut engine = WorkspaceLayout::new(Arc::clone(&app), LayoutConfig::default());

        // Setter before hydration: applies in memory, writes nothing.
        engine.toggle_left_panel();
        assert!(!engine.left_panel().is_open);
        assert_eq!(app.storage().get(keys::LEFT_OPEN).unwrap(), None);

        engine.hydrate();
        // The pre-hydration toggle was never persisted, so hydration
        // restores the stored default (open).
        assert!(engine.left_panel().is_open);

        engine.toggle_left_panel();
        assert_eq!(
            app.storage().get(keys::LEFT_OPEN).unwrap(),
            Some(serde_json::json!(false))
        );
    }

    #[test]
    fn test_corrupt_stored_width_hydrates_to_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = Arc::new(AppState::with_data_dir(dir.path().to_path_buf()).expect("app state"));
        app.storage().set(keys::LEFT_WIDTH, &serde_json::json!("not-a-number")).unwrap();
        app.storage().set(keys::RIGHT_WIDTH, &serde_json::json!(7)).unwrap();

        let mut engine = WorkspaceLayout::new(app, LayoutConfig::default());
        engine.hydrate();
        assert_eq!(engine.left_panel().width, DEFAULT_PANEL_WIDTH);
        assert_eq!(engine.right_panel().width, DEFAULT_PANEL_WIDTH);
    }

    #[test]
    fn test_legacy_fullscreen_flag_fallback() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = Arc::new(AppState::with_data_dir(dir.path().to_path_buf()).expect("app state"));
        app.storage().set(keys::MAIN_FULLSCREEN, &serde_json::json!(true)).unwrap();

        let mut engine = WorkspaceLayout::new(app, LayoutConfig::default());
        engine.hydrate();
        assert_eq!(engine.zone_a_mode(), ZoneAMode::Fullscreen);
    }

    #[test]
    fn test_legacy_fullscreen_flag_tracks_mode() {
        let (mut engine, _dir) = test_engine();

        engine.set_zone_a_mode(ZoneAMode::Fullscreen);
        assert!(engine.app.storage().get_bool_or(keys::MAIN_FULLSCREEN, false));

        // Any transition away from fullscreen writes the flag back to false.
        engine.cycle_zone_a_mode();
        assert_eq!(engine.zone_a_mode(), ZoneAMode::Hidden);
        assert!(!engine.app.storage().get_bool_or(keys::MAIN_FULLSCREEN, true));
    }

    #[test]
    fn test_entering_hidden_at_overlay_ceiling_emits_no_resize() {
        let (mut engine, _dir) = test_engine();
        engine.set_viewport(1280, 800);
        engine.set_zone_b_mode(ZoneBMode::Overlay);
        engine.set_zone_b_height(10_000);
        engine.toggle_zone_b();
        engine.take_events();

        // Zone B is already overlay, visible, and at the ceiling: entering
        // hidden must not re-emit mode, resize, or visibility events.
        engine.set_zone_a_mode(ZoneAMode::Hidden);
        assert_eq!(
            engine.take_events(),
            vec![LayoutEvent::ZoneAModeChanged { mode: ZoneAMode::Hidden }]
        );
    }

    #[test]
    fn test_drag_commit_scenario() {
        let (mut engine, _dir) = test_engine();
        let base = Instant::now();

        engine.begin_drag(DragTarget::LeftPanel, 100);
        assert!(engine.drag_state().is_dragging);

        let visual = engine.update_drag_at(150, base + Duration::from_millis(20));
        assert_eq!(visual, Some(294));
        assert_eq!(engine.visual_override(), Some((DragTarget::LeftPanel, 294)));
        // Store untouched until release.
        assert_eq!(engine.left_panel().width, DEFAULT_PANEL_WIDTH);

        engine.end_drag();
        assert!(!engine.drag_state().is_dragging);
        assert_eq!(engine.left_panel().width, 294);
    }

    #[test]
    fn test_drag_commit_schedules_debounced_write() {
        let (mut engine, _dir) = test_engine();
        let base = Instant::now();

        engine.begin_drag(DragTarget::LeftPanel, 100);
        engine.update_drag_at(150, base + Duration::from_millis(20));
        engine.end_drag();

        std::thread::sleep(Duration::from_millis(200));
        assert_eq!(
            engine.app.storage().get_i64_or(keys::LEFT_WIDTH, 0),
            294,
            "debounced write should land after the settle delay"
        );
    }

    #[test]
    fn test_drag_on_closed_panel_opens_it_first() {
        let (mut engine, _dir) = test_engine();
        engine.set_left_panel_open(false);

        engine.begin_drag(DragTarget::LeftPanel, 100);
        assert!(engine.left_panel().is_open);
        engine.end_drag();
    }

    #[test]
    fn test_drag_visual_clamped_to_bounds() {
        let (mut engine, _dir) = test_engine();
        let base = Instant::now();

        engine.begin_drag(DragTarget::LeftPanel, 100);
        let visual = engine.update_drag_at(900, base + Duration::from_millis(20));
        assert_eq!(visual, Some(MAX_PANEL_WIDTH));
    }

    #[test]
    fn test_flush_writes_pending_dimensions() {
        let (mut engine, _dir) = test_engine_with(LayoutConfig {
            // Long enough that the debounce cannot fire on its own.
            debounce: Duration::from_secs(60),
            ..LayoutConfig::default()
        });

        engine.set_left_panel_width(333);
        engine.flush();
        assert_eq!(engine.app.storage().get_i64_or(keys::LEFT_WIDTH, 0), 333);
    }

    #[test]
    fn test_rail_mode_keeps_panel_open() {
        let (mut engine, _dir) = test_engine_with(LayoutConfig {
            rail_mode: true,
            debounce: Duration::from_millis(10),
            ..LayoutConfig::default()
        });

        engine.toggle_left_panel();
        assert_eq!(engine.rail(), RailState::Collapsed);
        // Width math stays uniform: the panel itself never closes.
        assert!(engine.left_panel().is_open);
        assert_eq!(
            engine.app.storage().get_str_or(keys::LEFT_RAIL_STATE, "open"),
            "collapsed"
        );
    }

    #[test]
    fn test_apply_dispatches_commands() {
        let (mut engine, _dir) = test_engine();
        engine.set_viewport(1280, 800);

        engine.apply(LayoutCommand::SetLeftPanelWidth(321));
        assert_eq!(engine.left_panel().width, 321);

        engine.apply(LayoutCommand::CycleZoneAMode);
        assert_eq!(engine.zone_a_mode(), ZoneAMode::Fullscreen);

        engine.apply(LayoutCommand::ToggleZoneB);
        assert!(engine.zone_b().is_visible);

        engine.apply(LayoutCommand::ToggleZoneBFull);
        assert_eq!(engine.zone_b().height, 400);
    }

    #[test]
    fn test_computed_layout_normal_and_hidden() {
        let (mut engine, _dir) = test_engine();
        engine.set_viewport(1280, 800);

        let layout = engine.computed_layout();
        assert!(layout.zone_a_visible);
        assert_eq!(layout.left_width, DEFAULT_PANEL_WIDTH);
        assert_eq!(layout.center_width, 1280 - 2 * DEFAULT_PANEL_WIDTH);

        engine.set_zone_a_mode(ZoneAMode::Hidden);
        let layout = engine.computed_layout();
        assert!(!layout.zone_a_visible);
        assert!(layout.zone_b_overlay);
        assert_eq!(layout.zone_b_height, 800);
    }

    #[test]
    fn test_computed_layout_reads_visual_override_during_drag() {
        let (mut engine, _dir) = test_engine();
        engine.set_viewport(1280, 800);
        let base = Instant::now();

        engine.begin_drag(DragTarget::LeftPanel, 100);
        engine.update_drag_at(160, base + Duration::from_millis(20));

        let layout = engine.computed_layout();
        assert_eq!(layout.left_width, 304);
        // Committed state still shows the pre-drag width.
        assert_eq!(engine.left_panel().width, DEFAULT_PANEL_WIDTH);
        engine.end_drag();
    }

    #[test]
    fn test_persisted_layout_round_trips_across_instances() {
        let dir = tempfile::tempdir().expect("tempdir");
        {
            let app =
                Arc::new(AppState::with_data_dir(dir.path().to_path_buf()).expect("app state"));
            let mut engine = WorkspaceLayout::new(app, LayoutConfig::default());
            engine.hydrate();
            engine.set_left_panel_width(387);
            engine.set_zone_a_mode(ZoneAMode::Fullscreen);
            engine.flush();
        }

        let app = Arc::new(AppState::with_data_dir(dir.path().to_path_buf()).expect("app state"));
        let mut engine = WorkspaceLayout::new(app, LayoutConfig::default());
        engine.hydrate();
        assert_eq!(engine.left_panel().width, 387);
        assert_eq!(engine.zone_a_mode(), ZoneAMode::Fullscreen);
    }
}
