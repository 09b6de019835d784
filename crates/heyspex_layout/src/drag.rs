//! Pointer-drag resize sessions.
//!
//! A drag is two-phase: while the pointer moves, only an ephemeral visual
//! dimension is updated (read by the renderer every frame); the store commit
//! and the debounced persistence write happen once, on release. This keeps
//! 60fps feedback decoupled from state updates and storage writes.
//!
//! The session state machine is `idle → dragging → idle`, entered only by a
//! pointer-down on a handle and exited only by release (pointer-leave is
//! treated as release).

use std::time::{Duration, Instant};

/// Minimum interval between applied pointer moves (~60 Hz).
pub const DRAG_THROTTLE: Duration = Duration::from_millis(16);

/// Which resize handle a drag session belongs to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DragTarget {
    /// Left panel's right edge; dragging rightward increases width.
    LeftPanel,
    /// Right panel's left edge; dragging rightward decreases width.
    RightPanel,
    /// Zone-B top edge; dragging upward increases height.
    ZoneB,
}

/// Ephemeral drag flags, reset on release. Never persisted.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct DragState {
    pub is_dragging: bool,
    pub target: Option<DragTarget>,
}

/// An active drag between pointer-down and release.
pub(crate) struct DragSession {
    target: DragTarget,
    start_coord: i32,
    start_size: i32,
    /// Unclamped visual dimension; the engine clamps before storing it.
    visual: i32,
    last_coord: i32,
    last_applied: Option<Instant>,
}

impl DragSession {
    pub(crate) fn new(target: DragTarget, start_coord: i32, start_size: i32) -> Self {
        Self {
            target,
            start_coord,
            start_size,
            visual: start_size,
            last_coord: start_coord,
            last_applied: None,
        }
    }

    pub(crate) fn target(&self) -> DragTarget {
        self.target
    }

    pub(crate) fn visual(&self) -> i32 {
        self.visual
    }

    pub(crate) fn set_visual(&mut self, visual: i32) {
        self.visual = visual;
    }

    /// Apply a pointer move, returning the new raw dimension.
    ///
    /// Returns `None` when the move was skipped: duplicate coordinate, or
    /// faster than the 60 Hz throttle.
    pub(crate) fn update(&mut self, coord: i32, now: Instant) -> Option<i32> {
        if coord == self.last_coord {
            return None;
        }
        if let Some(last) = self.last_applied {
            if now.duration_since(last) < DRAG_THROTTLE {
                return None;
            }
        }
        self.last_coord = coord;
        self.last_applied = Some(now);

        let delta = coord - self.start_coord;
        let size = match self.target {
            // Right edge of the left panel moves with the pointer.
            DragTarget::LeftPanel => self.start_size + delta,
            // Left edge of the right panel: rightward shrinks.
            DragTarget::RightPanel => self.start_size - delta,
            // Top edge of Zone B: pointer-Y decreasing grows the band.
            DragTarget::ZoneB => self.start_size - delta,
        };
        Some(size)
    }
}
