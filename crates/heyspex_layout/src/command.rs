//! Typed layout commands.
//!
//! This is the seam through which a command palette or keyboard shortcut
//! layer drives the workspace without importing engine internals: an enum of
//! commands plus an explicit dispatcher (`WorkspaceLayout::apply`). The
//! string form exists for external callers (CLI, palette); an unrecognized
//! action string parses to `None` and is silently ignored by design.

use crate::mode::{ZoneAMode, ZoneBMode};

/// Commands accepted by the workspace layout engine.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LayoutCommand {
    ToggleLeftPanel,
    OpenLeftPanel,
    CloseLeftPanel,
    SetLeftPanelWidth(i32),
    ToggleRightPanel,
    OpenRightPanel,
    CloseRightPanel,
    SetRightPanelWidth(i32),
    SetZoneAMode(ZoneAMode),
    CycleZoneAMode,
    ToggleZoneB,
    SetZoneBMode(ZoneBMode),
    SetZoneBHeight(i32),
    ToggleZoneBFull,
    SetZoneBOverlayPosition(i32),
    ToggleControlBar,
    SetCenterBottomSplit(i32),
}

impl LayoutCommand {
    /// Parse an action string with an optional argument.
    ///
    /// Unknown actions and malformed arguments yield `None`; the caller is
    /// expected to drop them without raising an error.
    pub fn parse(action: &str, arg: Option<&str>) -> Option<Self> {
        let int_arg = || arg.and_then(|a| a.parse::<i32>().ok());

        let cmd = match action {
            "toggle-left-panel" => Some(Self::ToggleLeftPanel),
            "open-left-panel" => Some(Self::OpenLeftPanel),
            "close-left-panel" => Some(Self::CloseLeftPanel),
            "set-left-panel-width" => int_arg().map(Self::SetLeftPanelWidth),
            "toggle-right-panel" => Some(Self::ToggleRightPanel),
            "open-right-panel" => Some(Self::OpenRightPanel),
            "close-right-panel" => Some(Self::CloseRightPanel),
            "set-right-panel-width" => int_arg().map(Self::SetRightPanelWidth),
            "set-zone-a-mode" => arg.and_then(ZoneAMode::parse).map(Self::SetZoneAMode),
            "cycle-zone-a-mode" => Some(Self::CycleZoneAMode),
            "toggle-zone-b" => Some(Self::ToggleZoneB),
            "set-zone-b-mode" => arg.and_then(ZoneBMode::parse).map(Self::SetZoneBMode),
            "set-zone-b-height" => int_arg().map(Self::SetZoneBHeight),
            "toggle-zone-b-full" => Some(Self::ToggleZoneBFull),
            "set-zone-b-overlay-position" => int_arg().map(Self::SetZoneBOverlayPosition),
            "toggle-control-bar" => Some(Self::ToggleControlBar),
            "set-center-bottom-split" => int_arg().map(Self::SetCenterBottomSplit),
            _ => None,
        };

        if cmd.is_none() {
            tracing::debug!(action, "Ignoring unknown layout command");
        }
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_actions() {
        assert_eq!(
            LayoutCommand::parse("toggle-left-panel", None),
            Some(LayoutCommand::ToggleLeftPanel)
        );
        assert_eq!(
            LayoutCommand::parse("cycle-zone-a-mode", None),
            Some(LayoutCommand::CycleZoneAMode)
        );
    }

    #[test]
    fn test_parse_actions_with_arguments() {
        assert_eq!(
            LayoutCommand::parse("set-left-panel-width", Some("320")),
            Some(LayoutCommand::SetLeftPanelWidth(320))
        );
        assert_eq!(
            LayoutCommand::parse("set-zone-a-mode", Some("hidden")),
            Some(LayoutCommand::SetZoneAMode(ZoneAMode::Hidden))
        );
        assert_eq!(
            LayoutCommand::parse("set-zone-b-mode", Some("overlay")),
            Some(LayoutCommand::SetZoneBMode(ZoneBMode::Overlay))
        );
    }

    #[test]
    fn test_unknown_action_is_ignored() {
        assert_eq!(LayoutCommand::parse("explode-workspace", None), None);
    }

    #[test]
    fn test_malformed_argument_is_ignored() {
        assert_eq!(LayoutCommand::parse("set-left-panel-width", Some("wide")), None);
        assert_eq!(LayoutCommand::parse("set-left-panel-width", None), None);
        assert_eq!(LayoutCommand::parse("set-zone-a-mode", Some("sideways")), None);
    }
}
