//! Global keyboard chord table for layout commands.
//!
//! The engine defines only the chord → command mapping; capture-phase
//! registration and the "not inside a text input" rule are the host's job.
//! Chords are written in the usual `"ctrl-shift-5"` notation. `ctrl` and
//! `cmd` are both accepted as the primary modifier so one table serves
//! macOS and everything else.

use crate::command::LayoutCommand;

/// A normalized keystroke: primary modifier (ctrl or cmd), shift, and key.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Keystroke {
    pub primary: bool,
    pub shift: bool,
    pub key: String,
}

impl Keystroke {
    pub fn new(primary: bool, shift: bool, key: impl Into<String>) -> Self {
        Self { primary, shift, key: key.into() }
    }

    /// Parse a chord string such as `"ctrl-shift-5"` or `"cmd-numpad2"`.
    ///
    /// The last segment is the key; everything before it must be a modifier.
    pub fn parse(chord: &str) -> Option<Self> {
        let mut primary = false;
        let mut shift = false;
        let mut key = None;

        let mut segments = chord.split('-').peekable();
        while let Some(segment) = segments.next() {
            let is_last = segments.peek().is_none();
            match segment {
                "ctrl" | "cmd" if !is_last => primary = true,
                "shift" if !is_last => shift = true,
                _ if is_last && !segment.is_empty() => key = Some(segment.to_string()),
                _ => return None,
            }
        }

        key.map(|key| Self { primary, shift, key })
    }
}

/// Chord → command table.
pub struct Keymap {
    bindings: Vec<(Keystroke, LayoutCommand)>,
}

impl Keymap {
    /// The reserved global chords.
    pub fn new() -> Self {
        let table = [
            ("ctrl-shift-5", LayoutCommand::CycleZoneAMode),
            ("ctrl-numpad5", LayoutCommand::CycleZoneAMode),
            ("ctrl-shift-2", LayoutCommand::ToggleZoneB),
            ("ctrl-numpad2", LayoutCommand::ToggleZoneB),
            ("ctrl-shift-8", LayoutCommand::ToggleControlBar),
            ("ctrl-numpad8", LayoutCommand::ToggleControlBar),
        ];

        let bindings = table
            .into_iter()
            .filter_map(|(chord, cmd)| Keystroke::parse(chord).map(|ks| (ks, cmd)))
            .collect();

        Self { bindings }
    }

    /// Look up the command bound to a keystroke, if any.
    pub fn resolve(&self, keystroke: &Keystroke) -> Option<LayoutCommand> {
        self.bindings.iter().find(|(ks, _)| ks == keystroke).map(|(_, cmd)| *cmd)
    }

    /// All registered bindings.
    pub fn bindings(&self) -> &[(Keystroke, LayoutCommand)] {
        &self.bindings
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}
