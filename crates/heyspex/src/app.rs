//! Headless driver for the workspace layout engine.
//!
//! Applies a sequence of layout commands against the persisted workspace
//! state and prints the resolved zone geometry. State lives in the
//! preference store, so consecutive invocations observe each other's
//! changes the same way app restarts do.

use std::path::PathBuf;
use std::sync::Arc;

use heyspex_core::{AppState, HeySpexError};
use heyspex_layout::{LayoutCommand, LayoutConfig, Viewport, WorkspaceLayout};
use serde_json::json;

#[derive(Debug)]
pub struct CliOptions {
    pub data_dir: Option<PathBuf>,
    pub rail_mode: bool,
    pub viewport: Option<(i32, i32)>,
    pub commands: Vec<LayoutCommand>,
}

impl CliOptions {
    /// Parse command-line arguments (without the program name).
    ///
    /// Commands are written `action` or `action=value`, e.g.
    /// `toggle-left-panel` or `set-zone-b-height=300`. Unrecognized
    /// commands are reported and skipped rather than aborting the run.
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self, HeySpexError> {
        let mut options = Self {
            data_dir: None,
            rail_mode: false,
            viewport: None,
            commands: Vec::new(),
        };

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--data-dir" => {
                    let dir = args.next().ok_or_else(|| {
                        HeySpexError::config("--data-dir requires a path argument")
                    })?;
                    options.data_dir = Some(PathBuf::from(dir));
                }
                "--rail" => options.rail_mode = true,
                "--viewport" => {
                    let value = args.next().ok_or_else(|| {
                        HeySpexError::config("--viewport requires a WIDTHxHEIGHT argument")
                    })?;
                    options.viewport = Some(parse_viewport(&value)?);
                }
                _ => {
                    let (action, value) = match arg.split_once('=') {
                        Some((action, value)) => (action, Some(value)),
                        None => (arg.as_str(), None),
                    };
                    match LayoutCommand::parse(action, value) {
                        Some(cmd) => options.commands.push(cmd),
                        None => tracing::warn!(command = %arg, "Skipping unrecognized command"),
                    }
                }
            }
        }

        Ok(options)
    }
}

fn parse_viewport(value: &str) -> Result<(i32, i32), HeySpexError> {
    let parsed = value
        .split_once('x')
        .and_then(|(w, h)| Some((w.parse::<i32>().ok()?, h.parse::<i32>().ok()?)));
    match parsed {
        Some((w, h)) if w > 0 && h > 0 => Ok((w, h)),
        _ => Err(HeySpexError::geometry(format!(
            "Invalid viewport '{value}', expected WIDTHxHEIGHT (e.g. 1280x800)"
        ))),
    }
}

/// Run one engine session: hydrate, apply commands, flush, report.
pub fn run(options: CliOptions) -> Result<(), HeySpexError> {
    let app = match &options.data_dir {
        Some(dir) => AppState::with_data_dir(dir.clone())?,
        None => AppState::new()?,
    };
    let app = Arc::new(app);

    let config = LayoutConfig { rail_mode: options.rail_mode, ..LayoutConfig::default() };
    let mut workspace = WorkspaceLayout::new(app, config);
    workspace.hydrate();
    if let Some((width, height)) = options.viewport {
        workspace.set_viewport(width, height);
    }

    for command in &options.commands {
        workspace.apply(*command);
    }
    for event in workspace.take_events() {
        tracing::debug!(?event, "Layout event");
    }

    // Write dimensions synchronously; a short-lived process cannot wait out
    // the debounce.
    workspace.flush();

    println!("{}", render_report(&workspace));
    Ok(())
}

fn render_report(workspace: &WorkspaceLayout) -> String {
    let layout = workspace.computed_layout();
    let viewport: Viewport = workspace.viewport();
    let zone_b = workspace.zone_b();

    let report = json!({
        "viewport": { "width": viewport.width, "height": viewport.height },
        "zoneAMode": workspace.zone_a_mode().as_str(),
        "zoneA": {
            "visible": layout.zone_a_visible,
            "leftWidth": layout.left_width,
            "centerWidth": layout.center_width,
            "rightWidth": layout.right_width,
        },
        "zoneB": {
            "visible": layout.zone_b_visible,
            "height": layout.zone_b_height,
            "mode": workspace.effective_zone_b_mode().as_str(),
            "overlayPosition": zone_b.overlay_position,
        },
        "controlBarVisible": workspace.is_control_bar_visible(),
    });
    serde_json::to_string_pretty(&report).unwrap_or_else(|_| report.to_string())
}
