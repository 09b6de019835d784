//! HeySpex - resizable multi-zone workspace shell.

mod app;

use heyspex_core::logging::{init_logging, log_dir, LogConfig};

fn main() {
    let log_config = LogConfig::new(log_dir());
    let _logging_guard = init_logging(log_config);

    tracing::info!("Starting HeySpex");

    let options = match app::CliOptions::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("heyspex: {e}");
            std::process::exit(2);
        }
    };

    if let Err(e) = app::run(options) {
        tracing::error!(error = %e, category = e.category(), "Session failed");
        eprintln!("heyspex: {e}");
        if let Some(hint) = e.hint() {
            eprintln!("  hint: {hint}");
        }
        std::process::exit(1);
    }
}
