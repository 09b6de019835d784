//! Core services for the HeySpex workspace shell.
//!
//! This crate provides the service layer under the layout engine:
//!
//! - **error**: Error handling for storage, config, and geometry failures
//! - **logging**: Structured logging setup
//! - **services**: Preference storage and debounced write scheduling
//! - **state**: Application state management

pub mod error;
pub mod logging;
pub mod services;
pub mod state;

pub use error::HeySpexError;
pub use services::{Debouncer, PreferenceStore};
pub use state::AppState;
