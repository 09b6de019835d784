//! Service layer: preference storage and write scheduling.

pub mod debounce;
pub mod storage;

pub use debounce::Debouncer;
pub use storage::PreferenceStore;
