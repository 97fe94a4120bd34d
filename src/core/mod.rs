// ============================================================================
// sublet - Core Module
// State container, target contract, host context, options and errors
// ============================================================================

pub mod constants;
pub mod context;
pub mod error;
pub mod options;
pub mod state;
pub mod target;

// Re-export commonly used items
pub use context::{advance, flush, host, with_host};
pub use error::TrackError;
pub use options::{Callback, TrackOptions, DEFAULT_WINDOW};
pub use state::State;
pub use target::{Kind, Target};
