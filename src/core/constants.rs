// ============================================================================
// sublet - Constants
// ============================================================================

use std::time::Duration;

/// Default coalescing window: roughly one timer tick.
///
/// Writes issued within this span of each other collapse into one delivery.
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(1);

/// Maximum timers fired by a single `run_until_idle` before we assume a
/// callback keeps re-arming itself forever.
pub const MAX_FLUSH_COUNT: u32 = 10_000;
