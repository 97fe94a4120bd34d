// ============================================================================
// sublet - Errors
// The two ways a `track` call can be refused
// ============================================================================

use thiserror::Error;

/// Error returned synchronously by `track` before any tracking begins.
///
/// Nothing is installed on the target when an error is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackError {
    /// The target cannot be intercepted (it is not an object or array).
    #[error("{found} is not an object")]
    InvalidTarget {
        /// Kind of the value that was passed instead
        found: &'static str,
    },

    /// No change callback was supplied to a strategy that requires one.
    #[error("on_change is not a function")]
    InvalidCallback,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_argument() {
        let err = TrackError::InvalidTarget { found: "null" };
        assert_eq!(err.to_string(), "null is not an object");

        let err = TrackError::InvalidCallback;
        assert!(err.to_string().contains("is not a function"));
    }
}
