// ============================================================================
// sublet - Primitives Module
// The two interchangeable interception strategies
// ============================================================================

pub mod descriptor;
pub mod proxy;

// Re-export for convenience
pub use proxy::Proxy;
