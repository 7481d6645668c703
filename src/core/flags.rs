//! Per-operation behavior flags
//!
//! Every helper that can be forced, traced or short-circuited takes a
//! [`Flags`] value explicitly instead of consulting process-wide state.

/// Behavior switches recognized by the helpers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    /// Bypass the "target already exists" skip (downloads are re-fetched)
    pub force: bool,
    /// Emit diagnostic tracing for spawned commands
    pub verbose: bool,
    /// Skip expensive post-processing steps (archive extraction)
    pub fast: bool,
}

impl Flags {
    /// Create flags from the three switches
    pub fn new(force: bool, verbose: bool, fast: bool) -> Self {
        Self {
            force,
            verbose,
            fast,
        }
    }
}
