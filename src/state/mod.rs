// ============================================================================
// STATE MODULE
// ============================================================================

pub mod reactivity;

pub use reactivity::ContextSlot;
