//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Ord + core::hash::Hash + core::fmt::Debug;

    /// Human-readable entity kind, used in `NotFound` errors.
    const KIND: &'static str;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
