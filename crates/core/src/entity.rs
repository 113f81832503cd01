//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// A tender keeps its identifier across edits; everything else may change.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
