//! Entity trait: identity that survives changes to every other attribute.
//!
//! A participant keeps its id across renames; an expense keeps its id while
//! the removal cascade edits its payer and split set.

pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;
}
