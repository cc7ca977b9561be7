//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// `Money` is the value object of this domain: two amounts with the same
/// decimal value are interchangeable, whereas two participants with the same
/// display name are not (they are entities, compared by id).
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
