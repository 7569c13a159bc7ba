//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two category names or
/// character names with the same text are the same thing. To "modify" one, build a new
/// one.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Category(String);
///
/// impl ValueObject for Category {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
