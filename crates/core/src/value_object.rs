//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.

/// Marker trait for value objects.
///
/// ## Value Object vs Entity
///
/// - **Value Object**: No identity (two tender values of `500` are the same value)
/// - **Entity**: Has identity (two tenders with the same ID are the same tender)
///
/// Value objects should be **immutable**. To "modify" one, build a new one.
///
/// ```ignore
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// struct TenderValue(f64);
///
/// impl ValueObject for TenderValue {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
