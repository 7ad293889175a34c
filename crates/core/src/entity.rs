//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Reference-data records (customers, products, warehouses, salespersons) all
/// implement this so stores can index them generically by their code.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
