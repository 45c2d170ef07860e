//! Entity trait: things the store keys by a normalized identifier.

/// A named domain object with a stable identity (a customer or a product).
///
/// Identity is the normalized id alone: two entities with the same id are the
/// same entity, whatever name either was given.
pub trait Entity {
    /// Normalized identifier type.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Display + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// Display name stored with the entity.
    fn display_name(&self) -> &str;

    /// `ID (Name)`, as shown in listings.
    fn label(&self) -> String {
        format!("{} ({})", self.id(), self.display_name())
    }
}
