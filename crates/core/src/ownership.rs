//! Per-user ownership scoping.
//!
//! Owner-scoped entities are only visible to the user that created them. A
//! record that exists but belongs to someone else is reported exactly like a
//! missing one, so callers cannot probe for other users' ids.

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::id::UserId;

/// Entities that belong to a single user.
pub trait Owned: Entity {
    fn owner_id(&self) -> UserId;
}

/// Resolve a lookup result against the requesting owner.
pub fn ensure_owned<E: Owned>(entity: Option<&E>, owner: UserId) -> DomainResult<&E> {
    match entity {
        Some(e) if e.owner_id() == owner => Ok(e),
        _ => Err(DomainError::not_found(E::KIND)),
    }
}

/// Mutable variant of [`ensure_owned`].
pub fn ensure_owned_mut<E: Owned>(entity: Option<&mut E>, owner: UserId) -> DomainResult<&mut E> {
    match entity {
        Some(e) if e.owner_id() == owner => Ok(e),
        _ => Err(DomainError::not_found(E::KIND)),
    }
}

/// Keep only the entities owned by `owner`.
pub fn owned_by<'a, E, I>(entities: I, owner: UserId) -> impl Iterator<Item = &'a E>
where
    E: Owned + 'a,
    I: IntoIterator<Item = &'a E>,
{
    entities.into_iter().filter(move |e| e.owner_id() == owner)
}
