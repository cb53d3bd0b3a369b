//! Typed identifiers
//!
//! `Id<M>` is a UUID tagged with a marker type, so a session id can never
//! be passed where a user id is expected.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;

use uuid::Uuid;

/// Names the entity an [`Id`] belongs to
pub trait IdMarker {
    const NAME: &'static str;
}

/// UUID v4 tagged with its entity
///
/// ```
/// use kernel::id::{SessionId, UserId};
///
/// let user_id = UserId::new();
/// let parsed: UserId = user_id.to_string().parse().unwrap();
/// assert_eq!(user_id, parsed);
/// assert!(format!("{:?}", SessionId::new()).starts_with("SessionId("));
/// ```
pub struct Id<M> {
    uuid: Uuid,
    _marker: PhantomData<fn() -> M>,
}

impl<M> Id<M> {
    /// Fresh random id
    pub fn new() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self {
            uuid,
            _marker: PhantomData,
        }
    }

    pub const fn as_uuid(&self) -> &Uuid {
        &self.uuid
    }

    pub fn into_uuid(self) -> Uuid {
        self.uuid
    }
}

// Implemented by hand: derives would require the marker to implement them too.
impl<M> Clone for Id<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for Id<M> {}

impl<M> PartialEq for Id<M> {
    fn eq(&self, other: &Self) -> bool {
        self.uuid == other.uuid
    }
}

impl<M> Eq for Id<M> {}

impl<M> Hash for Id<M> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uuid.hash(state);
    }
}

impl<M> Default for Id<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: IdMarker> fmt::Debug for Id<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", M::NAME, self.uuid)
    }
}

/// Hyphenated lower-case UUID
impl<M> fmt::Display for Id<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.uuid, f)
    }
}

impl<M> FromStr for Id<M> {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self::from_uuid)
    }
}

pub mod markers {
    use super::IdMarker;

    pub struct User;

    impl IdMarker for User {
        const NAME: &'static str = "UserId";
    }

    pub struct Session;

    impl IdMarker for Session {
        const NAME: &'static str = "SessionId";
    }
}

pub type UserId = Id<markers::User>;
pub type SessionId = Id<markers::Session>;
