//! Domain Layer
//!
//! Contains entities, value objects, and store traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{
    session::SessionRecord,
    user::{NewUser, User, UserSummary},
};
pub use repository::{SessionStore, UserStore};
