//! User Password Value Object
//!
//! Domain wrappers around `platform::password`.
//!
//! ## Usage
//! ```rust
//! use account::domain::value_object::user_password::{RawPassword, UserPassword};
//! use platform::password::HashCost;
//!
//! let raw = RawPassword::new("pw1".to_string()).unwrap();
//! let hashed = UserPassword::from_raw(&raw, &HashCost::minimal(), None).unwrap();
//! assert!(hashed.verify(&raw, None));
//! ```

use platform::password::{ClearTextPassword, HashCost, HashedPassword};
use std::fmt;

use crate::error::{AccountError, AccountResult};

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input. Zeroized when dropped.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Any non-empty string is accepted.
    pub fn new(raw: String) -> AccountResult<Self> {
        ClearTextPassword::new(raw)
            .map(Self)
            .map_err(|_| AccountError::validation("password", "password is required"))
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

// ============================================================================
// User Password (Hashed, stored)
// ============================================================================

/// Stored password digest (PHC string)
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash a raw password with a fresh salt
    pub fn from_raw(
        raw: &RawPassword,
        cost: &HashCost,
        pepper: Option<&[u8]>,
    ) -> AccountResult<Self> {
        Ok(Self(raw.inner().hash(cost, pepper)?))
    }

    /// Wrap a digest read from the store
    pub fn from_db(phc: impl Into<String>) -> Self {
        Self(HashedPassword::from_db(phc))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_phc_string()
    }

    /// `false` for a wrong password or an unreadable digest
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(raw.inner(), pepper)
    }

    pub fn needs_rehash(&self, cost: &HashCost) -> bool {
        self.0.needs_rehash(cost)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}
