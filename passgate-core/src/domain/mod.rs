//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod account;
pub mod hashing;
pub mod result;
pub mod validation;

pub use account::{Account, AccountView, NewAccount};
pub use hashing::HasherParams;
pub use result::{CredentialError, HashError, StoreError, UniqueField};
