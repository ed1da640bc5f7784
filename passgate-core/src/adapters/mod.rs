//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB for the AccountStore port
//! - Process memory for the AccountStore port (tests, embedding)
//! - Argon2id for the CredentialHasher port

pub mod argon2_hasher;
pub mod duckdb;
pub mod memory;
