//! Authentication module for managing the staff session.
//!
//! This module provides:
//! - `SessionManager`: token lifecycle with automatic expiry
//! - `KeyValueStore`: durable storage for the token (file, keychain or memory)
//!
//! Tokens are persisted under the `token` key and expire two hours after login.

pub mod session;
pub mod store;

pub use session::{
    RestorePolicy, SessionManager, SessionState, DEFAULT_SESSION_HOURS, EXPIRES_AT_KEY, TOKEN_KEY,
};
pub use store::{FileStore, KeyValueStore, KeyringStore, MemoryStore};
