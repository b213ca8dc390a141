//! Session module
//!
//! Holds the operator's session and the storage slot behind it.

pub mod storage;
pub mod store;

pub use storage::{FileStorage, MemoryStorage, TokenStorage};
pub use store::{Session, SessionStore};
