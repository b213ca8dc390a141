//! Token module
//!
//! Decodes bearer token payloads into [`Claims`]. Client-side only; see
//! [`codec`] for the trust caveat.

pub mod claims;
pub mod codec;

pub use claims::Claims;
pub use codec::{decode, try_decode};
