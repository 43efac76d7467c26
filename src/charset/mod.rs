//! Character sets and the byte-to-password mapping.
//!
//! - `Strength` selects an ordered list of alphabet segments (`strength`)
//! - `translate` / `encode` turn derived bytes into a password (`mapping`)

pub mod mapping;
pub mod strength;

pub use mapping::{encode, printable_94, translate};
pub use strength::Strength;
