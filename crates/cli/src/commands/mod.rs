//! CLI command implementations.

pub mod cart;
pub mod email;
pub mod search;
