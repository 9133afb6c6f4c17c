//! CLI command implementations.

pub mod export;
pub mod list;
pub mod shared;
pub mod stats;
pub mod view;
