//! # domains
//!
//! The post resource model, its persistence port, and the error vocabulary
//! shared by every other crate in the workspace. Nothing in here performs I/O.

pub mod error;
pub mod models;
pub mod traits;

pub use error::*;
pub use models::*;
pub use traits::*;
