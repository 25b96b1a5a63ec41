//! # storage-adapters
//!
//! Implementations of [`domains::PostRepository`].

pub mod memory;
#[cfg(feature = "db-mongodb")]
pub mod mongo;

pub use memory::InMemoryPostRepository;
#[cfg(feature = "db-mongodb")]
pub use mongo::MongoPostRepository;
