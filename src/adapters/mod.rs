//! Adapters implementing the ports.
//!
//! Storage backends for brain snapshots: binary MessagePack files, pretty
//! JSON files, and a shared in-memory map for tests.

pub mod in_memory_repository;
pub mod json_repository;
pub mod msgpack_repository;

pub use in_memory_repository::InMemoryRepository;
pub use json_repository::JsonRepository;
pub use msgpack_repository::MsgPackRepository;
