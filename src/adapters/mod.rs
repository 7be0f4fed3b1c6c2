pub mod cache;
pub mod catalog;
pub mod clock;
pub mod memory_store;
