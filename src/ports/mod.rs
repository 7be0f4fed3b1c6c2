pub mod availability_store;
pub mod booking_store;
pub mod cache;
pub mod clock;
pub mod listing_repository;
