pub mod availability;
pub mod booking;
pub mod listing;
pub mod pricing;
pub mod search;
pub mod validation;
