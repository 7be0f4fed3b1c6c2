pub mod stay_service;

pub use stay_service::{Quote, StayService};
