//! Gateway services

mod status_service;

pub use status_service::StatusService;
