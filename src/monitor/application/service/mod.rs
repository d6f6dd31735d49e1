pub mod collector_service;
pub mod export_service;
