//! Climate module: domain records, read repositories and the query service.

pub mod domain;
pub mod repository;
pub mod repo;
pub mod service;

pub use service::ClimateService;
