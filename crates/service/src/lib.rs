//! Service layer answering the climate queries on top of `models`.
//! - Repositories isolate SeaORM queries behind async traits.
//! - `ClimateService` holds the query rules (year window, most-active station, empty results).

pub mod errors;
pub mod climate;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use climate::ClimateService;
