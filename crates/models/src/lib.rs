//! Explicit schema of the read-only weather dataset.
//!
//! The service never creates or mutates these tables; the declarations exist so
//! queries are type-checked against a known layout instead of one discovered
//! at startup.

pub mod errors;
pub mod db;
pub mod measurement;
pub mod station;

#[cfg(test)]
mod tests;
