//! Domain logic for the thesis-advising backend.
//!
//! Everything in this crate is pure: no database, no HTTP. The DB and API
//! crates depend on it for shared types, status lifecycles, and the
//! activity feed aggregator.

pub mod activity;
pub mod assignment;
pub mod calendar;
pub mod display;
pub mod error;
pub mod meeting;
pub mod roles;
pub mod submission;
pub mod types;
pub mod validation;
