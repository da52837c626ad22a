//! Test helpers shared across crates.
//!
//! This crate provides figment jail wrappers, a store that records the calls
//! a mutation log replays onto it, and text normalisation for behavioural
//! step arguments.

pub mod figment;
pub mod store;
pub mod text;
