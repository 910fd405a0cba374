//! OR Journey timeline module.
//!
//! Serves a patient's surgical operations and their event timelines from a
//! read-only dataset. Other crates talk to it through [`contract::OrJourneyApi`];
//! the REST surface is mounted with [`module::OrJourney::register_rest`].

// === PUBLIC CONTRACT ===
// Only the contract module should be public for other modules to consume
pub mod contract;
pub use contract::{client, error, model};

pub mod errors;

// === MODULE DEFINITION ===
pub mod module;
pub use module::OrJourney;

// === INTERNAL MODULES ===
// These are internal implementation details, exposed for the server binary
// and integration tests
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod gateways;
#[doc(hidden)]
pub mod infra;
