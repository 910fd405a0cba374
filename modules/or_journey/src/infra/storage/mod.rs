pub mod entity;
pub mod fixture_repo;
pub mod mapper;

pub use fixture_repo::{DatasetSummary, FixtureTimelineRepository};
