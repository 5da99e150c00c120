//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete
//! types. Ports exist for:
//! - Database access (could swap Neo4j -> the in-memory store, or another
//!   document store)
//! - Clock (for testing)

mod error;
mod repos;
mod testing;

pub use error::RepoError;
pub use repos::{
    EventCategoryRepo, EventRepo, EventStatusRepo, EventTypeRepo, EventVenueRepo, LinkOutcome,
    SpeakerRepo, UnlinkOutcome,
};
pub use testing::ClockPort;

#[cfg(test)]
pub use repos::{
    MockEventCategoryRepo, MockEventRepo, MockEventStatusRepo, MockEventTypeRepo,
    MockEventVenueRepo, MockSpeakerRepo,
};
#[cfg(test)]
pub use testing::MockClockPort;
