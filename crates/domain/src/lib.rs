pub mod entities;
pub mod error;
pub mod ids;
pub mod schedule;

pub use entities::{Event, EventCategory, EventStatus, EventType, EventVenue, Speaker};
pub use error::DomainError;
pub use ids::{
    EventCategoryId, EventId, EventStatusId, EventTypeId, EventVenueId, FeedbackId, RsvpId,
    SpeakerId,
};
