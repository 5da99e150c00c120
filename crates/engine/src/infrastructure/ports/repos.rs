//! Repository port traits for database access.
//!
//! One trait per entity kind. The storage layer offers no multi-document
//! transactions, so every trait keeps two rules:
//!
//! - each call touches a single document;
//! - link mutations are storage-native conditional updates
//!   (`add_*_if_absent` / `remove_*_if_present`), never a client-side
//!   read-check-write. Two concurrent callers mutating the same set must not
//!   lose either update.

use async_trait::async_trait;
use serde::Serialize;

use eventdesk_domain::{
    Event, EventCategory, EventCategoryId, EventId, EventStatus, EventStatusId, EventType,
    EventTypeId, EventVenue, EventVenueId, Speaker, SpeakerId,
};

use super::error::RepoError;

/// Result of an idempotent link addition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkOutcome {
    Added,
    AlreadyPresent,
}

impl std::fmt::Display for LinkOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::AlreadyPresent => write!(f, "already present"),
        }
    }
}

/// Result of an idempotent link removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlinkOutcome {
    Removed,
    NotPresent,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepo: Send + Sync {
    // CRUD
    async fn get(&self, id: EventId) -> Result<Option<Event>, RepoError>;
    async fn save(&self, event: &Event) -> Result<(), RepoError>;
    async fn delete(&self, id: EventId) -> Result<(), RepoError>;
    async fn list(&self) -> Result<Vec<Event>, RepoError>;

    // Speaker back-reference set
    async fn add_speaker_if_absent(
        &self,
        event_id: EventId,
        speaker_id: SpeakerId,
    ) -> Result<LinkOutcome, RepoError>;
    async fn remove_speaker_if_present(
        &self,
        event_id: EventId,
        speaker_id: SpeakerId,
    ) -> Result<UnlinkOutcome, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeakerRepo: Send + Sync {
    async fn get(&self, id: SpeakerId) -> Result<Option<Speaker>, RepoError>;
    async fn save(&self, speaker: &Speaker) -> Result<(), RepoError>;
    async fn list(&self) -> Result<Vec<Speaker>, RepoError>;

    // Event back-reference set (mirror of EventRepo's speaker set)
    async fn add_event_if_absent(
        &self,
        speaker_id: SpeakerId,
        event_id: EventId,
    ) -> Result<LinkOutcome, RepoError>;
    async fn remove_event_if_present(
        &self,
        speaker_id: SpeakerId,
        event_id: EventId,
    ) -> Result<UnlinkOutcome, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventTypeRepo: Send + Sync {
    async fn get(&self, id: EventTypeId) -> Result<Option<EventType>, RepoError>;
    async fn save(&self, event_type: &EventType) -> Result<(), RepoError>;
    async fn list(&self) -> Result<Vec<EventType>, RepoError>;

    async fn add_event_if_absent(
        &self,
        id: EventTypeId,
        event_id: EventId,
    ) -> Result<LinkOutcome, RepoError>;
    async fn remove_event_if_present(
        &self,
        id: EventTypeId,
        event_id: EventId,
    ) -> Result<UnlinkOutcome, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventCategoryRepo: Send + Sync {
    async fn get(&self, id: EventCategoryId) -> Result<Option<EventCategory>, RepoError>;
    async fn save(&self, category: &EventCategory) -> Result<(), RepoError>;
    async fn list(&self) -> Result<Vec<EventCategory>, RepoError>;

    async fn add_event_if_absent(
        &self,
        id: EventCategoryId,
        event_id: EventId,
    ) -> Result<LinkOutcome, RepoError>;
    async fn remove_event_if_present(
        &self,
        id: EventCategoryId,
        event_id: EventId,
    ) -> Result<UnlinkOutcome, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventStatusRepo: Send + Sync {
    async fn get(&self, id: EventStatusId) -> Result<Option<EventStatus>, RepoError>;
    async fn save(&self, status: &EventStatus) -> Result<(), RepoError>;
    async fn list(&self) -> Result<Vec<EventStatus>, RepoError>;

    async fn add_event_if_absent(
        &self,
        id: EventStatusId,
        event_id: EventId,
    ) -> Result<LinkOutcome, RepoError>;
    async fn remove_event_if_present(
        &self,
        id: EventStatusId,
        event_id: EventId,
    ) -> Result<UnlinkOutcome, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventVenueRepo: Send + Sync {
    async fn get(&self, id: EventVenueId) -> Result<Option<EventVenue>, RepoError>;
    async fn save(&self, venue: &EventVenue) -> Result<(), RepoError>;
    async fn list(&self) -> Result<Vec<EventVenue>, RepoError>;

    async fn add_event_if_absent(
        &self,
        id: EventVenueId,
        event_id: EventId,
    ) -> Result<LinkOutcome, RepoError>;
    async fn remove_event_if_present(
        &self,
        id: EventVenueId,
        event_id: EventId,
    ) -> Result<UnlinkOutcome, RepoError>;
}
