//! Event use cases - creation, speaker linking, deletion, listing.
//!
//! These orchestrate multi-document updates over the repository ports. None
//! of them assumes cross-document atomicity: every multi-target pass is a
//! sequence of idempotent, individually reported legs.

pub mod assign_speaker;
pub mod create;
pub mod delete;
pub mod fan_out;
pub mod list;

pub use assign_speaker::{AssignSpeaker, AssignedSpeaker};
pub use create::{CreateEvent, CreateEventInput, CreatedEvent};
pub use delete::{DeleteEvent, RetractionReport, SpeakerLeg};
pub use fan_out::{FanOutReport, LegStatus, ParentFanOut, ParentKind, ParentLeg};
pub use list::{EventView, ListEventSpeakers, ListEvents};

use eventdesk_domain::{DomainError, EventId, SpeakerId};

use crate::infrastructure::ports::{LinkOutcome, RepoError};

#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("Event not found: {0}")]
    EventNotFound(EventId),

    /// The speaker was missing after the event-side link had already been
    /// committed. The partial state is reported, not hidden: a retry with a
    /// valid speaker id (or a repair pass) completes the link.
    #[error("Speaker not found: {speaker_id} (event-side link was {event_side})")]
    SpeakerNotFound {
        speaker_id: SpeakerId,
        event_side: LinkOutcome,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repo(#[from] RepoError),
}
