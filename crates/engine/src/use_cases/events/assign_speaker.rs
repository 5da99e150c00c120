//! Assign speaker use case - the symmetric Event↔Speaker link.
//!
//! The two sides are two separate documents updated in a fixed sequence with
//! no transaction around them. Each side is an idempotent conditional update,
//! so the whole operation is safely retriable; a failure between the two
//! sides leaves an asymmetric link that the error surfaces explicitly.

use std::sync::Arc;

use serde::Serialize;

use eventdesk_domain::{Event, EventId, Speaker, SpeakerId};

use super::EventError;
use crate::infrastructure::ports::{EventRepo, LinkOutcome, SpeakerRepo};

/// Snapshots of both sides after a completed assign, with the outcome of
/// each side's link.
#[derive(Debug, Serialize)]
pub struct AssignedSpeaker {
    pub event: Event,
    pub speaker: Speaker,
    pub event_side: LinkOutcome,
    pub speaker_side: LinkOutcome,
}

pub struct AssignSpeaker {
    events: Arc<dyn EventRepo>,
    speakers: Arc<dyn SpeakerRepo>,
}

impl AssignSpeaker {
    pub fn new(events: Arc<dyn EventRepo>, speakers: Arc<dyn SpeakerRepo>) -> Self {
        Self { events, speakers }
    }

    pub async fn execute(
        &self,
        event_id: EventId,
        speaker_id: SpeakerId,
    ) -> Result<AssignedSpeaker, EventError> {
        if self.events.get(event_id).await?.is_none() {
            return Err(EventError::EventNotFound(event_id));
        }

        let event_side = self
            .events
            .add_speaker_if_absent(event_id, speaker_id)
            .await?;

        // The event-side link is committed at this point. A missing speaker
        // leaves that link in place and reports it.
        if self.speakers.get(speaker_id).await?.is_none() {
            tracing::warn!(
                %event_id,
                %speaker_id,
                %event_side,
                "speaker missing after event-side link committed"
            );
            return Err(EventError::SpeakerNotFound {
                speaker_id,
                event_side,
            });
        }

        let speaker_side = self
            .speakers
            .add_event_if_absent(speaker_id, event_id)
            .await?;

        tracing::info!(%event_id, %speaker_id, %event_side, %speaker_side, "speaker assigned");

        // Fresh snapshots of both sides for the caller.
        let event = self
            .events
            .get(event_id)
            .await?
            .ok_or(EventError::EventNotFound(event_id))?;
        let speaker = self
            .speakers
            .get(speaker_id)
            .await?
            .ok_or(EventError::SpeakerNotFound {
                speaker_id,
                event_side,
            })?;

        Ok(AssignedSpeaker {
            event,
            speaker,
            event_side,
            speaker_side,
        })
    }
}
