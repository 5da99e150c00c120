//! Delete event use case.
//!
//! Deleting an event retracts its id from every entity that references it -
//! the four singular parents and every linked speaker - before removing the
//! event document itself. Retraction is an explicit, per-leg reported step;
//! skipping it would leave dangling ids in every back-reference set.

use std::sync::Arc;

use serde::Serialize;

use eventdesk_domain::{EventId, SpeakerId};

use super::fan_out::{FanOutReport, LegStatus, ParentFanOut};
use super::EventError;
use crate::infrastructure::ports::{EventRepo, SpeakerRepo};

/// One speaker-side retraction leg.
#[derive(Debug, Clone, Serialize)]
pub struct SpeakerLeg {
    pub speaker_id: SpeakerId,
    #[serde(flatten)]
    pub status: LegStatus,
}

/// Everything that was retracted (or failed to retract) for a deletion.
#[derive(Debug, Serialize)]
pub struct RetractionReport {
    pub event_id: EventId,
    pub parents: FanOutReport,
    pub speakers: Vec<SpeakerLeg>,
}

impl RetractionReport {
    pub fn is_complete(&self) -> bool {
        self.parents.is_complete() && self.speakers.iter().all(|leg| leg.status.succeeded())
    }
}

pub struct DeleteEvent {
    events: Arc<dyn EventRepo>,
    speakers: Arc<dyn SpeakerRepo>,
    fan_out: Arc<ParentFanOut>,
}

impl DeleteEvent {
    pub fn new(
        events: Arc<dyn EventRepo>,
        speakers: Arc<dyn SpeakerRepo>,
        fan_out: Arc<ParentFanOut>,
    ) -> Self {
        Self {
            events,
            speakers,
            fan_out,
        }
    }

    pub async fn execute(&self, event_id: EventId) -> Result<RetractionReport, EventError> {
        let event = self
            .events
            .get(event_id)
            .await?
            .ok_or(EventError::EventNotFound(event_id))?;

        // Retract before deleting: the event document is the only record of
        // which speakers need their back-reference removed.
        let parents = self.fan_out.unlink(&event).await;

        let mut speaker_legs = Vec::with_capacity(event.speakers.len());
        for speaker_id in &event.speakers {
            let status = LegStatus::from_unlink(
                self.speakers
                    .remove_event_if_present(*speaker_id, event_id)
                    .await,
            );
            if let LegStatus::Failed { error } = &status {
                tracing::warn!(%event_id, speaker_id = %speaker_id, %error, "speaker retraction leg failed");
            }
            speaker_legs.push(SpeakerLeg {
                speaker_id: *speaker_id,
                status,
            });
        }

        self.events.delete(event_id).await?;
        tracing::info!(%event_id, "event deleted");

        Ok(RetractionReport {
            event_id,
            parents,
            speakers: speaker_legs,
        })
    }
}
