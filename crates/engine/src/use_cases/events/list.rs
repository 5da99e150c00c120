//! Listing use cases - events with resolved parents, and event speakers.

use std::sync::Arc;

use serde::Serialize;

use eventdesk_domain::{
    Event, EventCategory, EventId, EventStatus, EventType, EventVenue, Speaker,
};

use super::EventError;
use crate::infrastructure::ports::{
    EventCategoryRepo, EventRepo, EventStatusRepo, EventTypeRepo, EventVenueRepo, SpeakerRepo,
};

/// An event with its singular parent references resolved to snapshots.
/// A missing parent resolves to `None` rather than failing the listing.
#[derive(Debug, Serialize)]
pub struct EventView {
    pub event: Event,
    pub event_type: Option<EventType>,
    pub category: Option<EventCategory>,
    pub status: Option<EventStatus>,
    pub venue: Option<EventVenue>,
}

pub struct ListEvents {
    events: Arc<dyn EventRepo>,
    types: Arc<dyn EventTypeRepo>,
    categories: Arc<dyn EventCategoryRepo>,
    statuses: Arc<dyn EventStatusRepo>,
    venues: Arc<dyn EventVenueRepo>,
}

impl ListEvents {
    pub fn new(
        events: Arc<dyn EventRepo>,
        types: Arc<dyn EventTypeRepo>,
        categories: Arc<dyn EventCategoryRepo>,
        statuses: Arc<dyn EventStatusRepo>,
        venues: Arc<dyn EventVenueRepo>,
    ) -> Self {
        Self {
            events,
            types,
            categories,
            statuses,
            venues,
        }
    }

    pub async fn execute(&self) -> Result<Vec<EventView>, EventError> {
        let events = self.events.list().await?;
        let mut views = Vec::with_capacity(events.len());

        for event in events {
            let event_type = self.types.get(event.type_id).await?;
            let category = self.categories.get(event.category_id).await?;
            let status = self.statuses.get(event.status_id).await?;
            let venue = self.venues.get(event.venue_id).await?;
            views.push(EventView {
                event,
                event_type,
                category,
                status,
                venue,
            });
        }

        Ok(views)
    }
}

pub struct ListEventSpeakers {
    events: Arc<dyn EventRepo>,
    speakers: Arc<dyn SpeakerRepo>,
}

impl ListEventSpeakers {
    pub fn new(events: Arc<dyn EventRepo>, speakers: Arc<dyn SpeakerRepo>) -> Self {
        Self { events, speakers }
    }

    pub async fn execute(&self, event_id: EventId) -> Result<Vec<Speaker>, EventError> {
        let event = self
            .events
            .get(event_id)
            .await?
            .ok_or(EventError::EventNotFound(event_id))?;

        let mut speakers = Vec::with_capacity(event.speakers.len());
        for speaker_id in event.speakers {
            match self.speakers.get(speaker_id).await? {
                Some(speaker) => speakers.push(speaker),
                // A dangling id is a consistency defect worth surfacing in
                // the logs, but it should not break the listing.
                None => tracing::warn!(%event_id, %speaker_id, "dangling speaker reference"),
            }
        }
        Ok(speakers)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use eventdesk_domain::{EventCategoryId, EventStatusId, EventTypeId, EventVenueId, SpeakerId};

    use super::*;
    use crate::infrastructure::memory::InMemoryRepositories;
    use crate::infrastructure::ports::{EventRepo as _, EventTypeRepo as _, SpeakerRepo as _};

    fn test_event(type_id: EventTypeId) -> Event {
        Event::new(
            "Launch",
            "Product launch",
            Utc::now(),
            Utc::now(),
            type_id,
            EventCategoryId::new(),
            EventStatusId::new(),
            EventVenueId::new(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn resolves_present_parents_and_leaves_missing_ones_none() {
        let repos = InMemoryRepositories::new();
        let event_type = EventType::new("Conference");
        repos.types.save(&event_type).await.expect("save type");
        // Category, status and venue are never saved.
        let event = test_event(event_type.id);
        repos.events.save(&event).await.expect("save event");

        let use_case = ListEvents::new(
            repos.events.clone(),
            repos.types.clone(),
            repos.categories.clone(),
            repos.statuses.clone(),
            repos.venues.clone(),
        );
        let views = use_case.execute().await.expect("list");

        assert_eq!(views.len(), 1);
        assert_eq!(
            views[0].event_type.as_ref().map(|t| t.name.as_str()),
            Some("Conference")
        );
        assert!(views[0].category.is_none());
        assert!(views[0].venue.is_none());
    }

    #[tokio::test]
    async fn speakers_listing_skips_dangling_ids() {
        let repos = InMemoryRepositories::new();
        let speaker = Speaker::new("Ada");
        repos.speakers.save(&speaker).await.expect("save speaker");

        let mut event = test_event(EventTypeId::new());
        event.add_speaker(speaker.id);
        event.add_speaker(SpeakerId::new()); // dangling
        repos.events.save(&event).await.expect("save event");

        let use_case = ListEventSpeakers::new(repos.events.clone(), repos.speakers.clone());
        let speakers = use_case.execute(event.id).await.expect("list");

        assert_eq!(speakers.len(), 1);
        assert_eq!(speakers[0].name, "Ada");
    }

    #[tokio::test]
    async fn speakers_listing_for_missing_event_is_not_found() {
        let repos = InMemoryRepositories::new();
        let use_case = ListEventSpeakers::new(repos.events.clone(), repos.speakers.clone());

        let missing = EventId::new();
        let err = use_case.execute(missing).await.expect_err("missing event");
        assert!(matches!(err, EventError::EventNotFound(id) if id == missing));
    }
}
