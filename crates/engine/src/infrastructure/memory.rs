//! In-memory repository implementations.
//!
//! Documents live in one `DashMap` per entity kind. The conditional-update
//! methods mutate the document while holding the map's shard guard, which
//! gives the same atomic add-if-absent / remove-if-present contract as the
//! Neo4j adapter. Used by the use-case tests and as the `STORE=memory`
//! fallback for local runs without a database.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use eventdesk_domain::{
    Event, EventCategory, EventCategoryId, EventId, EventStatus, EventStatusId, EventType,
    EventTypeId, EventVenue, EventVenueId, Speaker, SpeakerId,
};

use crate::infrastructure::ports::{
    EventCategoryRepo, EventRepo, EventStatusRepo, EventTypeRepo, EventVenueRepo, LinkOutcome,
    RepoError, SpeakerRepo, UnlinkOutcome,
};

fn link_outcome(changed: bool) -> LinkOutcome {
    if changed {
        LinkOutcome::Added
    } else {
        LinkOutcome::AlreadyPresent
    }
}

fn unlink_outcome(changed: bool) -> UnlinkOutcome {
    if changed {
        UnlinkOutcome::Removed
    } else {
        UnlinkOutcome::NotPresent
    }
}

#[derive(Default)]
pub struct InMemoryEventRepo {
    docs: DashMap<Uuid, Event>,
}

#[async_trait]
impl EventRepo for InMemoryEventRepo {
    async fn get(&self, id: EventId) -> Result<Option<Event>, RepoError> {
        Ok(self.docs.get(id.as_uuid()).map(|e| e.clone()))
    }

    async fn save(&self, event: &Event) -> Result<(), RepoError> {
        self.docs.insert(event.id.to_uuid(), event.clone());
        Ok(())
    }

    async fn delete(&self, id: EventId) -> Result<(), RepoError> {
        self.docs
            .remove(id.as_uuid())
            .map(|_| ())
            .ok_or_else(|| RepoError::not_found("Event", id))
    }

    async fn list(&self) -> Result<Vec<Event>, RepoError> {
        let mut events: Vec<Event> = self.docs.iter().map(|e| e.clone()).collect();
        events.sort_by_key(|e| e.starts_at);
        Ok(events)
    }

    async fn add_speaker_if_absent(
        &self,
        event_id: EventId,
        speaker_id: SpeakerId,
    ) -> Result<LinkOutcome, RepoError> {
        // get_mut holds the shard write guard for the whole mutation.
        match self.docs.get_mut(event_id.as_uuid()) {
            Some(mut event) => Ok(link_outcome(event.add_speaker(speaker_id))),
            None => Err(RepoError::not_found("Event", event_id)),
        }
    }

    async fn remove_speaker_if_present(
        &self,
        event_id: EventId,
        speaker_id: SpeakerId,
    ) -> Result<UnlinkOutcome, RepoError> {
        match self.docs.get_mut(event_id.as_uuid()) {
            Some(mut event) => Ok(unlink_outcome(event.remove_speaker(speaker_id))),
            None => Err(RepoError::not_found("Event", event_id)),
        }
    }
}

#[derive(Default)]
pub struct InMemorySpeakerRepo {
    docs: DashMap<Uuid, Speaker>,
}

#[async_trait]
impl SpeakerRepo for InMemorySpeakerRepo {
    async fn get(&self, id: SpeakerId) -> Result<Option<Speaker>, RepoError> {
        Ok(self.docs.get(id.as_uuid()).map(|s| s.clone()))
    }

    async fn save(&self, speaker: &Speaker) -> Result<(), RepoError> {
        self.docs.insert(speaker.id.to_uuid(), speaker.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Speaker>, RepoError> {
        Ok(self.docs.iter().map(|s| s.clone()).collect())
    }

    async fn add_event_if_absent(
        &self,
        speaker_id: SpeakerId,
        event_id: EventId,
    ) -> Result<LinkOutcome, RepoError> {
        match self.docs.get_mut(speaker_id.as_uuid()) {
            Some(mut speaker) => Ok(link_outcome(speaker.add_event(event_id))),
            None => Err(RepoError::not_found("Speaker", speaker_id)),
        }
    }

    async fn remove_event_if_present(
        &self,
        speaker_id: SpeakerId,
        event_id: EventId,
    ) -> Result<UnlinkOutcome, RepoError> {
        match self.docs.get_mut(speaker_id.as_uuid()) {
            Some(mut speaker) => Ok(unlink_outcome(speaker.remove_event(event_id))),
            None => Err(RepoError::not_found("Speaker", speaker_id)),
        }
    }
}

macro_rules! in_memory_parent_repo {
    ($repo:ident, $trait:ident, $entity:ident, $id:ident, $label:literal) => {
        #[derive(Default)]
        pub struct $repo {
            docs: DashMap<Uuid, $entity>,
        }

        #[async_trait]
        impl $trait for $repo {
            async fn get(&self, id: $id) -> Result<Option<$entity>, RepoError> {
                Ok(self.docs.get(id.as_uuid()).map(|p| p.clone()))
            }

            async fn save(&self, parent: &$entity) -> Result<(), RepoError> {
                self.docs.insert(parent.id.to_uuid(), parent.clone());
                Ok(())
            }

            async fn list(&self) -> Result<Vec<$entity>, RepoError> {
                Ok(self.docs.iter().map(|p| p.clone()).collect())
            }

            async fn add_event_if_absent(
                &self,
                id: $id,
                event_id: EventId,
            ) -> Result<LinkOutcome, RepoError> {
                match self.docs.get_mut(id.as_uuid()) {
                    Some(mut parent) => Ok(link_outcome(parent.add_event(event_id))),
                    None => Err(RepoError::not_found($label, id)),
                }
            }

            async fn remove_event_if_present(
                &self,
                id: $id,
                event_id: EventId,
            ) -> Result<UnlinkOutcome, RepoError> {
                match self.docs.get_mut(id.as_uuid()) {
                    Some(mut parent) => Ok(unlink_outcome(parent.remove_event(event_id))),
                    None => Err(RepoError::not_found($label, id)),
                }
            }
        }
    };
}

in_memory_parent_repo!(
    InMemoryEventTypeRepo,
    EventTypeRepo,
    EventType,
    EventTypeId,
    "EventType"
);
in_memory_parent_repo!(
    InMemoryEventCategoryRepo,
    EventCategoryRepo,
    EventCategory,
    EventCategoryId,
    "EventCategory"
);
in_memory_parent_repo!(
    InMemoryEventStatusRepo,
    EventStatusRepo,
    EventStatus,
    EventStatusId,
    "EventStatus"
);
in_memory_parent_repo!(
    InMemoryEventVenueRepo,
    EventVenueRepo,
    EventVenue,
    EventVenueId,
    "EventVenue"
);

/// All in-memory repositories behind a shared handle.
#[derive(Default, Clone)]
pub struct InMemoryRepositories {
    pub events: Arc<InMemoryEventRepo>,
    pub speakers: Arc<InMemorySpeakerRepo>,
    pub types: Arc<InMemoryEventTypeRepo>,
    pub categories: Arc<InMemoryEventCategoryRepo>,
    pub statuses: Arc<InMemoryEventStatusRepo>,
    pub venues: Arc<InMemoryEventVenueRepo>,
}

impl InMemoryRepositories {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn seeded() -> (InMemoryRepositories, Event, Speaker) {
        let repos = InMemoryRepositories::new();
        let event = Event::new(
            "Launch",
            "Product launch",
            Utc::now(),
            Utc::now(),
            EventTypeId::new(),
            EventCategoryId::new(),
            EventStatusId::new(),
            EventVenueId::new(),
            Utc::now(),
        );
        let speaker = Speaker::new("Ada");
        (repos, event, speaker)
    }

    #[tokio::test]
    async fn add_speaker_distinguishes_added_from_present() {
        let (repos, event, speaker) = seeded();
        repos.events.save(&event).await.expect("save");

        let first = repos
            .events
            .add_speaker_if_absent(event.id, speaker.id)
            .await
            .expect("first add");
        let second = repos
            .events
            .add_speaker_if_absent(event.id, speaker.id)
            .await
            .expect("second add");

        assert_eq!(first, LinkOutcome::Added);
        assert_eq!(second, LinkOutcome::AlreadyPresent);

        let stored = repos.events.get(event.id).await.expect("get").expect("some");
        assert_eq!(stored.speakers, vec![speaker.id]);
    }

    #[tokio::test]
    async fn add_speaker_to_missing_event_is_not_found() {
        let (repos, _, speaker) = seeded();
        let err = repos
            .events
            .add_speaker_if_absent(EventId::new(), speaker.id)
            .await
            .expect_err("missing event");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn remove_speaker_reports_not_present() {
        let (repos, event, speaker) = seeded();
        repos.events.save(&event).await.expect("save");

        let outcome = repos
            .events
            .remove_speaker_if_present(event.id, speaker.id)
            .await
            .expect("remove");
        assert_eq!(outcome, UnlinkOutcome::NotPresent);
    }

    #[tokio::test]
    async fn concurrent_adds_of_same_pair_link_once() {
        let (repos, event, speaker) = seeded();
        repos.events.save(&event).await.expect("save");

        let mut tasks = Vec::new();
        for _ in 0..16 {
            let events = repos.events.clone();
            let (event_id, speaker_id) = (event.id, speaker.id);
            tasks.push(tokio::spawn(async move {
                events.add_speaker_if_absent(event_id, speaker_id).await
            }));
        }

        let mut added = 0;
        for task in tasks {
            if task.await.expect("join").expect("add") == LinkOutcome::Added {
                added += 1;
            }
        }

        assert_eq!(added, 1);
        let stored = repos.events.get(event.id).await.expect("get").expect("some");
        assert_eq!(
            stored.speakers.iter().filter(|s| **s == speaker.id).count(),
            1
        );
    }

    #[tokio::test]
    async fn concurrent_adds_of_different_speakers_keep_both() {
        let (repos, event, _) = seeded();
        repos.events.save(&event).await.expect("save");

        let a = SpeakerId::new();
        let b = SpeakerId::new();
        let events_a = repos.events.clone();
        let events_b = repos.events.clone();
        let event_id = event.id;

        let (ra, rb) = tokio::join!(
            tokio::spawn(async move { events_a.add_speaker_if_absent(event_id, a).await }),
            tokio::spawn(async move { events_b.add_speaker_if_absent(event_id, b).await }),
        );
        ra.expect("join").expect("add a");
        rb.expect("join").expect("add b");

        let stored = repos.events.get(event.id).await.expect("get").expect("some");
        assert!(stored.speakers.contains(&a));
        assert!(stored.speakers.contains(&b));
    }
}
