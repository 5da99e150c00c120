//! Parent fan-out - registering an event id with its four singular parents.
//!
//! Each leg is an independent, idempotent conditional update against one
//! parent document. There is no cross-document transaction: a failed leg is
//! recorded in the report and left for the caller to retry; the other legs
//! are never rolled back.

use std::sync::Arc;

use serde::Serialize;

use eventdesk_domain::Event;

use crate::infrastructure::ports::{
    EventCategoryRepo, EventStatusRepo, EventTypeRepo, EventVenueRepo, LinkOutcome, RepoError,
    UnlinkOutcome,
};

/// Which of the four singular parents a leg targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentKind {
    Type,
    Category,
    Status,
    Venue,
}

impl std::fmt::Display for ParentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Type => write!(f, "type"),
            Self::Category => write!(f, "category"),
            Self::Status => write!(f, "status"),
            Self::Venue => write!(f, "venue"),
        }
    }
}

/// Terminal state of one leg of a multi-target update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LegStatus {
    Added,
    AlreadyPresent,
    Removed,
    NotPresent,
    Failed { error: String },
}

impl LegStatus {
    pub fn succeeded(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    pub fn from_link(result: Result<LinkOutcome, RepoError>) -> Self {
        match result {
            Ok(LinkOutcome::Added) => Self::Added,
            Ok(LinkOutcome::AlreadyPresent) => Self::AlreadyPresent,
            Err(e) => Self::Failed {
                error: e.to_string(),
            },
        }
    }

    pub fn from_unlink(result: Result<UnlinkOutcome, RepoError>) -> Self {
        match result {
            Ok(UnlinkOutcome::Removed) => Self::Removed,
            Ok(UnlinkOutcome::NotPresent) => Self::NotPresent,
            Err(e) => Self::Failed {
                error: e.to_string(),
            },
        }
    }
}

/// One parent-side leg of a fan-out pass.
#[derive(Debug, Clone, Serialize)]
pub struct ParentLeg {
    pub parent: ParentKind,
    pub target: String,
    #[serde(flatten)]
    pub status: LegStatus,
}

/// Per-leg outcomes of a fan-out pass. Never hides a failed leg.
#[derive(Debug, Clone, Serialize)]
pub struct FanOutReport {
    pub legs: Vec<ParentLeg>,
}

impl FanOutReport {
    /// True when every leg completed (added, removed, or already in the
    /// desired state).
    pub fn is_complete(&self) -> bool {
        self.legs.iter().all(|leg| leg.status.succeeded())
    }
}

/// Fans an event id out to its type, category, status and venue documents.
pub struct ParentFanOut {
    types: Arc<dyn EventTypeRepo>,
    categories: Arc<dyn EventCategoryRepo>,
    statuses: Arc<dyn EventStatusRepo>,
    venues: Arc<dyn EventVenueRepo>,
}

impl ParentFanOut {
    pub fn new(
        types: Arc<dyn EventTypeRepo>,
        categories: Arc<dyn EventCategoryRepo>,
        statuses: Arc<dyn EventStatusRepo>,
        venues: Arc<dyn EventVenueRepo>,
    ) -> Self {
        Self {
            types,
            categories,
            statuses,
            venues,
        }
    }

    /// Register `event.id` with all four parents.
    pub async fn link(&self, event: &Event) -> FanOutReport {
        let mut legs = Vec::with_capacity(4);
        record(
            &mut legs,
            ParentKind::Type,
            event.type_id.to_string(),
            LegStatus::from_link(self.types.add_event_if_absent(event.type_id, event.id).await),
        );
        record(
            &mut legs,
            ParentKind::Category,
            event.category_id.to_string(),
            LegStatus::from_link(
                self.categories
                    .add_event_if_absent(event.category_id, event.id)
                    .await,
            ),
        );
        record(
            &mut legs,
            ParentKind::Status,
            event.status_id.to_string(),
            LegStatus::from_link(
                self.statuses
                    .add_event_if_absent(event.status_id, event.id)
                    .await,
            ),
        );
        record(
            &mut legs,
            ParentKind::Venue,
            event.venue_id.to_string(),
            LegStatus::from_link(
                self.venues
                    .add_event_if_absent(event.venue_id, event.id)
                    .await,
            ),
        );
        FanOutReport { legs }
    }

    /// Retract `event.id` from all four parents.
    pub async fn unlink(&self, event: &Event) -> FanOutReport {
        let mut legs = Vec::with_capacity(4);
        record(
            &mut legs,
            ParentKind::Type,
            event.type_id.to_string(),
            LegStatus::from_unlink(
                self.types
                    .remove_event_if_present(event.type_id, event.id)
                    .await,
            ),
        );
        record(
            &mut legs,
            ParentKind::Category,
            event.category_id.to_string(),
            LegStatus::from_unlink(
                self.categories
                    .remove_event_if_present(event.category_id, event.id)
                    .await,
            ),
        );
        record(
            &mut legs,
            ParentKind::Status,
            event.status_id.to_string(),
            LegStatus::from_unlink(
                self.statuses
                    .remove_event_if_present(event.status_id, event.id)
                    .await,
            ),
        );
        record(
            &mut legs,
            ParentKind::Venue,
            event.venue_id.to_string(),
            LegStatus::from_unlink(
                self.venues
                    .remove_event_if_present(event.venue_id, event.id)
                    .await,
            ),
        );
        FanOutReport { legs }
    }
}

fn record(legs: &mut Vec<ParentLeg>, parent: ParentKind, target: String, status: LegStatus) {
    if let LegStatus::Failed { error } = &status {
        tracing::warn!(%parent, %target, %error, "fan-out leg failed");
    }
    legs.push(ParentLeg {
        parent,
        target,
        status,
    });
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use eventdesk_domain::{
        EventCategory, EventCategoryId, EventStatus, EventStatusId, EventType, EventTypeId,
        EventVenue, EventVenueId,
    };

    use super::*;
    use crate::infrastructure::memory::InMemoryRepositories;
    use crate::infrastructure::ports::{
        EventCategoryRepo as _, EventStatusRepo as _, EventTypeRepo as _, EventVenueRepo as _,
    };

    fn fan_out(repos: &InMemoryRepositories) -> ParentFanOut {
        ParentFanOut::new(
            repos.types.clone(),
            repos.categories.clone(),
            repos.statuses.clone(),
            repos.venues.clone(),
        )
    }

    async fn seeded_parents(
        repos: &InMemoryRepositories,
    ) -> (EventTypeId, EventCategoryId, EventStatusId, EventVenueId) {
        let event_type = EventType::new("Conference");
        let category = EventCategory::new("Tech");
        let status = EventStatus::new("Published");
        let venue = EventVenue::new("Main Hall");
        repos.types.save(&event_type).await.expect("save type");
        repos.categories.save(&category).await.expect("save category");
        repos.statuses.save(&status).await.expect("save status");
        repos.venues.save(&venue).await.expect("save venue");
        (event_type.id, category.id, status.id, venue.id)
    }

    fn test_event(
        ids: (EventTypeId, EventCategoryId, EventStatusId, EventVenueId),
    ) -> Event {
        Event::new(
            "Launch",
            "Product launch",
            Utc::now(),
            Utc::now(),
            ids.0,
            ids.1,
            ids.2,
            ids.3,
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn link_registers_event_with_all_four_parents() {
        let repos = InMemoryRepositories::new();
        let ids = seeded_parents(&repos).await;
        let event = test_event(ids);

        let report = fan_out(&repos).link(&event).await;

        assert!(report.is_complete());
        assert_eq!(report.legs.len(), 4);
        let event_type = repos.types.get(ids.0).await.expect("get").expect("some");
        assert_eq!(event_type.events, vec![event.id]);
        let venue = repos.venues.get(ids.3).await.expect("get").expect("some");
        assert_eq!(venue.events, vec![event.id]);
    }

    #[tokio::test]
    async fn relink_is_idempotent() {
        let repos = InMemoryRepositories::new();
        let ids = seeded_parents(&repos).await;
        let event = test_event(ids);
        let coordinator = fan_out(&repos);

        coordinator.link(&event).await;
        let second = coordinator.link(&event).await;

        assert!(second.is_complete());
        assert!(second
            .legs
            .iter()
            .all(|leg| leg.status == LegStatus::AlreadyPresent));
        let status = repos.statuses.get(ids.2).await.expect("get").expect("some");
        assert_eq!(status.events.len(), 1);
    }

    #[tokio::test]
    async fn missing_parent_fails_only_its_leg() {
        let repos = InMemoryRepositories::new();
        let (type_id, category_id, status_id, _) = seeded_parents(&repos).await;
        // Venue id that was never saved.
        let event = test_event((type_id, category_id, status_id, EventVenueId::new()));

        let report = fan_out(&repos).link(&event).await;

        assert!(!report.is_complete());
        let failed: Vec<_> = report
            .legs
            .iter()
            .filter(|leg| !leg.status.succeeded())
            .collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].parent, ParentKind::Venue);
        // The other three legs still committed.
        let category = repos
            .categories
            .get(category_id)
            .await
            .expect("get")
            .expect("some");
        assert_eq!(category.events, vec![event.id]);
    }

    #[tokio::test]
    async fn unlink_retracts_from_all_parents() {
        let repos = InMemoryRepositories::new();
        let ids = seeded_parents(&repos).await;
        let event = test_event(ids);
        let coordinator = fan_out(&repos);

        coordinator.link(&event).await;
        let report = coordinator.unlink(&event).await;

        assert!(report.is_complete());
        assert!(report
            .legs
            .iter()
            .all(|leg| leg.status == LegStatus::Removed));
        let event_type = repos.types.get(ids.0).await.expect("get").expect("some");
        assert!(event_type.events.is_empty());
    }
}
