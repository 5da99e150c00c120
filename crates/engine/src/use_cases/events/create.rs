//! Create event use case.
//!
//! Creation and fan-out are separate consistency domains: the event is
//! considered created once its own document is persisted, and the per-parent
//! fan-out report is returned alongside it rather than folded into the
//! success/failure of the creation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use eventdesk_domain::{
    schedule, DomainError, Event, EventCategoryId, EventStatusId, EventTypeId, EventVenueId,
};

use super::fan_out::{FanOutReport, ParentFanOut};
use super::EventError;
use crate::infrastructure::ports::{ClockPort, EventRepo};

/// Staff-UI creation payload. Dates arrive as `DD/MM/YYYY`, times as
/// `HH:MM AM/PM`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventInput {
    pub name: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub is_all_day: bool,
    pub type_id: EventTypeId,
    pub category_id: EventCategoryId,
    pub status_id: EventStatusId,
    pub venue_id: EventVenueId,
}

/// A persisted event plus the per-parent outcomes of its fan-out pass.
#[derive(Debug, Serialize)]
pub struct CreatedEvent {
    pub event: Event,
    pub fan_out: FanOutReport,
}

pub struct CreateEvent {
    events: Arc<dyn EventRepo>,
    fan_out: Arc<ParentFanOut>,
    clock: Arc<dyn ClockPort>,
}

impl CreateEvent {
    pub fn new(
        events: Arc<dyn EventRepo>,
        fan_out: Arc<ParentFanOut>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            events,
            fan_out,
            clock,
        }
    }

    pub async fn execute(&self, input: CreateEventInput) -> Result<CreatedEvent, EventError> {
        if input.name.trim().is_empty() {
            return Err(DomainError::validation("event name cannot be empty").into());
        }

        // Nothing persists until both dates normalize.
        let event = if input.is_all_day {
            let starts_at = schedule::normalize(&input.start_date, None)?;
            let ends_at = schedule::normalize(&input.end_date, None)?;
            Event::new(
                input.name,
                input.description,
                starts_at,
                ends_at,
                input.type_id,
                input.category_id,
                input.status_id,
                input.venue_id,
                self.clock.now(),
            )
        } else {
            let start_time = required_time(input.start_time.as_deref(), "start_time")?;
            let end_time = required_time(input.end_time.as_deref(), "end_time")?;
            let starts_at = schedule::normalize(&input.start_date, Some(start_time))?;
            let ends_at = schedule::normalize(&input.end_date, Some(end_time))?;
            Event::new(
                input.name,
                input.description,
                starts_at,
                ends_at,
                input.type_id,
                input.category_id,
                input.status_id,
                input.venue_id,
                self.clock.now(),
            )
            .with_times(start_time, end_time)
        };

        self.events.save(&event).await?;
        tracing::info!(event_id = %event.id, name = %event.name, "event created");

        let fan_out = self.fan_out.link(&event).await;
        if !fan_out.is_complete() {
            tracing::warn!(event_id = %event.id, "event created with incomplete fan-out");
        }

        Ok(CreatedEvent { event, fan_out })
    }
}

fn required_time<'a>(time: Option<&'a str>, field: &str) -> Result<&'a str, DomainError> {
    time.map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| DomainError::validation(format!("{field} is required for timed events")))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use mockall::predicate::always;

    use eventdesk_domain::schedule::MIDNIGHT_DISPLAY;
    use eventdesk_domain::{EventCategory, EventStatus, EventType, EventVenue};

    use super::*;
    use crate::infrastructure::memory::InMemoryRepositories;
    use crate::infrastructure::ports::{
        EventCategoryRepo as _, EventRepo as _, EventStatusRepo as _, EventTypeRepo as _,
        EventVenueRepo as _, MockClockPort, MockEventRepo,
    };

    struct Fixture {
        repos: InMemoryRepositories,
        type_id: EventTypeId,
        category_id: EventCategoryId,
        status_id: EventStatusId,
        venue_id: EventVenueId,
    }

    async fn fixture() -> Fixture {
        let repos = InMemoryRepositories::new();
        let event_type = EventType::new("Conference");
        let category = EventCategory::new("Tech");
        let status = EventStatus::new("Published");
        let venue = EventVenue::new("Main Hall");
        repos.types.save(&event_type).await.expect("save type");
        repos.categories.save(&category).await.expect("save category");
        repos.statuses.save(&status).await.expect("save status");
        repos.venues.save(&venue).await.expect("save venue");
        Fixture {
            type_id: event_type.id,
            category_id: category.id,
            status_id: status.id,
            venue_id: venue.id,
            repos,
        }
    }

    fn use_case(fx: &Fixture) -> CreateEvent {
        let mut clock = MockClockPort::new();
        clock
            .expect_now()
            .returning(|| Utc.with_ymd_and_hms(2016, 9, 30, 14, 55, 0).unwrap());
        CreateEvent::new(
            fx.repos.events.clone(),
            Arc::new(ParentFanOut::new(
                fx.repos.types.clone(),
                fx.repos.categories.clone(),
                fx.repos.statuses.clone(),
                fx.repos.venues.clone(),
            )),
            Arc::new(clock),
        )
    }

    fn input(fx: &Fixture) -> CreateEventInput {
        CreateEventInput {
            name: "Launch".into(),
            description: "Product launch".into(),
            start_date: "07/09/2016".into(),
            end_date: "07/09/2016".into(),
            start_time: Some("09:00 AM".into()),
            end_time: Some("05:00 PM".into()),
            is_all_day: false,
            type_id: fx.type_id,
            category_id: fx.category_id,
            status_id: fx.status_id,
            venue_id: fx.venue_id,
        }
    }

    #[tokio::test]
    async fn timed_event_normalizes_supplied_times() {
        let fx = fixture().await;
        let created = use_case(&fx).execute(input(&fx)).await.expect("create");

        assert!(!created.event.is_all_day);
        assert_eq!(
            created.event.starts_at,
            Utc.with_ymd_and_hms(2016, 9, 7, 9, 0, 0).unwrap()
        );
        assert_eq!(
            created.event.ends_at,
            Utc.with_ymd_and_hms(2016, 9, 7, 17, 0, 0).unwrap()
        );
        assert_eq!(created.event.start_time, "09:00 AM");
    }

    #[tokio::test]
    async fn all_day_event_pins_display_times_to_midnight() {
        let fx = fixture().await;
        let mut all_day = input(&fx);
        all_day.is_all_day = true;
        all_day.start_time = Some("09:00 AM".into());

        let created = use_case(&fx).execute(all_day).await.expect("create");

        assert!(created.event.is_all_day);
        assert_eq!(created.event.start_time, MIDNIGHT_DISPLAY);
        assert_eq!(created.event.end_time, MIDNIGHT_DISPLAY);
        assert_eq!(
            created.event.starts_at,
            Utc.with_ymd_and_hms(2016, 9, 7, 0, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn fan_out_registers_event_with_each_parent_exactly_once() {
        let fx = fixture().await;
        let created = use_case(&fx).execute(input(&fx)).await.expect("create");

        assert!(created.fan_out.is_complete());
        for events in [
            fx.repos.types.get(fx.type_id).await.expect("get").expect("some").events,
            fx.repos
                .categories
                .get(fx.category_id)
                .await
                .expect("get")
                .expect("some")
                .events,
            fx.repos
                .statuses
                .get(fx.status_id)
                .await
                .expect("get")
                .expect("some")
                .events,
            fx.repos.venues.get(fx.venue_id).await.expect("get").expect("some").events,
        ] {
            assert_eq!(events, vec![created.event.id]);
        }
    }

    #[tokio::test]
    async fn creation_survives_failed_fan_out_leg() {
        let fx = fixture().await;
        let mut missing_venue = input(&fx);
        missing_venue.venue_id = EventVenueId::new();

        let created = use_case(&fx)
            .execute(missing_venue)
            .await
            .expect("creation still succeeds");

        assert!(!created.fan_out.is_complete());
        let stored = fx
            .repos
            .events
            .get(created.event.id)
            .await
            .expect("get")
            .expect("event persisted");
        assert_eq!(stored.name, "Launch");
    }

    #[tokio::test]
    async fn invalid_date_fails_before_anything_persists() {
        let fx = fixture().await;
        let mut events = MockEventRepo::new();
        events.expect_save().with(always()).never();
        let mut clock = MockClockPort::new();
        clock.expect_now().returning(Utc::now);

        let use_case = CreateEvent::new(
            Arc::new(events),
            Arc::new(ParentFanOut::new(
                fx.repos.types.clone(),
                fx.repos.categories.clone(),
                fx.repos.statuses.clone(),
                fx.repos.venues.clone(),
            )),
            Arc::new(clock),
        );

        let mut bad = input(&fx);
        bad.start_date = "2016-09-07".into();
        let err = use_case.execute(bad).await.expect_err("invalid date");
        assert!(matches!(
            err,
            EventError::Domain(DomainError::InvalidDate(_))
        ));
    }

    #[tokio::test]
    async fn timed_event_without_times_is_rejected() {
        let fx = fixture().await;
        let mut no_times = input(&fx);
        no_times.start_time = None;

        let err = use_case(&fx)
            .execute(no_times)
            .await
            .expect_err("missing time");
        assert!(matches!(err, EventError::Domain(DomainError::Validation(_))));
    }
}
