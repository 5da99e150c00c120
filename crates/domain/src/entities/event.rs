//! Event entity - the center of the relationship graph.
//!
//! An Event holds singular references to its four parents (type, category,
//! status, venue) and denormalized id sets for its speakers, feedback and
//! RSVPs. Every referencing entity mirrors the link with a back-reference,
//! so all link mutations go through the repository ports rather than plain
//! field writes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{
    EventCategoryId, EventId, EventStatusId, EventTypeId, EventVenueId, FeedbackId, RsvpId,
    SpeakerId,
};
use crate::schedule::MIDNIGHT_DISPLAY;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub description: String,
    /// Canonical UTC timestamps derived by `schedule::normalize`.
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    /// UI-facing `HH:MM AM/PM` display times; pinned to midnight for all-day.
    pub start_time: String,
    pub end_time: String,
    pub is_all_day: bool,
    pub type_id: EventTypeId,
    pub category_id: EventCategoryId,
    pub status_id: EventStatusId,
    pub venue_id: EventVenueId,
    /// Speaker back-reference set; mirrored by `Speaker::events`.
    pub speakers: Vec<SpeakerId>,
    pub feedback: Vec<FeedbackId>,
    pub rsvps: Vec<RsvpId>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        type_id: EventTypeId,
        category_id: EventCategoryId,
        status_id: EventStatusId,
        venue_id: EventVenueId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: EventId::new(),
            name: name.into(),
            description: description.into(),
            starts_at,
            ends_at,
            start_time: MIDNIGHT_DISPLAY.to_string(),
            end_time: MIDNIGHT_DISPLAY.to_string(),
            is_all_day: true,
            type_id,
            category_id,
            status_id,
            venue_id,
            speakers: Vec::new(),
            feedback: Vec::new(),
            rsvps: Vec::new(),
            created_at,
        }
    }

    /// Switch the event to timed mode with explicit display times.
    pub fn with_times(mut self, start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        self.start_time = start_time.into();
        self.end_time = end_time.into();
        self.is_all_day = false;
        self
    }

    /// Add a speaker id to the local set if absent. Returns whether the set
    /// changed. Storage adapters use this as the in-memory half of their
    /// conditional-update primitive.
    pub fn add_speaker(&mut self, speaker_id: SpeakerId) -> bool {
        if self.speakers.contains(&speaker_id) {
            return false;
        }
        self.speakers.push(speaker_id);
        true
    }

    /// Remove a speaker id from the local set if present. Returns whether the
    /// set changed.
    pub fn remove_speaker(&mut self, speaker_id: SpeakerId) -> bool {
        let before = self.speakers.len();
        self.speakers.retain(|s| *s != speaker_id);
        self.speakers.len() != before
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn test_event() -> Event {
        let day = Utc.with_ymd_and_hms(2016, 9, 7, 0, 0, 0).unwrap();
        Event::new(
            "Launch",
            "Product launch",
            day,
            day,
            EventTypeId::new(),
            EventCategoryId::new(),
            EventStatusId::new(),
            EventVenueId::new(),
            Utc::now(),
        )
    }

    #[test]
    fn new_event_defaults_to_all_day() {
        let event = test_event();
        assert!(event.is_all_day);
        assert_eq!(event.start_time, MIDNIGHT_DISPLAY);
        assert_eq!(event.end_time, MIDNIGHT_DISPLAY);
    }

    #[test]
    fn with_times_clears_all_day() {
        let event = test_event().with_times("09:00 AM", "05:00 PM");
        assert!(!event.is_all_day);
        assert_eq!(event.start_time, "09:00 AM");
    }

    #[test]
    fn add_speaker_is_set_like() {
        let mut event = test_event();
        let speaker = SpeakerId::new();
        assert!(event.add_speaker(speaker));
        assert!(!event.add_speaker(speaker));
        assert_eq!(event.speakers.len(), 1);
    }

    #[test]
    fn remove_speaker_reports_change() {
        let mut event = test_event();
        let speaker = SpeakerId::new();
        event.add_speaker(speaker);
        assert!(event.remove_speaker(speaker));
        assert!(!event.remove_speaker(speaker));
        assert!(event.speakers.is_empty());
    }
}
