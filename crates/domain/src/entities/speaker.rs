//! Speaker entity.

use serde::{Deserialize, Serialize};

use crate::ids::{EventId, SpeakerId};

/// A person who can be attached to events. Carries the mirror side of the
/// Event↔Speaker relationship as a set of event ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Speaker {
    pub id: SpeakerId,
    pub name: String,
    /// Short bio shown on the event page.
    pub profile: Option<String>,
    pub events: Vec<EventId>,
}

impl Speaker {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: SpeakerId::new(),
            name: name.into(),
            profile: None,
            events: Vec::new(),
        }
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Add an event id to the local set if absent. Returns whether the set
    /// changed.
    pub fn add_event(&mut self, event_id: EventId) -> bool {
        if self.events.contains(&event_id) {
            return false;
        }
        self.events.push(event_id);
        true
    }

    /// Remove an event id from the local set if present. Returns whether the
    /// set changed.
    pub fn remove_event(&mut self, event_id: EventId) -> bool {
        let before = self.events.len();
        self.events.retain(|e| *e != event_id);
        self.events.len() != before
    }
}
