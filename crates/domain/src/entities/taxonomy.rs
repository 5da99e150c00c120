//! Singular parent entities an Event fans out to.
//!
//! Each of the four kinds is a flat label document plus a back-reference set
//! of event ids, maintained by the fan-out legs at event creation/deletion.

use serde::{Deserialize, Serialize};

use crate::ids::{EventCategoryId, EventId, EventStatusId, EventTypeId, EventVenueId};

macro_rules! define_parent {
    ($name:ident, $id:ident) => {
        #[derive(Debug, Clone, Serialize, Deserialize)]
        pub struct $name {
            pub id: $id,
            pub name: String,
            /// Back-reference set; mirrored by `Event`'s singular parent id.
            pub events: Vec<EventId>,
        }

        impl $name {
            pub fn new(name: impl Into<String>) -> Self {
                Self {
                    id: $id::new(),
                    name: name.into(),
                    events: Vec::new(),
                }
            }

            /// Add an event id to the back-reference set if absent. Returns
            /// whether the set changed.
            pub fn add_event(&mut self, event_id: EventId) -> bool {
                if self.events.contains(&event_id) {
                    return false;
                }
                self.events.push(event_id);
                true
            }

            /// Remove an event id from the back-reference set if present.
            /// Returns whether the set changed.
            pub fn remove_event(&mut self, event_id: EventId) -> bool {
                let before = self.events.len();
                self.events.retain(|e| *e != event_id);
                self.events.len() != before
            }
        }
    };
}

define_parent!(EventType, EventTypeId);
define_parent!(EventCategory, EventCategoryId);
define_parent!(EventStatus, EventStatusId);
define_parent!(EventVenue, EventVenueId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_reference_set_is_unique() {
        let mut venue = EventVenue::new("Main Hall");
        let event_id = EventId::new();
        assert!(venue.add_event(event_id));
        assert!(!venue.add_event(event_id));
        assert_eq!(venue.events, vec![event_id]);
        assert!(venue.remove_event(event_id));
        assert!(venue.events.is_empty());
    }
}
