//! Use cases - request orchestration over the repository ports.

pub mod events;

pub use events::{
    AssignSpeaker, AssignedSpeaker, CreateEvent, CreateEventInput, CreatedEvent, DeleteEvent,
    EventError, EventView, FanOutReport, LegStatus, ListEventSpeakers, ListEvents, ParentFanOut,
    ParentKind, RetractionReport,
};
