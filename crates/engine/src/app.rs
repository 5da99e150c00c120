//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    clock::SystemClock,
    memory::InMemoryRepositories,
    neo4j::Neo4jRepositories,
    ports::{
        ClockPort, EventCategoryRepo, EventRepo, EventStatusRepo, EventTypeRepo, EventVenueRepo,
        SpeakerRepo,
    },
};
use crate::use_cases::{
    AssignSpeaker, CreateEvent, DeleteEvent, ListEventSpeakers, ListEvents, ParentFanOut,
};

/// Container for the repository ports, one per entity kind.
#[derive(Clone)]
pub struct Repositories {
    pub events: Arc<dyn EventRepo>,
    pub speakers: Arc<dyn SpeakerRepo>,
    pub types: Arc<dyn EventTypeRepo>,
    pub categories: Arc<dyn EventCategoryRepo>,
    pub statuses: Arc<dyn EventStatusRepo>,
    pub venues: Arc<dyn EventVenueRepo>,
}

impl Repositories {
    pub fn neo4j(graph: neo4rs::Graph) -> Self {
        let repos = Neo4jRepositories::new(graph);
        Self {
            events: repos.events,
            speakers: repos.speakers,
            types: repos.types,
            categories: repos.categories,
            statuses: repos.statuses,
            venues: repos.venues,
        }
    }

    pub fn in_memory() -> Self {
        let repos = InMemoryRepositories::new();
        Self {
            events: repos.events,
            speakers: repos.speakers,
            types: repos.types,
            categories: repos.categories,
            statuses: repos.statuses,
            venues: repos.venues,
        }
    }
}

/// Container for all use cases.
pub struct UseCases {
    pub create_event: CreateEvent,
    pub assign_speaker: AssignSpeaker,
    pub delete_event: DeleteEvent,
    pub list_events: ListEvents,
    pub list_event_speakers: ListEventSpeakers,
}

/// Main application state, passed to HTTP handlers via Axum state.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
}

impl App {
    pub fn new(repositories: Repositories, clock: Arc<dyn ClockPort>) -> Self {
        let fan_out = Arc::new(ParentFanOut::new(
            repositories.types.clone(),
            repositories.categories.clone(),
            repositories.statuses.clone(),
            repositories.venues.clone(),
        ));

        let use_cases = UseCases {
            create_event: CreateEvent::new(
                repositories.events.clone(),
                fan_out.clone(),
                clock,
            ),
            assign_speaker: AssignSpeaker::new(
                repositories.events.clone(),
                repositories.speakers.clone(),
            ),
            delete_event: DeleteEvent::new(
                repositories.events.clone(),
                repositories.speakers.clone(),
                fan_out,
            ),
            list_events: ListEvents::new(
                repositories.events.clone(),
                repositories.types.clone(),
                repositories.categories.clone(),
                repositories.statuses.clone(),
                repositories.venues.clone(),
            ),
            list_event_speakers: ListEventSpeakers::new(
                repositories.events.clone(),
                repositories.speakers.clone(),
            ),
        };

        Self {
            repositories,
            use_cases,
        }
    }

    /// App over the in-memory store with the system clock. Data is volatile.
    pub fn in_memory() -> Self {
        Self::new(Repositories::in_memory(), Arc::new(SystemClock))
    }
}
