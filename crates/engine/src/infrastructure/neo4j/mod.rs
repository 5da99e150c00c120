//! Neo4j database implementations.

use neo4rs::{query, Graph};
use std::sync::Arc;

mod helpers;

mod event_repo;
mod parent_repo;
mod speaker_repo;

pub use event_repo::Neo4jEventRepo;
pub use parent_repo::{
    Neo4jEventCategoryRepo, Neo4jEventStatusRepo, Neo4jEventTypeRepo, Neo4jEventVenueRepo,
};
pub use speaker_repo::Neo4jSpeakerRepo;

/// Create all Neo4j repositories from a graph connection.
pub struct Neo4jRepositories {
    pub events: Arc<Neo4jEventRepo>,
    pub speakers: Arc<Neo4jSpeakerRepo>,
    pub types: Arc<Neo4jEventTypeRepo>,
    pub categories: Arc<Neo4jEventCategoryRepo>,
    pub statuses: Arc<Neo4jEventStatusRepo>,
    pub venues: Arc<Neo4jEventVenueRepo>,
}

impl Neo4jRepositories {
    pub fn new(graph: Graph) -> Self {
        Self {
            events: Arc::new(Neo4jEventRepo::new(graph.clone())),
            speakers: Arc::new(Neo4jSpeakerRepo::new(graph.clone())),
            types: Arc::new(Neo4jEventTypeRepo::new(graph.clone())),
            categories: Arc::new(Neo4jEventCategoryRepo::new(graph.clone())),
            statuses: Arc::new(Neo4jEventStatusRepo::new(graph.clone())),
            venues: Arc::new(Neo4jEventVenueRepo::new(graph)),
        }
    }
}

/// Initialize Neo4j schema with required constraints.
///
/// This should be called once on startup. Constraints are created with
/// IF NOT EXISTS to be idempotent. The id-uniqueness constraints are what
/// make the MERGE-based link primitives race-free: MERGE against a unique
/// property takes the node lock instead of creating a duplicate.
pub async fn ensure_schema(graph: &Graph) -> Result<(), neo4rs::Error> {
    for (constraint, label) in [
        ("event_id_unique", "Event"),
        ("speaker_id_unique", "Speaker"),
        ("event_type_id_unique", "EventType"),
        ("event_category_id_unique", "EventCategory"),
        ("event_status_id_unique", "EventStatus"),
        ("event_venue_id_unique", "EventVenue"),
    ] {
        graph
            .run(query(&format!(
                "CREATE CONSTRAINT {constraint} IF NOT EXISTS
                 FOR (n:{label}) REQUIRE n.id IS UNIQUE"
            )))
            .await?;
    }

    tracing::info!("Neo4j schema initialized (constraints ensured)");
    Ok(())
}
