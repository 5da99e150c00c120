//! Neo4j repositories for the four singular parent kinds.
//!
//! The kinds (type, category, status, venue) share one node shape: a label
//! document plus a `(p)-[:LISTS_EVENT]->(e:Event)` edge per back-referenced
//! event. `ParentNodes` carries the label-generic Cypher; a macro stamps out
//! the typed repo per port trait.

use neo4rs::{query, Graph};
use uuid::Uuid;

use async_trait::async_trait;
use eventdesk_domain::{
    EventCategory, EventCategoryId, EventId, EventStatus, EventStatusId, EventType, EventTypeId,
    EventVenue, EventVenueId,
};

use super::helpers::{parse_id_list, NodeExt};
use crate::infrastructure::ports::{
    EventCategoryRepo, EventStatusRepo, EventTypeRepo, EventVenueRepo, LinkOutcome, RepoError,
    UnlinkOutcome,
};

/// Raw node data shared by all parent kinds.
pub(super) struct RawParent {
    pub id: Uuid,
    pub name: String,
    pub events: Vec<EventId>,
}

/// Label-generic node operations. The label is a static literal baked into
/// the query text; only values travel as parameters.
pub(super) struct ParentNodes {
    graph: Graph,
    label: &'static str,
}

impl ParentNodes {
    fn new(graph: Graph, label: &'static str) -> Self {
        Self { graph, label }
    }

    fn row_to_raw(row: &neo4rs::Row) -> Result<RawParent, RepoError> {
        let node: neo4rs::Node = row
            .get("p")
            .map_err(|e| RepoError::database("row_to_parent", e))?;
        let event_ids: Vec<String> = row.get("event_ids").unwrap_or_default();

        Ok(RawParent {
            id: node.get_uuid("id")?,
            name: node.get_string_or("name", ""),
            events: parse_id_list(event_ids)?,
        })
    }

    async fn get(&self, id: Uuid) -> Result<Option<RawParent>, RepoError> {
        let q = query(&format!(
            "MATCH (p:{label} {{id: $id}})
            OPTIONAL MATCH (p)-[:LISTS_EVENT]->(e:Event)
            RETURN p, collect(e.id) AS event_ids",
            label = self.label
        ))
        .param("id", id.to_string());

        let mut result = self
            .graph
            .execute(q)
            .await
            .map_err(|e| RepoError::database("get_parent", e))?;

        match result
            .next()
            .await
            .map_err(|e| RepoError::database("get_parent", e))?
        {
            Some(row) => Ok(Some(Self::row_to_raw(&row)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, id: Uuid, name: &str) -> Result<(), RepoError> {
        let q = query(&format!(
            "MERGE (p:{label} {{id: $id}}) SET p.name = $name",
            label = self.label
        ))
        .param("id", id.to_string())
        .param("name", name.to_string());

        self.graph
            .run(q)
            .await
            .map_err(|e| RepoError::database("save_parent", e))
    }

    async fn list(&self) -> Result<Vec<RawParent>, RepoError> {
        let q = query(&format!(
            "MATCH (p:{label})
            OPTIONAL MATCH (p)-[:LISTS_EVENT]->(e:Event)
            RETURN p, collect(e.id) AS event_ids
            ORDER BY p.name",
            label = self.label
        ));

        let mut result = self
            .graph
            .execute(q)
            .await
            .map_err(|e| RepoError::database("list_parents", e))?;

        let mut parents = Vec::new();
        while let Some(row) = result
            .next()
            .await
            .map_err(|e| RepoError::database("list_parents", e))?
        {
            parents.push(Self::row_to_raw(&row)?);
        }
        Ok(parents)
    }

    async fn add_event_if_absent(
        &self,
        id: Uuid,
        event_id: EventId,
    ) -> Result<LinkOutcome, RepoError> {
        let q = query(&format!(
            "MATCH (p:{label} {{id: $id}})
            MATCH (e:Event {{id: $event_id}})
            MERGE (p)-[r:LISTS_EVENT]->(e)
            ON CREATE SET r.created_now = true
            ON MATCH SET r.created_now = false
            RETURN r.created_now AS added",
            label = self.label
        ))
        .param("id", id.to_string())
        .param("event_id", event_id.to_string());

        let mut result = self
            .graph
            .execute(q)
            .await
            .map_err(|e| RepoError::database("link_parent", e))?;

        match result
            .next()
            .await
            .map_err(|e| RepoError::database("link_parent", e))?
        {
            Some(row) => {
                let added: bool = row.get("added").unwrap_or(false);
                Ok(if added {
                    LinkOutcome::Added
                } else {
                    LinkOutcome::AlreadyPresent
                })
            }
            None => Err(self.missing_side(id, event_id).await?),
        }
    }

    async fn remove_event_if_present(
        &self,
        id: Uuid,
        event_id: EventId,
    ) -> Result<UnlinkOutcome, RepoError> {
        let q = query(&format!(
            "MATCH (p:{label} {{id: $id}})
            MATCH (e:Event {{id: $event_id}})
            OPTIONAL MATCH (p)-[r:LISTS_EVENT]->(e)
            WITH r, (r IS NOT NULL) AS existed
            DELETE r
            RETURN existed",
            label = self.label
        ))
        .param("id", id.to_string())
        .param("event_id", event_id.to_string());

        let mut result = self
            .graph
            .execute(q)
            .await
            .map_err(|e| RepoError::database("unlink_parent", e))?;

        match result
            .next()
            .await
            .map_err(|e| RepoError::database("unlink_parent", e))?
        {
            Some(row) => {
                let existed: bool = row.get("existed").unwrap_or(false);
                Ok(if existed {
                    UnlinkOutcome::Removed
                } else {
                    UnlinkOutcome::NotPresent
                })
            }
            None => Err(self.missing_side(id, event_id).await?),
        }
    }

    async fn missing_side(&self, id: Uuid, event_id: EventId) -> Result<RepoError, RepoError> {
        let q = query(&format!(
            "MATCH (p:{label} {{id: $id}}) RETURN p.id AS id",
            label = self.label
        ))
        .param("id", id.to_string());

        let mut result = self
            .graph
            .execute(q)
            .await
            .map_err(|e| RepoError::database("missing_side", e))?;
        let parent_exists = result
            .next()
            .await
            .map_err(|e| RepoError::database("missing_side", e))?
            .is_some();

        Ok(if parent_exists {
            RepoError::not_found("Event", event_id)
        } else {
            RepoError::not_found(self.label, id)
        })
    }
}

macro_rules! neo4j_parent_repo {
    ($repo:ident, $trait:ident, $entity:ident, $id:ident, $label:literal) => {
        pub struct $repo {
            nodes: ParentNodes,
        }

        impl $repo {
            pub fn new(graph: Graph) -> Self {
                Self {
                    nodes: ParentNodes::new(graph, $label),
                }
            }

            fn to_entity(raw: RawParent) -> $entity {
                $entity {
                    id: $id::from_uuid(raw.id),
                    name: raw.name,
                    events: raw.events,
                }
            }
        }

        #[async_trait]
        impl $trait for $repo {
            async fn get(&self, id: $id) -> Result<Option<$entity>, RepoError> {
                Ok(self.nodes.get(id.to_uuid()).await?.map(Self::to_entity))
            }

            async fn save(&self, parent: &$entity) -> Result<(), RepoError> {
                self.nodes.save(parent.id.to_uuid(), &parent.name).await
            }

            async fn list(&self) -> Result<Vec<$entity>, RepoError> {
                Ok(self
                    .nodes
                    .list()
                    .await?
                    .into_iter()
                    .map(Self::to_entity)
                    .collect())
            }

            async fn add_event_if_absent(
                &self,
                id: $id,
                event_id: EventId,
            ) -> Result<LinkOutcome, RepoError> {
                self.nodes.add_event_if_absent(id.to_uuid(), event_id).await
            }

            async fn remove_event_if_present(
                &self,
                id: $id,
                event_id: EventId,
            ) -> Result<UnlinkOutcome, RepoError> {
                self.nodes
                    .remove_event_if_present(id.to_uuid(), event_id)
                    .await
            }
        }
    };
}

neo4j_parent_repo!(
    Neo4jEventTypeRepo,
    EventTypeRepo,
    EventType,
    EventTypeId,
    "EventType"
);
neo4j_parent_repo!(
    Neo4jEventCategoryRepo,
    EventCategoryRepo,
    EventCategory,
    EventCategoryId,
    "EventCategory"
);
neo4j_parent_repo!(
    Neo4jEventStatusRepo,
    EventStatusRepo,
    EventStatus,
    EventStatusId,
    "EventStatus"
);
neo4j_parent_repo!(
    Neo4jEventVenueRepo,
    EventVenueRepo,
    EventVenue,
    EventVenueId,
    "EventVenue"
);
