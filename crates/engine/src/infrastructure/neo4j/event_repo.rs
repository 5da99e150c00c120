//! Neo4j event repository implementation.
//!
//! Events are nodes keyed by `id`. Singular parent references are node
//! properties; the speaker back-reference set is materialized as
//! `(e:Event)-[:HAS_SPEAKER]->(s:Speaker)` edges so that link mutations can
//! use `MERGE` - an atomic, storage-native add-if-absent - instead of a
//! read-check-write cycle.

use async_trait::async_trait;
use neo4rs::{query, Graph};

use eventdesk_domain::{
    Event, EventCategoryId, EventId, EventStatusId, EventTypeId, EventVenueId, SpeakerId,
};

use super::helpers::{parse_id_list, NodeExt};
use crate::infrastructure::ports::{EventRepo, LinkOutcome, RepoError, UnlinkOutcome};

pub struct Neo4jEventRepo {
    graph: Graph,
}

impl Neo4jEventRepo {
    pub fn new(graph: Graph) -> Self {
        Self { graph }
    }

    fn row_to_event(row: &neo4rs::Row) -> Result<Event, RepoError> {
        let node: neo4rs::Node = row
            .get("e")
            .map_err(|e| RepoError::database("row_to_event", e))?;
        let speaker_ids: Vec<String> = row.get("speaker_ids").unwrap_or_default();

        Ok(Event {
            id: EventId::from_uuid(node.get_uuid("id")?),
            name: node.get_string_or("name", ""),
            description: node.get_string_or("description", ""),
            starts_at: node.get_datetime_strict("starts_at")?,
            ends_at: node.get_datetime_strict("ends_at")?,
            start_time: node.get_string_or("start_time", ""),
            end_time: node.get_string_or("end_time", ""),
            is_all_day: node.get_bool_or("is_all_day", false),
            type_id: EventTypeId::from_uuid(node.get_uuid("type_id")?),
            category_id: EventCategoryId::from_uuid(node.get_uuid("category_id")?),
            status_id: EventStatusId::from_uuid(node.get_uuid("status_id")?),
            venue_id: EventVenueId::from_uuid(node.get_uuid("venue_id")?),
            speakers: parse_id_list(speaker_ids)?,
            feedback: node.get_json_or_default("feedback_json"),
            rsvps: node.get_json_or_default("rsvps_json"),
            created_at: node.get_datetime_strict("created_at")?,
        })
    }

    /// Decide which side of a failed two-node link query was missing.
    async fn missing_side(
        &self,
        event_id: EventId,
        speaker_id: SpeakerId,
    ) -> Result<RepoError, RepoError> {
        let q = query("MATCH (e:Event {id: $id}) RETURN e.id AS id").param("id", event_id.to_string());
        let mut result = self
            .graph
            .execute(q)
            .await
            .map_err(|e| RepoError::database("missing_side", e))?;
        let event_exists = result
            .next()
            .await
            .map_err(|e| RepoError::database("missing_side", e))?
            .is_some();

        Ok(if event_exists {
            RepoError::not_found("Speaker", speaker_id)
        } else {
            RepoError::not_found("Event", event_id)
        })
    }
}

#[async_trait]
impl EventRepo for Neo4jEventRepo {
    async fn get(&self, id: EventId) -> Result<Option<Event>, RepoError> {
        let q = query(
            "MATCH (e:Event {id: $id})
            OPTIONAL MATCH (e)-[:HAS_SPEAKER]->(s:Speaker)
            RETURN e, collect(s.id) AS speaker_ids",
        )
        .param("id", id.to_string());

        let mut result = self
            .graph
            .execute(q)
            .await
            .map_err(|e| RepoError::database("get_event", e))?;

        match result
            .next()
            .await
            .map_err(|e| RepoError::database("get_event", e))?
        {
            Some(row) => Ok(Some(Self::row_to_event(&row)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, event: &Event) -> Result<(), RepoError> {
        let feedback_json = serde_json::to_string(&event.feedback)
            .map_err(|e| RepoError::serialization(e.to_string()))?;
        let rsvps_json = serde_json::to_string(&event.rsvps)
            .map_err(|e| RepoError::serialization(e.to_string()))?;

        let q = query(
            "MERGE (e:Event {id: $id})
            SET e.name = $name,
                e.description = $description,
                e.starts_at = $starts_at,
                e.ends_at = $ends_at,
                e.start_time = $start_time,
                e.end_time = $end_time,
                e.is_all_day = $is_all_day,
                e.type_id = $type_id,
                e.category_id = $category_id,
                e.status_id = $status_id,
                e.venue_id = $venue_id,
                e.feedback_json = $feedback_json,
                e.rsvps_json = $rsvps_json,
                e.created_at = $created_at",
        )
        .param("id", event.id.to_string())
        .param("name", event.name.clone())
        .param("description", event.description.clone())
        .param("starts_at", event.starts_at.to_rfc3339())
        .param("ends_at", event.ends_at.to_rfc3339())
        .param("start_time", event.start_time.clone())
        .param("end_time", event.end_time.clone())
        .param("is_all_day", event.is_all_day)
        .param("type_id", event.type_id.to_string())
        .param("category_id", event.category_id.to_string())
        .param("status_id", event.status_id.to_string())
        .param("venue_id", event.venue_id.to_string())
        .param("feedback_json", feedback_json)
        .param("rsvps_json", rsvps_json)
        .param("created_at", event.created_at.to_rfc3339());

        self.graph
            .run(q)
            .await
            .map_err(|e| RepoError::database("save_event", e))
    }

    async fn delete(&self, id: EventId) -> Result<(), RepoError> {
        let q = query(
            "MATCH (e:Event {id: $id})
            DETACH DELETE e
            RETURN count(*) AS deleted",
        )
        .param("id", id.to_string());

        let mut result = self
            .graph
            .execute(q)
            .await
            .map_err(|e| RepoError::database("delete_event", e))?;

        let deleted: i64 = result
            .next()
            .await
            .map_err(|e| RepoError::database("delete_event", e))?
            .and_then(|row| row.get("deleted").ok())
            .unwrap_or(0);

        if deleted == 0 {
            return Err(RepoError::not_found("Event", id));
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Event>, RepoError> {
        let q = query(
            "MATCH (e:Event)
            OPTIONAL MATCH (e)-[:HAS_SPEAKER]->(s:Speaker)
            RETURN e, collect(s.id) AS speaker_ids
            ORDER BY e.starts_at",
        );

        let mut result = self
            .graph
            .execute(q)
            .await
            .map_err(|e| RepoError::database("list_events", e))?;

        let mut events = Vec::new();
        while let Some(row) = result
            .next()
            .await
            .map_err(|e| RepoError::database("list_events", e))?
        {
            events.push(Self::row_to_event(&row)?);
        }
        Ok(events)
    }

    async fn add_speaker_if_absent(
        &self,
        event_id: EventId,
        speaker_id: SpeakerId,
    ) -> Result<LinkOutcome, RepoError> {
        let q = query(
            "MATCH (e:Event {id: $event_id})
            MATCH (s:Speaker {id: $speaker_id})
            MERGE (e)-[r:HAS_SPEAKER]->(s)
            ON CREATE SET r.created_now = true
            ON MATCH SET r.created_now = false
            RETURN r.created_now AS added",
        )
        .param("event_id", event_id.to_string())
        .param("speaker_id", speaker_id.to_string());

        let mut result = self
            .graph
            .execute(q)
            .await
            .map_err(|e| RepoError::database("add_speaker", e))?;

        match result
            .next()
            .await
            .map_err(|e| RepoError::database("add_speaker", e))?
        {
            Some(row) => {
                let added: bool = row.get("added").unwrap_or(false);
                Ok(if added {
                    LinkOutcome::Added
                } else {
                    LinkOutcome::AlreadyPresent
                })
            }
            None => Err(self.missing_side(event_id, speaker_id).await?),
        }
    }

    async fn remove_speaker_if_present(
        &self,
        event_id: EventId,
        speaker_id: SpeakerId,
    ) -> Result<UnlinkOutcome, RepoError> {
        let q = query(
            "MATCH (e:Event {id: $event_id})
            MATCH (s:Speaker {id: $speaker_id})
            OPTIONAL MATCH (e)-[r:HAS_SPEAKER]->(s)
            WITH r, (r IS NOT NULL) AS existed
            DELETE r
            RETURN existed",
        )
        .param("event_id", event_id.to_string())
        .param("speaker_id", speaker_id.to_string());

        let mut result = self
            .graph
            .execute(q)
            .await
            .map_err(|e| RepoError::database("remove_speaker", e))?;

        match result
            .next()
            .await
            .map_err(|e| RepoError::database("remove_speaker", e))?
        {
            Some(row) => {
                let existed: bool = row.get("existed").unwrap_or(false);
                Ok(if existed {
                    UnlinkOutcome::Removed
                } else {
                    UnlinkOutcome::NotPresent
                })
            }
            None => Err(self.missing_side(event_id, speaker_id).await?),
        }
    }
}
