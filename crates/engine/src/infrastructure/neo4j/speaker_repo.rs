//! Neo4j speaker repository implementation.
//!
//! A speaker's event back-reference set is its own edge kind,
//! `(s:Speaker)-[:SPEAKS_AT]->(e:Event)`, independent of the event-side
//! `HAS_SPEAKER` edge. The two edges model the two denormalized collections
//! of the document layout, so each side can be (re)linked on its own - that
//! is what the partial-state contract of assign-speaker relies on.

use async_trait::async_trait;
use neo4rs::{query, Graph};

use eventdesk_domain::{EventId, Speaker, SpeakerId};

use super::helpers::{parse_id_list, NodeExt};
use crate::infrastructure::ports::{LinkOutcome, RepoError, SpeakerRepo, UnlinkOutcome};

pub struct Neo4jSpeakerRepo {
    graph: Graph,
}

impl Neo4jSpeakerRepo {
    pub fn new(graph: Graph) -> Self {
        Self { graph }
    }

    fn row_to_speaker(row: &neo4rs::Row) -> Result<Speaker, RepoError> {
        let node: neo4rs::Node = row
            .get("s")
            .map_err(|e| RepoError::database("row_to_speaker", e))?;
        let event_ids: Vec<String> = row.get("event_ids").unwrap_or_default();

        Ok(Speaker {
            id: SpeakerId::from_uuid(node.get_uuid("id")?),
            name: node.get_string_or("name", ""),
            profile: node.get_optional_string("profile"),
            events: parse_id_list(event_ids)?,
        })
    }

    async fn missing_side(
        &self,
        speaker_id: SpeakerId,
        event_id: EventId,
    ) -> Result<RepoError, RepoError> {
        let q = query("MATCH (s:Speaker {id: $id}) RETURN s.id AS id")
            .param("id", speaker_id.to_string());
        let mut result = self
            .graph
            .execute(q)
            .await
            .map_err(|e| RepoError::database("missing_side", e))?;
        let speaker_exists = result
            .next()
            .await
            .map_err(|e| RepoError::database("missing_side", e))?
            .is_some();

        Ok(if speaker_exists {
            RepoError::not_found("Event", event_id)
        } else {
            RepoError::not_found("Speaker", speaker_id)
        })
    }
}

#[async_trait]
impl SpeakerRepo for Neo4jSpeakerRepo {
    async fn get(&self, id: SpeakerId) -> Result<Option<Speaker>, RepoError> {
        let q = query(
            "MATCH (s:Speaker {id: $id})
            OPTIONAL MATCH (s)-[:SPEAKS_AT]->(e:Event)
            RETURN s, collect(e.id) AS event_ids",
        )
        .param("id", id.to_string());

        let mut result = self
            .graph
            .execute(q)
            .await
            .map_err(|e| RepoError::database("get_speaker", e))?;

        match result
            .next()
            .await
            .map_err(|e| RepoError::database("get_speaker", e))?
        {
            Some(row) => Ok(Some(Self::row_to_speaker(&row)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, speaker: &Speaker) -> Result<(), RepoError> {
        let q = query(
            "MERGE (s:Speaker {id: $id})
            SET s.name = $name,
                s.profile = $profile",
        )
        .param("id", speaker.id.to_string())
        .param("name", speaker.name.clone())
        .param("profile", speaker.profile.clone().unwrap_or_default());

        self.graph
            .run(q)
            .await
            .map_err(|e| RepoError::database("save_speaker", e))
    }

    async fn list(&self) -> Result<Vec<Speaker>, RepoError> {
        let q = query(
            "MATCH (s:Speaker)
            OPTIONAL MATCH (s)-[:SPEAKS_AT]->(e:Event)
            RETURN s, collect(e.id) AS event_ids
            ORDER BY s.name",
        );

        let mut result = self
            .graph
            .execute(q)
            .await
            .map_err(|e| RepoError::database("list_speakers", e))?;

        let mut speakers = Vec::new();
        while let Some(row) = result
            .next()
            .await
            .map_err(|e| RepoError::database("list_speakers", e))?
        {
            speakers.push(Self::row_to_speaker(&row)?);
        }
        Ok(speakers)
    }

    async fn add_event_if_absent(
        &self,
        speaker_id: SpeakerId,
        event_id: EventId,
    ) -> Result<LinkOutcome, RepoError> {
        let q = query(
            "MATCH (s:Speaker {id: $speaker_id})
            MATCH (e:Event {id: $event_id})
            MERGE (s)-[r:SPEAKS_AT]->(e)
            ON CREATE SET r.created_now = true
            ON MATCH SET r.created_now = false
            RETURN r.created_now AS added",
        )
        .param("speaker_id", speaker_id.to_string())
        .param("event_id", event_id.to_string());

        let mut result = self
            .graph
            .execute(q)
            .await
            .map_err(|e| RepoError::database("add_event_to_speaker", e))?;

        match result
            .next()
            .await
            .map_err(|e| RepoError::database("add_event_to_speaker", e))?
        {
            Some(row) => {
                let added: bool = row.get("added").unwrap_or(false);
                Ok(if added {
                    LinkOutcome::Added
                } else {
                    LinkOutcome::AlreadyPresent
                })
            }
            None => Err(self.missing_side(speaker_id, event_id).await?),
        }
    }

    async fn remove_event_if_present(
        &self,
        speaker_id: SpeakerId,
        event_id: EventId,
    ) -> Result<UnlinkOutcome, RepoError> {
        let q = query(
            "MATCH (s:Speaker {id: $speaker_id})
            MATCH (e:Event {id: $event_id})
            OPTIONAL MATCH (s)-[r:SPEAKS_AT]->(e)
            WITH r, (r IS NOT NULL) AS existed
            DELETE r
            RETURN existed",
        )
        .param("speaker_id", speaker_id.to_string())
        .param("event_id", event_id.to_string());

        let mut result = self
            .graph
            .execute(q)
            .await
            .map_err(|e| RepoError::database("remove_event_from_speaker", e))?;

        match result
            .next()
            .await
            .map_err(|e| RepoError::database("remove_event_from_speaker", e))?
        {
            Some(row) => {
                let existed: bool = row.get("existed").unwrap_or(false);
                Ok(if existed {
                    UnlinkOutcome::Removed
                } else {
                    UnlinkOutcome::NotPresent
                })
            }
            None => Err(self.missing_side(speaker_id, event_id).await?),
        }
    }
}
