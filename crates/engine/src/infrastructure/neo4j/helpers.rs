//! Neo4j deserialization helpers for row conversion functions.
//!
//! Extension trait over `neo4rs::Node` to reduce boilerplate when converting
//! nodes to domain entities. Timestamps are stored as RFC 3339 strings.

use chrono::{DateTime, Utc};
use neo4rs::Node;
use uuid::Uuid;

use crate::infrastructure::ports::RepoError;

pub trait NodeExt {
    /// Get a required string field.
    fn get_string_strict(&self, field: &str) -> Result<String, RepoError>;

    /// Get a string field with a default value if missing.
    fn get_string_or(&self, field: &str, default: &str) -> String;

    /// Get an optional string field, returning None if empty or missing.
    fn get_optional_string(&self, field: &str) -> Option<String>;

    /// Get a required UUID field and parse it.
    fn get_uuid(&self, field: &str) -> Result<Uuid, RepoError>;

    /// Get a required RFC 3339 timestamp field.
    fn get_datetime_strict(&self, field: &str) -> Result<DateTime<Utc>, RepoError>;

    /// Get a bool field with a default value if missing.
    fn get_bool_or(&self, field: &str, default: bool) -> bool;

    /// Get and deserialize a JSON field with default on error.
    fn get_json_or_default<T: serde::de::DeserializeOwned + Default>(&self, field: &str) -> T;
}

impl NodeExt for Node {
    fn get_string_strict(&self, field: &str) -> Result<String, RepoError> {
        self.get(field)
            .map_err(|_| RepoError::serialization(format!("missing field: {field}")))
    }

    fn get_string_or(&self, field: &str, default: &str) -> String {
        self.get(field).unwrap_or_else(|_| default.to_string())
    }

    fn get_optional_string(&self, field: &str) -> Option<String> {
        self.get::<String>(field).ok().filter(|s| !s.is_empty())
    }

    fn get_uuid(&self, field: &str) -> Result<Uuid, RepoError> {
        let s = self.get_string_strict(field)?;
        Uuid::parse_str(&s)
            .map_err(|_| RepoError::serialization(format!("invalid UUID in field '{field}': {s}")))
    }

    fn get_datetime_strict(&self, field: &str) -> Result<DateTime<Utc>, RepoError> {
        let s = self.get_string_strict(field)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| {
                RepoError::serialization(format!("invalid timestamp in field '{field}': {s}"))
            })
    }

    fn get_bool_or(&self, field: &str, default: bool) -> bool {
        self.get(field).unwrap_or(default)
    }

    fn get_json_or_default<T: serde::de::DeserializeOwned + Default>(&self, field: &str) -> T {
        self.get::<String>(field)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }
}

/// Parse a list of id strings returned by a Cypher `collect()` into typed ids.
pub fn parse_id_list<T: From<Uuid>>(ids: Vec<String>) -> Result<Vec<T>, RepoError> {
    ids.into_iter()
        .map(|s| {
            Uuid::parse_str(&s)
                .map(T::from)
                .map_err(|_| RepoError::serialization(format!("invalid UUID in id list: {s}")))
        })
        .collect()
}
