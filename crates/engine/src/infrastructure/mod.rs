//! Infrastructure - external dependency implementations (ports + adapters).

pub mod clock;
pub mod memory;
pub mod neo4j;
pub mod ports;
