use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod matcher;
pub mod successor;

pub use matcher::EdgeMatcher;
pub use successor::{SuccessorEdges, SuccessorIndex};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct NodeId(pub i64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EdgeId(pub i64);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Relation label carried by a dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[allow(non_camel_case_types)]
#[repr(i32)]
pub enum Relation {
    // Structure
    CONTAINS, // parent declares child

    // Type hierarchy
    EXTENDS,
    IMPLEMENTS,

    // Usage
    CALLS,
    USES,
    REFERENCES,

    // Modules
    IMPORTS,

    #[default]
    UNKNOWN,
}

impl Relation {
    pub const ALL: [Relation; 8] = [
        Relation::CONTAINS,
        Relation::EXTENDS,
        Relation::IMPLEMENTS,
        Relation::CALLS,
        Relation::USES,
        Relation::REFERENCES,
        Relation::IMPORTS,
        Relation::UNKNOWN,
    ];
}

/// Error type for relation conversion failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid Relation value: {0}")]
    InvalidRelation(i32),
    #[error("Unknown relation name: {0}")]
    UnknownRelationName(String),
}

impl TryFrom<i32> for Relation {
    type Error = CoreError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Relation::CONTAINS),
            1 => Ok(Relation::EXTENDS),
            2 => Ok(Relation::IMPLEMENTS),
            3 => Ok(Relation::CALLS),
            4 => Ok(Relation::USES),
            5 => Ok(Relation::REFERENCES),
            6 => Ok(Relation::IMPORTS),
            7 => Ok(Relation::UNKNOWN),
            _ => Err(CoreError::InvalidRelation(value)),
        }
    }
}

impl FromStr for Relation {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Relation::ALL
            .into_iter()
            .find(|relation| format!("{relation:?}").eq_ignore_ascii_case(name))
            .ok_or_else(|| CoreError::UnknownRelationName(name.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Node {
    pub id: NodeId,
    #[serde(default)]
    pub serialized_name: String, // e.g., "com.example.Parser"
}

impl Node {
    pub fn new(id: i64, name: &str) -> Self {
        Self {
            id: NodeId(id),
            serialized_name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default)]
    pub relation: Relation,
}

impl Edge {
    pub fn new(id: i64, source: i64, target: i64, relation: Relation) -> Self {
        Self {
            id: EdgeId(id),
            source: NodeId(source),
            target: NodeId(target),
            relation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_round_trips_through_discriminant() {
        for relation in Relation::ALL {
            assert_eq!(Relation::try_from(relation as i32), Ok(relation));
        }
        assert_eq!(Relation::try_from(42), Err(CoreError::InvalidRelation(42)));
    }

    #[test]
    fn relation_parses_case_insensitive_names() {
        assert_eq!("calls".parse::<Relation>(), Ok(Relation::CALLS));
        assert_eq!(" CONTAINS ".parse::<Relation>(), Ok(Relation::CONTAINS));
        assert!(matches!(
            "owns".parse::<Relation>(),
            Err(CoreError::UnknownRelationName(name)) if name == "owns"
        ));
    }

    #[test]
    fn edge_relation_defaults_when_missing_from_json() {
        let edge: Edge = serde_json::from_str(r#"{"id":1,"source":2,"target":3}"#).unwrap();
        assert_eq!(edge.relation, Relation::UNKNOWN);
        assert_eq!(edge.source, NodeId(2));
    }

    #[test]
    fn default_node_and_edge_use_zero_ids() {
        let node = Node::default();
        assert_eq!(node.id, NodeId(0));
        assert!(node.serialized_name.is_empty());

        let edge = Edge::default();
        assert_eq!(edge.id, EdgeId(0));
        assert_eq!((edge.source, edge.target), (NodeId(0), NodeId(0)));
        assert_eq!(edge.relation, Relation::UNKNOWN);
    }
}
