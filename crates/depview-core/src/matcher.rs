use crate::{Edge, Relation};
use serde::{Deserialize, Serialize};

/// Selects which edges contribute to a successor hierarchy, and in which direction.
///
/// A forward match makes the edge target a successor of the edge source. A reverse
/// match flips that, so the source becomes a successor of the target (useful for
/// relations such as `EXTENDS`, where the supertype should sit above its subtypes).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeMatcher {
    #[serde(default)]
    pub forward: Vec<Relation>,
    #[serde(default)]
    pub reverse: Vec<Relation>,
}

impl EdgeMatcher {
    pub fn forward(relations: &[Relation]) -> Self {
        Self {
            forward: relations.to_vec(),
            reverse: Vec::new(),
        }
    }

    pub fn reverse(relations: &[Relation]) -> Self {
        Self {
            forward: Vec::new(),
            reverse: relations.to_vec(),
        }
    }

    pub fn all_forward() -> Self {
        Self::forward(&Relation::ALL)
    }

    pub fn with_reverse(mut self, relations: &[Relation]) -> Self {
        self.reverse.extend_from_slice(relations);
        self
    }

    pub fn matches_forward(&self, edge: &Edge) -> bool {
        self.forward.contains(&edge.relation)
    }

    pub fn matches_reverse(&self, edge: &Edge) -> bool {
        self.reverse.contains(&edge.relation)
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty() && self.reverse.is_empty()
    }
}
