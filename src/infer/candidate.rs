//! Candidate links and confidence-based deduplication.

use crate::model::{Cardinality, Relationship, link_key};
use std::collections::HashMap;
use uuid::Uuid;

/// The naming heuristic that produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// `user_id` -> `users.<pk>`
    ForeignKeySuffix,
    /// Same column name on a key and a non-key column.
    ExactName,
    /// Same column name, neither side a key.
    ExactNameUnkeyed,
    /// Same suffix after stripping a legacy prefix (`O0BCTN` / `O1BCTN`).
    LegacySuffix,
    /// `userId` -> `users.<pk>`
    CamelCaseId,
}

impl Strategy {
    pub fn confidence(self) -> f64 {
        match self {
            Self::ForeignKeySuffix => 0.95,
            Self::ExactName => 0.85,
            Self::ExactNameUnkeyed => 0.8,
            Self::LegacySuffix => 0.7,
            Self::CamelCaseId => 0.6,
        }
    }
}

/// A candidate link between two columns, borrowed from the input tables.
#[derive(Debug, Clone, PartialEq)]
pub struct Match<'a> {
    pub from_table_id: &'a str,
    pub from_column_id: &'a str,
    pub to_table_id: &'a str,
    pub to_column_id: &'a str,
    pub strategy: Strategy,
}

impl<'a> Match<'a> {
    pub fn confidence(&self) -> f64 {
        self.strategy.confidence()
    }

    pub fn link_key(&self) -> [&'a str; 4] {
        link_key([
            self.from_table_id,
            self.from_column_id,
            self.to_table_id,
            self.to_column_id,
        ])
    }

    pub fn to_relationship(&self) -> Relationship {
        Relationship {
            id: Uuid::new_v4().to_string(),
            from_table_id: self.from_table_id.to_string(),
            from_column_id: self.from_column_id.to_string(),
            to_table_id: self.to_table_id.to_string(),
            to_column_id: self.to_column_id.to_string(),
            cardinality: Cardinality::OneToMany,
            inferred: true,
        }
    }
}

/// Keep the highest-confidence candidate per link, whatever its direction.
///
/// Ties keep the earliest candidate. Output follows the order in which each
/// link was first seen.
pub fn dedup(candidates: Vec<Match<'_>>) -> Vec<Match<'_>> {
    let mut slots: HashMap<[&str; 4], usize> = HashMap::new();
    let mut kept: Vec<Match<'_>> = Vec::new();

    for candidate in candidates {
        match slots.get(&candidate.link_key()) {
            Some(&slot) => {
                if candidate.confidence() > kept[slot].confidence() {
                    kept[slot] = candidate;
                }
            }
            None => {
                slots.insert(candidate.link_key(), kept.len());
                kept.push(candidate);
            }
        }
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m<'a>(from: (&'a str, &'a str), to: (&'a str, &'a str), strategy: Strategy) -> Match<'a> {
        Match {
            from_table_id: from.0,
            from_column_id: from.1,
            to_table_id: to.0,
            to_column_id: to.1,
            strategy,
        }
    }

    #[test]
    fn test_confidence_order() {
        assert!(Strategy::ForeignKeySuffix.confidence() > Strategy::ExactName.confidence());
        assert!(Strategy::ExactName.confidence() > Strategy::ExactNameUnkeyed.confidence());
        assert!(Strategy::ExactNameUnkeyed.confidence() > Strategy::LegacySuffix.confidence());
        assert!(Strategy::LegacySuffix.confidence() > Strategy::CamelCaseId.confidence());
    }

    #[test]
    fn test_dedup_keeps_highest() {
        let kept = dedup(vec![
            m(("a", "1"), ("b", "2"), Strategy::LegacySuffix),
            m(("b", "2"), ("a", "1"), Strategy::ForeignKeySuffix),
        ]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].strategy, Strategy::ForeignKeySuffix);
        assert_eq!(kept[0].from_table_id, "b");
    }

    #[test]
    fn test_dedup_tie_keeps_first() {
        let kept = dedup(vec![
            m(("a", "1"), ("b", "2"), Strategy::ExactNameUnkeyed),
            m(("b", "2"), ("a", "1"), Strategy::ExactNameUnkeyed),
        ]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].from_table_id, "a");
    }

    #[test]
    fn test_dedup_distinct_links() {
        let kept = dedup(vec![
            m(("a", "1"), ("b", "2"), Strategy::ExactName),
            m(("a", "1"), ("c", "3"), Strategy::ExactName),
        ]);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[1].to_table_id, "c");
    }

    #[test]
    fn test_to_relationship() {
        let rel = m(("a", "1"), ("b", "2"), Strategy::CamelCaseId).to_relationship();
        assert!(rel.inferred);
        assert_eq!(rel.cardinality, Cardinality::OneToMany);
        assert_eq!(rel.from_column_id, "1");
        assert!(!rel.id.is_empty());
    }
}
