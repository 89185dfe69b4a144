//! Search predicate shapes, typed and generic.
//!
//! A search is a disjunction of conjunctions: an outer ordered sequence of
//! OR-groups, each an ordered sequence of AND-criteria. The typed shape names
//! domain fields and carries typed comparison values; the generic shape
//! mirrors it with generic key names and string values ready for the
//! adapter's query encoding.

use crate::entity::FieldValue;
use serde::{Deserialize, Serialize};

/// Comparison operator for one search criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOp {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    Like,
}

/// Which fields a search asks the adapter to return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Returning {
    /// Return every field the adapter knows
    All,

    /// Return only the named fields
    Fields(Vec<String>),
}

impl Default for Returning {
    fn default() -> Self {
        Self::All
    }
}

/// One typed AND-criterion: a domain field, an operator and a typed value.
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    /// Domain field name
    pub field: String,

    /// Comparison operator
    pub op: MatchOp,

    /// Typed comparison value
    pub value: FieldValue,
}

impl Criterion {
    /// Create a criterion.
    pub fn new(field: impl Into<String>, op: MatchOp, value: FieldValue) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }
}

/// One conjunction of typed criteria.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrGroup {
    /// AND-criteria; all must match
    pub criteria: Vec<Criterion>,
}

impl OrGroup {
    /// Create a group from its criteria.
    pub fn new(criteria: Vec<Criterion>) -> Self {
        Self { criteria }
    }
}

/// A typed entity search: OR over groups, AND within each group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntitySearch {
    /// OR-groups; any may match
    pub groups: Vec<OrGroup>,

    /// Maximum number of records to return; zero means adapter default
    pub limit: u32,

    /// Requested return fields, in domain field names
    pub returning: Returning,
}

/// One generic AND-criterion, keyed by generic key name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericCriterion {
    /// Generic key name
    pub key: String,

    /// Comparison operator
    pub op: MatchOp,

    /// Comparison value in the adapter's string encoding
    pub value: String,
}

/// One conjunction of generic criteria.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenericGroup {
    /// AND-criteria; all must match
    pub criteria: Vec<GenericCriterion>,
}

/// A generic entity search submitted to the adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericSearch {
    /// Entity-kind tag
    pub kind: String,

    /// OR-groups; any may match
    pub groups: Vec<GenericGroup>,

    /// Maximum number of records to return; zero means adapter default
    pub limit: u32,

    /// Requested return fields, in generic key names
    pub returning: Returning,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returning_defaults_to_all() {
        assert_eq!(Returning::default(), Returning::All);
    }

    #[test]
    fn generic_search_round_trips_through_json() {
        let search = GenericSearch {
            kind: "contacts".into(),
            groups: vec![GenericGroup {
                criteria: vec![GenericCriterion {
                    key: "firstname".into(),
                    op: MatchOp::Equal,
                    value: "'steve'".into(),
                }],
            }],
            limit: 5,
            returning: Returning::Fields(vec!["firstname".into()]),
        };
        let json = serde_json::to_string(&search).unwrap();
        let back: GenericSearch = serde_json::from_str(&json).unwrap();
        assert_eq!(back, search);
    }
}
