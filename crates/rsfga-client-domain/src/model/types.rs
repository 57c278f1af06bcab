//! Core tuple definitions.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The identity of a relationship: (user, relation, object).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TupleKey {
    /// The user (subject), e.g. "user:anne" or "team:eng#member".
    pub user: String,
    /// The relation, e.g. "viewer".
    pub relation: String,
    /// The object, e.g. "document:roadmap".
    pub object: String,
}

impl TupleKey {
    /// Creates a new TupleKey.
    pub fn new(
        user: impl Into<String>,
        relation: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            relation: relation.into(),
            object: object.into(),
        }
    }
}

impl fmt::Display for TupleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}@{}", self.object, self.relation, self.user)
    }
}

/// A condition attached to a written tuple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TupleCondition {
    /// Name of the condition defined in the authorization model.
    pub name: String,
    /// Parameters bound at write time.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub context: Map<String, Value>,
}

impl TupleCondition {
    /// Creates a condition with an empty context.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            context: Map::new(),
        }
    }

    /// Binds a context parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

/// A relationship tuple, optionally conditioned.
///
/// Equality is structural on the triple and the condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuple {
    /// The user (subject) of the relationship.
    pub user: String,
    /// The relation between user and object.
    pub relation: String,
    /// The object of the relationship.
    pub object: String,
    /// Optional condition, only meaningful for writes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<TupleCondition>,
}

impl Tuple {
    /// Creates a new unconditioned Tuple.
    pub fn new(
        user: impl Into<String>,
        relation: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            relation: relation.into(),
            object: object.into(),
            condition: None,
        }
    }

    /// Attaches a condition to the tuple.
    pub fn with_condition(mut self, condition: TupleCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Returns the (user, relation, object) identity of this tuple.
    pub fn key(&self) -> TupleKey {
        TupleKey::new(&self.user, &self.relation, &self.object)
    }

    /// Returns a description of the first malformed field, if any.
    pub(crate) fn validate(&self) -> Result<(), &'static str> {
        if self.user.is_empty() {
            return Err("user cannot be empty");
        }
        if self.relation.is_empty() {
            return Err("relation cannot be empty");
        }
        if self.object.is_empty() {
            return Err("object cannot be empty");
        }
        if !self.object.contains(':') {
            return Err("object must be in 'type:id' format");
        }
        if matches!(&self.condition, Some(c) if c.name.is_empty()) {
            return Err("condition name cannot be empty");
        }
        Ok(())
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}@{}", self.object, self.relation, self.user)
    }
}
