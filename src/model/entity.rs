//! People and projects referenced by commitments and progress.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Someone commitments are made to. Identity is `id`, case-sensitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Person {
    /// A placeholder person named after its id.
    pub fn placeholder(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            metadata: BTreeMap::new(),
        }
    }
}

/// Something worked on. Priority: positive is high, negative is low.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,

    #[serde(default)]
    pub priority: i64,

    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Project {
    /// A placeholder project at normal priority.
    pub fn placeholder(id: &str) -> Self {
        Self {
            id: id.to_string(),
            priority: 0,
            metadata: BTreeMap::new(),
        }
    }
}
