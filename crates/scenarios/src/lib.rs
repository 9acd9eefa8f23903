#![deny(warnings)]

//! Named scenario snapshots kept on behalf of a presentation layer.
//!
//! The projection engine never reads this store; callers save an input record
//! under a unique name and load it back later.

use chrono::NaiveDateTime;
use event_core::InputRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("scenario name must not be empty")]
    EmptyName,
    #[error("a scenario named '{0}' already exists")]
    DuplicateName(String),
}

/// Saved input snapshot with the time it was stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub inputs: InputRecord,
    pub saved_at: NaiveDateTime,
}

/// Unique name -> scenario mapping.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioStore {
    scenarios: BTreeMap<String, Scenario>,
}

impl ScenarioStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save `inputs` under `name` (trimmed). Existing names are never overwritten.
    pub fn save(
        &mut self,
        name: &str,
        inputs: InputRecord,
        saved_at: NaiveDateTime,
    ) -> Result<(), StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        if self.scenarios.contains_key(name) {
            return Err(StoreError::DuplicateName(name.to_string()));
        }
        info!(scenario = name, %saved_at, "scenario saved");
        self.scenarios
            .insert(name.to_string(), Scenario { inputs, saved_at });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.get(name.trim())
    }

    pub fn remove(&mut self, name: &str) -> Option<Scenario> {
        self.scenarios.remove(name.trim())
    }

    /// Scenarios with the most recently saved first; ties ordered by name.
    pub fn list(&self) -> Vec<(&str, &Scenario)> {
        let mut all: Vec<(&str, &Scenario)> = self
            .scenarios
            .iter()
            .map(|(k, v)| (k.as_str(), v))
            .collect();
        all.sort_by(|a, b| b.1.saved_at.cmp(&a.1.saved_at).then_with(|| a.0.cmp(b.0)));
        all
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

/// Canonical default inputs, used when a caller resets its form.
pub fn reset_to_defaults() -> InputRecord {
    InputRecord::default()
}
