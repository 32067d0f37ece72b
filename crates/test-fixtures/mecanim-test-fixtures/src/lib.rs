//! Shared JSON fixtures for the event crates: authored event data and
//! poll-by-poll playback scenarios, both listed in `fixtures/manifest.json`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

/// Fixture name to path relative to the fixtures root.
#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(rename = "event-data")]
    event_data: HashMap<String, String>,
    scenarios: HashMap<String, String>,
}

#[derive(Copy, Clone, Debug)]
enum Kind {
    EventData,
    Scenario,
}

impl Kind {
    fn entries(self) -> &'static HashMap<String, String> {
        match self {
            Kind::EventData => &MANIFEST.event_data,
            Kind::Scenario => &MANIFEST.scenarios,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Kind::EventData => "event data",
            Kind::Scenario => "scenario",
        }
    }

    fn keys(self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn path(self, name: &str) -> Result<PathBuf> {
        let rel = self
            .entries()
            .get(name)
            .ok_or_else(|| anyhow!("unknown {} fixture '{name}'", self.label()))?;
        Ok(Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures")
            .join(rel))
    }

    fn read(self, name: &str) -> Result<String> {
        let path = self.path(name)?;
        fs::read_to_string(&path).with_context(|| {
            format!(
                "failed to read {} fixture at {}",
                self.label(),
                path.display()
            )
        })
    }
}

/// Event data sources in the authoring interchange JSON.
pub mod event_data {
    use super::*;

    pub fn keys() -> Vec<String> {
        Kind::EventData.keys()
    }

    pub fn json(name: &str) -> Result<String> {
        Kind::EventData.read(name)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Kind::EventData.path(name)
    }
}

/// Poll-by-poll playback scenarios with expected firings.
pub mod scenarios {
    use super::*;

    pub fn keys() -> Vec<String> {
        Kind::Scenario.keys()
    }

    pub fn json(name: &str) -> Result<String> {
        Kind::Scenario.read(name)
    }

    /// Deserialize a scenario into the caller's own schema.
    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let text = json(name)?;
        serde_json::from_str(&text).with_context(|| format!("failed to parse scenario '{name}'"))
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Kind::Scenario.path(name)
    }
}
