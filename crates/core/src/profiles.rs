//! Optional `desks.json` registry so one launcher binary serves every desk.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ProfileError;
use crate::model::{DeskConfig, DeskId, Port};

pub const PROFILES_FILE_NAME: &str = "desks.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramSection {
    #[serde(default)]
    pub interpreter: Option<String>,
    #[serde(default)]
    pub script: Option<PathBuf>,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeskProfile {
    pub desk: DeskId,
    pub port: Port,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl From<&DeskProfile> for DeskConfig {
    fn from(profile: &DeskProfile) -> Self {
        DeskConfig {
            desk: profile.desk,
            port: profile.port,
            label: profile.label.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeskProfiles {
    #[serde(default)]
    pub program: ProgramSection,
    #[serde(default)]
    pub desks: Vec<DeskProfile>,
}

impl DeskProfiles {
    /// Load and validate the registry at `path`. A missing file yields an empty registry.
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no desk profiles file");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ProfileError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::parse(&raw, path)
    }

    pub fn parse(raw: &str, path: &Path) -> Result<Self, ProfileError> {
        let profiles: DeskProfiles =
            serde_json::from_str(raw).map_err(|source| ProfileError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        profiles.validate()?;
        Ok(profiles)
    }

    /// Every desk and every port may appear only once.
    pub fn validate(&self) -> Result<(), ProfileError> {
        let mut desks = HashSet::new();
        let mut ports: HashMap<Port, DeskId> = HashMap::new();
        for profile in &self.desks {
            if !desks.insert(profile.desk) {
                return Err(ProfileError::DuplicateDesk(profile.desk));
            }
            if let Some(first) = ports.insert(profile.port, profile.desk) {
                return Err(ProfileError::DuplicatePort {
                    port: profile.port,
                    first,
                    second: profile.desk,
                });
            }
        }
        Ok(())
    }

    pub fn find(&self, desk: DeskId) -> Option<&DeskProfile> {
        self.desks.iter().find(|profile| profile.desk == desk)
    }

    pub fn sorted(&self) -> Vec<&DeskProfile> {
        let mut desks: Vec<&DeskProfile> = self.desks.iter().collect();
        desks.sort_by_key(|profile| profile.desk);
        desks
    }
}
