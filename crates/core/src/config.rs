use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};

use crate::launch::ProgramSpec;
use crate::model::{DeskConfig, DeskId, Port};
use crate::profiles::{DeskProfiles, PROFILES_FILE_NAME};
use crate::workspace::Workspace;

static ENV_ROOT_DIR: &str = "DESK_LAUNCHER_ROOT";

#[derive(Debug, Clone)]
pub struct LauncherConfig {
    root_dir: PathBuf,
    profiles_path: PathBuf,
    profiles: DeskProfiles,
}

impl LauncherConfig {
    /// Construct [`LauncherConfig`] by resolving the launcher root from the provided override,
    /// the `DESK_LAUNCHER_ROOT` environment variable, or the directory holding the executable.
    pub fn discover(root_override: Option<PathBuf>) -> Result<Self> {
        let root_dir = resolve_root_dir(root_override)?;
        if !root_dir.is_dir() {
            bail!("launcher root {} is not a directory", root_dir.display());
        }
        Self::from_root_dir(root_dir)
    }

    /// Construct [`LauncherConfig`] directly from a resolved root directory.
    pub fn from_root_dir(root_dir: PathBuf) -> Result<Self> {
        let profiles_path = root_dir.join(PROFILES_FILE_NAME);
        let profiles = DeskProfiles::load(&profiles_path)?;
        Ok(Self {
            root_dir,
            profiles_path,
            profiles,
        })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn profiles_path(&self) -> &Path {
        &self.profiles_path
    }

    pub fn profiles(&self) -> &DeskProfiles {
        &self.profiles
    }

    pub fn workspace(&self, desk: DeskId) -> Workspace {
        Workspace::for_desk(&self.root_dir, desk)
    }

    /// Program to start, before any command-line overrides.
    pub fn program(&self) -> ProgramSpec {
        ProgramSpec::from_section(&self.profiles.program)
    }

    /// Resolve the desk configuration, falling back to the desk's profile for the port.
    pub fn desk_config(&self, desk: DeskId, port: Option<Port>) -> Result<DeskConfig> {
        let profile = self.profiles.find(desk);
        let port = port.or_else(|| profile.map(|p| p.port)).ok_or_else(|| {
            anyhow!(
                "no port configured for desk {desk}; pass --port or add it to {}",
                self.profiles_path.display()
            )
        })?;
        Ok(DeskConfig {
            desk,
            port,
            label: profile.and_then(|p| p.label.clone()),
        })
    }
}

fn resolve_root_dir(root_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = root_override {
        return absolutize(dir);
    }

    if let Ok(env_dir) = env::var(ENV_ROOT_DIR) {
        if !env_dir.trim().is_empty() {
            return absolutize(PathBuf::from(env_dir));
        }
    }

    let exe = env::current_exe().context("failed to locate the launcher executable")?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("launcher executable {} has no parent directory", exe.display()))
}

fn absolutize(dir: PathBuf) -> Result<PathBuf> {
    if dir.is_absolute() {
        return Ok(dir);
    }
    Ok(env::current_dir()?.join(dir))
}
