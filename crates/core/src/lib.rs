pub mod cleanup;
pub mod config;
pub mod error;
pub mod launch;
pub mod model;
pub mod profiles;
pub mod workspace;

pub use cleanup::{clean_workspace, CleanupReport};
pub use config::LauncherConfig;
pub use error::{LaunchError, ProfileError};
pub use launch::{launch, LaunchOutcome, ProgramSpec};
pub use model::*;
pub use profiles::{DeskProfile, DeskProfiles};
pub use workspace::Workspace;
