pub mod banner;
pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod pause;

pub use desk_core as core;
pub use desk_core::cleanup;
pub use desk_core::launch;
pub use desk_core::model;
pub use desk_core::profiles;

pub use desk_core::LauncherConfig;
