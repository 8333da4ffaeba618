pub use desk_cli::banner;
pub use desk_cli::cli;
pub use desk_cli::commands;
pub use desk_cli::config;
pub use desk_cli::logging;
pub use desk_cli::pause;
pub use desk_cli::LauncherConfig;

pub use desk_core as core;
pub use desk_core::cleanup;
pub use desk_core::launch;
pub use desk_core::model;
pub use desk_core::profiles;
pub use desk_core::workspace;
