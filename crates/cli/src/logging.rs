use anyhow::{Context, Result};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Send launcher diagnostics to stderr so stdout carries only the banners.
pub fn init_tracing(filter: Option<String>) -> Result<()> {
    let env_filter = build_filter(filter.as_deref())?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
    Ok(())
}

/// An explicit `--log` filter replaces `RUST_LOG`; without one, `RUST_LOG`
/// applies on top of a `warn` default.
fn build_filter(filter: Option<&str>) -> Result<EnvFilter> {
    match filter {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log filter `{directives}`")),
        None => Ok(EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::env;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_rust_log<T>(value: Option<&str>, body: impl FnOnce() -> T) -> T {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let previous = env::var_os("RUST_LOG");
        match value {
            Some(value) => env::set_var("RUST_LOG", value),
            None => env::remove_var("RUST_LOG"),
        }
        let result = body();
        match previous {
            Some(previous) => env::set_var("RUST_LOG", previous),
            None => env::remove_var("RUST_LOG"),
        }
        result
    }

    #[test]
    fn log_flag_overrides_rust_log() {
        let filter = with_rust_log(Some("error"), || build_filter(Some("debug"))).expect("filter");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn rust_log_applies_without_flag() {
        let filter = with_rust_log(Some("error"), || build_filter(None)).expect("filter");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::ERROR));
    }

    #[test]
    fn defaults_to_warn() {
        let filter = with_rust_log(None, || build_filter(None)).expect("filter");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn accepts_per_crate_directives() {
        let filter = with_rust_log(None, || build_filter(Some("desk_core=debug,desk_cli=info")))
            .expect("filter");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn rejects_malformed_filter() {
        let err = with_rust_log(None, || build_filter(Some("desk_core=loud"))).unwrap_err();
        assert!(err.to_string().contains("invalid log filter"));
    }
}
