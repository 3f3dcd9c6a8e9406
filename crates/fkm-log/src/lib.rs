// ABOUTME: Shared logging setup for applications using the fkm crates
// ABOUTME: init() keeps fkm quiet unless asked; init_verbose() shows store and fetch activity

use tracing_subscriber::EnvFilter;

/// Crates whose events `init_verbose` raises to DEBUG.
const FKM_CRATES: &[&str] = &["fkm_core", "fkm_ssh", "fkm_remote"];

/// Standard logging to stderr. Default: WARN level, RUST_LOG override.
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// DEBUG for the fkm crates, WARN for everything else (HTTP stack included).
pub fn init_verbose() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(verbose_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

fn verbose_filter() -> EnvFilter {
    FKM_CRATES.iter().fold(
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        |filter, name| match format!("{name}=debug").parse() {
            Ok(directive) => filter.add_directive(directive),
            Err(_) => filter,
        },
    )
}
