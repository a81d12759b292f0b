use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` wins over `level` when set.
///
/// # Errors
///
/// Will return `Err` if a subscriber is already installed or `level` is not a
/// valid filter
pub fn init_logging(level: &str, json: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)?,
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_line_number(false);
    if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    }
}
