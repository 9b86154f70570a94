use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialise structured logging.
///
/// `RUST_LOG` wins when set; otherwise `default_directives` applies. In the
/// `prod` environment log lines are emitted as JSON.
pub fn init(default_directives: &str, env: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directives.into());
    let registry = tracing_subscriber::registry().with(filter);

    if env.eq_ignore_ascii_case("prod") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
