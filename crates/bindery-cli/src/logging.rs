use tracing_subscriber::EnvFilter;

const LOG_VAR: &str = "BINDERY_LOG";

/// Install a stderr subscriber when `BINDERY_LOG` or `RUST_LOG` is set.
/// `BINDERY_LOG` wins when both are.
pub fn init() {
    let filter = match std::env::var(LOG_VAR) {
        Ok(directives) => EnvFilter::builder().parse_lossy(directives),
        Err(_) if std::env::var("RUST_LOG").is_ok() => EnvFilter::from_default_env(),
        Err(_) => return,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
