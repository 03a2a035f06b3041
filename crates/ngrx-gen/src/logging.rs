use std::sync::Once;

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Crates whose events are shown at the selected level.
const TARGETS: [&str; 3] = ["ngrx", "ngrx_gen_compiler", "ngrx_gen_common"];

/// Level from the command line flags; `--verbose` wins over `--quiet`.
pub fn level_for(verbose: bool, quiet: bool) -> Level {
    if verbose {
        Level::DEBUG
    } else if quiet {
        Level::ERROR
    } else {
        Level::INFO
    }
}

/// Install the stderr subscriber once. `RUST_LOG` overrides the flags.
pub fn init(level: Level) {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .try_init();
    });
}

fn default_directives(level: Level) -> String {
    let mut directives = vec!["warn".to_string()];
    directives.extend(TARGETS.iter().map(|target| format!("{target}={level}")));
    directives.join(",")
}
