//! Logger bootstrap for the binary and tests.
use env_logger::{Builder, Env};
use log::{trace, LevelFilter};

/// Initializes the global logger.
///
/// When `verbose` is `true`, debug messages from the game core are printed.
/// Otherwise only info level and above are shown. `RUST_LOG` always wins.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(format!("runngun={level}"));
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();

    // Tests call `init` repeatedly; only the first logger sticks.
    if let Err(e) = builder.try_init() {
        trace!("logger already installed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_initialisation_is_harmless() {
        init(false);
        init(true);
        log::debug!("still logging");
    }
}
