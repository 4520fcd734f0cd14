use tracing::Level;
use tracing_subscriber::EnvFilter;

pub struct Logger;

impl Logger {
    /// Installs the stderr subscriber. `--debug` lowers the level to debug,
    /// otherwise only warnings and errors are shown. `MNKY_LOG` directives
    /// are added on top. Later calls are ignored.
    pub fn init(debug: bool) {
        let level = if debug { Level::DEBUG } else { Level::WARN };
        let filter = EnvFilter::builder()
            .with_default_directive(level.into())
            .with_env_var("MNKY_LOG")
            .from_env_lossy();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_init_twice() {
        Logger::init(true);
        Logger::init(false);
        tracing::debug!("still fine");
    }
}
