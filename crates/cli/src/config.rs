//! Referee CLI configuration.
use std::env;
use std::path::PathBuf;

/// Settings for one scripted bout run.
///
/// Everything comes from the environment (a `.env` file is honoured); the
/// first command-line argument, when present, overrides `ARENA_SCRIPT`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CliConfig {
    /// Bout script to play.
    pub script: Option<PathBuf>,
    /// Directory holding `moves.ron`, `roster.ron` and `config.toml`.
    /// The embedded standard content is used when unset.
    pub data_dir: Option<PathBuf>,
    /// Overrides the seed named in the script.
    pub seed: Option<u64>,
    pub stop_on_rejection: bool,
    /// Print the JSON read model after the transcript.
    pub export_json: bool,
    /// Also write logs to `arena.log` in this directory.
    pub log_dir: Option<PathBuf>,
}

impl CliConfig {
    /// Construct CLI configuration from environment variables.
    ///
    /// Environment variables:
    /// - `ARENA_SCRIPT` - Path to the bout script (RON)
    /// - `ARENA_DATA_DIR` - Content directory (default: embedded content)
    /// - `ARENA_SEED` - Seed override
    /// - `ARENA_STOP_ON_REJECTION` - Stop at the first rejected step (default: false)
    /// - `ARENA_EXPORT_JSON` - Print the state as JSON (default: false)
    /// - `ARENA_LOG_DIR` - Mirror logs into a file
    pub fn from_env() -> Self {
        Self {
            script: read_env("ARENA_SCRIPT"),
            data_dir: read_env("ARENA_DATA_DIR"),
            seed: read_env("ARENA_SEED"),
            stop_on_rejection: read_env("ARENA_STOP_ON_REJECTION").unwrap_or(false),
            export_json: read_env("ARENA_EXPORT_JSON").unwrap_or(false),
            log_dir: read_env("ARENA_LOG_DIR"),
        }
    }

    /// Applies command-line overrides.
    pub fn with_args(mut self, mut args: impl Iterator<Item = String>) -> Self {
        if let Some(script) = args.next() {
            self.script = Some(PathBuf::from(script));
        }
        self
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_argument_overrides_the_script() {
        let config = CliConfig {
            script: Some(PathBuf::from("env.ron")),
            ..CliConfig::default()
        }
        .with_args(["cli.ron".to_string()].into_iter());
        assert_eq!(config.script, Some(PathBuf::from("cli.ron")));

        let untouched = CliConfig::default().with_args(std::iter::empty());
        assert_eq!(untouched, CliConfig::default());
    }
}
