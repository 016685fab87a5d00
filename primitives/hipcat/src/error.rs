//! Error types for configuration loading and message delivery.
//!
//! Configuration problems are user errors and exit with code 2. Everything
//! that goes wrong after configuration is resolved exits with code 1.

use std::path::PathBuf;

/// Exit code for user and configuration errors.
pub const EXIT_USER_ERROR: i32 = 2;

/// Exit code for remote, transport and interrupt failures.
pub const EXIT_RUNTIME_ERROR: i32 = 1;

/// Errors raised while locating or reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// None of the candidate files could be read.
    #[error(
        "\nMissing configuration!\n\nYou must provide configuration in one of the following places:\n\n{}\n",
        format_paths(.paths)
    )]
    NotFound {
        /// Every path that was searched, in priority order.
        paths: Vec<PathBuf>,
    },

    /// A candidate file exists but is not valid INI.
    #[error("\nConfiguration error!\n\nCould not parse {}: {source}\n", .path.display())]
    Parse {
        /// The offending file.
        path: PathBuf,
        /// Parser diagnostic.
        #[source]
        source: ini::ParseError,
    },

    /// `hipchat.access_token` is unset or empty.
    #[error(
        "\nConfiguration error!\n\nYou must provide an 'access_token' in your configuration's 'hipchat' section.\n"
    )]
    MissingAccessToken,

    /// The home directory could not be determined, so no candidate paths exist.
    #[error("could not determine home directory")]
    NoHomeDirectory,
}

/// Errors raised while delivering a message.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    /// The API answered with an `error.message`.
    #[error("{0}")]
    Api(String),

    /// The API answered with a non-success status and a body that is not JSON.
    #[error("request failed with status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The request never produced a response.
    #[error("{}", error_chain(.0))]
    Transport(#[from] reqwest::Error),

    /// Standard input could not be read.
    #[error("failed to read message from standard input: {0}")]
    Stdin(#[source] std::io::Error),
}

/// Top-level error for one invocation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration could not be resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The message could not be delivered.
    #[error(transparent)]
    Send(#[from] SendError),
}

impl Error {
    /// Process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => EXIT_USER_ERROR,
            Self::Send(_) => EXIT_RUNTIME_ERROR,
        }
    }
}

/// Renders an error followed by each of its sources, separated by `: `.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| format!(" * {}", path.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A specialized Result type for hipcat operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_lists_every_path() {
        let err = ConfigError::NotFound {
            paths: vec![
                PathBuf::from("/home/u/.hipcat.ini"),
                PathBuf::from("/home/u/.config/hipcat/config.ini"),
                PathBuf::from("/home/u/.hipcat/config.ini"),
            ],
        };

        let text = err.to_string();
        assert!(text.contains("Missing configuration!"));
        assert!(text.contains(" * /home/u/.hipcat.ini\n"));
        assert!(text.contains(" * /home/u/.config/hipcat/config.ini\n"));
        assert!(text.contains(" * /home/u/.hipcat/config.ini"));
    }

    #[test]
    fn missing_token_names_key_and_section() {
        let text = ConfigError::MissingAccessToken.to_string();
        assert!(text.contains("'access_token'"));
        assert!(text.contains("'hipchat'"));
    }

    #[test]
    fn exit_codes_follow_error_family() {
        assert_eq!(Error::from(ConfigError::MissingAccessToken).exit_code(), 2);
        assert_eq!(
            Error::from(SendError::Api("Unauthorized".to_string())).exit_code(),
            1
        );
    }

    #[derive(Debug, thiserror::Error)]
    #[error("error sending request")]
    struct Outer(#[source] std::io::Error);

    #[test]
    fn error_chain_includes_causes() {
        let err = Outer(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "Connection refused",
        ));
        assert_eq!(error_chain(&err), "error sending request: Connection refused");
    }

    #[test]
    fn api_error_is_verbatim() {
        let err = SendError::Api("Room not found".to_string());
        assert_eq!(err.to_string(), "Room not found");
    }
}
