use std::process::ExitCode;

use auth_headers::{Challenge, Credentials, DigestChallenge, HeaderError};
use clap::{Parser, Subcommand};
use shared::LogFormat;
use thiserror::Error;
use tracing::{debug, error};

mod report;

use report::{ChallengeReport, CredentialsReport};

#[derive(Parser, Debug)]
#[command(
    name = "authhdr",
    version,
    about = "Decode and build Authorization / WWW-Authenticate header values"
)]
struct Cli {
    /// Log filter used when RUST_LOG is not set.
    #[arg(long, env = "AUTHHDR_LOG", default_value = "warn")]
    log: String,

    /// Emit logs as JSON lines.
    #[arg(long, env = "AUTHHDR_JSON_LOGS")]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print an Authorization header value as JSON.
    DecodeAuthorization { value: String },

    /// Print a WWW-Authenticate header value as JSON.
    DecodeChallenge { value: String },

    /// Build a Basic WWW-Authenticate value.
    Basic {
        #[arg(long, env = "AUTHHDR_REALM")]
        realm: Option<String>,
    },

    /// Build a Digest WWW-Authenticate value.
    Digest {
        #[arg(long, env = "AUTHHDR_REALM")]
        realm: String,

        #[arg(long)]
        nonce: String,

        #[arg(long, default_value = "auth")]
        qop: Vec<String>,

        #[arg(long)]
        opaque: Option<String>,

        #[arg(long)]
        algorithm: Option<String>,

        #[arg(long)]
        stale: bool,
    },

    /// Build a Basic Authorization value.
    CredentialsBasic {
        #[arg(long)]
        username: String,

        #[arg(long, env = "AUTHHDR_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Header(#[from] HeaderError),

    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    if let Err(err) = shared::load_dotenv() {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    let cli = Cli::parse();
    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    if let Err(err) = shared::init_logging(&cli.log, format) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    debug!(json_logs = cli.json_logs, filter = %cli.log, "logging initialized");

    match run(cli.command) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<String, CliError> {
    match command {
        Command::DecodeAuthorization { value } => {
            let credentials = Credentials::parse(&value)?;
            Ok(serde_json::to_string_pretty(&CredentialsReport::from(
                &credentials,
            ))?)
        }
        Command::DecodeChallenge { value } => {
            let challenge = Challenge::parse(&value)?;
            Ok(serde_json::to_string_pretty(&ChallengeReport::from(
                &challenge,
            ))?)
        }
        Command::Basic { realm } => {
            let mut challenge = Challenge::new();
            challenge.set_basic(realm.as_deref());
            Ok(challenge.to_header()?)
        }
        Command::Digest {
            realm,
            nonce,
            qop,
            opaque,
            algorithm,
            stale,
        } => {
            let mut digest = DigestChallenge::new(realm, nonce).qop(qop).stale(stale);
            if let Some(opaque) = opaque {
                digest = digest.opaque(opaque);
            }
            if let Some(algorithm) = algorithm {
                digest = digest.algorithm(algorithm);
            }

            let mut challenge = Challenge::new();
            challenge.set_digest(digest);
            Ok(challenge.to_header()?)
        }
        Command::CredentialsBasic { username, password } => {
            Ok(Credentials::basic(username, password).to_header()?)
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn run_args(args: &[&str]) -> Result<String, CliError> {
        let cli = Cli::try_parse_from(args).unwrap();
        run(cli.command)
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_digest_command() {
        let output = run_args(&[
            "authhdr", "digest", "--realm", "api", "--nonce", "abc", "--qop", "auth", "--qop",
            "auth-int", "--stale",
        ])
        .unwrap();

        assert_eq!(
            output,
            r#"Digest realm="api", nonce="abc", qop="auth auth-int", stale=TRUE"#
        );
    }

    #[test]
    fn test_credentials_basic_command() {
        let output = run_args(&[
            "authhdr",
            "credentials-basic",
            "--username",
            "alice",
            "--password",
            "secret",
        ])
        .unwrap();

        assert_eq!(output, "Basic YWxpY2U6c2VjcmV0");
    }

    #[test]
    fn test_decode_authorization_rejects_garbage() {
        let err = run_args(&["authhdr", "decode-authorization", "Basic ???"]).unwrap_err();
        assert!(matches!(err, CliError::Header(HeaderError::Parse { .. })));
    }

    #[test]
    fn test_decode_challenge_outputs_json() {
        let output = run_args(&[
            "authhdr",
            "decode-challenge",
            r#"Basic realm="admin""#,
        ])
        .unwrap();

        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["scheme"], "Basic");
        assert_eq!(json["realm"], "admin");
    }
}
