//! hipcat - Pipe text to a HipChat room
//!
//! Posts a single message to a room through the HipChat v2 API, using the
//! access token from `~/.hipcat.ini` or `<config dir>/hipcat/config.ini`.
//!
//! # Usage
//!
//! ```bash
//! # Message as an argument
//! hipcat general -m "deploy finished"
//!
//! # Message from standard input
//! make test 2>&1 | tail -n 20 | hipcat ops
//!
//! # Verbose logging on stderr
//! HIPCAT_LOG=debug hipcat general -m hi
//! ```
//!
//! # Exit Codes
//!
//! - `0` - message sent, or nothing to send
//! - `1` - interrupted, or the API reported an error
//! - `2` - configuration problem

use clap::Parser;
use hipcat::error::EXIT_RUNTIME_ERROR;
use hipcat::{Config, Delivery, SendError, Sender};
use tokio::io::AsyncReadExt;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hipcat")]
#[command(version, about, long_about = None)]
struct Args {
    /// Room ID or name.
    room: String,

    /// Message text. Read from standard input when omitted.
    #[arg(short, long)]
    message: Option<String>,
}

/// Installs the stderr log subscriber.
///
/// The filter comes from `HIPCAT_LOG`, then `RUST_LOG`, and defaults to `warn`.
fn init_logging() {
    let filter = EnvFilter::try_from_env("HIPCAT_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Reads all of standard input.
async fn read_stdin() -> Result<String, SendError> {
    let mut message = String::new();
    tokio::io::stdin()
        .read_to_string(&mut message)
        .await
        .map_err(SendError::Stdin)?;
    Ok(message)
}

async fn run(args: Args) -> hipcat::Result<Delivery> {
    let config = Config::load()?;

    let message = match args.message.filter(|m| !m.is_empty()) {
        Some(message) => message,
        None => read_stdin().await?,
    };

    Sender::new(&config)?.send(&args.room, &message).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logging();
    let args = Args::parse();

    // Exit directly so a pending stdin read cannot hold up runtime shutdown.
    let code = tokio::select! {
        Ok(()) = tokio::signal::ctrl_c() => {
            debug!("interrupted");
            EXIT_RUNTIME_ERROR
        }

        result = run(args) => match result {
            Ok(delivery) => {
                debug!(?delivery, "done");
                0
            }
            Err(e) => {
                eprintln!("{e}");
                e.exit_code()
            }
        },
    };

    std::process::exit(code);
}
