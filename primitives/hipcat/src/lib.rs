//! Pipe text to a HipChat room.
//!
//! - [`config`]: candidate path discovery and the `[hipchat]` accessors
//! - [`sender`]: request construction and response interpretation
//! - [`error`]: error types and their exit codes
//!
//! # Examples
//!
//! ```no_run
//! use hipcat::{Config, Sender};
//!
//! # async fn example() -> hipcat::Result<()> {
//! let config = Config::load()?;
//! Sender::new(&config)?.send("general", "deploy finished").await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod sender;

pub use config::{APP_NAME, Config, ConfigPaths, DEFAULT_BASE_URL};
pub use error::{ConfigError, Error, Result, SendError};
pub use sender::{Delivery, Sender, room_message_url};
