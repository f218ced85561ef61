//! Node configuration
//!
//! Configuration is compiled into the firmware as a small TOML file and
//! parsed at boot. Every key is optional; missing keys keep the defaults.

pub mod toml;
pub mod types;

pub use self::toml::{parse_config, ParseError, ParseErrorKind};
pub use types::*;
