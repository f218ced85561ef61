//! Node configuration
//!
//! `node.toml` is compiled into the image and parsed once at boot.

use defmt::*;
use hush_core::config::{parse_config, NodeConfig};

/// Embedded configuration; edit node.toml and rebuild to change it
const EMBEDDED_CONFIG: &str = include_str!("../node.toml");

/// Parse the embedded configuration, falling back to defaults
pub fn load() -> NodeConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration");
            log(&config);
            config
        }
        Err(e) => {
            // build.rs rejects the same mistakes, so this only happens
            // when the two disagree
            error!(
                "node.toml line {}: {:?}, using defaults",
                e.line, e.kind
            );
            NodeConfig::default()
        }
    }
}

fn log(config: &NodeConfig) {
    debug!("bus: {} baud", config.bus.baudrate);
    debug!("link: {}", config.link);
    debug!("schedule: {}", config.schedule);
    debug!("controller: {}", config.controller);
}
