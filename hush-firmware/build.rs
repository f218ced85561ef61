//! Build script for hush-firmware
//!
//! - Sets up linker search paths and scripts for memory.x
//! - Validates node.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Known keys per section with the kind of value each takes
const SECTIONS: &[(&str, &[(&str, Kind)])] = &[
    ("bus", &[("baudrate", Kind::Positive)]),
    (
        "link",
        &[
            ("byte_timeout_ms", Kind::Positive),
            ("ping_total_ms", Kind::Positive),
            ("ping_retry_ms", Kind::Positive),
            ("heartbeat_window_ms", Kind::Positive),
            ("crying_window_ms", Kind::Positive),
        ],
    ),
    (
        "schedule",
        &[
            ("poll_interval_ms", Kind::Positive),
            ("heartbeat_delay_ms", Kind::Positive),
            ("crying_delay_ms", Kind::Positive),
            ("convergence_delay_ms", Kind::Positive),
            ("warmup_polls", Kind::Integer),
            ("warmup_interval_ms", Kind::Integer),
            ("crying_feedback", Kind::Bool),
        ],
    ),
    (
        "controller",
        &[
            ("panic_jump_bpm", Kind::Positive),
            ("improve_bpm", Kind::Positive),
            ("improve_cry", Kind::Integer),
            ("stable_bpm", Kind::Integer),
            ("crying_bpm_ceiling", Kind::Integer),
            ("crying_band_low", Kind::Integer),
            ("crying_band_high", Kind::Integer),
        ],
    ),
];

#[derive(Clone, Copy)]
enum Kind {
    /// Non-negative integer
    Integer,
    /// Positive integer
    Positive,
    Bool,
}

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate node.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=node.toml");

    let config_path = Path::new("node.toml");
    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read node.toml", &[e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail(
            "Invalid TOML syntax in node.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    };

    let errors = check(&config);
    if !errors.is_empty() {
        fail("Invalid values in node.toml", &errors);
    }

    println!("cargo:warning=node.toml validated successfully");
}

/// Collect every problem in the file
fn check(config: &toml::Value) -> Vec<String> {
    let mut errors = Vec::new();

    let Some(root) = config.as_table() else {
        errors.push("top level must be a table".to_string());
        return errors;
    };

    for (name, value) in root {
        let Some((_, keys)) = SECTIONS.iter().find(|(section, _)| section == name) else {
            errors.push(format!("unknown section [{}]", name));
            continue;
        };
        let Some(table) = value.as_table() else {
            errors.push(format!("[{}] must be a section", name));
            continue;
        };

        for (key, value) in table {
            // Unknown keys are ignored by the firmware parser too
            let Some((_, kind)) = keys.iter().find(|(k, _)| k == key) else {
                println!("cargo:warning=node.toml: ignoring unknown key {}.{}", name, key);
                continue;
            };
            if let Err(msg) = check_value(*kind, value) {
                errors.push(format!("{}.{}: {}", name, key, msg));
            }
        }
    }

    errors
}

fn check_value(kind: Kind, value: &toml::Value) -> Result<(), &'static str> {
    match (kind, value) {
        (Kind::Bool, toml::Value::Boolean(_)) => Ok(()),
        (Kind::Bool, _) => Err("expected true or false"),
        (_, toml::Value::Integer(n)) if *n < 0 => Err("must not be negative"),
        (Kind::Positive, toml::Value::Integer(0)) => Err("must not be zero"),
        (_, toml::Value::Integer(_)) => Ok(()),
        _ => Err("expected an integer"),
    }
}

/// Abort the build with a boxed error message
fn fail(title: &str, lines: &[String]) -> ! {
    let body = lines
        .iter()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.clone()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n");

    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}
