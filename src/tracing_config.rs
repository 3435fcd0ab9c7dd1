//! Logging for the `hfx-aot` binary.
//!
//! `HFX_LOG` selects what is logged from the compiler crates:
//!
//! - `1` / `true` / `on`: debug output from every `hfx_*` crate
//! - a bare level (`trace`, `info`, ...): that level, `hfx_*` crates only
//! - anything else: `RUST_LOG` directives, used as written
//!
//! `HFX_LOG_FORMAT=tree` nests pass and codegen events under their
//! `compile_handler` span; `json` writes one object per line. Output goes to
//! stderr so compiled JavaScript on stdout stays clean.
//!
//! ```bash
//! HFX_LOG=1 HFX_LOG_FORMAT=tree hfx-aot handlers.json
//! HFX_LOG="hfx_optimizer=trace" hfx-aot handlers.json
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

const LOG_ENV: &str = "HFX_LOG";
const LOG_FORMAT_ENV: &str = "HFX_LOG_FORMAT";

/// Tracing targets of the compiler pipeline, driver first.
const PIPELINE_TARGETS: [&str; 4] = ["hyperfixi_aot", "hfx_ast", "hfx_optimizer", "hfx_emitter"];

const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Text,
    Tree,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// `level` applied to every pipeline target.
fn pipeline_directives(level: &str) -> String {
    PIPELINE_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Filter directives for an `HFX_LOG` value.
fn filter_directives(value: &str) -> String {
    let value = value.trim();
    let lowered = value.to_lowercase();
    match lowered.as_str() {
        "" | "1" | "true" | "on" => pipeline_directives("debug"),
        level if LEVELS.iter().any(|known| *known == level) => pipeline_directives(level),
        _ => value.to_string(),
    }
}

fn build_filter() -> Option<EnvFilter> {
    match std::env::var(LOG_ENV) {
        Ok(value) => Some(EnvFilter::builder().parse_lossy(filter_directives(&value))),
        Err(_) if std::env::var(EnvFilter::DEFAULT_ENV).is_ok() => {
            Some(EnvFilter::from_default_env())
        }
        Err(_) => None,
    }
}

/// Install the global subscriber when `HFX_LOG` or `RUST_LOG` is set.
pub fn init_tracing() {
    let Some(filter) = build_filter() else {
        return;
    };

    let format = LogFormat::parse(&std::env::var(LOG_FORMAT_ENV).unwrap_or_default());
    match format {
        LogFormat::Tree => {
            // Handler ids and event names sit on the span, so targets are noise.
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_writer(std::io::stderr)
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_targets(false);

            Registry::default().with(filter).with(tree_layer).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_writer(std::io::stderr);

            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

#[cfg(test)]
#[path = "../tests/tracing_config_tests.rs"]
mod tests;
