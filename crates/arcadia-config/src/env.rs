//! Environment variable fallback resolution.
//!
//! Only a named set of `ARCADIA_*` variables are recognized, each
//! mapped onto one dotted field path. Anything else in the
//! environment is ignored — this is a small override mechanism for a
//! handful of tunables at container/CI launch, not a second
//! serialization format.

use crate::error::{ConfigError, ConfigResult};

/// One `ARCADIA_*` variable and the dotted config path it overrides.
struct EnvMapping {
    var: &'static str,
    path: &'static [&'static str],
}

const MAPPINGS: &[EnvMapping] = &[
    EnvMapping { var: "ARCADIA_BUDGET_SESSION_MAX_USD", path: &["budget", "session_max_usd"] },
    EnvMapping { var: "ARCADIA_BUDGET_WARN_AT_PERCENT", path: &["budget", "warn_at_percent"] },
    EnvMapping { var: "ARCADIA_WATCHDOG_STALL_TIMEOUT_SECS", path: &["watchdog", "stall_timeout_secs"] },
    EnvMapping { var: "ARCADIA_WATCHDOG_CYCLIC_THRESHOLD", path: &["watchdog", "cyclic_threshold"] },
    EnvMapping { var: "ARCADIA_MEMORY_WARM_RETENTION", path: &["memory", "warm_retention"] },
    EnvMapping { var: "ARCADIA_LOGGING_LEVEL", path: &["logging", "level"] },
    EnvMapping { var: "ARCADIA_LOGGING_FORMAT", path: &["logging", "format"] },
    EnvMapping { var: "ARCADIA_SESSIONS_AUTO_RESUME", path: &["sessions", "auto_resume"] },
];

/// Build a TOML overlay from every recognized `ARCADIA_*` variable that
/// is set, reading through `std::env::var`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvValue`] if a variable is set to a
/// string that doesn't parse as the type its field expects.
pub fn overlay_from_env() -> ConfigResult<toml::Value> {
    overlay_from(|var| std::env::var(var).ok())
}

/// Same as [`overlay_from_env`] but sourced from a closure, so tests
/// don't have to mutate the real process environment.
fn overlay_from(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<toml::Value> {
    let mut root = toml::value::Table::new();
    for mapping in MAPPINGS {
        let Some(raw) = lookup(mapping.var) else { continue };
        let value = parse_value(mapping, &raw)?;
        insert_path(&mut root, mapping.path, value);
    }
    Ok(toml::Value::Table(root))
}

fn parse_value(mapping: &EnvMapping, raw: &str) -> ConfigResult<toml::Value> {
    let field = mapping.path.join(".");
    let invalid = |reason: String| ConfigError::InvalidEnvValue { var: mapping.var.into(), field: field.clone(), reason };

    let value = match mapping.var {
        "ARCADIA_BUDGET_SESSION_MAX_USD" => {
            toml::Value::Float(raw.parse::<f64>().map_err(|e| invalid(e.to_string()))?)
        },
        "ARCADIA_BUDGET_WARN_AT_PERCENT" | "ARCADIA_WATCHDOG_CYCLIC_THRESHOLD" => {
            toml::Value::Integer(raw.parse::<i64>().map_err(|e| invalid(e.to_string()))?)
        },
        "ARCADIA_WATCHDOG_STALL_TIMEOUT_SECS" | "ARCADIA_MEMORY_WARM_RETENTION" => {
            toml::Value::Integer(raw.parse::<i64>().map_err(|e| invalid(e.to_string()))?)
        },
        "ARCADIA_SESSIONS_AUTO_RESUME" => {
            toml::Value::Boolean(raw.parse::<bool>().map_err(|e| invalid(e.to_string()))?)
        },
        _ => toml::Value::String(raw.to_owned()),
    };
    Ok(value)
}

fn insert_path(root: &mut toml::value::Table, path: &[&str], value: toml::Value) {
    match path {
        [] => {},
        [last] => {
            root.insert((*last).to_owned(), value);
        },
        [head, rest @ ..] => {
            let entry = root
                .entry((*head).to_owned())
                .or_insert_with(|| toml::Value::Table(toml::value::Table::new()));
            if let toml::Value::Table(table) = entry {
                insert_path(table, rest, value);
            }
        },
    }
}
