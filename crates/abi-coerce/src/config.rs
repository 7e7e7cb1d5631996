//! Coercion configuration.
//!
//! Defaults are strict. Environment overrides:
//!
//! | Variable | Values | Default |
//! |----------|--------|---------|
//! | `ABI_COERCE_OVERFLOW` | `reject`, `truncate` | `reject` |
//! | `ABI_COERCE_NUMERIC_STRINGS` | `1`, `true`, `yes`, `on` / `0`, `false`, `no`, `off` | off |

use std::str::FromStr;

pub const ENV_OVERFLOW: &str = "ABI_COERCE_OVERFLOW";
pub const ENV_NUMERIC_STRINGS: &str = "ABI_COERCE_NUMERIC_STRINGS";

/// What to do when decoded data is longer than a fixed-size slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Fail with `SourceTooLarge` / `ElementIndexOutOfRange`.
    #[default]
    Reject,
    /// Keep the leading part and drop the excess.
    Truncate,
}

impl FromStr for OverflowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(OverflowPolicy::Reject),
            "truncate" => Ok(OverflowPolicy::Truncate),
            other => Err(format!("unknown overflow policy '{}'", other)),
        }
    }
}

/// Knobs for the Value Coercer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoercionConfig {
    pub overflow: OverflowPolicy,
    /// Accept decimal or `0x` hex strings for integer parameters.
    pub numeric_strings: bool,
}

impl CoercionConfig {
    /// Defaults overridden by `ABI_COERCE_*` environment variables.
    /// Unset or unparseable variables leave the default in place.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            overflow: env_var_or(ENV_OVERFLOW, defaults.overflow),
            numeric_strings: env_bool_or(ENV_NUMERIC_STRINGS, defaults.numeric_strings),
        }
    }

    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    pub fn with_numeric_strings(mut self, enabled: bool) -> Self {
        self.numeric_strings = enabled;
        self
    }
}

fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_bool_or(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .and_then(|v| parse_bool(&v))
        .unwrap_or(default)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
