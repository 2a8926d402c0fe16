//! Per-field binding helpers
//!
//! Used by `#[derive(Bind)]`. Nothing here returns an error: a field that
//! cannot be bound is logged and keeps its current value.

use crate::convert::convert;
use crate::env::Environment;
use crate::error::ConvertError;
use std::any::Any;

/// Bind `slot` from the variable `name` using the built-in converter.
#[doc(hidden)]
pub fn bind<T: Any>(env: &dyn Environment, field: &str, name: &str, slot: &mut T) {
    let Some(value) = lookup(env, field, name) else {
        return;
    };

    match convert(&value, slot) {
        Ok(()) => {
            tracing::debug!(field, variable = name, "Bound field from environment");
        }
        Err(e) => conversion_failed(field, name, &e),
    }
}

/// Current value of `name`, logging a warning if it is not set.
#[doc(hidden)]
pub fn lookup(env: &dyn Environment, field: &str, name: &str) -> Option<String> {
    let value = env.get(name);
    if value.is_none() {
        tracing::warn!(field, variable = name, "Environment variable not found");
    }
    value
}

/// Log a value rejected by a custom parser for a field of type `T`.
#[doc(hidden)]
pub fn parse_failed<T>(field: &str, name: &str, value: &str, message: impl std::fmt::Display) {
    conversion_failed(field, name, &ConvertError::parse::<T>(value, message));
}

fn conversion_failed(field: &str, name: &str, error: &ConvertError) {
    tracing::warn!(
        field,
        variable = name,
        error = %error,
        "Could not convert environment variable to field type; leaving field unchanged"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MemoryEnv;
    use std::time::Duration;

    #[test]
    fn test_bind_sets_value() {
        let env = MemoryEnv::from_iter([("PORT", "8080")]);
        let mut port: u16 = 0;
        bind(&env, "port", "PORT", &mut port);
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_bind_missing_variable_keeps_value() {
        let env = MemoryEnv::new();
        let mut timeout = Duration::from_secs(5);
        bind(&env, "timeout", "TIMEOUT", &mut timeout);
        assert_eq!(timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_bind_invalid_value_keeps_value() {
        let env = MemoryEnv::from_iter([("WORKERS", "many")]);
        let mut workers: usize = 4;
        bind(&env, "workers", "WORKERS", &mut workers);
        assert_eq!(workers, 4);
    }

    #[test]
    fn test_bind_empty_value_is_present() {
        let env = MemoryEnv::from_iter([("NAME", "")]);
        let mut name = String::from("default");
        bind(&env, "name", "NAME", &mut name);
        assert_eq!(name, "");
    }

    #[test]
    fn test_lookup() {
        let env = MemoryEnv::from_iter([("SET", "value")]);
        assert_eq!(lookup(&env, "set", "SET").as_deref(), Some("value"));
        assert_eq!(lookup(&env, "unset", "UNSET"), None);
    }
}
