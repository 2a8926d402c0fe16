//! Key/value stores that config files are loaded into and fields are bound from

use crate::error::SetVarError;
use std::collections::HashMap;
use std::sync::Mutex;

/// A key/value store of environment variables.
///
/// The loader writes into it and expands `${NAME}` references against it,
/// the binder reads field values from it. Implementations must be safe to
/// share between the loader threads of one bind call.
pub trait Environment: Send + Sync {
    /// Current value of `key`, or `None` if it is not set.
    ///
    /// A variable set to the empty string is present. A process variable
    /// whose value is not valid unicode reads as unset.
    fn get(&self, key: &str) -> Option<String>;

    /// Set `key` to `value`.
    ///
    /// # Errors
    ///
    /// Refuses keys that are empty or contain `=` or NUL, and values that
    /// contain NUL.
    fn set(&self, key: &str, value: &str) -> Result<(), SetVarError>;
}

/// The real process environment.
///
/// Process-wide state with no teardown: anything set through it stays set
/// for the rest of the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        if key.is_empty() || key.contains(['=', '\0']) {
            return None;
        }
        match std::env::var(key) {
            Ok(value) => Some(value),
            Err(std::env::VarError::NotPresent) => None,
            Err(std::env::VarError::NotUnicode(_)) => {
                tracing::warn!(variable = key, "Environment variable is not valid unicode; treating as unset");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SetVarError> {
        validate(key, value)?;
        std::env::set_var(key, value);
        Ok(())
    }
}

/// An in-memory environment, isolated from the process environment.
///
/// ```
/// use envar::{Environment, MemoryEnv};
///
/// let env = MemoryEnv::from_iter([("HOST", "localhost")]);
/// env.set("PORT", "8080").unwrap();
/// assert_eq!(env.get("HOST").as_deref(), Some("localhost"));
/// assert_eq!(env.get("PORT").as_deref(), Some("8080"));
/// assert_eq!(std::env::var("PORT").ok(), None);
/// ```
#[derive(Debug, Default)]
pub struct MemoryEnv {
    vars: Mutex<HashMap<String, String>>,
}

impl MemoryEnv {
    /// Create an empty environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every variable currently set
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a consistent map: every write is a single insert.
        self.vars.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<K, V> FromIterator<(K, V)> for MemoryEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: Mutex::new(
                iter.into_iter()
                    .map(|(key, value)| (key.into(), value.into()))
                    .collect(),
            ),
        }
    }
}

impl Environment for MemoryEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SetVarError> {
        validate(key, value)?;
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<E: Environment + ?Sized> Environment for &E {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SetVarError> {
        (**self).set(key, value)
    }
}

/// Same rules `std::env::set_var` panics on, reported as errors instead.
fn validate(key: &str, value: &str) -> Result<(), SetVarError> {
    if key.is_empty() {
        return Err(SetVarError::EmptyKey);
    }
    if key.contains(['=', '\0']) {
        return Err(SetVarError::InvalidKey);
    }
    if value.contains('\0') {
        return Err(SetVarError::InvalidValue);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    fn test_memory_env_set_and_get() {
        let env = MemoryEnv::new();
        assert_eq!(env.get("MEM_KEY"), None);

        env.set("MEM_KEY", "value").unwrap();
        assert_eq!(env.get("MEM_KEY").as_deref(), Some("value"));

        env.set("MEM_KEY", "").unwrap();
        assert_eq!(env.get("MEM_KEY").as_deref(), Some(""));
    }

    #[test]
    fn test_memory_env_rejects_invalid_keys() {
        let env = MemoryEnv::new();
        assert_eq!(env.set("", "value"), Err(SetVarError::EmptyKey));
        assert_eq!(env.set("A=B", "value"), Err(SetVarError::InvalidKey));
        assert_eq!(env.set("A\0B", "value"), Err(SetVarError::InvalidKey));
        assert_eq!(env.set("A", "a\0b"), Err(SetVarError::InvalidValue));
        assert!(env.snapshot().is_empty());
    }

    #[test]
    #[serial]
    fn test_process_env_set_and_get() {
        env::remove_var("ENVAR_PROCESS_TEST");
        assert_eq!(ProcessEnv.get("ENVAR_PROCESS_TEST"), None);

        ProcessEnv.set("ENVAR_PROCESS_TEST", "42").unwrap();
        assert_eq!(env::var("ENVAR_PROCESS_TEST").unwrap(), "42");
        assert_eq!(ProcessEnv.get("ENVAR_PROCESS_TEST").as_deref(), Some("42"));

        env::remove_var("ENVAR_PROCESS_TEST");
    }

    #[test]
    #[serial]
    #[cfg(unix)]
    fn test_process_env_non_unicode_value_is_unset() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        env::set_var("ENVAR_NON_UNICODE_TEST", OsStr::from_bytes(b"db\xff\xfe"));
        assert_eq!(ProcessEnv.get("ENVAR_NON_UNICODE_TEST"), None);

        env::remove_var("ENVAR_NON_UNICODE_TEST");
    }

    #[test]
    fn test_process_env_rejects_instead_of_panicking() {
        assert_eq!(ProcessEnv.set("", "value"), Err(SetVarError::EmptyKey));
        assert_eq!(ProcessEnv.set("BAD=KEY", "value"), Err(SetVarError::InvalidKey));
        assert_eq!(ProcessEnv.get("BAD=KEY"), None);
    }
}
