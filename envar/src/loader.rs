//! Loading `KEY=VALUE` config files into an environment
//!
//! Every requested directory gets its own scoped thread. All threads of one
//! load share a [`LoadedSet`], which makes the first thread to commit a key
//! its only writer for the rest of the call.

use crate::env::Environment;
use crate::error::LoadError;
use crate::expand::{self, ExpandError};
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::thread;

/// Settings shared by every file of one load.
#[derive(Debug, Clone)]
pub(crate) struct LoadOptions {
    pub expand: bool,
    pub max_expansion_passes: usize,
    pub max_expanded_len: usize,
    pub require_files: bool,
}

/// Keys committed by the current call.
///
/// Tracks what this call wrote, not what the environment already held
/// before it: a pre-existing variable is still overwritten by the first
/// file that defines it.
#[derive(Debug, Default)]
pub(crate) struct LoadedSet {
    keys: Mutex<HashSet<String>>,
}

impl LoadedSet {
    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.keys.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, key: &str) -> bool {
        self.lock().contains(key)
    }
}

/// Split a config line into a trimmed key and value.
///
/// Returns `None` for blank lines, `#` comments, and lines without `=`.
pub(crate) fn parse_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (key, value) = line.split_once('=')?;
    Some((key.trim(), value.trim()))
}

/// Load every file concurrently and collect the failures.
///
/// Returns once all loaders have finished; the returned errors are in the
/// order of `files`.
pub(crate) fn load_all(
    files: &[PathBuf],
    env: &dyn Environment,
    options: &LoadOptions,
) -> Vec<LoadError> {
    let loaded = LoadedSet::default();

    thread::scope(|scope| {
        let handles: Vec<_> = files
            .iter()
            .map(|path| {
                let loaded = &loaded;
                scope.spawn(move || load_file(path, loaded, env, options))
            })
            .collect();

        handles
            .into_iter()
            .filter_map(|handle| match handle.join() {
                Ok(result) => result.err(),
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    })
}

/// Load a single config file into `env`.
///
/// A missing file is logged and skipped unless `require_files` is set.
pub(crate) fn load_file(
    path: &Path,
    loaded: &LoadedSet,
    env: &dyn Environment,
    options: &LoadOptions,
) -> Result<(), LoadError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            if options.require_files {
                return Err(LoadError::NotFound {
                    path: path.to_path_buf(),
                });
            }
            tracing::warn!(path = %path.display(), "Config file not found; skipping");
            return Ok(());
        }
        Err(e) => {
            return Err(LoadError::Open {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    tracing::debug!(path = %path.display(), "Loading config file");

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| LoadError::Read {
            path: path.to_path_buf(),
            line: index + 1,
            source: e,
        })?;

        let Some((key, value)) = parse_line(&line) else {
            continue;
        };

        commit(path, key, value, loaded, env, options)?;
    }

    Ok(())
}

/// Check, expand, write and mark `key` under one lock so two files can
/// never both win the same key.
fn commit(
    path: &Path,
    key: &str,
    value: &str,
    loaded: &LoadedSet,
    env: &dyn Environment,
    options: &LoadOptions,
) -> Result<(), LoadError> {
    let mut keys = loaded.lock();
    if keys.contains(key) {
        tracing::debug!(path = %path.display(), variable = key, "Already loaded; skipping");
        return Ok(());
    }

    let value = if options.expand {
        expand::expand(
            value,
            env,
            options.max_expansion_passes,
            options.max_expanded_len,
        )
        .map_err(|e| match e {
            ExpandError::Unsettled { passes } => LoadError::CyclicReference {
                path: path.to_path_buf(),
                key: key.to_string(),
                passes,
            },
            ExpandError::TooLarge { limit } => LoadError::ExpansionTooLarge {
                path: path.to_path_buf(),
                key: key.to_string(),
                limit,
            },
        })?
    } else {
        value.to_string()
    };

    env.set(key, &value).map_err(|e| LoadError::SetVar {
        path: path.to_path_buf(),
        key: key.to_string(),
        source: e,
    })?;
    keys.insert(key.to_string());

    tracing::debug!(path = %path.display(), variable = key, "Set environment variable");
    Ok(())
}
