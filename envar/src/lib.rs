//! Load `.env` files into the environment and bind struct fields from it
//!
//! `envar` does one load-then-bind pass: it reads a `.env` file from each
//! requested directory into the process environment, then fills the tagged
//! fields of a struct from that environment, converting each value to the
//! field's type.
//!
//! # Features
//!
//! - **Concurrent loading**: one thread per directory, first file to set a key wins it
//! - **Expansion**: `${NAME}` placeholders are resolved against the environment
//! - **Declarative**: tag fields with `#[env(name = "...")]` and `#[derive(Bind)]`
//! - **Lenient binding**: a missing or malformed variable leaves its field untouched
//! - **Isolated environments**: bind from a [`MemoryEnv`] instead of the process
//!
//! # File Format
//!
//! ```text
//! # comments and blank lines are ignored
//! DATA_DIR=/srv/${APP_NAME}
//! REQUEST_TIMEOUT = 30s
//! ```
//!
//! One `KEY=VALUE` per line, split on the first `=`, key and value trimmed.
//! There is no quoting and no multi-line value.
//!
//! # Example
//!
//! ```rust
//! use envar::Bind;
//! use std::time::Duration;
//!
//! #[derive(Debug, Default, Bind)]
//! struct Config {
//!     #[env(name = "DATABASE_URL")]
//!     pub database_url: String,
//!
//!     #[env(name = "REQUEST_TIMEOUT")]
//!     pub timeout: Duration,
//!
//!     #[env(name = "ALLOWED_HOSTS")]
//!     pub allowed_hosts: Vec<String>,
//!
//!     // Not tagged: never touched
//!     pub retries: u32,
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! # let dir = tempfile::tempdir()?;
//! # std::fs::write(
//! #     dir.path().join(".env"),
//! #     "DATABASE_URL=postgres://localhost/db\nREQUEST_TIMEOUT=30s\nALLOWED_HOSTS=a.example,b.example\n",
//! # )?;
//! let mut config = Config {
//!     retries: 3,
//!     ..Default::default()
//! };
//! envar::bind_dirs(&mut config, [dir.path()])?;
//!
//! assert_eq!(config.database_url, "postgres://localhost/db");
//! assert_eq!(config.timeout, Duration::from_secs(30));
//! assert_eq!(config.allowed_hosts, ["a.example", "b.example"]);
//! assert_eq!(config.retries, 3);
//! # Ok(())
//! # }
//! ```
//!
//! # Errors
//!
//! Loading is strict and binding is lenient. If any file fails to load the
//! call returns [`Error::Load`] and no field is bound. Once loading
//! succeeds the call succeeds: unset variables and values that do not
//! convert are logged through `tracing` and the field keeps its value.
//!
//! # Attributes
//!
//! ## `#[env(name = "VAR")]`
//!
//! Bind the field from `VAR`. Fields without it are ignored, and so is an
//! empty name.
//!
//! ## `#[env(prefix = "APP_")]`
//!
//! On the struct: prepend a prefix to every field's variable name.
//!
//! ```rust
//! # use envar::Bind;
//! #[derive(Default, Bind)]
//! #[env(prefix = "APP_")]
//! struct Config {
//!     // Bound from APP_PORT
//!     #[env(name = "PORT")]
//!     pub port: u16,
//! }
//! ```
//!
//! ## `#[env(name = "VAR", deserializer = "function")]`
//!
//! Parse the value with `function(&str) -> Result<T, E>` instead of the
//! built-in conversion, e.g. for types [`convert`] does not know.
//!
//! ```rust
//! # use envar::Bind;
//! #[derive(Default, Bind)]
//! struct Config {
//!     #[env(name = "PORTS", deserializer = "serde_json::from_str")]
//!     pub ports: Vec<u16>,
//! }
//! ```

mod binder;
mod convert;
mod env;
mod error;
mod expand;
#[doc(hidden)]
pub mod field;
mod loader;

pub use binder::{
    bind, bind_dirs, Bind, Binder, DEFAULT_FILE_NAME, DEFAULT_MAX_EXPANDED_LEN,
    DEFAULT_MAX_EXPANSION_PASSES,
};
pub use convert::convert;
pub use env::{Environment, MemoryEnv, ProcessEnv};
pub use envar_derive::Bind;
pub use error::{ConvertError, Error, LoadError, SetVarError};
