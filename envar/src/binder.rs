//! The load-then-bind entry points

use crate::env::{Environment, ProcessEnv};
use crate::error::Error;
use crate::loader::{self, LoadOptions};
use std::path::{Path, PathBuf};

/// A record whose fields can be populated from an [`Environment`].
///
/// Usually derived with `#[derive(Bind)]`: only fields tagged with
/// `#[env(name = "...")]` are touched.
pub trait Bind {
    /// Populate tagged fields from `env`.
    ///
    /// Fields whose variable is missing, or whose value does not convert,
    /// are logged and left as they are.
    fn bind_fields(&mut self, env: &dyn Environment);
}

/// Configurable loader and binder.
///
/// ```no_run
/// use envar::{Bind, Binder};
///
/// #[derive(Default, Bind)]
/// struct Config {
///     #[env(name = "DATABASE_URL")]
///     pub database_url: String,
/// }
///
/// # fn main() -> Result<(), envar::Error> {
/// let mut config = Config::default();
/// Binder::new()
///     .file_name("app.env")
///     .require_files(true)
///     .bind(&mut config, ["/etc/app", "."])?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Binder<E = ProcessEnv> {
    env: E,
    file_name: String,
    options: LoadOptions,
}

impl Binder {
    /// Binder over the process environment with default settings.
    pub fn new() -> Self {
        Self {
            env: ProcessEnv,
            file_name: DEFAULT_FILE_NAME.to_string(),
            options: LoadOptions {
                expand: true,
                max_expansion_passes: DEFAULT_MAX_EXPANSION_PASSES,
                max_expanded_len: DEFAULT_MAX_EXPANDED_LEN,
                require_files: false,
            },
        }
    }
}

impl Default for Binder {
    fn default() -> Self {
        Self::new()
    }
}

/// File looked up in every directory unless overridden
pub const DEFAULT_FILE_NAME: &str = ".env";

/// Substituting expansion passes allowed before a value is considered cyclic
pub const DEFAULT_MAX_EXPANSION_PASSES: usize = 16;

/// Largest size in bytes an expanded value may reach
pub const DEFAULT_MAX_EXPANDED_LEN: usize = 128 * 1024;

impl<E: Environment> Binder<E> {
    /// Load into and bind from `env` instead.
    pub fn environment<F: Environment>(self, env: F) -> Binder<F> {
        Binder {
            env,
            file_name: self.file_name,
            options: self.options,
        }
    }

    /// Name of the config file looked up in each directory (default `.env`).
    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Whether `${NAME}` placeholders are expanded (default `true`).
    pub fn expand(mut self, expand: bool) -> Self {
        self.options.expand = expand;
        self
    }

    /// Substituting passes allowed per value (default 16).
    ///
    /// A value that settles after exactly `passes` substitutions is
    /// accepted; one still changing after that is reported as
    /// [`LoadError::CyclicReference`](crate::LoadError::CyclicReference).
    /// `0` is raised to `1` so a single `${NAME}` always resolves.
    pub fn max_expansion_passes(mut self, passes: usize) -> Self {
        self.options.max_expansion_passes = passes.max(1);
        self
    }

    /// Largest size in bytes an expanded value may reach (default 128 KiB).
    ///
    /// Expansion stops with
    /// [`LoadError::ExpansionTooLarge`](crate::LoadError::ExpansionTooLarge)
    /// as soon as a value outgrows it. A value already longer in the file
    /// is never rejected for its own length.
    pub fn max_expanded_len(mut self, len: usize) -> Self {
        self.options.max_expanded_len = len;
        self
    }

    /// Whether a missing config file fails the call instead of being
    /// logged and skipped (default `false`).
    pub fn require_files(mut self, require: bool) -> Self {
        self.options.require_files = require;
        self
    }

    /// The environment this binder loads into and binds from.
    pub fn env(&self) -> &E {
        &self.env
    }

    /// Load the config file from each directory, then bind `target`.
    ///
    /// With no directories, the config file in the current working
    /// directory is loaded instead. Directories are loaded concurrently and
    /// the first file to set a key wins it for the rest of the call.
    ///
    /// # Errors
    ///
    /// - [`Error::Load`] if any file failed to load; `target` is not touched
    /// - [`Error::CurrentDir`] if no directory was given and the working
    ///   directory cannot be resolved
    pub fn bind<T, I, P>(&self, target: &mut T, dirs: I) -> Result<(), Error>
    where
        T: Bind + ?Sized,
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.load(dirs)?;
        target.bind_fields(&self.env);
        Ok(())
    }

    /// Load the config file from each directory without binding anything.
    ///
    /// # Errors
    ///
    /// Same as [`Binder::bind`].
    pub fn load<I, P>(&self, dirs: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let files = self.config_files(dirs)?;
        let errors = loader::load_all(&files, &self.env, &self.options);
        if errors.is_empty() {
            return Ok(());
        }

        for error in &errors {
            tracing::error!(error = %error, "Failed to load config file");
        }
        Err(Error::Load { errors })
    }

    fn config_files<I, P>(&self, dirs: I) -> Result<Vec<PathBuf>, Error>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut files: Vec<PathBuf> = dirs
            .into_iter()
            .map(|dir| dir.as_ref().join(&self.file_name))
            .collect();

        if files.is_empty() {
            let cwd = std::env::current_dir().map_err(|source| Error::CurrentDir { source })?;
            files.push(cwd.join(&self.file_name));
        }
        Ok(files)
    }
}

/// Load `.env` from the current directory, then bind `target` from the
/// process environment.
///
/// # Errors
///
/// See [`Binder::bind`].
pub fn bind<T: Bind + ?Sized>(target: &mut T) -> Result<(), Error> {
    Binder::new().bind(target, std::iter::empty::<PathBuf>())
}

/// Load `.env` from each of `dirs` (and not from the current directory),
/// then bind `target` from the process environment.
///
/// # Errors
///
/// See [`Binder::bind`].
pub fn bind_dirs<T, I, P>(target: &mut T, dirs: I) -> Result<(), Error>
where
    T: Bind + ?Sized,
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    Binder::new().bind(target, dirs)
}
