//! Build-once initialization for shared components.
//!
//! # Responsibility
//! - Define the `Builder` capability: a named construction strategy fed a
//!   variable, type-erased argument list.
//! - Guard each builder with `Singleton`, which publishes at most one built
//!   instance for its lifetime.
//!
//! # Invariants
//! - A second `Singleton::build` is rejected with `AlreadyInitialized`; the
//!   first published value is never replaced.
//! - Builds are serialized by the singleton's lock; concurrent first callers
//!   converge on exactly one published instance.
//! - `Singleton::get` never blocks and returns `None` before a build succeeds.
//! - A failed build leaves the singleton unpublished and buildable again.

use log::{debug, error, info, warn};
use once_cell::sync::OnceCell;
use std::any::{type_name, Any};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::sync::{Arc, Mutex, PoisonError};

mod builders;

pub use builders::{
    FnBuilder, InMemoryReminderRepositoryBuilder, InMemoryTaskRepositoryBuilder,
    SqliteReminderRepositoryBuilder, SqliteTaskRepositoryBuilder, TaskServiceBuilder,
};

pub type InitResult<T> = Result<T, InitError>;

/// Startup wiring failures.
#[derive(Debug)]
pub enum InitError {
    /// The named singleton was already built.
    AlreadyInitialized(String),
    /// A dependency of the named component has not been built yet.
    NotInitialized(String),
    /// The builder received the wrong number of arguments.
    ArgumentMismatch { expected: usize, actual: usize },
    /// The argument at `index` is not of the type the builder requires.
    InvalidType {
        index: usize,
        expected: &'static str,
    },
    /// No construction strategy exists for the requested backend.
    UnsupportedBackend(String),
    /// The builder's own construction step failed.
    Build {
        name: String,
        source: Box<dyn Error + Send + Sync>,
    },
}

impl InitError {
    pub fn build(name: impl Into<String>, source: impl Error + Send + Sync + 'static) -> Self {
        Self::Build {
            name: name.into(),
            source: Box::new(source),
        }
    }
}

impl Display for InitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyInitialized(name) => {
                write!(f, "initializing `{name}` again is not allowed")
            }
            Self::NotInitialized(name) => write!(f, "`{name}` has not been initialized"),
            Self::ArgumentMismatch { expected, actual } => write!(
                f,
                "argument mismatch: expected {expected} argument(s), got {actual}"
            ),
            Self::InvalidType { index, expected } => {
                write!(f, "invalid type for argument {index}: expected `{expected}`")
            }
            Self::UnsupportedBackend(name) => write!(f, "unsupported backend `{name}`"),
            Self::Build { name, source } => write!(f, "failed to build `{name}`: {source}"),
        }
    }
}

impl Error for InitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Build { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Variable argument list handed to a builder.
///
/// Values are stored type-erased; builders recover them with `take`, which
/// matches the exact stored type (an `Arc<SqliteHandler>` is not an
/// `Arc<dyn Handler>`).
#[derive(Default)]
pub struct BuildArgs {
    values: Vec<Option<Box<dyn Any + Send>>>,
}

impl BuildArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one argument.
    pub fn with<T: Any + Send>(mut self, value: T) -> Self {
        self.values.push(Some(Box::new(value)));
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fails with `ArgumentMismatch` unless exactly `expected` arguments were given.
    pub fn expect_len(&self, expected: usize) -> InitResult<()> {
        if self.values.len() != expected {
            return Err(InitError::ArgumentMismatch {
                expected,
                actual: self.values.len(),
            });
        }
        Ok(())
    }

    /// Moves the argument at `index` out as a `T`.
    ///
    /// # Errors
    /// - `ArgumentMismatch` when `index` is past the end.
    /// - `InvalidType` when the stored value is not a `T` or was already taken.
    pub fn take<T: Any>(&mut self, index: usize) -> InitResult<T> {
        let actual = self.values.len();
        let slot = self
            .values
            .get_mut(index)
            .ok_or(InitError::ArgumentMismatch {
                expected: index + 1,
                actual,
            })?;
        let value = slot.take().ok_or_else(|| invalid_type::<T>(index))?;
        match value.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(value) => {
                *slot = Some(value);
                Err(invalid_type::<T>(index))
            }
        }
    }
}

fn invalid_type<T>(index: usize) -> InitError {
    InitError::InvalidType {
        index,
        expected: type_name::<T>(),
    }
}

impl Debug for BuildArgs {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildArgs")
            .field("len", &self.values.len())
            .finish()
    }
}

/// A named construction strategy for one shared component.
pub trait Builder: Send + Sync {
    type Output: ?Sized + Send + Sync;

    /// Stable name used in errors and logs.
    fn name(&self) -> &str;

    /// Constructs the component from `args`.
    fn build(&self, args: BuildArgs) -> InitResult<Arc<Self::Output>>;
}

impl<B: Builder + ?Sized> Builder for Box<B> {
    type Output = B::Output;

    fn name(&self) -> &str {
        (**self).name()
    }

    fn build(&self, args: BuildArgs) -> InitResult<Arc<Self::Output>> {
        (**self).build(args)
    }
}

/// Guards a builder so it publishes at most one instance.
pub struct Singleton<B: Builder> {
    builder: B,
    lock: Mutex<()>,
    slot: OnceCell<Arc<B::Output>>,
}

impl<B: Builder> Singleton<B> {
    pub fn new(builder: B) -> Self {
        Self {
            builder,
            lock: Mutex::new(()),
            slot: OnceCell::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.builder.name()
    }

    /// Builds and publishes the component.
    ///
    /// # Errors
    /// - `AlreadyInitialized` when a previous build succeeded.
    /// - Any error returned by the builder; nothing is published then.
    pub fn build(&self, args: BuildArgs) -> InitResult<Arc<B::Output>> {
        let name = self.builder.name();
        debug!("event=singleton_lock module=init status=start name={name}");
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        debug!("event=singleton_lock module=init status=ok name={name}");

        if self.slot.get().is_some() {
            warn!("event=singleton_build module=init status=error name={name} error_code=already_initialized");
            return Err(InitError::AlreadyInitialized(name.to_string()));
        }

        let built = self.builder.build(args).map_err(|err| {
            error!("event=singleton_build module=init status=error name={name} error={err}");
            err
        })?;
        if self.slot.set(Arc::clone(&built)).is_err() {
            return Err(InitError::AlreadyInitialized(name.to_string()));
        }

        info!("event=singleton_build module=init status=ok name={name}");
        Ok(built)
    }

    /// Published instance, or `None` before a successful build.
    pub fn get(&self) -> Option<Arc<B::Output>> {
        self.slot.get().cloned()
    }

    pub fn is_initialized(&self) -> bool {
        self.slot.get().is_some()
    }
}

impl<B: Builder> Debug for Singleton<B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Singleton")
            .field("name", &self.builder.name())
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
