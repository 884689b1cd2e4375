//! Dual-mode execution.
//!
//! Loading logic is written once as an `async` body over an [`Io`] handle.
//! Each `Io` method is a suspension point. The mode chosen by the outermost
//! caller decides what happens there:
//!
//! - [`Mode::Blocking`]: the blocking variant runs inline and the point
//!   completes without ever returning `Pending`. [`Dual::sync`] drives the
//!   whole body with a single poll.
//! - [`Mode::NonBlocking`]: the non-blocking variant is awaited.
//!   [`Dual::run`] (or `.await` on the [`Dual`]) drives the body.
//!
//! Nested computations take the caller's `Io` through [`Dual::lazy`] or the
//! `*_in` functions, so the mode is inherited all the way down.

use crate::error::{ConfigError, Result};
use crate::host::{Evaluated, Evaluator, FileSystem, Host};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::fmt;
use std::future::{Future, IntoFuture};
use std::path::Path;
use std::sync::Arc;
use tracing::trace;

/// How suspension points are performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Blocking,
    NonBlocking,
}

/// Operation handle threaded through every suspendable step.
#[derive(Clone)]
pub struct Io {
    mode: Mode,
    fs: Arc<dyn FileSystem>,
    evaluator: Option<Arc<dyn Evaluator>>,
}

impl Io {
    /// Resolve the host collaborators once for a whole call.
    pub fn new(mode: Mode, host: &Host) -> Self {
        Self {
            mode,
            fs: Arc::clone(host.fs()),
            evaluator: host.evaluator().cloned(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Whether `path` is a regular file. Errors count as "not a file".
    pub async fn is_file(&self, path: &Path, follow_symlinks: bool) -> bool {
        let found = match self.mode {
            Mode::Blocking => self.fs.is_file_blocking(path, follow_symlinks),
            Mode::NonBlocking => self.fs.is_file(path, follow_symlinks).await,
        };
        trace!(path = %path.display(), found, "probe");
        found
    }

    pub async fn read_to_string(&self, path: &Path) -> Result<String> {
        let text = match self.mode {
            Mode::Blocking => self.fs.read_to_string_blocking(path),
            Mode::NonBlocking => self.fs.read_to_string(path).await,
        };
        text.map_err(|e| ConfigError::io(path, e))
    }

    pub async fn write(&self, path: &Path, contents: &str) -> Result<()> {
        let written = match self.mode {
            Mode::Blocking => self.fs.write_blocking(path, contents),
            Mode::NonBlocking => self.fs.write(path, contents).await,
        };
        written.map_err(|e| ConfigError::io(path, e))
    }

    pub async fn remove_file(&self, path: &Path) -> Result<()> {
        let removed = match self.mode {
            Mode::Blocking => self.fs.remove_file_blocking(path),
            Mode::NonBlocking => self.fs.remove_file(path).await,
        };
        removed.map_err(|e| ConfigError::io(path, e))
    }

    /// Evaluate `path` as code with the host's evaluator.
    pub async fn evaluate(&self, path: &Path) -> Result<Evaluated> {
        let evaluator = self
            .evaluator
            .as_ref()
            .ok_or_else(|| ConfigError::NoEvaluator {
                path: path.to_path_buf(),
            })?;
        let evaluated = match self.mode {
            Mode::Blocking => evaluator.evaluate_blocking(path),
            Mode::NonBlocking => evaluator.evaluate(path).await,
        };
        evaluated.map_err(|e| ConfigError::evaluate(path, format!("{e:#}")))
    }
}

impl fmt::Debug for Io {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Io")
            .field("mode", &self.mode)
            .field("evaluator", &self.evaluator.is_some())
            .finish_non_exhaustive()
    }
}

type Body<'a, T> = Box<dyn FnOnce(Io) -> BoxFuture<'a, Result<T>> + Send + 'a>;

/// A computation that can be run blocking, awaited, or embedded in another.
#[must_use = "a Dual does nothing until driven with sync(), run() or lazy()"]
pub struct Dual<'a, T> {
    host: Host,
    body: Body<'a, T>,
}

impl<'a, T: Send + 'a> Dual<'a, T> {
    pub fn new<F, Fut>(host: Host, body: F) -> Self
    where
        F: FnOnce(Io) -> Fut + Send + 'a,
        Fut: Future<Output = Result<T>> + Send + 'a,
    {
        Self {
            host,
            body: Box::new(move |io| body(io).boxed()),
        }
    }

    /// Embed in another computation, inheriting its mode and collaborators.
    pub fn lazy(self, io: &Io) -> BoxFuture<'a, Result<T>> {
        (self.body)(io.clone())
    }

    /// Run to completion now, performing every operation blocking.
    pub fn sync(self) -> Result<T> {
        let io = Io::new(Mode::Blocking, &self.host);
        (self.body)(io)
            .now_or_never()
            .unwrap_or(Err(ConfigError::Suspended))
    }

    /// Run to completion, awaiting every operation's non-blocking variant.
    pub async fn run(self) -> Result<T> {
        self.into_future().await
    }
}

impl<'a, T: Send + 'a> IntoFuture for Dual<'a, T> {
    type Output = Result<T>;
    type IntoFuture = BoxFuture<'a, Result<T>>;

    fn into_future(self) -> Self::IntoFuture {
        let io = Io::new(Mode::NonBlocking, &self.host);
        (self.body)(io)
    }
}

impl<T> fmt::Debug for Dual<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dual").field("host", &self.host).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn read_twice<'a>(host: &Host, path: &'a Path) -> Dual<'a, (Mode, String)> {
        Dual::new(host.clone(), move |io| async move {
            let first = io.read_to_string(path).await?;
            let second = io.read_to_string(path).await?;
            Ok((io.mode(), first + &second))
        })
    }

    #[test]
    fn test_sync_form_uses_blocking_mode() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.txt");
        std::fs::write(&file, "ab").unwrap();

        let (mode, text) = read_twice(&Host::default(), &file).sync().unwrap();
        assert_eq!(mode, Mode::Blocking);
        assert_eq!(text, "abab");
    }

    #[tokio::test]
    async fn test_async_form_uses_non_blocking_mode() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.txt");
        std::fs::write(&file, "ab").unwrap();

        let (mode, text) = read_twice(&Host::default(), &file).await.unwrap();
        assert_eq!(mode, Mode::NonBlocking);
        assert_eq!(text, "abab");
    }

    #[test]
    fn test_lazy_form_inherits_outer_mode() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.txt");
        std::fs::write(&file, "x").unwrap();

        let host = Host::default();
        let outer = Dual::new(host.clone(), |io| {
            let host = host.clone();
            let file = file.clone();
            async move {
                let (inner_mode, _) = read_twice(&host, &file).lazy(&io).await?;
                Ok(inner_mode)
            }
        });
        assert_eq!(outer.sync().unwrap(), Mode::Blocking);
    }

    #[test]
    fn test_error_surfaces_from_sync_form() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.txt");

        let err = read_twice(&Host::default(), &missing).sync().unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_suspension_under_blocking_driver_is_reported() {
        let dual: Dual<'_, ()> = Dual::new(Host::default(), |_io| async {
            futures::future::pending::<()>().await;
            Ok(())
        });
        assert!(matches!(dual.sync(), Err(ConfigError::Suspended)));
    }

    #[test]
    fn test_evaluate_without_evaluator() {
        let dual = Dual::new(Host::default(), |io| async move {
            io.evaluate(Path::new("/tmp/app.config.js")).await
        });
        assert!(matches!(dual.sync(), Err(ConfigError::NoEvaluator { .. })));
    }
}
