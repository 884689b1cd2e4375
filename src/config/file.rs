//! Loading a single matched config file.
//!
//! Steps, in order:
//! 1. Optional transform of the raw text, written to a generated sibling file.
//! 2. With the auto parser, try the text as literal data, else fall back to code.
//! 3. Dispatch to the resolved parser if no value exists yet.
//! 4. No value means no config in this file.
//! 5. Optional rewrite, which may reject the file.
//!
//! The generated file is removed on every exit path that completes.

use super::format::DataFormat;
use super::source::{CustomParserFn, Parser, SourceDescriptor};
use super::types::LoadResult;
use crate::dual::{Dual, Io};
use crate::error::{ConfigError, Result};
use crate::host::Host;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// Prefix marking files written by the transform step.
pub const GENERATED_PREFIX: &str = ".__configseek_";

/// Parser resolved for one file.
enum Strategy<'a> {
    Data(DataFormat),
    Code,
    Custom(&'a CustomParserFn),
}

/// Load `path` as described by `source`.
///
/// Returns `None` when the file yields no value or the rewrite hook rejects it.
pub fn load_file<'a>(
    host: &Host,
    path: &'a Path,
    source: &'a SourceDescriptor,
) -> Dual<'a, Option<LoadResult>> {
    Dual::new(host.clone(), move |io| async move {
        load_file_in(&io, path, source).await
    })
}

/// [`load_file`] run under the caller's [`Io`].
pub async fn load_file_in(
    io: &Io,
    path: &Path,
    source: &SourceDescriptor,
) -> Result<Option<LoadResult>> {
    let mut generated = None;
    let outcome = load_steps(io, path, source, &mut generated).await;

    if let Some(temp) = generated
        && let Err(err) = io.remove_file(&temp).await
    {
        debug!(path = %temp.display(), error = %err, "failed to remove generated file");
    }

    match outcome {
        Err(err) if source.skips_errors() => {
            warn!(path = %path.display(), error = %err, "skipping config file");
            Ok(None)
        }
        other => other,
    }
}

async fn load_steps(
    io: &Io,
    path: &Path,
    source: &SourceDescriptor,
    generated: &mut Option<PathBuf>,
) -> Result<Option<LoadResult>> {
    let mut raw: Option<String> = None;
    let mut target = path.to_path_buf();

    if let Some(transform) = source.transform_fn() {
        let text = io.read_to_string(path).await?;
        let replaced = transform(&text, path).map_err(|e| ConfigError::hook(path, e))?;
        match replaced {
            Some(code) if !code.is_empty() => {
                let temp = generated_path(path);
                *generated = Some(temp.clone());
                io.write(&temp, &code).await?;
                trace!(path = %temp.display(), "wrote transformed source");
                target = temp;
                raw = Some(code);
            }
            _ => raw = Some(text),
        }
    }

    let mut value = None;
    let strategy = match source.parser_kind() {
        Parser::Auto => {
            let format = DataFormat::for_path(path);
            let text = cached_text(io, path, &mut raw).await?;
            match format.parse(path, text) {
                Ok(parsed) => {
                    value = parsed;
                    Strategy::Data(format)
                }
                Err(err) => {
                    trace!(path = %path.display(), error = %err, "not literal data, evaluating");
                    Strategy::Code
                }
            }
        }
        Parser::Json => Strategy::Data(DataFormat::Json),
        Parser::Yaml => Strategy::Data(DataFormat::Yaml),
        Parser::Toml => Strategy::Data(DataFormat::Toml),
        Parser::Code => Strategy::Code,
        Parser::Custom(parse) => Strategy::Custom(parse),
    };

    let mut dependencies = None;
    if value.is_none() {
        value = match strategy {
            Strategy::Data(format) => {
                let text = cached_text(io, path, &mut raw).await?;
                format.parse(path, text)?
            }
            Strategy::Code => {
                let evaluated = io.evaluate(&target).await?;
                dependencies = evaluated.dependencies;
                Some(interop_default(evaluated.value))
            }
            Strategy::Custom(parse) => parse(path).map_err(|e| ConfigError::hook(path, e))?,
        };
    }

    let Some(mut config) = value.filter(|v| !is_falsy(v)) else {
        debug!(path = %path.display(), "config file produced no value");
        return Ok(None);
    };

    if let Some(rewrite) = source.rewrite_fn() {
        match rewrite(config, path).map_err(|e| ConfigError::hook(path, e))? {
            Some(rewritten) if !is_falsy(&rewritten) => config = rewritten,
            _ => {
                debug!(path = %path.display(), "config file rejected by rewrite");
                return Ok(None);
            }
        }
    }

    Ok(Some(LoadResult::from_file(
        config,
        path.to_path_buf(),
        dependencies,
    )))
}

async fn cached_text<'r>(io: &Io, path: &Path, raw: &'r mut Option<String>) -> Result<&'r str> {
    if raw.is_none() {
        *raw = Some(io.read_to_string(path).await?);
    }
    Ok(raw.as_deref().unwrap_or_default())
}

/// Sibling path the transform output is written to.
pub fn generated_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{GENERATED_PREFIX}{name}"))
}

/// Whether `value` counts as "no config": null, `false`, zero or `""`.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Unwrap default-export wrappers down to the innermost value.
///
/// An object holding a non-null `default` entry is treated as a module
/// wrapper. Anything else is already the exported value.
pub fn interop_default(mut value: Value) -> Value {
    while let Some(inner) = take_default(&mut value) {
        value = inner;
    }
    value
}

fn take_default(value: &mut Value) -> Option<Value> {
    let map = value.as_object_mut()?;
    if map.get("default").is_none_or(Value::is_null) {
        return None;
    }
    map.remove("default")
}
