//! Configuration discovery and loading.
//!
//! A [`ConfigLoader`] takes an ordered list of [`SourceDescriptor`]s:
//! 1. **Find** - each source's names × extensions are searched upward from
//!    `cwd`, stopping below `stop_at`
//! 2. **Load** - each matched file is parsed (literal data, code evaluation or
//!    a custom parser), optionally transformed before and rewritten after
//! 3. **Merge** - results are deep-merged over `defaults`
//!
//! ## Precedence
//! - Without `merge`: the first source whose closest file yields a value wins
//! - With `merge`: all matches load; earlier sources and nearer directories win
//! - `defaults` is always the weakest layer
//! - Arrays are replaced wholesale, never merged element-wise
//!
//! Every operation returns a [`crate::dual::Dual`], runnable blocking with
//! `.sync()` or awaited.

pub mod file;
mod find;
mod format;
mod loader;
mod merge;
pub mod presets;
mod source;
mod types;

pub use file::{interop_default, is_falsy, load_file, load_file_in};
pub use find::{FindUpOptions, find_up, find_up_first, find_up_in};
pub use format::DataFormat;
pub use loader::{ConfigLoader, LoadOptions, load_config, load_config_with_host};
pub use merge::{deep_merge, deep_merge_all, merge_layers};
pub use source::{
    CustomParserFn, DEFAULT_EXTENSIONS, Parser, RewriteFn, SourceDescriptor, TransformFn,
};
pub use types::{LoadResult, Origin, SourceMatches};
