//! Source descriptors: what to search for and how to read it.

use super::format::DataFormat;
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Extensions tried for every base name unless a descriptor sets its own.
/// The empty string stands for the bare name.
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "mts", "cts", "ts", "mjs", "cjs", "js", "json", "yaml", "yml", "toml", "",
];

/// Rewrites raw file text before it is evaluated. `None` or an empty string
/// keeps the original file.
pub type TransformFn = Arc<dyn Fn(&str, &Path) -> anyhow::Result<Option<String>> + Send + Sync>;

/// Replaces a parsed value. `None` (or null) rejects the file.
pub type RewriteFn = Arc<dyn Fn(Value, &Path) -> anyhow::Result<Option<Value>> + Send + Sync>;

/// Caller-supplied parser from file path to value.
pub type CustomParserFn = Arc<dyn Fn(&Path) -> anyhow::Result<Option<Value>> + Send + Sync>;

/// How a matched file becomes a value.
#[derive(Clone, Default)]
pub enum Parser {
    /// Try the file as literal data first, fall back to evaluating it as code.
    #[default]
    Auto,
    Json,
    Yaml,
    Toml,
    /// Hand the file to the host evaluator.
    Code,
    Custom(CustomParserFn),
}

impl Parser {
    pub fn custom<F>(parse: F) -> Self
    where
        F: Fn(&Path) -> anyhow::Result<Option<Value>> + Send + Sync + 'static,
    {
        Parser::Custom(Arc::new(parse))
    }

    /// The literal data format this parser names, if any.
    pub fn data_format(&self) -> Option<DataFormat> {
        match self {
            Parser::Json => Some(DataFormat::Json),
            Parser::Yaml => Some(DataFormat::Yaml),
            Parser::Toml => Some(DataFormat::Toml),
            _ => None,
        }
    }
}

impl From<DataFormat> for Parser {
    fn from(format: DataFormat) -> Self {
        match format {
            DataFormat::Json => Parser::Json,
            DataFormat::Yaml => Parser::Yaml,
            DataFormat::Toml => Parser::Toml,
        }
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parser::Auto => write!(f, "Auto"),
            Parser::Json => write!(f, "Json"),
            Parser::Yaml => write!(f, "Yaml"),
            Parser::Toml => write!(f, "Toml"),
            Parser::Code => write!(f, "Code"),
            Parser::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// One family of config files to look for.
#[derive(Clone)]
pub struct SourceDescriptor {
    files: Vec<String>,
    extensions: Vec<String>,
    parser: Parser,
    transform: Option<TransformFn>,
    rewrite: Option<RewriteFn>,
    skip_on_error: bool,
}

impl SourceDescriptor {
    /// Descriptor for `files` with the default extensions and the auto parser.
    pub fn new<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            parser: Parser::Auto,
            transform: None,
            rewrite: None,
            skip_on_error: false,
        }
    }

    /// Replace the extension list. An empty list uses the names verbatim.
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn parser(mut self, parser: Parser) -> Self {
        self.parser = parser;
        self
    }

    pub fn transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&str, &Path) -> anyhow::Result<Option<String>> + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(transform));
        self
    }

    pub fn rewrite<F>(mut self, rewrite: F) -> Self
    where
        F: Fn(Value, &Path) -> anyhow::Result<Option<Value>> + Send + Sync + 'static,
    {
        self.rewrite = Some(Arc::new(rewrite));
        self
    }

    /// Treat load errors for this source as "no value" instead of failing.
    pub fn skip_on_error(mut self, skip: bool) -> Self {
        self.skip_on_error = skip;
        self
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn extension_list(&self) -> &[String] {
        &self.extensions
    }

    pub fn parser_kind(&self) -> &Parser {
        &self.parser
    }

    pub fn transform_fn(&self) -> Option<&TransformFn> {
        self.transform.as_ref()
    }

    pub fn rewrite_fn(&self) -> Option<&RewriteFn> {
        self.rewrite.as_ref()
    }

    pub fn skips_errors(&self) -> bool {
        self.skip_on_error
    }

    /// Every base name combined with every extension, names outermost.
    pub fn candidates(&self) -> Vec<String> {
        if self.extensions.is_empty() {
            return self.files.clone();
        }
        self.files
            .iter()
            .flat_map(|name| {
                self.extensions.iter().map(move |ext| {
                    if ext.is_empty() {
                        name.clone()
                    } else {
                        format!("{name}.{ext}")
                    }
                })
            })
            .collect()
    }
}

impl fmt::Debug for SourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceDescriptor")
            .field("files", &self.files)
            .field("extensions", &self.extensions)
            .field("parser", &self.parser)
            .field("transform", &self.transform.is_some())
            .field("rewrite", &self.rewrite.is_some())
            .field("skip_on_error", &self.skip_on_error)
            .finish()
    }
}
