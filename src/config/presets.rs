//! Ready-made sources that read a tool's section out of a package manifest.

use super::source::{Parser, SourceDescriptor};
use serde_json::Value;

/// Match `package.json` and use the first of `fields` it defines.
///
/// Manifests defining none of the fields are rejected, so the search moves on.
pub fn package_json_field<I, S>(fields: I) -> SourceDescriptor
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
    SourceDescriptor::new(["package.json"])
        .extensions(Vec::<String>::new())
        .parser(Parser::Json)
        .rewrite(move |manifest, _| {
            Ok(fields
                .iter()
                .find_map(|field| manifest.get(field).filter(|v| !v.is_null()))
                .cloned())
        })
}

/// Match `Cargo.toml` and use `[package.metadata.<tool>]`, falling back to
/// `[workspace.metadata.<tool>]`.
pub fn cargo_metadata(tool: impl Into<String>) -> SourceDescriptor {
    let tool = tool.into();
    SourceDescriptor::new(["Cargo.toml"])
        .extensions(Vec::<String>::new())
        .parser(Parser::Toml)
        .rewrite(move |manifest, _| {
            Ok(metadata_section(&manifest, "package", &tool)
                .or_else(|| metadata_section(&manifest, "workspace", &tool)))
        })
}

fn metadata_section(manifest: &Value, table: &str, tool: &str) -> Option<Value> {
    manifest
        .get(table)?
        .get("metadata")?
        .get(tool)
        .filter(|v| !v.is_null())
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::file::load_file;
    use crate::host::Host;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_package_json_field_picks_first_present() {
        let temp = TempDir::new().unwrap();
        let manifest = temp.path().join("package.json");
        std::fs::write(
            &manifest,
            r#"{"name": "demo", "appConfig": {"port": 1}, "app": {"port": 2}}"#,
        )
        .unwrap();

        let source = package_json_field(["app", "appConfig"]);
        assert_eq!(source.candidates(), vec!["package.json"]);
        let result = load_file(&Host::default(), &manifest, &source).sync().unwrap();
        assert_eq!(result.unwrap().config, json!({"port": 2}));

        let missing = package_json_field(["other"]);
        assert!(load_file(&Host::default(), &manifest, &missing).sync().unwrap().is_none());
    }

    #[test]
    fn test_cargo_metadata_falls_back_to_workspace() {
        let temp = TempDir::new().unwrap();
        let manifest = temp.path().join("Cargo.toml");
        std::fs::write(
            &manifest,
            "[workspace]\nmembers = []\n\n[workspace.metadata.demo]\nlevel = 3\n",
        )
        .unwrap();

        let result = load_file(&Host::default(), &manifest, &cargo_metadata("demo"))
            .sync()
            .unwrap();
        assert_eq!(result.unwrap().config, json!({"level": 3}));
    }
}
