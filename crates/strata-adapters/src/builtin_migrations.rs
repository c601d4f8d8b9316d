//! Built-in migration catalog.
//!
//! [`registry`] is the single entry point: it returns every migration that
//! ships with Strata, in ascending version order. New migrations are
//! appended to [`catalog`]; existing ones are never edited once released,
//! since their checksums are recorded in project ledgers.
//!
//! # 0.2.0
//!
//! Relocates legacy command documents and declares the project layer:
//!
//! ```text
//! .claude/commands/review.md   ──▶  .ai/commands/review.md
//! strata.json  {}              ──▶  {"layer": "app"}
//! ```

use serde_json::{Map, Value};
use tracing::debug;

use strata_core::domain::{
    DomainError, FileTree, FnTransform, Migration, MigrationRegistry, MigrationVersion,
    RelativePath, TransformChange, TransformError, TransformResult, entities::transform::move_file,
};

/// Folder command documents used to live in.
pub const LEGACY_COMMANDS_DIR: &str = ".claude/commands";
/// Folder command documents live in from 0.2.0 on.
pub const COMMANDS_DIR: &str = ".ai/commands";
/// Project manifest holding the declared layer.
pub const PROJECT_MANIFEST: &str = "strata.json";
/// Layer declared for projects that never chose one.
pub const DEFAULT_LAYER: &str = "app";

const RELOCATE: &str = "relocate-legacy-commands";
const DECLARE_LAYER: &str = "declare-project-layer";

// ── Public API ────────────────────────────────────────────────────────────────

/// The built-in catalog as a validated registry.
pub fn registry() -> Result<MigrationRegistry, DomainError> {
    let migrations = catalog()?;
    debug!(count = migrations.len(), "built-in migrations loaded");
    MigrationRegistry::new(migrations)
}

/// Every built-in migration, oldest first.
pub fn catalog() -> Result<Vec<Migration>, DomainError> {
    Ok(vec![v0_2_0()?])
}

/// Relocate command documents and declare the project layer.
pub fn v0_2_0() -> Result<Migration, DomainError> {
    Migration::builder(MigrationVersion::new(0, 2, 0))
        .description("Relocate command documents and declare the project layer")
        .transform(FnTransform::new(
            RELOCATE,
            "Move .claude/commands/*.md to .ai/commands/",
            relocate_legacy_commands,
        ))
        .transform(FnTransform::new(
            DECLARE_LAYER,
            "Add a layer to strata.json, creating it when missing",
            declare_project_layer,
        ))
        .build()
}

// ── Transforms ────────────────────────────────────────────────────────────────

fn relocate_legacy_commands(tree: &FileTree) -> TransformResult {
    let mut result = TransformResult::new();
    let destination = RelativePath::from(COMMANDS_DIR);

    let legacy: Vec<&RelativePath> = tree
        .under(LEGACY_COMMANDS_DIR)
        .map(|(path, _)| path)
        .filter(|path| {
            path.as_path().parent() == Some(std::path::Path::new(LEGACY_COMMANDS_DIR))
                && path.as_str().ends_with(".md")
        })
        .collect();

    for from in legacy {
        let Some(name) = from.file_name() else {
            continue;
        };
        let to = match destination.join(name) {
            Ok(to) => to,
            Err(e) => {
                result.push_error(TransformError::new(RELOCATE, e.to_string()).at(from.clone()));
                continue;
            }
        };

        let moved = move_file(RELOCATE, tree, from, &to);
        result.changes.extend(moved.changes);
        result.errors.extend(moved.errors);
    }
    result
}

fn declare_project_layer(tree: &FileTree) -> TransformResult {
    let Some(raw) = tree.read(PROJECT_MANIFEST) else {
        let mut manifest = Map::new();
        manifest.insert("layer".into(), Value::String(DEFAULT_LAYER.into()));
        return match render(&Value::Object(manifest)) {
            Ok(content) => TransformResult::new()
                .with_change(TransformChange::add(PROJECT_MANIFEST, content)),
            Err(error) => TransformResult::new().with_error(error),
        };
    };

    let mut manifest = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(_) => return manifest_error("expected a JSON object"),
        Err(e) => return manifest_error(&format!("malformed JSON: {e}")),
    };

    if manifest.contains_key("layer") {
        return TransformResult::new();
    }
    manifest.insert("layer".into(), Value::String(DEFAULT_LAYER.into()));

    match render(&Value::Object(manifest)) {
        Ok(content) => {
            TransformResult::new().with_change(TransformChange::modify(PROJECT_MANIFEST, content))
        }
        Err(error) => TransformResult::new().with_error(error),
    }
}

fn render(manifest: &Value) -> Result<String, TransformError> {
    serde_json::to_string_pretty(manifest)
        .map(|mut s| {
            s.push('\n');
            s
        })
        .map_err(|e| TransformError::new(DECLARE_LAYER, e.to_string()).at(PROJECT_MANIFEST))
}

fn manifest_error(message: &str) -> TransformResult {
    TransformResult::new().with_error(TransformError::new(DECLARE_LAYER, message).at(PROJECT_MANIFEST))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(files: &[(&str, &str)]) -> FileTree {
        files.iter().map(|(p, c)| (*p, *c)).collect()
    }

    #[test]
    fn catalog_is_valid_and_ordered() {
        let registry = registry().unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.latest().unwrap().version().to_string(), "0.2.0");
    }

    #[test]
    fn relocates_only_direct_markdown_children() {
        let tree = project(&[
            (".claude/commands/review.md", "r"),
            (".claude/commands/notes.txt", "n"),
            (".claude/commands/nested/deep.md", "d"),
        ]);
        let result = relocate_legacy_commands(&tree);
        assert!(result.is_ok());
        assert_eq!(
            result.changes,
            vec![
                TransformChange::add(".ai/commands/review.md", "r"),
                TransformChange::delete(".claude/commands/review.md"),
            ]
        );
    }

    #[test]
    fn relocation_collision_is_an_error() {
        let tree = project(&[
            (".claude/commands/review.md", "old"),
            (".ai/commands/review.md", "new"),
        ]);
        let result = relocate_legacy_commands(&tree);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].transform, RELOCATE);
    }

    #[test]
    fn declares_layer_in_existing_manifest() {
        let tree = project(&[("strata.json", r#"{"name":"demo"}"#)]);
        let result = declare_project_layer(&tree);
        let content = result.changes[0].kind.content().unwrap();
        let json: Value = serde_json::from_str(content).unwrap();
        assert_eq!(json["layer"], "app");
        assert_eq!(json["name"], "demo");
    }

    #[test]
    fn keeps_declared_layer_and_creates_missing_manifest() {
        let declared = project(&[("strata.json", r#"{"layer":"sdk"}"#)]);
        assert!(declare_project_layer(&declared).changes.is_empty());

        let created = declare_project_layer(&FileTree::new());
        assert_eq!(created.changes.len(), 1);
        assert_eq!(created.changes[0].kind.label(), "add");
    }

    #[test]
    fn malformed_manifest_is_an_error() {
        let result = declare_project_layer(&project(&[("strata.json", "{ nope")]));
        assert!(result.changes.is_empty());
        assert_eq!(result.errors[0].path.as_ref().unwrap().as_str(), "strata.json");
    }

    #[test]
    fn migration_is_idempotent() {
        let migration = v0_2_0().unwrap();
        let tree = project(&[(".claude/commands/review.md", "r")]);

        let first = migration.preview(&tree);
        assert!(first.is_ok());
        let second = migration.preview(first.projected());
        assert!(second.is_ok());
        assert!(second.changes.is_empty());
    }
}
