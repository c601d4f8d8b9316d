//! Layer-aware filtering of scaffold artifacts.
//!
//! Decides which target documents and which command variants a layer of the
//! SDK product line receives. Everything here is a pure table lookup: no I/O,
//! deterministic for the same inputs, safe to memoize.
//!
//! # Target documents
//!
//! [`TARGET_REGISTRY`] declares, per file name, the layers a target applies
//! to. A name missing from the registry resolves through
//! [`UNMAPPED_TARGET_POLICY`], which includes it everywhere. New targets opt
//! *into* restriction by adding a [`TargetDef`]; they never have to opt into
//! inclusion.
//!
//! # Command variants
//!
//! A command is a family of files sharing a base name:
//!
//! ```text
//! validate.md            base (every layer)
//! validate.sdk.md        sdk and above
//! validate.framework.md  framework and above
//! validate.react.md      react and app
//! ```
//!
//! Each layer walks its [`Layer::lineage`] most-specific first, then falls
//! back to the base file. No match means the command is excluded for that
//! layer; that is a normal outcome, not an error.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;

use crate::domain::{entities::file_tree::FileTree, value_objects::Layer};

const MD: &str = ".md";

// ── Target declarations ──────────────────────────────────────────────────────

/// Declares the layers one target document applies to.
#[derive(Debug, Clone, Copy)]
pub struct TargetDef {
    pub file_name: &'static str,
    pub layers: &'static [Layer],
}

const EVERY_LAYER: &[Layer] = &[Layer::Sdk, Layer::Framework, Layer::React, Layer::App];
const FRAMEWORK_AND_UP: &[Layer] = &[Layer::Framework, Layer::React, Layer::App];
const REACT_AND_APP: &[Layer] = &[Layer::React, Layer::App];

/// Single source of truth for target applicability.
pub static TARGET_REGISTRY: &[TargetDef] = &[
    // sdk tier, inherited by everyone
    TargetDef { file_name: "API.md", layers: EVERY_LAYER },
    TargetDef { file_name: "STORE.md", layers: EVERY_LAYER },
    TargetDef { file_name: "EVENTS.md", layers: EVERY_LAYER },
    TargetDef { file_name: "I18N.md", layers: EVERY_LAYER },
    // framework tier
    TargetDef { file_name: "FRAMEWORK.md", layers: FRAMEWORK_AND_UP },
    TargetDef { file_name: "LAYOUT.md", layers: FRAMEWORK_AND_UP },
    TargetDef { file_name: "THEMES.md", layers: FRAMEWORK_AND_UP },
    // react / app tier
    TargetDef { file_name: "REACT.md", layers: REACT_AND_APP },
    TargetDef { file_name: "SCREENSETS.md", layers: REACT_AND_APP },
    TargetDef { file_name: "STYLING.md", layers: REACT_AND_APP },
    TargetDef { file_name: "UIKIT.md", layers: REACT_AND_APP },
    TargetDef { file_name: "STUDIO.md", layers: REACT_AND_APP },
    // meta / tooling
    TargetDef { file_name: "AI.md", layers: EVERY_LAYER },
    TargetDef { file_name: "AI_COMMANDS.md", layers: EVERY_LAYER },
    TargetDef { file_name: "CLI.md", layers: EVERY_LAYER },
];

/// How a target document is gated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetPolicy {
    /// Applies to every layer.
    IncludeEverywhere,
    /// Applies only to the listed layers.
    Restricted(&'static [Layer]),
}

/// Policy for target names absent from [`TARGET_REGISTRY`].
///
/// Kept for backward compatibility with projects that ship their own target
/// documents. Must stay `IncludeEverywhere`.
pub const UNMAPPED_TARGET_POLICY: TargetPolicy = TargetPolicy::IncludeEverywhere;

/// Resolve the policy governing `file_name`.
pub fn target_policy(file_name: &str) -> TargetPolicy {
    TARGET_REGISTRY
        .iter()
        .find(|def| def.file_name == file_name)
        .map_or(UNMAPPED_TARGET_POLICY, |def| TargetPolicy::Restricted(def.layers))
}

/// Whether the target document `file_name` should be emitted for `layer`.
pub fn is_target_applicable(file_name: &str, layer: Layer) -> bool {
    match target_policy(file_name) {
        TargetPolicy::IncludeEverywhere => true,
        TargetPolicy::Restricted(layers) => layers.contains(&layer),
    }
}

// ── Command variants ─────────────────────────────────────────────────────────

/// Suffixes `layer` accepts, most specific first, ending with the base `.md`.
pub fn variant_suffixes(layer: Layer) -> Vec<String> {
    layer
        .lineage()
        .iter()
        .map(|l| format!(".{}{MD}", l.as_str()))
        .chain(std::iter::once(MD.to_string()))
        .collect()
}

/// Strip the `.md` extension and any layer suffix from a command file name.
///
/// `validate.framework.md` and `validate.md` both yield `validate`.
pub fn command_base(file_name: &str) -> &str {
    let stem = file_name.strip_suffix(MD).unwrap_or(file_name);
    Layer::ALL
        .iter()
        .find_map(|l| {
            stem.strip_suffix(l.as_str())
                .and_then(|rest| rest.strip_suffix('.'))
        })
        .unwrap_or(stem)
}

/// Select the most specific variant of `base_name` available for `layer`.
///
/// `base_name` may be given with or without its `.md` extension. Returns
/// `None` when no variant in the layer's fallback chain exists; the caller
/// must treat that as "command excluded for this layer".
pub fn select_command_variant<S: AsRef<str>>(
    base_name: &str,
    layer: Layer,
    available_files: &[S],
) -> Option<String> {
    let base = base_name.strip_suffix(MD).unwrap_or(base_name);

    variant_suffixes(layer)
        .into_iter()
        .map(|suffix| format!("{base}{suffix}"))
        .find(|candidate| available_files.iter().any(|f| f.as_ref() == candidate))
}

// ── Layer plan ───────────────────────────────────────────────────────────────

/// Scaffold source files, classified by role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScaffoldSources {
    /// File names under `targets/`.
    pub targets: Vec<String>,
    /// File names under `commands/`.
    pub commands: Vec<String>,
    /// Root-level `GUIDELINES*.md` files.
    pub guidelines: Vec<String>,
}

impl ScaffoldSources {
    /// Classify the files of a scaffold source tree.
    ///
    /// Files count when their immediate parent folder is `targets/` or
    /// `commands/`, wherever that folder sits. Guidelines must be at the root.
    pub fn from_tree(tree: &FileTree) -> Self {
        let mut sources = Self::default();

        for path in tree.paths() {
            let path = path.as_path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !name.ends_with(MD) {
                continue;
            }

            let parent = path
                .parent()
                .and_then(Path::file_name)
                .and_then(|n| n.to_str());

            match parent {
                Some("targets") => sources.targets.push(name.to_string()),
                Some("commands") => sources.commands.push(name.to_string()),
                None if name.starts_with("GUIDELINES") => {
                    sources.guidelines.push(name.to_string())
                }
                _ => {}
            }
        }

        sources
    }
}

/// One command resolved for a layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSelection {
    pub base: String,
    pub variant: String,
}

/// Everything a layer receives from a scaffold source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerPlan {
    pub layer: Layer,
    pub targets: Vec<String>,
    pub excluded_targets: Vec<String>,
    pub commands: Vec<CommandSelection>,
    pub excluded_commands: Vec<String>,
    pub guidelines: Option<String>,
}

impl LayerPlan {
    /// Resolve every target, command family, and guideline variant for `layer`.
    pub fn build(layer: Layer, sources: &ScaffoldSources) -> Self {
        let targets: BTreeSet<&str> = sources.targets.iter().map(String::as_str).collect();
        let (included, excluded): (Vec<&str>, Vec<&str>) = targets
            .into_iter()
            .partition(|name| is_target_applicable(name, layer));

        let bases: BTreeSet<&str> = sources
            .commands
            .iter()
            .map(|f| command_base(f))
            .collect();

        let mut commands = Vec::new();
        let mut excluded_commands = Vec::new();
        for base in bases {
            match select_command_variant(base, layer, &sources.commands) {
                Some(variant) => commands.push(CommandSelection {
                    base: base.to_string(),
                    variant,
                }),
                None => excluded_commands.push(base.to_string()),
            }
        }

        Self {
            layer,
            targets: included.into_iter().map(String::from).collect(),
            excluded_targets: excluded.into_iter().map(String::from).collect(),
            commands,
            excluded_commands,
            guidelines: select_command_variant("GUIDELINES", layer, &sources.guidelines),
        }
    }
}
