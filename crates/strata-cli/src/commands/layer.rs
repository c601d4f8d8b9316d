//! `strata layer`: resolve the scaffold documents a layer receives.

use std::fmt::Write as _;

use tracing::debug;

use strata_adapters::LocalFilesystem;
use strata_core::{
    application::Filesystem,
    domain::{LayerPlan, ScaffoldSources},
};

use crate::{
    cli::{GlobalArgs, LayerArgs, PlanFormat},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(
    args: LayerArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let layer = args.layer.unwrap_or(config.project.layer);
    let tree = LocalFilesystem::new(&args.source).read_tree()?;
    let sources = ScaffoldSources::from_tree(&tree);
    debug!(
        %layer,
        targets = sources.targets.len(),
        commands = sources.commands.len(),
        "scaffold sources classified"
    );

    let plan = LayerPlan::build(layer, &sources);

    if args.format == PlanFormat::Json || output.is_json() {
        output.json(&plan)?;
    } else {
        output.header(&format!("Layer: {}", plan.layer))?;
        output.block(&render_table(&plan))?;
    }
    Ok(())
}

fn render_table(plan: &LayerPlan) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Targets ({}):", plan.targets.len());
    for target in &plan.targets {
        let _ = writeln!(out, "  + {target}");
    }
    for target in &plan.excluded_targets {
        let _ = writeln!(out, "  - {target}");
    }

    let _ = writeln!(out, "Commands ({}):", plan.commands.len());
    for command in &plan.commands {
        let _ = writeln!(out, "  + {:<16} {}", command.base, command.variant);
    }
    for base in &plan.excluded_commands {
        let _ = writeln!(out, "  - {base}");
    }

    let _ = writeln!(
        out,
        "Guidelines: {}",
        plan.guidelines.as_deref().unwrap_or("(none)")
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::domain::Layer;

    fn sources() -> ScaffoldSources {
        ScaffoldSources {
            targets: vec!["API.md".into(), "UIKIT.md".into()],
            commands: vec!["review.md".into(), "review.react.md".into()],
            guidelines: vec!["GUIDELINES.md".into()],
        }
    }

    #[test]
    fn table_marks_included_and_excluded() {
        let table = render_table(&LayerPlan::build(Layer::Sdk, &sources()));
        assert!(table.contains("  + API.md"));
        assert!(table.contains("  - UIKIT.md"));
        assert!(table.contains("review.md"));
        assert!(table.contains("Guidelines: GUIDELINES.md"));
    }

    #[test]
    fn table_shows_selected_variant() {
        let table = render_table(&LayerPlan::build(Layer::App, &sources()));
        assert!(table.contains("review.react.md"));
        assert!(table.contains("  + UIKIT.md"));
    }
}
