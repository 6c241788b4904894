//! `chorus models` — list configured (or all) catalog models.

use chorus_domain::model::{self, ModelDescriptor};
use chorus_providers::ChatOrchestrator;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ModelRow<'a> {
    #[serde(flatten)]
    model: &'a ModelDescriptor,
    configured: bool,
}

/// Print the model list to stdout.
pub fn list(orch: &ChatOrchestrator, all: bool, json: bool) -> anyhow::Result<()> {
    let rows = rows(orch, all);

    if json {
        let out = serde_json::to_string_pretty(&rows)
            .map_err(|e| anyhow::anyhow!("serializing models: {e}"))?;
        println!("{out}");
        return Ok(());
    }

    if rows.is_empty() {
        eprintln!("{}", super::no_models_error());
        return Ok(());
    }

    for row in &rows {
        let marker = if row.configured { "*" } else { " " };
        println!("{marker} {}", super::model_line(row.model));
        if let Some(desc) = row.model.description {
            println!("    {desc}");
        }
    }
    if all {
        eprintln!();
        eprintln!("* = API key configured");
    }
    Ok(())
}

fn rows(orch: &ChatOrchestrator, all: bool) -> Vec<ModelRow<'static>> {
    if all {
        model::catalog()
            .iter()
            .map(|m| ModelRow {
                model: m,
                configured: orch.has_credential(m.id),
            })
            .collect()
    } else {
        orch.list_available()
            .into_iter()
            .map(|m| ModelRow {
                model: m,
                configured: true,
            })
            .collect()
    }
}
