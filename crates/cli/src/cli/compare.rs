//! `chorus compare` — one prompt, several models, side by side.

use chorus_domain::message::Usage;
use chorus_providers::{ChatOrchestrator, Comparison};
use serde::Serialize;

/// Serializable view of one comparison entry.
#[derive(Debug, Serialize)]
pub(crate) struct EntryView {
    model_id: String,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    usage: Option<Usage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub(crate) fn entry_views(comparison: &Comparison) -> Vec<EntryView> {
    comparison
        .iter()
        .map(|entry| match &entry.outcome {
            Ok(result) => EntryView {
                model_id: entry.model_id.clone(),
                ok: true,
                content: Some(result.content.clone()),
                usage: result.usage,
                error: None,
            },
            Err(e) => EntryView {
                model_id: entry.model_id.clone(),
                ok: false,
                content: None,
                usage: None,
                error: Some(e.to_string()),
            },
        })
        .collect()
}

/// Run the comparison and print every outcome. Exits non-zero only when
/// every model failed.
pub async fn run(
    orch: &ChatOrchestrator,
    prompt: String,
    models: Vec<String>,
    json_output: bool,
) -> anyhow::Result<()> {
    let models: Vec<String> = if models.is_empty() {
        orch.list_available()
            .into_iter()
            .map(|m| m.id.to_string())
            .collect()
    } else {
        models
            .into_iter()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect()
    };
    if models.is_empty() {
        return Err(super::no_models_error());
    }

    eprintln!(
        "Comparing {} model(s), {}ms apart...",
        models.len(),
        orch.compare_delay().as_millis()
    );
    let comparison = orch.compare_models(&models, &prompt).await;

    if json_output {
        let json = serde_json::to_string_pretty(&entry_views(&comparison))
            .map_err(|e| anyhow::anyhow!("serializing comparison: {e}"))?;
        println!("{json}");
    } else {
        for entry in &comparison {
            println!("━━ {} ━━", entry.model_id);
            match &entry.outcome {
                Ok(result) => {
                    println!("{}", result.content);
                    if let Some(ref usage) = result.usage {
                        eprintln!("\x1b[2m[{}]\x1b[0m", super::format_usage(usage));
                    }
                }
                Err(e) => println!("\x1b[31merror: {e}\x1b[0m"),
            }
            println!();
        }
    }

    if comparison.succeeded() == 0 {
        std::process::exit(1);
    }
    Ok(())
}
