//! `chorus ask` — one-shot prompt.
//!
//! Sends a single prompt (optionally preceded by a system instruction) to
//! one model, prints the reply, and exits. Useful for scripting and piping.

use chorus_domain::message::ChatMessage;
use chorus_providers::ChatOrchestrator;

/// Build the one-shot conversation.
pub(crate) fn build_history(prompt: &str, system: Option<&str>) -> Vec<ChatMessage> {
    let mut history = Vec::with_capacity(2);
    if let Some(system) = system.filter(|s| !s.trim().is_empty()) {
        history.push(ChatMessage::system(system));
    }
    history.push(ChatMessage::user(prompt));
    history
}

/// Execute a single chat call and print the reply.
pub async fn run(
    orch: &ChatOrchestrator,
    prompt: String,
    model: Option<String>,
    system: Option<String>,
    json_output: bool,
) -> anyhow::Result<()> {
    let model = super::pick_model(orch, model)?;
    let history = build_history(&prompt, system.as_deref());

    tracing::debug!(model = %model, turns = history.len(), "sending one-shot prompt");
    let result = orch.chat(&model, &history).await?;

    if json_output {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| anyhow::anyhow!("serializing result: {e}"))?;
        println!("{json}");
    } else {
        println!("{}", result.content);
        if let Some(ref usage) = result.usage {
            eprintln!("\x1b[2m[{model}: {}]\x1b[0m", super::format_usage(usage));
        }
    }

    Ok(())
}
