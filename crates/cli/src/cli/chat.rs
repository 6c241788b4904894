//! `chorus chat` — interactive REPL command.
//!
//! Opens a readline loop that keeps the conversation history locally and
//! sends the whole history on every turn. Supports slash-commands for model
//! switching, key rotation, and resetting the conversation.

use chorus_domain::message::ChatMessage;
use chorus_providers::ChatOrchestrator;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Conversation state
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// History held by the REPL. The system instruction survives `/reset`.
#[derive(Debug, Default)]
pub(crate) struct Conversation {
    system: Option<String>,
    turns: Vec<ChatMessage>,
}

impl Conversation {
    pub(crate) fn new(system: Option<String>) -> Self {
        Self {
            system: system.filter(|s| !s.trim().is_empty()),
            turns: Vec::new(),
        }
    }

    /// Full history to send: system instruction first, then the turns.
    pub(crate) fn messages(&self) -> Vec<ChatMessage> {
        self.system
            .iter()
            .map(|s| ChatMessage::system(s.as_str()))
            .chain(self.turns.iter().cloned())
            .collect()
    }

    pub(crate) fn push_user(&mut self, text: &str) {
        self.turns.push(ChatMessage::user(text));
    }

    pub(crate) fn push_assistant(&mut self, text: &str) {
        self.turns.push(ChatMessage::assistant(text));
    }

    /// Drop the trailing user turn after a failed call so it can be retried.
    pub(crate) fn rollback_user(&mut self) {
        if self.turns.last().is_some_and(|m| m.role == chorus_domain::Role::User) {
            self.turns.pop();
        }
    }

    pub(crate) fn reset(&mut self) {
        self.turns.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.turns.len()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Public entry point
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Run the interactive chat REPL.
pub async fn chat(
    orch: &ChatOrchestrator,
    model: Option<String>,
    system: Option<String>,
) -> anyhow::Result<()> {
    let mut model = super::pick_model(orch, model)?;
    let mut conversation = Conversation::new(system);

    let mut rl = rustyline::DefaultEditor::new()?;

    // Banner goes to stderr to keep stdout clean for replies.
    eprintln!("Chorus interactive chat");
    eprintln!("Model: {model}  |  Type /help for commands, Ctrl+D to exit");
    eprintln!();

    loop {
        match rl.readline("you> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                // Keep secrets out of the line history.
                if !trimmed.starts_with("/key") {
                    rl.add_history_entry(&line).ok();
                }

                // ── Slash commands ────────────────────────────────
                if trimmed.starts_with('/') {
                    let cmd = parse_slash(trimmed);
                    if apply_slash(cmd, orch, &mut model, &mut conversation) {
                        break;
                    }
                    continue;
                }

                // ── User message → model ─────────────────────────
                conversation.push_user(trimmed);
                match orch.chat(&model, &conversation.messages()).await {
                    Ok(result) => {
                        println!("{}", result.content);
                        println!();
                        conversation.push_assistant(&result.content);
                    }
                    Err(e) => {
                        conversation.rollback_user();
                        eprintln!("\x1B[31merror: {e}\x1B[0m");
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                eprintln!("(Use Ctrl+D or /exit to quit)");
                continue;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                break;
            }
            Err(e) => {
                eprintln!("\x1B[31mreadline error: {e}\x1B[0m");
                break;
            }
        }
    }

    eprintln!("Goodbye!");
    Ok(())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Slash command handling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Slash {
    Exit,
    Model(Option<String>),
    Models,
    Key { provider: String, secret: String },
    Reset,
    Help,
    Usage(&'static str),
    Unknown(String),
}

pub(crate) fn parse_slash(input: &str) -> Slash {
    let mut parts = input.splitn(2, ' ');
    let cmd = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).filter(|s| !s.is_empty());

    match cmd {
        "/exit" | "/quit" => Slash::Exit,
        "/model" => Slash::Model(arg.map(String::from)),
        "/models" => Slash::Models,
        "/key" => match arg.and_then(|a| a.split_once(char::is_whitespace)) {
            Some((provider, secret)) => Slash::Key {
                provider: provider.to_string(),
                secret: secret.trim().to_string(),
            },
            None => Slash::Usage("/key <provider> <api-key>"),
        },
        "/reset" => Slash::Reset,
        "/help" => Slash::Help,
        other => Slash::Unknown(other.to_string()),
    }
}

/// Apply a slash command. Returns `true` if the REPL should exit.
fn apply_slash(
    cmd: Slash,
    orch: &ChatOrchestrator,
    model: &mut String,
    conversation: &mut Conversation,
) -> bool {
    match cmd {
        Slash::Exit => return true,

        Slash::Model(Some(name)) => {
            if !orch.has_credential(&name) {
                eprintln!("warning: no API key configured for {name}");
            }
            *model = name;
            eprintln!("Model set to: {model}");
        }
        Slash::Model(None) => {
            eprintln!("Current model: {model}");
            eprintln!("Usage: /model <id>");
        }

        Slash::Models => {
            let available = orch.list_available();
            if available.is_empty() {
                eprintln!("{}", super::no_models_error());
            }
            for m in available {
                let marker = if m.id == model.as_str() { ">" } else { " " };
                eprintln!("{marker} {}", super::model_line(m));
            }
        }

        Slash::Key { provider, secret } => {
            match orch.gate().set_credential_by_name(&provider, &secret) {
                Ok(()) => eprintln!("Credential updated for {provider}"),
                Err(e) => eprintln!("\x1B[31merror: {e}\x1B[0m"),
            }
        }

        Slash::Reset => {
            conversation.reset();
            eprintln!("Conversation cleared.");
        }

        Slash::Help => {
            eprintln!("Commands:");
            eprintln!("  /model <id>             Switch model (history is kept)");
            eprintln!("  /models                 List configured models");
            eprintln!("  /key <provider> <key>   Set or rotate a provider API key");
            eprintln!("  /reset                  Clear the conversation");
            eprintln!("  /exit, /quit            Exit the chat");
            eprintln!("  /help                   Show this help");
        }

        Slash::Usage(usage) => eprintln!("Usage: {usage}"),

        Slash::Unknown(other) => {
            eprintln!("Unknown command: {other}  (type /help for a list)");
        }
    }

    false
}
