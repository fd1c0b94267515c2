//! MCP Server Example
//!
//! A session-backed notebook: notes are kept in the caller's session and can
//! be searched, summarized and counted.

use {
    anyhow::Result,
    lambdamcp::{
        logging, EnumType, McpHandler, McpHandlerBuilder, McpServer, ParamType, PromptMessage,
        Resource, SchemaType, ServerConfig, Signature, ToolResult,
    },
    serde::{Deserialize, Serialize},
    serde_json::json,
    std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

const NOTES_KEY: &str = "notes";

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Priority {
    Low,
    Normal,
    High,
}

impl SchemaType for Priority {
    fn param_type() -> ParamType {
        ParamType::Enum(EnumType::new("Priority", ["low", "normal", "high"]))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Note {
    text: String,
    priority: Priority,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured logging with tracing
    logging::init_tracing();

    let config = ServerConfig::from_env()?;
    let server = McpServer::new(notebook(&config));
    server.start(&config.bind_address()).await?;

    Ok(())
}

fn notebook(config: &ServerConfig) -> McpHandler {
    let notes_taken = Arc::new(AtomicUsize::new(0));

    let counter = notes_taken.clone();
    McpHandlerBuilder::from_config(config)
        .with_tool(
            Signature::new("note_take")
                .doc("Store a note in the current session.\n\nNotes live as long as the session does.")
                .param::<String>("text")
                .param::<Priority>("priority"),
            move |args, ctx| {
                let counter = counter.clone();
                async move {
                    let note = Note {
                        text: args.require("text")?,
                        priority: args.require("priority")?,
                    };
                    let stored = ctx
                        .update_session(|session| {
                            let mut notes: Vec<Note> = session.get(NOTES_KEY).unwrap_or_default();
                            notes.push(note.clone());
                            session.set(NOTES_KEY, notes)
                        })
                        .await?;
                    if !stored {
                        anyhow::bail!("notes need a session; call initialize first");
                    }
                    counter.fetch_add(1, Ordering::Relaxed);
                    Ok(ToolResult::text(format!("Noted: {}", note.text)))
                }
            },
        )
        .with_tool(
            Signature::new("note_find")
                .description("Find notes containing a piece of text")
                .param::<String>("query"),
            |args, ctx| async move {
                let query: String = args.require("query")?;
                let notes: Vec<Note> = ctx
                    .get_session()
                    .await?
                    .and_then(|session| session.get(NOTES_KEY))
                    .unwrap_or_default();
                let needle = query.to_lowercase();
                let matches: Vec<Note> = notes
                    .into_iter()
                    .filter(|note| note.text.to_lowercase().contains(&needle))
                    .collect();
                Ok(ToolResult::with_text_and_data(
                    format!("{} note(s) match '{}'", matches.len(), query),
                    json!({ "matches": matches }),
                ))
            },
        )
        .with_prompt(
            Signature::new("summarize_notes")
                .doc("Ask the assistant to summarize the session's notes")
                .param::<String>("style"),
            |args, ctx| async move {
                let style: String = args.require("style")?;
                let notes: Vec<Note> = ctx
                    .get_session()
                    .await?
                    .and_then(|session| session.get(NOTES_KEY))
                    .unwrap_or_default();
                let listing = notes
                    .iter()
                    .map(|note| format!("- [{:?}] {}", note.priority, note.text))
                    .collect::<Vec<_>>()
                    .join("\n");
                Ok(vec![
                    PromptMessage::user(format!("Summarize these notes as {style}:\n{listing}")),
                    PromptMessage::assistant("Here is the summary:"),
                ])
            },
        )
        .with_resource(
            Resource::text(
                "notes://about",
                "about",
                "A notebook kept in your MCP session. Use note_take and note_find.",
            )
            .description("What this server does"),
        )
        .with_resource({
            let counter = notes_taken.clone();
            Resource::dynamic("notes://count", "count", move || {
                let counter = counter.clone();
                async move { Ok(counter.load(Ordering::Relaxed).to_string()) }
            })
            .description("Notes taken since the server started")
        })
        .build()
}
