//! Client subcommand handlers: chat, review, solved and reset.

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use codementor_config::Config;
use codementor_core::{ConversationManager, MentorStores, PageNotifier, SubmitOutcome};
use codementor_gateway_openai::OpenAiGateway;
use codementor_gateway_proxy::ProxyGateway;
use codementor_protocols::{ModelGateway, PageLifecycle, ReviewCatalog};
use codementor_store_sqlite::SqliteKvStore;

use crate::adapters::{FileContextSource, TerminalView};
use crate::cli::ChatArgs;

const HELP: &str = "Commands: /goto <url>  /review  /solved  /reset  /help  /quit";

/// A line typed at the chat prompt.
#[derive(Debug, PartialEq, Eq)]
enum ReplCommand<'a> {
    Ask(&'a str),
    Goto(&'a str),
    Review,
    Solved,
    Reset,
    Help,
    Quit,
    Unknown(&'a str),
}

fn parse_line(line: &str) -> ReplCommand<'_> {
    let line = line.trim();
    let Some(command) = line.strip_prefix('/') else {
        return ReplCommand::Ask(line);
    };
    let (name, rest) = command.split_once(' ').unwrap_or((command, ""));
    match name {
        "goto" if !rest.trim().is_empty() => ReplCommand::Goto(rest.trim()),
        "review" => ReplCommand::Review,
        "solved" => ReplCommand::Solved,
        "reset" => ReplCommand::Reset,
        "help" => ReplCommand::Help,
        "quit" | "exit" => ReplCommand::Quit,
        _ => ReplCommand::Unknown(line),
    }
}

async fn open_stores(config: &Config) -> anyhow::Result<MentorStores> {
    let path = &config.client.store_path;
    let store = SqliteKvStore::open(path)
        .await
        .with_context(|| format!("opening store at {}", path.display()))?;
    Ok(MentorStores::over(Arc::new(store)))
}

fn format_catalog(catalog: &ReviewCatalog) -> String {
    if catalog.is_empty() {
        return "Review list is empty.".to_string();
    }
    let mut out = String::new();
    for entry in catalog {
        out.push_str(&format!("{} (from {})\n", entry.concept, entry.source));
        for problem in &entry.problems {
            out.push_str(&format!("  - {:<40} {}\n", problem.title, problem.url));
        }
    }
    out.trim_end().to_string()
}

/// Run `/review`, `/solved` or `/reset`, rendering the result.
///
/// Failures are logged and rendered as a notice; the session keeps running.
async fn session_command(manager: &ConversationManager, command: &ReplCommand<'_>) -> String {
    let result = match command {
        ReplCommand::Review => manager.review_catalog().await.map(|c| format_catalog(&c)),
        ReplCommand::Solved => manager
            .mark_solved()
            .await
            .map(|added| (if added { "Marked as solved." } else { "Already recorded." }).to_string()),
        ReplCommand::Reset => manager
            .reset()
            .await
            .map(|removed| format!("Cleared {removed} stored keys.")),
        other => return format!("Unsupported command: {other:?}"),
    };
    result.unwrap_or_else(|e| {
        warn!(command = ?command, error = %e, "Chat command failed");
        format!("[!] Command failed: {e}")
    })
}

/// Interactive chat about one problem page.
pub(crate) async fn run_chat(config: Config, args: ChatArgs) -> anyhow::Result<()> {
    let stores = open_stores(&config).await?;

    let gateway: Arc<dyn ModelGateway> = if args.direct {
        Arc::new(OpenAiGateway::from_config(&config.upstream)?)
    } else {
        let endpoint = args.endpoint.clone().unwrap_or_else(|| config.client.endpoint.clone());
        Arc::new(ProxyGateway::new(endpoint))
    };
    info!(gateway = gateway.id(), url = %args.url, "Starting chat");

    let context = Arc::new(FileContextSource::new(
        args.url.clone(),
        args.title,
        args.description_file,
        args.code_file,
    ));
    let manager = Arc::new(ConversationManager::new(
        gateway,
        stores,
        context.clone(),
        Arc::new(TerminalView),
        config.mentor.clone(),
    ));

    let notifier = PageNotifier::new();
    notifier.observe_url(&args.url);
    let events = notifier.subscribe();
    let listener = tokio::spawn({
        let manager = manager.clone();
        async move { manager.run(events).await }
    });

    manager.attach().await;
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_line(&line) {
            ReplCommand::Ask(query) => match manager.submit(query).await {
                SubmitOutcome::Answered { recommendation: Some(outcome), .. } if outcome.added() => {
                    println!("[review] New practice problems were added (/review)");
                }
                _ => {}
            },
            ReplCommand::Goto(url) => {
                context.navigate(url);
                notifier.observe_url(url);
            }
            command @ (ReplCommand::Review | ReplCommand::Solved | ReplCommand::Reset) => {
                println!("{}", session_command(&manager, &command).await);
            }
            ReplCommand::Help => println!("{HELP}"),
            ReplCommand::Quit => break,
            ReplCommand::Unknown(line) => println!("Unknown command: {line}\n{HELP}"),
        }
    }

    drop(notifier);
    let _ = listener.await;
    Ok(())
}

/// Print the review catalog and clear its notification.
pub(crate) async fn run_review(config: Config, format: &str) -> anyhow::Result<()> {
    let stores = open_stores(&config).await?;
    let catalog = stores.catalog.list().await?;
    stores.notifications.set_notification(false).await?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&catalog)?),
        _ => println!("{}", format_catalog(&catalog)),
    }
    Ok(())
}

/// Print the solved-problem list.
pub(crate) async fn run_solved(config: Config) -> anyhow::Result<()> {
    let stores = open_stores(&config).await?;
    let solved = stores.solved.list().await?;
    if solved.is_empty() {
        println!("No solved problems recorded.");
        return Ok(());
    }
    println!("{:<40} {}", "TITLE", "TOPIC");
    println!("{}", "-".repeat(60));
    for problem in solved {
        println!("{:<40} {}", problem.title, problem.topic);
    }
    Ok(())
}

/// Remove all stored assistant state.
pub(crate) async fn run_reset(config: Config) -> anyhow::Result<()> {
    let stores = open_stores(&config).await?;
    let removed = stores.reset().await?;
    println!("Cleared {removed} stored keys.");
    Ok(())
}
