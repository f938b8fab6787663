//! Terminal adapters for the client-side collaborators.

use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::warn;

use codementor_core::normalize::title_from_url;
use codementor_protocols::{ChatRole, ChatTurn, ChatView, ProblemContext, ProblemContextSource};

/// Get the .codementor directory path.
pub(crate) fn codementor_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".codementor"))
        .unwrap_or_else(|| PathBuf::from(".codementor"))
}

/// Chat view printing to stdout.
#[derive(Default)]
pub(crate) struct TerminalView;

impl ChatView for TerminalView {
    fn show_turn(&self, turn: &ChatTurn) {
        let label = match turn.role {
            ChatRole::User => "you",
            ChatRole::Model => "mentor",
        };
        println!("{label}> {}", turn.text);
    }

    fn show_loading(&self) {
        print!("mentor is thinking...\r");
        let _ = std::io::stdout().flush();
    }

    fn clear_loading(&self) {
        print!("{}\r", " ".repeat(24));
        let _ = std::io::stdout().flush();
    }

    fn show_notice(&self, text: &str) {
        println!("[!] {text}");
    }

    fn clear(&self) {
        println!("{}", "-".repeat(60));
    }

    fn review_badge(&self, count: usize, has_notification: bool) {
        if has_notification {
            println!("[review] {count} entries, new recommendations available (/review)");
        }
    }
}

struct Page {
    url: String,
    title: String,
}

/// Problem context read from the command line and local files.
///
/// The description and code files are re-read on every call so edits
/// show up in the next question.
pub(crate) struct FileContextSource {
    page: RwLock<Page>,
    description_file: Option<PathBuf>,
    code_file: Option<PathBuf>,
}

impl FileContextSource {
    pub fn new(
        url: impl Into<String>,
        title: Option<String>,
        description_file: Option<PathBuf>,
        code_file: Option<PathBuf>,
    ) -> Self {
        let url = url.into();
        let title = title.unwrap_or_else(|| title_from_url(&url));
        Self {
            page: RwLock::new(Page { url, title }),
            description_file,
            code_file,
        }
    }

    /// Move to another problem; its title is derived from the URL.
    pub fn navigate(&self, url: &str) {
        let mut page = self.page.write();
        page.url = url.to_string();
        page.title = title_from_url(url);
    }
}

async fn read_optional(path: &Option<PathBuf>) -> Option<String> {
    let path = path.as_ref()?;
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Some(content),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read context file");
            None
        }
    }
}

#[async_trait]
impl ProblemContextSource for FileContextSource {
    async fn current_url(&self) -> String {
        self.page.read().url.clone()
    }

    async fn context(&self) -> ProblemContext {
        let title = self.page.read().title.clone();
        let description = read_optional(&self.description_file).await.unwrap_or_default();
        let ctx = ProblemContext::new(title, description);
        match read_optional(&self.code_file).await {
            Some(code) if !code.trim().is_empty() => ctx.with_code(code),
            _ => ctx,
        }
    }
}
