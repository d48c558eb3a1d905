//! Abstraction over the selection UI, with a line-based terminal implementation.

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;

/// A trait to abstract the interactive picker.
/// This allows for mocking in tests without a terminal.
#[async_trait]
pub trait SelectionUi: Send + Sync {
    /// Shows `labels` in order and returns the chosen one, or `None` if the
    /// user dismissed the picker.
    async fn pick(&self, labels: &[String], placeholder: Option<&str>) -> Option<String>;

    /// Surfaces a failure to the user.
    async fn show_error(&self, message: &str) {
        tracing::error!("{}", message);
    }
}

/// A numbered-menu picker driven by an async line reader.
///
/// Typing a number or an exact label selects; an empty line, `q`, or end of
/// input dismisses. Anything else re-prompts.
pub struct TerminalPicker<R, W> {
    io: Mutex<(R, W)>,
}

impl<R, W> TerminalPicker<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            io: Mutex::new((reader, writer)),
        }
    }

    /// Consumes the picker, returning the reader and writer.
    pub fn into_inner(self) -> (R, W) {
        self.io.into_inner()
    }
}

impl TerminalPicker<BufReader<tokio::io::Stdin>, tokio::io::Stderr> {
    /// Reads from stdin and draws on stderr, keeping stdout free for output.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stderr())
    }
}

fn render_menu(labels: &[String], placeholder: Option<&str>) -> String {
    let mut menu = String::new();
    if let Some(placeholder) = placeholder {
        menu.push_str(&format!("{placeholder}\n"));
    }
    if labels.is_empty() {
        menu.push_str("  (empty)\n");
    }
    let width = labels.len().to_string().len();
    for (idx, label) in labels.iter().enumerate() {
        menu.push_str(&format!("  {:>width$}) {}\n", idx + 1, label, width = width));
    }
    menu.push_str("> ");
    menu
}

/// Resolves one line of input. An exact label wins over the dismiss and
/// index shortcuts. `Ok(None)` means dismissal, `Err` carries the message for
/// an invalid choice.
fn resolve_input(input: &str, labels: &[String]) -> Result<Option<String>, String> {
    let input = input.trim();
    if let Some(label) = labels.iter().find(|label| label.as_str() == input) {
        return Ok(Some(label.clone()));
    }
    if input.is_empty() || input == "q" {
        return Ok(None);
    }
    if let Ok(number) = input.parse::<usize>() {
        return match number.checked_sub(1).and_then(|idx| labels.get(idx)) {
            Some(label) => Ok(Some(label.clone())),
            None => Err(format!("No entry numbered {number}")),
        };
    }
    Err(format!("Unknown selection: {input}"))
}

#[async_trait]
impl<R, W> SelectionUi for TerminalPicker<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn pick(&self, labels: &[String], placeholder: Option<&str>) -> Option<String> {
        let mut guard = self.io.lock().await;
        let (reader, writer) = &mut *guard;
        let menu = render_menu(labels, placeholder);

        loop {
            if let Err(e) = write_flush(writer, &menu).await {
                tracing::warn!("Failed to draw picker: {}", e);
                return None;
            }

            let mut line = String::new();
            match reader.read_line(&mut line).await {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Failed to read selection: {}", e);
                    return None;
                }
            }

            match resolve_input(&line, labels) {
                Ok(selection) => return selection,
                Err(message) => {
                    if write_flush(writer, &format!("{message}\n")).await.is_err() {
                        return None;
                    }
                }
            }
        }
    }

    async fn show_error(&self, message: &str) {
        tracing::error!("{}", message);
        let mut guard = self.io.lock().await;
        let (_, writer) = &mut *guard;
        if let Err(e) = write_flush(writer, &format!("error: {message}\n")).await {
            tracing::warn!("Failed to report error: {}", e);
        }
    }
}

async fn write_flush<W: AsyncWrite + Unpin>(writer: &mut W, text: &str) -> std::io::Result<()> {
    writer.write_all(text.as_bytes()).await?;
    writer.flush().await
}
