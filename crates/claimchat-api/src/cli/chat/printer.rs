//! Live rendering of a streaming reply.
//!
//! The session publishes a full transcript snapshot after every fragment.
//! [`ReplyPrinter`] diffs each snapshot against what it has already written
//! and prints only the new suffix of the assistant turn, so output stays in
//! step with the transcript even when snapshots are coalesced.

use std::future::Future;
use std::io::Write;
use std::pin::Pin;
use std::time::{Duration, Instant};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;

use claimchat_core::chat::session::{ChatSession, Exchange, StreamEnd};
use claimchat_core::chat::transport::ChatTransport;
use claimchat_types::chat::Transcript;
use claimchat_types::error::ChatError;

use super::input::{ChatInput, InputEvent};

/// Label printed before the assistant's reply.
pub const ASSISTANT_LABEL: &str = "AI Assistant";

/// What to ask the session to do.
pub enum Request<'a> {
    Send(&'a str),
    Regenerate,
}

/// Tracks how much of the in-progress reply has been written.
#[derive(Debug, Default)]
pub struct ReplyPrinter {
    printed: usize,
}

impl ReplyPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The part of the trailing assistant turn not yet written, if any.
    pub fn pending<'a>(&self, snapshot: &'a Transcript) -> Option<&'a str> {
        let last = snapshot.last().filter(|turn| turn.is_assistant())?;
        last.content
            .get(self.printed..)
            .filter(|suffix| !suffix.is_empty())
    }

    /// Mark `text` as written.
    pub fn advance(&mut self, text: &str) {
        self.printed += text.len();
    }

    pub fn has_printed(&self) -> bool {
        self.printed > 0
    }
}

fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
        spinner.set_style(template);
    }
    spinner.set_message("thinking...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Notice shown when a line is submitted while a reply is still streaming.
/// Blank lines are ignored silently.
fn ignored_input_notice(line: &str) -> Option<String> {
    if line.trim().is_empty() {
        return None;
    }
    Some(format!(
        "Input ignored while replying: \"{line}\". Press Ctrl+C to stop the reply first."
    ))
}

/// Wait for the user to ask for the reply to stop.
///
/// With an interactive prompt the terminal is in raw mode, so Ctrl+C arrives
/// as a readline event rather than a signal.
async fn interrupted(input: Option<&mut ChatInput>) {
    match input {
        Some(input) => loop {
            match input.read_line().await {
                InputEvent::Interrupted | InputEvent::Eof => return,
                InputEvent::Message(line) => {
                    if let Some(notice) = ignored_input_notice(&line) {
                        println!("\n  {}", style(notice).dim());
                    }
                }
            }
        },
        None => {
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Run one exchange, printing the reply as it streams in.
///
/// Ctrl+C cancels the exchange; whatever arrived before stays in the
/// transcript.
pub async fn stream_reply<T: ChatTransport>(
    session: &mut ChatSession<T>,
    request: Request<'_>,
    input: Option<&mut ChatInput>,
    quiet: bool,
) -> Result<Exchange, ChatError> {
    let cancel = CancellationToken::new();
    let mut updates = session.subscribe();
    updates.borrow_and_update();

    let start = Instant::now();
    let spinner = (!quiet).then(thinking_spinner);
    let mut printer = ReplyPrinter::new();

    let mut exchange: Pin<Box<dyn Future<Output = Result<Exchange, ChatError>> + '_>> =
        match request {
            Request::Send(text) => Box::pin(session.send_message(text, &cancel)),
            Request::Regenerate => Box::pin(session.regenerate(&cancel)),
        };

    let interrupt = interrupted(input);
    tokio::pin!(interrupt);

    let result = loop {
        tokio::select! {
            result = &mut exchange => break result,
            changed = updates.changed() => {
                if changed.is_err() {
                    continue;
                }
                let snapshot = updates.borrow_and_update().clone();
                if let Some(suffix) = printer.pending(&snapshot) {
                    if !printer.has_printed() {
                        if let Some(spinner) = &spinner {
                            spinner.finish_and_clear();
                        }
                        if !quiet {
                            print!("\n  {} ", style(ASSISTANT_LABEL).cyan().bold());
                        }
                    }
                    print!("{suffix}");
                    let _ = std::io::stdout().flush();
                    printer.advance(suffix);
                }
            }
            _ = &mut interrupt, if !cancel.is_cancelled() => {
                cancel.cancel();
            }
        }
    };
    drop(exchange);

    // Fragments published right before the exchange returned.
    if let Some(suffix) = printer.pending(&updates.borrow()) {
        if !printer.has_printed() && !quiet {
            if let Some(spinner) = &spinner {
                spinner.finish_and_clear();
            }
            print!("\n  {} ", style(ASSISTANT_LABEL).cyan().bold());
        }
        print!("{suffix}");
        printer.advance(suffix);
    }
    if let Some(spinner) = &spinner {
        spinner.finish_and_clear();
    }

    if printer.has_printed() {
        println!();
    }
    if let (false, Ok(exchange)) = (quiet, &result) {
        print_footer(exchange, start.elapsed());
    }
    let _ = std::io::stdout().flush();
    result
}

fn print_footer(exchange: &Exchange, elapsed: Duration) {
    let note = match exchange.end {
        StreamEnd::Cancelled => "stopped",
        _ if exchange.reply.is_none() => "no response received",
        _ => "",
    };
    let secs = elapsed.as_secs_f64();
    if note.is_empty() {
        println!("  {}", style(format!("{secs:.1}s")).dim());
    } else {
        println!("  {}", style(format!("{note} · {secs:.1}s")).dim());
    }
    println!();
}
