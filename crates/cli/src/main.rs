//! A terminal chat client for the Groq chat-completions API.

#[macro_use]
extern crate tracing;

mod ui;

use std::io::Write as _;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use minichat_core::config::{Credentials, TraceConfig};
use minichat_core::ChatSession;
use minichat_groq_model::{GroqConfigBuilder, GroqProvider};
use minichat_model::{ModelProviderError, Turn};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt};
use tokio::select;
use tokio::sync::mpsc;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("{}", "🤖 minichat".bold());

    let Some(credentials) = read_credentials().await else {
        return;
    };

    let config =
        GroqConfigBuilder::with_api_key(credentials.model_key()).build();
    let provider = GroqProvider::new(config);
    let trace = TraceConfig::new(credentials.tracing_key());
    let mut session = ChatSession::new(provider, trace);

    loop {
        print!("> ");
        std::io::stdout().flush().unwrap();

        let Some(line) = read_line().await else {
            break;
        };
        let input = line.trim().to_owned();
        if input.is_empty() {
            // Empty input is not a submission.
            continue;
        }
        chat_once(&mut session, &input).await;
    }
}

/// Prompts for the two API keys, repeating until both are provided.
///
/// Returns `None` when the input stream closes.
async fn read_credentials() -> Option<Credentials> {
    loop {
        print!("Groq API key: ");
        std::io::stdout().flush().unwrap();
        let model_key = read_line().await?;

        print!("Tracing API key: ");
        std::io::stdout().flush().unwrap();
        let tracing_key = read_line().await?;

        match Credentials::new(model_key.trim(), tracing_key.trim()) {
            Some(credentials) => return Some(credentials),
            None => {
                println!(
                    "{}",
                    "Please enter both API keys to start chatting."
                        .bright_yellow()
                );
            }
        }
    }
}

/// Runs one full exchange: echoes the user turn, streams the reply, and
/// shows the generic banner if anything fails.
async fn chat_once(session: &mut ChatSession, input: &str) {
    {
        let stdout = std::io::stdout();
        ui::render_turn(&mut stdout.lock(), &Turn::user(input)).unwrap();
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {wide_msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    spinner.set_message("🤔 Thinking...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    let mut spinner = Some(spinner);

    let (fragment_tx, mut fragment_rx) = mpsc::unbounded_channel::<String>();
    let submit_fut = session.submit(input, move |fragment| {
        fragment_tx.send(fragment.to_owned()).ok();
    });
    tokio::pin!(submit_fut);

    let mut printer = ui::StreamPrinter::new(std::io::stdout());
    let result = loop {
        select! {
            result = &mut submit_fut => break result,
            fragment = fragment_rx.recv() => {
                let Some(fragment) = fragment else {
                    continue;
                };
                // Clear the spinner before printing anything else.
                if let Some(spinner) = spinner.take() {
                    spinner.finish_and_clear();
                }
                printer.push(&fragment).unwrap();
            }
        }
    };

    // The submission may complete with fragments still queued.
    while let Ok(fragment) = fragment_rx.try_recv() {
        if let Some(spinner) = spinner.take() {
            spinner.finish_and_clear();
        }
        printer.push(&fragment).unwrap();
    }
    if let Some(spinner) = spinner.take() {
        spinner.finish_and_clear();
    }
    printer.finish().unwrap();

    if let Err(err) = result {
        error!("model request failed: {err} (kind: {:?})", err.kind());
        ui::render_error_banner(&mut std::io::stdout()).unwrap();
    }
}

async fn read_line() -> Option<String> {
    let mut stdin = io::BufReader::new(io::stdin());
    let mut line = String::new();

    match stdin.read_line(&mut line).await {
        Ok(count) => {
            if count == 0 {
                return None;
            }
            Some(line)
        }
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
