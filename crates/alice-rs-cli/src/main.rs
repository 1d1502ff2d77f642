//! Interactive terminal chat with Alice.

mod commands;

use alice_rs_config::AliceConfig;
use alice_rs_core::{Assistant, MemoryEchoModel, Session};
use alice_rs_memory::MemoryRecord;
use anyhow::Context;
use clap::Parser;
use commands::{HELP, SlashCommand, parse_slash_command};
use log::{debug, info, warn};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Command-line options for the chat client.
#[derive(Parser)]
#[command(name = "alice", version)]
struct Cli {
    /// Optional path to an alice.json5 config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory holding the memory log
    #[arg(long)]
    memory_path: Option<PathBuf>,
    /// Maximum memories recalled per turn
    #[arg(long)]
    top_k: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();

    let cli = Cli::parse();
    info!(
        "starting alice (config_set={}, memory_path_set={})",
        cli.config.is_some(),
        cli.memory_path.is_some()
    );
    let config = load_config(&cli)?;
    let assistant = Arc::new(
        Assistant::open(config, Arc::new(MemoryEchoModel::new()))
            .context("failed to start assistant")?,
    );
    println!(
        "Alice is ready ({} memories). Type /help for commands.",
        assistant.memory().len()
    );

    let result = run(&assistant).await;
    assistant
        .shutdown()
        .context("failed to save memory on exit")?;
    result
}

fn load_config(cli: &Cli) -> anyhow::Result<AliceConfig> {
    let mut config = if let Some(path) = cli.config.as_ref() {
        info!("loading config from path: {}", path.display());
        AliceConfig::load_from_path(path).context("failed to load config")?
    } else {
        let cwd = std::env::current_dir().context("cwd")?;
        info!("loading layered config from cwd: {}", cwd.display());
        let layered = AliceConfig::load_layered(&cwd).context("failed to load layered config")?;
        debug!("layered config loaded (layers={})", layered.layers.len());
        layered.config
    };
    if let Some(path) = cli.memory_path.as_ref() {
        config.memory.path = Some(path.to_string_lossy().to_string());
    }
    if let Some(top_k) = cli.top_k {
        config.retrieval.top_k = top_k;
    }
    config.validate().context("invalid config")?;
    Ok(config)
}

async fn run(assistant: &Arc<Assistant>) -> anyhow::Result<()> {
    let mut session = assistant.start_session();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("you> ");
        std::io::stdout().flush().context("flush stdout")?;
        let Some(line) = lines.next_line().await.context("read stdin")? else {
            println!();
            return Ok(());
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        match parse_slash_command(input) {
            Ok(Some(SlashCommand::Quit)) => return Ok(()),
            Ok(Some(command)) => handle_command(assistant, &mut session, command),
            Ok(None) => match session.process_turn(input).await {
                Ok(outcome) => {
                    for warning in &outcome.memory_warnings {
                        println!("(warning: {warning})");
                    }
                    println!("alice> {}", outcome.reply_text);
                }
                Err(err) => {
                    warn!("turn failed (error={})", err);
                    println!("(error: {err})");
                }
            },
            Err(message) => println!("{message}"),
        }
    }
}

fn handle_command(assistant: &Arc<Assistant>, session: &mut Session, command: SlashCommand) {
    match command {
        SlashCommand::Remember { key, value } => match assistant.store(&key, &value) {
            Ok(record) => println!("Remembered {}.", describe(&record)),
            Err(err) => println!("(error: {err})"),
        },
        SlashCommand::Lookup(key) => match assistant.lookup(&key) {
            Some(record) => println!("{}", describe(&record)),
            None => println!("Nothing stored for {key}."),
        },
        SlashCommand::Forget(key) => match assistant.forget(&key) {
            Ok(Some(record)) => println!("Forgot {}.", describe(&record)),
            Ok(None) => println!("Nothing stored for {key}."),
            Err(err) => println!("(error: {err})"),
        },
        SlashCommand::Memories => {
            let records = assistant.memories();
            if records.is_empty() {
                println!("No memories yet.");
            }
            for record in records {
                println!(
                    "- {} [{} {:.2}]",
                    describe(&record),
                    record.category,
                    record.confidence
                );
            }
        }
        SlashCommand::History => {
            for turn in session.conversation().turns() {
                let speaker = match turn.role {
                    alice_rs_protocol::Role::User => "you",
                    alice_rs_protocol::Role::Assistant => "alice",
                };
                println!("[{}] {speaker}> {}", turn.turn_id, turn.text);
            }
        }
        SlashCommand::Insights => match serde_json::to_string_pretty(&session.insights()) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("(error: {err})"),
        },
        SlashCommand::New => {
            *session = assistant.start_session();
            println!("Started a new conversation.");
        }
        SlashCommand::Help => println!("{HELP}"),
        SlashCommand::Quit => {}
    }
}

fn describe(record: &MemoryRecord) -> String {
    format!("{}: {}", record.key, record.value)
}
