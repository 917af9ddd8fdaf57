//! `spellquiz` - CLI for the regional spelling quiz
//!
//! This binary runs the quiz web server and inspects the attempts it has
//! recorded.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;
use serde_json::json;

use spellquiz::cli::{
    AttemptsCommand, Cli, Command, ConfigCommand, OutputFormat, ServeCommand, WordsCommand,
};
use spellquiz::quiz::{Country, WordGroup};
use spellquiz::server::{self, AppState};
use spellquiz::storage::{AnswerRecord, AttemptRecord};
use spellquiz::{init_logging, Config, Storage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Validation loads the file itself so its errors carry the path.
    if let Command::Config(ConfigCommand::Validate { file }) = &cli.command {
        return handle_validate(file.clone().or_else(|| cli.config.clone()));
    }

    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    match cli.command {
        Command::Serve(serve_cmd) => handle_serve(config, serve_cmd).await,
        Command::Stats(stats_cmd) => handle_stats(&config, stats_cmd.json),
        Command::Attempts(attempts_cmd) => handle_attempts(&config, &attempts_cmd),
        Command::Words(words_cmd) => handle_words(&config, &words_cmd),
        Command::Config(config_cmd) => handle_config(&config, &config_cmd),
    }
}

async fn handle_serve(mut config: Config, cmd: ServeCommand) -> anyhow::Result<()> {
    if let Some(host) = cmd.host {
        config.server.host = host;
    }
    if let Some(port) = cmd.port {
        config.server.port = port;
    }
    config.validate()?;

    let database_path = config.database_path();
    let storage = Storage::open(&database_path)
        .with_context(|| format!("failed to open {}", database_path.display()))?;
    let word_bank = config.word_bank().context("failed to load word bank")?;

    let state = AppState::new(storage, word_bank)
        .with_trust_forwarded_for(config.server.trust_forwarded_for);

    server::serve(&config.server, state).await?;
    Ok(())
}

fn open_storage(config: &Config) -> anyhow::Result<Storage> {
    let database_path = config.database_path();
    Storage::open(&database_path)
        .with_context(|| format!("failed to open {}", database_path.display()))
}

fn handle_stats(config: &Config, json: bool) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    let stats = storage.statistics()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("spellquiz statistics");
        println!("--------------------");
        println!("Database:       {}", storage.path().display());
        println!("Attempts:       {}", stats.total_attempts);
        println!("Average score:  {}%", stats.average_score);
        println!("Perfect scores: {}", stats.perfect_scores);
    }
    Ok(())
}

fn handle_attempts(config: &Config, cmd: &AttemptsCommand) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    let attempts = storage.recent_attempts(cmd.last)?;

    let mut rows = Vec::with_capacity(attempts.len());
    for attempt in attempts {
        let answers = if cmd.answers {
            storage.answers_for(attempt.id)?
        } else {
            Vec::new()
        };
        rows.push((attempt, answers));
    }

    match cmd.format {
        OutputFormat::Json => {
            let value: Vec<_> = rows
                .iter()
                .map(|(attempt, answers)| {
                    let mut entry = json!(attempt);
                    if cmd.answers {
                        entry["answers"] = json!(answers);
                    }
                    entry
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Table => print_attempts_table(&rows),
        OutputFormat::Plain => {
            if rows.is_empty() {
                println!("No attempts recorded.");
            }
            for (attempt, answers) in &rows {
                println!(
                    "#{} {} {} {}/{} ({}%)",
                    attempt.id,
                    attempt.timestamp.to_rfc3339(),
                    attempt.ip_address,
                    attempt.score.correct,
                    attempt.score.total,
                    attempt.score.percentage
                );
                for answer in answers {
                    println!("    {}", describe_answer(answer));
                }
            }
        }
    }
    Ok(())
}

fn print_attempts_table(rows: &[(AttemptRecord, Vec<AnswerRecord>)]) {
    let ip_width = rows
        .iter()
        .map(|(attempt, _)| attempt.ip_address.len())
        .max()
        .unwrap_or(0)
        .max("Client".len());

    println!(
        "{:>6}  {:<25}  {:<ip_width$}  {:>7}  {:>5}",
        "ID", "Timestamp", "Client", "Correct", "Score"
    );
    println!("{}", "-".repeat(6 + 2 + 25 + 2 + ip_width + 2 + 7 + 2 + 5));
    for (attempt, answers) in rows {
        let correct = format!("{}/{}", attempt.score.correct, attempt.score.total);
        println!(
            "{:>6}  {:<25}  {:<ip_width$}  {correct:>7}  {:>4}%",
            attempt.id,
            attempt.timestamp.to_rfc3339(),
            attempt.ip_address,
            attempt.score.percentage
        );
        for answer in answers {
            println!("{:>6}  {}", "", describe_answer(answer));
        }
    }
}

fn describe_answer(answer: &AnswerRecord) -> String {
    let target = if answer.is_level1 {
        "level 1".to_string()
    } else {
        answer.country.clone().unwrap_or_else(|| "?".to_string())
    };
    let verdict = match (&answer.correct_answer, answer.is_correct) {
        (None, _) => "unscored".to_string(),
        (Some(_), true) => "correct".to_string(),
        (Some(expected), false) => format!("expected {expected:?}"),
    };
    format!(
        "word {} [{target}] {:?}: {verdict}",
        answer.word_index, answer.user_answer
    )
}

fn handle_words(config: &Config, cmd: &WordsCommand) -> anyhow::Result<()> {
    let bank = config.word_bank()?;
    let descriptions = bank.level_descriptions();
    let groups: Vec<&WordGroup> = bank
        .groups
        .iter()
        .filter(|group| cmd.level.map_or(true, |level| group.level == level))
        .collect();

    if cmd.json {
        let value = json!({
            "levelDescriptions": descriptions,
            "groups": groups,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let mut current_level = None;
    for group in groups {
        if current_level != Some(group.level) {
            let description = descriptions
                .get(&group.level)
                .map_or("", String::as_str);
            println!("Level {}: {description}", group.level);
            current_level = Some(group.level);
        }
        println!("  {}", group.name);
        for word in &group.words {
            let spellings: Vec<String> = Country::ALL
                .iter()
                .map(|&country| format!("{country}={}", word.spellings.get(country)))
                .collect();
            match &word.note {
                Some(note) => println!("    {}  ({note})", spellings.join(" ")),
                None => println!("    {}", spellings.join(" ")),
            }
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: &ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if *json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:       {}", config.database_path().display());
                println!();
                println!("[Server]");
                println!("  Address:             {}", config.server.server_addr());
                println!(
                    "  Trust forwarded-for: {}",
                    config.server.trust_forwarded_for
                );
                println!(
                    "  Shutdown timeout:    {}s",
                    config.server.shutdown_timeout_secs
                );
                println!();
                println!("[Quiz]");
                match &config.quiz.word_bank_path {
                    Some(path) => println!("  Word bank:           {}", path.display()),
                    None => println!("  Word bank:           built-in"),
                }
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => handle_validate(file.clone())?,
    }
    Ok(())
}

fn handle_validate(file: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    let path = file.unwrap_or_else(Config::default_config_path);
    println!("Validating configuration: {}", path.display());
    Config::check_file(&path)
        .with_context(|| format!("configuration {} is invalid", path.display()))?;
    println!("Configuration is valid.");
    Ok(())
}
