use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use sift_common::validator::partial_score;
use sift_common::{FileSettingsStore, MemorySettingsStore, SettingsStore};
use sift_parser::{ParseWarning, Parser as BankParser};
use sift_runtime::{load_bank, AudioCueManager, Event, Orchestrator, QuizState};
use std::path::{Path, PathBuf};

mod console;
use console::Console;

/// Sift - a digital-forensics literacy quiz
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play the quiz with scripted input
    Run {
        /// Question bank to play instead of the built-in one
        #[arg(short, long)]
        bank: Option<PathBuf>,
        /// Seed for the option and scenario shuffles
        #[arg(long)]
        seed: Option<u64>,
        /// Audio settings file
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Comma-separated list of inputs (e.g., "n,n,2,s,n")
        input_string: String,
    },
    /// Check a question bank and report excluded questions
    Validate {
        /// Question bank to check, the built-in one when omitted
        #[arg(short, long)]
        bank: Option<PathBuf>,
    },
    /// Show or change the audio settings
    Settings {
        #[arg(long, default_value = "settings.toml")]
        file: PathBuf,
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },
}

#[derive(Subcommand, Debug)]
enum SettingsAction {
    /// Set one value, e.g. `set music_volume 0.5`
    Set { key: String, value: String },
}

fn main() {
    pretty_env_logger::init();
    let cli = Args::parse();

    match cli.command {
        Commands::Run {
            bank,
            seed,
            settings,
            input_string,
        } => run(bank.as_deref(), seed, settings, &input_string),
        Commands::Validate { bank } => validate(bank.as_deref()),
        Commands::Settings { file, action } => edit_settings(file, action),
    }
}

fn run(bank_path: Option<&Path>, seed: Option<u64>, settings: Option<PathBuf>, input_string: &str) {
    let (bank, warnings) = load_bank(bank_path);
    print_warnings(&warnings);

    let store: Box<dyn SettingsStore> = match settings {
        Some(path) => Box::new(FileSettingsStore::new(path)),
        None => Box::new(MemorySettingsStore::default()),
    };
    let rng = match seed {
        Some(seed) => Pcg32::seed_from_u64(seed),
        None => Pcg32::from_entropy(),
    };

    let mut orchestrator = Orchestrator::new(bank, AudioCueManager::new(store), rng);
    let mut console = Console::new();

    orchestrator.start();
    orchestrator.finish_effects();
    console.render(orchestrator.drain_commands());

    let mut quit_requested = false;
    for input in input_string.split(',') {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed == "?" {
            print_session(&orchestrator);
            continue;
        }

        if trimmed == "q" {
            if orchestrator.handle(Event::Quit).is_ok() {
                orchestrator.finish_effects();
                console.render(orchestrator.drain_commands());
            } else {
                orchestrator.stop();
                println!("QUIT");
            }
            quit_requested = true;
            break;
        }

        let events = match parse_input(trimmed) {
            Ok(events) => events,
            Err(message) => {
                eprintln!("{}", message);
                break;
            }
        };

        let scored = score_before_submit(&orchestrator, &events);
        for event in events {
            if let Err(err) = orchestrator.handle(event) {
                orchestrator.finish_effects();
                console.render(orchestrator.drain_commands());
                println!("{}", err);
                break;
            }
        }
        orchestrator.finish_effects();
        console.render(orchestrator.drain_commands());

        if let Some(score) = scored {
            if matches!(orchestrator.state(), QuizState::Feedback(_)) {
                println!("Score: {:.0}%", score * 100.0);
            }
        }
    }

    if !quit_requested && !orchestrator.has_ended() {
        eprintln!("\nWarning: Quiz did not reach the end.");
    }
}

/// Turns one scripted input into the events a player would produce.
fn parse_input(input: &str) -> Result<Vec<Event>, String> {
    let mut parts = input.split_whitespace();
    let command = parts.next().unwrap_or_default();

    let events = match (command, parts.next(), parts.next()) {
        ("n", None, None) => vec![Event::Next],
        ("s", None, None) => vec![Event::Submit],
        ("r", None, None) => vec![Event::Restart],
        ("d", Some(token), Some(zone)) => vec![
            Event::DragBegin(token.to_string()),
            Event::DragEnd {
                token: token.to_string(),
                zone: Some(zone.to_string()),
            },
        ],
        ("x", Some(token), None) => vec![
            Event::DragBegin(token.to_string()),
            Event::DragEnd {
                token: token.to_string(),
                zone: None,
            },
        ],
        (number, None, None) => match number.parse::<usize>() {
            Ok(choice) if choice > 0 => vec![Event::SelectOption(choice - 1)],
            Ok(_) => return Err(format!("Invalid option: {}", input)),
            Err(_) => return Err(format!("Unknown command: {}", input)),
        },
        _ => return Err(format!("Unknown command: {}", input)),
    };

    if parts.next().is_some() {
        return Err(format!("Unknown command: {}", input));
    }
    Ok(events)
}

/// Partial score of the drag-and-drop answer about to be submitted.
fn score_before_submit(orchestrator: &Orchestrator, events: &[Event]) -> Option<f32> {
    if !events.contains(&Event::Submit) || !orchestrator.submit_enabled() {
        return None;
    }
    let question = orchestrator.current_question()?;
    question.as_drag_and_drop()?;
    Some(partial_score(question, &orchestrator.answer().mapping))
}

fn print_session(orchestrator: &Orchestrator) {
    let session = orchestrator.session();
    println!(
        "Answered: {}, correct: {}, accuracy: {:.0}%",
        session.answered(),
        session.correct_count(),
        session.accuracy_percentage()
    );
}

fn print_warnings(warnings: &[ParseWarning]) {
    for warning in warnings {
        let file_name = warning
            .file
            .as_ref()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or("bank.toml");
        println!(
            "{}: WARNING: question `{}`: {}",
            file_name, warning.question, warning.message
        );
    }
}

fn validate(bank_path: Option<&Path>) {
    let Some(path) = bank_path else {
        let bank = sift_common::QuestionBank::builtin();
        println!("{} questions, all valid: {}", bank.len(), bank.validate_all());
        return;
    };

    match BankParser::with_file(path).parse_file() {
        Ok((bank, warnings)) => {
            print_warnings(&warnings);
            println!(
                "{} questions loaded, {} excluded",
                bank.len(),
                warnings.len()
            );
            if bank.is_empty() {
                std::process::exit(1);
            }
        }
        Err(err) => {
            println!("{}", err);
            std::process::exit(1);
        }
    }
}

fn edit_settings(file: PathBuf, action: Option<SettingsAction>) {
    let mut store = FileSettingsStore::new(file);
    let mut settings = match store.load() {
        Ok(settings) => settings,
        Err(err) => {
            println!("ERROR: {}", err);
            std::process::exit(1);
        }
    };

    if let Some(SettingsAction::Set { key, value }) = action {
        if let Err(err) = settings.set(&key, &value) {
            println!("ERROR: {}", err);
            std::process::exit(1);
        }
        if let Err(err) = store.save(&settings) {
            println!("ERROR: {}", err);
            std::process::exit(1);
        }
    }

    match settings.to_toml() {
        Ok(toml) => print!("{}", toml),
        Err(err) => {
            println!("ERROR: {}", err);
            std::process::exit(1);
        }
    }
}
