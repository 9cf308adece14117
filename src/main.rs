//! Could Try Harder CLI - build report comments from a bank of templates.

use std::error::Error;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use log::{LevelFilter, error, info};

use could_try_harder::config::Config;
use could_try_harder::engine::{Engine, PLACEHOLDER_HELP};
use could_try_harder::{
    SubjectStore, append_to_draft, export_reports, import_class_list, render_report,
};

/// Build per-student report comments from a bank of reusable templates.
#[derive(Parser, Debug)]
#[command(name = "could-try-harder")]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file (default: search for .could-try-harder.toml).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log more detail (-v for info, -vv for debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a subject from a CSV class list (first name, last name, gender).
    Import {
        #[arg(value_name = "CSV")]
        csv: PathBuf,
        subject: String,
    },
    /// List saved subjects.
    List,
    /// List the students of a subject.
    Students { subject: String },
    /// Delete a saved subject.
    Delete { subject: String },
    /// Write a subject's reports to a text file. Use - for stdout.
    Export {
        subject: String,
        #[arg(value_name = "FILE")]
        output: PathBuf,
    },
    /// Set the intro comment shown at the start of every report.
    Intro { subject: String, text: String },
    /// Manage the comment bank.
    Bank {
        #[command(subcommand)]
        action: BankAction,
    },
    /// Set a student's comment, optionally appending bank entries.
    Comment {
        subject: String,
        /// Student number, as shown by `students`.
        student: usize,
        /// New comment text (default: keep the current comment).
        text: Option<String>,
        /// Append this bank entry (may be repeated).
        #[arg(long = "from-bank", value_name = "ENTRY")]
        from_bank: Vec<usize>,
    },
    /// Show the intro and comment bank expanded for one student.
    Preview { subject: String, student: usize },
    /// Apply the style rules to text (read from stdin when omitted).
    Normalize { text: Option<String> },
    /// Fill in placeholders for a name and gender.
    Expand {
        text: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        gender: String,
    },
    /// Describe the available placeholders.
    Placeholders,
}

#[derive(Subcommand, Debug)]
enum BankAction {
    /// List bank entries.
    List { subject: String },
    /// Add an entry.
    Add { subject: String, text: String },
    /// Replace an entry.
    Update {
        subject: String,
        entry: usize,
        text: String,
    },
    /// Remove an entry.
    Remove { subject: String, entry: usize },
    /// Replace the intro and bank with another subject's.
    CopyFrom { subject: String, source: String },
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let engine = match config.engine() {
        Ok(engine) => engine,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let store = SubjectStore::new(&config.data_folder);

    match run(args.command, &engine, &store) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn Error>> {
    if let Some(path) = path {
        return Ok(Config::from_file(path)?);
    }
    let cwd = std::env::current_dir()?;
    match Config::discover(&cwd)? {
        Some((path, config)) => {
            info!("Using configuration from {}", path.display());
            Ok(config)
        }
        None => Ok(Config::default()),
    }
}

/// Convert a 1-based number from the command line to an index.
fn position(number: usize, what: &str) -> Result<usize, Box<dyn Error>> {
    number
        .checked_sub(1)
        .ok_or_else(|| format!("{} numbers start at 1", what).into())
}

fn run(command: Command, engine: &Engine, store: &SubjectStore) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Import { csv, subject } => {
            let subject = import_class_list(&csv, &subject, engine.pronouns(), store)?;
            println!(
                "Imported {} students into {}",
                subject.students.len(),
                subject.subject_name
            );
        }
        Command::List => {
            for name in store.list()? {
                println!("{}", name);
            }
        }
        Command::Students { subject } => {
            let subject = store.load(&subject)?;
            for (i, student) in subject.students.iter().enumerate() {
                println!("{:>3}. {} ({})", i + 1, student.full_name(), student.gender);
            }
        }
        Command::Delete { subject } => {
            store.delete(&subject)?;
            println!("Deleted {}", subject);
        }
        Command::Export { subject, output } => {
            if output.as_os_str() == "-" {
                println!("{}", render_report(&store.load(&subject)?));
            } else {
                export_reports(store, &subject, &output)?;
            }
        }
        Command::Intro { subject, text } => {
            let mut subject = store.load(&subject)?;
            subject.set_intro_comment(&text, engine.rules());
            store.save(&subject)?;
            println!("{}", subject.intro_comment);
        }
        Command::Bank { action } => run_bank(action, engine, store)?,
        Command::Comment {
            subject,
            student,
            text,
            from_bank,
        } => {
            let index = position(student, "student")?;
            let mut subject = store.load(&subject)?;
            let mut draft = match text {
                Some(text) => text,
                None => subject.student(index)?.comment.clone(),
            };
            for entry in from_bank {
                let entry = position(entry, "comment")?;
                append_to_draft(&mut draft, &subject.expanded_bank_comment(index, entry)?);
            }
            let comment = subject
                .set_student_comment(index, &draft, engine.rules())?
                .to_string();
            store.save(&subject)?;
            println!("{}", comment);
        }
        Command::Preview { subject, student } => {
            let index = position(student, "student")?;
            let preview = store.load(&subject)?.preview_for(index)?;
            println!("{}", preview.name);
            println!();
            println!("Intro: {}", preview.intro);
            println!();
            for (i, entry) in preview.bank.iter().enumerate() {
                println!("{:>3}. {}", i + 1, entry);
            }
            println!();
            println!("Comment: {}", preview.comment);
        }
        Command::Normalize { text } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut input = String::new();
                    io::stdin().read_to_string(&mut input)?;
                    input
                }
            };
            println!("{}", engine.normalize(&text));
        }
        Command::Expand { text, name, gender } => {
            println!("{}", engine.expand_for_gender(&text, &name, &gender));
        }
        Command::Placeholders => println!("{}", PLACEHOLDER_HELP),
    }
    Ok(())
}

fn run_bank(
    action: BankAction,
    engine: &Engine,
    store: &SubjectStore,
) -> Result<(), Box<dyn Error>> {
    match action {
        BankAction::List { subject } => {
            let subject = store.load(&subject)?;
            for (i, entry) in subject.comment_bank.iter().enumerate() {
                println!("{:>3}. {}", i + 1, entry);
            }
        }
        BankAction::Add { subject, text } => {
            let mut subject = store.load(&subject)?;
            let index = subject.add_bank_comment(&text, engine.rules());
            store.save(&subject)?;
            println!("{:>3}. {}", index + 1, subject.comment_bank[index]);
        }
        BankAction::Update {
            subject,
            entry,
            text,
        } => {
            let index = position(entry, "comment")?;
            let mut subject = store.load(&subject)?;
            subject.update_bank_comment(index, &text, engine.rules())?;
            store.save(&subject)?;
            println!("{:>3}. {}", entry, subject.comment_bank[index]);
        }
        BankAction::Remove { subject, entry } => {
            let index = position(entry, "comment")?;
            let mut subject = store.load(&subject)?;
            let removed = subject.remove_bank_comment(index)?;
            store.save(&subject)?;
            println!("Removed: {}", removed);
        }
        BankAction::CopyFrom { subject, source } => {
            let source = store.load(&source)?;
            let mut subject = store.load(&subject)?;
            subject.copy_comments_from(&source);
            store.save(&subject)?;
            println!(
                "Copied the intro and {} bank entries from {}",
                subject.comment_bank.len(),
                source.subject_name
            );
        }
    }
    Ok(())
}
