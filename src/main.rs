use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use livespell::cli::output::{self, OutputFormat};
use livespell::{cli, Config, Dictionary, EngineOptions, MemoryHost, SpellCheckEngine, TokenizerPolicy};
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "livespell")]
#[command(version, about = "Spell-check files the way an editor would annotate them", long_about = None)]
struct Cli {
    /// Files to check
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Dictionary file: a compiled FST set (.dict/.fst) or a word list
    #[arg(short, long, env = "LIVESPELL_DICTIONARY")]
    dictionary: Option<PathBuf>,

    /// Personal dictionary file
    #[arg(long)]
    personal_dict: Option<PathBuf>,

    /// Pattern to ignore (regex)
    #[arg(long)]
    ignore_pattern: Vec<String>,

    /// Tokenizer policy (scan, split)
    #[arg(short, long)]
    tokenizer: Option<TokenizerPolicy>,

    /// Output format (text, json)
    #[arg(short = 'o', long, default_value = "text")]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Exit with code 0 even if errors are found
    #[arg(long)]
    no_fail: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print suggestions for a word
    Suggest {
        /// Word to look up
        word: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "livespell", &mut io::stdout());
        return Ok(());
    }

    let config = apply_overrides(Config::load()?, &cli);
    let dictionary: Rc<dyn Dictionary> = Rc::new(cli::load_dictionary(&config)?);

    let options = EngineOptions::from(&config);

    if let Some(Commands::Suggest { word }) = &cli.command {
        // a detached engine: no document, only the dictionary
        let engine = SpellCheckEngine::new(MemoryHost::new(""), Rc::clone(&dictionary), options)?;
        match engine.suggest(word) {
            Some(suggestions) => suggestions.iter().for_each(|s| println!("{}", s)),
            None if dictionary.check(word) => println!("{} is spelled correctly", word),
            None => println!("No suggestions for {}", word),
        }
        return Ok(());
    }

    if cli.files.is_empty() {
        anyhow::bail!("No files specified. Use --help for usage information.");
    }

    let colored = !cli.no_color;
    let mut reports = Vec::new();

    for file_path in &cli.files {
        if !file_path.exists() {
            eprintln!("Error: File not found: {}", file_path.display());
            continue;
        }

        let result = cli::check_file(file_path, Rc::clone(&dictionary), &options)?;
        if cli.format == OutputFormat::Text {
            output::print_text_errors(file_path, &result, colored);
        }
        reports.push((file_path.clone(), result));
    }

    let total_errors: usize = reports.iter().map(|(_, r)| r.error_count).sum();
    match cli.format {
        OutputFormat::Text => output::print_check_summary(total_errors, &cli.files, colored),
        OutputFormat::Json => println!("{}", output::render_json(&reports)?),
    }

    if total_errors > 0 && !cli.no_fail {
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn apply_overrides(mut config: Config, cli: &Cli) -> Config {
    if let Some(dictionary) = &cli.dictionary {
        config.dictionary = Some(dictionary.clone());
    }
    if let Some(personal) = &cli.personal_dict {
        config.personal_dictionary = Some(personal.clone());
    }
    if let Some(tokenizer) = cli.tokenizer {
        config.tokenizer = Some(tokenizer);
    }
    if !cli.ignore_pattern.is_empty() {
        config
            .ignore_patterns
            .get_or_insert_with(Vec::new)
            .extend(cli.ignore_pattern.iter().cloned());
    }
    config
}
