use clap::{ArgAction, CommandFactory, Parser};
use dectape_cli::{commands, exit_code, resolve_mode, CliError, Mode, Options};
use dectape_core::constants::DEFAULT_TAPE_LABEL;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "dectape")]
#[command(about = "Read and write RT-11 DECtape container images", long_about = None)]
#[command(disable_version_flag = true)]
#[command(after_help = "\
To list the file directory of a tape, use
    dectape tapefile

To copy the tape files to a directory, use
    dectape tapefile directory

To copy a directory to a tape file, use
    dectape directory tapefile")]
struct Cli {
    /// Verbosity level (repeat to increase it)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Overwrite existing files
    #[arg(short = 'o', long, overrides_with = "no_overwrite")]
    overwrite: bool,

    /// Do not overwrite existing files (the default)
    #[arg(short = 'n', long, overrides_with = "overwrite")]
    no_overwrite: bool,

    /// Do not prompt before overwriting files
    #[arg(short, long)]
    quiet: bool,

    /// Validate the tape rather than printing the directory
    #[arg(short = 'V', long)]
    validate: bool,

    /// Append to the tape rather than overwriting it
    /// (this can put duplicate file names on the tape)
    #[arg(short = 'A', long)]
    append: bool,

    /// Initialize a new tape file
    #[arg(short = 'I', long)]
    initialize: bool,

    /// Size of a new tape file in MB
    #[arg(short = 'S', long, default_value_t = 32, value_parser = clap::value_parser!(u64).range(1..=4096))]
    size: u64,

    /// Label of a new tape file
    #[arg(short = 'L', long, default_value = DEFAULT_TAPE_LABEL)]
    label: String,

    /// Print the directory as JSON
    #[arg(long)]
    json: bool,

    /// Tape file, or the source directory when writing a tape
    first: PathBuf,

    /// Output directory when extracting, or the tape file when writing
    second: Option<PathBuf>,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            process::exit(code);
        }
    };

    // Setup logging
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let options = Options {
        overwrite: cli.overwrite && !cli.no_overwrite,
        prompt: !cli.quiet,
        json: cli.json,
        append: cli.append,
        size_mb: cli.size,
        label: cli.label,
    };

    let result = resolve_mode(cli.first, cli.second, cli.initialize, cli.validate)
        .map_err(anyhow::Error::from)
        .and_then(|mode| match mode {
            Mode::List(tape) => commands::list::execute(&tape, options.json),
            Mode::Validate(tape) => commands::validate::execute(&tape),
            Mode::Extract { tape, dir } => commands::extract::execute(&tape, &dir, &options),
            Mode::Write { dir, tape } => commands::write::execute(&dir, &tape, &options),
            Mode::Initialize(tape) => commands::init::execute(&tape, &options),
        });

    match result {
        Ok(outcome) => process::exit(outcome.code()),
        Err(err) => {
            eprintln!("Error: {err:#}");
            if matches!(err.downcast_ref::<CliError>(), Some(CliError::Usage(_))) {
                eprintln!("{}", Cli::command().render_usage());
            }
            process::exit(exit_code(&err));
        }
    }
}
