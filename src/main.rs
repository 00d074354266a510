use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{ArgAction, Parser as ClapParser};
use jt_lang::cli::{self, CliError, ErrorPolicy, OutputMode, RunOptions, Runner};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "jt")]
#[command(about = "jt - filter lines of text with typed selection rules")]
#[command(version)]
struct Cli {
    /// Script given on the command line
    #[arg(short, long, value_name = "SCRIPT")]
    expression: Option<String>,

    /// Read the script from a file
    #[arg(short, long, value_name = "SCRIPT_FILE")]
    file: Option<PathBuf>,

    /// More logging on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only check that the script parses
    #[arg(long)]
    syntax_only: bool,

    /// Print a JSON line per input line naming the rules that matched
    #[arg(long)]
    report: bool,

    /// Report failing rules and continue instead of stopping
    #[arg(long)]
    keep_going: bool,

    /// The script (unless -e or -f is given), then input files; stdin when
    /// there are none
    #[arg(value_name = "ARGS")]
    args: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

/// `JT_LOG` takes an env-filter directive and overrides `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("JT_LOG").unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let (source, inputs) = cli::resolve_script(cli.expression, cli.file, cli.args)?;
    let script = source.load()?;
    let program = jt_lang::parse_program(&script)?;

    if cli.syntax_only {
        println!("Syntax is valid");
        return Ok(());
    }

    if inputs.is_empty() && atty::is(atty::Stream::Stdin) {
        return Err(CliError::NoInput);
    }

    let options = RunOptions {
        on_error: if cli.keep_going {
            ErrorPolicy::Continue
        } else {
            ErrorPolicy::Abort
        },
        mode: if cli.report {
            OutputMode::Report
        } else {
            OutputMode::Execute
        },
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let summary = Runner::new(&program, options).run(&inputs, &mut out)?;
    out.flush()?;
    tracing::info!(
        lines = summary.lines,
        matches = summary.matches,
        errors = summary.errors,
        "done"
    );

    if summary.unreadable > 0 {
        return Err(CliError::UnreadableInputs {
            count: summary.unreadable,
        });
    }
    Ok(())
}
