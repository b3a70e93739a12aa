//! Command-line entry point: writes the proposal deck, or lists the slides
//! of an existing `.pptx` file.
//!
//! # Usage
//!
//! ```sh
//! proposal-deck                      # writes Cement_Demand_Forecasting_Strategic_Presentation.pptx
//! proposal-deck -o out/proposal.pptx
//! proposal-deck inspect Cement_Demand_Forecasting_Strategic_Presentation.pptx --check
//! ```

use clap::{Parser, Subcommand};
use proposal_deck::ooxml::pptx::PackageReader;
use proposal_deck::{DEFAULT_OUTPUT, Result, SUCCESS_MESSAGE, write_proposal};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Generate the demand-forecasting proposal slide deck
#[derive(Parser, Debug)]
#[command(
    name = "proposal-deck",
    about = "Generate the demand-forecasting proposal as a PowerPoint deck",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Output file for the generated deck
    #[arg(short, long, value_name = "OUTPUT", global = true, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the proposal deck (the default)
    Generate,
    /// List the slides of an existing .pptx file
    Inspect {
        /// Presentation to read
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Also check content types, relationships and XML well-formedness
        #[arg(long)]
        check: bool,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let stdout = std::io::stdout();
    match run(&args, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

fn run(args: &Args, out: &mut impl Write) -> Result<()> {
    match &args.command {
        None | Some(Command::Generate) => generate(&args.output, out),
        Some(Command::Inspect { file, check }) => inspect(file, *check, out),
    }
}

fn generate(output: &Path, out: &mut impl Write) -> Result<()> {
    write_proposal(output)?;
    log::debug!("saved to {}", output.display());
    writeln!(out, "{SUCCESS_MESSAGE}")?;
    Ok(())
}

fn inspect(file: &Path, check: bool, out: &mut impl Write) -> Result<()> {
    let mut reader = PackageReader::open(file)?;
    if check {
        reader.validate()?;
        log::info!("{} is a well-formed package", file.display());
    }

    for (index, slide) in reader.slides()?.iter().enumerate() {
        writeln!(out, "{:>3}  {:<18}  {}", index + 1, slide.layout_name, slide.title)?;
    }
    Ok(())
}
