//! lectio - critical-edition to TEI compiler

use std::fs;
use std::process::ExitCode;

use clap::Parser;

use lectio::DocumentData;

#[derive(Parser)]
#[command(name = "lectio")]
#[command(version, about = "Compile a critical-edition document to TEI XML", long_about = None)]
#[command(after_help = "EXAMPLES:
    lectio edition.json edition.xml    Compile a document to TEI
    lectio edition.json                Compile and print to stdout")]
struct Cli {
    /// Input document (JSON)
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output file (defaults to stdout)
    #[arg(value_name = "OUTPUT")]
    output: Option<String>,

    /// Heading of the generated table of contents
    #[arg(short, long, default_value = "Table of contents")]
    title: String,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let raw = fs::read_to_string(&cli.input)
        .map_err(|e| format!("cannot read {}: {e}", cli.input))?;
    let document: DocumentData =
        serde_json::from_str(&raw).map_err(|e| format!("invalid document: {e}"))?;

    let xml = lectio::compile_tei(&cli.title, &document).map_err(|e| e.to_string())?;

    match &cli.output {
        Some(path) => {
            fs::write(path, &xml).map_err(|e| format!("cannot write {path}: {e}"))?;
        }
        None => print!("{xml}"),
    }
    Ok(())
}
