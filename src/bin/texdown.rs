//! TexDown CLI - Markdown-flavoured shorthand to LaTeX

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, Read, Write};
#[cfg(feature = "cli")]
use texdown::{convert_with_options, ConversionResult, TexDocument, TexDownOptions};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "texdown")]
#[command(version)]
#[command(about = "TexDown - convert TexDown markup to compilable LaTeX", long_about = None)]
struct Cli {
    /// Input file path (reads from stdin if not provided)
    input_file: Option<String>,

    /// Output file path (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<String>,

    /// Emit only the preamble
    #[arg(long, conflicts_with = "body_only")]
    header_only: bool,

    /// Emit only the document body
    #[arg(long)]
    body_only: bool,

    /// Print `{"header": .., "body": ..}` instead of LaTeX
    #[arg(long)]
    json: bool,

    /// Load conversion options from a JSON file
    #[arg(long, value_name = "OPTIONS.json")]
    config: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[cfg(feature = "cli")]
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

#[cfg(feature = "cli")]
fn read_input(path: Option<&str>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

#[cfg(feature = "cli")]
fn load_options(path: Option<&str>) -> ConversionResult<TexDownOptions> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)?;
            log::info!("loaded options from {}", path);
            TexDownOptions::from_json(&json)
        }
        None => Ok(TexDownOptions::default()),
    }
}

#[cfg(feature = "cli")]
fn render(cli: &Cli, doc: &TexDocument) -> ConversionResult<String> {
    if cli.json {
        return Ok(serde_json::to_string_pretty(doc)?);
    }
    Ok(if cli.header_only {
        doc.header.clone()
    } else if cli.body_only {
        doc.body.clone()
    } else {
        doc.to_latex()
    })
}

#[cfg(feature = "cli")]
fn run(cli: &Cli) -> ConversionResult<()> {
    let options = load_options(cli.config.as_deref())?;
    let input = read_input(cli.input_file.as_deref())?;
    let doc = convert_with_options(&input, &options)?;
    let result = render(cli, &doc)?;

    match cli.output.as_deref() {
        Some(path) => {
            let mut file = fs::File::create(path)?;
            write!(file, "{}", result)?;
            if !result.ends_with('\n') {
                writeln!(file)?;
            }
            eprintln!("✓ Output written to: {}", path);
        }
        None => {
            println!("{}", result.trim_end());
        }
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("texdown: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install texdown --features cli");
    eprintln!("  texdown [OPTIONS] [INPUT_FILE]");
}
