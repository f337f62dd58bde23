use anyhow::Context;
use anyhow::Result;
use bril::opt::default_arguments;
use bril::opt::init_subscriber;
use bril::opt::parse_and_verify;
use bril::opt::VerifyOptions;
use clap::ArgMatches;
use clap::Args;
use clap::Command;
use std::io::Read;
use tracing::debug;

/// Parse and verify Bril dialect IR
#[derive(Args, Debug)]
#[command(version, about)]
struct BrilOptArgs {
    /// The input file (- is interpreted as stdin)
    #[arg(default_value = "-")]
    input: String,
    /// Print debug logs
    #[arg(long)]
    debug: bool,
}

fn cli() -> Command {
    let cli = Command::new("bril-opt").args(default_arguments());
    BrilOptArgs::augment_args(cli)
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {input}"))
    }
}

fn run(matches: &ArgMatches, input_text: &str) -> Result<String> {
    let options = VerifyOptions::from_matches(matches);
    debug!("Running with {options:?}");
    parse_and_verify(input_text, &options)
}

fn main() {
    let matches = cli().get_matches();
    if matches.get_flag("debug") {
        let _ = init_subscriber(tracing::Level::DEBUG);
    }
    let input = matches
        .get_one::<String>("input")
        .map(String::as_str)
        .unwrap_or("-");
    let result = read_input(input).and_then(|text| run(&matches, &text));
    match result {
        Ok(printed) => println!("{printed}"),
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(1);
        }
    }
}
