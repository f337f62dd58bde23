//! Entry points for drivers such as `bril-opt`.

use crate::ir::Op;
use crate::parser::DefaultParserDispatch;
use crate::parser::Parser;
use crate::shared::Shared;
use crate::shared::SharedExt;
use crate::verify::verify_or_error;
use crate::verify::VerifyConfig;
use anyhow::Result;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use tracing::info;
use tracing::subscriber::SetGlobalDefaultError;
use tracing::Level;

/// Install a global `tracing` subscriber that logs at `level` and above.
///
/// Fails if a subscriber was already set, which happens when tests run
/// concurrently.
pub fn init_subscriber(level: Level) -> Result<(), SetGlobalDefaultError> {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .with_test_writer()
        .without_time()
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
}

/// Default arguments that are available in drivers built on this crate.
///
/// `--debug` is not included to allow downstream projects to handle the
/// logging differently.
pub fn default_arguments() -> Vec<Arg> {
    vec![
        Arg::new("no-verify")
            .long("no-verify")
            .help("Skip the verification of the parsed IR")
            .action(ArgAction::SetTrue),
        Arg::new("max-diagnostics")
            .long("max-diagnostics")
            .value_name("N")
            .help("Stop after N verification errors (0 means no limit)")
            .value_parser(clap::value_parser!(usize))
            .default_value("0"),
    ]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VerifyOptions {
    pub verify: bool,
    pub config: VerifyConfig,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            verify: true,
            config: VerifyConfig::default(),
        }
    }
}

impl VerifyOptions {
    /// Read the options from matches of a command that includes
    /// [default_arguments].
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let verify = !matches.get_flag("no-verify");
        let max_diagnostics = matches
            .get_one::<usize>("max-diagnostics")
            .copied()
            .unwrap_or_default();
        Self {
            verify,
            config: VerifyConfig::new(max_diagnostics),
        }
    }
}

/// Parse `src` and verify the result.
pub fn parse(src: &str, options: &VerifyOptions) -> Result<Shared<dyn Op>> {
    let module = Parser::<DefaultParserDispatch>::parse(src)?;
    if options.verify {
        verify_or_error(&*module.rd(), &options.config, src)?;
        info!("Verification succeeded");
    }
    Ok(module)
}

/// Parse `src`, verify it unless disabled, and return the printed IR.
pub fn parse_and_verify(src: &str, options: &VerifyOptions) -> Result<String> {
    let module = parse(src, options)?;
    let printed = module.rd().to_string();
    Ok(printed)
}
