use crate::client::{MnkyClient, RunConfig};
use crate::commands::shared::{OutputArgs, SourceArgs};
use crate::commands::validators;
use crate::core::error::MnkyError;
use clap::Args;
use mnky_lib::monkey::{DEFAULT_UNDO_LIMIT, MIN_INTERVAL};

#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[arg(
        short = 'n',
        long = "name",
        help = "Only enable these configurations (default: all but templates)",
        value_parser = validators::validate_name
    )]
    pub names: Vec<String>,

    #[arg(
        short = 'd',
        long = "document",
        help = "JSON snapshot of the document to work on",
        value_parser = validators::validate_path_exists
    )]
    pub document: String,

    #[arg(long = "ticks", default_value_t = 1, help = "Number of intervals to run")]
    pub ticks: u32,

    #[arg(
        long = "interval",
        value_name = "MS",
        default_value_t = MIN_INTERVAL.as_millis() as u64,
        help = "Interval between ticks in milliseconds"
    )]
    pub interval: u64,

    #[arg(long = "no-undo", help = "Do not record undo information")]
    pub no_undo: bool,

    #[arg(
        long = "undo-limit",
        default_value_t = DEFAULT_UNDO_LIMIT,
        help = "Stop recording undo information past this many elements"
    )]
    pub undo_limit: usize,

    #[arg(long = "revert", help = "Stop the run at the end, reverting every change")]
    pub revert: bool,

    #[arg(
        short = 'v',
        long = "variable",
        value_name = "NAME=VALUE",
        help = "Override configuration variables",
        value_parser = validators::validate_variable
    )]
    pub variable: Vec<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub async fn execute_run(args: &RunArgs) -> Result<(), MnkyError> {
    let config = RunConfig {
        source_path: args.source.source.clone(),
        names: args.names.clone(),
        document_path: args.document.clone(),
        ticks: args.ticks,
        interval_ms: args.interval,
        with_undo: !args.no_undo,
        undo_limit: args.undo_limit,
        revert: args.revert,
        variables: args.variable.clone(),
    };

    let report = MnkyClient::new(config).run().await?;
    for failure in &report.failures {
        tracing::error!("{}: {}", failure.configuration, failure.message);
    }

    let formatter = crate::core::formatter::get_formatter(&args.output.output);
    print!("{}", formatter.format(&report));
    Ok(())
}
