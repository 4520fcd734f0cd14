use crate::client::MnkyClient;
use crate::commands::shared::{OutputArgs, SourceArgs};
use crate::commands::validators;
use crate::core::error::MnkyError;
use clap::{Args, Subcommand};
use std::path::Path;

#[derive(Debug, Args)]
#[command(about = "Inspect configurations")]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    #[command(about = "List configurations")]
    List(ListArgs),
    #[command(about = "Show options, variables and problems of a configuration")]
    Show(ShowArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[arg(
        short = 'n',
        long = "name",
        help = "Name of the configuration",
        value_parser = validators::validate_name
    )]
    pub name: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub fn execute_list(args: &ListArgs) -> Result<(), MnkyError> {
    let configurations = MnkyClient::list_configurations(Path::new(&args.source.source))?;

    let formatter = crate::core::formatter::get_formatter(&args.output.output);
    print!(
        "{}",
        formatter.format_list(&configurations, "", "No configurations found")
    );
    Ok(())
}

pub fn execute_show(args: &ShowArgs) -> Result<(), MnkyError> {
    let details =
        MnkyClient::get_configuration_details(Path::new(&args.source.source), &args.name)?;
    for diagnostic in &details.diagnostics {
        tracing::warn!("{}:{}: {}", details.file, diagnostic.line, diagnostic.message);
    }

    let formatter = crate::core::formatter::get_formatter(&args.output.output);
    print!("{}", formatter.format(&details));
    Ok(())
}
