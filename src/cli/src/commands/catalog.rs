use crate::commands::shared::OutputArgs;
use crate::core::error::MnkyError;
use clap::Args;

#[derive(Debug, Args)]
pub struct CatalogArgs {
    #[arg(long = "deprecated", help = "Include deprecated commands")]
    pub deprecated: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

pub fn execute(args: &CatalogArgs) -> Result<(), MnkyError> {
    let commands: Vec<_> = mnky_lib::commands::registry::describe()
        .into_iter()
        .filter(|info| args.deprecated || !info.deprecated)
        .collect();

    let formatter = crate::core::formatter::get_formatter(&args.output.output);
    print!(
        "{}",
        formatter.format_list(&commands, "Available commands:", "No commands registered")
    );
    Ok(())
}
