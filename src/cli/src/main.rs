use clap::{CommandFactory, Parser};

mod client;
mod commands;
mod core;

use commands::Commands;
use core::error::MnkyError;
use core::exit_code::ExitCode;

#[derive(Parser)]
#[command(name = "mnky")]
#[command(about = "Runs Monkey configurations against a document snapshot.")]
#[command(version)]
struct Args {
    #[arg(short = 'D', long, help = "Enable debug logging", global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        let exit_code = ExitCode::from(&e);
        std::process::exit(exit_code.code());
    }
}

async fn run() -> Result<(), MnkyError> {
    let args = Args::parse();
    crate::core::logger::Logger::init(args.debug);

    match args.command {
        Some(Commands::Config(config_command)) => match config_command.command {
            commands::config::ConfigSubcommand::List(list_args) => {
                commands::config::execute_list(&list_args)
            }
            commands::config::ConfigSubcommand::Show(show_args) => {
                commands::config::execute_show(&show_args)
            }
        },
        Some(Commands::Catalog(catalog_args)) => commands::catalog::execute(&catalog_args),
        Some(Commands::Run(run_args)) => commands::run::execute_run(&run_args).await,
        None => {
            Args::command().print_help()?;
            println!();
            Ok(())
        }
    }
}
