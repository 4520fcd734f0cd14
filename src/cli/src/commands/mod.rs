pub mod catalog;
pub mod config;
pub mod run;
pub mod shared;
pub mod validators;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    Config(config::ConfigCommand),
    #[command(name = "commands", about = "List the commands configurations can use")]
    Catalog(catalog::CatalogArgs),
    #[command(about = "Run configurations against a document")]
    Run(run::RunArgs),
}
