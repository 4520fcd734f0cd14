pub mod mnky_client;
pub mod mnky_client_models;
pub mod variables;

pub use mnky_client::MnkyClient;
pub use mnky_client_models::{
    ConfigurationDetails, ConfigurationInfo, FailureView, RunConfig, RunReport,
};
