pub mod az_cli;
pub mod cloud;

pub use az_cli::AzCliClient;
pub use cloud::*;
