//! Configuration: the settings.json schema and CLI argument types

mod cli;
mod schema;

pub use cli::{Cli, Command, InfoArgs, RunArgs};
pub use schema::{Parameters, RunOptions, Settings};
