pub mod commands;
mod subcommands;

pub use subcommands::{RuleCommands, TaskCommands, ValidateCommands};
