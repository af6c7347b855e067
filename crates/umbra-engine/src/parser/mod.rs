//! Command parsing and object resolution.

mod command;
mod resolver;

pub use command::{Command, parse_command};
pub use resolver::{strip_fillers, suggest_object};
