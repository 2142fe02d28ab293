//! CLI module for dmlsem
//!
//! Provides command-line interface for:
//! - explain: Analyze one statement and print its plan
//! - check: Validate a catalog and configuration

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    check, explain, explain_request, load_catalog, load_config, run, run_command, AssignmentRequest,
    BindingRequest, ExplainReport, StatementRequest,
};
pub use errors::{CliError, CliResult};
pub use io::{read_request, write_response, write_text};
