//! JSON I/O handling for CLI
//!
//! - Input: one JSON statement from a file or stdin
//! - Output: one JSON object on stdout
//! - UTF-8 only

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use serde::Serialize;

use super::errors::{CliError, CliResult};

/// Read the request text from `path`, or from stdin when `None`
pub fn read_request(path: Option<&Path>) -> CliResult<String> {
    let content = match path {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().lock().read_to_string(&mut buf)?;
            buf
        }
    };

    if content.trim().is_empty() {
        return Err(CliError::EmptyRequest("Empty input".into()));
    }
    Ok(content)
}

/// Write a response object to stdout
pub fn write_response<T: Serialize>(status: &str, data: &T) -> CliResult<()> {
    let response = serde_json::json!({
        "status": status,
        "data": data
    });

    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, &response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

/// Write plain text to stdout
pub fn write_text(text: &str) -> CliResult<()> {
    let mut stdout = io::stdout();
    write!(stdout, "{}", text)?;
    stdout.flush()?;

    Ok(())
}
