#![deny(clippy::all, clippy::pedantic)]

use std::fs;
use std::path::PathBuf;

use crate::client::CliError;

/// Text given either inline (`--<field>`) or as a file (`--<field>-file`).
/// The file wins when both are present.
pub fn read_text(
    field: &'static str,
    inline: Option<String>,
    file: Option<PathBuf>,
) -> Result<String, CliError> {
    match (file, inline) {
        (Some(path), _) => fs::read_to_string(&path).map_err(|source| CliError::InputFile {
            path: path.display().to_string(),
            source,
        }),
        (None, Some(text)) => Ok(text),
        (None, None) => Err(CliError::InvalidInput(format!(
            "{field} required (use --{field} or --{field}-file)"
        ))),
    }
}
