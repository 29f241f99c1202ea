pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Input struct from `--input <file.json>`, else from piped stdin, else
/// `None` so the command builds it from flags and defaults.
pub fn load<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(file::read_json(path)?));
    }
    match stdin::read_stdin()? {
        Some(data) => Ok(Some(serde_json::from_value(data)?)),
        None => Ok(None),
    }
}
