pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Load a typed document from `--input <path>` or, failing that, from piped
/// stdin. `Ok(None)` means neither was supplied.
pub fn load<T: DeserializeOwned>(path: Option<&str>) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(file::read_document(path)?));
    }
    match stdin::read_stdin()? {
        Some(data) => Ok(Some(serde_json::from_value(data)?)),
        None => Ok(None),
    }
}
