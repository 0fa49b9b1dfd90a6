use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Deserialize; a failure message starts with the JSON path it happened at.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> std::result::Result<T, String> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize(de).map_err(|err| {
        let path = err.path().to_string();
        format!("at JSON path {path}: {}", err.into_inner())
    })
}

/// Read and deserialize a JSON file; failures name the file and the JSON path.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let source = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    from_str_with_path(&source).map_err(|message| Error::Description {
        path: path.to_path_buf(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn error_names_the_json_path() {
        let err = from_str_with_path::<BTreeMap<String, Vec<u32>>>(r#"{"a": [1, "x"]}"#).unwrap_err();
        assert!(err.starts_with("at JSON path a[1]"), "{err}");
    }
}
