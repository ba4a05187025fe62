use serde_json::Value;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::FundingError;

/// Default location of the Rosetta configuration, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "rosetta-diem.json";

const ACCOUNTS_PATH: &str = "construction.prefunded_accounts";

/// Read the Rosetta config and return every `privkey` in file order
pub fn load_prefunded_keys<P: AsRef<Path>>(path: P) -> Result<Vec<String>, FundingError> {
    let path = path.as_ref();

    // The whole file is read and closed before anything is parsed
    let content = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => FundingError::ConfigNotFound {
            path: path.to_path_buf(),
        },
        _ => FundingError::ConfigRead {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let document: Value =
        serde_json::from_str(&content).map_err(|source| FundingError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

    extract_keys(&document).map_err(|reason| FundingError::ConfigShape {
        path: path.to_path_buf(),
        reason,
    })
}

fn extract_keys(document: &Value) -> Result<Vec<String>, String> {
    let construction = document
        .get("construction")
        .ok_or_else(|| "missing field `construction`".to_string())?;

    let accounts = construction
        .get("prefunded_accounts")
        .ok_or_else(|| format!("missing field `{}`", ACCOUNTS_PATH))?
        .as_array()
        .ok_or_else(|| format!("`{}` is not an array", ACCOUNTS_PATH))?;

    accounts
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let entry = entry
                .as_object()
                .ok_or_else(|| format!("`{}[{}]` is not an object", ACCOUNTS_PATH, i))?;

            match entry.get("privkey") {
                Some(Value::String(key)) => Ok(key.clone()),
                Some(_) => Err(format!("`{}[{}].privkey` is not a string", ACCOUNTS_PATH, i)),
                None => Err(format!("missing field `{}[{}].privkey`", ACCOUNTS_PATH, i)),
            }
        })
        .collect()
}
