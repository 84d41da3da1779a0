use std::fs;

use anyhow::{Error, Result};

pub fn get(path: &str) -> Result<String> {
    if fs::metadata(path).is_err() {
        return Err(Error::msg(format!(
            "Config file '{path}' does not exist; pass --config or set JOGO_CONFIG_PATH"
        )));
    }

    Ok(path.to_owned())
}
