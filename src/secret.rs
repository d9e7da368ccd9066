//! Upload credential loading.

use crate::error::{ConfigurationError, Result};
use std::fmt;
use std::path::Path;

/// Upload token read from the secret file
///
/// `Debug` and `Display` never reveal the value.
#[derive(Clone)]
pub struct UploadToken(String);

impl UploadToken {
    /// Raw token value, for handing to the upload tool
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for UploadToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UploadToken(***)")
    }
}

impl fmt::Display for UploadToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Read the upload token, trimming surrounding whitespace
pub fn load_token(path: &Path) -> Result<UploadToken> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigurationError::MissingSecret {
                path: path.to_path_buf(),
            }
            .into());
        }
        Err(e) => return Err(e.into()),
    };

    let token = content.trim();
    if token.is_empty() {
        return Err(ConfigurationError::EmptySecret {
            path: path.to_path_buf(),
        }
        .into());
    }

    log::debug!("Loaded upload token from {}", path.display());
    Ok(UploadToken(token.to_string()))
}
