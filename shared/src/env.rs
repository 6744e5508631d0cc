use std::path::PathBuf;

use tracing::debug;

use crate::errors::SharedError;

/// Loads `.env` from the current directory or its parents, if there is one.
///
/// A missing file is not an error; a malformed one is.
pub fn load_dotenv() -> Result<Option<PathBuf>, SharedError> {
    match dotenvy::dotenv() {
        Ok(path) => {
            debug!("loaded environment from {}", path.display());
            Ok(Some(path))
        }
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(err.into()),
    }
}
