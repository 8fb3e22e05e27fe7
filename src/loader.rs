use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use crate::error::LoadError;

/// Read the whole program file at `path` into one buffer.
///
/// Directories and missing paths are reported as distinct errors.
pub fn load_program(path: impl AsRef<Path>) -> Result<Vec<u8>, LoadError> {
    let path = path.as_ref();
    let io_err = |source: io::Error| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(LoadError::NotFound { path: path.to_path_buf() });
        }
        Err(e) => return Err(io_err(e)),
    };
    if metadata.is_dir() {
        return Err(LoadError::IsDirectory { path: path.to_path_buf() });
    }

    let mut file = File::open(path).map_err(io_err)?;
    let mut buffer = Vec::with_capacity(usize::try_from(metadata.len()).unwrap_or(0));
    file.read_to_end(&mut buffer).map_err(io_err)?;
    tracing::debug!(path = %path.display(), bytes = buffer.len(), "loaded program");
    Ok(buffer)
}
