use crate::prelude::{CorrelationError, CorrelationResult, StreamKind};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Reads one input log fully into memory.
pub fn read_source<P: AsRef<Path>>(stream: StreamKind, path: P) -> CorrelationResult<String> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => CorrelationError::SourceNotFound {
            stream,
            path: path.to_path_buf(),
        },
        _ => CorrelationError::SourceUnreadable {
            stream,
            path: path.to_path_buf(),
            source,
        },
    })
}
