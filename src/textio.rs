use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::error::DockingError;

/// Returns true when the path ends in `.gz`.
pub fn is_gzip(path: &Path) -> bool {
    path.extension().map(|ext| ext == "gz").unwrap_or(false)
}

/// Opens a text file for line-oriented reading. If the file ends with ".gz",
/// it is wrapped in a MultiGzDecoder.
///
/// A missing file is reported as `ErrorKind::NotFound` inside `DockingError::Io`
/// so callers can decide whether that is fatal.
pub fn open_text(path: &Path) -> Result<Box<dyn BufRead>, DockingError> {
    let f = File::open(path).map_err(|e| DockingError::io(path, e))?;

    let reader: Box<dyn BufRead> = if is_gzip(path) {
        Box::new(BufReader::new(MultiGzDecoder::new(f)))
    } else {
        Box::new(BufReader::new(f))
    };
    Ok(reader)
}

/// Reads a whole (possibly gzipped) text file into memory.
pub fn read_text(path: &Path) -> Result<String, DockingError> {
    let mut reader = open_text(path)?;
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| DockingError::io(path, e))?;
    Ok(text)
}

/// True when the error is an I/O "not found".
pub fn is_not_found(err: &DockingError) -> bool {
    matches!(err, DockingError::Io { source, .. } if source.kind() == ErrorKind::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn reads_plain_and_gzipped_text() {
        let dir = tempfile::tempdir().unwrap();

        let plain = dir.path().join("log.txt");
        std::fs::write(&plain, "hello\nworld\n").unwrap();
        assert_eq!(read_text(&plain).unwrap(), "hello\nworld\n");

        let gz = dir.path().join("log.txt.gz");
        let mut enc = GzEncoder::new(File::create(&gz).unwrap(), Compression::default());
        enc.write_all(b"compressed\n").unwrap();
        enc.finish().unwrap();
        assert_eq!(read_text(&gz).unwrap(), "compressed\n");
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = open_text(Path::new("/definitely/not/here.log")).err().unwrap();
        assert!(is_not_found(&err));
    }
}
