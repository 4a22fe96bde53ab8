//! Whole-file reading into allocator-backed strings

use std::fs::File;
use std::io::Read;
use std::path::Path;

#[cfg(feature = "logging")]
use tracing::debug;

use crate::allocator::{Allocator, HeapAllocator};
use crate::collections::{AllocString, Vector};
use crate::error::{MemoryError, MemoryResult};

/// Read chunk size for staging
const CHUNK: usize = 8 * 1024;

/// Reads the whole file at `path` into `output`, allocated on `allocator`
///
/// The bytes are staged in a heap-backed vector first. On any failure (open,
/// read, allocation, or non-UTF-8 content) `output` is left untouched and the
/// staging buffer and file handle are released before returning.
///
/// # Examples
/// ```no_run
/// use memkit::allocator::Arena;
/// use memkit::collections::AllocString;
///
/// let arena = Arena::new();
/// let mut config = AllocString::empty();
/// memkit::io::read_entire_file(&arena, &mut config, "app.toml")?;
/// println!("{config}");
/// # Ok::<(), memkit::MemoryError>(())
/// ```
pub fn read_entire_file<'a>(
    allocator: &'a dyn Allocator,
    output: &mut AllocString<'a>,
    path: impl AsRef<Path>,
) -> MemoryResult<()> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|err| MemoryError::io(path, err))?;

    let heap = HeapAllocator::new();
    let mut staging: Vector<'_, u8> = Vector::new(&heap);
    if let Ok(metadata) = file.metadata() {
        let hint = usize::try_from(metadata.len()).unwrap_or(0);
        if hint > 0 {
            staging.reserve(hint)?;
        }
    }

    let mut chunk = [0u8; CHUNK];
    loop {
        let read = match file.read(&mut chunk) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(MemoryError::io(path, err)),
        };
        staging.append_many(&chunk[..read])?;
    }

    let text = std::str::from_utf8(staging.as_slice()).map_err(|_| MemoryError::invalid_utf8(path))?;
    let contents = AllocString::try_new(allocator, text)?;

    #[cfg(feature = "logging")]
    debug!(path = %path.display(), bytes = contents.len(), "read file");

    *output = contents;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::{Arena, FixedArena};
    use std::io::Write;

    #[test]
    fn reads_whole_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "line one\nline two\n").unwrap();

        let arena = Arena::new();
        let mut out = AllocString::empty();
        read_entire_file(&arena, &mut out, file.path()).unwrap();
        assert_eq!(out, "line one\nline two\n");
    }

    #[test]
    fn missing_file_leaves_output() {
        let arena = Arena::new();
        let mut out = AllocString::new(&arena, "previous");
        let dir = tempfile::tempdir().unwrap();
        let err = read_entire_file(&arena, &mut out, dir.path().join("missing.txt")).unwrap_err();
        assert_eq!(err.code(), "MEM:IO:READ");
        assert_eq!(out, "previous");
    }

    #[test]
    fn exhausted_allocator_leaves_output() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[b'x'; 256]).unwrap();

        let fixed = FixedArena::new(4).unwrap();
        let mut out = AllocString::empty();
        let err = read_entire_file(&fixed, &mut out, file.path()).unwrap_err();
        assert!(err.is_exhaustion());
        assert!(out.is_null());
    }
}
