//! Byte sources: the capability interface strategies read through.
//!
//! A strategy only needs three things from the benchmarked file: a cursor-based
//! sequential read, a positioned read, and a read-only view of the whole file.
//! [`BenchFile`] provides them over an open `std::fs::File`.

use memmap2::Mmap;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::ops::Deref;
use std::path::{Path, PathBuf};

use crate::error::{BenchError, Result};

/// Capability interface over the bytes being benchmarked.
pub trait ByteSource {
    /// Whole-file view returned by [`ByteSource::map_whole`]. Released on drop.
    type View: Deref<Target = [u8]>;

    /// Total length in bytes.
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Move the sequential cursor back to the start.
    fn rewind(&mut self) -> io::Result<()>;

    /// Read the next bytes after the cursor into `buf`. Returns 0 at end of file.
    fn read_sequential(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Read up to `buf.len()` bytes starting at `offset`. Fewer bytes are returned
    /// only when end of file is reached.
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize>;

    /// Obtain a read-only view of the whole file, `len()` bytes long.
    fn map_whole(&self) -> Result<Self::View>;
}

/// Read-only view of a whole file. Empty files are not mapped.
pub struct MappedView {
    map: Option<Mmap>,
}

impl Deref for MappedView {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match &self.map {
            Some(map) => &map[..],
            None => &[],
        }
    }
}

/// The benchmarked file: an open read-only handle plus its length.
pub struct BenchFile {
    file: File,
    len: u64,
    path: PathBuf,
}

impl BenchFile {
    /// Open `path` read-only and record its size.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::options()
            .read(true)
            .open(path)
            .map_err(|source| BenchError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        let len = file
            .metadata()
            .map_err(|source| BenchError::Metadata {
                path: path.to_path_buf(),
                source,
            })?
            .len();
        tracing::debug!(path = %path.display(), len, "opened input file");
        Ok(BenchFile {
            file,
            len,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for BenchFile {
    type View = MappedView;

    fn len(&self) -> u64 {
        self.len
    }

    fn rewind(&mut self) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(0))?;
        Ok(())
    }

    fn read_sequential(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            match self.file.read(buf) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => return other,
            }
        }
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        self.file.seek(SeekFrom::Start(offset))?;
        let mut filled = 0;
        while filled < buf.len() {
            match self.file.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }

    fn map_whole(&self) -> Result<MappedView> {
        if self.len == 0 {
            return Ok(MappedView { map: None });
        }
        // SAFETY: the file is opened read-only and is not modified while the view lives.
        let map = unsafe { Mmap::map(&self.file) }.map_err(|source| BenchError::Map {
            len: self.len,
            source,
        })?;
        Ok(MappedView { map: Some(map) })
    }
}
