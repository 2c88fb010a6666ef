use alloc::{string::String, vec::Vec};

use embedded_io::{ErrorKind, ErrorType};

pub type Result<T> = core::result::Result<T, ErrorKind>;

const READ_CHUNK: usize = 512;
/// Upper bound on the capacity reserved from `File::size` before reading.
const SIZE_HINT_LIMIT: usize = 1 << 20;

pub trait File: embedded_io::Read {
    /// Reported size. Only a hint, the actual content may be shorter or longer.
    fn size(&self) -> usize;

    fn read_to_end(&mut self) -> core::result::Result<Vec<u8>, Self::Error> {
        let mut data = Vec::with_capacity(self.size().min(SIZE_HINT_LIMIT));
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            match self.read(&mut chunk)? {
                0 => break,
                n => data.extend_from_slice(&chunk[..n]),
            }
        }
        Ok(data)
    }
}

pub trait DirEntry {
    fn name(&self) -> &str;
    fn is_directory(&self) -> bool;
    fn size(&self) -> usize;
}

pub trait Directory: ErrorType<Error = ErrorKind> {
    type Entry: DirEntry;
    fn list(&self) -> Result<Vec<Self::Entry>>;
}

pub trait Filesystem: ErrorType<Error = ErrorKind> {
    type File: File;
    type Directory: Directory;

    fn open_file(&self, path: &str) -> Result<Self::File>;
    fn open_directory(&self, path: &str) -> Result<Self::Directory>;
    fn exists(&self, path: &str) -> Result<bool>;
    fn is_directory(&self, path: &str) -> Result<bool>;
}

/// Joins `name` onto `base` with exactly one `/` between them.
pub fn join(base: &str, name: &str) -> String {
    let base = base.trim_end_matches('/');
    let name = name.trim_start_matches('/');
    if base.is_empty() {
        return String::from(name);
    }
    let mut path = String::with_capacity(base.len() + name.len() + 1);
    path.push_str(base);
    path.push('/');
    path.push_str(name);
    path
}
