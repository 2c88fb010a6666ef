use std::{fs, io::Seek, path::PathBuf};

use embedded_io::{ErrorKind, ErrorType};
use log::{debug, info, warn};
use pwnface_core::fs::DirEntry;

type Result<T> = core::result::Result<T, ErrorKind>;

fn kind(err: std::io::Error) -> ErrorKind {
    embedded_io::Error::kind(&err)
}

/// Host filesystem rooted at `base_path`. Absolute paths replace the base.
pub struct StdFilesystem {
    base_path: PathBuf,
}

impl StdFilesystem {
    pub fn new_with_base_path(base_path: PathBuf) -> Self {
        info!("Using StdFilesystem with base path: {:?}", base_path);
        StdFilesystem { base_path }
    }
}

impl Default for StdFilesystem {
    fn default() -> Self {
        Self::new_with_base_path(PathBuf::from("."))
    }
}

impl ErrorType for StdFilesystem {
    type Error = ErrorKind;
}

impl pwnface_core::fs::Filesystem for StdFilesystem {
    type File = StdFileReader;
    type Directory = StdDirectory;

    fn open_file(&self, path: &str) -> Result<StdFileReader> {
        let path = self.base_path.join(path);
        debug!("Opening file at path: {:?}", path);
        if fs::metadata(&path).map_err(kind)?.is_dir() {
            return Err(ErrorKind::Unsupported);
        }
        let file = fs::File::open(&path).map_err(kind)?;
        StdFileReader::new(file).map_err(kind)
    }

    fn open_directory(&self, path: &str) -> Result<StdDirectory> {
        let path = self.base_path.join(path);
        debug!("Opening directory at path: {:?}", path);
        if !path.is_dir() {
            return Err(ErrorKind::NotFound);
        }
        Ok(StdDirectory { path })
    }

    fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.base_path.join(path).exists())
    }

    fn is_directory(&self, path: &str) -> Result<bool> {
        Ok(self.base_path.join(path).is_dir())
    }
}

pub struct StdFileReader {
    file: std::io::BufReader<fs::File>,
    size: usize,
}

impl StdFileReader {
    pub fn new(mut file: fs::File) -> std::io::Result<Self> {
        let size = file.seek(std::io::SeekFrom::End(0))? as usize;
        file.seek(std::io::SeekFrom::Start(0))?;
        Ok(StdFileReader {
            file: std::io::BufReader::new(file),
            size,
        })
    }
}

impl pwnface_core::fs::File for StdFileReader {
    fn size(&self) -> usize {
        self.size
    }
}

impl ErrorType for StdFileReader {
    type Error = std::io::Error;
}

impl embedded_io::Read for StdFileReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        use std::io::Read;
        self.file.read(buf)
    }
}

pub struct StdDirectory {
    pub path: PathBuf,
}

impl ErrorType for StdDirectory {
    type Error = ErrorKind;
}

impl pwnface_core::fs::Directory for StdDirectory {
    type Entry = StdDirEntry;

    fn list(&self) -> Result<Vec<Self::Entry>> {
        let mut result = Vec::new();
        for entry in fs::read_dir(&self.path).map_err(kind)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("Skipping unreadable entry in {:?}: {}", self.path, err);
                    continue;
                }
            };
            // Follows symlinks so linked theme directories count as directories.
            let metadata = match fs::metadata(entry.path()) {
                Ok(metadata) => metadata,
                Err(err) => {
                    debug!("Skipping {:?}: {}", entry.path(), err);
                    continue;
                }
            };
            result.push(StdDirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                size: metadata.len() as usize,
                is_directory: metadata.is_dir(),
            });
        }
        Ok(result)
    }
}

pub struct StdDirEntry {
    name: String,
    size: usize,
    is_directory: bool,
}

impl DirEntry for StdDirEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_directory(&self) -> bool {
        self.is_directory
    }

    fn size(&self) -> usize {
        self.size
    }
}
