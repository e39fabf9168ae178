use std::{
    fs,
    path::{Path, PathBuf},
};

use log::debug;

use crate::{source::BytecodeSource, Result};

/// Hex bytecode stored in a text file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Source reading from `path`. Nothing is read until [`BytecodeSource::load`].
    pub fn new(path: impl AsRef<Path>) -> Self {
        FileSource {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BytecodeSource for FileSource {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    fn load(&self) -> Result<String> {
        let data = fs::read(&self.path)?;
        debug!("read {} bytes from {}", data.len(), self.path.display());

        Ok(String::from_utf8(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test::TempFile, Error};

    #[test]
    fn load_text() {
        let file = TempFile::new("load_text", b"0x6080604052\n");
        let source = FileSource::new(file.path());

        assert_eq!(source.load().unwrap(), "0x6080604052\n");
        assert_eq!(source.load_bytecode().unwrap().len(), 5);
    }

    #[test]
    fn missing_file() {
        let source = FileSource::new("/nonexistent/evmscope/bytecode.txt");
        assert!(matches!(source.load(), Err(Error::FileError(_))));
    }

    #[test]
    fn invalid_utf8() {
        let file = TempFile::new("invalid_utf8", &[0x30, 0x78, 0xff, 0xfe]);
        let source = FileSource::new(file.path());

        assert!(matches!(source.load(), Err(Error::Utf8(_))));
    }

    #[test]
    fn malformed_content() {
        let file = TempFile::new("malformed_content", b"6080");
        let source = FileSource::new(file.path());

        assert!(matches!(
            source.load_bytecode(),
            Err(Error::MalformedHex { .. })
        ));
    }

    #[test]
    fn describe() {
        assert_eq!(FileSource::new("code.txt").describe(), "file code.txt");
    }
}
