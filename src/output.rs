//! Result output module
//!
//! Appends recovered plaintexts to a potfile as `hash:plaintext` lines.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Buffered appender for cracked hashes
pub struct PotfileWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    lines_written: u64,
}

impl PotfileWriter {
    /// Open `path` for appending, creating it and its parent directories if needed
    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            ensure_output_dir(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;

        Ok(Self {
            writer: BufWriter::new(file),
            path,
            lines_written: 0,
        })
    }

    /// Record one recovered plaintext
    pub fn write_result(&mut self, target_hex: &str, plaintext: &str) -> anyhow::Result<()> {
        writeln!(self.writer, "{}:{}", target_hex, plaintext)?;
        self.lines_written += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> anyhow::Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }
}

impl Drop for PotfileWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// Ensure output directory exists
pub fn ensure_output_dir(path: &Path) -> anyhow::Result<()> {
    if !path.as_os_str().is_empty() && !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_potfile_appends() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cracked.pot");

        {
            let mut writer = PotfileWriter::open(path.clone()).unwrap();
            writer.write_result("900150983cd24fb0d6963f7d28e17f72", "abc").unwrap();
            assert_eq!(writer.lines_written(), 1);
        }
        {
            let mut writer = PotfileWriter::open(path.clone()).unwrap();
            writer.write_result("c4ca4238a0b923820dcc509a6f75849b", "1").unwrap();
            writer.flush().unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "900150983cd24fb0d6963f7d28e17f72:abc\nc4ca4238a0b923820dcc509a6f75849b:1\n"
        );
    }

    #[test]
    fn test_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("out").join("cracked.pot");

        let writer = PotfileWriter::open(path.clone()).unwrap();
        assert_eq!(writer.path(), path.as_path());
        assert!(path.exists());
    }
}
