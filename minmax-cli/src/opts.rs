use std::fmt::Display;
use std::fs::{File, OpenOptions};
use std::io;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use log::info;

const STDIO_PATH: &str = "-";

/// Default output file used by the `-o` flag.
pub const DEFAULT_OUTPUT_FILE: &str = "output.txt";

#[derive(Debug, Clone)]
pub struct InputFile {
    path: PathBuf,
}

impl Display for InputFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

pub fn input_file(path: &str) -> Result<InputFile, String> {
    let result = InputFile {
        path: PathBuf::from(path),
    };

    Ok(result)
}

impl InputFile {
    pub fn as_reader(&self) -> anyhow::Result<InputReader> {
        if !self.path.is_file() {
            bail!("File not found: {}", self.path.display());
        }

        InputReader::from_path(&self.path)
    }
}

pub fn input_stream(path: &str) -> Result<InputStream, String> {
    let result = InputStream {
        path: PathBuf::from(path),
    };

    Ok(result)
}

#[derive(Debug, Clone)]
pub struct InputStream {
    path: PathBuf,
}

impl Display for InputStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl InputStream {
    pub fn as_reader(&self) -> anyhow::Result<InputReader> {
        let is_stdin = self.path.to_string_lossy() == STDIO_PATH;
        if !is_stdin && !self.path.is_file() {
            bail!("File not found: {}", self.path.display());
        }

        InputReader::from_path(&self.path)
    }
}

#[derive(Debug)]
pub enum InputReader {
    Stdin(io::Stdin),
    File(File),
}

impl InputReader {
    fn from_path(path: &Path) -> anyhow::Result<Self> {
        let is_stdin = path.to_string_lossy() == STDIO_PATH;

        let val = if is_stdin {
            Self::Stdin(io::stdin())
        } else {
            let file = File::open(path)
                .with_context(|| format!("Could not open {}", path.display()))?;
            Self::File(file)
        };
        Ok(val)
    }

    #[must_use]
    pub fn into_read(self) -> Box<dyn Read + Send> {
        match self {
            InputReader::Stdin(stdin) => Box::new(stdin),
            InputReader::File(file) => Box::new(file),
        }
    }

    #[must_use]
    pub fn into_buf_read(self) -> Box<dyn BufRead + Send> {
        Box::new(BufReader::new(self.into_read()))
    }
}

/// How to treat the existing content of an output file.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum WriteMode {
    Append,
    Replace,
}

#[derive(Debug)]
pub enum OutputWriter {
    Stdout(io::Stdout),
    File { file: File, path: PathBuf },
}

impl OutputWriter {
    pub fn from_path(output: Option<&Path>, mode: WriteMode) -> anyhow::Result<Self> {
        let path = match output {
            Some(path) if path.to_string_lossy() != STDIO_PATH => path,
            _ => return Ok(Self::Stdout(io::stdout())),
        };

        info!("Output file: {}", path.display());
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(mode == WriteMode::Append)
            .truncate(mode == WriteMode::Replace)
            .open(path)
            .with_context(|| format!("Could not open output file {}", path.display()))?;

        Ok(Self::File {
            file,
            path: path.to_owned(),
        })
    }

    pub fn file_path(&self) -> Option<&Path> {
        match self {
            OutputWriter::Stdout(_) => None,
            OutputWriter::File { path, .. } => Some(path),
        }
    }

    pub fn into_write(self) -> Box<dyn Write + Send> {
        match self {
            OutputWriter::Stdout(stdout) => Box::new(stdout),
            OutputWriter::File { file, .. } => Box::new(file),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::{Read, Write};
    use std::path::Path;

    use crate::opts::{input_file, input_stream, OutputWriter, WriteMode};

    fn write_to(path: &Path, mode: WriteMode, contents: &str) {
        let mut writer = OutputWriter::from_path(Some(path), mode)
            .unwrap()
            .into_write();
        writer.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn output_file_is_appended_to() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.txt");

        write_to(&path, WriteMode::Append, "first\n");
        write_to(&path, WriteMode::Append, "second\n");

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn output_file_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.txt");

        write_to(&path, WriteMode::Append, "first\n");
        write_to(&path, WriteMode::Replace, "second\n");

        assert_eq!(fs::read_to_string(&path).unwrap(), "second\n");
    }

    #[test]
    fn missing_output_is_stdout() {
        let writer = OutputWriter::from_path(None, WriteMode::Replace).unwrap();
        assert!(writer.file_path().is_none());

        let writer = OutputWriter::from_path(Some(Path::new("-")), WriteMode::Append).unwrap();
        assert!(writer.file_path().is_none());
    }

    #[test]
    fn missing_input_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");
        let input = input_file(path.to_str().unwrap()).unwrap();

        let error = input.as_reader().unwrap_err();

        assert!(error.to_string().starts_with("File not found: "));
        assert!(input_stream(path.to_str().unwrap())
            .unwrap()
            .as_reader()
            .is_err());
    }

    #[test]
    fn input_file_is_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"AAA Lys 1.0\n").unwrap();
        let input = input_file(file.path().to_str().unwrap()).unwrap();

        let mut contents = String::new();
        input
            .as_reader()
            .unwrap()
            .into_read()
            .read_to_string(&mut contents)
            .unwrap();

        assert_eq!(contents, "AAA Lys 1.0\n");
    }
}
