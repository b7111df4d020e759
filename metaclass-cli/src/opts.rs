use std::fmt::Display;
use std::fs::File;
use std::io;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use flate2::read::MultiGzDecoder;
use log::info;

const STD_STREAM_PATH: &str = "-";
const GZIP_EXTENSION: &str = "gz";

/// Parses a positive, finite floating point number.
pub fn positive_float(value: &str) -> Result<f64, String> {
    let number: f64 = value
        .parse()
        .map_err(|_| format!("`{}` is not a number", value))?;

    if !number.is_finite() || number <= 0.0 {
        return Err(format!("`{}` is not a positive number", value));
    }

    Ok(number)
}

#[derive(Debug, Clone)]
pub struct Directory {
    path: PathBuf,
}

impl Display for Directory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

pub fn directory(path: &str) -> Result<Directory, String> {
    let result = Directory {
        path: PathBuf::from(path),
    };

    Ok(result)
}

impl Directory {
    /// Returns the directory path, creating the directory first if it does
    /// not exist.
    pub fn create(&self) -> anyhow::Result<PathBuf> {
        std::fs::create_dir_all(&self.path).with_context(|| {
            format!("Could not create directory {}", self.path.display())
        })?;

        Ok(self.path.clone())
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

impl Default for InputStream {
    fn default() -> Self {
        Self {
            path: PathBuf::from(STD_STREAM_PATH),
        }
    }
}

impl InputStream {
    pub fn is_stdin(&self) -> bool {
        is_std_stream(&self.path)
    }

    pub fn as_reader(&self) -> anyhow::Result<InputReader> {
        InputReader::from_path(&self.path)
            .with_context(|| format!("Could not open {}", self.path.display()))
    }
}

#[derive(Debug)]
pub enum InputReader {
    Stdin(io::Stdin),
    File { file: File, path: PathBuf },
}

impl InputReader {
    fn from_path(path: &Path) -> anyhow::Result<Self> {
        let val = if is_std_stream(path) {
            Self::Stdin(io::stdin())
        } else {
            let file = File::open(path)?;

            Self::File {
                file,
                path: path.to_owned(),
            }
        };
        Ok(val)
    }

    pub fn is_gzip(&self) -> bool {
        match self {
            InputReader::Stdin(_) => false,
            InputReader::File { path, .. } => path
                .extension()
                .map_or(false, |extension| extension == GZIP_EXTENSION),
        }
    }

    /// Returns a buffered reader of this input, transparently decompressing
    /// gzipped files.
    #[must_use]
    pub fn into_buf_read(self) -> Box<dyn BufRead> {
        let gzip = self.is_gzip();
        match self {
            InputReader::Stdin(stdin) => Box::new(BufReader::new(stdin)),
            InputReader::File { file, .. } if gzip => {
                Box::new(BufReader::new(MultiGzDecoder::new(file)))
            }
            InputReader::File { file, .. } => Box::new(BufReader::new(file)),
        }
    }
}

#[derive(Debug)]
pub enum OutputWriter {
    Stdout(io::Stdout),
    File(File),
}

impl OutputWriter {
    pub fn from_path(output: &Option<PathBuf>) -> anyhow::Result<Self> {
        let path = output
            .clone()
            .unwrap_or_else(|| PathBuf::from(STD_STREAM_PATH));
        info!("Output file: {}", path.display());

        let writer = if is_std_stream(&path) {
            Self::Stdout(io::stdout())
        } else {
            let file = File::create(&path)
                .with_context(|| format!("Could not create {}", path.display()))?;
            Self::File(file)
        };

        Ok(writer)
    }

    pub fn into_write(self) -> Box<dyn Write + Send> {
        match self {
            OutputWriter::Stdout(stdout) => Box::new(stdout),
            OutputWriter::File(file) => Box::new(BufWriter::new(file)),
        }
    }
}

fn is_std_stream(path: &Path) -> bool {
    path.to_string_lossy() == STD_STREAM_PATH
}
