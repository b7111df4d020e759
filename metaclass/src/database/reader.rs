use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::BufRead;

use log::warn;

use crate::database::consts::{
    BYTE_TO_ACID, DATABASE_TITLE_PREFIX, SAMPLE_HEADER_PREFIXES, SAMPLE_IDENTIFIER,
};
use crate::sequence::{Acid, NucleotideSequence, NucleotideSequenceIdentifier};

/// Error occurring during parsing a database or a sample file.
#[derive(Debug)]
pub enum DatabaseReaderError {
    /// I/O error occurred when reading the file.
    IoError(std::io::Error),
    /// End-Of-File reached before reading a sequence.
    EofReached,
    /// Not a valid database file.
    InvalidFormat,
    /// Invalid acid character in given entry.
    InvalidAcid {
        identifier: NucleotideSequenceIdentifier,
        acid: char,
    },
}

impl From<std::io::Error> for DatabaseReaderError {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e)
    }
}

impl Display for DatabaseReaderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseReaderError::IoError(e) => write!(f, "IO error: {}", e),
            DatabaseReaderError::EofReached => write!(f, "Reached the end of file"),
            DatabaseReaderError::InvalidFormat => {
                write!(f, "Invalid format: sequence data before the first identifier")
            }
            DatabaseReaderError::InvalidAcid { identifier, acid } => {
                write!(f, "Invalid acid in `{}`: `{}`", identifier, acid)
            }
        }
    }
}

impl Error for DatabaseReaderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DatabaseReaderError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

/// The result of a database reading operation.
pub type DatabaseResult<T> = Result<T, DatabaseReaderError>;

/// Database format reader deserializing entries into [`NucleotideSequence`]
/// objects.
#[derive(Debug)]
pub struct DatabaseReader<R> {
    reader: R,
    buffer: Vec<u8>,
    pending_identifier: Option<NucleotideSequenceIdentifier>,
}

impl<R: BufRead> DatabaseReader<R> {
    /// Creates new `DatabaseReader` instance.
    ///
    /// # Examples
    /// ```
    /// use metaclass::database::reader::DatabaseReader;
    ///
    /// let buf = Vec::new();
    /// let _reader = DatabaseReader::new(buf.as_slice());
    /// ```
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::with_capacity(4096),
            pending_identifier: None,
        }
    }

    /// Reads a single database entry.
    ///
    /// Returns [`DatabaseReaderError::EofReached`] if there are no more
    /// entries. An entry containing an invalid acid is consumed up to the next
    /// identifier and reported as [`DatabaseReaderError::InvalidAcid`], so
    /// that reading can continue with the following entry.
    pub fn read_sequence(&mut self) -> DatabaseResult<NucleotideSequence> {
        let identifier = match self.pending_identifier.take() {
            Some(identifier) => identifier,
            None => self.parse_identifier()?,
        };

        let mut acids = Vec::new();
        let mut invalid_acid = None;
        while let Some(line) = Self::read_line(&mut self.reader, &mut self.buffer)? {
            if line.is_empty() {
                continue;
            }
            if line[0] == DATABASE_TITLE_PREFIX as u8 {
                self.pending_identifier = Some(Self::identifier_from_line(line));
                break;
            }

            if invalid_acid.is_none() {
                invalid_acid = decode_acids(line, &mut acids).err();
            }
        }

        match invalid_acid {
            Some(acid) => Err(DatabaseReaderError::InvalidAcid { identifier, acid }),
            None => Ok(NucleotideSequence::new(identifier, acids)),
        }
    }

    fn parse_identifier(&mut self) -> DatabaseResult<NucleotideSequenceIdentifier> {
        loop {
            let line = Self::read_line(&mut self.reader, &mut self.buffer)?
                .ok_or(DatabaseReaderError::EofReached)?;

            if line.is_empty() {
                continue;
            }
            if line[0] != DATABASE_TITLE_PREFIX as u8 {
                return Err(DatabaseReaderError::InvalidFormat);
            }

            return Ok(Self::identifier_from_line(line));
        }
    }

    fn identifier_from_line(line: &[u8]) -> NucleotideSequenceIdentifier {
        String::from_utf8_lossy(&line[1..]).trim().into()
    }

    /// Reads a single line, with surrounding whitespace stripped. Returns
    /// `None` at the end of input.
    fn read_line<'a>(reader: &mut R, buffer: &'a mut Vec<u8>) -> DatabaseResult<Option<&'a [u8]>> {
        buffer.clear();
        let bytes_read = reader.read_until(b'\n', buffer)?;
        if bytes_read == 0 {
            return Ok(None);
        }

        Ok(Some(trim_line(buffer.as_slice())))
    }
}

impl<R: BufRead> IntoIterator for DatabaseReader<R> {
    type Item = DatabaseResult<NucleotideSequence>;
    type IntoIter = DatabaseReaderIterator<R>;

    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            reader: self,
            no_errors: true,
        }
    }
}

/// Iterator implementation for [`DatabaseReader`] which iterates over all
/// entries in a file. Stops after the first error, except for invalid acid
/// errors, which only concern a single entry.
#[derive(Debug)]
pub struct DatabaseReaderIterator<R> {
    reader: DatabaseReader<R>,
    no_errors: bool,
}

impl<R: BufRead> Iterator for DatabaseReaderIterator<R> {
    type Item = DatabaseResult<NucleotideSequence>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.no_errors {
            return None;
        }

        let result = self.reader.read_sequence();
        match result {
            Ok(_) | Err(DatabaseReaderError::InvalidAcid { .. }) => {}
            Err(DatabaseReaderError::EofReached) => {
                self.no_errors = false;
                return None;
            }
            Err(_) => self.no_errors = false,
        }
        Some(result)
    }
}

/// Reads all entries of a database.
///
/// Entries containing invalid acids are skipped with a warning; any other
/// error aborts reading.
///
/// # Examples
/// ```
/// use metaclass::database::reader::read_database;
///
/// let database = read_database("@first\nACGT\n@second\nTT\nGG\n".as_bytes()).unwrap();
/// assert_eq!(database.len(), 2);
/// assert_eq!(database[1].identifier().str(), "second");
/// assert_eq!(database[1].len(), 4);
/// ```
pub fn read_database<R: BufRead>(reader: R) -> DatabaseResult<Vec<NucleotideSequence>> {
    let mut database = Vec::new();

    for result in DatabaseReader::new(reader) {
        match result {
            Ok(sequence) => database.push(sequence),
            Err(DatabaseReaderError::InvalidAcid { identifier, acid }) => {
                warn!(
                    "Skipping database entry `{}`: invalid acid `{}`",
                    identifier, acid
                );
            }
            Err(e) => return Err(e),
        }
    }

    Ok(database)
}

/// Reads a sample: a single sequence made of all the non-header lines of the
/// input.
///
/// # Examples
/// ```
/// use metaclass::database::reader::read_sample;
/// use metaclass::sequence::Acid::{A, C, G, T};
///
/// let sample = read_sample(">header\nACG\n\nt\n".as_bytes()).unwrap();
/// assert_eq!(sample, [A, C, G, T]);
/// ```
pub fn read_sample<R: BufRead>(mut reader: R) -> DatabaseResult<Vec<Acid>> {
    let identifier = NucleotideSequenceIdentifier::from(SAMPLE_IDENTIFIER);
    let mut buffer = Vec::with_capacity(4096);
    let mut acids = Vec::new();

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }

        let line = trim_line(&buffer);
        if line.is_empty()
            || SAMPLE_HEADER_PREFIXES
                .iter()
                .any(|&prefix| line[0] == prefix as u8)
        {
            continue;
        }

        decode_acids(line, &mut acids).map_err(|acid| DatabaseReaderError::InvalidAcid {
            identifier: identifier.clone(),
            acid,
        })?;
    }

    Ok(acids)
}

fn trim_line(mut line: &[u8]) -> &[u8] {
    while let [first, rest @ ..] = line {
        if !first.is_ascii_whitespace() {
            break;
        }
        line = rest;
    }
    while let [rest @ .., last] = line {
        if !last.is_ascii_whitespace() {
            break;
        }
        line = rest;
    }

    line
}

/// Appends the acids of `line` to `acids`. Returns the first byte that is not
/// a valid acid, if any.
fn decode_acids(line: &[u8], acids: &mut Vec<Acid>) -> Result<(), char> {
    acids.reserve(line.len());
    for &byte in line {
        let acid = BYTE_TO_ACID[byte as usize].ok_or(byte as char)?;
        acids.push(acid);
    }

    Ok(())
}
