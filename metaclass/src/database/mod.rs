//! Readers of the plain text formats sequences are loaded from.
//!
//! The database format is a tagged flat file, where a line starting with `@`
//! begins a new entry and following lines make up its acids:
//!
//! ```text
//! @SEQ_1
//! ACGTACGT
//! ACGT
//! @SEQ_2
//! TTGACA
//! ```
//!
//! A sample is a single sequence; all its lines are concatenated, and
//! header lines (`@` or `>`) are ignored.

mod consts;
pub mod reader;
