use crate::sequence::Acid;

pub(super) const DATABASE_TITLE_PREFIX: char = '@';
pub(super) const SAMPLE_HEADER_PREFIXES: [char; 2] = [DATABASE_TITLE_PREFIX, '>'];

/// Identifier used in errors occurring when reading a sample.
pub(super) const SAMPLE_IDENTIFIER: &str = "<sample>";

const ACID_BYTES: &[u8; 16] = b"ACGTURYSWKMBDHVN";

/// Maps every byte to the acid it represents; both cases are accepted.
pub(super) const BYTE_TO_ACID: [Option<Acid>; 256] = {
    let mut acids = [None; 256];

    let mut i = 0;
    while i < ACID_BYTES.len() {
        let byte = ACID_BYTES[i];
        acids[byte as usize] = Some(Acid::VALUES[i]);
        acids[byte.to_ascii_lowercase() as usize] = Some(Acid::VALUES[i]);
        i += 1;
    }

    acids
};

#[cfg(test)]
mod tests {
    use crate::database::consts::BYTE_TO_ACID;
    use crate::sequence::{Acid, Symbol};

    #[test]
    fn test_byte_to_acid_matches_display() {
        for acid in Acid::values() {
            let upper = acid.as_char() as u8;
            assert_eq!(BYTE_TO_ACID[upper as usize], Some(acid));
            assert_eq!(BYTE_TO_ACID[upper.to_ascii_lowercase() as usize], Some(acid));
        }
    }

    #[test]
    fn test_invalid_bytes() {
        let valid = BYTE_TO_ACID.iter().filter(|acid| acid.is_some()).count();

        assert_eq!(valid, 32);
        assert_eq!(BYTE_TO_ACID[b'X' as usize], None);
        assert_eq!(BYTE_TO_ACID[b'-' as usize], None);
        assert_eq!(BYTE_TO_ACID[b' ' as usize], None);
    }
}
