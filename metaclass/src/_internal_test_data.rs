use lazy_static::lazy_static;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::sequence::{Acid, NucleotideSequence, Symbol};

pub const PERIODIC_SAMPLE_STR: &str = "ACGTACGTACGT";

pub const SIMPLE_DATABASE_STR: &str = "@PERIODIC
ACGTACGTACGTACGTACGT
acgtacgtacgtacgtacgt

@SEQ_ID
GATTTGGGGTTCAAAGCAGTATCGATCAAATAGTAAATCCATTTGTTCAACTCACAGTTT
@POLY_T
TTTTTTTTTTTTTTTTTTTT
@SHORT
ACGTT
@REVERSE
TGCATGCATGCA
TGCATGCATGCA
";

/// Converts a string of IUPAC codes into acids.
///
/// # Panics
/// This function panics if the string contains an invalid character.
pub fn acids_from_str(s: &str) -> Vec<Acid> {
    s.chars()
        .map(|ch| {
            Acid::values()
                .into_iter()
                .find(|acid| acid.as_char() == ch.to_ascii_uppercase())
                .unwrap_or_else(|| panic!("invalid acid: {}", ch))
        })
        .collect()
}

/// Returns a random permutation of given acids.
pub fn shuffled<R: Rng>(acids: &[Acid], rng: &mut R) -> Vec<Acid> {
    let mut result = acids.to_vec();
    result.shuffle(rng);
    result
}

/// Generates a sequence where every acid is most likely followed by the next
/// canonical acid, so that the order of acids carries information.
fn generate_correlated_sequence<R: Rng>(len: usize, rng: &mut R) -> Vec<Acid> {
    const CANONICAL: [Acid; 4] = [Acid::A, Acid::C, Acid::G, Acid::T];

    let mut current = rng.gen_range(0..CANONICAL.len());
    let mut acids = Vec::with_capacity(len);
    for _ in 0..len {
        acids.push(CANONICAL[current]);
        current = if rng.gen_bool(0.75) {
            (current + 1) % CANONICAL.len()
        } else {
            rng.gen_range(0..CANONICAL.len())
        };
    }

    acids
}

lazy_static! {
    pub static ref PERIODIC_SAMPLE: Vec<Acid> = acids_from_str(PERIODIC_SAMPLE_STR);
    pub static ref SIMPLE_DATABASE: Vec<NucleotideSequence> = vec![
        NucleotideSequence::new("PERIODIC", acids_from_str(&"ACGT".repeat(10))),
        NucleotideSequence::new(
            "SEQ_ID",
            acids_from_str("GATTTGGGGTTCAAAGCAGTATCGATCAAATAGTAAATCCATTTGTTCAACTCACAGTTT"),
        ),
        NucleotideSequence::new("POLY_T", acids_from_str(&"T".repeat(20))),
        NucleotideSequence::new("SHORT", acids_from_str("ACGTT")),
        NucleotideSequence::new("REVERSE", acids_from_str(&"TGCA".repeat(6))),
    ];
    pub static ref RANDOM_SEQUENCES: Vec<Vec<Acid>> = {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1337);
        (0..4)
            .map(|_| generate_correlated_sequence(1000, &mut rng))
            .collect()
    };
}
