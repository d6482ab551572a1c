//! Machine-name generation for new fields.

use formsmith_model::{FieldType, FormDocument};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Failed attempts at one suffix length before the suffix grows by one.
const ATTEMPTS_PER_LENGTH: usize = 16;

/// Produces `<base>_<random suffix>` names that no field in a document uses.
#[derive(Debug, Clone)]
pub struct NameGenerator {
    rng: StdRng,
    suffix_len: usize,
}

impl NameGenerator {
    pub fn new(suffix_len: usize) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            suffix_len: suffix_len.max(1),
        }
    }

    /// Deterministic generator for tests and replays.
    pub fn seeded(suffix_len: usize, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            suffix_len: suffix_len.max(1),
        }
    }

    pub fn suffix_len(&self) -> usize {
        self.suffix_len
    }

    /// A name for a freshly dropped field of `field_type`.
    pub fn for_type(&mut self, field_type: FieldType, document: &FormDocument) -> String {
        self.unique(field_type.as_str(), |name| document.contains_name(name))
    }

    /// `<base>_<suffix>`, retried until `taken` rejects it no longer.
    pub fn unique(&mut self, base: &str, taken: impl Fn(&str) -> bool) -> String {
        let mut len = self.suffix_len;
        let mut attempts = 0;
        loop {
            let candidate = format!("{base}_{}", self.suffix(len));
            if !taken(&candidate) {
                return candidate;
            }
            attempts += 1;
            if attempts % ATTEMPTS_PER_LENGTH == 0 {
                len += 1;
            }
        }
    }

    fn suffix(&mut self, len: usize) -> String {
        (0..len)
            .map(|_| ALPHABET[self.rng.gen_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

impl Default for NameGenerator {
    fn default() -> Self {
        Self::new(6)
    }
}
