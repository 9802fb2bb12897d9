//! PIN code generator

use rand::Rng;

/// Lowercase alphanumeric alphabet used for customer-facing codes
pub const PIN_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz0123456789";

/// Samples fixed-length codes uniformly from an ASCII alphabet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeGenerator {
    alphabet: Vec<u8>,
    length: usize,
}

impl CodeGenerator {
    /// `None` when the alphabet is empty or not ASCII, or the length is zero
    pub fn new(alphabet: &str, length: usize) -> Option<Self> {
        if alphabet.is_empty() || !alphabet.is_ascii() || length == 0 {
            return None;
        }
        Some(Self {
            alphabet: alphabet.as_bytes().to_vec(),
            length,
        })
    }

    /// Default alphabet with the given length (at least 1)
    pub fn with_length(length: usize) -> Self {
        Self {
            alphabet: PIN_ALPHABET.as_bytes().to_vec(),
            length: length.max(1),
        }
    }

    pub fn generate(&self) -> String {
        self.generate_with(&mut rand::thread_rng())
    }

    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        (0..self.length)
            .map(|_| self.alphabet[rng.gen_range(0..self.alphabet.len())] as char)
            .collect()
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::with_length(6)
    }
}
