//! Mnemonic phrase generation and handling

use std::fmt;

use bip39::Mnemonic as Bip39Mnemonic;
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Supported mnemonic strengths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MnemonicStrength {
    /// 12 words (128 bits)
    Words12,
    /// 15 words (160 bits)
    Words15,
    /// 18 words (192 bits)
    Words18,
    /// 21 words (224 bits)
    Words21,
    /// 24 words (256 bits)
    #[default]
    Words24,
}

impl MnemonicStrength {
    /// Get entropy length in bytes
    pub fn entropy_bytes(&self) -> usize {
        match self {
            Self::Words12 => 16,
            Self::Words15 => 20,
            Self::Words18 => 24,
            Self::Words21 => 28,
            Self::Words24 => 32,
        }
    }

    /// Number of words in a phrase of this strength
    pub fn word_count(&self) -> usize {
        self.entropy_bytes() * 3 / 4
    }
}

/// Generate a new random mnemonic phrase with the specified strength
pub fn generate_mnemonic(strength: MnemonicStrength) -> Result<Zeroizing<String>> {
    let mut entropy = Zeroizing::new(vec![0u8; strength.entropy_bytes()]);
    OsRng.fill_bytes(&mut entropy);

    entropy_to_mnemonic(&entropy)
}

/// Encode raw entropy as a mnemonic phrase
pub fn entropy_to_mnemonic(entropy: &[u8]) -> Result<Zeroizing<String>> {
    let mnemonic = Bip39Mnemonic::from_entropy(entropy)
        .map_err(|e| Error::InvalidMnemonic(e.to_string()))?;

    Ok(Zeroizing::new(mnemonic.to_string()))
}

/// Recover the entropy a mnemonic phrase encodes
pub fn mnemonic_to_entropy(phrase: &str) -> Result<Zeroizing<Vec<u8>>> {
    let mnemonic = parse(phrase)?;
    Ok(Zeroizing::new(mnemonic.to_entropy()))
}

/// Validate a mnemonic phrase
pub fn validate_mnemonic(phrase: &str) -> Result<bool> {
    parse(phrase).map(|_| true)
}

/// Generate a seed from a mnemonic phrase and optional passphrase
pub fn mnemonic_to_seed(phrase: &str, passphrase: Option<&str>) -> Result<Zeroizing<[u8; 64]>> {
    let mnemonic = parse(phrase)?;
    Ok(Zeroizing::new(mnemonic.to_seed_normalized(passphrase.unwrap_or(""))))
}

fn parse(phrase: &str) -> Result<Bip39Mnemonic> {
    Bip39Mnemonic::parse_normalized(phrase).map_err(|e| Error::InvalidMnemonic(e.to_string()))
}

/// A mnemonic phrase that has passed checksum validation
///
/// The phrase is wiped from memory when the value is dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct Mnemonic {
    phrase: Zeroizing<String>,
}

impl Mnemonic {
    /// Validate and wrap an existing phrase
    pub fn parse(phrase: &str) -> Result<Self> {
        let mnemonic = parse(phrase)?;
        Ok(Self {
            phrase: Zeroizing::new(mnemonic.to_string()),
        })
    }

    /// Generate a fresh random mnemonic
    pub fn generate(strength: MnemonicStrength) -> Result<Self> {
        Ok(Self {
            phrase: generate_mnemonic(strength)?,
        })
    }

    /// Rebuild a mnemonic from its entropy
    pub fn from_entropy(entropy: &[u8]) -> Result<Self> {
        Ok(Self {
            phrase: entropy_to_mnemonic(entropy)?,
        })
    }

    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub fn word_count(&self) -> usize {
        self.phrase.split_whitespace().count()
    }

    pub fn to_entropy(&self) -> Result<Zeroizing<Vec<u8>>> {
        mnemonic_to_entropy(&self.phrase)
    }

    /// BIP-39 seed with the empty passphrase
    pub fn to_seed(&self) -> Result<Zeroizing<[u8; 64]>> {
        mnemonic_to_seed(&self.phrase, None)
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mnemonic")
            .field("words", &self.word_count())
            .finish_non_exhaustive()
    }
}
