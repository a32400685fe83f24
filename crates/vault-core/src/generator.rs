//! Random password generator

use std::collections::BTreeSet;

use rand::{rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};

use crate::error::{Result, VaultError};
use crate::settings::GeneratorSettings;

const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";
const SYMBOLS: &str = "!@#$%^&*()_+~`|}{[]:;?><,./-=";

/// Characters easily confused with one another when read back
pub const AMBIGUOUS: [char; 5] = ['0', 'O', 'I', 'l', '1'];

/// Character class a generated password may draw from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharClass {
    Lower,
    Upper,
    Digit,
    Symbol,
}

impl CharClass {
    /// All classes, in alphabet order
    pub const ALL: [CharClass; 4] = [Self::Lower, Self::Upper, Self::Digit, Self::Symbol];

    fn characters(self) -> &'static str {
        match self {
            Self::Lower => LOWERCASE,
            Self::Upper => UPPERCASE,
            Self::Digit => DIGITS,
            Self::Symbol => SYMBOLS,
        }
    }
}

/// Build the candidate alphabet: union of the requested classes, then minus
/// the ambiguous characters if asked.
pub fn alphabet(
    classes: impl IntoIterator<Item = CharClass>,
    exclude_ambiguous: bool,
) -> Vec<char> {
    let classes: BTreeSet<CharClass> = classes.into_iter().collect();

    classes
        .into_iter()
        .flat_map(|class| class.characters().chars())
        .filter(|c| !(exclude_ambiguous && AMBIGUOUS.contains(c)))
        .collect()
}

/// Generate a password of `length` characters, each drawn uniformly and
/// independently from the alphabet using the OS CSPRNG.
pub fn generate(
    length: usize,
    classes: impl IntoIterator<Item = CharClass>,
    exclude_ambiguous: bool,
) -> Result<String> {
    if length == 0 {
        return Err(VaultError::InvalidLength(length));
    }

    let alphabet = alphabet(classes, exclude_ambiguous);
    if alphabet.is_empty() {
        return Err(VaultError::EmptyAlphabet);
    }

    let mut rng = OsRng;
    Ok((0..length)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
        .collect())
}

/// Generate using the stored generator preferences
pub fn generate_with(settings: &GeneratorSettings) -> Result<String> {
    generate(
        settings.length,
        settings.classes(),
        settings.exclude_ambiguous,
    )
}
