use crate::engine::{validate_input, Engine};
use crate::error::{CipherscopeError, Result};
use serde::Serialize;

/// Vigenère polyalphabetic substitution cipher with a per-character trace.
pub struct Vigenere;

/// The fixed 26-letter alphabet underlying the tabula recta
pub const ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Transformation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Encrypt,
    Decrypt,
}

impl std::str::FromStr for Mode {
    type Err = CipherscopeError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "e" | "encrypt" => Ok(Self::Encrypt),
            "d" | "decrypt" => Ok(Self::Decrypt),
            _ => Err(CipherscopeError::InvalidParameter(format!(
                "mode: {} (expected e/encrypt or d/decrypt)",
                s
            ))),
        }
    }
}

/// Options for a Vigenère run
#[derive(Debug, Clone)]
pub struct VigenereOptions {
    pub mode: Mode,
    /// Copy non-letter characters through unchanged instead of dropping them.
    /// Either way they never consume a key position.
    pub preserve_non_letters: bool,
}

impl Default for VigenereOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Encrypt,
            preserve_non_letters: true,
        }
    }
}

/// What happened to one input character
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum VigenereStep {
    /// A letter, shifted by the current key letter
    Substituted {
        index: usize,
        input: char,
        /// 0-based alphabet position of the (uppercased) input letter
        input_pos: u8,
        key_char: char,
        key_pos: u8,
        output: char,
        output_pos: u8,
    },
    /// A non-letter copied through verbatim
    Preserved { index: usize, ch: char },
    /// A non-letter omitted from the output
    Dropped { index: usize, ch: char },
}

/// Complete result of a Vigenère run
#[derive(Debug, Clone, Serialize)]
pub struct VigenereOutcome {
    pub mode: Mode,
    pub preserve_non_letters: bool,
    /// Key with non-letters stripped and the remainder uppercased
    pub cleaned_key: String,
    pub steps: Vec<VigenereStep>,
    pub output: String,
}

impl Engine for Vigenere {
    type Options = VigenereOptions;
    type Outcome = VigenereOutcome;

    fn name(&self) -> &'static str {
        "Vigenère Cipher"
    }

    fn run(&self, plaintext: &str, key: &str, options: &Self::Options) -> Result<VigenereOutcome> {
        run(plaintext, key, options)
    }
}

/// Strip non-letters from a key and uppercase the remainder
pub fn clean_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Transform `text` letter by letter, recording every substitution.
///
/// The key cursor advances only for letters; case is preserved from input
/// to output.
pub fn run(text: &str, key: &str, options: &VigenereOptions) -> Result<VigenereOutcome> {
    validate_input(text.as_bytes(), key.as_bytes())?;

    let cleaned_key = clean_key(key);
    if cleaned_key.is_empty() {
        return Err(CipherscopeError::InvalidKey(
            "key must contain at least one letter".into(),
        ));
    }
    let key_bytes = cleaned_key.as_bytes();

    let mut steps = Vec::new();
    let mut output = String::with_capacity(text.len());
    let mut key_index = 0usize;

    for (index, ch) in text.chars().enumerate() {
        if !ch.is_ascii_alphabetic() {
            if options.preserve_non_letters {
                output.push(ch);
                steps.push(VigenereStep::Preserved { index, ch });
            } else {
                steps.push(VigenereStep::Dropped { index, ch });
            }
            continue;
        }

        let is_upper = ch.is_ascii_uppercase();
        let input_pos = ch.to_ascii_uppercase() as u8 - b'A';
        let key_char = key_bytes[key_index % key_bytes.len()];
        let key_pos = key_char - b'A';

        let output_pos = match options.mode {
            Mode::Encrypt => (input_pos + key_pos) % 26,
            Mode::Decrypt => (input_pos + 26 - key_pos) % 26,
        };

        let mut out = ALPHABET[output_pos as usize] as char;
        if !is_upper {
            out = out.to_ascii_lowercase();
        }
        output.push(out);
        steps.push(VigenereStep::Substituted {
            index,
            input: ch,
            input_pos,
            key_char: key_char as char,
            key_pos,
            output: out,
            output_pos,
        });
        key_index += 1;
    }

    Ok(VigenereOutcome {
        mode: options.mode,
        preserve_non_letters: options.preserve_non_letters,
        cleaned_key,
        steps,
        output,
    })
}
