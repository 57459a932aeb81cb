pub mod chacha20;
pub mod rc4;
pub mod vigenere;

pub use chacha20::{ChaCha20, ChaCha20Options, ChaCha20Outcome};
pub use rc4::{Rc4, Rc4Options, Rc4Outcome};
pub use vigenere::{Mode, Vigenere, VigenereOptions, VigenereOutcome};

use crate::error::{CipherscopeError, Result};

/// A cipher transformation engine.
///
/// Each engine is stateless between invocations: `run` owns its working
/// buffers, captures every intermediate value into the outcome's trace, and
/// discards the rest. Renderers consume the outcome; the engine itself never
/// prints anything.
pub trait Engine {
    type Options;
    type Outcome;

    fn name(&self) -> &'static str;

    fn run(&self, plaintext: &str, key: &str, options: &Self::Options) -> Result<Self::Outcome>;
}

/// Shared precondition for all engines: plaintext and key must be non-empty.
pub fn validate_input(plaintext: &[u8], key: &[u8]) -> Result<()> {
    if plaintext.is_empty() {
        return Err(CipherscopeError::EmptyInput("plaintext"));
    }
    if key.is_empty() {
        return Err(CipherscopeError::EmptyInput("key"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_non_empty() {
        assert!(validate_input(b"hello", b"key").is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_plaintext() {
        let err = validate_input(b"", b"key").unwrap_err();
        assert!(matches!(err, CipherscopeError::EmptyInput("plaintext")));
    }

    #[test]
    fn test_validate_rejects_empty_key() {
        let err = validate_input(b"hello", b"").unwrap_err();
        assert!(matches!(err, CipherscopeError::EmptyInput("key")));
    }

    #[test]
    fn test_engine_names() {
        assert_eq!(Rc4.name(), "RC4");
        assert_eq!(ChaCha20.name(), "ChaCha20");
        assert_eq!(Vigenere.name(), "Vigenère Cipher");
    }
}
