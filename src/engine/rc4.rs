use crate::engine::{validate_input, Engine};
use crate::error::{CipherscopeError, Result};
use serde::Serialize;

/// RC4 state-permutation stream cipher with a full per-step trace.
///
/// The state array size is caller-configurable down to trivially small
/// values on purpose: tiny arrays make the key schedule easy to follow by
/// hand. Because the size may exceed 256, state values and keystream words
/// are `u32` rather than `u8`; for sizes up to 256 every value fits in a
/// byte and the output matches the textbook algorithm exactly.
pub struct Rc4;

/// Options for an RC4 run
#[derive(Debug, Clone)]
pub struct Rc4Options {
    /// State array size (e.g. 4 for demonstrations, 256 for the real cipher)
    pub state_size: usize,
}

impl Default for Rc4Options {
    fn default() -> Self {
        Self { state_size: 256 }
    }
}

/// One iteration of the key-scheduling phase
#[derive(Debug, Clone, Serialize)]
pub struct KsaStep {
    pub i: usize,
    /// Key byte mixed in this iteration: `key[i % key_len]`
    pub key_byte: u8,
    /// `j` after the update `j = (j + S[i] + key[i % key_len]) % n`
    pub j: usize,
    pub state_before: Vec<u32>,
    pub state_after: Vec<u32>,
}

/// One generated byte of the pseudo-random generation phase
#[derive(Debug, Clone, Serialize)]
pub struct PrgaStep {
    /// Position of the plaintext byte being encrypted
    pub index: usize,
    pub plaintext_byte: u8,
    pub i: usize,
    pub j: usize,
    pub state_before: Vec<u32>,
    pub state_after: Vec<u32>,
    /// Keystream lookup index: `t = (S[i] + S[j]) % n`
    pub t: usize,
    pub keystream: u32,
    pub ciphertext: u32,
}

/// Complete result of an RC4 run
#[derive(Debug, Clone, Serialize)]
pub struct Rc4Outcome {
    pub state_size: usize,
    /// Identity permutation the key schedule starts from
    pub initial_state: Vec<u32>,
    /// State array after the key-scheduling phase
    pub scheduled_state: Vec<u32>,
    pub ksa: Vec<KsaStep>,
    pub prga: Vec<PrgaStep>,
    pub keystream: Vec<u32>,
    pub ciphertext: Vec<u32>,
    /// Ciphertext re-XORed with the keystream; must equal the plaintext
    pub recovered: Vec<u8>,
}

impl Engine for Rc4 {
    type Options = Rc4Options;
    type Outcome = Rc4Outcome;

    fn name(&self) -> &'static str {
        "RC4"
    }

    fn run(&self, plaintext: &str, key: &str, options: &Self::Options) -> Result<Rc4Outcome> {
        run(plaintext.as_bytes(), key.as_bytes(), options)
    }
}

/// Run the full KSA + PRGA over `plaintext`, capturing every intermediate
/// state. Every call starts from a fresh identity permutation.
pub fn run(plaintext: &[u8], key: &[u8], options: &Rc4Options) -> Result<Rc4Outcome> {
    validate_input(plaintext, key)?;
    let n = options.state_size;
    if n == 0 {
        return Err(CipherscopeError::InvalidParameter(
            "state size must be a positive number".into(),
        ));
    }

    let mut s: Vec<u32> = (0..n as u32).collect();
    let initial_state = s.clone();

    // Key-scheduling phase
    let mut ksa = Vec::with_capacity(n);
    let mut j = 0usize;
    for i in 0..n {
        let state_before = s.clone();
        let key_byte = key[i % key.len()];
        j = (j + s[i] as usize + key_byte as usize) % n;
        s.swap(i, j);
        ksa.push(KsaStep {
            i,
            key_byte,
            j,
            state_before,
            state_after: s.clone(),
        });
    }
    let scheduled_state = s.clone();

    // Generation phase
    let mut prga = Vec::with_capacity(plaintext.len());
    let mut keystream = Vec::with_capacity(plaintext.len());
    let mut ciphertext = Vec::with_capacity(plaintext.len());
    let mut i = 0usize;
    j = 0;
    for (index, &plaintext_byte) in plaintext.iter().enumerate() {
        let state_before = s.clone();
        i = (i + 1) % n;
        j = (j + s[i] as usize) % n;
        s.swap(i, j);
        let t = (s[i] as usize + s[j] as usize) % n;
        let ks = s[t];
        let ct = u32::from(plaintext_byte) ^ ks;
        keystream.push(ks);
        ciphertext.push(ct);
        prga.push(PrgaStep {
            index,
            plaintext_byte,
            i,
            j,
            state_before,
            state_after: s.clone(),
            t,
            keystream: ks,
            ciphertext: ct,
        });
    }

    // Decryption check: re-XOR the ciphertext with the same keystream
    let recovered: Vec<u8> = ciphertext
        .iter()
        .zip(&keystream)
        .map(|(&c, &k)| (c ^ k) as u8)
        .collect();

    Ok(Rc4Outcome {
        state_size: n,
        initial_state,
        scheduled_state,
        ksa,
        prga,
        keystream,
        ciphertext,
        recovered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn is_permutation(state: &[u32], n: usize) -> bool {
        let mut seen = vec![false; n];
        for &v in state {
            let v = v as usize;
            if v >= n || seen[v] {
                return false;
            }
            seen[v] = true;
        }
        state.len() == n
    }

    #[test]
    fn test_ksa_produces_permutation() {
        for n in [1, 2, 4, 7, 256] {
            let outcome = run(b"X", b"KEY", &Rc4Options { state_size: n }).unwrap();
            assert!(is_permutation(&outcome.scheduled_state, n), "n = {}", n);
            for step in &outcome.ksa {
                assert!(is_permutation(&step.state_after, n));
            }
        }
    }

    #[test]
    fn test_known_vector() {
        // Classic reference vector: RC4("Key", "Plaintext") = bbf316e8d940af0ad3
        let outcome = run(b"Plaintext", b"Key", &Rc4Options::default()).unwrap();
        let bytes: Vec<u8> = outcome.ciphertext.iter().map(|&c| c as u8).collect();
        assert_eq!(hex::encode(bytes), "bbf316e8d940af0ad3");
    }

    #[test]
    fn test_roundtrip_with_regenerated_keystream() {
        let plaintext = b"ATTACK";
        let options = Rc4Options { state_size: 256 };
        let first = run(plaintext, b"KEY", &options).unwrap();

        // A fresh run with identical inputs regenerates the same keystream
        let second = run(plaintext, b"KEY", &options).unwrap();
        assert_eq!(first.keystream, second.keystream);

        let recovered: Vec<u8> = first
            .ciphertext
            .iter()
            .zip(&second.keystream)
            .map(|(&c, &k)| (c ^ k) as u8)
            .collect();
        assert_eq!(recovered, plaintext);
        assert_eq!(first.recovered, plaintext);
    }

    #[test]
    fn test_trace_shape() {
        let outcome = run(b"Hello", b"k", &Rc4Options { state_size: 8 }).unwrap();
        assert_eq!(outcome.ksa.len(), 8);
        assert_eq!(outcome.prga.len(), 5);
        assert_eq!(outcome.keystream.len(), 5);
        assert_eq!(outcome.ciphertext.len(), 5);
        assert_eq!(outcome.initial_state, (0..8).collect::<Vec<u32>>());
    }

    #[test]
    fn test_ksa_step_records_swap() {
        let outcome = run(b"A", b"B", &Rc4Options { state_size: 4 }).unwrap();
        let first = &outcome.ksa[0];
        // j = (0 + S[0] + 'B') % 4 = 66 % 4 = 2
        assert_eq!(first.j, 2);
        assert_eq!(first.state_before, vec![0, 1, 2, 3]);
        assert_eq!(first.state_after, vec![2, 1, 0, 3]);
    }

    #[test]
    fn test_state_size_one() {
        // Degenerate single-element state: keystream is all zeros
        let outcome = run(b"AB", b"key", &Rc4Options { state_size: 1 }).unwrap();
        assert_eq!(outcome.keystream, vec![0, 0]);
        assert_eq!(outcome.ciphertext, vec![u32::from(b'A'), u32::from(b'B')]);
    }

    #[test]
    fn test_invalid_state_size() {
        let err = run(b"hi", b"key", &Rc4Options { state_size: 0 }).unwrap_err();
        assert!(matches!(err, CipherscopeError::InvalidParameter(_)));
    }

    #[test]
    fn test_empty_inputs() {
        let options = Rc4Options::default();
        assert!(matches!(
            run(b"", b"key", &options).unwrap_err(),
            CipherscopeError::EmptyInput("plaintext")
        ));
        assert!(matches!(
            run(b"hi", b"", &options).unwrap_err(),
            CipherscopeError::EmptyInput("key")
        ));
    }

    proptest! {
        #[test]
        fn prop_schedule_is_permutation(
            key in proptest::collection::vec(any::<u8>(), 1..32),
            n in 1usize..300,
        ) {
            let outcome = run(b"x", &key, &Rc4Options { state_size: n }).unwrap();
            prop_assert!(is_permutation(&outcome.scheduled_state, n));
        }

        #[test]
        fn prop_recovery_matches_plaintext(
            plaintext in proptest::collection::vec(any::<u8>(), 1..64),
            key in proptest::collection::vec(any::<u8>(), 1..16),
        ) {
            let outcome = run(&plaintext, &key, &Rc4Options::default()).unwrap();
            prop_assert_eq!(outcome.recovered, plaintext);
        }
    }
}
