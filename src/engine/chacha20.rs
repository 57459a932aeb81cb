use crate::engine::{validate_input, Engine};
use crate::error::Result;
use serde::Serialize;

/// ChaCha20 ARX stream cipher, single-block demonstration.
///
/// The full 4×4 word matrix is captured after every column and diagonal
/// pass so a renderer can show diffusion round by round. Only one 64-byte
/// keystream block is ever produced (block counter fixed at 1); plaintext
/// longer than 64 bytes wraps around and reuses the block. That is a
/// deliberate simplification for demonstration, not standard multi-block
/// behavior.
pub struct ChaCha20;

/// "expand 32-byte k" as four little-endian words
pub const CONSTANTS: [u32; 4] = [0x6170_7865, 0x3320_646e, 0x7962_2d32, 0x6b20_6574];

/// Key length after padding/truncation
pub const KEY_LEN: usize = 32;

/// Nonce length after padding/truncation
pub const NONCE_LEN: usize = 12;

/// Block counter for the single demonstration block
pub const COUNTER: u32 = 1;

/// Options for a ChaCha20 run
#[derive(Debug, Clone, Default)]
pub struct ChaCha20Options {
    /// Nonce bytes, zero-padded (or truncated) to 12 bytes. Empty means
    /// an all-zero nonce.
    pub nonce: Vec<u8>,
}

/// Matrix snapshots for one double round
#[derive(Debug, Clone, Serialize)]
pub struct DoubleRoundStep {
    /// 1-based double-round number (1..=10)
    pub round: usize,
    pub after_column: [u32; 16],
    pub after_diagonal: [u32; 16],
}

/// One byte of the XOR encryption pass
#[derive(Debug, Clone, Serialize)]
pub struct XorStep {
    pub index: usize,
    pub plaintext_byte: u8,
    /// Keystream byte used: `block[index % 64]`
    pub keystream_byte: u8,
    pub ciphertext_byte: u8,
}

/// Complete result of a ChaCha20 run
#[derive(Debug, Clone, Serialize)]
pub struct ChaCha20Outcome {
    /// Key after padding/truncation to 32 bytes
    pub key: Vec<u8>,
    /// Nonce after padding/truncation to 12 bytes
    pub nonce: Vec<u8>,
    pub counter: u32,
    /// Initial matrix: constants, key words, counter, nonce words
    pub initial: [u32; 16],
    pub rounds: Vec<DoubleRoundStep>,
    /// Working matrix after all 20 rounds, before the final addition
    pub mixed: [u32; 16],
    /// `mixed + initial` element-wise, the matrix the keystream is read from
    pub finalized: [u32; 16],
    /// The 64-byte keystream block, little-endian serialization of `finalized`
    pub block: Vec<u8>,
    pub xor_steps: Vec<XorStep>,
    /// Keystream bytes actually consumed (same length as the plaintext)
    pub keystream: Vec<u8>,
    pub ciphertext: Vec<u8>,
}

impl Engine for ChaCha20 {
    type Options = ChaCha20Options;
    type Outcome = ChaCha20Outcome;

    fn name(&self) -> &'static str {
        "ChaCha20"
    }

    fn run(&self, plaintext: &str, key: &str, options: &Self::Options) -> Result<ChaCha20Outcome> {
        run(plaintext.as_bytes(), key.as_bytes(), options)
    }
}

/// The ChaCha20 quarter round on four words of the state.
pub fn quarter_round(state: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize) {
    state[a] = state[a].wrapping_add(state[b]);
    state[d] ^= state[a];
    state[d] = state[d].rotate_left(16);
    state[c] = state[c].wrapping_add(state[d]);
    state[b] ^= state[c];
    state[b] = state[b].rotate_left(12);
    state[a] = state[a].wrapping_add(state[b]);
    state[d] ^= state[a];
    state[d] = state[d].rotate_left(8);
    state[c] = state[c].wrapping_add(state[d]);
    state[b] ^= state[c];
    state[b] = state[b].rotate_left(7);
}

fn pad_to<const N: usize>(input: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    let take = input.len().min(N);
    out[..take].copy_from_slice(&input[..take]);
    out
}

fn build_initial(key: &[u8; KEY_LEN], nonce: &[u8; NONCE_LEN]) -> [u32; 16] {
    let mut m = [0u32; 16];
    m[..4].copy_from_slice(&CONSTANTS);
    for i in 0..8 {
        m[4 + i] = u32::from_le_bytes(key[i * 4..(i + 1) * 4].try_into().unwrap());
    }
    m[12] = COUNTER;
    for i in 0..3 {
        m[13 + i] = u32::from_le_bytes(nonce[i * 4..(i + 1) * 4].try_into().unwrap());
    }
    m
}

/// Run the ChaCha20 block function once and encrypt `plaintext` against it,
/// capturing the matrix after every round pass.
pub fn run(plaintext: &[u8], key: &[u8], options: &ChaCha20Options) -> Result<ChaCha20Outcome> {
    validate_input(plaintext, key)?;

    let key = pad_to::<KEY_LEN>(key);
    let nonce = pad_to::<NONCE_LEN>(&options.nonce);
    let initial = build_initial(&key, &nonce);

    // 10 double rounds = 20 rounds total
    let mut x = initial;
    let mut rounds = Vec::with_capacity(10);
    for round in 1..=10 {
        quarter_round(&mut x, 0, 4, 8, 12);
        quarter_round(&mut x, 1, 5, 9, 13);
        quarter_round(&mut x, 2, 6, 10, 14);
        quarter_round(&mut x, 3, 7, 11, 15);
        let after_column = x;

        quarter_round(&mut x, 0, 5, 10, 15);
        quarter_round(&mut x, 1, 6, 11, 12);
        quarter_round(&mut x, 2, 7, 8, 13);
        quarter_round(&mut x, 3, 4, 9, 14);
        rounds.push(DoubleRoundStep {
            round,
            after_column,
            after_diagonal: x,
        });
    }
    let mixed = x;

    // Finalize: add the initial matrix back in and serialize little-endian
    let mut finalized = [0u32; 16];
    let mut block = Vec::with_capacity(64);
    for i in 0..16 {
        finalized[i] = mixed[i].wrapping_add(initial[i]);
        block.extend_from_slice(&finalized[i].to_le_bytes());
    }

    // Encrypt: the single block wraps for plaintext longer than 64 bytes
    let mut xor_steps = Vec::with_capacity(plaintext.len());
    let mut keystream = Vec::with_capacity(plaintext.len());
    let mut ciphertext = Vec::with_capacity(plaintext.len());
    for (index, &p) in plaintext.iter().enumerate() {
        let k = block[index % 64];
        let c = p ^ k;
        keystream.push(k);
        ciphertext.push(c);
        xor_steps.push(XorStep {
            index,
            plaintext_byte: p,
            keystream_byte: k,
            ciphertext_byte: c,
        });
    }

    Ok(ChaCha20Outcome {
        key: key.to_vec(),
        nonce: nonce.to_vec(),
        counter: COUNTER,
        initial,
        rounds,
        mixed,
        finalized,
        block,
        xor_steps,
        keystream,
        ciphertext,
    })
}
