//! Cipherscope - Step-by-Step Cipher Visualizer
//!
//! An educational tool that shows every intermediate value of three
//! pedagogically significant ciphers instead of just the final result:
//!
//! - **RC4**: state-permutation key schedule (KSA) + pseudo-random
//!   generation (PRGA), with the full state array captured at every swap
//! - **ChaCha20**: 4x4 word-matrix ARX construction, with matrix snapshots
//!   after every column and diagonal pass of the 20 rounds
//! - **Vigenère**: polyalphabetic substitution, traced letter by letter
//!
//! Engines are pure: each `run` takes plaintext, key and options, and
//! returns the ciphertext together with an ordered trace of intermediate
//! states. The `cli` module renders traces as plain text or JSON; nothing
//! in `engine` performs I/O.
//!
//! None of this is cryptographically secure and none of it is meant to be.
//! The RC4 state size is configurable down to trivially small values, and
//! the ChaCha20 engine produces a single keystream block, on purpose: the
//! point is to watch the machinery move.
//!
//! ## Example
//!
//! ```
//! use cipherscope::engine::{vigenere, VigenereOptions};
//!
//! let outcome = vigenere::run("Attack at Dawn", "LEMON", &VigenereOptions::default()).unwrap();
//! assert_eq!(outcome.output, "Lxfopv ef Rnhr");
//! assert_eq!(outcome.steps.len(), "Attack at Dawn".len());
//! ```

pub mod cli;
pub mod engine;
pub mod error;

pub use engine::{ChaCha20, Engine, Rc4, Vigenere};
pub use error::{CipherscopeError, Result};
