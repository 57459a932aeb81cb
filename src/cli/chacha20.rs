use crate::cli::OutputFormat;
use crate::engine::chacha20::{self, ChaCha20Options, ChaCha20Outcome};
use crate::error::Result;

/// Run the ChaCha20 engine and render its trace as a step-by-step report
pub fn run_chacha20(
    plaintext: &str,
    key: &str,
    options: &ChaCha20Options,
    format: OutputFormat,
) -> Result<String> {
    let outcome = chacha20::run(plaintext.as_bytes(), key.as_bytes(), options)?;
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Text => Ok(render_text(plaintext, key, &outcome)),
    }
}

fn format_matrix(matrix: &[u32; 16]) -> String {
    let mut out = String::new();
    for row in 0..4 {
        out.push_str(&format!(
            "  [{:08x}, {:08x}, {:08x}, {:08x}]\n",
            matrix[row * 4],
            matrix[row * 4 + 1],
            matrix[row * 4 + 2],
            matrix[row * 4 + 3]
        ));
    }
    out
}

fn render_text(plaintext: &str, key: &str, outcome: &ChaCha20Outcome) -> String {
    let mut out = String::new();

    out.push_str("ChaCha20 Encryption - Step by Step\n");
    out.push_str("==================================\n\n");

    out.push_str("Setup:\n");
    out.push_str(&format!("  Plaintext: \"{}\"\n", plaintext));
    out.push_str(&format!(
        "  Key: \"{}\" (padded to 32 bytes: {})\n",
        key,
        hex::encode(&outcome.key)
    ));
    out.push_str(&format!(
        "  Nonce (padded to 12 bytes): {}\n",
        hex::encode(&outcome.nonce)
    ));
    out.push_str(&format!("  Counter: {}\n", outcome.counter));
    out.push_str("  Constant: \"expand 32-byte k\"\n\n");

    out.push_str("Initial state matrix (4x4):\n");
    out.push_str(&format_matrix(&outcome.initial));
    out.push_str("  Row 0: constants, rows 1-2: key, row 3: counter + nonce\n\n");

    out.push_str("Rounds (10 double rounds = 20 rounds)\n");
    out.push_str("-------------------------------------\n");
    for step in &outcome.rounds {
        out.push_str(&format!("Double round {} after column pass:\n", step.round));
        out.push_str(&format_matrix(&step.after_column));
        out.push_str(&format!("Double round {} after diagonal pass:\n", step.round));
        out.push_str(&format_matrix(&step.after_diagonal));
        out.push('\n');
    }

    out.push_str("State after 20 rounds:\n");
    out.push_str(&format_matrix(&outcome.mixed));
    out.push_str("\nKeystream matrix (state + initial, mod 2^32):\n");
    out.push_str(&format_matrix(&outcome.finalized));
    out.push_str(&format!(
        "\nKeystream block (64 bytes, little-endian):\n  {}\n\n",
        hex::encode(&outcome.block)
    ));

    out.push_str("Encryption (byte-wise XOR)\n");
    out.push_str("--------------------------\n");
    if plaintext.len() > 64 {
        out.push_str(
            "Note: plaintext is longer than 64 bytes; this demonstration reuses\n\
             the single keystream block instead of incrementing the counter.\n\n",
        );
    }
    for step in &outcome.xor_steps {
        out.push_str(&format!(
            "  index {:>3}: {:02x} XOR {:02x} = {:02x}\n",
            step.index, step.plaintext_byte, step.keystream_byte, step.ciphertext_byte
        ));
    }

    out.push_str("\nResults:\n");
    out.push_str(&format!("  Plaintext:  {}\n", hex::encode(plaintext.as_bytes())));
    out.push_str(&format!("  Keystream:  {}\n", hex::encode(&outcome.keystream)));
    out.push_str(&format!("  Ciphertext: {}\n", hex::encode(&outcome.ciphertext)));

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_report_contents() {
        let options = ChaCha20Options::default();
        let report = run_chacha20("Hi", "key", &options, OutputFormat::Text).unwrap();
        assert!(report.contains("Initial state matrix"));
        assert!(report.contains("State after 20 rounds"));
        assert!(report.contains("Keystream block (64 bytes"));
        assert!(report.contains("61707865"));
    }

    #[test]
    fn test_json_report_parses() {
        let options = ChaCha20Options { nonce: b"n".to_vec() };
        let report = run_chacha20("Hi", "key", &options, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&report).unwrap();
        assert_eq!(value["counter"], 1);
        assert_eq!(value["rounds"].as_array().unwrap().len(), 10);
        assert_eq!(value["block"].as_array().unwrap().len(), 64);
    }

    #[test]
    fn test_long_plaintext_notes_block_reuse() {
        let long = "x".repeat(80);
        let report =
            run_chacha20(&long, "key", &ChaCha20Options::default(), OutputFormat::Text).unwrap();
        assert!(report.contains("reuses"));
    }
}
