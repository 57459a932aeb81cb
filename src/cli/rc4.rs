use crate::cli::OutputFormat;
use crate::engine::rc4::{self, Rc4Options, Rc4Outcome};
use crate::error::Result;

/// Run the RC4 engine and render its trace as a step-by-step report
pub fn run_rc4(
    plaintext: &str,
    key: &str,
    options: &Rc4Options,
    format: OutputFormat,
) -> Result<String> {
    let outcome = rc4::run(plaintext.as_bytes(), key.as_bytes(), options)?;
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Text => Ok(render_text(plaintext, key, &outcome)),
    }
}

fn format_bytes(bytes: &[u8]) -> String {
    let values: Vec<String> = bytes.iter().map(|v| v.to_string()).collect();
    format!("[{}]", values.join(", "))
}

fn format_values(values: &[u32]) -> String {
    let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", values.join(", "))
}

fn render_text(plaintext: &str, key: &str, outcome: &Rc4Outcome) -> String {
    let n = outcome.state_size;
    let mut out = String::new();

    out.push_str("RC4 Encryption - Step by Step\n");
    out.push_str("=============================\n\n");

    out.push_str("Setup:\n");
    out.push_str(&format!("  Plaintext: \"{}\"\n", plaintext));
    out.push_str(&format!(
        "  ASCII values: {}\n",
        format_bytes(plaintext.as_bytes())
    ));
    out.push_str(&format!("  Key: \"{}\"\n", key));
    out.push_str(&format!("  Key ASCII: {}\n", format_bytes(key.as_bytes())));
    out.push_str(&format!("  State array size: {}\n\n", n));

    out.push_str("Key-Scheduling Algorithm (KSA)\n");
    out.push_str("------------------------------\n");
    out.push_str(&format!(
        "Initial: S = {}, j = 0\n\n",
        format_values(&outcome.initial_state)
    ));
    for step in &outcome.ksa {
        out.push_str(&format!("KSA iteration {} (i = {}):\n", step.i + 1, step.i));
        out.push_str(&format!(
            "  j = (j + S[{}] + K[{}]) mod {} = {}\n",
            step.i,
            step.i % key.len(),
            n,
            step.j
        ));
        out.push_str(&format!("  swap S[{}] <-> S[{}]\n", step.i, step.j));
        out.push_str(&format!("  before: S = {}\n", format_values(&step.state_before)));
        out.push_str(&format!("  after:  S = {}\n", format_values(&step.state_after)));
    }
    out.push_str(&format!(
        "\nKSA result: S = {}\n\n",
        format_values(&outcome.scheduled_state)
    ));

    out.push_str("Pseudo-Random Generation Algorithm (PRGA)\n");
    out.push_str("-----------------------------------------\n");
    out.push_str("Initial: i = 0, j = 0 (S carried over from KSA)\n\n");
    for step in &outcome.prga {
        out.push_str(&format!(
            "Step {}: encrypt byte '{}' ({})\n",
            step.index + 1,
            printable(step.plaintext_byte),
            step.plaintext_byte
        ));
        out.push_str(&format!(
            "  i = (i + 1) mod {} = {}\n  j = (j + S[i]) mod {} = {}\n",
            n, step.i, n, step.j
        ));
        out.push_str(&format!("  swap S[{}] <-> S[{}]\n", step.i, step.j));
        out.push_str(&format!("  before: S = {}\n", format_values(&step.state_before)));
        out.push_str(&format!("  after:  S = {}\n", format_values(&step.state_after)));
        out.push_str(&format!(
            "  t = (S[{}] + S[{}]) mod {} = {}\n",
            step.i, step.j, n, step.t
        ));
        out.push_str(&format!("  keystream byte = S[{}] = {}\n", step.t, step.keystream));
        out.push_str(&format!(
            "  ciphertext byte = {} XOR {} = {}\n",
            step.plaintext_byte, step.keystream, step.ciphertext
        ));
    }
    out.push('\n');

    out.push_str("XOR Analysis (bit level)\n");
    out.push_str("------------------------\n");
    for step in &outcome.prga {
        out.push_str(&format!(
            "Byte {}:  plaintext {:>3} = {:08b}\n",
            step.index + 1,
            step.plaintext_byte,
            step.plaintext_byte
        ));
        out.push_str(&format!(
            "         keystream {:>3} = {:08b}\n",
            step.keystream, step.keystream
        ));
        out.push_str(&format!(
            "        ciphertext {:>3} = {:08b}\n\n",
            step.ciphertext, step.ciphertext
        ));
    }

    out.push_str("Results:\n");
    out.push_str(&format!("  Plaintext:  \"{}\"\n", plaintext));
    out.push_str(&format!("  Keystream:  {}\n", format_values(&outcome.keystream)));
    out.push_str(&format!("  Ciphertext: {}\n", format_values(&outcome.ciphertext)));

    out.push_str("\nVerification (decryption):\n");
    out.push_str(&format!(
        "  Ciphertext XOR keystream = {}\n",
        format_bytes(&outcome.recovered)
    ));
    let recovered_text = String::from_utf8_lossy(&outcome.recovered);
    let check = if outcome.recovered == plaintext.as_bytes() {
        "OK"
    } else {
        "MISMATCH"
    };
    out.push_str(&format!("  Recovered: \"{}\" [{}]\n", recovered_text, check));

    out
}

fn printable(byte: u8) -> char {
    if byte.is_ascii_graphic() || byte == b' ' {
        byte as char
    } else {
        '.'
    }
}
