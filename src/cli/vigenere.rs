use crate::cli::OutputFormat;
use crate::engine::vigenere::{self, Mode, VigenereOptions, VigenereOutcome, VigenereStep, ALPHABET};
use crate::error::{CipherscopeError, Result};

/// Run the Vigenère engine and render its trace as a step-by-step report.
///
/// A key without any letters is reported as an error, and the input is
/// echoed unchanged: the documented no-op fallback lives here in the
/// presentation layer, the engine itself returns the structured error.
pub fn run_vigenere(
    text: &str,
    key: &str,
    options: &VigenereOptions,
    format: OutputFormat,
) -> Result<String> {
    match vigenere::run(text, key, options) {
        Ok(outcome) => match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&outcome)?),
            OutputFormat::Text => Ok(render_text(text, key, options, &outcome)),
        },
        Err(CipherscopeError::InvalidKey(message)) => match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "error": format!("Invalid key: {}", message),
                "output": text,
            }))?),
            OutputFormat::Text => Ok(format!(
                "Error: Invalid key: {}\nOutput (unchanged): {}\n",
                message, text
            )),
        },
        Err(e) => Err(e),
    }
}

fn render_text(
    text: &str,
    key: &str,
    options: &VigenereOptions,
    outcome: &VigenereOutcome,
) -> String {
    let mut out = String::new();

    out.push_str("Vigenère Cipher - Polyalphabetic Substitution\n");
    out.push_str("=============================================\n\n");

    let (input_label, output_label) = match outcome.mode {
        Mode::Encrypt => ("Plaintext", "Ciphertext"),
        Mode::Decrypt => ("Ciphertext", "Plaintext"),
    };

    out.push_str("Setup:\n");
    out.push_str(&format!("  Mode: {:?}\n", outcome.mode));
    out.push_str(&format!("  {}: \"{}\"\n", input_label, text));
    out.push_str(&format!("  Key: \"{}\"\n", key));
    out.push_str(&format!("  Processed key: {}\n", outcome.cleaned_key));
    out.push_str(&format!(
        "  Alphabet: {}\n",
        std::str::from_utf8(ALPHABET).unwrap()
    ));
    out.push_str(&format!(
        "  Preserve non-letters: {}\n\n",
        if options.preserve_non_letters { "yes" } else { "no" }
    ));

    // Key repetition pattern: the key advances only under letters
    out.push_str("Key repetition pattern:\n");
    let mut input_line = String::new();
    let mut key_line = String::new();
    for step in &outcome.steps {
        match step {
            VigenereStep::Substituted {
                input, key_char, ..
            } => {
                input_line.push(input.to_ascii_uppercase());
                key_line.push(*key_char);
            }
            VigenereStep::Preserved { ch, .. } => {
                input_line.push(*ch);
                key_line.push(' ');
            }
            VigenereStep::Dropped { .. } => {}
        }
    }
    out.push_str(&format!("  Input: {}\n", input_line));
    out.push_str(&format!("  Key:   {}\n\n", key_line));

    out.push_str("Character transformation:\n");
    let operation = match outcome.mode {
        Mode::Encrypt => "+",
        Mode::Decrypt => "-",
    };
    for step in &outcome.steps {
        match step {
            VigenereStep::Substituted {
                index,
                input,
                input_pos,
                key_char,
                key_pos,
                output,
                output_pos,
            } => {
                out.push_str(&format!(
                    "  {:>3}: '{}' ({:>2}) {} '{}' ({:>2}) mod 26 = {:>2} -> '{}'\n",
                    index + 1,
                    input,
                    input_pos,
                    operation,
                    key_char,
                    key_pos,
                    output_pos,
                    output
                ));
            }
            VigenereStep::Preserved { index, ch } => {
                out.push_str(&format!("  {:>3}: '{}' (preserved)\n", index + 1, ch));
            }
            VigenereStep::Dropped { index, ch } => {
                out.push_str(&format!("  {:>3}: '{}' (dropped)\n", index + 1, ch));
            }
        }
    }

    out.push_str("\nResults:\n");
    out.push_str(&format!("  {}: \"{}\"\n", input_label, text));
    out.push_str(&format!("  Key used: \"{}\"\n", outcome.cleaned_key));
    out.push_str(&format!("  {}: \"{}\"\n", output_label, outcome.output));

    out.push_str("\nVerification:\n");
    match outcome.mode {
        Mode::Encrypt => out.push_str(&format!(
            "  To decrypt, run mode d with key \"{}\" on \"{}\"\n",
            outcome.cleaned_key, outcome.output
        )),
        Mode::Decrypt => out.push_str(&format!(
            "  To encrypt back, run mode e with key \"{}\" on \"{}\"\n",
            outcome.cleaned_key, outcome.output
        )),
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_report_contents() {
        let options = VigenereOptions::default();
        let report = run_vigenere("Attack at Dawn", "LEMON", &options, OutputFormat::Text).unwrap();
        assert!(report.contains("Processed key: LEMON"));
        assert!(report.contains("Ciphertext: \"Lxfopv ef Rnhr\""));
        assert!(report.contains("Key repetition pattern"));
    }

    #[test]
    fn test_json_report_parses() {
        let options = VigenereOptions::default();
        let report = run_vigenere("Hi!", "key", &options, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&report).unwrap();
        assert_eq!(value["cleaned_key"], "KEY");
        assert_eq!(value["steps"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_invalid_key_falls_back_to_noop() {
        let options = VigenereOptions::default();
        let report = run_vigenere("Attack", "123", &options, OutputFormat::Text).unwrap();
        assert!(report.contains("Error: Invalid key"));
        assert!(report.contains("Output (unchanged): Attack"));
    }

    #[test]
    fn test_empty_input_still_errors() {
        let options = VigenereOptions::default();
        assert!(run_vigenere("", "key", &options, OutputFormat::Text).is_err());
    }
}
