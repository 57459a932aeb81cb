use std::error::Error;
use std::process::{Command, Output};

fn cipherscope_command() -> Command {
    Command::new(env!("CARGO_BIN_EXE_cipherscope"))
}

fn run(args: &[&str]) -> Result<Output, Box<dyn Error>> {
    Ok(cipherscope_command().args(args).output()?)
}

#[test]
fn cli_vigenere_classic_vector() -> Result<(), Box<dyn Error>> {
    let out = run(&["vigenere", "--key", "LEMON", "Attack at Dawn"])?;
    assert!(
        out.status.success(),
        "vigenere command failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    let stdout = String::from_utf8(out.stdout)?;
    assert!(stdout.contains("Lxfopv ef Rnhr"), "missing ciphertext");
    assert!(stdout.contains("Processed key: LEMON"));

    // Decrypting the ciphertext restores the original
    let back = run(&["vigenere", "--key", "LEMON", "--mode", "d", "Lxfopv ef Rnhr"])?;
    assert!(back.status.success());
    let back_stdout = String::from_utf8(back.stdout)?;
    assert!(back_stdout.contains("Attack at Dawn"));
    Ok(())
}

#[test]
fn cli_rc4_small_state_walkthrough() -> Result<(), Box<dyn Error>> {
    let out = run(&["rc4", "--key", "KEY", "--state-size", "4", "Hi"])?;
    assert!(
        out.status.success(),
        "rc4 command failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    let stdout = String::from_utf8(out.stdout)?;
    assert!(stdout.contains("Key-Scheduling Algorithm"));
    assert!(stdout.contains("State array size: 4"));
    assert!(stdout.contains("Recovered: \"Hi\" [OK]"));
    Ok(())
}

#[test]
fn cli_rc4_rejects_zero_state_size() -> Result<(), Box<dyn Error>> {
    let out = run(&["rc4", "--key", "KEY", "--state-size", "0", "Hi"])?;
    assert!(!out.status.success(), "zero state size must fail");
    let stderr = String::from_utf8(out.stderr)?;
    assert!(stderr.contains("Invalid parameter"), "stderr: {}", stderr);
    Ok(())
}

#[test]
fn cli_rc4_rejects_non_numeric_state_size() -> Result<(), Box<dyn Error>> {
    let out = run(&["rc4", "--key", "KEY", "--state-size", "abc", "Hi"])?;
    assert!(!out.status.success(), "non-numeric state size must fail");
    Ok(())
}

#[test]
fn cli_chacha20_json_output() -> Result<(), Box<dyn Error>> {
    let out = run(&["chacha20", "--key", "my key", "--format", "json", "Hello"])?;
    assert!(
        out.status.success(),
        "chacha20 command failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    let value: serde_json::Value = serde_json::from_slice(&out.stdout)?;
    assert_eq!(value["counter"], 1);
    assert_eq!(value["rounds"].as_array().unwrap().len(), 10);
    assert_eq!(value["ciphertext"].as_array().unwrap().len(), 5);
    Ok(())
}

#[test]
fn cli_empty_plaintext_fails() -> Result<(), Box<dyn Error>> {
    let out = run(&["chacha20", "--key", "key", ""])?;
    assert!(!out.status.success(), "empty plaintext must fail");
    let stderr = String::from_utf8(out.stderr)?;
    assert!(stderr.contains("Empty input"), "stderr: {}", stderr);
    Ok(())
}

#[test]
fn cli_vigenere_letterless_key_degrades_to_noop() -> Result<(), Box<dyn Error>> {
    let out = run(&["vigenere", "--key", "1234", "Attack"])?;
    assert!(
        out.status.success(),
        "letterless key is a reported fallback, not a crash"
    );
    let stdout = String::from_utf8(out.stdout)?;
    assert!(stdout.contains("Invalid key"));
    assert!(stdout.contains("Output (unchanged): Attack"));
    Ok(())
}

#[test]
fn cli_version_flag() -> Result<(), Box<dyn Error>> {
    let out = run(&["-V"])?;
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout)?;
    assert!(stdout.starts_with("cipherscope "));
    Ok(())
}
