use cipherscope::cli::{run_chacha20, run_rc4, run_vigenere, OutputFormat};
use cipherscope::engine::{ChaCha20Options, Mode, Rc4Options, VigenereOptions};
use clap::{Parser, Subcommand};
use std::process::ExitCode;

/// Version info from build.rs
const VERSION: &str = env!("CIPHERSCOPE_VERSION");
const BUILD: &str = env!("CIPHERSCOPE_BUILD");
const PROFILE: &str = env!("CIPHERSCOPE_PROFILE");
const GIT_HASH: &str = env!("CIPHERSCOPE_GIT_HASH");

/// Combined version string (compile-time concatenation not possible, so we build at runtime)
fn get_version() -> &'static str {
    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} {} build {} ({})", PROFILE, VERSION, BUILD, GIT_HASH))
}

#[derive(Parser)]
#[command(name = "cipherscope")]
#[command(author, about = "Step-by-step visualizer for RC4, ChaCha20 and Vigenère", long_about = None)]
struct Cli {
    /// Print version
    #[arg(short = 'V', long)]
    version: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk through the RC4 key schedule and keystream generation
    #[command(alias = "r")]
    Rc4 {
        /// Encryption key
        #[arg(long, required = true)]
        key: String,

        /// State array size (e.g. 4 for a demonstration, 256 for the real cipher)
        #[arg(long, default_value = "256", value_parser = parse_state_size)]
        state_size: usize,

        /// Output format
        #[arg(long, default_value = "text", value_parser = parse_format)]
        format: OutputFormat,

        /// Text to encrypt
        plaintext: String,
    },

    /// Walk through the ChaCha20 state matrix and ARX rounds
    #[command(alias = "c")]
    Chacha20 {
        /// Encryption key (zero-padded to 32 bytes)
        #[arg(long, required = true)]
        key: String,

        /// Nonce (zero-padded to 12 bytes, default all zeros)
        #[arg(long, default_value = "")]
        nonce: String,

        /// Output format
        #[arg(long, default_value = "text", value_parser = parse_format)]
        format: OutputFormat,

        /// Text to encrypt
        plaintext: String,
    },

    /// Walk through the Vigenère polyalphabetic substitution
    #[command(alias = "v")]
    Vigenere {
        /// Keyword (letters only; other characters are stripped)
        #[arg(long, required = true)]
        key: String,

        /// Mode: e/encrypt or d/decrypt
        #[arg(long, default_value = "e", value_parser = parse_mode)]
        mode: Mode,

        /// Drop spaces and punctuation instead of copying them through
        #[arg(long)]
        drop_non_letters: bool,

        /// Output format
        #[arg(long, default_value = "text", value_parser = parse_format)]
        format: OutputFormat,

        /// Text to transform
        text: String,
    },
}

fn parse_state_size(s: &str) -> Result<usize, String> {
    s.parse::<usize>()
        .map_err(|_| format!("state size must be a positive number, got {:?}", s))
}

fn parse_mode(s: &str) -> Result<Mode, String> {
    s.parse().map_err(|e| format!("{}", e))
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    s.parse().map_err(|e| format!("{}", e))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Handle --version flag
    if cli.version {
        println!("cipherscope {}", get_version());
        return ExitCode::SUCCESS;
    }

    // Require a command if not showing version
    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            // Show help when no command provided
            use clap::CommandFactory;
            Cli::command().print_help().unwrap();
            println!();
            return ExitCode::SUCCESS;
        }
    };

    let result = match command {
        Commands::Rc4 {
            key,
            state_size,
            format,
            plaintext,
        } => run_rc4(&plaintext, &key, &Rc4Options { state_size }, format),

        Commands::Chacha20 {
            key,
            nonce,
            format,
            plaintext,
        } => run_chacha20(
            &plaintext,
            &key,
            &ChaCha20Options {
                nonce: nonce.into_bytes(),
            },
            format,
        ),

        Commands::Vigenere {
            key,
            mode,
            drop_non_letters,
            format,
            text,
        } => run_vigenere(
            &text,
            &key,
            &VigenereOptions {
                mode,
                preserve_non_letters: !drop_non_letters,
            },
            format,
        ),
    };

    match result {
        Ok(report) => {
            print!("{}", report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
