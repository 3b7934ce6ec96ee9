//! Cryptainer CLI - Password-based file encryption
//!
//! Command-line interface for encrypting files into self-describing
//! containers (PBKDF2-HMAC-SHA256 key derivation, AES-256-GCM) and
//! decrypting them back under their original filename.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use cryptainer::file_ops;
use cryptainer::password::{PasswordReader, ReaderPasswordReader, TerminalPasswordReader};

#[derive(Parser)]
#[command(name = "cryptainer")]
#[command(version)]
#[command(about = "Password-based file encryption.", long_about = None)]
struct Cli {
    /// Read password from stdin instead of from terminal
    #[arg(long, global = true)]
    password_stdin: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a file into a container
    #[command(alias = "e")]
    Encrypt {
        /// Path to the file whose contents is to be encrypted
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Path to write the container to (default: <input stem>_encrypted.enc)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Decrypt a container, restoring the original filename
    #[command(alias = "d")]
    Decrypt {
        /// Path to the container to decrypt
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Directory to write the recovered file into
        #[arg(short = 'd', long, value_name = "DIR", default_value = ".")]
        output_dir: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Encrypt { input, output } => {
            let output = output.unwrap_or_else(|| file_ops::default_output_name(&input));
            let mut reader = get_password_reader(cli.password_stdin);
            file_ops::encrypt_file(&input, &output, &mut *reader)
        }
        Commands::Decrypt { input, output_dir } => {
            let mut reader = get_password_reader(cli.password_stdin);
            file_ops::decrypt_file(&input, &output_dir, &mut *reader).map(|written| {
                println!("{}", written.display());
            })
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn get_password_reader(use_stdin: bool) -> Box<dyn PasswordReader> {
    if use_stdin {
        Box::new(ReaderPasswordReader::new(Box::new(std::io::stdin())))
    } else {
        Box::new(TerminalPasswordReader)
    }
}
