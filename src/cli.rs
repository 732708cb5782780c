//! CLI struct definitions for the nfd-strategy-choice command-line interface.
//!
//! All clap-derived types live here. Dispatch lives in `lib.rs`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "nfd-strategy-choice",
    version = env!("CARGO_PKG_VERSION"),
    about = "Strategy-choice table and its signed management commands for a name-based forwarder."
)]
pub(crate) struct Cli {
    /// Forwarder configuration (TOML). Defaults apply when the file is missing.
    #[clap(long, global = true, default_value = "nfd.toml")]
    pub config: PathBuf,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Read hex-encoded command Interests from stdin, one per line, and print each response
    Run(RunCli),
    /// Build a signed strategy-choice command and print it as hex
    Sign(SignCli),
    /// Print the Ed25519 public key for a secret key, for use in `[[validator.rule]]`
    PublicKey {
        /// Secret key, 64 hex digits.
        #[clap(long)]
        secret_key: String,
    },
    /// List installed strategies and the default table
    Strategies {
        /// Output format: 'text' or 'json'.
        #[clap(long, default_value = "text")]
        format: String,
    },
}

#[derive(clap::Args, Debug)]
pub(crate) struct RunCli {
    /// Output format: 'text' or 'json'.
    #[clap(long, default_value = "text")]
    pub format: String,
    /// Print the effective strategy table after stdin is exhausted.
    #[clap(long)]
    pub show_table: bool,
}

#[derive(clap::Args, Debug)]
pub(crate) struct SignCli {
    /// Command verb: 'set' or 'unset'.
    pub verb: String,
    /// Name prefix the command applies to.
    pub prefix: String,
    /// Strategy name; required by 'set'.
    pub strategy: Option<String>,
    /// Secret key, 64 hex digits.
    #[clap(long)]
    pub secret_key: String,
    /// Certificate name placed in the KeyLocator.
    #[clap(long)]
    pub certificate: String,
}
