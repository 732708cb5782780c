//! nfd-strategy-choice: the strategy-choice control plane of a name-based forwarder.
//!
//! Every name prefix in the forwarder resolves to exactly one forwarding
//! strategy by longest-prefix match over a table of assignments. The root prefix
//! always carries one. Operators change the table with signed command Interests:
//!
//! ```text
//! /localhost/nfd/strategy-choice/set/<ControlParameters>/<timestamp>/<random>/<SignatureInfo>/<SignatureValue>
//! ```
//!
//! and receive a Data named like the command, whose content is a ControlResponse
//! (status code, status text, and on success the echoed parameters).
//!
//! # Crate Structure
//!
//! - [`core`]: wire codec, names, name tree, strategy table, authorization, manager
//! - [`plugins`]: built-in forwarding strategies
//! - [`subsystems`]: the table of built-in strategies installed at startup
//!
//! # Examples
//!
//! ```bash
//! # Public key for the operator's secret, to paste into nfd.toml
//! nfd-strategy-choice public-key --secret-key <hex>
//!
//! # Sign a command and feed it to the forwarder
//! nfd-strategy-choice sign set /example /localhost/nfd/strategy/broadcast \
//!     --secret-key <hex> --certificate /operator/KEY/ksk-1/ID-CERT \
//!   | nfd-strategy-choice run --show-table
//! ```

pub mod core;
pub mod plugins;
pub mod subsystems;

mod cli;

use crate::cli::{Cli, Command, RunCli, SignCli};
use crate::core::config::Config;
use crate::core::control::{ControlParameters, ControlResponse};
use crate::core::error::NfdError;
use crate::core::forwarder::Forwarder;
use crate::core::manager::{MODULE_COMPONENT, Verb};
use crate::core::name::{Component, Name};
use crate::core::packet::{Data, Interest};
use crate::core::security::{CommandInterestGenerator, Signer25519};
use crate::core::strategy_choice::StrategyChoice;
use crate::core::time;
use clap::Parser;
use colored::Colorize;
use std::io::BufRead;

pub fn run() -> Result<(), NfdError> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let config = Config::load(&cli.config)?;

    match cli.command {
        Command::Run(args) => run_commands(&config, &args),
        Command::Sign(args) => sign_command(&config, &args),
        Command::PublicKey { secret_key } => {
            let signer = Signer25519::from_secret_hex(Name::root(), &secret_key)?;
            println!("{}", hex::encode(signer.certificate.public_key.as_bytes()));
            Ok(())
        }
        Command::Strategies { format } => {
            let table = subsystems::builtin_table(&config.default_strategy()?)?;
            print_table(&table, &format, true);
            Ok(())
        }
    }
}

fn run_commands(config: &Config, args: &RunCli) -> Result<(), NfdError> {
    let forwarder = Forwarder::from_config(config)?;
    log::info!(
        "accepting commands under {}",
        forwarder.manager().command_prefix()
    );

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let interest = match hex::decode(line)
            .map_err(NfdError::from)
            .and_then(|wire| Interest::wire_decode(&wire))
        {
            Ok(interest) => interest,
            Err(e) => {
                report_input_error(&args.format, &e);
                continue;
            }
        };
        let name = interest.name.clone();
        let responses = forwarder.process(interest);
        if responses.is_empty() {
            report_input_error(
                &args.format,
                &NfdError::NotFound(format!("no handler for {}", name)),
            );
        }
        for data in &responses {
            print_response(&args.format, data)?;
        }
    }

    if args.show_table {
        print_table(&forwarder.table().borrow(), &args.format, false);
    }
    Ok(())
}

fn report_input_error(format: &str, error: &NfdError) {
    if format == "json" {
        let envelope =
            time::command_envelope("run", "error", serde_json::json!({ "error": error.to_string() }));
        println!("{}", envelope);
    } else {
        eprintln!("{} {}", "skipped:".yellow(), error);
    }
}

fn print_response(format: &str, data: &Data) -> Result<(), NfdError> {
    let response = ControlResponse::wire_decode(&data.content)?;
    if format == "json" {
        let envelope = time::command_envelope(
            "run",
            "ok",
            serde_json::json!({ "name": data.name.to_string(), "response": response }),
        );
        println!("{}", envelope);
        return Ok(());
    }

    let code = match response.code {
        200..=299 => response.code.to_string().green().bold(),
        400..=499 => response.code.to_string().yellow().bold(),
        _ => response.code.to_string().red().bold(),
    };
    println!("{} {}", code, response.text);
    if let Some(body) = &response.body {
        if let Ok(params) = ControlParameters::wire_decode(body) {
            if let Some(name) = &params.name {
                println!("  name:     {}", name);
            }
            if let Some(strategy) = &params.strategy {
                println!("  strategy: {}", strategy);
            }
        }
    }
    Ok(())
}

fn print_table(table: &StrategyChoice, format: &str, with_registry: bool) {
    let entries = table.entries();
    let default_strategy = table.get_default().name().clone();
    if format == "json" {
        let rows: Vec<_> = entries
            .iter()
            .map(|(prefix, strategy)| {
                serde_json::json!({ "prefix": prefix.to_string(), "strategy": strategy.to_string() })
            })
            .collect();
        let mut extra = serde_json::json!({
            "default": default_strategy.to_string(),
            "entries": rows,
        });
        if with_registry {
            extra["installed"] = table
                .registry()
                .names()
                .iter()
                .map(|name| serde_json::Value::String(name.to_string()))
                .collect();
        }
        println!("{}", time::command_envelope("strategies", "ok", extra));
        return;
    }

    if with_registry {
        println!("{}", "Installed strategies".bold());
        for name in table.registry().names() {
            let marker = if name == default_strategy { "*" } else { " " };
            println!(" {} {}", marker.green(), name);
        }
        println!();
    }
    println!("{}", "Strategy choice".bold());
    for (prefix, strategy) in entries {
        println!("  {:<32} {}", prefix.to_string().cyan(), strategy);
    }
}

fn sign_command(config: &Config, args: &SignCli) -> Result<(), NfdError> {
    let verb = Verb::parse(&Component::from(args.verb.as_str()))
        .ok_or_else(|| NfdError::Config(format!("unknown verb '{}'", args.verb)))?;
    let prefix: Name = args.prefix.parse()?;
    let mut params = ControlParameters::new().with_name(prefix);
    if let Some(strategy) = &args.strategy {
        params = params.with_strategy(strategy.parse()?);
    }

    let name = config
        .management_prefix()?
        .append(MODULE_COMPONENT)
        .append(verb.as_str())
        .append(Component::new(params.wire_encode()));
    let certificate: Name = args.certificate.parse()?;
    let signer = Signer25519::from_secret_hex(certificate, &args.secret_key)?;

    let mut interest = Interest::new(name);
    CommandInterestGenerator::new().generate(&mut interest, &signer);
    println!("{}", hex::encode(interest.wire_encode()));
    Ok(())
}
