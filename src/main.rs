use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use serde_json::Value;

use authorizator::logging;
use authorizator::{Arguments, AuthorizatorConfig, PolicyDocument};

/// Check a permission against a JSON policy document
#[derive(Debug, Parser)]
#[command(name = "authorizator", version)]
struct Cli {
    /// Policy document (JSON)
    document: PathBuf,

    /// Permission to check; may be a compound name such as `read_and_not_banned`
    #[arg(required_unless_present = "list")]
    permission: Option<String>,

    /// Arguments as KEY=VALUE; VALUE is parsed as JSON, falling back to a string
    #[arg(value_parser = parse_argument)]
    args: Vec<(String, Value)>,

    /// Grant if any predicate of the policy grants
    #[arg(long)]
    any: bool,

    /// List the permission names defined by the document
    #[arg(long)]
    list: bool,
}

fn parse_argument(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let document = PolicyDocument::load(&cli.document)
        .with_context(|| format!("failed to load {}", cli.document.display()))?;
    let authorizator = AuthorizatorConfig::from_document(document).build();

    if cli.list {
        for name in authorizator.policies().names() {
            println!("{}", name);
        }
        return Ok(true);
    }

    let permission = cli.permission.context("no permission given")?;
    let args: Arguments = cli.args.into_iter().collect();

    let allowed = if cli.any {
        authorizator.is_allowed_any(&permission, &args)?
    } else {
        authorizator.is_allowed(&permission, &args)?
    };

    if allowed {
        println!("{} {}", "allowed".green().bold(), permission);
    } else {
        println!("{} {}", "denied".red().bold(), permission);
    }

    Ok(allowed)
}

fn main() -> ExitCode {
    if let Err(e) = logging::init_logging() {
        eprintln!("{}", e);
    }

    let cli = Cli::parse();
    tracing::debug!("{:?}", cli);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::from(2)
        }
    }
}
