// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic-security admin CLI
//!
//! Applies admin command payloads to a dynamic-security state file and
//! inspects the default ACL access policy.
//!
//! # Usage
//!
//! ```bash
//! # Apply a command payload ({"commands": [...]})
//! dynsec --state dynamic-security.json apply --commands set-defaults.json
//!
//! # Show the current default access
//! dynsec --state dynamic-security.json show
//!
//! # Fallback decision for one action class
//! dynsec --state dynamic-security.json check --acltype subscribe
//!
//! # Using a configuration file
//! dynsec --config dynsec.toml show
//! ```

use clap::{Parser, Subcommand};
use dynsec::{
    AccessEvaluator, AccessRequest, AclType, CommandContext, CommandDispatcher, DecisionSource,
    DefaultAccessStore, DefaultAclGateway, DynsecConfig, DynsecError, JsonFilePersistence,
    MemoryPersistence, PolicyPersistence, Responses, TracingAuditSink,
};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Dynamic-security admin tool
#[derive(Parser, Debug)]
#[command(name = "dynsec")]
#[command(about = "Dynamic-security default ACL access administration")]
#[command(version)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// State file (overrides the configuration)
    #[arg(short, long)]
    state: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply an admin command payload and print the replies
    Apply {
        /// JSON file containing {"commands": [...]}
        #[arg(long)]
        commands: PathBuf,

        /// Do not write the state file
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the getDefaultACLAccess reply
    Show,

    /// Print the fallback decision for an action class
    Check {
        /// publishClientSend, publishClientReceive, subscribe or unsubscribe
        #[arg(long)]
        acltype: String,

        /// Topic recorded in the request
        #[arg(long, default_value = "#")]
        topic: String,
    },

    /// Generate example configuration file
    GenConfig {
        /// Output file path
        #[arg(short, long, default_value = "dynsec.toml")]
        output: PathBuf,
    },

    /// Validate a configuration file
    Validate {
        /// Configuration file path
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = build_config(&args)?;

    // Initialize logging (stdout carries command output)
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Commands::Apply { commands, dry_run } => cmd_apply(&config, commands, dry_run),
        Commands::Show => cmd_show(&config),
        Commands::Check { acltype, topic } => cmd_check(&config, &acltype, topic),
        Commands::GenConfig { output } => cmd_gen_config(output),
        Commands::Validate { config } => cmd_validate(config),
    }
}

fn build_config(args: &Args) -> Result<DynsecConfig, Box<dyn std::error::Error>> {
    let mut config = match args.config {
        Some(ref path) => DynsecConfig::from_file(path)?,
        None => DynsecConfig::default(),
    };

    if let Some(ref state) = args.state {
        config.state_file = state.clone();
    }
    if let Some(ref level) = args.log_level {
        config.log_level = level.clone();
    }

    config.validate()?;
    Ok(config)
}

fn admin_context(config: &DynsecConfig) -> CommandContext {
    CommandContext::new(config.admin_client_id.clone(), config.admin_username.clone())
}

fn load_store(persistence: &JsonFilePersistence) -> Result<Arc<DefaultAccessStore>, DynsecError> {
    let access = persistence.load()?;
    tracing::info!(
        "Loaded default ACL access from '{}'",
        persistence.path().display()
    );
    Ok(Arc::new(DefaultAccessStore::with_access(access)))
}

fn run_payload<P: PolicyPersistence + 'static>(
    store: Arc<DefaultAccessStore>,
    persistence: P,
    ctx: &CommandContext,
    payload: &[u8],
) -> Result<Responses, DynsecError> {
    let mut dispatcher = CommandDispatcher::new();
    dispatcher.register(Arc::new(DefaultAclGateway::new(
        store,
        persistence,
        TracingAuditSink,
    )));
    dispatcher.handle_payload(ctx, payload)
}

fn cmd_apply(
    config: &DynsecConfig,
    commands: PathBuf,
    dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let payload = std::fs::read(&commands)?;
    let persistence = JsonFilePersistence::new(&config.state_file);
    let store = load_store(&persistence)?;
    let ctx = admin_context(config);

    let responses = if dry_run {
        tracing::info!("Dry run: state file will not be written");
        run_payload(store, MemoryPersistence::new(), &ctx, &payload)?
    } else {
        run_payload(store, persistence, &ctx, &payload)?
    };

    println!("{}", serde_json::to_string_pretty(&responses)?);

    let failed = responses.responses.iter().filter(|r| !r.is_success()).count();
    if failed > 0 {
        eprintln!("{} of {} commands failed", failed, responses.responses.len());
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_show(config: &DynsecConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = load_store(&JsonFilePersistence::new(&config.state_file))?;
    let gateway = DefaultAclGateway::new(store, MemoryPersistence::new(), TracingAuditSink);

    let reply = gateway.get_default_acl_access(&admin_context(config), &Value::Null);
    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}

fn cmd_check(
    config: &DynsecConfig,
    acltype: &str,
    topic: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let acl_type = AclType::from_name(acltype).ok_or_else(|| {
        DynsecError::InvalidArgument(format!("Unknown acltype '{}'", acltype))
    })?;

    let store = load_store(&JsonFilePersistence::new(&config.state_file))?;
    let evaluator = AccessEvaluator::new(store);
    let decision = evaluator.evaluate(&AccessRequest::new(acl_type, topic));

    let source = match decision.source {
        DecisionSource::Layer(name) => name,
        DecisionSource::DefaultAccess => "default access".to_string(),
    };
    println!(
        "{}: {} ({})",
        acl_type,
        if decision.allowed { "allow" } else { "deny" },
        source
    );
    Ok(())
}

fn cmd_gen_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = DynsecConfig {
        admin_client_id: Some("dynsec-cli".into()),
        admin_username: Some("admin".into()),
        ..Default::default()
    };

    let toml_str = toml::to_string_pretty(&config)?;

    let content = format!(
        r#"# Dynamic-security configuration
# Generated by dynsec gen-config

{}
"#,
        toml_str
    );

    std::fs::write(&output, content)?;
    println!("Generated configuration file: {}", output.display());
    Ok(())
}

fn cmd_validate(config_path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    match DynsecConfig::from_file(&config_path) {
        Ok(config) => {
            println!("Configuration valid!");
            println!();
            println!("State file: {}", config.state_file.display());
            println!("Log level: {}", config.log_level);
            println!(
                "Admin: {}/{}",
                config.admin_client_id.as_deref().unwrap_or("<none>"),
                config.admin_username.as_deref().unwrap_or("<none>")
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("Configuration invalid: {}", e);
            std::process::exit(1);
        }
    }
}
