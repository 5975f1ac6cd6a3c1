//! CLI entrypoint for parley
//!
//! This is the main binary that wires together all layers using
//! dependency injection: config -> vault/gateway/stores -> use cases.

mod chat;
mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Command, KeyAction};
use colored::Colorize;
use parley_application::{
    ChatLog, ConverseInput, ConverseUseCase, CredentialValidator, ListModelsError,
    ListModelsUseCase, ManageCredentialError, ManageCredentialUseCase, NoChatLog, SessionStore,
};
use parley_domain::ModelId;
use parley_infrastructure::{
    AesGcmVault, ConfigLoader, GroqGateway, InMemoryAccountStore, JsonlChatLog,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match args.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Master key generation needs no further wiring
    if let Command::Key {
        action: KeyAction::GenerateMasterKey,
    } = &args.command
    {
        println!("{}", AesGcmVault::generate_master_key());
        return Ok(());
    }

    let config =
        ConfigLoader::load(args.config.as_ref()).context("could not load configuration")?;

    // === Dependency Injection ===
    // Configuration problems with the vault are fatal here, never per-request.
    let master_key = config.master_key()?;
    let vault = Arc::new(AesGcmVault::from_base64_key(master_key)?);

    let gateway = Arc::new(GroqGateway::with_base_url(&config.provider.base_url));
    let accounts = Arc::new(InMemoryAccountStore::new());
    let sessions = Arc::new(match config.sessions.max_sessions {
        Some(cap) => SessionStore::bounded(cap),
        None => SessionStore::new(),
    });

    let chat_log: Arc<dyn ChatLog> = match &config.log.chat_log_path {
        Some(path) => match JsonlChatLog::new(path) {
            Some(log) => Arc::new(log),
            None => Arc::new(NoChatLog),
        },
        None => Arc::new(NoChatLog),
    };

    let params = config.chat_params();
    let probe_timeout = params.probe_timeout;

    let converse = ConverseUseCase::new(
        gateway.clone(),
        vault.clone(),
        accounts.clone(),
        sessions.clone(),
    )
    .with_params(params)
    .with_chat_log(chat_log)
    .with_default_credential(config.provider.default_api_key.clone());

    let manage = ManageCredentialUseCase::new(
        vault.clone(),
        accounts.clone(),
        CredentialValidator::new(gateway.clone(), probe_timeout),
    );

    let list_models = ListModelsUseCase::new(gateway, vault, accounts)
        .with_policy(config.catalog_policy())
        .with_probe_timeout(probe_timeout);

    let session_id = args.session_id();
    info!(user = %args.user, session = %session_id, "parley starting");

    match args.command {
        Command::Chat => {
            chat::run(&converse, &args.user, &session_id).await?;
        }
        Command::Ask { message } => {
            let reply = converse
                .respond(ConverseInput::new(&args.user, &session_id, message))
                .await;
            println!("{}", reply);
        }
        Command::Models => {
            let listing = match list_models.list(&args.user).await {
                Ok(listing) => listing,
                Err(ListModelsError::NoCredential) => {
                    bail!("no API key configured; run `parley key set <key>` first")
                }
                Err(e) => bail!(e.to_string()),
            };

            if listing.models.is_empty() {
                println!("No models available. Please check your API key.");
                return Ok(());
            }
            for model in &listing.models {
                let marker = if model.id == listing.selected_model {
                    "*"
                } else {
                    " "
                };
                println!(
                    "{} {:<40} {:>8} ctx  {}",
                    marker.green(),
                    model.id.as_str(),
                    model.context_window,
                    model.display_name.dimmed()
                );
            }
        }
        Command::Model { id } => {
            match manage.select_model(&args.user, ModelId::new(&id)).await {
                Ok(()) => println!("Model set to {}", id.bold()),
                Err(ManageCredentialError::NoCredential) => {
                    bail!("please save your API key first: `parley key set <key>`")
                }
                Err(e) => bail!(e.to_string()),
            }
        }
        Command::Key { action } => match action {
            KeyAction::Set { key, model } => {
                let model = model.map(ModelId::new);
                match manage.save(&args.user, &key, model).await {
                    Ok(status) => {
                        println!(
                            "API key saved ({})",
                            status.key_preview.unwrap_or_default()
                        );
                        println!("Selected model: {}", status.selected_model);
                    }
                    Err(ManageCredentialError::ValidationFailed(reason)) => {
                        bail!("key rejected: {}", reason)
                    }
                    Err(e) => bail!(e.to_string()),
                }
            }
            KeyAction::Status => {
                let status = manage.status(&args.user).await?;
                if status.has_key {
                    println!(
                        "API key: {}",
                        status.key_preview.unwrap_or_default().bold()
                    );
                } else {
                    println!("API key: {}", "not configured".dimmed());
                }
                println!("Selected model: {}", status.selected_model);
            }
            KeyAction::Remove => {
                if manage.remove(&args.user).await? {
                    println!("API key removed");
                } else {
                    println!("No API key configured");
                }
            }
            KeyAction::GenerateMasterKey => unreachable!("handled before wiring"),
        },
    }

    Ok(())
}
