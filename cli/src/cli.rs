//! Command-line interface definition

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "parley", version, about = "Chat with Groq-hosted models")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Explicit config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Acting user id (stand-in for the identity provider)
    #[arg(long, global = true, default_value = "local")]
    pub user: String,

    /// Session id; defaults to one derived from the user
    #[arg(long, global = true)]
    pub session: Option<String>,
}

impl Cli {
    /// The session this invocation operates on.
    pub fn session_id(&self) -> String {
        self.session
            .clone()
            .unwrap_or_else(|| format!("user_{}", self.user))
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive chat (/clear resets the session, /quit exits)
    Chat,
    /// Send a single message and print the reply
    Ask { message: String },
    /// List the models available to your stored API key
    Models,
    /// Select the model used for your chats
    Model { id: String },
    /// Manage your provider API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum KeyAction {
    /// Validate and store an API key
    Set {
        key: String,
        /// Also select a model in the same step
        #[arg(long)]
        model: Option<String>,
    },
    /// Show whether a key is stored (masked) and the selected model
    Status,
    /// Remove the stored key
    Remove,
    /// Generate a fresh vault master key for deployment
    GenerateMasterKey,
}
