//! Load GitHub API settings from the environment, a `.env` file and,
//! optionally, a Key Vault.
//!
//! ```text
//! GITHUB_USERNAME=octocat GITHUB_TOKEN=ghp_xxx cargo run --example github_settings
//! cargo run --example github_settings -- https://my-kv.vault.azure.net/
//! ```
//!
//! Vault access authenticates through `AZURE_TENANT_ID`, `AZURE_CLIENT_ID`
//! and `AZURE_CLIENT_SECRET`. Set `RUST_LOG=keyvault_settings=debug` to see
//! which sources contributed.

use anyhow::Context;
use keyvault_settings::{FieldDescriptor, Schema, Settings};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Debug, Deserialize)]
struct GitHub {
    url: String,
    username: String,
    token: SecretString,
}

impl Settings for GitHub {
    fn schema() -> Schema {
        Schema::new("GitHub")
            .env_prefix("github_")
            .env_file(".env")
            .secrets_dir("/var/tmp")
            .field(FieldDescriptor::string("url").with_default("https://api.github.com/user"))
            .field(FieldDescriptor::string("username"))
            .field(FieldDescriptor::secret("token"))
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let mut resolver = GitHub::resolver();
    if let Some(vault_url) = std::env::args().nth(1) {
        resolver = resolver.with_vault_url(vault_url);
    }

    let github = resolver.build().context("failed to load GitHub settings")?;

    println!("url:      {}", github.url);
    println!("username: {}", github.username);
    println!("token:    {} characters", github.token.expose_secret().len());
    Ok(())
}
