//! Logs into the Duquesne Light portal and prints a redacted view of the Opower bearer token.
//!
//! ```sh
//! DLC_USERNAME=me@example.com DLC_PASSWORD=... cargo run --example dlc_login
//! ```
//!
//! The session is created here and owned by the caller, so cookies persist across the login and
//! usage-page requests.

// std
use std::env;
// crates.io
use color_eyre::{Result, eyre::WrapErr};
// self
use opower_auth::{adapter::AdapterRegistry, auth::Credentials, http};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let username = env::var("DLC_USERNAME").wrap_err("Set DLC_USERNAME to the portal username.")?;
	let password = env::var("DLC_PASSWORD").wrap_err("Set DLC_PASSWORD to the portal password.")?;
	let registry = AdapterRegistry::with_builtin()?;
	let adapter = registry.get("duq").ok_or_else(|| color_eyre::eyre::eyre!("DLC is missing."))?;
	let session = http::portal_session()?;

	println!("Logging into {} ({}).", adapter.name(), adapter.timezone());

	let token = adapter.login(&session, &Credentials::new(username, password)).await?;
	let preview: String = token.expose().chars().take(8).collect();

	println!("Captured bearer token {preview}… ({} characters).", token.expose().len());

	Ok(())
}
