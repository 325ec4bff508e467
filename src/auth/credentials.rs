//! Customer credentials submitted to utility portals.

// self
use crate::{_prelude::*, auth::Secret};

/// Username/password pair plus an optional second-factor secret.
///
/// Adapters for portals without a second factor accept the MFA secret and ignore it.
#[derive(Clone)]
pub struct Credentials {
	/// Portal username (usually the account email address).
	pub username: String,
	/// Portal password.
	pub password: Secret,
	/// Optional TOTP or similar second-factor secret.
	pub mfa_secret: Option<Secret>,
}
impl Credentials {
	/// Creates credentials without a second factor.
	pub fn new(username: impl Into<String>, password: impl Into<Secret>) -> Self {
		Self { username: username.into(), password: password.into(), mfa_secret: None }
	}

	/// Attaches a second-factor secret.
	pub fn with_mfa_secret(mut self, secret: impl Into<Secret>) -> Self {
		self.mfa_secret = Some(secret.into());

		self
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("username", &self.username)
			.field("password", &self.password)
			.field("mfa_secret_set", &self.mfa_secret.is_some())
			.finish()
	}
}
