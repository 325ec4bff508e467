//! Duquesne Light Company (DLC) portal login.
//!
//! The flow takes exactly two round-trips over the caller's session:
//!
//! 1. `POST /login/login` with a JSON `{"Username", "Password"}` body. A response object carrying
//!    an `errorMsg` key means the credentials were rejected.
//! 2. `GET /energy-money-savings/my-electric-usage`, whose markup embeds the Opower bearer token
//!    in an inline script. The decoded page is fed into a fresh [`TokenScanner`].
//!
//! Nothing is cached or retried; any failure aborts the login.

// crates.io
use serde_json::{Map, Value};
// self
use crate::{
	_prelude::*,
	adapter::{AdapterDescriptor, LoginFuture, PortalEndpoints, UtilityAdapter},
	auth::{Credentials, Secret},
	error::{ConfigError, ResponseError},
	http::{PortalRequest, PortalSession},
	obs::{self, AttemptOutcome, LoginSpan, LoginStage},
	scan::TokenScanner,
};

#[derive(Serialize)]
struct LoginRequest<'a> {
	#[serde(rename = "Username")]
	username: &'a str,
	#[serde(rename = "Password")]
	password: &'a str,
}

/// Adapter for the Duquesne Light Company customer portal.
#[derive(Clone, Debug)]
pub struct DuquesneLight {
	endpoints: PortalEndpoints,
}
impl DuquesneLight {
	/// Identity metadata published to the registry.
	pub const DESCRIPTOR: AdapterDescriptor = AdapterDescriptor {
		name: "Duquesne Light Company (DLC)",
		subdomain: "duq",
		timezone: "America/New_York",
	};
	/// Production portal origin.
	pub const ORIGIN: &'static str = "https://www.duquesnelight.com";
	/// Path of the credential submission endpoint.
	pub const LOGIN_PATH: &'static str = "/login/login";
	/// Path of the authenticated usage page.
	pub const USAGE_PATH: &'static str = "/energy-money-savings/my-electric-usage";
	/// Response key signalling rejected credentials.
	const ERROR_FIELD: &'static str = "errorMsg";

	/// Creates an adapter pointed at the production portal.
	pub fn new() -> Result<Self> {
		let endpoints = PortalEndpoints::parse(
			&format!("{}{}", Self::ORIGIN, Self::LOGIN_PATH),
			&format!("{}{}", Self::ORIGIN, Self::USAGE_PATH),
		)?;

		Ok(Self::with_endpoints(endpoints))
	}

	/// Creates an adapter that talks to custom endpoints (staging portals, local mocks).
	pub fn with_endpoints(endpoints: PortalEndpoints) -> Self {
		Self { endpoints }
	}

	/// Endpoints used by this adapter.
	pub fn endpoints(&self) -> &PortalEndpoints {
		&self.endpoints
	}

	/// Logs in with `credentials` and returns the Opower bearer token.
	///
	/// The MFA secret is accepted and ignored; the DLC portal has no second factor.
	///
	/// # Errors
	///
	/// - [`Error::Transport`] when either request fails or returns a non-success status.
	/// - [`Error::InvalidAuth`] when the portal reports an error message; the usage page is not
	///   requested.
	/// - [`Error::MalformedResponse`] when the login response is not a JSON object.
	/// - [`Error::TokenNotFound`] when the usage page carries no token in an inline script.
	pub async fn login(
		&self,
		session: &dyn PortalSession,
		credentials: &Credentials,
	) -> Result<Secret> {
		let utility = Self::DESCRIPTOR.key().map_err(ConfigError::from)?;
		let span = LoginSpan::new(&utility);

		obs::record_login_outcome(&utility, AttemptOutcome::Attempt);

		let result: Result<Secret, (LoginStage, Error)> = span
			.instrument(async {
				span.record_stage(LoginStage::SubmitCredentials);
				self.submit_credentials(session, credentials)
					.await
					.map_err(|e| (LoginStage::SubmitCredentials, e))?;

				span.record_stage(LoginStage::FetchUsagePage);

				let page = self
					.fetch_usage_page(session)
					.await
					.map_err(|e| (LoginStage::FetchUsagePage, e))?;

				span.record_stage(LoginStage::ScanToken);

				scan_token(&page).ok_or((LoginStage::ScanToken, Error::TokenNotFound))
			})
			.await;

		match result {
			Ok(token) => {
				obs::record_login_outcome(&utility, AttemptOutcome::Success);

				Ok(token)
			},
			Err((stage, e)) => {
				obs::record_login_outcome(&utility, AttemptOutcome::Failure(stage));

				Err(e)
			},
		}
	}

	async fn submit_credentials(
		&self,
		session: &dyn PortalSession,
		credentials: &Credentials,
	) -> Result<()> {
		let body = serde_json::to_vec(&LoginRequest {
			username: &credentials.username,
			password: credentials.password.expose(),
		})
		.map_err(ConfigError::RequestEncode)?;
		let request = PortalRequest {
			url: self.endpoints.login(),
			user_agent: self.endpoints.user_agent(),
			stage: "login",
		};
		let payload = session.post_json(request, body).await?;

		check_login_response(&payload)
	}

	async fn fetch_usage_page(&self, session: &dyn PortalSession) -> Result<String> {
		let request = PortalRequest {
			url: self.endpoints.usage(),
			user_agent: self.endpoints.user_agent(),
			stage: "usage",
		};

		Ok(session.get_text(request).await?)
	}
}
impl UtilityAdapter for DuquesneLight {
	fn descriptor(&self) -> &AdapterDescriptor {
		&Self::DESCRIPTOR
	}

	fn login<'a>(
		&'a self,
		session: &'a dyn PortalSession,
		credentials: &'a Credentials,
	) -> LoginFuture<'a> {
		Box::pin(DuquesneLight::login(self, session, credentials))
	}
}

/// Runs a fresh scanner over the whole usage page.
fn scan_token(page: &str) -> Option<Secret> {
	let mut scanner = TokenScanner::new();

	scanner.consume(page);
	scanner.finish()
}

/// Fails with [`Error::InvalidAuth`] when the login response carries an error message.
fn check_login_response(payload: &[u8]) -> Result<()> {
	let mut deserializer = serde_json::Deserializer::from_slice(payload);
	let body: Map<String, Value> = serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| ResponseError::LoginParse { source })?;

	match body.get(DuquesneLight::ERROR_FIELD) {
		Some(Value::String(message)) => Err(Error::InvalidAuth { message: message.clone() }),
		Some(other) => Err(Error::InvalidAuth { message: other.to_string() }),
		None => Ok(()),
	}
}
