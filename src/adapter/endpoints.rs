//! Validated portal endpoint configuration.

// std
use std::net::IpAddr;
// crates.io
use url::Host;
// self
use crate::{_prelude::*, error::ConfigError};

/// Desktop browser identification sent with every portal request.
pub const DEFAULT_USER_AGENT: &str =
	"Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Endpoints and client identification used by a portal login.
///
/// Values only come out of [`PortalEndpointsBuilder::build`], including when deserialized, so
/// every instance has passed endpoint validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PortalEndpointsBuilder")]
pub struct PortalEndpoints {
	login: Url,
	usage: Url,
	user_agent: String,
}
impl PortalEndpoints {
	/// Creates a new builder with the default user agent.
	pub fn builder() -> PortalEndpointsBuilder {
		PortalEndpointsBuilder::default()
	}

	/// Parses and validates both endpoints from strings.
	pub fn parse(login: &str, usage: &str) -> Result<Self, ConfigError> {
		let parse = |endpoint: &'static str, raw: &str| {
			Url::parse(raw).map_err(|source| ConfigError::InvalidUrl { endpoint, source })
		};

		Self::builder()
			.login_endpoint(parse("login", login)?)
			.usage_endpoint(parse("usage", usage)?)
			.build()
	}

	/// Endpoint receiving the JSON credential submission.
	pub fn login(&self) -> &Url {
		&self.login
	}

	/// Authenticated page whose markup embeds the bearer token.
	pub fn usage(&self) -> &Url {
		&self.usage
	}

	/// Value of the `User-Agent` header.
	pub fn user_agent(&self) -> &str {
		&self.user_agent
	}

	fn validate(&self) -> Result<(), ConfigError> {
		validate_endpoint("login", &self.login)?;
		validate_endpoint("usage", &self.usage)?;

		if self.user_agent.trim().is_empty() {
			return Err(ConfigError::EmptyUserAgent);
		}

		Ok(())
	}
}

/// Builder for [`PortalEndpoints`] values; also the unvalidated serde form.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PortalEndpointsBuilder {
	/// Login endpoint.
	pub login: Option<Url>,
	/// Usage page endpoint.
	pub usage: Option<Url>,
	/// Client identification header.
	pub user_agent: String,
}
impl PortalEndpointsBuilder {
	/// Sets the login endpoint.
	pub fn login_endpoint(mut self, url: Url) -> Self {
		self.login = Some(url);

		self
	}

	/// Sets the usage page endpoint.
	pub fn usage_endpoint(mut self, url: Url) -> Self {
		self.usage = Some(url);

		self
	}

	/// Overrides the `User-Agent` header.
	pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = user_agent.into();

		self
	}

	/// Consumes the builder and validates the resulting endpoints.
	pub fn build(self) -> Result<PortalEndpoints, ConfigError> {
		let login = self.login.ok_or(ConfigError::MissingEndpoint { endpoint: "login" })?;
		let usage = self.usage.ok_or(ConfigError::MissingEndpoint { endpoint: "usage" })?;
		let endpoints = PortalEndpoints { login, usage, user_agent: self.user_agent };

		endpoints.validate()?;

		Ok(endpoints)
	}
}
impl Default for PortalEndpointsBuilder {
	fn default() -> Self {
		Self { login: None, usage: None, user_agent: DEFAULT_USER_AGENT.into() }
	}
}

impl TryFrom<PortalEndpointsBuilder> for PortalEndpoints {
	type Error = ConfigError;

	fn try_from(builder: PortalEndpointsBuilder) -> Result<Self, Self::Error> {
		builder.build()
	}
}

/// HTTPS is required; plain HTTP is accepted only for loopback hosts (local mocks).
fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ConfigError> {
	let loopback = match url.host() {
		Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		Some(Host::Ipv4(ip)) => IpAddr::V4(ip).is_loopback(),
		Some(Host::Ipv6(ip)) => IpAddr::V6(ip).is_loopback(),
		None => false,
	};

	match url.scheme() {
		"https" => Ok(()),
		"http" if loopback => Ok(()),
		_ => Err(ConfigError::InsecureEndpoint { endpoint: name, url: url.to_string() }),
	}
}
