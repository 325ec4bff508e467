//! Crate-level error types shared across adapters, the scanner, and transports.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, non-success status).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Portal answered with a payload that does not match the expected shape.
	#[error(transparent)]
	MalformedResponse(#[from] ResponseError),

	/// Portal rejected the supplied credentials.
	#[error("Portal rejected the credentials: {message}.")]
	InvalidAuth {
		/// Message reported by the portal.
		message: String,
	},
	/// Usage page was fetched but carried no bearer token inside an inline script.
	#[error("Usage page did not contain an Opower bearer token.")]
	TokenNotFound,
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Endpoint URL could not be parsed.
	#[error("The {endpoint} endpoint is not a valid URL.")]
	InvalidUrl {
		/// Which endpoint failed to parse.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Required endpoint was not configured.
	#[error("Missing {endpoint} endpoint.")]
	MissingEndpoint {
		/// Which endpoint is missing.
		endpoint: &'static str,
	},
	/// Endpoint does not use HTTPS and is not a loopback address.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Client identification header cannot be empty.
	#[error("The user agent cannot be empty.")]
	EmptyUserAgent,
	/// Routing key failed validation.
	#[error(transparent)]
	InvalidKey(#[from] crate::auth::IdentifierError),
	/// Login request body could not be encoded.
	#[error("Login request body could not be encoded.")]
	RequestEncode(#[source] serde_json::Error),
	/// No adapter is registered under the routing key.
	#[error("No adapter is registered for `{key}`.")]
	UnknownUtility {
		/// Requested routing key.
		key: String,
	},
	/// An adapter is already registered under the routing key.
	#[error("An adapter is already registered for `{key}`.")]
	DuplicateAdapter {
		/// Conflicting routing key.
		key: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Portal payload failures.
#[derive(Debug, ThisError)]
pub enum ResponseError {
	/// Login endpoint responded with something other than a JSON object.
	#[error("Login endpoint returned malformed JSON.")]
	LoginParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}

/// Transport-level failures (network, IO, HTTP status).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a failure.
	#[error("Network error occurred while calling the {stage} endpoint.")]
	Network {
		/// Request that failed (`login` or `usage`).
		stage: &'static str,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the portal.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error raised while calling `stage`.
	pub fn network(
		stage: &'static str,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { stage, source: Box::new(src) }
	}
}
