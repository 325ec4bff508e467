//! Transport seam between utility adapters and the caller's HTTP session.
//!
//! Adapters never own an HTTP client. Callers hand in a [`PortalSession`] that carries the
//! connection pool, TLS configuration, and cookie jar across both portal requests; the crate
//! implements the trait for [`reqwest::Client`](ReqwestClient) so a cookie-enabled client can be
//! passed directly.
//!
//! Page bodies are returned as text decoded with the charset the response declares (UTF-8 when
//! none is given), so adapters never see raw bytes of an unknown encoding.

// self
use crate::{_prelude::*, error::TransportError};
#[cfg(feature = "reqwest")]
use crate::error::ConfigError;

/// Future returned by [`PortalSession`] operations.
pub type PortalFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, TransportError>> + 'a + Send>>;

/// Request parameters shared by both portal calls.
#[derive(Clone, Copy, Debug)]
pub struct PortalRequest<'a> {
	/// Target endpoint.
	pub url: &'a Url,
	/// Client identification header sent as `User-Agent`.
	pub user_agent: &'a str,
	/// Label of the protocol step (`login` or `usage`) used in errors and spans.
	pub stage: &'static str,
}

/// Caller-owned HTTP session used for portal round-trips.
///
/// Implementations must treat a non-success HTTP status as a [`TransportError`]; adapters
/// never inspect status codes themselves. Timeouts and cancellation belong to the
/// implementation as well.
pub trait PortalSession
where
	Self: Send + Sync,
{
	/// Sends `body` as a JSON `POST` and returns the full response body.
	fn post_json<'a>(
		&'a self,
		request: PortalRequest<'a>,
		body: Vec<u8>,
	) -> PortalFuture<'a, Vec<u8>>;

	/// Sends a `GET` and returns the response body decoded as text.
	fn get_text<'a>(&'a self, request: PortalRequest<'a>) -> PortalFuture<'a, String>;
}

#[cfg(feature = "reqwest")]
impl PortalSession for ReqwestClient {
	fn post_json<'a>(
		&'a self,
		request: PortalRequest<'a>,
		body: Vec<u8>,
	) -> PortalFuture<'a, Vec<u8>> {
		use reqwest::header::{CONTENT_TYPE, USER_AGENT};

		Box::pin(async move {
			let network = |e: ReqwestError| TransportError::network(request.stage, e);
			let response = self
				.post(request.url.clone())
				.header(USER_AGENT, request.user_agent)
				.header(CONTENT_TYPE, "application/json")
				.body(body)
				.send()
				.await
				.and_then(reqwest::Response::error_for_status)
				.map_err(network)?;

			Ok(response.bytes().await.map_err(network)?.to_vec())
		})
	}

	fn get_text<'a>(&'a self, request: PortalRequest<'a>) -> PortalFuture<'a, String> {
		use reqwest::header::USER_AGENT;

		Box::pin(async move {
			let network = |e: ReqwestError| TransportError::network(request.stage, e);
			let response = self
				.get(request.url.clone())
				.header(USER_AGENT, request.user_agent)
				.send()
				.await
				.and_then(reqwest::Response::error_for_status)
				.map_err(network)?;

			// `charset` feature: honors `Content-Type: ...; charset=`.
			response.text().await.map_err(network)
		})
	}
}

/// Builds a reqwest session suitable for portal logins: cookies persist between the login and
/// usage-page requests.
#[cfg(feature = "reqwest")]
pub fn portal_session() -> Result<ReqwestClient> {
	ReqwestClient::builder().cookie_store(true).build().map_err(|e| ConfigError::from(e).into())
}

#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// crates.io
	use httpmock::prelude::*;
	// self
	use super::*;

	#[tokio::test]
	async fn page_text_is_decoded_with_the_declared_charset() {
		let server = MockServer::start_async().await;
		let page = server
			.mock_async(|when, then| {
				when.method(GET).path("/page");
				then.status(200)
					.header("content-type", "text/html; charset=iso-8859-1")
					.body(b"<p>Gr\xfc\xdfe</p>".as_slice());
			})
			.await;
		let url = Url::parse(&server.url("/page")).expect("Mock URL should parse.");
		let session = crate::_preludet::test_reqwest_session();
		let text = session
			.get_text(PortalRequest { url: &url, user_agent: "test-agent", stage: "usage" })
			.await
			.expect("Latin-1 page should decode.");

		page.assert_async().await;
		assert_eq!(text, "<p>Grüße</p>");
	}

	#[tokio::test]
	async fn error_status_is_a_network_error_naming_the_stage() {
		let server = MockServer::start_async().await;

		server
			.mock_async(|when, then| {
				when.method(POST).path("/login");
				then.status(500);
			})
			.await;

		let url = Url::parse(&server.url("/login")).expect("Mock URL should parse.");
		let session = portal_session().expect("Portal session should build.");
		let request = PortalRequest { url: &url, user_agent: "test-agent", stage: "login" };
		let err = session
			.post_json(request, b"{}".to_vec())
			.await
			.expect_err("Server errors should fail the request.");

		assert!(matches!(err, TransportError::Network { stage: "login", .. }));
	}
}
