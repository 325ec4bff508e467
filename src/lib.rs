//! Utility portal authentication adapters that log in with customer credentials and scrape the
//! Opower bearer token the portal embeds into its usage page.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod adapter;
pub mod auth;
pub mod error;
pub mod http;
pub mod obs;
pub mod scan;
pub mod utility;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{adapter::PortalEndpoints, utility::DuquesneLight};

	/// Builds a reqwest session that keeps cookies between requests and accepts the self-signed
	/// certificates produced by `httpmock` during tests.
	pub fn test_reqwest_session() -> ReqwestClient {
		ReqwestClient::builder()
			.cookie_store(true)
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.")
	}

	/// Constructs a [`DuquesneLight`] adapter whose login and usage endpoints live under `base`
	/// (typically an `httpmock` server URL).
	pub fn dlc_adapter_at(base: &str) -> DuquesneLight {
		let base = Url::parse(base).expect("Mock portal base URL should parse.");
		let endpoints = PortalEndpoints::builder()
			.login_endpoint(
				base.join(DuquesneLight::LOGIN_PATH).expect("Mock login endpoint should join."),
			)
			.usage_endpoint(
				base.join(DuquesneLight::USAGE_PATH).expect("Mock usage endpoint should join."),
			)
			.build()
			.expect("Mock portal endpoints should validate.");

		DuquesneLight::with_endpoints(endpoints)
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
