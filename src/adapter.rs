//! Utility adapter contract (behavior) and descriptors (data).
//!
//! Every supported utility implements [`UtilityAdapter`]: a static [`AdapterDescriptor`]
//! (display name, Opower routing key, timezone) plus the `login` operation that turns customer
//! credentials into a bearer token. `endpoints` holds the validated portal URLs an adapter
//! talks to, and `registry` selects adapters by routing key.

pub mod endpoints;
pub mod registry;

pub use endpoints::*;
pub use registry::*;

// self
use crate::{
	_prelude::*,
	auth::{Credentials, IdentifierError, Secret, UtilityKey},
	http::PortalSession,
};

/// Future returned by [`UtilityAdapter::login`].
pub type LoginFuture<'a> = Pin<Box<dyn Future<Output = Result<Secret>> + 'a + Send>>;

/// Static identity metadata exposed to the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct AdapterDescriptor {
	/// Distinct, human-recognizable utility name.
	pub name: &'static str,
	/// Opower subdomain used as the routing key.
	pub subdomain: &'static str,
	/// IANA timezone the utility reports usage in.
	pub timezone: &'static str,
}
impl AdapterDescriptor {
	/// Validates the subdomain into a [`UtilityKey`].
	pub fn key(&self) -> Result<UtilityKey, IdentifierError> {
		UtilityKey::new(self.subdomain)
	}
}

/// Capability interface shared by all utility adapters.
///
/// Implementors must be `Send + Sync` so a registry can hand out shared handles, and the
/// returned login future must be `Send` so callers can spawn it on a multi-threaded runtime.
pub trait UtilityAdapter
where
	Self: Send + Sync,
{
	/// Identity metadata for this adapter.
	fn descriptor(&self) -> &AdapterDescriptor;

	/// Distinct recognizable name of the utility.
	fn name(&self) -> &'static str {
		self.descriptor().name
	}

	/// Opower subdomain for this utility.
	fn subdomain(&self) -> &'static str {
		self.descriptor().subdomain
	}

	/// Timezone the utility reports usage in.
	fn timezone(&self) -> &'static str {
		self.descriptor().timezone
	}

	/// Logs into the utility portal over `session` and returns the Opower bearer token.
	fn login<'a>(
		&'a self,
		session: &'a dyn PortalSession,
		credentials: &'a Credentials,
	) -> LoginFuture<'a>;
}
