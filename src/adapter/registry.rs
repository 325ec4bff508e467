//! Adapter registry keyed by Opower routing key.

// self
use crate::{
	_prelude::*,
	adapter::UtilityAdapter,
	auth::{Credentials, Secret, UtilityKey},
	error::ConfigError,
	http::PortalSession,
	utility::DuquesneLight,
};

/// Shared adapter handle handed out by the registry.
pub type SharedAdapter = Arc<dyn UtilityAdapter>;

/// Thread-safe lookup table from routing key to adapter.
#[derive(Default)]
pub struct AdapterRegistry {
	adapters: RwLock<BTreeMap<UtilityKey, SharedAdapter>>,
}
impl AdapterRegistry {
	/// Creates a registry pre-populated with every adapter shipped by this crate.
	pub fn with_builtin() -> Result<Self> {
		let registry = Self::default();

		registry.register(DuquesneLight::new()?)?;

		Ok(registry)
	}

	/// Registers `adapter` under its descriptor's routing key.
	pub fn register(&self, adapter: impl 'static + UtilityAdapter) -> Result<()> {
		self.register_shared(Arc::new(adapter))
	}

	/// Registers an already shared adapter under its descriptor's routing key.
	pub fn register_shared(&self, adapter: SharedAdapter) -> Result<()> {
		let key = adapter.descriptor().key().map_err(ConfigError::from)?;
		let mut adapters = self.adapters.write();

		if adapters.contains_key(&key) {
			return Err(ConfigError::DuplicateAdapter { key: key.into() }.into());
		}

		adapters.insert(key, adapter);

		Ok(())
	}

	/// Returns the adapter registered for `key`.
	pub fn get(&self, key: &str) -> Option<SharedAdapter> {
		self.adapters.read().get(key).cloned()
	}

	/// Returns the registered routing keys in sorted order.
	pub fn keys(&self) -> Vec<UtilityKey> {
		self.adapters.read().keys().cloned().collect()
	}

	/// Selects the adapter for `key` and runs its login.
	pub async fn login(
		&self,
		key: &str,
		session: &dyn PortalSession,
		credentials: &Credentials,
	) -> Result<Secret> {
		let adapter =
			self.get(key).ok_or_else(|| ConfigError::UnknownUtility { key: key.to_owned() })?;

		adapter.login(session, credentials).await
	}
}
impl Debug for AdapterRegistry {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AdapterRegistry").field("keys", &self.keys()).finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		adapter::{AdapterDescriptor, LoginFuture},
		error::TransportError,
		http::{PortalFuture, PortalRequest},
	};

	struct StaticAdapter(AdapterDescriptor);
	impl UtilityAdapter for StaticAdapter {
		fn descriptor(&self) -> &AdapterDescriptor {
			&self.0
		}

		fn login<'a>(
			&'a self,
			_session: &'a dyn PortalSession,
			_credentials: &'a Credentials,
		) -> LoginFuture<'a> {
			Box::pin(async { Ok(Secret::new("static")) })
		}
	}

	struct OfflineSession;
	impl PortalSession for OfflineSession {
		fn post_json<'a>(
			&'a self,
			request: PortalRequest<'a>,
			_body: Vec<u8>,
		) -> PortalFuture<'a, Vec<u8>> {
			Box::pin(async move { Err(TransportError::Io(std::io::Error::other(request.stage))) })
		}

		fn get_text<'a>(&'a self, request: PortalRequest<'a>) -> PortalFuture<'a, String> {
			Box::pin(async move { Err(TransportError::Io(std::io::Error::other(request.stage))) })
		}
	}

	const EXAMPLE: AdapterDescriptor = AdapterDescriptor {
		name: "Example Power",
		subdomain: "expw",
		timezone: "America/Chicago",
	};

	#[test]
	fn builtin_registry_contains_dlc() {
		let registry = AdapterRegistry::with_builtin().expect("Builtin registry should build.");
		let dlc = registry.get("duq").expect("DLC should be registered under `duq`.");

		assert_eq!(dlc.name(), "Duquesne Light Company (DLC)");
		assert_eq!(dlc.timezone(), "America/New_York");
		assert_eq!(dlc.subdomain(), "duq");
		assert!(registry.get("pge").is_none());
	}

	#[test]
	fn duplicate_and_invalid_keys_are_rejected() {
		let registry = AdapterRegistry::default();

		registry.register(StaticAdapter(EXAMPLE)).expect("First registration should succeed.");

		let err = registry
			.register(StaticAdapter(EXAMPLE))
			.expect_err("Duplicate registration should be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::DuplicateAdapter { .. })));

		let err = registry
			.register(StaticAdapter(AdapterDescriptor { subdomain: "Bad Key", ..EXAMPLE }))
			.expect_err("Invalid routing keys should be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::InvalidKey(_))));
	}

	#[test]
	fn keys_are_sorted() {
		let registry = AdapterRegistry::with_builtin().expect("Builtin registry should build.");

		registry.register(StaticAdapter(EXAMPLE)).expect("Registration should succeed.");

		let keys = registry.keys();

		assert_eq!(keys.iter().map(|key| &**key).collect::<Vec<_>>(), ["duq", "expw"]);
	}

	#[tokio::test]
	async fn login_dispatches_by_key() {
		let registry = AdapterRegistry::default();
		let credentials = Credentials::new("user@example.com", "password");

		registry.register(StaticAdapter(EXAMPLE)).expect("Registration should succeed.");

		let token = registry
			.login("expw", &OfflineSession, &credentials)
			.await
			.expect("Registered adapter should be selected.");

		assert_eq!(token.expose(), "static");

		let err = registry
			.login("nope", &OfflineSession, &credentials)
			.await
			.expect_err("Unknown routing keys should be reported.");

		assert!(matches!(
			err,
			Error::Config(ConfigError::UnknownUtility { ref key }) if key == "nope"
		));
	}
}
