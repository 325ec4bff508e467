//! Strongly typed routing keys used to select utility adapters.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier.
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier.
		kind: &'static str,
	},
	/// The identifier contains a character outside `[a-z0-9_-]`.
	#[error("{kind} identifier contains the invalid character {character:?}.")]
	InvalidCharacter {
		/// Kind of identifier.
		kind: &'static str,
		/// First offending character.
		character: char,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier.
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Routing key (the Opower subdomain) that selects a utility adapter, e.g. `duq`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UtilityKey(String);
impl UtilityKey {
	const KIND: &'static str = "Utility";

	/// Creates a new key after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
		let view = value.as_ref();

		validate_view(Self::KIND, view)?;

		Ok(Self(view.to_owned()))
	}
}
impl Deref for UtilityKey {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for UtilityKey {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<UtilityKey> for String {
	fn from(value: UtilityKey) -> Self {
		value.0
	}
}
impl TryFrom<String> for UtilityKey {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(Self::KIND, &value)?;

		Ok(Self(value))
	}
}
impl Borrow<str> for UtilityKey {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl Debug for UtilityKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Utility({})", self.0)
	}
}
impl Display for UtilityKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for UtilityKey {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if let Some(character) = view
		.chars()
		.find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '_'))
	{
		return Err(IdentifierError::InvalidCharacter { kind, character });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashMap;
	// self
	use super::*;

	#[test]
	fn keys_validate() {
		assert!(UtilityKey::new(" duq").is_err(), "Leading whitespace must be rejected.");
		assert!(UtilityKey::new("").is_err());
		assert_eq!(
			UtilityKey::new("DUQ"),
			Err(IdentifierError::InvalidCharacter { kind: "Utility", character: 'D' })
		);

		let key = UtilityKey::new("duq").expect("Routing key fixture should be considered valid.");

		assert_eq!(key.as_ref(), "duq");
		assert_eq!(format!("{key:?}"), "Utility(duq)");
	}

	#[test]
	fn length_limits() {
		let exact = "a".repeat(IDENTIFIER_MAX_LEN);

		UtilityKey::new(&exact).expect("Exact length should succeed.");

		let too_long = "a".repeat(IDENTIFIER_MAX_LEN + 1);

		assert!(UtilityKey::new(&too_long).is_err());
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let key: UtilityKey =
			serde_json::from_str("\"duq\"").expect("Key should deserialize successfully.");

		assert_eq!(key.as_ref(), "duq");
		assert!(serde_json::from_str::<UtilityKey>("\"with space\"").is_err());
	}

	#[test]
	fn borrow_supports_fast_lookup() {
		let map: HashMap<UtilityKey, u8> = HashMap::from_iter([(
			UtilityKey::new("duq").expect("Key used for lookup should be valid."),
			7_u8,
		)]);

		assert_eq!(map.get("duq"), Some(&7));
	}
}
