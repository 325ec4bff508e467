//! Optional observability helpers for adapter logins.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to wrap each login in an `opower_auth.login` span carrying the `utility`
//!   (routing key) and current `stage` fields, with a `debug` event at each stage boundary.
//! - Enable `metrics` to increment `opower_auth_login_total{utility, outcome}` for every
//!   attempt, success, and failure, plus `opower_auth_login_failures_total{utility, stage}`
//!   naming the stage a failed login stopped at.
//!
//! Secrets never reach either sink.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Protocol steps of a portal login.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoginStage {
	/// Credential submission to the login endpoint.
	SubmitCredentials,
	/// Authenticated usage-page request.
	FetchUsagePage,
	/// Token extraction from the usage page markup.
	ScanToken,
}
impl LoginStage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			LoginStage::SubmitCredentials => "submit_credentials",
			LoginStage::FetchUsagePage => "fetch_usage_page",
			LoginStage::ScanToken => "scan_token",
		}
	}
}
impl Display for LoginStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome of a login as reported to metrics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttemptOutcome {
	/// Entry to a login.
	Attempt,
	/// Token captured.
	Success,
	/// Login aborted while in the given stage.
	Failure(LoginStage),
}
impl AttemptOutcome {
	/// Returns the `outcome` label value.
	pub const fn as_str(self) -> &'static str {
		match self {
			AttemptOutcome::Attempt => "attempt",
			AttemptOutcome::Success => "success",
			AttemptOutcome::Failure(_) => "failure",
		}
	}

	/// Stage a failed login stopped at.
	pub const fn failed_stage(self) -> Option<LoginStage> {
		match self {
			AttemptOutcome::Failure(stage) => Some(stage),
			AttemptOutcome::Attempt | AttemptOutcome::Success => None,
		}
	}
}
impl Display for AttemptOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self.failed_stage() {
			Some(stage) => write!(f, "{} at {stage}", self.as_str()),
			None => f.write_str(self.as_str()),
		}
	}
}
