// self
use crate::{auth::UtilityKey, obs::AttemptOutcome};

/// Records a login outcome via the global metrics recorder (when enabled).
pub fn record_login_outcome(utility: &UtilityKey, outcome: AttemptOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"opower_auth_login_total",
			"utility" => utility.to_string(),
			"outcome" => outcome.as_str()
		)
		.increment(1);

		if let Some(stage) = outcome.failed_stage() {
			metrics::counter!(
				"opower_auth_login_failures_total",
				"utility" => utility.to_string(),
				"stage" => stage.as_str()
			)
			.increment(1);
		}
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (utility, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::obs::LoginStage;

	#[test]
	fn failures_are_recorded_with_their_stage() {
		let key = UtilityKey::new("duq").expect("Fixture key should be valid.");

		record_login_outcome(&key, AttemptOutcome::Attempt);
		record_login_outcome(&key, AttemptOutcome::Failure(LoginStage::FetchUsagePage));
	}
}
