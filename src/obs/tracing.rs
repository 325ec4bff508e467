// self
use crate::{_prelude::*, auth::UtilityKey, obs::LoginStage};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedLogin<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedLogin<F> = F;

/// A span wrapping one adapter login.
///
/// The `stage` field starts empty and is updated by [`LoginSpan::record_stage`].
#[derive(Clone, Debug)]
pub struct LoginSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl LoginSpan {
	/// Creates a new span tagged with the utility routing key.
	pub fn new(utility: &UtilityKey) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"opower_auth.login",
				utility = %utility,
				stage = tracing::field::Empty
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = utility;

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedLogin<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}

	/// Sets the span's `stage` field and emits a `debug` event marking entry into `stage`.
	pub fn record_stage(&self, stage: LoginStage) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("stage", stage.as_str());

			tracing::debug!(parent: &self.span, stage = stage.as_str(), "Entering login stage.");
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = stage;
		}
	}
}
