//! Extraction of the Opower bearer token from portal markup.
//!
//! [`TokenScanner`] drives an `html5ever` tokenizer, tracks inline scripts with the
//! [`ScriptState`] machine, and searches their text for a `"OPowerToken": "<value>"`
//! assignment. Markup may be fed in any number of chunks; a split tag, closing tag, or token
//! fragment yields the same result as feeding the whole document at once.
//!
//! The first captured token wins. Later assignments, even in later inline scripts, never
//! replace it.

pub mod state;

pub use state::*;

// std
use std::sync::LazyLock;
// crates.io
use html5ever::{
	tendril::StrTendril,
	tokenizer::{
		BufferQueue, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
	},
};
use regex::Regex;
// self
use crate::{_prelude::*, auth::Secret};

static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#""OPowerToken":\s*"(?P<token>[^"]+)""#).expect("Token pattern should compile.")
});

/// Incremental scanner that captures the bearer token embedded in an inline script.
///
/// The tokenizer keeps non-atomic string buffers, so a scanner is neither `Send` nor `Sync`;
/// create it where the markup is consumed.
pub struct TokenScanner {
	tokenizer: Tokenizer<ScriptSink>,
	input: BufferQueue,
}
impl TokenScanner {
	/// Creates a scanner for a fresh document.
	pub fn new() -> Self {
		Self {
			tokenizer: Tokenizer::new(ScriptSink::default(), TokenizerOpts::default()),
			input: BufferQueue::default(),
		}
	}

	/// Consumes the next chunk of markup.
	pub fn consume(&mut self, chunk: &str) {
		if chunk.is_empty() {
			return;
		}

		self.input.push_back(StrTendril::from_slice(chunk));

		// The sink never suspends for script execution, so the queue is always drained.
		let _ = self.tokenizer.feed(&mut self.input);
	}

	/// Returns the captured token, if any.
	pub fn captured_token(&self) -> Option<&Secret> {
		self.tokenizer.sink.token.as_ref()
	}

	/// Signals end of input and returns the captured token.
	pub fn finish(mut self) -> Option<Secret> {
		self.tokenizer.end();

		self.tokenizer.sink.token.take()
	}
}
impl Default for TokenScanner {
	fn default() -> Self {
		Self::new()
	}
}
impl Debug for TokenScanner {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenScanner")
			.field("state", &self.tokenizer.sink.state)
			.field("token", &self.tokenizer.sink.token)
			.finish()
	}
}

#[derive(Debug, Default)]
struct ScriptSink {
	state: ScriptState,
	script_text: String,
	token: Option<Secret>,
}
impl ScriptSink {
	fn observe_text(&mut self, text: &str) {
		self.script_text.push_str(text);

		if let Some(found) =
			TOKEN_PATTERN.captures(&self.script_text).and_then(|captures| captures.name("token"))
		{
			self.token = Some(Secret::new(found.as_str()));

			self.script_text.clear();
		}
	}
}
impl TokenSink for ScriptSink {
	type Handle = ();

	fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
		match token {
			Token::TagToken(tag) => {
				let next = self.state.transition(&tag);

				if next != self.state {
					self.state = next;

					self.script_text.clear();
				}

				if tag.kind == TagKind::StartTag {
					let model = ContentModel::after_start_tag(&tag.name);

					if let Some(kind) = model.raw_kind() {
						return TokenSinkResult::RawData(kind);
					}
					if model == ContentModel::Plaintext {
						return TokenSinkResult::Plaintext;
					}
				}
			},
			Token::CharacterTokens(text) if self.state.scans_text() && self.token.is_none() =>
				self.observe_text(&text),
			_ => {},
		}

		TokenSinkResult::Continue
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn scan(document: &str) -> Option<String> {
		let mut scanner = TokenScanner::new();

		scanner.consume(document);
		scanner.finish().map(Secret::into_inner)
	}

	#[test]
	fn inline_script_token_is_captured() {
		let document = r#"<html><head><script>window.cfg = { "OPowerToken": "abc123" };</script></head></html>"#;

		assert_eq!(scan(document).as_deref(), Some("abc123"));
	}

	#[test]
	fn external_script_is_ignored() {
		let document = r#"<script src="/app.js">var cfg = {"OPowerToken": "abc123"};</script>"#;

		assert_eq!(scan(document), None);
	}

	#[test]
	fn scanning_continues_past_tokenless_scripts() {
		let document = r#"<script>var a = 1;</script><p>"OPowerToken": "outside"</p><script>var b = {"OPowerToken": "second"};</script>"#;

		assert_eq!(scan(document).as_deref(), Some("second"));
	}

	#[test]
	fn first_match_wins() {
		let document = r#"<script>x({"OPowerToken": "first"})</script><script>x({"OPowerToken": "later"})</script>"#;

		assert_eq!(scan(document).as_deref(), Some("first"));
	}

	#[test]
	fn value_stops_at_next_quote() {
		let document = r#"<script>var t = "OPowerToken":"ab.c-1" + "rest";</script>"#;

		assert_eq!(scan(document).as_deref(), Some("ab.c-1"));
	}

	#[test]
	fn empty_or_unterminated_values_do_not_match() {
		assert_eq!(scan(r#"<script>{"OPowerToken": ""}</script>"#), None);
		assert_eq!(scan(r#"<script>{"OPowerToken": "abc</script>"#), None);
	}

	#[test]
	fn text_outside_scripts_and_comments_is_ignored() {
		let document = r#"<div>"OPowerToken": "div"</div><!-- <script>{"OPowerToken": "comment"}</script> -->"#;

		assert_eq!(scan(document), None);
	}

	#[test]
	fn tag_and_attribute_names_are_case_insensitive() {
		assert_eq!(scan(r#"<SCRIPT SRC="a.js">{"OPowerToken": "x"}</SCRIPT>"#), None);
		assert_eq!(
			scan(r#"<Script data-src="a.js">{"OPowerToken": "x"}</sCrIpT>"#).as_deref(),
			Some("x")
		);
	}

	#[test]
	fn external_script_does_not_leak_into_following_inline_script() {
		let document = r#"<script src="a.js"></script><script>var t = {"OPowerToken": "inline"};</script>"#;

		assert_eq!(scan(document).as_deref(), Some("inline"));
	}

	#[test]
	fn text_only_elements_never_open_scripts() {
		let fake = r#"<script>{"OPowerToken": "fake"}</script>"#;

		assert_eq!(scan(&format!("<textarea>{fake}</textarea>")), None);
		assert_eq!(scan(&format!("<title>{fake}</title>")), None);
		assert_eq!(scan(&format!("<style>{fake}</style>")), None);
		assert_eq!(scan(&format!("<noscript>{fake}</noscript>")), None);
	}

	#[test]
	fn scripts_after_text_only_elements_are_scanned() {
		let document = r#"<title>Usage</title><textarea>"OPowerToken": "no"</textarea><script>{"OPowerToken": "yes"}</script>"#;

		assert_eq!(scan(document).as_deref(), Some("yes"));
	}

	#[test]
	fn abruptly_closed_comments_end_immediately() {
		let document = r#"<!--><script>{"OPowerToken": "real"}</script><!-- x -->"#;

		assert_eq!(scan(document).as_deref(), Some("real"));
		assert_eq!(scan(r#"<!---><script>{"OPowerToken": "also"}</script>"#).as_deref(), Some("also"));
	}

	#[test]
	fn markup_inside_script_text_is_not_a_tag() {
		let document = r#"<script>var html = "<div>"; var cfg = {"OPowerToken": "in-script"};</script>"#;

		assert_eq!(scan(document).as_deref(), Some("in-script"));
	}

	#[test]
	fn every_chunk_split_yields_the_same_token() {
		let document = r#"<script src="x.js">{"OPowerToken": "nope"}</script><script type="text/javascript">var o = {"OPowerToken": "tok-ü"};</script>"#;

		for (split, _) in document.char_indices().skip(1) {
			let (head, tail) = document.split_at(split);
			let mut scanner = TokenScanner::new();

			scanner.consume(head);
			scanner.consume(tail);

			assert_eq!(
				scanner.finish().map(Secret::into_inner).as_deref(),
				Some("tok-ü"),
				"split at {split}"
			);
		}
	}

	#[test]
	fn captured_token_is_available_before_finish() {
		let mut scanner = TokenScanner::new();

		scanner.consume("<script>{\"OPowerToken\": \"ea");
		assert!(scanner.captured_token().is_none());

		scanner.consume("rly\"}</script>");
		assert_eq!(scanner.captured_token().map(Secret::expose), Some("early"));
	}

	#[test]
	fn unterminated_script_is_flushed_by_finish() {
		let mut scanner = TokenScanner::new();

		scanner.consume(r#"<script>{"OPowerToken": "tail"}"#);

		assert_eq!(scanner.finish().map(Secret::into_inner).as_deref(), Some("tail"));
	}
}
