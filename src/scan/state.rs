//! Script-tracking state machine driven by tokenizer tags.

// crates.io
use html5ever::tokenizer::{Tag, TagKind, states::RawKind};

/// How the tokenizer must read the content that follows a start tag.
///
/// Mirrors the switches an HTML tree builder performs, so text inside `title`/`textarea`
/// (RCDATA) or `style`/`noscript` (RAWTEXT) can never open a fake script element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentModel {
	/// Regular markup.
	Markup,
	/// Text with character references; only the matching end tag closes it.
	Rcdata,
	/// Text without character references; only the matching end tag closes it.
	Rawtext,
	/// Script data, including the `<!--` escaping rules.
	ScriptData,
	/// Everything up to end of input is text.
	Plaintext,
}
impl ContentModel {
	/// Content model entered after the start tag named `name`.
	pub fn after_start_tag(name: &str) -> Self {
		match name {
			"title" | "textarea" => Self::Rcdata,
			"style" | "xmp" | "iframe" | "noembed" | "noframes" | "noscript" => Self::Rawtext,
			"script" => Self::ScriptData,
			"plaintext" => Self::Plaintext,
			_ => Self::Markup,
		}
	}

	/// Tokenizer raw-text kind, `None` for markup and plaintext.
	pub const fn raw_kind(self) -> Option<RawKind> {
		match self {
			Self::Rcdata => Some(RawKind::Rcdata),
			Self::Rawtext => Some(RawKind::Rawtext),
			Self::ScriptData => Some(RawKind::ScriptData),
			Self::Markup | Self::Plaintext => None,
		}
	}
}

/// Whether the parse position sits inside an inline script element.
///
/// Scripts do not nest, so no stack is kept: a script end tag always returns to
/// [`ScriptState::Outside`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScriptState {
	/// Outside any script, or inside a script that loads an external `src`.
	#[default]
	Outside,
	/// Inside a script element without a `src` attribute.
	InsideInlineScript,
}
impl ScriptState {
	/// Returns the state after observing `tag`. Names arrive lowercased from the tokenizer.
	pub fn transition(self, tag: &Tag) -> Self {
		if &*tag.name != "script" {
			return self;
		}

		match tag.kind {
			TagKind::StartTag if tag.attrs.iter().any(|attr| &*attr.name.local == "src") =>
				Self::Outside,
			TagKind::StartTag => Self::InsideInlineScript,
			TagKind::EndTag => Self::Outside,
		}
	}

	/// Returns `true` when character data should be searched for the token.
	pub const fn scans_text(self) -> bool {
		matches!(self, Self::InsideInlineScript)
	}
}
