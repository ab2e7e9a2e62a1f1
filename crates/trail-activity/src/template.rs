// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Label templates.
//!
//! A template is an ordered list of literal and placeholder segments parsed
//! from text such as `{actor} uploaded "{object}" {when}.`. Braces are
//! escaped by doubling them (`{{`, `}}`).

use std::fmt;
use std::str::FromStr;

use crate::error::TemplateError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Placeholder {
	Actor,
	Object,
	When,
	ObjectType,
	Action,
	ObjectId,
	Subtype,
	/// `{meta:KEY}`, a metadata value looked up by key.
	Meta(String),
}

impl Placeholder {
	fn from_name(name: &str) -> Result<Self, TemplateError> {
		let placeholder = match name {
			"actor" => Placeholder::Actor,
			"object" => Placeholder::Object,
			"when" => Placeholder::When,
			"object_type" => Placeholder::ObjectType,
			"action" => Placeholder::Action,
			"object_id" => Placeholder::ObjectId,
			"subtype" => Placeholder::Subtype,
			other => match other.strip_prefix("meta:") {
				Some(key) if !key.is_empty() => Placeholder::Meta(key.to_string()),
				_ => return Err(TemplateError::UnknownPlaceholder(other.to_string())),
			},
		};
		Ok(placeholder)
	}
}

impl fmt::Display for Placeholder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Placeholder::Actor => f.write_str("{actor}"),
			Placeholder::Object => f.write_str("{object}"),
			Placeholder::When => f.write_str("{when}"),
			Placeholder::ObjectType => f.write_str("{object_type}"),
			Placeholder::Action => f.write_str("{action}"),
			Placeholder::ObjectId => f.write_str("{object_id}"),
			Placeholder::Subtype => f.write_str("{subtype}"),
			Placeholder::Meta(key) => write!(f, "{{meta:{key}}}"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
	Literal(String),
	Placeholder(Placeholder),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTemplate {
	segments: Vec<Segment>,
}

impl LabelTemplate {
	pub fn parse(source: &str) -> Result<Self, TemplateError> {
		let mut segments = Vec::new();
		let mut literal = String::new();
		let mut chars = source.char_indices().peekable();

		while let Some((pos, c)) = chars.next() {
			match c {
				'{' if matches!(chars.peek(), Some((_, '{'))) => {
					chars.next();
					literal.push('{');
				}
				'}' if matches!(chars.peek(), Some((_, '}'))) => {
					chars.next();
					literal.push('}');
				}
				'}' => return Err(TemplateError::UnmatchedClose(pos)),
				'{' => {
					let mut name = String::new();
					let mut closed = false;
					for (_, inner) in chars.by_ref() {
						if inner == '}' {
							closed = true;
							break;
						}
						name.push(inner);
					}
					if !closed {
						return Err(TemplateError::Unterminated(pos));
					}
					if !literal.is_empty() {
						segments.push(Segment::Literal(std::mem::take(&mut literal)));
					}
					segments.push(Segment::Placeholder(Placeholder::from_name(name.trim())?));
				}
				other => literal.push(other),
			}
		}

		if !literal.is_empty() {
			segments.push(Segment::Literal(literal));
		}

		Ok(Self { segments })
	}

	pub fn from_segments(segments: Vec<Segment>) -> Self {
		Self { segments }
	}

	pub fn segments(&self) -> &[Segment] {
		&self.segments
	}

	/// Substitute every placeholder with the value produced by `resolve`.
	pub fn render_with<F>(&self, mut resolve: F) -> String
	where
		F: FnMut(&Placeholder) -> String,
	{
		let mut out = String::new();
		for segment in &self.segments {
			match segment {
				Segment::Literal(text) => out.push_str(text),
				Segment::Placeholder(placeholder) => out.push_str(&resolve(placeholder)),
			}
		}
		out
	}
}

impl FromStr for LabelTemplate {
	type Err = TemplateError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl fmt::Display for LabelTemplate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for segment in &self.segments {
			match segment {
				Segment::Literal(text) => f.write_str(&text.replace('{', "{{").replace('}', "}}"))?,
				Segment::Placeholder(placeholder) => write!(f, "{placeholder}")?,
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	mod parse {
		use super::*;

		#[test]
		fn splits_literals_and_placeholders() {
			let template = LabelTemplate::parse("{actor} uploaded \"{object}\" {when}.").unwrap();
			assert_eq!(
				template.segments(),
				&[
					Segment::Placeholder(Placeholder::Actor),
					Segment::Literal(" uploaded \"".to_string()),
					Segment::Placeholder(Placeholder::Object),
					Segment::Literal("\" ".to_string()),
					Segment::Placeholder(Placeholder::When),
					Segment::Literal(".".to_string()),
				]
			);
		}

		#[test]
		fn parses_meta_placeholder() {
			let template = LabelTemplate::parse("from {meta:old_value}").unwrap();
			assert_eq!(
				template.segments()[1],
				Segment::Placeholder(Placeholder::Meta("old_value".to_string()))
			);
		}

		#[test]
		fn doubled_braces_are_literal() {
			let template = LabelTemplate::parse("{{literal}} {action}").unwrap();
			assert_eq!(
				template.segments()[0],
				Segment::Literal("{literal} ".to_string())
			);
		}

		#[test]
		fn rejects_unterminated_placeholder() {
			assert_eq!(
				LabelTemplate::parse("hello {actor"),
				Err(TemplateError::Unterminated(6))
			);
		}

		#[test]
		fn rejects_stray_close() {
			assert_eq!(
				LabelTemplate::parse("oops } here"),
				Err(TemplateError::UnmatchedClose(5))
			);
		}

		#[test]
		fn rejects_unknown_placeholder() {
			assert_eq!(
				LabelTemplate::parse("{nobody}"),
				Err(TemplateError::UnknownPlaceholder("nobody".to_string()))
			);
			assert!(LabelTemplate::parse("{meta:}").is_err());
		}
	}

	mod render {
		use super::*;

		#[test]
		fn substitutes_in_order() {
			let template: LabelTemplate = "{actor} did {action} on #{object_id}".parse().unwrap();
			let out = template.render_with(|p| match p {
				Placeholder::Actor => "alice".to_string(),
				Placeholder::Action => "update".to_string(),
				Placeholder::ObjectId => "7".to_string(),
				_ => String::new(),
			});
			assert_eq!(out, "alice did update on #7");
		}

		#[test]
		fn display_reproduces_source() {
			let source = "{{x}} {actor} changed {meta:new_value}";
			let template = LabelTemplate::parse(source).unwrap();
			assert_eq!(template.to_string(), source);
		}
	}

	proptest! {
		#[test]
		fn brace_free_text_is_single_literal(text in "[^{}]+") {
			let template = LabelTemplate::parse(&text).unwrap();
			prop_assert_eq!(template.segments(), &[Segment::Literal(text.clone())]);
			prop_assert_eq!(template.render_with(|_| String::from("X")), text);
		}

		#[test]
		fn parse_never_panics(text in ".*") {
			let _ = LabelTemplate::parse(&text);
		}
	}
}
