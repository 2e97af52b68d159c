//! Template parser for ICU MessageFormat syntax.
//!
//! Supported: literal text, `{arg}`, `{arg, number|date|time[, style]}`,
//! `{arg, plural|selectordinal, [offset:n] =n {..} category {..}}`,
//! `{arg, select, key {..}}`, `#` inside plural branches, and apostrophe
//! quoting (`''` is a literal quote, `'{...}'` is literal text).

use super::FormatError;

/// Deepest plural/select nesting a template may use.
pub const MAX_NESTING: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum Part {
	Literal(String),
	Argument(String),
	Number { name: String, style: Option<String> },
	Date { name: String, style: Option<String> },
	Time { name: String, style: Option<String> },
	Plural { name: String, offset: f64, ordinal: bool, branches: Vec<(Selector, Vec<Part>)> },
	Select { name: String, branches: Vec<(String, Vec<Part>)> },
	/// `#`: the enclosing plural value minus its offset.
	Pound,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
	Exact(f64),
	Category(String),
}

pub fn parse(template: &str) -> Result<Vec<Part>, FormatError> {
	let mut p = Parser { chars: template.chars().collect(), pos: 0, depth: 0 };
	let parts = p.message(false, false)?;
	if p.pos < p.chars.len() {
		return Err(p.error("unmatched '}'"));
	}
	Ok(parts)
}

struct Parser {
	chars: Vec<char>,
	pos: usize,
	depth: usize,
}

impl Parser {
	fn error(&self, reason: impl Into<String>) -> FormatError {
		FormatError::Syntax { offset: self.pos, reason: reason.into() }
	}

	fn peek(&self) -> Option<char> { self.chars.get(self.pos).copied() }

	fn peek_at(&self, n: usize) -> Option<char> { self.chars.get(self.pos + n).copied() }

	fn skip_ws(&mut self) {
		while self.peek().is_some_and(char::is_whitespace) {
			self.pos += 1;
		}
	}

	fn expect(&mut self, c: char) -> Result<(), FormatError> {
		if self.peek() == Some(c) {
			self.pos += 1;
			Ok(())
		} else {
			Err(self.error(format!("expected '{c}'")))
		}
	}

	/// Parse message text up to the closing `}` of a nested message (left
	/// unconsumed) or the end of input.
	fn message(&mut self, nested: bool, in_plural: bool) -> Result<Vec<Part>, FormatError> {
		let mut parts = Vec::new();
		let mut text = String::new();
		while let Some(c) = self.peek() {
			match c {
				'{' => {
					flush(&mut text, &mut parts);
					parts.push(self.argument(in_plural)?);
				}
				'}' => {
					if nested {
						break;
					}
					return Err(self.error("unmatched '}'"));
				}
				'#' if in_plural => {
					flush(&mut text, &mut parts);
					parts.push(Part::Pound);
					self.pos += 1;
				}
				'\'' => self.quoted(&mut text, in_plural),
				_ => {
					text.push(c);
					self.pos += 1;
				}
			}
		}
		if nested && self.peek().is_none() {
			return Err(self.error("unterminated '{'"));
		}
		flush(&mut text, &mut parts);
		Ok(parts)
	}

	fn quoted(&mut self, text: &mut String, in_plural: bool) {
		match self.peek_at(1) {
			Some('\'') => {
				text.push('\'');
				self.pos += 2;
			}
			Some('{') | Some('}') => self.quoted_run(text),
			Some('#') if in_plural => self.quoted_run(text),
			_ => {
				text.push('\'');
				self.pos += 1;
			}
		}
	}

	/// Literal run between apostrophes; an unterminated run extends to the end.
	fn quoted_run(&mut self, text: &mut String) {
		self.pos += 1;
		while let Some(c) = self.peek() {
			if c == '\'' {
				if self.peek_at(1) == Some('\'') {
					text.push('\'');
					self.pos += 2;
					continue;
				}
				self.pos += 1;
				return;
			}
			text.push(c);
			self.pos += 1;
		}
	}

	fn word(&mut self) -> String {
		let start = self.pos;
		while self.peek().is_some_and(|c| !c.is_whitespace() && !matches!(c, '{' | '}' | ',' | '#' | '\'')) {
			self.pos += 1;
		}
		self.chars[start..self.pos].iter().collect()
	}

	fn argument(&mut self, in_plural: bool) -> Result<Part, FormatError> {
		self.expect('{')?;
		self.skip_ws();
		let name = self.word();
		if name.is_empty() {
			return Err(self.error("expected argument name"));
		}
		self.skip_ws();
		match self.peek() {
			Some('}') => {
				self.pos += 1;
				return Ok(Part::Argument(name));
			}
			Some(',') => self.pos += 1,
			Some(_) => return Err(self.error("expected ',' or '}' after argument name")),
			None => return Err(self.error("unterminated '{'")),
		}
		self.skip_ws();
		let kind = self.word();
		self.skip_ws();
		match kind.as_str() {
			"number" | "date" | "time" => {
				let style = self.simple_style()?;
				Ok(match kind.as_str() {
					"number" => Part::Number { name, style },
					"date" => Part::Date { name, style },
					_ => Part::Time { name, style },
				})
			}
			"plural" | "selectordinal" => self.plural(name, kind == "selectordinal"),
			"select" => self.select(name, in_plural),
			"" => Err(self.error("expected argument type")),
			other => Err(self.error(format!("unknown argument type '{other}'"))),
		}
	}

	fn simple_style(&mut self) -> Result<Option<String>, FormatError> {
		match self.peek() {
			Some('}') => {
				self.pos += 1;
				Ok(None)
			}
			Some(',') => {
				self.pos += 1;
				let start = self.pos;
				while self.peek().is_some_and(|c| c != '}' && c != '{') {
					self.pos += 1;
				}
				let style: String = self.chars[start..self.pos].iter().collect::<String>().trim().to_string();
				self.expect('}')?;
				if style.is_empty() {
					return Err(self.error("empty argument style"));
				}
				Ok(Some(style))
			}
			_ => Err(self.error("expected ',' or '}' after argument type")),
		}
	}

	fn comma(&mut self) -> Result<(), FormatError> {
		self.expect(',')?;
		self.skip_ws();
		Ok(())
	}

	fn plural(&mut self, name: String, ordinal: bool) -> Result<Part, FormatError> {
		self.comma()?;
		let mut offset = 0.0;
		let mut branches = Vec::new();
		loop {
			self.skip_ws();
			match self.peek() {
				Some('}') => {
					self.pos += 1;
					break;
				}
				None => return Err(self.error("unterminated plural argument")),
				_ => {}
			}
			let sel = self.word();
			if sel.is_empty() {
				return Err(self.error("expected plural selector"));
			}
			if let Some(rest) = sel.strip_prefix("offset:") {
				if !branches.is_empty() {
					return Err(self.error("offset must precede plural branches"));
				}
				let rest = if rest.is_empty() {
					self.skip_ws();
					self.word()
				} else {
					rest.to_string()
				};
				offset = rest.parse().map_err(|_| self.error(format!("invalid plural offset '{rest}'")))?;
				continue;
			}
			let selector = match sel.strip_prefix('=') {
				Some(n) => Selector::Exact(n.parse().map_err(|_| self.error(format!("invalid exact selector '{sel}'")))?),
				None => Selector::Category(sel),
			};
			let body = self.branch(true)?;
			branches.push((selector, body));
		}
		if !branches.iter().any(|(s, _)| matches!(s, Selector::Category(c) if c == "other")) {
			return Err(self.error("plural argument requires an 'other' branch"));
		}
		Ok(Part::Plural { name, offset, ordinal, branches })
	}

	fn select(&mut self, name: String, in_plural: bool) -> Result<Part, FormatError> {
		self.comma()?;
		let mut branches = Vec::new();
		loop {
			self.skip_ws();
			match self.peek() {
				Some('}') => {
					self.pos += 1;
					break;
				}
				None => return Err(self.error("unterminated select argument")),
				_ => {}
			}
			let key = self.word();
			if key.is_empty() {
				return Err(self.error("expected select key"));
			}
			let body = self.branch(in_plural)?;
			branches.push((key, body));
		}
		if !branches.iter().any(|(k, _)| k == "other") {
			return Err(self.error("select argument requires an 'other' branch"));
		}
		Ok(Part::Select { name, branches })
	}

	fn branch(&mut self, in_plural: bool) -> Result<Vec<Part>, FormatError> {
		self.skip_ws();
		self.expect('{')?;
		if self.depth >= MAX_NESTING {
			return Err(self.error(format!("branches nested deeper than {MAX_NESTING} levels")));
		}
		self.depth += 1;
		let body = self.message(true, in_plural)?;
		self.depth -= 1;
		self.expect('}')?;
		Ok(body)
	}
}

fn flush(text: &mut String, parts: &mut Vec<Part>) {
	if !text.is_empty() {
		parts.push(Part::Literal(std::mem::take(text)));
	}
}
