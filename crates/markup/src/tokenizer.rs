//! Markup tokenizer.
//!
//! A single forward scan over the input producing [`MarkupToken`]s. Tag and
//! attribute names are ASCII-lowercased; character references in text and
//! attribute values are decoded. Doctype and processing-instruction-like
//! constructs (`<!...>`, `<?...>`) are skipped without producing a token.

use htmlize::unescape;

/// One lexical unit of the fragment source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupToken {
    StartTag {
        name: String,
        attrs: Vec<(String, String)>,
        self_closing: bool,
    },
    EndTag {
        name: String,
    },
    Text(String),
    Comment(String),
}

/// Tokenize a whole fragment.
pub fn tokenize(input: &str) -> Vec<MarkupToken> {
    Scanner {
        chars: input.chars().collect(),
        pos: 0,
    }
    .run()
}

struct Scanner {
    chars: Vec<char>,
    pos: usize,
}

impl Scanner {
    fn run(mut self) -> Vec<MarkupToken> {
        let mut tokens = Vec::new();
        while self.pos < self.chars.len() {
            if self.peek() == Some('<') {
                if self.starts_with("<!--") {
                    tokens.push(self.scan_comment());
                } else if self.starts_with("<!") || self.starts_with("<?") {
                    self.skip_past('>');
                } else if self.starts_with("</") {
                    if let Some(token) = self.scan_end_tag() {
                        tokens.push(token);
                    }
                } else if self
                    .chars
                    .get(self.pos + 1)
                    .is_some_and(|c| c.is_ascii_alphabetic())
                {
                    tokens.push(self.scan_start_tag());
                } else {
                    // A lone `<` that opens nothing is literal text.
                    self.scan_text_into(&mut tokens, true);
                    continue;
                }
            } else {
                self.scan_text_into(&mut tokens, false);
            }
        }
        tokens
    }

    // -- low level ----------------------------------------------------------

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn starts_with(&self, prefix: &str) -> bool {
        prefix
            .chars()
            .enumerate()
            .all(|(i, c)| self.chars.get(self.pos + i) == Some(&c))
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    /// Advance past the next occurrence of `stop` (or to the end of input).
    fn skip_past(&mut self, stop: char) {
        while let Some(c) = self.peek() {
            self.pos += 1;
            if c == stop {
                break;
            }
        }
    }

    // -- token scanners -----------------------------------------------------

    /// Consume a text run. When `include_first` is set the current character
    /// is taken literally even though it is `<`.
    fn scan_text_into(&mut self, tokens: &mut Vec<MarkupToken>, include_first: bool) {
        let mut raw = String::new();
        if include_first {
            raw.push('<');
            self.pos += 1;
        }
        while let Some(c) = self.peek() {
            if c == '<' {
                break;
            }
            raw.push(c);
            self.pos += 1;
        }
        if raw.is_empty() {
            return;
        }
        let decoded = unescape(raw.as_str()).into_owned();
        // Merge with a preceding text token so literal `<` runs stay whole.
        if let Some(MarkupToken::Text(prev)) = tokens.last_mut() {
            prev.push_str(&decoded);
        } else {
            tokens.push(MarkupToken::Text(decoded));
        }
    }

    fn scan_comment(&mut self) -> MarkupToken {
        self.pos += 4; // "<!--"
        let mut data = String::new();
        while self.pos < self.chars.len() {
            if self.starts_with("-->") {
                self.pos += 3;
                return MarkupToken::Comment(data);
            }
            data.push(self.chars[self.pos]);
            self.pos += 1;
        }
        // Unterminated comment runs to end of input.
        MarkupToken::Comment(data)
    }

    fn scan_end_tag(&mut self) -> Option<MarkupToken> {
        self.pos += 2; // "</"
        let name = self.scan_name();
        self.skip_past('>');
        if name.is_empty() {
            return None; // `</>` and friends produce nothing
        }
        Some(MarkupToken::EndTag { name })
    }

    fn scan_start_tag(&mut self) -> MarkupToken {
        self.pos += 1; // "<"
        let name = self.scan_name();
        let mut attrs: Vec<(String, String)> = Vec::new();
        let mut self_closing = false;

        loop {
            self.skip_ws();
            match self.peek() {
                None => break,
                Some('>') => {
                    self.pos += 1;
                    break;
                }
                Some('/') => {
                    self.pos += 1;
                    if self.peek() == Some('>') {
                        self.pos += 1;
                        self_closing = true;
                        break;
                    }
                }
                Some(_) => {
                    let (attr_name, attr_value) = self.scan_attribute();
                    // First write wins, like attribute parsing in browsers.
                    if !attrs.iter().any(|(n, _)| *n == attr_name) {
                        attrs.push((attr_name, attr_value));
                    }
                }
            }
        }

        MarkupToken::StartTag {
            name,
            attrs,
            self_closing,
        }
    }

    fn scan_name(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                name.push(c.to_ascii_lowercase());
                self.pos += 1;
            } else {
                break;
            }
        }
        name
    }

    fn scan_attribute(&mut self) -> (String, String) {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == '=' || c == '>' || c == '/' {
                break;
            }
            name.push(c.to_ascii_lowercase());
            self.pos += 1;
        }
        self.skip_ws();
        if self.peek() != Some('=') {
            return (name, String::new()); // valueless attribute
        }
        self.pos += 1;
        self.skip_ws();

        let mut raw = String::new();
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                while let Some(c) = self.peek() {
                    self.pos += 1;
                    if c == quote {
                        break;
                    }
                    raw.push(c);
                }
            }
            _ => {
                while let Some(c) = self.peek() {
                    if c.is_whitespace() || c == '>' {
                        break;
                    }
                    raw.push(c);
                    self.pos += 1;
                }
            }
        }
        (name, unescape(raw.as_str()).into_owned())
    }
}

// ===========================================================================
// Tests
// ===========================================================================
