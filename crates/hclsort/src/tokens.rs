//! ordered token buffer used when relocating attribute and block text
//!
//! A [TokenBuf] is a lossless partition of a raw source slice into
//! separator tokens (whitespace runs, newlines included) and content
//! tokens (everything else, comments included). Every sorter trims an
//! item's buffer before re-inserting it into a rebuilt body, so the
//! renderer can place exactly one separator between consecutive items
//! and none at the far ends. Interior tokens are never modified.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Whitespace run separating content, carries no meaning of its own
    Separator,
    /// Raw text, including comment text
    Content,
}

#[derive(derive_new::new, Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

/// Ordered sequence of tokens, concatenating back to the exact input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenBuf {
    tokens: Vec<Token>,
}

impl TokenBuf {
    /// Splits `raw` into alternating separator and content tokens.
    ///
    /// The partition is lossless: rendering the buffer yields `raw`
    /// byte for byte.
    pub fn lex(raw: &str) -> Self {
        let mut tokens = Vec::new();
        let mut rest = raw;

        while !rest.is_empty() {
            let ws_len = rest.len() - rest.trim_start().len();
            if ws_len > 0 {
                tokens.push(Token::new(TokenKind::Separator, rest[..ws_len].to_string()));
                rest = &rest[ws_len..];
                continue;
            }

            let content_len = rest.find(char::is_whitespace).unwrap_or(rest.len());
            tokens.push(Token::new(TokenKind::Content, rest[..content_len].to_string()));
            rest = &rest[content_len..];
        }

        Self { tokens }
    }

    /// Strips the leading and trailing runs of separator tokens.
    pub fn trim(&mut self) {
        while matches!(self.tokens.last(), Some(token) if token.kind == TokenKind::Separator) {
            self.tokens.pop();
        }

        let content_start = self
            .tokens
            .iter()
            .position(|token| token.kind == TokenKind::Content)
            .unwrap_or(self.tokens.len());
        self.tokens.drain(..content_start);
    }

    pub fn trimmed(mut self) -> Self {
        self.trim();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

impl fmt::Display for TokenBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            f.write_str(&token.text)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lex_is_lossless() {
        let raw = "\n\n  # note\n  a = [\n    1, # one\n  ]  ";
        assert_eq!(TokenBuf::lex(raw).to_string(), raw);
    }

    #[test]
    fn trim_strips_separator_runs_at_both_ends() {
        let buf = TokenBuf::lex("\n\n  a = 1\n").trimmed();
        assert_eq!(buf.to_string(), "a = 1");
    }

    #[test]
    fn trim_keeps_interior_separators_and_comments() {
        let buf = TokenBuf::lex("\n# keep me\na = {\n  b = 2\n}\n\n").trimmed();
        assert_eq!(buf.to_string(), "# keep me\na = {\n  b = 2\n}");
    }

    #[test]
    fn trim_of_pure_whitespace_is_empty() {
        let buf = TokenBuf::lex(" \n\t\n ").trimmed();
        assert!(buf.is_empty());
        assert_eq!(buf.to_string(), "");
    }

    #[test]
    fn trim_is_idempotent() {
        let once = TokenBuf::lex("  a = 1  ").trimmed();
        let twice = once.clone().trimmed();
        assert_eq!(once, twice);
    }
}
