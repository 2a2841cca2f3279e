use thiserror::Error;

use super::token::{Token, TokenKind};

/// Errors raised during lexical analysis.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    /// A string literal was still open when the input ended.
    #[error("unterminated string literal at line {line}, column {column}")]
    UnterminatedString {
        /// 1-based line of the opening quote.
        line: u32,
        /// 1-based column of the opening quote.
        column: u32,
    },

    /// A character matched no lexical rule.
    #[error("unexpected character '{ch}' at line {line}, column {column}")]
    UnexpectedChar {
        /// The offending character.
        ch: char,
        /// 1-based line of the character.
        line: u32,
        /// 1-based column of the character.
        column: u32,
    },
}

/// Convenience result alias for lexer operations.
pub type LexResult<T> = std::result::Result<T, LexError>;

/// Tokenize a full script source, ending with exactly one EOF token.
pub fn tokenize(source: &str) -> LexResult<Vec<Token>> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

/// Character-cursor scanner over script source text.
///
/// Source text is UTF-8; multi-byte characters are legal inside string
/// literals and comments but match no rule elsewhere.
pub struct Lexer {
    chars: Vec<char>,
    index: usize,
    line: u32,
    column: u32,
}

impl Lexer {
    /// Create a lexer positioned at the start of `source`.
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            index: 0,
            line: 1,
            column: 1,
        }
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current() {
            self.index += 1;
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn skip_spacing(&mut self) {
        while matches!(self.current(), Some(' ' | '\t' | '\r')) {
            self.advance();
        }
    }

    /// Discard a `#` comment up to (not including) the terminating newline,
    /// so the newline still becomes an explicit separator token.
    fn skip_comment(&mut self) {
        while let Some(ch) = self.current() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn read_string(&mut self) -> LexResult<String> {
        let (line, column) = (self.line, self.column);
        self.advance(); // opening quote
        let mut text = String::new();

        loop {
            match self.current() {
                None => return Err(LexError::UnterminatedString { line, column }),
                Some('"') => {
                    self.advance();
                    return Ok(text);
                }
                Some('\\') => {
                    self.advance();
                    match self.current() {
                        None => return Err(LexError::UnterminatedString { line, column }),
                        Some('n') => text.push('\n'),
                        Some('t') => text.push('\t'),
                        Some('\\') => text.push('\\'),
                        Some('"') => text.push('"'),
                        // Unknown escapes pass through literally.
                        Some(other) => text.push(other),
                    }
                    self.advance();
                }
                Some(ch) => {
                    text.push(ch);
                    self.advance();
                }
            }
        }
    }

    fn read_number(&mut self) -> String {
        let mut text = String::new();
        while let Some(ch) = self.current() {
            if !ch.is_ascii_digit() {
                break;
            }
            text.push(ch);
            self.advance();
        }
        text
    }

    fn read_identifier(&mut self) -> String {
        let mut text = String::new();
        while let Some(ch) = self.current() {
            if !(ch.is_ascii_alphanumeric() || ch == '_') {
                break;
            }
            text.push(ch);
            self.advance();
        }
        text
    }

    /// Produce the next token, or the EOF token once input is exhausted.
    pub fn next_token(&mut self) -> LexResult<Token> {
        while let Some(ch) = self.current() {
            match ch {
                ' ' | '\t' | '\r' => {
                    self.skip_spacing();
                }
                '#' => {
                    self.skip_comment();
                }
                '\n' => {
                    let token = Token::new(TokenKind::Newline, "\n", self.line, self.column);
                    self.advance();
                    return Ok(token);
                }
                '"' => {
                    let (line, column) = (self.line, self.column);
                    let text = self.read_string()?;
                    return Ok(Token::new(TokenKind::String, text, line, column));
                }
                _ if ch.is_ascii_digit() => {
                    let (line, column) = (self.line, self.column);
                    let text = self.read_number();
                    return Ok(Token::new(TokenKind::Number, text, line, column));
                }
                _ if ch.is_ascii_alphabetic() || ch == '_' => {
                    let (line, column) = (self.line, self.column);
                    let text = self.read_identifier();
                    let kind = TokenKind::keyword(&text).unwrap_or(TokenKind::Identifier);
                    return Ok(Token::new(kind, text, line, column));
                }
                _ => {
                    let (line, column) = (self.line, self.column);
                    let kind = match ch {
                        '{' => TokenKind::LBrace,
                        '}' => TokenKind::RBrace,
                        '(' => TokenKind::LParen,
                        ')' => TokenKind::RParen,
                        '[' => TokenKind::LBracket,
                        ']' => TokenKind::RBracket,
                        '=' => TokenKind::Equals,
                        ',' => TokenKind::Comma,
                        '$' => TokenKind::Dollar,
                        other => {
                            return Err(LexError::UnexpectedChar {
                                ch: other,
                                line,
                                column,
                            });
                        }
                    };
                    self.advance();
                    return Ok(Token::new(kind, ch.to_string(), line, column));
                }
            }
        }

        Ok(Token::new(TokenKind::Eof, "", self.line, self.column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .expect("tokenize")
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn keywords_literals_and_punctuation() {
        let tokens = tokenize(r#"intent "greet" { set x = "hi" }"#).expect("tokenize");
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Intent,
                TokenKind::String,
                TokenKind::LBrace,
                TokenKind::Set,
                TokenKind::Identifier,
                TokenKind::Equals,
                TokenKind::String,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[1].text, "greet");
        assert_eq!(tokens[4].text, "x");
    }

    #[test]
    fn stream_ends_with_exactly_one_eof() {
        let tokens = tokenize("intent").expect("tokenize");
        let eof_count = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Eof)
            .count();
        assert_eq!(eof_count, 1);
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    }

    #[test]
    fn newlines_are_explicit_and_comments_are_discarded() {
        assert_eq!(
            kinds("ask \"a\" # trailing comment\nresponse \"b\""),
            vec![
                TokenKind::Ask,
                TokenKind::String,
                TokenKind::Newline,
                TokenKind::Response,
                TokenKind::String,
                TokenKind::Eof,
            ]
        );
        // A whole-line comment leaves only its newline behind.
        assert_eq!(
            kinds("# just a comment\n"),
            vec![TokenKind::Newline, TokenKind::Eof]
        );
    }

    #[test]
    fn string_escapes() {
        let tokens = tokenize(r#""a\nb\tc\\d\"e\qf""#).expect("tokenize");
        // \q is no recognized escape, so the q passes through literally.
        assert_eq!(tokens[0].text, "a\nb\tc\\d\"eqf");
    }

    #[test]
    fn unterminated_string_is_fatal() {
        let err = tokenize("ask \"oops").expect_err("should fail");
        assert_eq!(
            err,
            LexError::UnterminatedString { line: 1, column: 5 }
        );
    }

    #[test]
    fn unexpected_character_is_fatal() {
        let err = tokenize("set x @ 1").expect_err("should fail");
        assert!(matches!(err, LexError::UnexpectedChar { ch: '@', .. }));
    }

    #[test]
    fn positions_track_lines_and_columns() {
        let tokens = tokenize("intent\n  ask \"hi\"").expect("tokenize");
        let ask = tokens
            .iter()
            .find(|t| t.kind == TokenKind::Ask)
            .expect("ask token");
        assert_eq!((ask.line, ask.column), (2, 3));
    }

    #[test]
    fn multibyte_text_survives_string_literals() {
        let tokens = tokenize("ask \"查询订单\"").expect("tokenize");
        assert_eq!(tokens[1].text, "查询订单");
    }
}
