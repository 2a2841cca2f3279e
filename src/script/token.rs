use serde::{Deserialize, Serialize};
use std::fmt;

/// Lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    /// `intent` keyword.
    Intent,
    /// `when` keyword.
    When,
    /// `user_says` keyword.
    UserSays,
    /// `ask` keyword.
    Ask,
    /// `wait_for` keyword.
    WaitFor,
    /// `response` keyword.
    Response,
    /// `set` keyword.
    Set,
    /// `or` keyword.
    Or,
    /// `options` keyword.
    Options,

    /// Double-quoted string literal (text holds the unescaped contents).
    String,
    /// Identifier: `[A-Za-z_][A-Za-z0-9_]*`, not matching any keyword.
    Identifier,
    /// Maximal run of decimal digits.
    Number,

    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `=`
    Equals,
    /// `,`
    Comma,
    /// `$`
    Dollar,

    /// Explicit newline separator.
    Newline,
    /// End of input; emitted exactly once, as the final token.
    Eof,
}

impl TokenKind {
    /// Reclassify an identifier lexeme through the keyword table.
    ///
    /// Recognition is exact and case-sensitive; anything not in the table
    /// stays an identifier.
    pub fn keyword(text: &str) -> Option<TokenKind> {
        match text {
            "intent" => Some(TokenKind::Intent),
            "when" => Some(TokenKind::When),
            "user_says" => Some(TokenKind::UserSays),
            "ask" => Some(TokenKind::Ask),
            "wait_for" => Some(TokenKind::WaitFor),
            "response" => Some(TokenKind::Response),
            "set" => Some(TokenKind::Set),
            "or" => Some(TokenKind::Or),
            "options" => Some(TokenKind::Options),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Intent => "'intent'",
            TokenKind::When => "'when'",
            TokenKind::UserSays => "'user_says'",
            TokenKind::Ask => "'ask'",
            TokenKind::WaitFor => "'wait_for'",
            TokenKind::Response => "'response'",
            TokenKind::Set => "'set'",
            TokenKind::Or => "'or'",
            TokenKind::Options => "'options'",
            TokenKind::String => "string literal",
            TokenKind::Identifier => "identifier",
            TokenKind::Number => "number",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Equals => "'='",
            TokenKind::Comma => "','",
            TokenKind::Dollar => "'$'",
            TokenKind::Newline => "newline",
            TokenKind::Eof => "end of input",
        };
        f.write_str(name)
    }
}

/// A single lexical unit with its raw text and source position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Lexical category.
    pub kind: TokenKind,
    /// Raw lexeme (unescaped contents for string literals).
    pub text: String,
    /// 1-based source line of the first character.
    pub line: u32,
    /// 1-based source column of the first character.
    pub column: u32,
}

impl Token {
    /// Construct a token at the given position.
    pub fn new(kind: TokenKind, text: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_table_is_exact_and_case_sensitive() {
        assert_eq!(TokenKind::keyword("intent"), Some(TokenKind::Intent));
        assert_eq!(TokenKind::keyword("wait_for"), Some(TokenKind::WaitFor));
        assert_eq!(TokenKind::keyword("Intent"), None);
        assert_eq!(TokenKind::keyword("user_say"), None);
        assert_eq!(TokenKind::keyword(""), None);
    }
}
