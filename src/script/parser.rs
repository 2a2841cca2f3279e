use thiserror::Error;

use super::ast::{Action, Expression, Intent, Program, WhenClause};
use super::lexer::tokenize;
use super::token::{Token, TokenKind};

/// Errors raised while building the AST from a token stream.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A specific token kind was required and something else was found.
    #[error("expected {expected}, found {found} at line {line}, column {column}")]
    UnexpectedToken {
        /// What the grammar required here.
        expected: String,
        /// What was actually found.
        found: String,
        /// 1-based line of the offending token.
        line: u32,
        /// 1-based column of the offending token.
        column: u32,
    },

    /// An intent body contained something that is not an action keyword.
    #[error("unexpected action {found} at line {line}, column {column}")]
    UnknownAction {
        /// The offending token.
        found: String,
        /// 1-based line of the offending token.
        line: u32,
        /// 1-based column of the offending token.
        column: u32,
    },

    /// An expression position held a token no expression can start with.
    #[error("unexpected expression token {found} at line {line}, column {column}")]
    MalformedExpression {
        /// The offending token.
        found: String,
        /// 1-based line of the offending token.
        line: u32,
        /// 1-based column of the offending token.
        column: u32,
    },
}

/// Convenience result alias for parser operations.
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Compile script source text into a [`Program`].
pub fn parse_program(source: &str) -> super::Result<Program> {
    let tokens = tokenize(source)?;
    let program = Parser::new(tokens).parse()?;
    Ok(program)
}

/// Single-pass recursive-descent parser with one token of lookahead.
pub struct Parser {
    tokens: Vec<Token>,
    index: usize,
}

impl Parser {
    /// Create a parser over a token stream produced by the lexer.
    ///
    /// [`tokenize`] always terminates the stream with an EOF token; one is
    /// appended here if a hand-built stream lacks it.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::Eof) {
            let (line, column) = tokens
                .last()
                .map(|token| (token.line, token.column))
                .unwrap_or((1, 1));
            tokens.push(Token::new(TokenKind::Eof, "", line, column));
        }
        Self { tokens, index: 0 }
    }

    fn current(&self) -> &Token {
        // The EOF token is never consumed, so the index stays in bounds.
        &self.tokens[self.index]
    }

    fn advance(&mut self) {
        if self.current().kind != TokenKind::Eof {
            self.index += 1;
        }
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<String> {
        let token = self.current();
        if token.kind != kind {
            return Err(ParseError::UnexpectedToken {
                expected: kind.to_string(),
                found: token.kind.to_string(),
                line: token.line,
                column: token.column,
            });
        }
        let text = token.text.clone();
        self.advance();
        Ok(text)
    }

    fn skip_newlines(&mut self) {
        while self.at(TokenKind::Newline) {
            self.advance();
        }
    }

    /// Parse the whole program: intent declarations separated by newlines.
    pub fn parse(mut self) -> ParseResult<Program> {
        let mut intents = Vec::new();
        self.skip_newlines();

        while !self.at(TokenKind::Eof) {
            if self.at(TokenKind::Intent) {
                intents.push(self.parse_intent()?);
            } else {
                let token = self.current();
                return Err(ParseError::UnexpectedToken {
                    expected: "'intent'".to_string(),
                    found: token.kind.to_string(),
                    line: token.line,
                    column: token.column,
                });
            }
            self.skip_newlines();
        }

        Ok(Program::new(intents))
    }

    fn parse_intent(&mut self) -> ParseResult<Intent> {
        self.expect(TokenKind::Intent)?;
        let name = self.expect(TokenKind::String)?;
        self.expect(TokenKind::LBrace)?;
        self.skip_newlines();

        let trigger = self.parse_when_clause()?;
        self.skip_newlines();

        let mut actions = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            actions.push(self.parse_action()?);
            self.skip_newlines();
        }

        // The grammar closes both the when-clause body and the intent here:
        // exactly two `}` tokens end the construct.
        self.expect(TokenKind::RBrace)?;
        self.skip_newlines();
        self.expect(TokenKind::RBrace)?;

        Ok(Intent {
            name,
            trigger,
            actions,
        })
    }

    fn parse_when_clause(&mut self) -> ParseResult<WhenClause> {
        self.expect(TokenKind::When)?;
        self.expect(TokenKind::UserSays)?;

        let mut patterns = vec![self.expect(TokenKind::String)?];
        while self.at(TokenKind::Or) {
            self.advance();
            patterns.push(self.expect(TokenKind::String)?);
        }

        self.expect(TokenKind::LBrace)?;
        Ok(WhenClause { patterns })
    }

    fn parse_action(&mut self) -> ParseResult<Action> {
        match self.current().kind {
            TokenKind::Ask => {
                self.advance();
                let message = self.expect(TokenKind::String)?;
                Ok(Action::Ask { message })
            }
            TokenKind::WaitFor => {
                self.advance();
                let variable = self.expect(TokenKind::Identifier)?;
                Ok(Action::WaitFor { variable })
            }
            TokenKind::Response => {
                self.advance();
                let template = self.expect(TokenKind::String)?;
                Ok(Action::Response { template })
            }
            TokenKind::Set => {
                self.advance();
                let variable = self.expect(TokenKind::Identifier)?;
                self.expect(TokenKind::Equals)?;
                let expression = self.parse_expression()?;
                Ok(Action::Set {
                    variable,
                    expression,
                })
            }
            TokenKind::Options => {
                self.advance();
                self.expect(TokenKind::LBracket)?;
                let mut choices = Vec::new();
                if self.at(TokenKind::String) {
                    choices.push(self.expect(TokenKind::String)?);
                    while self.at(TokenKind::Comma) {
                        self.advance();
                        choices.push(self.expect(TokenKind::String)?);
                    }
                }
                self.expect(TokenKind::RBracket)?;
                Ok(Action::Options { choices })
            }
            _ => {
                let token = self.current();
                Err(ParseError::UnknownAction {
                    found: token.kind.to_string(),
                    line: token.line,
                    column: token.column,
                })
            }
        }
    }

    fn parse_expression(&mut self) -> ParseResult<Expression> {
        match self.current().kind {
            TokenKind::String => {
                let value = self.expect(TokenKind::String)?;
                Ok(Expression::StringLiteral(value))
            }
            TokenKind::Identifier => {
                let name = self.expect(TokenKind::Identifier)?;
                if self.at(TokenKind::LParen) {
                    self.advance();
                    let mut args = Vec::new();
                    if !self.at(TokenKind::RParen) {
                        args.push(self.parse_expression()?);
                        while self.at(TokenKind::Comma) {
                            self.advance();
                            args.push(self.parse_expression()?);
                        }
                    }
                    self.expect(TokenKind::RParen)?;
                    Ok(Expression::FunctionCall { name, args })
                } else {
                    Ok(Expression::Variable(name))
                }
            }
            TokenKind::Dollar => {
                self.advance();
                let name = self.expect(TokenKind::Identifier)?;
                Ok(Expression::Variable(name))
            }
            _ => {
                let token = self.current();
                Err(ParseError::MalformedExpression {
                    found: token.kind.to_string(),
                    line: token.line,
                    column: token.column,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"
# order status flow
intent "order_query" {
    when user_says "where is my order" or "order status" {
    ask "What is your order number?"
    wait_for order_number
    set status = get_order_status(order_number)
    response "Order {order_number} is: {status}"
}
}

intent "farewell" {
    when user_says "bye" {
    options ["talk again", "rate us"]
    response "Goodbye!"
}
}
"#;

    #[test]
    fn parses_intents_in_declaration_order() {
        let program = parse_program(SCRIPT).expect("parse");
        let names: Vec<&str> = program
            .intents
            .iter()
            .map(|intent| intent.name.as_str())
            .collect();
        assert_eq!(names, vec!["order_query", "farewell"]);
    }

    #[test]
    fn actions_keep_script_order() {
        let program = parse_program(SCRIPT).expect("parse");
        let intent = &program.intents[0];
        assert_eq!(
            intent.trigger.patterns,
            vec!["where is my order".to_string(), "order status".to_string()]
        );
        assert!(matches!(intent.actions[0], Action::Ask { .. }));
        assert!(matches!(intent.actions[1], Action::WaitFor { .. }));
        assert!(matches!(intent.actions[2], Action::Set { .. }));
        assert!(matches!(intent.actions[3], Action::Response { .. }));
    }

    #[test]
    fn set_parses_function_call_arguments() {
        let program = parse_program(
            "intent \"a\" {\nwhen user_says \"x\" {\nset r = create_refund(order_number, $reason)\n}\n}",
        )
        .expect("parse");
        let Action::Set { expression, .. } = &program.intents[0].actions[0] else {
            panic!("expected set action");
        };
        let Expression::FunctionCall { name, args } = expression else {
            panic!("expected function call");
        };
        assert_eq!(name, "create_refund");
        assert_eq!(
            args,
            &vec![
                Expression::Variable("order_number".to_string()),
                Expression::Variable("reason".to_string()),
            ]
        );
    }

    #[test]
    fn empty_options_list_parses() {
        let program =
            parse_program("intent \"a\" {\nwhen user_says \"x\" {\noptions []\n}\n}")
                .expect("parse");
        assert_eq!(
            program.intents[0].actions,
            vec![Action::Options { choices: Vec::new() }]
        );
    }

    #[test]
    fn intent_requires_two_closing_braces() {
        let err = parse_program("intent \"a\" {\nwhen user_says \"x\" {\nresponse \"y\"\n}\n")
            .expect_err("single closing brace must not parse");
        assert!(matches!(err, super::super::ScriptError::Parse(_)));
    }

    #[test]
    fn unknown_action_keyword_is_rejected() {
        let err = parse_program("intent \"a\" {\nwhen user_says \"x\" {\nshout \"y\"\n}\n}")
            .expect_err("should fail");
        let super::super::ScriptError::Parse(parse) = err else {
            panic!("expected parse error");
        };
        assert!(matches!(parse, ParseError::UnknownAction { .. }));
    }

    #[test]
    fn lex_errors_surface_through_parse_program() {
        let err = parse_program("intent \"a").expect_err("should fail");
        assert!(matches!(err, super::super::ScriptError::Lex(_)));
    }
}
