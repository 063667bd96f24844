use crate::span::Span;
use std::fmt;
use winnow::stream::Location;

/// Token types for the Lifeline sequence diagram language
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'src> {
    // Keywords
    Participant,
    Title,
    Destroy,
    Note,
    Over,
    LeftOf,
    RightOf,
    As,

    // Literals
    Actor(&'src str),
    QuotedActor(String),
    Message(String),

    // Operators
    DoubleDash,    // --
    Dash,          // -
    Plus,          // +
    OpenArrow,     // >>
    Arrow,         // >
    LeftOpenArrow, // <<
    LeftArrow,     // <

    // Punctuation
    Comma, // ,

    // Comments
    LineComment(&'src str), // # comment

    // Whitespace
    Whitespace,
    Newline,
}

/// A token with position information for winnow integration
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
    /// 1-based source line this token starts on.
    pub line: usize,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span, line: usize) -> Self {
        Self { token, span, line }
    }
}

impl<'src> std::ops::Deref for PositionedToken<'src> {
    type Target = Token<'src>;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}

impl<'src> AsRef<Token<'src>> for PositionedToken<'src> {
    fn as_ref(&self) -> &Token<'src> {
        &self.token
    }
}

impl<'src> fmt::Display for PositionedToken<'src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.token.fmt(f)
    }
}

impl<'src> Location for PositionedToken<'src> {
    fn previous_token_end(&self) -> usize {
        self.span.start()
    }

    fn current_token_start(&self) -> usize {
        self.span.start()
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Participant => write!(f, "participant"),
            Token::Title => write!(f, "title"),
            Token::Destroy => write!(f, "destroy"),
            Token::Note => write!(f, "note"),
            Token::Over => write!(f, "over"),
            Token::LeftOf => write!(f, "left of"),
            Token::RightOf => write!(f, "right of"),
            Token::As => write!(f, "as"),

            Token::Actor(name) => write!(f, "{name}"),
            Token::QuotedActor(name) => write!(f, "\"{name}\""),
            Token::Message(text) => write!(f, ": {text}"),

            Token::DoubleDash => write!(f, "--"),
            Token::Dash => write!(f, "-"),
            Token::Plus => write!(f, "+"),
            Token::OpenArrow => write!(f, ">>"),
            Token::Arrow => write!(f, ">"),
            Token::LeftOpenArrow => write!(f, "<<"),
            Token::LeftArrow => write!(f, "<"),

            Token::Comma => write!(f, ","),

            Token::LineComment(comment) => write!(f, "#{comment}"),
            Token::Whitespace => write!(f, " "),
            Token::Newline => write!(f, "\\n"),
        }
    }
}
