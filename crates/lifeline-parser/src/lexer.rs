//! Lexical analyzer for Lifeline source text.
//!
//! The lexer converts source text into a stream of [`Token`]s for parsing.
//! It handles whitespace, comments, quoted names, keywords, arrow operators,
//! and the `: message` tail of signal, note, and title statements.
//!
//! Keywords are case-insensitive. Actor names are free-form text that stops
//! at the characters which carry syntactic meaning (`-`, `<`, `>`, `+`, `:`,
//! `,`, quotes, and line breaks), so names may contain spaces.
//!
//! The public entry point is [`tokenize`], which performs error-recovering
//! lexical analysis and collects all diagnostics in a single pass.

use winnow::{
    Parser as _,
    ascii::Caseless,
    combinator::{alt, cut_err, not, peek, preceded, repeat, terminated},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{literal, one_of, take_while},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
    tokens::{PositionedToken, Token},
};

/// Rich diagnostic information for lexer errors.
///
/// Attached to winnow errors via `.context()` to provide detailed error
/// messages with codes, help text, and precise span information.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    pub code: ErrorCode,
    pub message: &'static str,
    pub help: Option<&'static str>,
    /// The error span covers from `start` to the error position.
    pub start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<'a, O> = ModalResult<O, ContextError<LexerDiagnostic>>;

/// Characters that terminate a bare actor name.
///
/// Everything else, including spaces, is part of the name. Leading and
/// trailing whitespace is trimmed when names are resolved.
fn is_actor_terminator(c: char) -> bool {
    matches!(c, '-' | '<' | '>' | '+' | ':' | ',' | '"' | '#' | '\r' | '\n')
}

/// Parse a quoted actor name: `"Order Service"`.
///
/// Backslash escapes are recognized inside the quotes, so `"The \"King\""`
/// names an actor containing literal quotes. The body runs to the next
/// unescaped `"` on the same line.
fn quoted_actor<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    let start_pos = input.current_token_start();

    '"'.parse_next(input)?;

    let name: String = cut_err(terminated(
        repeat(
            0..,
            alt((
                preceded('\\', one_of(|c: char| c != '\n' && c != '\r')),
                one_of(|c: char| c != '"' && c != '\\' && c != '\n' && c != '\r'),
            )),
        ),
        '"',
    ))
    .context(LexerDiagnostic {
        code: ErrorCode::E001,
        message: "unterminated quoted name",
        help: Some("add closing `\"` before the end of the line"),
        start: start_pos,
    })
    .parse_next(input)?;

    Ok(Token::QuotedActor(name))
}

/// Parse the message tail of a statement: `:` followed by the rest of the line.
fn message<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    preceded(':', take_while(0.., |c| c != '\n' && c != '\r'))
        .map(|text: &str| Token::Message(unescape_message(text)))
        .parse_next(input)
}

/// Normalize message text: trim, strip one full surrounding quote pair,
/// then turn literal `\n` sequences into real newlines.
fn unescape_message(text: &str) -> String {
    let trimmed = text.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    unquoted.replace("\\n", "\n")
}

/// Parse line comment starting with '#'
fn line_comment<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    preceded('#', take_while(0.., |c| c != '\n'))
        .map(Token::LineComment)
        .parse_next(input)
}

/// Parse keywords, case-insensitively, with word boundary checking.
///
/// `left of` and `right of` are two words separated by whitespace but lex
/// as single tokens.
fn keyword<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    terminated(
        alt((
            (
                Caseless("left"),
                take_while(1.., |c: char| c.is_whitespace() && c != '\n'),
                Caseless("of"),
            )
                .value(Token::LeftOf),
            (
                Caseless("right"),
                take_while(1.., |c: char| c.is_whitespace() && c != '\n'),
                Caseless("of"),
            )
                .value(Token::RightOf),
            literal(Caseless("participant")).value(Token::Participant),
            literal(Caseless("title")).value(Token::Title),
            literal(Caseless("destroy")).value(Token::Destroy),
            literal(Caseless("note")).value(Token::Note),
            literal(Caseless("over")).value(Token::Over),
            literal(Caseless("as")).value(Token::As),
        )),
        // Ensure keyword is not followed by identifier character (word boundary)
        peek(not(one_of(|c: char| c.is_ascii_alphanumeric() || c == '_'))),
    )
    .parse_next(input)
}

/// Parse a bare actor name.
///
/// Free-form text running until a syntactic character. May contain spaces
/// and a leading `*` (the late-start marker, resolved later).
fn actor<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    take_while(1.., |c: char| !is_actor_terminator(c))
        .verify(|s: &str| !s.trim().is_empty())
        .map(Token::Actor)
        .parse_next(input)
}

/// Parse multi-character operators (order matters - longest first)
fn multi_char_operator<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    alt((
        literal("--").value(Token::DoubleDash),
        literal(">>").value(Token::OpenArrow),
        literal("<<").value(Token::LeftOpenArrow),
    ))
    .parse_next(input)
}

/// Parse single character tokens
fn single_char_token<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    alt((
        '-'.value(Token::Dash),
        '+'.value(Token::Plus),
        '>'.value(Token::Arrow),
        '<'.value(Token::LeftArrow),
        ','.value(Token::Comma),
    ))
    .parse_next(input)
}

/// Parse whitespace (spaces, tabs, etc. but not newlines)
fn whitespace<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    take_while(1.., |c: char| c.is_whitespace() && c != '\n')
        .value(Token::Whitespace)
        .parse_next(input)
}

/// Parse newline
fn newline<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    '\n'.value(Token::Newline).parse_next(input)
}

/// Parse a single token with position tracking.
///
/// `line` is the 1-based line the token starts on.
fn positioned_token<'a>(input: &mut Input<'a>, line: usize) -> IResult<'a, PositionedToken<'a>> {
    let start_pos = input.current_token_start();

    let token = alt((
        line_comment,        // Must come before actor text
        newline,             // Must come before whitespace
        whitespace,          // Must come before actor text (names are trimmed anyway)
        quoted_actor,        // Must come before actor text
        message,             // `:` swallows the rest of the line
        multi_char_operator, // Must come before single char operators
        keyword,             // Must come before actor text
        actor,               // Free-form names, tried before single chars
        single_char_token,   // Single character tokens
    ))
    .parse_next(input)?;

    let end_pos = input.current_token_start();
    let span = Span::new(start_pos..end_pos);

    Ok(PositionedToken::new(token, span, line))
}

/// Lexer that accumulates tokens and diagnostics during tokenization.
struct Lexer<'a> {
    tokens: Vec<PositionedToken<'a>>,
    diagnostics: DiagnosticCollector,
    line: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer.
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
            line: 1,
        }
    }

    /// Tokenize the input, collecting tokens and errors.
    fn tokenize(&mut self, mut input: Input<'a>) {
        while !input.is_empty() {
            match positioned_token(&mut input, self.line) {
                Ok(token) => {
                    if matches!(token.token, Token::Newline) {
                        self.line += 1;
                    }
                    self.tokens.push(token);
                }
                Err(e) => {
                    // Get position before recovery
                    let error_pos = input.current_token_start();

                    let diagnostic = Self::convert_err_mode(e, error_pos, self.line);
                    self.diagnostics.emit(diagnostic);

                    // Single-character skip recovery so one bad character
                    // does not hide the rest of the line's errors.
                    if !input.is_empty() {
                        input.next_token();
                    }
                }
            }
        }
    }

    /// Finish lexing and return tokens or collected errors.
    fn finish(self) -> Result<Vec<PositionedToken<'a>>, ParseError> {
        self.diagnostics.finish().map(|()| self.tokens)
    }

    /// Convert an ErrMode and error position to a Diagnostic.
    ///
    /// Extracts `LexerDiagnostic` from the error context for rich error info
    /// with code, message, and help. Falls back to E002 (unexpected character)
    /// if no diagnostic context is found.
    fn convert_err_mode(
        err: ErrMode<ContextError<LexerDiagnostic>>,
        error_pos: usize,
        line: usize,
    ) -> Diagnostic {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        // Use the first diagnostic context if available
        if let Some(LexerDiagnostic {
            code,
            message,
            help,
            start,
        }) = context_error.context().next()
        {
            let span = Span::new(*start..error_pos);

            let mut diag = Diagnostic::error(*message)
                .with_code(*code)
                .with_label(span, code.description())
                .with_line(line);
            if let Some(h) = help {
                diag = diag.with_help(*h);
            }
            return diag;
        }

        // Fallback when no context is present
        let span = Span::new(error_pos..error_pos.saturating_add(1));
        Diagnostic::error("unexpected character")
            .with_code(ErrorCode::E002)
            .with_label(span, ErrorCode::E002.description())
            .with_line(line)
    }
}

/// Parse tokens from a string input, collecting multiple errors.
///
/// Attempts to recover from errors and continue tokenizing, collecting
/// all errors encountered. This provides better user experience by
/// reporting multiple issues in a single pass.
///
/// # Returns
///
/// - `Ok(tokens)` - All tokens successfully parsed
/// - `Err(ParseError)` - One or more errors occurred; contains all diagnostics
pub fn tokenize(input: &str) -> Result<Vec<PositionedToken<'_>>, ParseError> {
    let located_input = LocatingSlice::new(input);
    let mut lexer = Lexer::new();
    lexer.tokenize(located_input);
    lexer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_single_token(input: &str, expected: Token<'_>) {
        let mut located_input = LocatingSlice::new(input);
        let result = positioned_token(&mut located_input, 1);
        assert!(result.is_ok(), "Failed to parse: {}", input);
        let positioned = result.unwrap();
        assert_eq!(positioned.token, expected);
    }

    #[test]
    fn test_keywords() {
        test_single_token("participant", Token::Participant);
        test_single_token("title", Token::Title);
        test_single_token("destroy", Token::Destroy);
        test_single_token("note", Token::Note);
        test_single_token("over", Token::Over);
        test_single_token("left of", Token::LeftOf);
        test_single_token("right of", Token::RightOf);
        test_single_token("as", Token::As);
    }

    #[test]
    fn test_keywords_case_insensitive() {
        test_single_token("Participant", Token::Participant);
        test_single_token("TITLE", Token::Title);
        test_single_token("Note", Token::Note);
        test_single_token("LEFT OF", Token::LeftOf);
        test_single_token("Right Of", Token::RightOf);
    }

    #[test]
    fn test_keyword_word_boundaries() {
        // Words that merely start with a keyword are actor names
        test_single_token("participants", Token::Actor("participants"));
        test_single_token("notebook", Token::Actor("notebook"));
        test_single_token("overload", Token::Actor("overload"));
        test_single_token("title_case", Token::Actor("title_case"));
    }

    #[test]
    fn test_actor_names() {
        test_single_token("Alice", Token::Actor("Alice"));
        test_single_token("Order Service", Token::Actor("Order Service"));
        test_single_token("*Carol", Token::Actor("*Carol"));
        test_single_token("db_1", Token::Actor("db_1"));
    }

    #[test]
    fn test_quoted_actor() {
        test_single_token(
            "\"Order Service\"",
            Token::QuotedActor("Order Service".to_string()),
        );
        test_single_token("\"a->b\"", Token::QuotedActor("a->b".to_string()));
    }

    #[test]
    fn test_quoted_actor_escapes() {
        test_single_token(
            "\"The \\\"King\\\"\"",
            Token::QuotedActor("The \"King\"".to_string()),
        );
        test_single_token("\"a\\\\b\"", Token::QuotedActor("a\\b".to_string()));
    }

    #[test]
    fn test_operators() {
        test_single_token("--", Token::DoubleDash);
        test_single_token("-", Token::Dash);
        test_single_token("+", Token::Plus);
        test_single_token(">>", Token::OpenArrow);
        test_single_token(">", Token::Arrow);
        test_single_token("<<", Token::LeftOpenArrow);
        test_single_token("<", Token::LeftArrow);
        test_single_token(",", Token::Comma);
    }

    #[test]
    fn test_message() {
        test_single_token(": hello world", Token::Message("hello world".to_string()));
        test_single_token(":no space", Token::Message("no space".to_string()));
        test_single_token(":", Token::Message("".to_string()));
        test_single_token(
            ": line one\\nline two",
            Token::Message("line one\nline two".to_string()),
        );
    }

    #[test]
    fn test_quoted_message_strips_surrounding_quotes() {
        test_single_token(": \"hello\"", Token::Message("hello".to_string()));
        test_single_token(
            ": \"one\\ntwo\"",
            Token::Message("one\ntwo".to_string()),
        );
        // A quote pair must surround the whole message to be stripped
        test_single_token(
            ": say \"hi\"",
            Token::Message("say \"hi\"".to_string()),
        );
        test_single_token(": \"", Token::Message("\"".to_string()));
    }

    #[test]
    fn test_comments() {
        test_single_token("# this is a comment", Token::LineComment(" this is a comment"));
        test_single_token("#", Token::LineComment(""));
        test_single_token("#no space", Token::LineComment("no space"));
    }

    #[test]
    fn test_whitespace() {
        test_single_token(" ", Token::Whitespace);
        test_single_token("\t", Token::Whitespace);
        test_single_token("   ", Token::Whitespace);
        test_single_token("\n", Token::Newline);
    }

    #[test]
    fn test_full_lexing_signal() {
        let input = "Alice->Bob: Hello";
        let tokens = tokenize(input).expect("should tokenize");

        let token_types: Vec<_> = tokens.iter().map(|p| &p.token).collect();
        assert!(matches!(token_types[0], Token::Actor("Alice")));
        assert!(matches!(token_types[1], Token::Dash));
        assert!(matches!(token_types[2], Token::Arrow));
        assert!(matches!(token_types[3], Token::Actor("Bob")));
        assert!(matches!(token_types[4], Token::Message(m) if m == "Hello"));
    }

    #[test]
    fn test_full_lexing_signal_with_modifiers() {
        let input = "Alice-->+Bob: go";
        let tokens = tokenize(input).expect("should tokenize");

        let token_types: Vec<_> = tokens.iter().map(|p| &p.token).collect();
        assert!(matches!(token_types[0], Token::Actor("Alice")));
        assert!(matches!(token_types[1], Token::DoubleDash));
        assert!(matches!(token_types[2], Token::Arrow));
        assert!(matches!(token_types[3], Token::Plus));
        assert!(matches!(token_types[4], Token::Actor("Bob")));
        assert!(matches!(token_types[5], Token::Message(m) if m == "go"));
    }

    #[test]
    fn test_actor_stops_at_message() {
        let input = "note over Alice, Bob: sync";
        let tokens = tokenize(input).expect("should tokenize");

        let significant: Vec<_> = tokens
            .iter()
            .map(|p| &p.token)
            .filter(|t| !matches!(t, Token::Whitespace))
            .collect();
        assert!(matches!(significant[0], Token::Note));
        assert!(matches!(significant[1], Token::Over));
        assert!(matches!(significant[2], Token::Actor(a) if a.trim() == "Alice"));
        assert!(matches!(significant[3], Token::Comma));
        assert!(matches!(significant[4], Token::Actor(a) if a.trim() == "Bob"));
        assert!(matches!(significant[5], Token::Message(m) if m == "sync"));
    }

    #[test]
    fn test_line_tracking() {
        let input = "title: demo\nAlice->Bob: hi\n\nBob->Alice: ok";
        let tokens = tokenize(input).expect("should tokenize");

        let first = tokens.first().unwrap();
        assert_eq!(first.line, 1);

        let last = tokens.last().unwrap();
        assert!(matches!(last.token, Token::Message(_)));
        assert_eq!(last.line, 4);
    }

    #[test]
    fn test_span_tracking() {
        let input = "Alice->Bob";
        let tokens = tokenize(input).expect("should tokenize");

        assert_eq!(tokens[0].span.start(), 0);
        assert_eq!(tokens[0].span.end(), 5); // "Alice"
        assert_eq!(tokens[1].span.start(), 5);
        assert_eq!(tokens[1].span.end(), 6); // "-"
        assert_eq!(tokens[2].span.start(), 6);
        assert_eq!(tokens[2].span.end(), 7); // ">"
        assert_eq!(tokens[3].span.start(), 7);
        assert_eq!(tokens[3].span.end(), 10); // "Bob"
    }

    #[test]
    fn test_unterminated_quoted_name() {
        let result = tokenize("participant \"Order Service\nAlice->Bob: hi");
        assert!(result.is_err());

        let err = result.unwrap_err();
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E001));
        assert_eq!(diag.line(), Some(1));
        // Span covers from the opening quote to the newline
        assert_eq!(diag.labels()[0].span().start(), 12);
    }

    #[test]
    fn test_comment_to_end_of_line() {
        let input = "# header\nAlice->Bob: hi";
        let tokens = tokenize(input).expect("should tokenize");
        assert!(matches!(tokens[0].token, Token::LineComment(" header")));
        assert!(matches!(tokens[1].token, Token::Newline));
        assert!(matches!(tokens[2].token, Token::Actor("Alice")));
    }
}
