//! Parser for Lifeline source tokens.
//!
//! This module transforms a token stream from the [`lexer`](super::lexer) into
//! a statement list defined in [`parser_types`](super::parser_types). The
//! public entry point is [`build_statements`].

use winnow::{
    Parser as _,
    combinator::{alt, eof, opt, peek, repeat},
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use lifeline_core::semantic::{ArrowHead, LevelChange, LineStyle, NotePlacement};

use crate::{
    error::{Diagnostic, ErrorCode},
    parser_types::{ActorRef, ArrowSpec, Statement, split_name_alias},
    span::Span,
    tokens::{PositionedToken, Token},
};

/// Context type for parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// Description of what is currently being parsed
    Label(&'static str),
    /// Remaining token count (`eof_offset()`) at error start position
    ///
    /// Used to calculate start_offset as: `tokens.len() - start_offset_value`
    StartOffset(usize),
}

type Input<'src> = LifelineTokenSlice<'src>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;
/// Type alias for winnow TokenSlice with our positioned tokens
type LifelineTokenSlice<'src> = TokenSlice<'src, PositionedToken<'src>>;

fn cut_err<'src, O, F>(input: &mut Input<'src>, f: F) -> IResult<O>
where
    F: FnOnce(&mut Input<'src>) -> IResult<O>,
{
    let start_remaining = input.eof_offset();

    match f(input) {
        Ok(o) => Ok(o),
        Err(ErrMode::Backtrack(mut e)) | Err(ErrMode::Cut(mut e)) => {
            e.push(Context::StartOffset(start_remaining));
            Err(ErrMode::Cut(e))
        }
        Err(e) => Err(e),
    }
}

/// Helper to create a Cut error with a Label and StartOffset context
fn cut_error_with_label<'src>(
    input: &Input<'src>,
    label: &'static str,
) -> ErrMode<ContextError<Context>> {
    let mut e = ContextError::new();
    e.push(Context::Label(label));
    e.push(Context::StartOffset(input.eof_offset()));
    ErrMode::Cut(e)
}

/// Parse horizontal whitespace (never a newline)
fn ws<'src>(input: &mut Input<'src>) -> IResult<()> {
    any.verify(|token: &PositionedToken<'_>| matches!(token.token, Token::Whitespace))
        .void()
        .parse_next(input)
}

/// Parse zero or more horizontal whitespace tokens
fn ws0<'src>(input: &mut Input<'src>) -> IResult<()> {
    repeat(0.., ws).parse_next(input)
}

/// Parse whitespace, newlines, and comments between statements
fn blank<'src>(input: &mut Input<'src>) -> IResult<()> {
    any.verify(|token: &PositionedToken<'_>| {
        matches!(
            token.token,
            Token::Whitespace | Token::Newline | Token::LineComment(_)
        )
    })
    .void()
    .parse_next(input)
}

/// Parse zero or more whitespace/newline/comment tokens
fn blanks0<'src>(input: &mut Input<'src>) -> IResult<()> {
    repeat(0.., blank).parse_next(input)
}

/// Parse the end of a statement line: optional trailing whitespace and
/// comment, then a newline or end of input.
fn end_of_line<'src>(input: &mut Input<'src>) -> IResult<()> {
    ws0.parse_next(input)?;
    opt(any.verify(|token: &PositionedToken<'_>| matches!(token.token, Token::LineComment(_))))
        .parse_next(input)?;
    alt((
        any.verify(|token: &PositionedToken<'_>| matches!(token.token, Token::Newline))
            .void(),
        eof.void(),
    ))
    .context(Context::Label("end of line"))
    .parse_next(input)
}

/// Peek the 1-based line number of the next token.
fn current_line<'src>(input: &mut Input<'src>) -> IResult<usize> {
    peek(any)
        .map(|token: &PositionedToken<'_>| token.line)
        .parse_next(input)
}

/// Parse an actor reference: a bare name or a quoted name.
///
/// Bare names are trimmed; the late-start `*` prefix is left intact for
/// elaboration to resolve.
fn actor_ref<'src>(input: &mut Input<'src>) -> IResult<ActorRef> {
    any.verify_map(|token: &PositionedToken<'_>| match &token.token {
        Token::Actor(name) if !name.trim().is_empty() => {
            Some(ActorRef::new(name.trim(), token.span))
        }
        Token::QuotedActor(name) => Some(ActorRef::new(name.clone(), token.span)),
        _ => None,
    })
    .context(Context::Label("actor name"))
    .parse_next(input)
}

/// Parse the `: message` tail of a statement.
fn message_text<'src>(input: &mut Input<'src>) -> IResult<String> {
    any.verify_map(|token: &PositionedToken<'_>| match &token.token {
        Token::Message(text) => Some(text.clone()),
        _ => None,
    })
    .context(Context::Label("`:` followed by a message"))
    .parse_next(input)
}

/// Parse an execution level modifier: `+` or `-`.
fn level_change<'src>(input: &mut Input<'src>) -> IResult<LevelChange> {
    any.verify_map(|token: &PositionedToken<'_>| match token.token {
        Token::Plus => Some(LevelChange::Increase),
        Token::Dash => Some(LevelChange::Decrease),
        _ => None,
    })
    .parse_next(input)
}

/// Parse an arrow between two actors.
///
/// The pieces, left to right: an optional `+` (opens on the source), an
/// optional left head (`<` or `<<`), the line body (`-` solid, `--` dotted),
/// an optional `+`/`-` (source side), an optional right head (`>` or `>>`),
/// and an optional trailing `+`/`-`.
///
/// A trailing `+` opens an execution on the destination; a trailing `-`
/// closes one on the source, matching the usual "activate on receive,
/// deactivate on reply" convention. A left head is only valid together
/// with a right head. With no head at all the destination head defaults
/// to a filled arrow.
fn arrow_spec<'src>(input: &mut Input<'src>) -> IResult<ArrowSpec> {
    // A leading `-` cannot occur: the lexer folds it into the line body.
    let leading = opt(
        any.verify(|token: &PositionedToken<'_>| matches!(token.token, Token::Plus))
            .value(LevelChange::Increase),
    )
    .parse_next(input)?;

    let left_head = opt(any.verify_map(
        |token: &PositionedToken<'_>| match token.token {
            Token::LeftArrow => Some(ArrowHead::Filled),
            Token::LeftOpenArrow => Some(ArrowHead::Open),
            _ => None,
        },
    ))
    .parse_next(input)?;

    let line_style = any
        .verify_map(|token: &PositionedToken<'_>| match token.token {
            Token::Dash => Some(LineStyle::Solid),
            Token::DoubleDash => Some(LineStyle::Dotted),
            _ => None,
        })
        .context(Context::Label("signal line (`-` or `--`)"))
        .parse_next(input)?;

    let pre_head = opt(level_change).parse_next(input)?;

    let head = opt(any.verify_map(
        |token: &PositionedToken<'_>| match token.token {
            Token::Arrow => Some(ArrowHead::Filled),
            Token::OpenArrow => Some(ArrowHead::Open),
            _ => None,
        },
    ))
    .parse_next(input)?;

    if left_head.is_some() && head.is_none() {
        return Err(cut_error_with_label(
            input,
            "right arrow head after a left arrow head",
        ));
    }

    let trailing = if head.is_some() {
        opt(level_change).parse_next(input)?
    } else {
        None
    };

    let mut source_change = leading.or(pre_head);
    let mut dest_change = None;
    match trailing {
        Some(LevelChange::Increase) => dest_change = Some(LevelChange::Increase),
        Some(LevelChange::Decrease) => {
            if source_change.is_none() {
                source_change = Some(LevelChange::Decrease);
            } else {
                dest_change = Some(LevelChange::Decrease);
            }
        }
        None => {}
    }

    Ok(ArrowSpec {
        left_head,
        line_style,
        source_change,
        head: head.unwrap_or(ArrowHead::Filled),
        dest_change,
    })
}

/// Parse `participant NAME` or `participant NAME as ALIAS`.
///
/// A bare body is lexed as a single name token, so the ` as ALIAS` split
/// happens on the raw text. A quoted display name is followed by an
/// explicit `as` keyword instead.
fn participant_statement<'src>(input: &mut Input<'src>) -> IResult<Statement> {
    let line = current_line.parse_next(input)?;

    any.verify(|token: &PositionedToken<'_>| matches!(token.token, Token::Participant))
        .parse_next(input)?;

    cut_err(input, |input| {
        ws0.parse_next(input)?;

        let (name, alias, span) = alt((
            // `participant "Display Name" as alias`
            |input: &mut Input<'src>| {
                let (display, span) = any
                    .verify_map(|token: &PositionedToken<'_>| match &token.token {
                        Token::QuotedActor(name) => Some((name.clone(), token.span)),
                        _ => None,
                    })
                    .parse_next(input)?;

                let alias = opt(|input: &mut Input<'src>| {
                    ws0.parse_next(input)?;
                    any.verify(|token: &PositionedToken<'_>| matches!(token.token, Token::As))
                        .parse_next(input)?;
                    ws0.parse_next(input)?;
                    actor_ref.parse_next(input)
                })
                .parse_next(input)?;

                let alias = alias.map(|a| a.name).unwrap_or_else(|| display.clone());
                Ok((display, alias, span))
            },
            // `participant Name` / `participant Long Name as alias`
            |input: &mut Input<'src>| {
                let raw = any
                    .verify_map(|token: &PositionedToken<'_>| match &token.token {
                        Token::Actor(name) if !name.trim().is_empty() => {
                            Some((*name, token.span))
                        }
                        _ => None,
                    })
                    .parse_next(input)?;
                let (name, alias) = split_name_alias(raw.0);
                Ok((name, alias, raw.1))
            },
        ))
        .context(Context::Label("participant name"))
        .parse_next(input)?;

        end_of_line.parse_next(input)?;

        Ok(Statement::Participant {
            alias,
            name,
            span,
            line,
        })
    })
}

/// Parse `title: MESSAGE`.
fn title_statement<'src>(input: &mut Input<'src>) -> IResult<Statement> {
    let line = current_line.parse_next(input)?;

    any.verify(|token: &PositionedToken<'_>| matches!(token.token, Token::Title))
        .parse_next(input)?;

    cut_err(input, |input| {
        ws0.parse_next(input)?;
        let message = message_text.parse_next(input)?;
        end_of_line.parse_next(input)?;
        Ok(Statement::Title { message, line })
    })
}

/// Parse `destroy ACTOR`.
fn destroy_statement<'src>(input: &mut Input<'src>) -> IResult<Statement> {
    let line = current_line.parse_next(input)?;

    any.verify(|token: &PositionedToken<'_>| matches!(token.token, Token::Destroy))
        .parse_next(input)?;

    cut_err(input, |input| {
        ws0.parse_next(input)?;
        let actor = actor_ref.parse_next(input)?;
        end_of_line.parse_next(input)?;
        Ok(Statement::Destroy { actor, line })
    })
}

/// Parse `note left of|right of|over ACTOR(, ACTOR): MESSAGE`.
fn note_statement<'src>(input: &mut Input<'src>) -> IResult<Statement> {
    let line = current_line.parse_next(input)?;

    any.verify(|token: &PositionedToken<'_>| matches!(token.token, Token::Note))
        .parse_next(input)?;

    cut_err(input, |input| {
        ws0.parse_next(input)?;

        let placement = any
            .verify_map(|token: &PositionedToken<'_>| match token.token {
                Token::LeftOf => Some(NotePlacement::LeftOf),
                Token::RightOf => Some(NotePlacement::RightOf),
                Token::Over => Some(NotePlacement::Over),
                _ => None,
            })
            .context(Context::Label("`left of`, `right of`, or `over`"))
            .parse_next(input)?;

        ws0.parse_next(input)?;
        let actor = actor_ref.parse_next(input)?;

        // Only `over` notes may span two actors
        let second_actor = if placement == NotePlacement::Over {
            opt(|input: &mut Input<'src>| {
                ws0.parse_next(input)?;
                any.verify(|token: &PositionedToken<'_>| matches!(token.token, Token::Comma))
                    .parse_next(input)?;
                ws0.parse_next(input)?;
                actor_ref.parse_next(input)
            })
            .parse_next(input)?
        } else {
            None
        };

        ws0.parse_next(input)?;
        let message = message_text.parse_next(input)?;
        end_of_line.parse_next(input)?;

        Ok(Statement::Note {
            placement,
            actor,
            second_actor,
            message,
            line,
        })
    })
}

/// Parse `ACTOR arrow ACTOR: MESSAGE`.
fn signal_statement<'src>(input: &mut Input<'src>) -> IResult<Statement> {
    let line = current_line.parse_next(input)?;

    let source = actor_ref.parse_next(input)?;
    ws0.parse_next(input)?;
    let arrow = arrow_spec.parse_next(input)?;

    // Once we have an arrow this can only be a signal
    cut_err(input, |input| {
        ws0.parse_next(input)?;
        let destination = actor_ref.parse_next(input)?;
        ws0.parse_next(input)?;
        let message = message_text.parse_next(input)?;
        end_of_line.parse_next(input)?;

        Ok(Statement::Signal {
            source,
            arrow,
            destination,
            message,
            line,
        })
    })
}

/// Parse a single statement
fn statement<'src>(input: &mut Input<'src>) -> IResult<Statement> {
    alt((
        participant_statement,
        title_statement,
        destroy_statement,
        note_statement,
        signal_statement,
    ))
    .context(Context::Label("statement"))
    .parse_next(input)
}

/// Parse the whole document: statements separated by blank lines and comments
fn document<'src>(input: &mut Input<'src>) -> IResult<Vec<Statement>> {
    let statements = repeat(0.., |input: &mut Input<'src>| {
        blanks0.parse_next(input)?;
        statement.parse_next(input)
    })
    .parse_next(input)?;

    blanks0.parse_next(input)?;
    eof.void().parse_next(input)?;

    Ok(statements)
}

fn convert_error(
    error: ErrMode<ContextError<Context>>,
    tokens: &[PositionedToken],
    current_remaining: usize,
) -> Diagnostic {
    // Extract start offset from error context if available
    let start_remaining = match &error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e.context().find_map(|ctx| match ctx {
            Context::StartOffset(n) => Some(*n),
            _ => None,
        }),
        _ => None,
    };

    // Calculate offsets from remaining token counts
    let end_offset = tokens.len() - current_remaining;
    let start_offset = start_remaining.map(|r| tokens.len() - r).unwrap_or(0);

    // 1-based line of the offending token (last token's line at EOF)
    let line = tokens
        .get(end_offset)
        .or_else(|| tokens.last())
        .map(|t| t.line)
        .unwrap_or(1);

    match error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => {
            // Extract context information for better error messages
            let contexts: Vec<String> = e
                .context()
                .filter_map(|ctx| match ctx {
                    Context::Label(label) => Some(format!("expected {label}")),
                    _ => None,
                })
                .collect();

            let expected = if contexts.is_empty() {
                "unexpected token or end of input".to_string()
            } else {
                contexts.join(", ")
            };

            let found = tokens
                .get(end_offset)
                .map(|t| format!("`{t}`"))
                .unwrap_or_else(|| "end of input".to_string());

            // Calculate error span from token positions
            let error_span = if tokens.is_empty() {
                Span::default()
            } else {
                let examine_range = if start_offset < end_offset {
                    // Parser consumed tokens - examine that range
                    start_offset..end_offset
                } else if end_offset < tokens.len() {
                    // At specific token - examine just that token
                    end_offset..end_offset + 1
                } else {
                    // EOF - examine all tokens
                    0..tokens.len()
                };

                // Extract meaningful spans from the range and union them
                let slice = &tokens[examine_range];
                let first = slice
                    .iter()
                    .find(|t| !matches!(t.token, Token::Whitespace | Token::Newline))
                    .map(|t| t.span)
                    .unwrap_or(slice[0].span);
                let last = slice
                    .iter()
                    .rev()
                    .find(|t| !matches!(t.token, Token::Whitespace | Token::Newline))
                    .map(|t| t.span)
                    .unwrap_or(slice[slice.len() - 1].span);
                first.union(last)
            };

            Diagnostic::error(format!("unexpected token {found}: {expected}"))
                .with_code(ErrorCode::E100)
                .with_label(error_span, "unexpected token")
                .with_line(line)
                .with_help("statements are one per line: participant, title, destroy, note, or a signal")
        }
        ErrMode::Incomplete(_) => {
            // This should not happen as we are not supporting streaming input.
            let error_span = if end_offset < tokens.len() {
                tokens[end_offset].span
            } else {
                tokens
                    .iter()
                    .rev()
                    .find(|t| !matches!(t.token, Token::Whitespace | Token::Newline))
                    .map(|t| t.span)
                    .unwrap_or_default()
            };

            Diagnostic::error("incomplete input, more tokens expected")
                .with_code(ErrorCode::E101)
                .with_label(error_span, "incomplete")
                .with_line(line)
                .with_help("ensure input is complete")
        }
    }
}

/// Build a statement list from tokens
pub fn build_statements<'src>(
    tokens: &'src [PositionedToken<'src>],
) -> Result<Vec<Statement>, Diagnostic> {
    let mut token_slice = TokenSlice::new(tokens);

    match document.parse_next(&mut token_slice) {
        Ok(statements) => Ok(statements),
        Err(e) => {
            let current_remaining = token_slice.eof_offset();
            Err(convert_error(e, tokens, current_remaining))
        }
    }
}
