//! Parsed statement types produced by the [`parser`](super::parser).
//!
//! These are a thin syntactic layer: actor references are still names,
//! not resolved indices, and execution bookkeeping has not happened yet.
//! The [`elaborate`](super::elaborate) phase turns a statement list into a
//! [`lifeline_core::semantic::Diagram`].

use lifeline_core::semantic::{ArrowHead, LevelChange, LineStyle, NotePlacement};

use crate::span::Span;

/// A reference to an actor by name, as written in the source.
///
/// The name is trimmed but otherwise untouched: a leading `*` (the
/// late-start marker) is still present and is resolved during elaboration.
#[derive(Debug, Clone, PartialEq)]
pub struct ActorRef {
    pub name: String,
    pub span: Span,
}

impl ActorRef {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// A parsed arrow between two actors: line style, heads, and the
/// optional `+`/`-` execution modifiers on either side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowSpec {
    pub left_head: Option<ArrowHead>,
    pub line_style: LineStyle,
    pub source_change: Option<LevelChange>,
    pub head: ArrowHead,
    pub dest_change: Option<LevelChange>,
}

/// A single parsed statement.
///
/// Each statement corresponds to one non-blank source line and carries
/// its 1-based line number for error reporting and signal ordering.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `participant NAME` or `participant NAME as ALIAS`
    Participant {
        alias: String,
        name: String,
        span: Span,
        line: usize,
    },
    /// `title: MESSAGE`
    Title { message: String, line: usize },
    /// `destroy ACTOR`
    Destroy { actor: ActorRef, line: usize },
    /// `note left of|right of|over ACTOR(, ACTOR): MESSAGE`
    Note {
        placement: NotePlacement,
        actor: ActorRef,
        second_actor: Option<ActorRef>,
        message: String,
        line: usize,
    },
    /// `ACTOR arrow ACTOR: MESSAGE`
    Signal {
        source: ActorRef,
        arrow: ArrowSpec,
        destination: ActorRef,
        message: String,
        line: usize,
    },
}

/// Split a raw participant body into `(name, alias)`.
///
/// The body is either a plain name, or `NAME as ALIAS` where the alias is
/// the final whitespace-free word. The `as` is matched case-insensitively
/// on the last occurrence, so names containing ` as ` still work when an
/// explicit alias follows.
pub fn split_name_alias(input: &str) -> (String, String) {
    let input = input.trim();
    let lower = input.to_ascii_lowercase();

    if let Some(pos) = lower.rfind(" as ") {
        let name = input[..pos].trim();
        let alias = input[pos + 4..].trim();
        if !name.is_empty() && !alias.is_empty() && !alias.contains(char::is_whitespace) {
            return (name.to_string(), alias.to_string());
        }
    }

    (input.to_string(), input.to_string())
}
