//! Semantic model for sequence diagrams.
//!
//! A [`Diagram`] owns its actors and its ordered entry sequence. Signals and
//! notes reference actors through [`ActorIndex`] handles rather than shared
//! references, so the model stays plain data: built once during elaboration,
//! read-only afterwards. The layout stage never mutates it.

use thiserror::Error;

/// Handle to an actor stored in a [`Diagram`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorIndex(usize);

impl ActorIndex {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the position of the actor in declaration order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Line body of a signal arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dotted,
}

/// Arrowhead shape at a signal endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowHead {
    Filled,
    Open,
}

/// A requested change to an actor's execution nesting level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelChange {
    Increase,
    Decrease,
}

/// Errors raised by execution-stack bookkeeping on an actor.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExecutionError {
    /// A decrease was requested while no execution was open.
    #[error("the execution level for actor `{actor}` was dropped below 0")]
    BelowZero { actor: String },
}

/// One open or closed activation-bar interval on an actor's lifeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    level: usize,
    opened_by: usize,
    closed_by: Option<usize>,
}

impl Execution {
    /// Nesting depth; 0 still touches the lifeline, higher levels fan outward.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Sequence index of the entry that opened this execution.
    pub fn opened_by(&self) -> usize {
        self.opened_by
    }

    /// Sequence index of the entry that closed this execution, if closed.
    pub fn closed_by(&self) -> Option<usize> {
        self.closed_by
    }
}

/// A participant in the diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    alias: String,
    display_name: String,
    declaration_index: usize,
    start_entry: usize,
    end_entry: Option<usize>,
    executions: Vec<Execution>,
    open: Vec<usize>,
    max_level: i32,
}

impl Actor {
    fn new(alias: String, display_name: String, declaration_index: usize) -> Self {
        Self {
            alias,
            display_name,
            declaration_index,
            start_entry: 0,
            end_entry: None,
            executions: Vec::new(),
            open: Vec::new(),
            max_level: -1,
        }
    }

    /// Unique lookup key for this actor.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Text drawn in the actor's boxes.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Order of first appearance; stable for the lifetime of the diagram.
    pub fn declaration_index(&self) -> usize {
        self.declaration_index
    }

    /// Sequence index at which the lifeline begins; 0 means from the top.
    pub fn start_entry(&self) -> usize {
        self.start_entry
    }

    /// Sequence index at which the lifeline ends, if the actor was destroyed.
    pub fn end_entry(&self) -> Option<usize> {
        self.end_entry
    }

    /// All executions ever opened on this actor, in open order.
    pub fn executions(&self) -> &[Execution] {
        &self.executions
    }

    /// Current nesting level: -1 when no execution is open.
    pub fn level(&self) -> i32 {
        self.open.len() as i32 - 1
    }

    /// High-water mark of the nesting level; -1 if never activated.
    pub fn max_level(&self) -> i32 {
        self.max_level
    }

    /// True if any execution is still open.
    pub fn has_open_executions(&self) -> bool {
        !self.open.is_empty()
    }

    /// Marks the lifeline as starting at the given sequence index.
    pub fn set_start_entry(&mut self, entry: usize) {
        self.start_entry = entry;
    }

    /// Marks the lifeline as ending at the given sequence index.
    pub fn set_end_entry(&mut self, entry: usize) {
        self.end_entry = Some(entry);
    }

    /// Apply an execution-level change triggered by the entry at `entry`.
    ///
    /// An increase pushes a new [`Execution`] at depth equal to the current
    /// stack size. A decrease pops the innermost open execution and stamps
    /// it with the closing entry; decreasing with an empty stack is an
    /// error attributed to the triggering entry's source line by the caller.
    pub fn change_level(&mut self, change: LevelChange, entry: usize) -> Result<(), ExecutionError> {
        match change {
            LevelChange::Increase => {
                let level = self.open.len();
                self.max_level = self.max_level.max(level as i32);
                self.executions.push(Execution {
                    level,
                    opened_by: entry,
                    closed_by: None,
                });
                self.open.push(self.executions.len() - 1);
                Ok(())
            }
            LevelChange::Decrease => {
                let index = self.open.pop().ok_or_else(|| ExecutionError::BelowZero {
                    actor: self.display_name.clone(),
                })?;
                self.executions[index].closed_by = Some(entry);
                Ok(())
            }
        }
    }
}

/// One interaction event between two actors.
///
/// `start_level` and `end_level` record the nesting depth at the source and
/// destination actors immediately after the signal was processed; -1 means
/// no execution was open on that side.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    source: ActorIndex,
    destination: ActorIndex,
    line_style: LineStyle,
    head: ArrowHead,
    left_head: Option<ArrowHead>,
    message: String,
    line: usize,
    start_level: i32,
    end_level: i32,
}

impl Signal {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source: ActorIndex,
        destination: ActorIndex,
        line_style: LineStyle,
        head: ArrowHead,
        left_head: Option<ArrowHead>,
        message: String,
        line: usize,
        start_level: i32,
        end_level: i32,
    ) -> Self {
        Self {
            source,
            destination,
            line_style,
            head,
            left_head,
            message,
            line,
            start_level,
            end_level,
        }
    }

    pub fn source(&self) -> ActorIndex {
        self.source
    }

    pub fn destination(&self) -> ActorIndex {
        self.destination
    }

    pub fn line_style(&self) -> LineStyle {
        self.line_style
    }

    /// Arrowhead at the destination end.
    pub fn head(&self) -> ArrowHead {
        self.head
    }

    /// Arrowhead at the source end, for double-headed arrows.
    pub fn left_head(&self) -> Option<ArrowHead> {
        self.left_head
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// 1-based source line this signal was declared on.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn start_level(&self) -> i32 {
        self.start_level
    }

    pub fn end_level(&self) -> i32 {
        self.end_level
    }

    /// True when source and destination are the same actor.
    pub fn is_self(&self) -> bool {
        self.source == self.destination
    }

    /// The deeper of the two nesting levels this signal touches.
    pub fn max_level(&self) -> i32 {
        self.start_level.max(self.end_level)
    }
}

/// Where a note is anchored relative to its actor(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotePlacement {
    LeftOf,
    RightOf,
    Over,
}

/// A free-text annotation attached to one or two actors.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    placement: NotePlacement,
    actor: ActorIndex,
    second_actor: Option<ActorIndex>,
    message: String,
    line: usize,
}

impl Note {
    pub fn new(
        placement: NotePlacement,
        actor: ActorIndex,
        second_actor: Option<ActorIndex>,
        message: String,
        line: usize,
    ) -> Self {
        Self {
            placement,
            actor,
            second_actor,
            message,
            line,
        }
    }

    pub fn placement(&self) -> NotePlacement {
        self.placement
    }

    pub fn actor(&self) -> ActorIndex {
        self.actor
    }

    /// Second anchor for a two-actor `over` note.
    pub fn second_actor(&self) -> Option<ActorIndex> {
        self.second_actor
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn line(&self) -> usize {
        self.line
    }
}

/// The diagram title block.
#[derive(Debug, Clone, PartialEq)]
pub struct Title {
    message: String,
    line: usize,
}

impl Title {
    pub fn new(message: String, line: usize) -> Self {
        Self { message, line }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn line(&self) -> usize {
        self.line
    }
}

/// One element of the ordered diagram sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Signal(Signal),
    Note(Note),
    /// Synthetic lifecycle marker inserted where a late-start actor first
    /// appears; it occupies vertical space the size of the actor's box.
    Appearance(ActorIndex),
}

/// A fully built sequence diagram.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagram {
    title: Option<Title>,
    actors: Vec<Actor>,
    sequence: Vec<Entry>,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> Option<&Title> {
        self.title.as_ref()
    }

    /// Sets or overwrites the diagram title.
    pub fn set_title(&mut self, title: Title) {
        self.title = Some(title);
    }

    /// All actors in declaration order.
    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn actor(&self, index: ActorIndex) -> &Actor {
        &self.actors[index.index()]
    }

    pub fn actor_mut(&mut self, index: ActorIndex) -> &mut Actor {
        &mut self.actors[index.index()]
    }

    /// The ordered entry sequence, including synthetic lifecycle markers.
    pub fn sequence(&self) -> &[Entry] {
        &self.sequence
    }

    /// Registers a new actor at the end of the actor list.
    pub fn add_actor(
        &mut self,
        alias: impl Into<String>,
        display_name: impl Into<String>,
    ) -> ActorIndex {
        let index = ActorIndex::new(self.actors.len());
        self.actors
            .push(Actor::new(alias.into(), display_name.into(), index.index()));
        index
    }

    /// Appends an entry and returns its sequence index.
    pub fn push_entry(&mut self, entry: Entry) -> usize {
        self.sequence.push(entry);
        self.sequence.len() - 1
    }

    /// Number of entries in the sequence so far.
    pub fn sequence_len(&self) -> usize {
        self.sequence.len()
    }
}
