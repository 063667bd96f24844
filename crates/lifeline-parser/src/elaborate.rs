//! Elaboration from parsed statements to the semantic diagram model.
//!
//! This phase resolves actor names to arena indices, applies execution
//! level changes in statement order, and reports the semantic errors that
//! only become visible once names are resolved: closing an execution that
//! was never opened, conflicting level changes on a self-signal, and a
//! two-actor note naming the same actor twice.

use indexmap::IndexMap;
use log::debug;

use lifeline_core::semantic::{
    ActorIndex, Diagram, Entry, LevelChange, Note, Signal, Title,
};

use crate::{
    error::{Diagnostic, ErrorCode},
    parser_types::{ActorRef, ArrowSpec, Statement},
};

/// Builds a [`Diagram`] from a statement list.
pub(crate) struct Builder {
    diagram: Diagram,
    /// Alias to arena index, in declaration order.
    actors: IndexMap<String, ActorIndex>,
}

impl Builder {
    pub(crate) fn new() -> Self {
        Self {
            diagram: Diagram::new(),
            actors: IndexMap::new(),
        }
    }

    /// Consume the statement list and produce the finished diagram.
    pub(crate) fn build(mut self, statements: Vec<Statement>) -> Result<Diagram, Diagnostic> {
        for statement in statements {
            match statement {
                Statement::Participant {
                    alias, name, line, ..
                } => {
                    debug!(alias = alias.as_str(), line; "declaring participant");
                    self.get_actor_named(&alias, Some(&name));
                }
                Statement::Title { message, line } => {
                    self.diagram.set_title(Title::new(message, line));
                }
                Statement::Destroy { actor, line: _ } => {
                    let index = self.get_actor(&actor);
                    let end = self.diagram.sequence_len();
                    self.diagram.actor_mut(index).set_end_entry(end);
                }
                Statement::Note {
                    placement,
                    actor,
                    second_actor,
                    message,
                    line,
                } => {
                    let index = self.get_actor(&actor);
                    let second = second_actor.as_ref().map(|a| self.get_actor(a));

                    if second == Some(index) {
                        return Err(Diagnostic::error(
                            "a note over two actors requires two different actors",
                        )
                        .with_code(ErrorCode::E202)
                        .with_label(actor.span, "same actor on both sides")
                        .with_line(line));
                    }

                    self.diagram
                        .push_entry(Entry::Note(Note::new(placement, index, second, message, line)));
                }
                Statement::Signal {
                    source,
                    arrow,
                    destination,
                    message,
                    line,
                } => {
                    self.add_signal(&source, arrow, &destination, message, line)?;
                }
            }
        }
        Ok(self.diagram)
    }

    /// Resolve an actor reference, creating the actor on first sight.
    fn get_actor(&mut self, actor: &ActorRef) -> ActorIndex {
        self.get_actor_named(&actor.name, None)
    }

    /// Look up an actor by alias, or register a new one at the end of
    /// the actor list.
    ///
    /// A leading `*` marks a late start: the lifeline begins at the
    /// current entry count instead of at the top, and a lifecycle marker
    /// is appended to the sequence so layout can size the appearance.
    /// An actor previously seen without the marker is upgraded if its
    /// lifeline still starts at the top.
    fn get_actor_named(&mut self, alias: &str, name: Option<&str>) -> ActorIndex {
        let alias = alias.trim();

        let (alias, start) = match alias.strip_prefix('*') {
            Some(stripped) => (stripped.trim(), self.diagram.sequence_len()),
            None => (alias, 0),
        };

        if let Some(&index) = self.actors.get(alias) {
            if start > 0 && self.diagram.actor(index).start_entry() == 0 {
                self.diagram.actor_mut(index).set_start_entry(start);
                self.diagram.push_entry(Entry::Appearance(index));
            }
            return index;
        }

        let display = name.unwrap_or(alias).to_string();
        let index = self.diagram.add_actor(alias.to_string(), display);
        self.actors.insert(alias.to_string(), index);
        if start > 0 {
            self.diagram.actor_mut(index).set_start_entry(start);
            self.diagram.push_entry(Entry::Appearance(index));
        }
        index
    }

    /// Resolve both endpoints, apply execution level changes in source
    /// then destination order, and append the signal.
    fn add_signal(
        &mut self,
        source: &ActorRef,
        arrow: ArrowSpec,
        destination: &ActorRef,
        message: String,
        line: usize,
    ) -> Result<(), Diagnostic> {
        let source_index = self.get_actor(source);
        let dest_index = self.get_actor(destination);

        let mut source_change = arrow.source_change;
        let mut dest_change = arrow.dest_change;

        // On a self-signal a sole source-side change is drawn on the
        // right-hand side, so move it there.
        if source_index == dest_index && dest_change.is_none() {
            dest_change = source_change.take();
        }

        if source_index == dest_index
            && source_change.is_some()
            && source_change == dest_change
        {
            return Err(Diagnostic::error(
                "cannot move the execution nesting level in the same direction twice on a single self-signal",
            )
            .with_code(ErrorCode::E201)
            .with_label(source.span, "ambiguous nesting change")
            .with_line(line));
        }

        let entry_index = self.diagram.sequence_len();

        let start_level = self.change_level(source_index, source_change, entry_index, line)?;
        let end_level = self.change_level(dest_index, dest_change, entry_index, line)?;

        self.diagram.push_entry(Entry::Signal(Signal::new(
            source_index,
            dest_index,
            arrow.line_style,
            arrow.head,
            arrow.left_head,
            message,
            line,
            start_level,
            end_level,
        )));

        Ok(())
    }

    /// Apply an optional level change to one actor and return its
    /// nesting level afterwards.
    fn change_level(
        &mut self,
        index: ActorIndex,
        change: Option<LevelChange>,
        entry_index: usize,
        line: usize,
    ) -> Result<i32, Diagnostic> {
        if let Some(change) = change {
            self.diagram
                .actor_mut(index)
                .change_level(change, entry_index)
                .map_err(|err| {
                    Diagnostic::error(err.to_string())
                        .with_code(ErrorCode::E200)
                        .with_line(line)
                        .with_help("every `-` must match an earlier `+` on the same actor")
                })?;
        }
        Ok(self.diagram.actor(index).level())
    }
}
