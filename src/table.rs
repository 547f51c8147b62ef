//! The transition table: an immutable-after-construction map from `(state, read symbol)` to
//! the [`Action`] the machine takes.

use crate::types::{Action, ReadSymbol, State, Transition};
use std::collections::BTreeMap;
use tracing::debug;

/// Maps each state to its per-symbol actions.
///
/// Each state holds at most one entry per exact symbol and at most one wildcard entry.
/// Registering an existing key replaces the previous action. Entries are kept in ordered
/// maps so that iteration is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionTable {
    states: BTreeMap<State, BTreeMap<ReadSymbol, Action>>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table by registering every transition in order, so later entries for the
    /// same key win.
    pub fn from_transitions(transitions: impl IntoIterator<Item = Transition>) -> Self {
        let mut table = Self::new();
        for transition in transitions {
            table.register(transition.state, transition.read, transition.action);
        }
        table
    }

    /// Inserts the entry for `(state, read)`, returning the action it replaced, if any.
    pub fn register(&mut self, state: State, read: ReadSymbol, action: Action) -> Option<Action> {
        let replaced = self.states.entry(state).or_default().insert(read, action);
        if let Some(previous) = &replaced {
            debug!(state, read = %read.as_char(), ?previous, ?action, "overwriting transition");
        }
        replaced
    }

    /// Finds the action for `state` reading `symbol`.
    ///
    /// An exact entry always takes precedence over the state's wildcard entry. Returns `None`
    /// when neither exists, including when `state` has no entries at all.
    pub fn lookup(&self, state: State, symbol: char) -> Option<&Action> {
        let entries = self.states.get(&state)?;
        entries
            .get(&ReadSymbol::Exact(symbol))
            .or_else(|| entries.get(&ReadSymbol::Wildcard))
    }

    /// Returns `true` if at least one entry is registered for `state`.
    pub fn contains_state(&self, state: State) -> bool {
        self.states.contains_key(&state)
    }

    /// Iterates over the states with registered entries, in ascending order.
    pub fn states(&self) -> impl Iterator<Item = State> + '_ {
        self.states.keys().copied()
    }

    /// Iterates over the entries of `state`, exact symbols first (in symbol order), then the
    /// wildcard entry.
    pub fn entries(&self, state: State) -> impl Iterator<Item = (ReadSymbol, &Action)> + '_ {
        self.states
            .get(&state)
            .into_iter()
            .flat_map(|entries| entries.iter().map(|(read, action)| (*read, action)))
    }

    /// Iterates over every registered entry as a [`Transition`].
    pub fn transitions(&self) -> impl Iterator<Item = Transition> + '_ {
        self.states.iter().flat_map(|(&state, entries)| {
            entries.iter().map(move |(&read, &action)| Transition {
                state,
                read,
                action,
            })
        })
    }

    /// Returns the total number of entries across all states.
    pub fn len(&self) -> usize {
        self.states.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl FromIterator<Transition> for TransitionTable {
    fn from_iter<I: IntoIterator<Item = Transition>>(iter: I) -> Self {
        Self::from_transitions(iter)
    }
}
