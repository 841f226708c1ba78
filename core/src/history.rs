pub const MAX_HISTORY_SIZE: usize = 100;

/// Linear undo history over whole states.
///
/// The entry at the current index is the present state; undo steps back,
/// redo steps forward, and recording a new state drops everything ahead.
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: Vec<T>,
    current_index: Option<usize>,
}

impl<T: Clone> History<T> {
    pub fn new() -> Self {
        History {
            entries: Vec::new(),
            current_index: None,
        }
    }

    /// Start a history whose baseline is `initial`
    pub fn with_initial(initial: T) -> Self {
        let mut history = Self::new();
        history.record(initial);
        history
    }

    /// Record a new present state.
    /// This clears any redo entries and adds the new entry
    pub fn record(&mut self, state: T) {
        if let Some(idx) = self.current_index {
            self.entries.truncate(idx + 1);
        }

        self.entries.push(state);

        if self.entries.len() > MAX_HISTORY_SIZE {
            self.entries.remove(0);
        }

        self.current_index = Some(self.entries.len() - 1);
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.current_index, Some(idx) if idx > 0)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.current_index, Some(idx) if idx + 1 < self.entries.len())
    }

    /// Step back one state.
    /// Returns the state to restore, or None if there is nothing to undo
    pub fn undo(&mut self) -> Option<&T> {
        if let Some(idx) = self.current_index
            && idx > 0
        {
            self.current_index = Some(idx - 1);
            return self.entries.get(idx - 1);
        }
        None
    }

    /// Step forward one state.
    /// Returns the state to restore, or None if there is nothing to redo
    pub fn redo(&mut self) -> Option<&T> {
        if let Some(idx) = self.current_index
            && idx + 1 < self.entries.len()
        {
            self.current_index = Some(idx + 1);
            return self.entries.get(idx + 1);
        }
        None
    }

    pub fn current(&self) -> Option<&T> {
        self.current_index.and_then(|idx| self.entries.get(idx))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget everything, keeping `state` as the new baseline
    pub fn reset(&mut self, state: T) {
        self.entries.clear();
        self.current_index = None;
        self.record(state);
    }
}

impl<T: Clone> Default for History<T> {
    fn default() -> Self {
        Self::new()
    }
}
