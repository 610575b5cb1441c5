//! Cyclic turn order with a stable cursor.

use crate::error::TurnOrderError;

/// A cyclic sequence of actors plus a cursor pointing at whoever moved last.
///
/// Insertions and ejections adjust the cursor so that the entry it points to
/// keeps its identity, and ejecting the current entry hands the next turn to
/// the entry that followed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOrder<T> {
    entries: Vec<T>,
    /// Index of the entry returned by the last `next()`. `None` before the
    /// first turn.
    current: Option<usize>,
}

impl<T> Default for TurnOrder<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            current: None,
        }
    }
}

impl<T: PartialEq> TurnOrder<T> {
    /// Create an empty turn order.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the order empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry returned by the last `next()`, if it is still present.
    #[must_use]
    pub fn current(&self) -> Option<&T> {
        self.current.and_then(|idx| self.entries.get(idx))
    }

    /// Entries in turn order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    /// Does the order hold this entry?
    #[must_use]
    pub fn contains(&self, entity: &T) -> bool {
        self.entries.contains(entity)
    }

    /// Advance the cursor and return the entry whose turn it is.
    ///
    /// # Errors
    ///
    /// Returns [`TurnOrderError::Empty`] if there are no entries.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<&T, TurnOrderError> {
        if self.entries.is_empty() {
            return Err(TurnOrderError::Empty);
        }
        let idx = self
            .current
            .map_or(0, |current| (current + 1) % self.entries.len());
        self.current = Some(idx);
        Ok(&self.entries[idx])
    }

    /// Insert an entry at `position`, or append it when `position` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`TurnOrderError::PositionOutOfRange`] if `position` is past
    /// the end.
    pub fn add(&mut self, entity: T, position: Option<usize>) -> Result<(), TurnOrderError> {
        let Some(position) = position else {
            self.entries.push(entity);
            return Ok(());
        };
        if position > self.entries.len() {
            return Err(TurnOrderError::PositionOutOfRange {
                position,
                len: self.entries.len(),
            });
        }

        self.entries.insert(position, entity);
        if let Some(current) = self.current
            && position <= current
        {
            self.current = Some(current + 1);
        }
        Ok(())
    }

    /// Remove an entry, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`TurnOrderError::NotFound`] if the entry is absent.
    pub fn eject(&mut self, entity: &T) -> Result<T, TurnOrderError> {
        let idx = self
            .entries
            .iter()
            .position(|entry| entry == entity)
            .ok_or(TurnOrderError::NotFound)?;
        let removed = self.entries.remove(idx);

        if let Some(current) = self.current
            && idx <= current
        {
            self.current = match current.checked_sub(1) {
                Some(previous) => Some(previous),
                None => self.entries.len().checked_sub(1),
            };
        }
        if self.entries.is_empty() {
            self.current = None;
        }
        Ok(removed)
    }
}

impl<T: PartialEq> FromIterator<T> for TurnOrder<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
            current: None,
        }
    }
}
