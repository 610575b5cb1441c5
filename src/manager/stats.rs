//! Per-character statistics across a whole run.

use crate::protocol::Score;

/// Running totals for every registered character, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scoreboard {
    scores: Vec<Score>,
}

impl Scoreboard {
    /// Start tracking a character. Registering a name twice is a no-op.
    pub fn register(&mut self, name: &str) {
        if self.get(name).is_none() {
            self.scores.push(Score {
                name: name.to_owned(),
                ..Score::default()
            });
        }
    }

    /// Totals for one character.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Score> {
        self.scores.iter().find(|score| score.name == name)
    }

    fn entry(&mut self, name: &str) -> &mut Score {
        self.register(name);
        let idx = self
            .scores
            .iter()
            .position(|score| score.name == name)
            .unwrap_or(self.scores.len() - 1);
        &mut self.scores[idx]
    }

    /// The character left through the exit.
    pub fn record_exit(&mut self, name: &str) {
        self.entry(name).exits += 1;
    }

    /// The character unlocked the exit.
    pub fn record_key(&mut self, name: &str) {
        self.entry(name).keys += 1;
    }

    /// The character was caught.
    pub fn record_eject(&mut self, name: &str) {
        self.entry(name).ejects += 1;
    }

    /// All totals, in registration order.
    #[must_use]
    pub fn scores(&self) -> &[Score] {
        &self.scores
    }
}
