//! Observers see the full game state after every turn.

use std::io::Write;

use crate::game::GameState;

/// Something watching the whole game.
pub trait Observer {
    /// Called after every turn and every level change.
    fn observe(&mut self, state: &GameState, turn: u64);
}

/// Renders the level as ASCII to a writer.
#[derive(Debug)]
pub struct TextObserver<W> {
    out: W,
}

impl<W: Write> TextObserver<W> {
    /// Create an observer writing to `out`.
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the observer, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Observer for TextObserver<W> {
    fn observe(&mut self, state: &GameState, turn: u64) {
        let result = writeln!(
            self.out,
            "level {} turn {turn}\n{}\n",
            state.level_number(),
            state.render()
        );
        if let Err(e) = result {
            log::warn!("observer output failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Actor;
    use crate::game::level::tests::two_room_level;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_text_observer_renders_level() {
        let state = GameState::new(
            two_room_level(),
            [],
            vec![Actor::character("ann")],
            ChaCha8Rng::seed_from_u64(0),
        )
        .unwrap();
        let mut observer = TextObserver::new(Vec::new());
        observer.observe(&state, 3);

        let text = String::from_utf8(observer.into_inner()).unwrap();
        assert!(text.starts_with("level 1 turn 3\n-----XXXXX-----\n"));
        assert_eq!(text.matches('P').count(), 1);
    }
}
