use log::trace;
use rand::{rngs::StdRng, seq::SliceRandom, Rng};
use strum::VariantArray;

use crate::{
    env::{Environment, TurnOrder},
    error::{Error, Result},
};

#[derive(VariantArray, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Take {
    One,
    Two,
    Three,
}

impl Take {
    pub fn count(self) -> u32 {
        match self {
            Take::One => 1,
            Take::Two => 2,
            Take::Three => 3,
        }
    }
}

/// Single pile Nim against opponents that pick uniformly at random
///
/// The first seat belongs to the learning agent; every other seat is played by the
/// environment between the agent's turns. Players take one to three stones, and taking more
/// stones than remain empties the pile. The agent is paid `+1` if it takes the last stone and
/// `-1` if an opponent does, every other step pays nothing. The observation is the pile size
/// at the start of the agent's turn.
pub struct Nim<R = StdRng> {
    turns: TurnOrder<String>,
    start: u32,
    pile: u32,
    rng: R,
}

impl<R: Rng> Nim<R> {
    /// Seat `players` around a pile of `start` stones, with the agent as the first player
    ///
    /// ### Errors
    /// - [`Error::DuplicateAgent`] if a player appears twice
    /// - [`Error::Configuration`] if there are no players or no stones
    pub fn new(players: Vec<String>, start: u32, rng: R) -> Result<Self> {
        if start == 0 {
            return Err(Error::configuration("start", "the pile must hold a stone"));
        }
        Ok(Self {
            turns: TurnOrder::new(players)?,
            start,
            pile: start,
            rng,
        })
    }

    /// The fixed action set
    pub fn actions() -> Vec<Take> {
        Take::VARIANTS.to_vec()
    }

    /// The player whose turn it is, or who took the last stone once finished
    pub fn active_player(&self) -> &str {
        self.turns.active()
    }

    /// Remove stones for the active player
    ///
    /// **Returns** `true` if this emptied the pile
    fn take(&mut self, action: Take) -> bool {
        self.pile = self.pile.saturating_sub(action.count());
        trace!(
            "{} takes {}, {} left",
            self.turns.active(),
            action.count(),
            self.pile
        );
        if self.pile == 0 {
            return true;
        }
        self.turns.advance();
        false
    }
}

impl<R: Rng> Environment for Nim<R> {
    type State = u32;
    type Action = Take;

    fn reset(&mut self) {
        self.pile = self.start;
        self.turns.reset();
    }

    fn observe(&self) -> Self::State {
        self.pile
    }

    fn step(&mut self, action: Self::Action) -> f64 {
        if self.is_finished() {
            return 0.0;
        }

        if self.take(action) {
            return 1.0;
        }

        while self.turns.active_seat() != 0 {
            let &reply = Take::VARIANTS
                .choose(&mut self.rng)
                .expect("There is always at least one action available");
            if self.take(reply) {
                return -1.0;
            }
        }
        0.0
    }

    fn is_finished(&self) -> bool {
        self.pile == 0
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use crate::algo::{QAgent, QAgentConfig};

    use super::*;

    fn players() -> Vec<String> {
        vec!["ada".to_string(), "bo".to_string()]
    }

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn nim_agent_wins_by_emptying_pile() {
        let mut env = Nim::new(players(), 3, rng(0)).unwrap();
        env.reset();
        assert_eq!(env.observe(), 3);
        assert_eq!(env.step(Take::Three), 1.0);
        assert!(env.is_finished());
        assert_eq!(env.active_player(), "ada");
        assert_eq!(env.step(Take::One), 0.0, "finished episode is a no-op");

        env.reset();
        assert_eq!(env.observe(), 3);
        assert_eq!(env.active_player(), "ada");
    }

    #[test]
    fn nim_agent_loses_when_opponent_empties_pile() {
        for seed in 0..20 {
            let mut env = Nim::new(players(), 4, rng(seed)).unwrap();
            env.reset();
            assert_eq!(env.step(Take::One), -1.0, "any reply to 3 stones wins");
            assert!(env.is_finished());
            assert_eq!(env.active_player(), "bo");
        }
    }

    #[test]
    fn nim_opponents_move_between_agent_turns() {
        for seed in 0..20 {
            let mut env = Nim::new(players(), 8, rng(seed)).unwrap();
            env.reset();
            assert_eq!(env.step(Take::Three), 0.0, "no one can empty 5 stones in one turn");
            let left = env.observe();
            assert!((2..=4).contains(&left), "opponent took one to three of 5, {left} left");
            assert_eq!(env.active_player(), "ada");
        }
    }

    #[test]
    fn nim_rejects_duplicate_players() {
        let result = Nim::new(vec!["ada".into(), "bo".into(), "ada".into()], 5, rng(0));
        assert!(matches!(result, Err(Error::DuplicateAgent(id)) if id == "ada"));
    }

    #[test]
    fn nim_rejects_empty_pile() {
        assert!(matches!(
            Nim::new(players(), 0, rng(0)),
            Err(Error::Configuration { name: "start", .. })
        ));
    }

    #[test]
    fn q_agent_learns_to_leave_a_multiple_of_four() {
        let mut env = Nim::new(players(), 5, rng(1)).unwrap();
        let config = QAgentConfig {
            discount_factor: 0.9,
            exploration_rate: 0.2,
            learning_rate: 0.1,
            ..Default::default()
        };
        let mut agent = QAgent::<Nim>::new(Nim::<StdRng>::actions(), rng(2), config).unwrap();
        agent.train(&mut env, 5000);

        assert_eq!(agent.greedy_action(&5), Take::One, "leave 4 stones");
        assert_eq!(agent.greedy_action(&3), Take::Three, "take the rest");
        assert_eq!(agent.greedy_action(&2), Take::Two, "take the rest");
    }
}
