use strum::VariantArray;

use crate::env::Environment;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Square {
    Frozen,
    Hole,
    Start,
    Goal,
}

#[derive(VariantArray, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum FLAction {
    Left,
    Down,
    Right,
    Up,
}

/// A very simple RL environment taken from Python [gymnasium](https://gymnasium.farama.org/)
///
/// The agent walks a 4x4 grid from the top left corner toward the goal in the bottom right.
/// Every action is always available; walking into the edge of the grid leaves the agent where
/// it is. Falling in a hole costs `-1`, reaching the goal pays `+1`, and every other step
/// costs `-0.1`.
pub struct FrozenLake {
    map: [Square; 16],
    pos: usize,
}

impl FrozenLake {
    pub fn new() -> Self {
        use Square::*;
        let map = [
            Start, Frozen, Frozen, Frozen, //
            Frozen, Hole, Frozen, Hole, //
            Frozen, Frozen, Frozen, Hole, //
            Hole, Frozen, Frozen, Goal, //
        ];
        Self { map, pos: 0 }
    }

    /// The fixed action set
    pub fn actions() -> Vec<FLAction> {
        FLAction::VARIANTS.to_vec()
    }

    pub fn square(&self) -> Square {
        self.map[self.pos]
    }
}

impl Default for FrozenLake {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for FrozenLake {
    type State = usize;
    type Action = FLAction;

    fn reset(&mut self) {
        self.pos = 0;
    }

    fn observe(&self) -> Self::State {
        self.pos
    }

    fn step(&mut self, action: Self::Action) -> f64 {
        if self.is_finished() {
            return 0.0;
        }

        match action {
            FLAction::Left if self.pos % 4 != 0 => self.pos -= 1,
            FLAction::Down if self.pos < 12 => self.pos += 4,
            FLAction::Right if self.pos % 4 != 3 => self.pos += 1,
            FLAction::Up if self.pos > 3 => self.pos -= 4,
            _ => {}
        };

        match self.map[self.pos] {
            Square::Hole => -1.0,
            Square::Goal => 1.0,
            Square::Frozen | Square::Start => -0.1,
        }
    }

    fn is_finished(&self) -> bool {
        match self.map[self.pos] {
            Square::Frozen | Square::Start => false,
            Square::Hole | Square::Goal => true,
        }
    }
}
