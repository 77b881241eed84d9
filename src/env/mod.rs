mod turn_order;

pub use turn_order::TurnOrder;

/// Represents an episodic, partially observable decision process in which one agent
/// acts at a time.
///
/// The environment owns all of its episode state. An agent only ever sees what
/// [`observe`](Environment::observe) returns for the acting seat.
///
/// ### Episode lifecycle
/// `reset` starts an episode, leaving the environment active (or immediately finished for
/// degenerate single-state episodes). Each `step` applies one action and yields the reward for
/// that step. `is_finished` holds from the step that ends the episode until the next `reset`.
pub trait Environment {
    /// The partial view of the environment visible to the acting agent
    type State: Clone;

    /// An action from the environment's fixed action set
    type Action: Clone;

    /// Begin a new episode, discarding all state from the previous one
    fn reset(&mut self);

    /// Get the current observation for the acting agent
    ///
    /// Must return the same value when called repeatedly without an intervening `step`.
    fn observe(&self) -> Self::State;

    /// Apply an action and return the reward for this single step
    ///
    /// Calling `step` once the episode is finished must be a no-op returning `0.0`.
    fn step(&mut self, action: Self::Action) -> f64;

    /// Determine if the episode has reached a terminal state
    fn is_finished(&self) -> bool;
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Walks a fixed number of steps, observing the step index. Every step pays `1.0`.
    pub struct MockEnv {
        pub length: usize,
        pub t: usize,
        pub resets: usize,
    }

    impl MockEnv {
        pub fn new(length: usize) -> Self {
            Self {
                length,
                t: 0,
                resets: 0,
            }
        }
    }

    impl Environment for MockEnv {
        type State = usize;
        type Action = i32;

        fn reset(&mut self) {
            self.t = 0;
            self.resets += 1;
        }

        fn observe(&self) -> Self::State {
            self.t
        }

        fn step(&mut self, _action: Self::Action) -> f64 {
            if self.is_finished() {
                return 0.0;
            }
            self.t += 1;
            1.0
        }

        fn is_finished(&self) -> bool {
            self.t >= self.length
        }
    }

    #[test]
    fn mock_env_step_after_finish_is_noop() {
        let mut env = MockEnv::new(1);
        env.reset();
        assert!(!env.is_finished());
        assert_eq!(env.step(0), 1.0);
        assert!(env.is_finished());
        assert_eq!(env.step(0), 0.0, "finished episode pays nothing");
        assert_eq!(env.observe(), 1, "finished episode does not move");
    }
}
