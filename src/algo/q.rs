use log::info;
use rand::{rngs::StdRng, seq::SliceRandom, Rng};

use crate::{
    agent::Agent,
    ensure_interval,
    env::Environment,
    error::{Error, Result},
    exploration::{Choice, EpsilonGreedy},
    sample::sample_episodes,
    transition::{Framed, Transition},
};

use super::{Hashable, QTable, UnseenValue};

/// Configuration for the [`QAgent`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QAgentConfig {
    /// Gamma, must be in the interval `[0,1]`
    pub discount_factor: f64,
    /// Epsilon, must be in the interval `[0,1]`
    pub exploration_rate: f64,
    /// Alpha, must be positive
    pub learning_rate: f64,
    /// Value of state action pairs the agent has never updated
    pub unseen: UnseenValue,
}

impl Default for QAgentConfig {
    fn default() -> Self {
        Self {
            discount_factor: 1.0,
            exploration_rate: 0.1,
            learning_rate: 0.01,
            unseen: UnseenValue::Zero,
        }
    }
}

impl QAgentConfig {
    pub fn validate(&self) -> Result<()> {
        let &Self {
            discount_factor,
            exploration_rate,
            learning_rate,
            ..
        } = self;
        ensure_interval!(discount_factor, 0.0, 1.0);
        ensure_interval!(exploration_rate, 0.0, 1.0);
        validate_learning_rate(learning_rate)
    }
}

fn validate_learning_rate(learning_rate: f64) -> Result<()> {
    if learning_rate > 0.0 && learning_rate.is_finite() {
        Ok(())
    } else {
        Err(Error::configuration(
            "learning_rate",
            format!("{learning_rate} must be positive and finite"),
        ))
    }
}

/// Totals gathered over a call to [`QAgent::train`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrainingReport {
    /// Episodes played to completion
    pub episodes: usize,
    /// Transitions learned from, including the framing ones
    pub transitions: usize,
    /// Undiscounted sum of every reward received
    pub total_reward: f64,
}

/// A tabular agent that selects actions epsilon greedily and learns with a SARSA-style TD update
///
/// ### Generics
/// - `E` - The [`Environment`] in which the agent will learn
///     - The state and action types must be [`Hashable`] because a value is recorded for each state action pair
/// - `R` - The agent's own source of randomness
pub struct QAgent<E, R = StdRng>
where
    E: Environment,
    E::State: Hashable,
    E::Action: Hashable,
    R: Rng,
{
    q_table: QTable<E::State, E::Action>,
    actions: Vec<E::Action>,
    exploration: EpsilonGreedy,
    rng: R,
    discount_factor: f64,
    learning_rate: f64,
}

impl<E, R> QAgent<E, R>
where
    E: Environment,
    E::State: Hashable,
    E::Action: Hashable,
    R: Rng,
{
    /// Initialize a new `QAgent` over a fixed action set
    ///
    /// The order of `actions` decides ties when exploiting: the first action with the highest
    /// value wins.
    ///
    /// ### Errors
    /// [`Error::Configuration`] if `actions` is empty or `config` is out of range
    pub fn new(actions: Vec<E::Action>, rng: R, config: QAgentConfig) -> Result<Self> {
        config.validate()?;
        if actions.is_empty() {
            return Err(Error::configuration(
                "actions",
                "at least one action is required",
            ));
        }

        Ok(Self {
            q_table: QTable::new(config.unseen),
            actions,
            exploration: EpsilonGreedy::new(config.exploration_rate)?,
            rng,
            discount_factor: config.discount_factor,
            learning_rate: config.learning_rate,
        })
    }

    pub fn q_table(&self) -> &QTable<E::State, E::Action> {
        &self.q_table
    }

    pub fn actions(&self) -> &[E::Action] {
        &self.actions
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    pub fn exploration_rate(&self) -> f64 {
        self.exploration.epsilon()
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn set_discount_factor(&mut self, discount_factor: f64) -> Result<()> {
        ensure_interval!(discount_factor, 0.0, 1.0);
        self.discount_factor = discount_factor;
        Ok(())
    }

    pub fn set_exploration_rate(&mut self, exploration_rate: f64) -> Result<()> {
        self.exploration = EpsilonGreedy::new(exploration_rate)?;
        Ok(())
    }

    pub fn set_learning_rate(&mut self, learning_rate: f64) -> Result<()> {
        validate_learning_rate(learning_rate)?;
        self.learning_rate = learning_rate;
        Ok(())
    }

    /// The first action, in action set order, with the highest estimated value in `state`
    pub fn greedy_action(&self, state: &E::State) -> E::Action {
        let state = Framed::Real(state.clone());
        self.actions
            .iter()
            .map(|a| (a, self.q_table.get(&state, &Framed::Real(a.clone()))))
            .reduce(|best, candidate| if candidate.1 > best.1 { candidate } else { best })
            .map(|(a, _)| a.clone())
            .expect("There is always at least one action available")
    }

    /// Move the estimate for the transition's previous pair toward its TD target
    ///
    /// `Q(s,a) += alpha * (r + gamma * Q(s',a') - Q(s,a))`, where `a'` is the action actually
    /// selected in `s'`. Under [`UnseenValue::NegInfinity`] an unseen `Q(s',a')` bootstraps as
    /// zero and an unseen `Q(s,a)` is set straight to the target.
    pub fn update(&mut self, transition: &Transition<E>) {
        let Transition {
            prev_state,
            prev_action,
            reward,
            next_state,
            next_action,
        } = transition;

        let q_value = self.q_table.get(prev_state, prev_action);
        let next_q_value = match self.q_table.get(next_state, next_action) {
            v if v.is_finite() => v,
            _ => 0.0,
        };
        let td_target = reward + self.discount_factor * next_q_value;
        let updated = if q_value.is_finite() {
            q_value + self.learning_rate * (td_target - q_value)
        } else {
            td_target
        };

        self.q_table.set(prev_state.clone(), prev_action.clone(), updated);
    }

    /// Run `num_episodes` episodes in `env`, updating after every transition
    ///
    /// A `num_episodes` of `0` trains forever.
    pub fn train(&mut self, env: &mut E, num_episodes: usize) -> TrainingReport {
        let mut report = TrainingReport::default();
        let mut episodes = sample_episodes(self, env, num_episodes);

        while let Some(transition) = episodes.next() {
            report.transitions += 1;
            report.total_reward += transition.reward;
            if transition.is_terminal() {
                report.episodes += 1;
            }
            episodes.agent_mut().update(&transition);
        }

        info!(
            "trained for {} episodes ({} transitions), total reward {}",
            report.episodes, report.transitions, report.total_reward
        );
        report
    }
}

impl<E, R> Agent<E> for QAgent<E, R>
where
    E: Environment,
    E::State: Hashable,
    E::Action: Hashable,
    R: Rng,
{
    fn select_action(&mut self, state: &E::State) -> E::Action {
        match self.exploration.choose(&mut self.rng) {
            Choice::Explore => self
                .actions
                .choose(&mut self.rng)
                .cloned()
                .expect("There is always at least one action available"),
            Choice::Exploit => self.greedy_action(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use statrs::distribution::{ChiSquared, ContinuousCDF};

    use crate::env::tests::MockEnv;

    use super::*;

    fn agent(actions: Vec<i32>, config: QAgentConfig) -> QAgent<MockEnv> {
        QAgent::new(actions, StdRng::seed_from_u64(42), config).unwrap()
    }

    fn step(s: usize, a: i32, reward: f64, next: Option<(usize, i32)>) -> Transition<MockEnv> {
        let (next_state, next_action) = match next {
            Some((s, a)) => (Framed::Real(s), Framed::Real(a)),
            None => (Framed::Finished, Framed::Finished),
        };
        Transition {
            prev_state: Framed::Real(s),
            prev_action: Framed::Real(a),
            reward,
            next_state,
            next_action,
        }
    }

    #[test]
    fn q_agent_validates_config() {
        let rng = || StdRng::seed_from_u64(0);
        let bad = [
            QAgentConfig {
                learning_rate: -0.1,
                ..Default::default()
            },
            QAgentConfig {
                learning_rate: 0.0,
                ..Default::default()
            },
            QAgentConfig {
                discount_factor: 1.5,
                ..Default::default()
            },
            QAgentConfig {
                exploration_rate: -0.1,
                ..Default::default()
            },
        ];
        for config in bad {
            let result = QAgent::<MockEnv>::new(vec![0], rng(), config);
            assert!(
                matches!(result, Err(Error::Configuration { .. })),
                "{config:?} is rejected"
            );
        }

        let result = QAgent::<MockEnv>::new(vec![], rng(), QAgentConfig::default());
        assert!(matches!(
            result,
            Err(Error::Configuration { name: "actions", .. })
        ));

        let mut agent = agent(vec![0], QAgentConfig::default());
        assert!(agent.set_learning_rate(-1.0).is_err());
        assert!(agent.set_exploration_rate(2.0).is_err());
        assert!(agent.set_discount_factor(0.5).is_ok());
        assert_eq!(agent.discount_factor(), 0.5);
        assert_eq!(agent.learning_rate(), 0.01, "rejected value is not applied");
    }

    #[test]
    fn q_agent_unseen_pairs() {
        let agent = agent(vec![0, 1], QAgentConfig::default());
        assert_eq!(agent.q_table().get(&Framed::Real(9), &Framed::Real(1)), 0.0);
        assert_eq!(agent.greedy_action(&9), 0);
        assert!(agent.q_table().is_empty());
    }

    #[test]
    fn q_agent_greedy_breaks_ties_by_order() {
        let config = QAgentConfig {
            exploration_rate: 0.0,
            ..Default::default()
        };
        let mut agent = agent(vec![1, 2, 3], config);
        agent.update(&step(0, 3, 1.0, None));
        agent.update(&step(0, 2, 1.0, None));

        for _ in 0..100 {
            assert_eq!(agent.select_action(&0), 2, "first of the tied maxima");
        }
        assert_eq!(agent.select_action(&5), 1, "all unseen ties to the first action");
    }

    #[test]
    fn q_agent_explores_uniformly() {
        const TRIALS: usize = 8000;
        let config = QAgentConfig {
            exploration_rate: 1.0,
            ..Default::default()
        };
        let mut agent = agent(vec![0, 1, 2, 3], config);
        agent.update(&step(0, 0, 10.0, None));

        let mut counts = [0usize; 4];
        for _ in 0..TRIALS {
            counts[agent.select_action(&0) as usize] += 1;
        }

        let expected = TRIALS as f64 / 4.0;
        let statistic: f64 = counts
            .iter()
            .map(|&c| (c as f64 - expected).powi(2) / expected)
            .sum();
        let p_value = 1.0 - ChiSquared::new(3.0).unwrap().cdf(statistic);
        assert!(p_value > 0.001, "counts {counts:?} are not uniform");
    }

    #[test]
    fn q_agent_first_update_is_alpha_times_reward() {
        for gamma in [0.0, 0.5, 1.0] {
            let config = QAgentConfig {
                discount_factor: gamma,
                learning_rate: 0.1,
                ..Default::default()
            };
            let mut agent = agent(vec![0, 1], config);
            agent.update(&step(4, 1, 3.0, Some((5, 0))));
            assert_eq!(
                agent.q_table().get(&Framed::Real(4), &Framed::Real(1)),
                0.1 * 3.0
            );
            assert_eq!(agent.q_table().len(), 1);
        }
    }

    #[test]
    fn q_agent_update_uses_selected_next_action() {
        let config = QAgentConfig {
            learning_rate: 1.0,
            ..Default::default()
        };
        let mut agent = agent(vec![0, 1], config);
        agent.update(&step(1, 0, 10.0, None));
        assert_eq!(agent.q_table().get(&Framed::Real(1), &Framed::Real(0)), 10.0);

        agent.update(&step(0, 0, 0.0, Some((1, 1))));
        assert_eq!(
            agent.q_table().get(&Framed::Real(0), &Framed::Real(0)),
            0.0,
            "bootstraps from the selected action, not the best one"
        );

        agent.update(&step(0, 1, 0.0, Some((1, 0))));
        assert_eq!(agent.q_table().get(&Framed::Real(0), &Framed::Real(1)), 10.0);
    }

    #[test]
    fn q_agent_neg_infinity_stays_finite() {
        let config = QAgentConfig {
            learning_rate: 0.5,
            unseen: UnseenValue::NegInfinity,
            ..Default::default()
        };
        let mut agent = agent(vec![0, 1], config);
        assert_eq!(agent.greedy_action(&0), 0);

        agent.update(&step(0, 1, 2.0, Some((1, 0))));
        assert_eq!(agent.q_table().get(&Framed::Real(0), &Framed::Real(1)), 2.0);
        assert_eq!(agent.greedy_action(&0), 1, "a learned pair beats an unseen one");

        agent.update(&step(0, 1, 0.0, None));
        assert_eq!(agent.q_table().get(&Framed::Real(0), &Framed::Real(1)), 1.0);
    }

    #[test]
    fn q_agent_train_reports() {
        let mut env = MockEnv::new(3);
        let mut agent = agent(vec![0, 1], QAgentConfig::default());
        let report = agent.train(&mut env, 5);

        assert_eq!(report.episodes, 5);
        assert_eq!(report.transitions, 5 * 4, "three steps plus the opening frame");
        assert_eq!(report.total_reward, 15.0);
        assert_eq!(env.resets, 5);
        let last_step = |a| agent.q_table().get(&Framed::Real(2), &Framed::Real(a));
        assert!(last_step(0) > 0.0 || last_step(1) > 0.0, "terminal reward was learned");
    }
}
