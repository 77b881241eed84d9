use log::{debug, trace};

use crate::{
    agent::Agent,
    env::Environment,
    transition::{Framed, Transition},
};

/// Where the sampler is within the current episode
enum Phase<A> {
    /// The next pull resets the environment, or ends the sequence if no episodes remain
    Idle,
    /// The episode is running. `pending` holds the action selected in the last emitted
    /// transition, which is applied to the environment on the next pull.
    Active { pending: Option<A> },
}

/// A lazy sequence of [transitions](Transition) produced by one agent acting in one environment
///
/// Each episode opens with `(Start, Start, 0, s0, a0)` and closes with
/// `(s_n, a_n, r_n, Finished, Finished)`, so the reward of the terminal step is attached to a
/// transition that can be learned from. The environment is only stepped when the next
/// transition is pulled, and nothing runs once the consumer stops pulling.
///
/// The sampler borrows the agent for its whole lifetime; use [`agent_mut`](Episodes::agent_mut)
/// to update it between pulls.
pub struct Episodes<'a, Ag, E>
where
    E: Environment,
    Ag: Agent<E>,
{
    agent: &'a mut Ag,
    env: &'a mut E,
    remaining: Option<usize>,
    completed: usize,
    phase: Phase<E::Action>,
    prev_state: Framed<E::State>,
    prev_action: Framed<E::Action>,
    reward: f64,
    episode_return: f64,
}

/// Sample a single episode of `agent` acting in `env`
pub fn sample_episode<'a, Ag, E>(agent: &'a mut Ag, env: &'a mut E) -> Episodes<'a, Ag, E>
where
    E: Environment,
    Ag: Agent<E>,
{
    Episodes::new(agent, env, Some(1))
}

/// Sample `num_episodes` consecutive episodes of `agent` acting in `env`
///
/// A `num_episodes` of `0` samples episodes forever.
pub fn sample_episodes<'a, Ag, E>(
    agent: &'a mut Ag,
    env: &'a mut E,
    num_episodes: usize,
) -> Episodes<'a, Ag, E>
where
    E: Environment,
    Ag: Agent<E>,
{
    let remaining = (num_episodes > 0).then_some(num_episodes);
    Episodes::new(agent, env, remaining)
}

impl<'a, Ag, E> Episodes<'a, Ag, E>
where
    E: Environment,
    Ag: Agent<E>,
{
    fn new(agent: &'a mut Ag, env: &'a mut E, remaining: Option<usize>) -> Self {
        Self {
            agent,
            env,
            remaining,
            completed: 0,
            phase: Phase::Idle,
            prev_state: Framed::Start,
            prev_action: Framed::Start,
            reward: 0.0,
            episode_return: 0.0,
        }
    }

    pub fn agent(&self) -> &Ag {
        &*self.agent
    }

    /// Access the agent between pulls, typically to learn from the last transition
    pub fn agent_mut(&mut self) -> &mut Ag {
        &mut *self.agent
    }

    pub fn env(&self) -> &E {
        &*self.env
    }

    /// Number of episodes whose terminal transition has been emitted
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// Reset the environment and frame the opening of a new episode
    ///
    /// **Returns** `false` if no episodes remain
    fn begin_episode(&mut self) -> bool {
        match &mut self.remaining {
            Some(0) => return false,
            Some(n) => *n -= 1,
            None => {}
        }

        self.env.reset();
        self.prev_state = Framed::Start;
        self.prev_action = Framed::Start;
        self.reward = 0.0;
        self.episode_return = 0.0;
        self.phase = Phase::Active { pending: None };
        debug!("episode {} started", self.completed + 1);
        true
    }

    fn emit(
        &mut self,
        next_state: Framed<E::State>,
        next_action: Framed<E::Action>,
    ) -> Transition<E> {
        let prev_state = std::mem::replace(&mut self.prev_state, next_state.clone());
        let prev_action = std::mem::replace(&mut self.prev_action, next_action.clone());
        Transition {
            prev_state,
            prev_action,
            reward: self.reward,
            next_state,
            next_action,
        }
    }
}

impl<'a, Ag, E> Iterator for Episodes<'a, Ag, E>
where
    E: Environment,
    Ag: Agent<E>,
{
    type Item = Transition<E>;

    fn next(&mut self) -> Option<Self::Item> {
        if matches!(self.phase, Phase::Idle) && !self.begin_episode() {
            return None;
        }

        let pending = match &mut self.phase {
            Phase::Active { pending } => pending.take(),
            Phase::Idle => None,
        };

        if let Some(action) = pending {
            self.reward = self.env.step(action);
            self.episode_return += self.reward;
        }

        if self.env.is_finished() {
            let transition = self.emit(Framed::Finished, Framed::Finished);
            self.completed += 1;
            self.phase = Phase::Idle;
            debug!(
                "episode {} finished with return {}",
                self.completed, self.episode_return
            );
            return Some(transition);
        }

        let state = self.env.observe();
        let action = self.agent.select_action(&state);
        self.phase = Phase::Active {
            pending: Some(action.clone()),
        };
        trace!("transition emitted, reward {}", self.reward);
        Some(self.emit(Framed::Real(state), Framed::Real(action)))
    }
}
