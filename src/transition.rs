use std::fmt;

use crate::env::Environment;

/// A state or action, or one of the markers that frame an episode
///
/// The markers sit outside the domain of every environment, so they can never collide with a
/// genuine observation or action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Framed<T> {
    /// Before the first action of an episode
    Start,
    /// A value produced by the environment or chosen by an agent
    Real(T),
    /// After the episode has terminated
    Finished,
}

impl<T> Framed<T> {
    /// Get the wrapped value, or `None` for a marker
    pub fn real(&self) -> Option<&T> {
        match self {
            Self::Real(value) => Some(value),
            Self::Start | Self::Finished => None,
        }
    }

    pub fn is_start(&self) -> bool {
        matches!(self, Self::Start)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished)
    }
}

impl<T> From<T> for Framed<T> {
    fn from(value: T) -> Self {
        Self::Real(value)
    }
}

/// One step of interaction, framed for a SARSA-style update
///
/// The `next_state`/`next_action` of a transition are the `prev_state`/`prev_action` of the one
/// that follows it in the same episode. The first transition of an episode starts from
/// [`Framed::Start`] with a reward of zero; the last one ends in [`Framed::Finished`] and carries
/// the terminal reward.
pub struct Transition<E: Environment> {
    /// The state in which `prev_action` was taken
    pub prev_state: Framed<E::State>,
    /// The action taken in `prev_state`
    pub prev_action: Framed<E::Action>,
    /// The reward received for taking `prev_action`
    pub reward: f64,
    /// The state observed after the action, or [`Framed::Finished`] if terminal
    pub next_state: Framed<E::State>,
    /// The action selected in `next_state`, or [`Framed::Finished`] if terminal
    pub next_action: Framed<E::Action>,
}

impl<E: Environment> Transition<E> {
    /// Whether this transition closes its episode
    pub fn is_terminal(&self) -> bool {
        self.next_state.is_finished()
    }
}

impl<E: Environment> Clone for Transition<E> {
    fn clone(&self) -> Self {
        Self {
            prev_state: self.prev_state.clone(),
            prev_action: self.prev_action.clone(),
            reward: self.reward,
            next_state: self.next_state.clone(),
            next_action: self.next_action.clone(),
        }
    }
}

impl<E> fmt::Debug for Transition<E>
where
    E: Environment,
    E::State: fmt::Debug,
    E::Action: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("prev_state", &self.prev_state)
            .field("prev_action", &self.prev_action)
            .field("reward", &self.reward)
            .field("next_state", &self.next_state)
            .field("next_action", &self.next_action)
            .finish()
    }
}

impl<E> PartialEq for Transition<E>
where
    E: Environment,
    E::State: PartialEq,
    E::Action: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.prev_state == other.prev_state
            && self.prev_action == other.prev_action
            && self.reward == other.reward
            && self.next_state == other.next_state
            && self.next_action == other.next_action
    }
}
