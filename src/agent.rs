use crate::env::Environment;

mod interactive;

pub use interactive::Interactive;

/// Anything that can choose actions for an [`Environment`]
pub trait Agent<E>
where
    E: Environment,
{
    /// Choose an action given the current observation
    fn select_action(&mut self, state: &E::State) -> E::Action;
}
