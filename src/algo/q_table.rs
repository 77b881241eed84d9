use std::collections::HashMap;

use crate::transition::Framed;

use super::Hashable;

/// The value reported for a state action pair that has never been written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnseenValue {
    /// Standard TD learning: unknown pairs are worth nothing
    #[default]
    Zero,
    /// Unknown pairs lose every comparison against a pair that has been learned
    NegInfinity,
}

impl UnseenValue {
    pub fn value(self) -> f64 {
        match self {
            Self::Zero => 0.0,
            Self::NegInfinity => f64::NEG_INFINITY,
        }
    }
}

/// Action value estimates keyed by framed state and action
///
/// Reads never insert. A pair only gets an entry once it is explicitly [set](QTable::set).
#[derive(Debug, Clone)]
pub struct QTable<S, A>
where
    S: Hashable,
    A: Hashable,
{
    values: HashMap<Framed<S>, HashMap<Framed<A>, f64>>,
    unseen: UnseenValue,
}

impl<S, A> QTable<S, A>
where
    S: Hashable,
    A: Hashable,
{
    pub fn new(unseen: UnseenValue) -> Self {
        Self {
            values: HashMap::new(),
            unseen,
        }
    }

    pub fn unseen(&self) -> UnseenValue {
        self.unseen
    }

    /// Get the estimate for a pair, falling back to the unseen value
    pub fn get(&self, state: &Framed<S>, action: &Framed<A>) -> f64 {
        self.values
            .get(state)
            .and_then(|row| row.get(action))
            .copied()
            .unwrap_or_else(|| self.unseen.value())
    }

    /// Whether the pair has an entry of its own
    pub fn contains(&self, state: &Framed<S>, action: &Framed<A>) -> bool {
        self.values
            .get(state)
            .is_some_and(|row| row.contains_key(action))
    }

    pub fn set(&mut self, state: Framed<S>, action: Framed<A>, value: f64) {
        self.values.entry(state).or_default().insert(action, value);
    }

    /// Number of pairs with an entry
    pub fn len(&self) -> usize {
        self.values.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over every stored `(state, action, value)`
    pub fn iter(&self) -> impl Iterator<Item = (&Framed<S>, &Framed<A>, f64)> {
        self.values
            .iter()
            .flat_map(|(s, row)| row.iter().map(move |(a, &v)| (s, a, v)))
    }
}

impl<S, A> Default for QTable<S, A>
where
    S: Hashable,
    A: Hashable,
{
    fn default() -> Self {
        Self::new(UnseenValue::default())
    }
}
