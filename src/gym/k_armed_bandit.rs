use rand::{rngs::StdRng, Rng};
use rand_distr::{Distribution, Normal};

use crate::env::Environment;

/// K-armed bandit environment
///
/// A simple environment with K arms, each of which has a normal distribution of rewards.
/// The goal is to learn which arm has the highest mean reward. Every episode is a single pull,
/// so the only observation is `()`.
pub struct KArmedBandit<const K: usize, R = StdRng> {
    arms: [Normal<f64>; K],
    means: [f64; K],
    rng: R,
    pulled: bool,
}

impl<const K: usize, R: Rng> KArmedBandit<K, R> {
    /// Initialize a new K-armed bandit, drawing each arm's mean from `Normal(0, 1)`
    pub fn new(mut rng: R) -> Self {
        let dist = Normal::<f64>::new(0.0, 1.0).expect("unit variance is valid");
        let means = std::array::from_fn(|_| dist.sample(&mut rng));
        Self::with_means(means, rng)
    }

    /// Initialize a K-armed bandit with known arm means and unit variance
    pub fn with_means(means: [f64; K], rng: R) -> Self {
        let arms = means.map(|mean| Normal::new(mean, 1.0).expect("unit variance is valid"));
        Self {
            arms,
            means,
            rng,
            pulled: false,
        }
    }

    /// The fixed action set: one action per arm
    pub fn actions(&self) -> Vec<usize> {
        (0..K).collect()
    }

    /// The arm with the highest mean reward
    pub fn best_arm(&self) -> usize {
        (0..K)
            .reduce(|best, arm| if self.means[arm] > self.means[best] { arm } else { best })
            .expect("A bandit has at least one arm")
    }
}

impl<const K: usize, R: Rng> Environment for KArmedBandit<K, R> {
    type State = ();
    type Action = usize;

    fn reset(&mut self) {
        self.pulled = false;
    }

    fn observe(&self) -> Self::State {}

    fn step(&mut self, action: Self::Action) -> f64 {
        if self.pulled {
            return 0.0;
        }
        assert!(action < K, "Invalid action: {}", action);
        self.pulled = true;
        self.arms[action].sample(&mut self.rng)
    }

    fn is_finished(&self) -> bool {
        self.pulled
    }
}
