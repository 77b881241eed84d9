pub mod blackjack;
pub mod frozen_lake;
pub mod k_armed_bandit;
pub mod nim;

pub use blackjack::Blackjack;
pub use frozen_lake::FrozenLake;
pub use k_armed_bandit::KArmedBandit;
pub use nim::Nim;
