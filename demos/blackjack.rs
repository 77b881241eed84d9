use std::{collections::HashMap, error::Error};

use arena::{
    agent::{Agent, Interactive},
    algo::{QAgent, QAgentConfig},
    env::Environment,
    gym::{
        blackjack::{BJAction, Shoe},
        Blackjack,
    },
};
use rand::{rngs::StdRng, SeedableRng};

const NUM_EPISODES: usize = 200_000;
const NUM_DECKS: usize = 6;
const NUM_HANDS: usize = 3;

fn main() -> Result<(), Box<dyn Error>> {
    let mut env = Blackjack::new(Shoe::decks(NUM_DECKS, StdRng::from_entropy())?);
    let config = QAgentConfig {
        exploration_rate: 0.1,
        learning_rate: 0.02,
        ..Default::default()
    };
    let mut advisor =
        QAgent::<Blackjack>::new(Blackjack::<StdRng>::actions(), StdRng::from_entropy(), config)?;

    let report = advisor.train(&mut env, NUM_EPISODES);
    println!(
        "trained on {} hands ({} transitions)",
        report.episodes, report.transitions
    );

    let responses = HashMap::from([
        ("h".to_string(), BJAction::Hit),
        ("s".to_string(), BJAction::Stand),
    ]);
    let mut you = Interactive::<Blackjack, _, _>::stdio("hit or stand? ", responses)?;

    let mut total = 0.0;
    for _ in 0..NUM_HANDS {
        env.reset();
        let mut reward = 0.0;
        while !env.is_finished() {
            let view = env.observe();
            println!(
                "you have {:?} ({}), dealer shows {:?}",
                env.player_hand(),
                view.player,
                env.dealer_hand()[0]
            );
            println!("the trained agent would {:?}", advisor.greedy_action(&view));
            reward += env.step(you.select_action(&view));
        }
        println!(
            "dealer finished with {:?}, you {}",
            env.dealer_hand(),
            match reward {
                r if r > 0.0 => "win",
                r if r < 0.0 => "lose",
                _ => "push",
            }
        );
        total += reward;
    }
    println!("net result over {NUM_HANDS} hands: {total}");

    Ok(())
}
