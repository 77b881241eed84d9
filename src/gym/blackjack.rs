use log::debug;
use rand::{rngs::StdRng, seq::SliceRandom, Rng};
use strum::VariantArray;

use crate::{
    env::Environment,
    error::{Error, Result},
};

#[derive(VariantArray, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    /// Points for the card, counting an ace as one
    pub fn points(self) -> u8 {
        match self {
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
            Rank::Ace => 1,
        }
    }
}

/// Whether one ace in the hand can count as eleven without busting
fn usable_ace(hand: &[Rank]) -> bool {
    hand.contains(&Rank::Ace) && hand.iter().map(|c| c.points()).sum::<u8>() <= 11
}

/// Best score of a hand: aces count as one, and one of them as eleven if that does not bust
pub fn score(hand: &[Rank]) -> u8 {
    let points: u8 = hand.iter().map(|c| c.points()).sum();
    if usable_ace(hand) {
        points + 10
    } else {
        points
    }
}

/// Where cards are drawn from
///
/// A naive shoe draws every card uniformly with replacement. A finite shoe holds whole decks,
/// is shuffled on [`reset`](Shoe::reset), and reshuffles itself if it runs out mid-hand.
/// Either way [`history`](Shoe::history) lists the cards drawn since the last reset.
pub struct Shoe<R = StdRng> {
    cards: Vec<Rank>,
    drawn: usize,
    naive: bool,
    rng: R,
}

impl<R: Rng> Shoe<R> {
    /// A shoe that draws with replacement, as if from infinitely many decks
    pub fn naive(rng: R) -> Self {
        Self {
            cards: Vec::new(),
            drawn: 0,
            naive: true,
            rng,
        }
    }

    /// A shuffled shoe of `num_decks` standard 52 card decks
    ///
    /// ### Errors
    /// [`Error::Configuration`] if `num_decks` is zero
    pub fn decks(num_decks: usize, rng: R) -> Result<Self> {
        if num_decks == 0 {
            return Err(Error::configuration(
                "num_decks",
                "a finite shoe needs at least one deck, use `Shoe::naive` otherwise",
            ));
        }

        let deck = Rank::VARIANTS.repeat(4);
        let mut shoe = Self {
            cards: deck.repeat(num_decks),
            drawn: 0,
            naive: false,
            rng,
        };
        shoe.reset();
        Ok(shoe)
    }

    /// A finite shoe dealing `cards` in order until its first reset
    #[cfg(test)]
    pub(crate) fn stacked(cards: Vec<Rank>, rng: R) -> Self {
        Self {
            cards,
            drawn: 0,
            naive: false,
            rng,
        }
    }

    pub fn draw(&mut self) -> Rank {
        if self.naive {
            let &card = Rank::VARIANTS
                .choose(&mut self.rng)
                .expect("There is always at least one rank");
            self.cards.push(card);
        } else if self.drawn == self.cards.len() {
            debug!("shoe ran out after {} cards, reshuffling", self.drawn);
            self.reset();
        }

        let card = self.cards[self.drawn];
        self.drawn += 1;
        card
    }

    /// Put every card back, shuffling a finite shoe
    pub fn reset(&mut self) {
        self.drawn = 0;
        if self.naive {
            self.cards.clear();
        } else {
            self.cards.shuffle(&mut self.rng);
        }
    }

    /// Cards drawn since the last reset, in order
    pub fn history(&self) -> &[Rank] {
        &self.cards[..self.drawn]
    }

    /// Cards left in a finite shoe, `None` for a naive one
    pub fn remaining(&self) -> Option<usize> {
        (!self.naive).then(|| self.cards.len() - self.drawn)
    }

    /// Whether the next hand should start from a fresh shoe
    ///
    /// A naive shoe starts every hand fresh. A finite shoe is dealt down to its last quarter.
    pub fn needs_reset(&self) -> bool {
        match self.remaining() {
            None => true,
            Some(left) => left < self.cards.len() / 4,
        }
    }
}

#[derive(VariantArray, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum BJAction {
    Hit,
    Stand,
}

/// What the player can see: their own score and the dealer's face up card
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct BlackjackView {
    pub player: u8,
    pub usable_ace: bool,
    pub dealer: u8,
}

/// One hand of blackjack against a dealer who draws to 17
///
/// The player starts with two cards and the dealer with one. Hitting past 21 loses at once.
/// Standing lets the dealer draw until reaching 17 or more. The player is paid `+1` for a win,
/// `-1` for a loss and `0` for a push.
pub struct Blackjack<R = StdRng> {
    shoe: Shoe<R>,
    player: Vec<Rank>,
    dealer: Vec<Rank>,
    finished: bool,
}

impl<R: Rng> Blackjack<R> {
    pub fn new(shoe: Shoe<R>) -> Self {
        Self {
            shoe,
            player: Vec::new(),
            dealer: Vec::new(),
            finished: true,
        }
    }

    /// The fixed action set
    pub fn actions() -> Vec<BJAction> {
        BJAction::VARIANTS.to_vec()
    }

    pub fn shoe(&self) -> &Shoe<R> {
        &self.shoe
    }

    pub fn player_hand(&self) -> &[Rank] {
        &self.player
    }

    pub fn dealer_hand(&self) -> &[Rank] {
        &self.dealer
    }

    fn settle(&self) -> f64 {
        let player = score(&self.player);
        let dealer = score(&self.dealer);
        if dealer > 21 || player > dealer {
            1.0
        } else if dealer > player {
            -1.0
        } else {
            0.0
        }
    }
}

impl<R: Rng> Environment for Blackjack<R> {
    type State = BlackjackView;
    type Action = BJAction;

    fn reset(&mut self) {
        if self.shoe.needs_reset() {
            self.shoe.reset();
        }
        self.player = vec![self.shoe.draw(), self.shoe.draw()];
        self.dealer = vec![self.shoe.draw()];
        self.finished = false;
    }

    fn observe(&self) -> Self::State {
        BlackjackView {
            player: score(&self.player),
            usable_ace: usable_ace(&self.player),
            dealer: score(&self.dealer[..1.min(self.dealer.len())]),
        }
    }

    fn step(&mut self, action: Self::Action) -> f64 {
        if self.finished {
            return 0.0;
        }

        match action {
            BJAction::Hit => {
                self.player.push(self.shoe.draw());
                if score(&self.player) > 21 {
                    self.finished = true;
                    return -1.0;
                }
                0.0
            }
            BJAction::Stand => {
                while score(&self.dealer) < 17 {
                    self.dealer.push(self.shoe.draw());
                }
                self.finished = true;
                self.settle()
            }
        }
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}
