use std::{collections::HashSet, fmt::Display, hash::Hash};

use crate::error::{Error, Result};

/// The seating of a multi-agent environment, tracking whose turn it is
///
/// Exactly one seat is active at a time, so a single [`Agent`](crate::agent::Agent) can drive
/// every seat through the usual one-agent-per-step sampling loop.
#[derive(Debug, Clone)]
pub struct TurnOrder<Id> {
    seats: Vec<Id>,
    active: usize,
}

impl<Id> TurnOrder<Id>
where
    Id: Eq + Hash + Display,
{
    /// Seat the given agents in order, with the first one to act first
    ///
    /// ### Errors
    /// - [`Error::Configuration`] if `seats` is empty
    /// - [`Error::DuplicateAgent`] if an identifier appears more than once
    pub fn new(seats: Vec<Id>) -> Result<Self> {
        if seats.is_empty() {
            return Err(Error::configuration("seats", "at least one agent is required"));
        }

        let mut seen = HashSet::with_capacity(seats.len());
        for id in &seats {
            if !seen.insert(id) {
                return Err(Error::DuplicateAgent(id.to_string()));
            }
        }

        Ok(Self { seats, active: 0 })
    }
}

impl<Id> TurnOrder<Id> {
    /// Index of the seat whose turn it is
    pub fn active_seat(&self) -> usize {
        self.active
    }

    /// Identifier of the agent whose turn it is
    pub fn active(&self) -> &Id {
        &self.seats[self.active]
    }

    /// Pass the turn to the next seat, wrapping around
    pub fn advance(&mut self) {
        self.active = (self.active + 1) % self.seats.len();
    }

    /// Give the turn back to the first seat
    pub fn reset(&mut self) {
        self.active = 0;
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }
}
