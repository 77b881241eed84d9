use std::{
    collections::HashMap,
    io::{self, BufRead, ErrorKind, StdinLock, Stdout, Write},
    marker::PhantomData,
};

use log::{trace, warn};

use crate::{
    env::Environment,
    error::{Error, Result},
};

use super::Agent;

/// Consecutive I/O failures tolerated by [`Agent::select_action`] before giving up
const MAX_IO_RETRIES: usize = 3;

/// An agent that asks a person for every action
///
/// The prompt is written to `output` and a line is read from `input`. The line (without its
/// trailing newline) is compared verbatim, case included, against the accepted responses.
/// Anything else is ignored and the prompt is shown again.
pub struct Interactive<E, R, W>
where
    E: Environment,
{
    prompt: String,
    responses: HashMap<String, E::Action>,
    input: R,
    output: W,
    _env: PhantomData<fn() -> E>,
}

impl<E, R, W> Interactive<E, R, W>
where
    E: Environment,
    R: BufRead,
    W: Write,
{
    /// Create an interactive agent reading from `input` and prompting on `output`
    ///
    /// ### Errors
    /// [`Error::Configuration`] if `responses` is empty, since no input could ever be accepted
    pub fn new(
        prompt: impl Into<String>,
        responses: HashMap<String, E::Action>,
        input: R,
        output: W,
    ) -> Result<Self> {
        if responses.is_empty() {
            return Err(Error::configuration(
                "responses",
                "at least one accepted response is required",
            ));
        }

        Ok(Self {
            prompt: prompt.into(),
            responses,
            input,
            output,
            _env: PhantomData,
        })
    }

    /// Prompt until an accepted response is entered
    ///
    /// Lines that are not valid UTF-8 are rejected like any other unknown response, and
    /// interrupted reads are retried.
    ///
    /// ### Errors
    /// - [`Error::InputClosed`] if `input` reaches end of file first
    /// - [`Error::Io`] if reading or writing fails
    pub fn ask(&mut self) -> Result<E::Action> {
        let mut line = String::new();
        loop {
            write!(self.output, "{}", self.prompt)?;
            self.output.flush()?;

            line.clear();
            match self.input.read_line(&mut line) {
                Ok(0) => return Err(Error::InputClosed),
                Ok(_) => {}
                Err(e) if e.kind() == ErrorKind::InvalidData => {
                    trace!("rejected interactive response that is not UTF-8");
                    continue;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }

            let response = line
                .strip_suffix('\n')
                .map(|l| l.strip_suffix('\r').unwrap_or(l))
                .unwrap_or(line.as_str());
            if let Some(action) = self.responses.get(response) {
                return Ok(action.clone());
            }

            trace!("rejected interactive response {response:?}");
        }
    }
}

impl<E> Interactive<E, StdinLock<'static>, Stdout>
where
    E: Environment,
{
    /// Create an interactive agent on the process's standard input and output
    pub fn stdio(
        prompt: impl Into<String>,
        responses: HashMap<String, E::Action>,
    ) -> Result<Self> {
        Self::new(prompt, responses, io::stdin().lock(), io::stdout())
    }
}

impl<E, R, W> Agent<E> for Interactive<E, R, W>
where
    E: Environment,
    R: BufRead,
    W: Write,
{
    /// Block until the person enters an accepted response
    ///
    /// I/O failures are logged and the prompt is shown again, up to a few times in a row.
    ///
    /// **Panics** if the input stream closes, or if I/O keeps failing. Use [`Interactive::ask`]
    /// to handle those cases instead.
    fn select_action(&mut self, _state: &E::State) -> E::Action {
        let mut failures = 0;
        loop {
            match self.ask() {
                Ok(action) => return action,
                Err(Error::InputClosed) => {
                    panic!("interactive agent could not read an action: input closed")
                }
                Err(e) if failures < MAX_IO_RETRIES => {
                    failures += 1;
                    warn!("interactive input failed ({e}), asking again");
                }
                Err(e) => panic!("interactive agent could not read an action: {e}"),
            }
        }
    }
}
