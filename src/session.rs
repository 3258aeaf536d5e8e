// 🧭 Interactive Session - the (P)rint/(A)dd/(R)emove/(E)xpense/e(X)it loop
//
// Generic over the line source and the sink so tests can drive it with
// in-memory buffers. Every command runs to completion before the next line
// is read; end of input behaves like exit.

use crate::error::FleetError;
use crate::fleet::Fleet;
use crate::gateway;
use crate::parser;
use anyhow::Result;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::debug;

const MENU_PROMPT: &str = "(P)rint, (A)dd, (R)emove, (E)xpense, e(X)it : ";
const ADD_PROMPT: &str = "Please enter the new boat CSV data          : ";
const REMOVE_PROMPT: &str = "Which boat do you want to remove?           : ";
const SPEND_NAME_PROMPT: &str = "Which boat do you want to spend on?         : ";
const SPEND_AMOUNT_PROMPT: &str = "How much do you want to spend?              : ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Print,
    Add,
    Remove,
    Expense,
    Exit,
}

impl Command {
    /// First non-blank character, case-insensitive
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().chars().next()?.to_ascii_uppercase() {
            'P' => Some(Command::Print),
            'A' => Some(Command::Add),
            'R' => Some(Command::Remove),
            'E' => Some(Command::Expense),
            'X' => Some(Command::Exit),
            _ => None,
        }
    }
}

enum Flow {
    Continue,
    Stop,
}

pub struct Session<R, W> {
    fleet: Fleet,
    snapshot: PathBuf,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(fleet: Fleet, snapshot: impl Into<PathBuf>, input: R, output: W) -> Self {
        Self {
            fleet,
            snapshot: snapshot.into(),
            input,
            output,
        }
    }

    /// Run until exit (or end of input), save the snapshot, hand the fleet back
    pub fn run(mut self) -> Result<Fleet> {
        writeln!(self.output, "Welcome to the Fleet Management System")?;
        writeln!(self.output, "--------------------------------------")?;
        writeln!(self.output)?;

        loop {
            let Some(line) = self.prompt(MENU_PROMPT)? else {
                writeln!(self.output)?;
                break;
            };

            let flow = match Command::parse(&line) {
                Some(Command::Print) => self.print_report()?,
                Some(Command::Add) => self.add_boat()?,
                Some(Command::Remove) => self.remove_boat()?,
                Some(Command::Expense) => self.record_expense()?,
                Some(Command::Exit) => Flow::Stop,
                None => {
                    writeln!(self.output, "Invalid menu option, try again")?;
                    Flow::Continue
                }
            };

            if let Flow::Stop = flow {
                break;
            }
        }

        self.exit()?;
        Ok(self.fleet)
    }

    /// Write the prompt and read one line; `None` at end of input
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let trimmed = line.trim_end_matches(['\r', '\n']).to_string();
        Ok(Some(trimmed))
    }

    fn print_report(&mut self) -> Result<Flow> {
        writeln!(self.output, "\nFleet report:")?;
        for line in self.fleet.report() {
            writeln!(self.output, "    {}", line)?;
        }
        writeln!(self.output)?;
        Ok(Flow::Continue)
    }

    fn add_boat(&mut self) -> Result<Flow> {
        let Some(line) = self.prompt(ADD_PROMPT)? else {
            return Ok(Flow::Stop);
        };
        writeln!(self.output)?;

        match parser::parse_boat_line(&line) {
            Ok(boat) => {
                debug!(name = %boat.name, "boat added");
                self.fleet.push(boat);
            }
            Err(e) => {
                debug!(error = %e, "add rejected");
                writeln!(self.output, "Invalid data format.")?;
            }
        }
        Ok(Flow::Continue)
    }

    fn remove_boat(&mut self) -> Result<Flow> {
        let Some(name) = self.prompt(REMOVE_PROMPT)? else {
            return Ok(Flow::Stop);
        };
        let name = name.trim();

        match self.fleet.remove_boat(name) {
            Ok(boat) => debug!(name = %boat.name, "boat removed"),
            Err(e) => writeln!(self.output, "{}", e)?,
        }
        writeln!(self.output)?;
        Ok(Flow::Continue)
    }

    fn record_expense(&mut self) -> Result<Flow> {
        let Some(name) = self.prompt(SPEND_NAME_PROMPT)? else {
            return Ok(Flow::Stop);
        };
        let name = name.trim().to_string();

        if self.fleet.find(&name).is_none() {
            let missing = FleetError::NotFound { name };
            writeln!(self.output, "{}", missing)?;
            writeln!(self.output)?;
            return Ok(Flow::Continue);
        }

        let Some(amount) = self.prompt(SPEND_AMOUNT_PROMPT)? else {
            return Ok(Flow::Stop);
        };

        match self.fleet.record_expense_str(&name, &amount) {
            Ok(total) => writeln!(self.output, "Expense authorized, ${:.2} spent.", total)?,
            Err(FleetError::InvalidInput(reason)) => {
                debug!(%reason, "expense rejected");
                writeln!(self.output, "Invalid amount.")?;
            }
            Err(e) => writeln!(self.output, "{}", e)?,
        }
        writeln!(self.output)?;
        Ok(Flow::Continue)
    }

    fn exit(&mut self) -> Result<()> {
        // failures are already reported on the output
        let _ = gateway::save_or_report(&self.snapshot, &self.fleet, &mut self.output);
        writeln!(self.output, "\nExiting the Fleet Management System")?;
        Ok(())
    }
}
