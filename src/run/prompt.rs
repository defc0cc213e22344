//! Interactive input: ask, validate, and ask again until the answer is valid.

use anyhow::{bail, Result};
use log::warn;
use std::io::{BufRead, Write};

use crate::error::FinanceError;
use crate::models::{Category, CategoryRequest, User};
use crate::store::Store;
use crate::validate::{parse_id, resolve_user, validate_amount, validate_date, validate_name};

pub(crate) struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub(crate) fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `label`, read one line. End of input aborts the operation.
    fn read_line(&mut self, label: &str) -> Result<String> {
        write!(self.output, "{label}: ")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            bail!("No input for '{label}', cancelled");
        }
        Ok(line.trim().to_string())
    }

    /// Ask until `parse` accepts the answer. Validation errors are shown and
    /// re-asked; store failures end the loop.
    pub(crate) fn ask<T>(
        &mut self,
        label: &str,
        mut parse: impl FnMut(&str) -> crate::error::Result<T>,
    ) -> Result<T> {
        loop {
            let line = self.read_line(label)?;
            match parse(&line) {
                Ok(value) => return Ok(value),
                Err(err) if err.is_validation() => {
                    warn!("rejected {label} '{line}': {err}");
                    writeln!(self.output, "{err}. Try again.")?;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    pub(crate) fn ask_user(&mut self, store: &impl Store) -> Result<User> {
        if store.get_users()?.is_empty() {
            bail!("No users found. Add one first with `fintrack user add`");
        }
        self.ask("User ID", |raw| resolve_user(store, parse_id(raw)?))
    }

    /// Returns the answer as typed once it validates as a positive amount.
    pub(crate) fn ask_amount(&mut self) -> Result<String> {
        self.ask("Amount", |raw| validate_amount(raw).map(|_| raw.to_string()))
    }

    /// Returns the answer as typed once it validates as a `YYYY-MM-DD` date.
    pub(crate) fn ask_date(&mut self) -> Result<String> {
        self.ask("Date (YYYY-MM-DD)", |raw| {
            validate_date(raw).map(|_| raw.to_string())
        })
    }

    pub(crate) fn ask_text(&mut self, label: &str) -> Result<String> {
        self.read_line(label)
    }

    /// A number picks an existing category; anything else names one, matched
    /// case-insensitively against the existing names. Nothing is created here.
    pub(crate) fn ask_category(&mut self, store: &impl Store) -> Result<CategoryRequest> {
        let categories = store.get_categories()?;
        if categories.is_empty() {
            writeln!(self.output, "No categories yet; enter a name to create one.")?;
        } else {
            writeln!(self.output, "Available categories:")?;
            for c in &categories {
                writeln!(self.output, "  {:>4}  {}", c.id, c.name)?;
            }
        }
        self.ask("Category ID or new name", |raw| {
            if let Ok(id) = raw.parse::<i64>() {
                return Category::find_by_id(&categories, id)
                    .map(|c| CategoryRequest::UseExisting(c.id))
                    .ok_or(FinanceError::UnknownCategory(id));
            }
            let name = validate_name("Category name", raw)?;
            Ok(match Category::find_by_name(&categories, &name) {
                Some(existing) => CategoryRequest::UseExisting(existing.id),
                None => CategoryRequest::CreateNew(name),
            })
        })
    }
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;
