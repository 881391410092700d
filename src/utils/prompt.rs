//! Interactive category selection.

use std::io;

use dialoguer::Confirm;
use owo_colors::OwoColorize;
use yearcal_core::category::{CategoryFilter, CategorySelector};
use yearcal_core::error::{YearCalError, YearCalResult};

/// Asks on the terminal whether to include all categories, and if not,
/// asks about each one.
pub struct InteractiveSelector;

impl CategorySelector for InteractiveSelector {
    fn select(&mut self, candidates: &[String]) -> YearCalResult<CategoryFilter> {
        eprintln!(
            "We found events in these categories: {}",
            candidates.join(", ").bold()
        );

        let chosen: Vec<String> = if confirm("Should we add them all?")? {
            candidates.to_vec()
        } else {
            let mut chosen = Vec::new();
            for category in candidates {
                if confirm(&format!("Add category '{category}'?"))? {
                    chosen.push(category.clone());
                }
            }
            chosen
        };

        eprintln!(
            "{}",
            format!("These categories will be included: {}", chosen.join(", ")).dimmed()
        );

        Ok(chosen.into_iter().collect())
    }
}

/// Yes/no question defaulting to yes.
fn confirm(prompt: &str) -> YearCalResult<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(true)
        .interact()
        .map_err(prompt_error)
}

fn prompt_error(err: dialoguer::Error) -> YearCalError {
    YearCalError::Io(io::Error::other(err))
}
