//! Category filtering and selection strategies.

use std::collections::BTreeSet;

use tracing::warn;

use crate::error::YearCalResult;

/// The set of categories accepted for one rendering run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    categories: BTreeSet<String>,
}

impl CategoryFilter {
    pub fn new<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CategoryFilter {
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }

    pub fn accepts(&self, category: &str) -> bool {
        self.categories.contains(category)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for CategoryFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        CategoryFilter::new(iter)
    }
}

/// Decides which of the discovered categories end up in the calendar.
pub trait CategorySelector {
    fn select(&mut self, candidates: &[String]) -> YearCalResult<CategoryFilter>;
}

/// Accepts every discovered category.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAll;

impl CategorySelector for AcceptAll {
    fn select(&mut self, candidates: &[String]) -> YearCalResult<CategoryFilter> {
        Ok(candidates.iter().cloned().collect())
    }
}

/// A fixed list of categories, e.g. from the command line or config file.
#[derive(Debug, Clone)]
pub struct Preset {
    categories: Vec<String>,
}

impl Preset {
    pub fn new(categories: Vec<String>) -> Self {
        Preset { categories }
    }
}

impl CategorySelector for Preset {
    fn select(&mut self, candidates: &[String]) -> YearCalResult<CategoryFilter> {
        for category in &self.categories {
            if !candidates.contains(category) {
                warn!(category = %category, "Selected category has no events");
            }
        }
        Ok(self.categories.iter().cloned().collect())
    }
}
