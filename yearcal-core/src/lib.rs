//! Core types for yearcal.
//!
//! This crate turns event definitions into a printable year calendar:
//! - `source` loads YAML event files into an `EventSet`
//! - `category` decides which event categories are included
//! - `resolve` places events on days of the target year, filling a `YearMap`
//! - `render` lays the `YearMap` out as a LaTeX document

pub mod category;
pub mod config;
pub mod error;
pub mod event;
pub mod month;
pub mod render;
pub mod resolve;
pub mod source;
pub mod year_map;

pub use category::{AcceptAll, CategoryFilter, CategorySelector, Preset};
pub use error::{YearCalError, YearCalResult};
pub use event::{EventDefinition, EventGroup, EventKind};
pub use render::{LatexCalendar, render};
pub use resolve::{ErrorPolicy, Resolver, resolve};
pub use year_map::YearMap;
