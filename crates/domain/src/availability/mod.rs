mod config;
mod engine;
mod rules;

pub use config::{clamp_window, SLOT_GRID_MINUTES};
pub use engine::AvailabilityEngine;
pub use rules::{AvailabilityRules, DayRule, RuleInterval};
