//! Voice command recognition to board actions
//!
//! Recognized text runs through an ordered substring rule table; the first
//! match wins and drives the surface (tools, colors, sizes, backgrounds,
//! the continuous drawing walk, clears).

mod dispatcher;
mod rules;

pub use dispatcher::CommandDispatcher;
pub use rules::{CommandAction, CommandRule, NOT_RECOGNIZED, RULES, match_rule};
