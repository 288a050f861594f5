//! Test utilities for narrative tests.
//!
//! This module provides a scripted driver and a sample agenda.

pub mod mock_tour;

#[allow(unused_imports)]
pub use mock_tour::{MockReply, MockTourDriver};

/// Agenda with a route line, a preamble and three stops.
#[allow(dead_code)]
pub const SAMPLE_AGENDA: &str = "Here is your audio tour agenda!\n\
Primary Route: I-81 South\n\
1. **Blacksburg**\n\
Summary: Founded as a frontier town in 1798.\n\
Script Writer Directive: cover the founding families.\n\
2. **Christiansburg**\n\
Summary: Huckleberry Trail follows an old rail bed.\n\
Script Writer Directive: describe the railroad's passing.\n\
3. **Roanoke**\n\
Summary: Railroad hub.\n\
Script Writer Directive: cover rail history.\n\
\n\
Enjoy the drive!";

/// Director payload approving a draft.
#[allow(dead_code)]
pub fn approve() -> MockReply {
    MockReply::Text(r#"{"is_ready": true, "feedback": "Ready for recording."}"#.to_string())
}

/// Director payload rejecting a draft.
#[allow(dead_code)]
pub fn reject(feedback: &str) -> MockReply {
    MockReply::Text(format!(r#"{{"is_ready": false, "feedback": "{}"}}"#, feedback))
}
