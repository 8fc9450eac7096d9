//! In-memory layout simulation.
//!
//! [`MemoryLayout`] is a complete [`LayoutHost`](crate::sticky::LayoutHost)
//! over a flat list of leaf regions. It backs the test suite and the
//! `sticky run` command, which replays scripted [`Scenario`]s against it.

pub mod layout;
pub mod scenario;

pub use layout::{MemoryLayout, RegionSnapshot};
pub use scenario::{
    MessageRecord, Scenario, ScenarioError, ScenarioReport, Step, StepRecord, StepStatus,
    load_scenario, parse_scenario, run_scenario,
};
