//! Scripted layout scenarios.
//!
//! A scenario is a JSONC document listing layout commands. Each step runs
//! against a fresh [`MemoryLayout`] through [`StickyWindows`], so the
//! deletion guards and the reconciler react exactly as they would inside a
//! real host.
//!
//! ```jsonc
//! {
//!   "frame": { "width": 160, "height": 48 },
//!   "steps": [
//!     { "action": "enable" },
//!     { "action": "stick", "content": "*compilation*", "side": "bottom", "size": 0.3 },
//!     { "action": "resizeFrame", "width": 120, "height": 40 },
//!     { "action": "delete", "region": 1 }   // refused: last unpinned region
//!   ]
//! }
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::layout::{MemoryLayout, RegionSnapshot};
use crate::config::StickyWindowsConfig;
use crate::sticky::{
    CollapsePlan, HostError, LayoutHost, MessageLevel, ReconcileReport, RegionId, RemoveOutcome,
    Side, StickyResult, StickyWindows,
};

// ============================================================================
// Script Types
// ============================================================================

/// Frame dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FrameSize {
    /// Width in columns.
    pub width: u32,
    /// Height in lines.
    pub height: u32,
}

/// A scripted sequence of layout commands.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Scenario {
    /// Frame size. Defaults to the simulator configuration.
    #[serde(default)]
    pub frame: Option<FrameSize>,

    /// Whether the sticky subsystem starts enabled.
    /// Defaults to `sticky.enabled` from the configuration.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Commands to run, in order.
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One layout command.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Step {
    /// Enable the sticky subsystem.
    Enable,
    /// Disable the sticky subsystem.
    Disable,
    /// Flip the enabled state.
    Toggle,
    /// Create a sticky region.
    Stick {
        /// Content to display.
        content: String,
        /// Frame side to anchor to.
        side: Side,
        /// Ratio (< 1) or absolute size; defaults to `sticky.defaultSize`.
        #[serde(default)]
        size: Option<f64>,
    },
    /// Turn a sticky region back into a regular one.
    Unstick {
        /// Region to release.
        region: RegionId,
    },
    /// Change the configured size of a sticky region.
    ResizeStickyTo {
        /// Sticky region.
        region: RegionId,
        /// New ratio or absolute size.
        size: f64,
    },
    /// Split a body region (the selected one by default).
    Split {
        /// Region to split.
        #[serde(default)]
        region: Option<RegionId>,
    },
    /// Select a region.
    Select {
        /// Region to select.
        region: RegionId,
    },
    /// Resize the frame.
    ResizeFrame {
        /// New width.
        width: u32,
        /// New height.
        height: u32,
    },
    /// Delete every region except the selected and protected ones.
    DeleteOthers,
    /// Delete one region (the selected one by default).
    Delete {
        /// Region to delete.
        #[serde(default)]
        region: Option<RegionId>,
    },
    /// Display other content in a region.
    Show {
        /// Target region.
        region: RegionId,
        /// Content to display.
        content: String,
    },
    /// Run a reconciliation pass by hand.
    Reconcile,
}

impl Step {
    /// Returns the action name as written in scripts.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Enable => "enable",
            Self::Disable => "disable",
            Self::Toggle => "toggle",
            Self::Stick { .. } => "stick",
            Self::Unstick { .. } => "unstick",
            Self::ResizeStickyTo { .. } => "resizeStickyTo",
            Self::Split { .. } => "split",
            Self::Select { .. } => "select",
            Self::ResizeFrame { .. } => "resizeFrame",
            Self::DeleteOthers => "deleteOthers",
            Self::Delete { .. } => "delete",
            Self::Show { .. } => "show",
            Self::Reconcile => "reconcile",
        }
    }
}

// ============================================================================
// Report Types
// ============================================================================

/// How a step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// The command ran.
    Ok,
    /// The command was vetoed by a guard.
    Refused,
    /// The command failed.
    Failed,
}

/// A message shown by the host during a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageRecord {
    /// Severity.
    pub level: MessageLevel,
    /// Message text.
    pub text: String,
}

/// Result of one step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    /// Position of the step in the script, starting at 1.
    pub index: usize,
    /// Action name.
    pub action: &'static str,
    /// Outcome.
    pub status: StepStatus,
    /// Human-readable description of what happened.
    pub detail: String,
    /// Messages shown while the step ran.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<MessageRecord>,
}

/// Result of a whole scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioReport {
    /// Final frame size.
    pub frame: FrameSize,
    /// Whether the sticky subsystem ended enabled.
    pub enabled: bool,
    /// Per-step results.
    pub steps: Vec<StepRecord>,
    /// Final regions in enumeration order.
    pub regions: Vec<RegionSnapshot>,
}

impl ScenarioReport {
    /// Returns the steps that failed.
    pub fn failures(&self) -> impl Iterator<Item = &StepRecord> + '_ {
        self.steps.iter().filter(|s| s.status == StepStatus::Failed)
    }

    /// Returns `true` if no step failed.
    #[must_use]
    pub fn is_success(&self) -> bool { self.failures().next().is_none() }

    /// Returns every message shown during the run.
    pub fn messages(&self) -> impl Iterator<Item = &MessageRecord> + '_ {
        self.steps.iter().flat_map(|s| s.messages.iter())
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Errors that can occur when loading a scenario script.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// The script could not be read.
    #[error("Failed to read scenario {}: {source}", path.display())]
    Io {
        /// Script path (`-` for stdin).
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The script is not a valid scenario.
    #[error("Failed to parse scenario: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parses a scenario from JSONC text.
///
/// # Errors
///
/// Returns [`ScenarioError::Parse`] for invalid JSON or unknown actions.
pub fn parse_scenario(text: &str) -> Result<Scenario, ScenarioError> {
    let reader = json_comments::StripComments::new(text.as_bytes());
    Ok(serde_json::from_reader(reader)?)
}

/// Loads a scenario from a file, or from stdin when `path` is `-`.
///
/// # Errors
///
/// Returns [`ScenarioError::Io`] if the script cannot be read and
/// [`ScenarioError::Parse`] if it is invalid.
pub fn load_scenario(path: &Path) -> Result<Scenario, ScenarioError> {
    let io_error = |source| ScenarioError::Io {
        path: path.to_path_buf(),
        source,
    };

    let text = if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text).map_err(io_error)?;
        text
    } else {
        std::fs::read_to_string(path).map_err(io_error)?
    };

    parse_scenario(&text)
}

// ============================================================================
// Running
// ============================================================================

/// Runs a scenario against a fresh in-memory layout.
///
/// Steps never abort the run; failures are recorded and the next step
/// runs. `on_step` is called after every step with its record and the
/// layout as it stands.
pub fn run_scenario<F>(
    scenario: &Scenario,
    config: &StickyWindowsConfig,
    mut on_step: F,
) -> ScenarioReport
where
    F: FnMut(&StepRecord, &MemoryLayout),
{
    let layout = match scenario.frame {
        Some(frame) => MemoryLayout::with_minimums(
            frame.width,
            frame.height,
            config.simulator.min_width,
            config.simulator.min_height,
        ),
        None => MemoryLayout::from_config(&config.simulator),
    };

    let mut sticky = StickyWindows::with_config(layout, config.sticky.clone());
    sticky.set_enabled(scenario.enabled.unwrap_or(config.sticky.enabled));
    let _ = sticky.host_mut().take_messages();

    let mut steps = Vec::with_capacity(scenario.steps.len());
    for (offset, step) in scenario.steps.iter().enumerate() {
        let (status, detail) = match apply_step(&mut sticky, step) {
            Ok((status, detail)) => (status, detail),
            Err(err) => {
                if err.is_caller_error() {
                    tracing::debug!(region = ?err.region(), error = %err, "sim: step rejected");
                } else {
                    tracing::warn!(region = ?err.region(), error = %err, "sim: step failed");
                }
                (StepStatus::Failed, err.to_string())
            }
        };

        let messages = sticky
            .host_mut()
            .take_messages()
            .into_iter()
            .map(|(level, text)| MessageRecord { level, text })
            .collect();

        let record = StepRecord {
            index: offset + 1,
            action: step.name(),
            status,
            detail,
            messages,
        };
        tracing::debug!(index = record.index, action = record.action, status = ?record.status, "sim: step done");
        on_step(&record, sticky.host());
        steps.push(record);
    }

    let host = sticky.host();
    ScenarioReport {
        frame: FrameSize {
            width: host.frame_size(crate::sticky::Axis::Width),
            height: host.frame_size(crate::sticky::Axis::Height),
        },
        enabled: sticky.is_enabled(),
        steps,
        regions: host.snapshot(),
    }
}

fn apply_step(
    sticky: &mut StickyWindows<MemoryLayout>,
    step: &Step,
) -> StickyResult<(StepStatus, String)> {
    let ok = |detail: String| Ok((StepStatus::Ok, detail));

    match step {
        Step::Enable => ok(toggle_detail(sticky.set_enabled(true), "enabled")),
        Step::Disable => ok(toggle_detail(sticky.set_enabled(false), "disabled")),
        Step::Toggle => {
            sticky.toggle();
            ok(if sticky.is_enabled() { "enabled" } else { "disabled" }.to_string())
        }
        Step::Stick { content, side, size } => {
            let region = sticky.create_sticky(content.clone(), *side, *size)?;
            ok(format!("created sticky region {region} at {side}"))
        }
        Step::Unstick { region } => {
            sticky.unstick(*region)?;
            ok(format!("region {region} is no longer sticky"))
        }
        Step::ResizeStickyTo { region, size } => {
            let report = sticky.set_sticky_size(*region, *size)?;
            ok(format!("size of {region} set to {size}; {}", describe_report(&report)))
        }
        Step::Split { region } => {
            let target = region
                .or_else(|| sticky.host().selected_region())
                .ok_or_else(|| HostError::unsupported("no region to split"))?;
            let created = sticky.host_mut().split_region(target)?;
            let report = sticky.handle_layout_change();
            ok(format!("split {target}, created {created}{}", settle_suffix(report.as_ref())))
        }
        Step::Select { region } => {
            sticky.host_mut().select_region(*region)?;
            ok(format!("selected {region}"))
        }
        Step::ResizeFrame { width, height } => {
            sticky.host_mut().resize_frame(*width, *height);
            let report = sticky.handle_layout_change();
            ok(format!("frame resized to {width}x{height}{}", settle_suffix(report.as_ref())))
        }
        Step::DeleteOthers => match sticky.delete_other_regions()? {
            CollapsePlan::Redirect(target) => {
                ok(format!("selection moved to {target}, other regions deleted"))
            }
            CollapsePlan::Proceed => ok("other regions deleted".to_string()),
        },
        Step::Delete { region } => match sticky.delete_region(*region)? {
            RemoveOutcome::Removed(id) => ok(format!("deleted {id}")),
            RemoveOutcome::Refused(id) => {
                Ok((StepStatus::Refused, format!("refused to delete {id}")))
            }
        },
        Step::Show { region, content } => {
            sticky.host_mut().show_content(*region, content.clone())?;
            ok(format!("{region} now shows {content}"))
        }
        Step::Reconcile => ok(describe_report(&sticky.reconcile())),
    }
}

fn toggle_detail(changed: bool, state: &str) -> String {
    if changed { state.to_string() } else { format!("already {state}") }
}

fn settle_suffix(report: Option<&ReconcileReport>) -> String {
    report.map_or_else(String::new, |report| format!("; {}", describe_report(report)))
}

fn describe_report(report: &ReconcileReport) -> String {
    let resized = report.resized().count();
    let failed = report.failures().count();
    match (resized, failed) {
        (0, 0) => "sticky sizes unchanged".to_string(),
        (resized, 0) => format!("{resized} sticky region(s) restored"),
        (resized, failed) => {
            format!("{resized} sticky region(s) restored, {failed} could not be resized")
        }
    }
}
