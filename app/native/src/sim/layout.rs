//! In-memory layout host.
//!
//! A flat list of leaf regions inside a rectangular frame:
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ top docks (full frame width)         │
//! ├──────┬────────────┬───────────┬──────┤
//! │ left │ body       │ body      │ right│
//! │ docks│ region     │ region    │ docks│
//! ├──────┴────────────┴───────────┴──────┤
//! │ bottom docks (full frame width)      │
//! └──────────────────────────────────────┘
//! ```
//!
//! Docked regions keep an explicit extent along their side's axis. Body
//! regions share whatever width is left evenly and take all remaining
//! height. Every region must stay at or above the minimum width and height.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::config::SimulatorConfig;
use crate::sticky::{
    Axis, Hook, HostError, HostResult, LayoutHost, MessageLevel, ParamKey, ParamValue, RegionId,
    Side,
};

/// Content shown in the initial region.
pub const INITIAL_CONTENT: &str = "*scratch*";

/// Default minimum region width in columns.
pub const DEFAULT_MIN_WIDTH: u32 = 10;

/// Default minimum region height in lines.
pub const DEFAULT_MIN_HEIGHT: u32 = 4;

// ============================================================================
// Region Slot
// ============================================================================

/// A leaf region tracked by [`MemoryLayout`].
#[derive(Debug, Clone)]
struct Slot {
    id: RegionId,
    content: String,
    dock: Option<Side>,
    extent: u32,
    params: BTreeMap<ParamKey, ParamValue>,
}

impl Slot {
    fn flag(&self, key: ParamKey) -> bool {
        self.params.get(&key).and_then(|v| v.as_bool()).unwrap_or(false)
    }
}

/// Serializable view of one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSnapshot {
    /// Region handle.
    pub id: RegionId,
    /// Displayed content.
    pub content: String,
    /// Frame side the region is docked to, if any.
    pub dock: Option<Side>,
    /// Width in columns.
    pub width: u32,
    /// Height in lines.
    pub height: u32,
    /// Whether the region is selected.
    pub selected: bool,
    /// Whether the sticky flag is set.
    pub sticky: bool,
    /// Stored sticky size, if any.
    pub sticky_size: Option<f64>,
    /// Whether the region is excluded from "delete other regions".
    pub no_delete_others: bool,
    /// Whether the region is dedicated to its content.
    pub dedicated: bool,
}

// ============================================================================
// Memory Layout
// ============================================================================

/// Reference [`LayoutHost`] keeping the whole layout in memory.
#[derive(Debug, Clone)]
pub struct MemoryLayout {
    width: u32,
    height: u32,
    min_width: u32,
    min_height: u32,
    slots: Vec<Slot>,
    selected: Option<RegionId>,
    next_id: u32,
    hooks: BTreeSet<Hook>,
    layout_changed: bool,
    messages: Vec<(MessageLevel, String)>,
}

impl MemoryLayout {
    /// Creates a `width` x `height` frame holding a single body region.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_minimums(width, height, DEFAULT_MIN_WIDTH, DEFAULT_MIN_HEIGHT)
    }

    /// Creates a frame from the simulator configuration.
    #[must_use]
    pub fn from_config(config: &SimulatorConfig) -> Self {
        Self::with_minimums(
            config.frame_width,
            config.frame_height,
            config.min_width,
            config.min_height,
        )
    }

    /// Creates a frame with explicit minimum region sizes.
    #[must_use]
    pub fn with_minimums(width: u32, height: u32, min_width: u32, min_height: u32) -> Self {
        let root = Slot {
            id: RegionId(1),
            content: INITIAL_CONTENT.to_string(),
            dock: None,
            extent: 0,
            params: BTreeMap::new(),
        };

        Self {
            width,
            height,
            min_width,
            min_height,
            slots: vec![root],
            selected: Some(RegionId(1)),
            next_id: 2,
            hooks: BTreeSet::new(),
            layout_changed: false,
            messages: Vec::new(),
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    fn slot(&self, region: RegionId) -> Option<&Slot> { self.slots.iter().find(|s| s.id == region) }

    fn slot_mut(&mut self, region: RegionId) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|s| s.id == region)
    }

    const fn frame_along(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Width => self.width,
            Axis::Height => self.height,
        }
    }

    const fn minimum(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Width => self.min_width,
            Axis::Height => self.min_height,
        }
    }

    fn body_count(&self) -> u32 {
        let count = self.slots.iter().filter(|s| s.dock.is_none()).count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Sum of the extents of docks resized along `axis`.
    fn docked_total(&self, axis: Axis) -> u32 {
        self.slots
            .iter()
            .filter(|s| s.dock.is_some_and(|side| side.axis() == axis))
            .map(|s| s.extent)
            .fold(0, u32::saturating_add)
    }

    /// Space that must stay free on `axis` once all docks on that axis are
    /// placed.
    fn reserved(&self, axis: Axis) -> u32 {
        let body = self.body_count();
        match axis {
            Axis::Width => body.saturating_mul(self.min_width),
            Axis::Height => {
                let has_middle = body > 0
                    || self.slots.iter().any(|s| s.dock.is_some_and(|d| d.axis() == Axis::Width));
                if has_middle { self.min_height } else { 0 }
            }
        }
    }

    /// Largest extent a dock on `axis` can take, given the other docks.
    fn available_for(&self, axis: Axis, excluding: Option<RegionId>) -> u32 {
        let others = self
            .slots
            .iter()
            .filter(|s| Some(s.id) != excluding)
            .filter(|s| s.dock.is_some_and(|side| side.axis() == axis))
            .map(|s| s.extent)
            .fold(0, u32::saturating_add);
        self.frame_along(axis).saturating_sub(others).saturating_sub(self.reserved(axis))
    }

    fn body_width(&self) -> u32 { self.width.saturating_sub(self.docked_total(Axis::Width)) }

    fn middle_height(&self) -> u32 { self.height.saturating_sub(self.docked_total(Axis::Height)) }

    fn size_of(&self, slot: &Slot, axis: Axis) -> u32 {
        match (slot.dock, axis) {
            (Some(side), axis) if side.axis() == axis => slot.extent,
            (Some(Side::Top | Side::Bottom), Axis::Width) => self.width,
            (Some(_), _) | (None, Axis::Height) => self.middle_height(),
            (None, Axis::Width) => {
                let count = self.body_count().max(1);
                let index = self
                    .slots
                    .iter()
                    .filter(|s| s.dock.is_none())
                    .position(|s| s.id == slot.id)
                    .and_then(|i| u32::try_from(i).ok())
                    .unwrap_or(0);
                let total = self.body_width();
                total / count + u32::from(index < total % count)
            }
        }
    }

    /// Returns the content shown in a region.
    #[must_use]
    pub fn content(&self, region: RegionId) -> Option<&str> {
        self.slot(region).map(|s| s.content.as_str())
    }

    /// Returns the side a region is docked to.
    #[must_use]
    pub fn dock(&self, region: RegionId) -> Option<Side> { self.slot(region).and_then(|s| s.dock) }

    /// Returns every message shown so far.
    #[must_use]
    pub fn messages(&self) -> &[(MessageLevel, String)] { &self.messages }

    /// Drains the recorded messages.
    pub fn take_messages(&mut self) -> Vec<(MessageLevel, String)> {
        std::mem::take(&mut self.messages)
    }

    /// Returns the number of installed hooks.
    #[must_use]
    pub fn hook_count(&self) -> usize { self.hooks.len() }

    /// Returns a snapshot of every region in enumeration order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<RegionSnapshot> {
        self.slots
            .iter()
            .map(|slot| RegionSnapshot {
                id: slot.id,
                content: slot.content.clone(),
                dock: slot.dock,
                width: self.size_of(slot, Axis::Width),
                height: self.size_of(slot, Axis::Height),
                selected: self.selected == Some(slot.id),
                sticky: slot.flag(ParamKey::Sticky),
                sticky_size: slot.params.get(&ParamKey::StickySize).and_then(|v| v.as_size()),
                no_delete_others: slot.flag(ParamKey::NoDeleteOthers),
                dedicated: slot.flag(ParamKey::Dedicated),
            })
            .collect()
    }

    // ========================================================================
    // Layout Commands
    // ========================================================================

    /// Splits a body region, adding a new body region right after it that
    /// shows the same content.
    ///
    /// # Errors
    ///
    /// Fails for docked or dead regions, or when the body cannot fit one
    /// more region.
    pub fn split_region(&mut self, region: RegionId) -> HostResult<RegionId> {
        let Some(index) = self.slots.iter().position(|s| s.id == region) else {
            return Err(HostError::InvalidRegion(region));
        };
        if self.slots[index].dock.is_some() {
            return Err(HostError::unsupported("docked regions cannot be split"));
        }

        let needed = self.body_count().saturating_add(1).saturating_mul(self.min_width);
        let available = self.body_width();
        if needed > available {
            return Err(HostError::InsufficientSpace {
                axis: Axis::Width,
                requested: needed,
                available,
            });
        }

        let id = self.issue_id();
        let content = self.slots[index].content.clone();
        self.slots.insert(index + 1, Slot {
            id,
            content,
            dock: None,
            extent: 0,
            params: BTreeMap::new(),
        });
        self.layout_changed = true;
        Ok(id)
    }

    /// Replaces the content shown in a region.
    ///
    /// # Errors
    ///
    /// Fails for dead regions and for regions dedicated to their content.
    pub fn show_content(&mut self, region: RegionId, content: impl Into<String>) -> HostResult<()> {
        let slot = self.slot_mut(region).ok_or(HostError::InvalidRegion(region))?;
        if slot.flag(ParamKey::Dedicated) {
            return Err(HostError::Dedicated(region));
        }
        slot.content = content.into();
        Ok(())
    }

    /// Resizes the frame.
    ///
    /// Docked extents are scaled in proportion to the frame change along
    /// their axis and raised to the minimum size, then shrunk where needed
    /// so the docks on each axis fit the new frame.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn resize_frame(&mut self, width: u32, height: u32) {
        let (old_width, old_height) = (self.width, self.height);
        let (min_width, min_height) = (self.min_width, self.min_height);

        for slot in &mut self.slots {
            let Some(side) = slot.dock else { continue };
            let (old, new, min) = match side.axis() {
                Axis::Width => (old_width, width, min_width),
                Axis::Height => (old_height, height, min_height),
            };
            if old == 0 || old == new {
                continue;
            }
            let scaled = (f64::from(slot.extent) * f64::from(new) / f64::from(old)).round();
            slot.extent = (scaled as u32).max(min);
        }

        self.width = width;
        self.height = height;
        self.fit_docks(Axis::Width);
        self.fit_docks(Axis::Height);
        self.layout_changed = true;
        tracing::debug!(width, height, "sim: frame resized");
    }

    /// Caps docks on `axis`, in enumeration order, to the space the frame
    /// has left for them. No dock goes below the minimum.
    fn fit_docks(&mut self, axis: Axis) {
        let minimum = self.minimum(axis);
        let mut remaining = self.frame_along(axis).saturating_sub(self.reserved(axis));
        for slot in &mut self.slots {
            if slot.dock.is_none_or(|side| side.axis() != axis) {
                continue;
            }
            slot.extent = slot.extent.min(remaining.max(minimum));
            remaining = remaining.saturating_sub(slot.extent);
        }
    }

    fn issue_id(&mut self) -> RegionId {
        let id = RegionId(self.next_id);
        self.next_id += 1;
        id
    }

    fn remove_slot(&mut self, region: RegionId) {
        self.slots.retain(|s| s.id != region);
        if self.selected == Some(region) {
            self.selected = self
                .slots
                .iter()
                .find(|s| s.dock.is_none())
                .or_else(|| self.slots.first())
                .map(|s| s.id);
        }
        self.layout_changed = true;
    }
}

impl LayoutHost for MemoryLayout {
    type Content = String;

    fn regions(&self) -> Vec<RegionId> { self.slots.iter().map(|s| s.id).collect() }

    fn is_live(&self, region: RegionId) -> bool { self.slot(region).is_some() }

    fn selected_region(&self) -> Option<RegionId> { self.selected }

    fn select_region(&mut self, region: RegionId) -> HostResult<()> {
        if !self.is_live(region) {
            return Err(HostError::InvalidRegion(region));
        }
        self.selected = Some(region);
        Ok(())
    }

    fn region_param(&self, region: RegionId, key: ParamKey) -> Option<ParamValue> {
        self.slot(region).and_then(|s| s.params.get(&key).copied())
    }

    fn set_region_param(
        &mut self,
        region: RegionId,
        key: ParamKey,
        value: Option<ParamValue>,
    ) -> HostResult<()> {
        let slot = self.slot_mut(region).ok_or(HostError::InvalidRegion(region))?;
        match value {
            Some(value) => {
                slot.params.insert(key, value);
            }
            None => {
                slot.params.remove(&key);
            }
        }
        Ok(())
    }

    fn allocate_region(&mut self, content: String, side: Side, extent: u32) -> HostResult<RegionId> {
        let axis = side.axis();
        let extent = extent.max(self.minimum(axis));
        let available = self.available_for(axis, None);
        if extent > available {
            return Err(HostError::InsufficientSpace {
                axis,
                requested: extent,
                available,
            });
        }

        let id = self.issue_id();
        self.slots.push(Slot {
            id,
            content,
            dock: Some(side),
            extent,
            params: BTreeMap::new(),
        });
        if self.selected.is_none() {
            self.selected = Some(id);
        }
        self.layout_changed = true;
        tracing::debug!(region = %id, %side, extent, "sim: region allocated");
        Ok(id)
    }

    fn frame_size(&self, axis: Axis) -> u32 { self.frame_along(axis) }

    fn region_size(&self, region: RegionId, axis: Axis) -> Option<u32> {
        self.slot(region).map(|slot| self.size_of(slot, axis))
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn resize_region(&mut self, region: RegionId, axis: Axis, delta: i64) -> HostResult<()> {
        let slot = self.slot(region).ok_or(HostError::InvalidRegion(region))?;
        if slot.dock.is_none_or(|side| side.axis() != axis) {
            return Err(HostError::FixedAxis { region, axis });
        }

        let requested =
            i64::from(slot.extent).saturating_add(delta).clamp(0, i64::from(u32::MAX)) as u32;
        let minimum = self.minimum(axis);
        if requested < minimum {
            return Err(HostError::BelowMinimum {
                axis,
                requested,
                minimum,
            });
        }

        let available = self.available_for(axis, Some(region));
        if requested > available {
            return Err(HostError::InsufficientSpace {
                axis,
                requested,
                available,
            });
        }

        if let Some(slot) = self.slot_mut(region) {
            slot.extent = requested;
        }
        self.layout_changed = true;
        Ok(())
    }

    fn delete_other_regions(&mut self) -> HostResult<()> {
        let Some(keep) = self.selected else {
            return Err(HostError::unsupported("no selected region"));
        };

        let before = self.slots.len();
        self.slots.retain(|s| s.id == keep || s.flag(ParamKey::NoDeleteOthers));
        if self.slots.len() != before {
            self.layout_changed = true;
        }
        Ok(())
    }

    fn delete_region(&mut self, region: RegionId) -> HostResult<()> {
        if !self.is_live(region) {
            return Err(HostError::InvalidRegion(region));
        }
        if self.slots.len() == 1 {
            return Err(HostError::SoleRegion(region));
        }
        self.remove_slot(region);
        Ok(())
    }

    fn install_hook(&mut self, hook: Hook) -> bool { self.hooks.insert(hook) }

    fn remove_hook(&mut self, hook: Hook) -> bool { self.hooks.remove(&hook) }

    fn hook_installed(&self, hook: Hook) -> bool { self.hooks.contains(&hook) }

    fn take_layout_change(&mut self) -> bool { std::mem::take(&mut self.layout_changed) }

    fn message(&mut self, level: MessageLevel, text: &str) {
        tracing::info!(?level, "sim: {text}");
        self.messages.push((level, text.to_string()));
    }
}
