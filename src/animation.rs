use crate::map::Gid;
use crate::tileset::TilesetRegistry;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// One animated tile: placing `anchor_local_id` plays `frames` in a loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationEntry {
    /// Local id that triggers the animation when placed.
    pub anchor_local_id: u32,
    /// Local ids shown in order.
    pub frames: Vec<u32>,
}

/// User-authored animations for one tileset, sharing a frame duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationGroup {
    /// Stable identity for update and remove.
    pub id: Uuid,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Tileset the local ids refer to.
    pub tileset_index: usize,
    /// Milliseconds per frame.
    pub frame_duration: u32,
    /// Animated tiles in this group.
    pub entries: Vec<AnimationEntry>,
}

impl AnimationGroup {
    /// An empty group with a fresh id.
    pub fn new(name: impl Into<String>, tileset_index: usize, frame_duration: u32) -> Self {
        AnimationGroup {
            id: Uuid::new_v4(),
            name: name.into(),
            tileset_index,
            frame_duration,
            entries: Vec::new(),
        }
    }

    /// Add one animated tile.
    pub fn with_entry(mut self, anchor_local_id: u32, frames: Vec<u32>) -> Self {
        self.entries.push(AnimationEntry {
            anchor_local_id,
            frames,
        });
        self
    }
}

/// One frame of a compiled schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationFrame {
    /// GID drawn during this frame.
    pub gid: Gid,
    /// Milliseconds.
    pub duration: u32,
}

/// Looping frame list of one anchor GID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSchedule {
    /// Frames in play order.
    pub frames: Vec<AnimationFrame>,
    /// Sum of frame durations in milliseconds.
    pub total_duration: u64,
}

impl FrameSchedule {
    /// Schedule over `frames`, summing their durations.
    pub fn new(frames: Vec<AnimationFrame>) -> Self {
        let total_duration = frames.iter().map(|f| f.duration as u64).sum();
        FrameSchedule {
            frames,
            total_duration,
        }
    }

    /// GID showing at `timestamp_ms`: the first frame whose cumulative
    /// duration exceeds `timestamp_ms % total_duration`.
    pub fn frame_at(&self, timestamp_ms: u64) -> Option<Gid> {
        let first = self.frames.first()?;
        if self.total_duration == 0 {
            return Some(first.gid);
        }
        let elapsed = timestamp_ms % self.total_duration;
        let mut accum = 0u64;
        for frame in &self.frames {
            accum += frame.duration as u64;
            if elapsed < accum {
                return Some(frame.gid);
            }
        }
        Some(first.gid)
    }
}

/// Anchor GID -> frame schedule.
pub type AnimationLookup = HashMap<Gid, FrameSchedule>;

/// Compile groups into a lookup. Groups pointing at a tileset that no longer
/// exists, entries without frames and entries naming a tile outside their
/// tileset are skipped.
pub fn compile_lookup<I>(groups: &[AnimationGroup], tilesets: &TilesetRegistry<I>) -> AnimationLookup {
    let mut lookup = AnimationLookup::new();
    for group in groups {
        let Some(ts) = tilesets.get(group.tileset_index) else {
            debug!(
                "skipping animation group {:?}: tileset {} not loaded",
                group.name, group.tileset_index
            );
            continue;
        };
        for entry in &group.entries {
            if entry.frames.is_empty() {
                continue;
            }
            let in_range = |local: u32| local < ts.tile_count;
            if !in_range(entry.anchor_local_id) || !entry.frames.iter().all(|&f| in_range(f)) {
                debug!(
                    "skipping animation entry {} in group {:?}: tile outside {} ({} tiles)",
                    entry.anchor_local_id, group.name, ts.name, ts.tile_count
                );
                continue;
            }
            let frames = entry
                .frames
                .iter()
                .map(|&local| AnimationFrame {
                    gid: ts.first_gid + local,
                    duration: group.frame_duration,
                })
                .collect();
            lookup.insert(ts.first_gid + entry.anchor_local_id, FrameSchedule::new(frames));
        }
    }
    lookup
}

/// Substitute the current frame for animated GIDs; others pass through.
#[inline]
pub fn animated_gid(lookup: &AnimationLookup, gid: Gid, timestamp_ms: u64) -> Gid {
    lookup
        .get(&gid)
        .and_then(|s| s.frame_at(timestamp_ms))
        .unwrap_or(gid)
}

/// Animation groups plus their compiled lookup.
///
/// Every mutation recompiles the whole lookup; anchors may move between
/// tilesets so nothing is patched in place.
#[derive(Debug, Clone, Default)]
pub struct AnimationLibrary {
    groups: Vec<AnimationGroup>,
    lookup: AnimationLookup,
}

impl AnimationLibrary {
    /// A library with no groups.
    pub fn new() -> Self {
        Self::default()
    }

    /// All groups in insertion order.
    pub fn groups(&self) -> &[AnimationGroup] {
        &self.groups
    }

    /// Group with `id`, if any.
    pub fn group(&self, id: Uuid) -> Option<&AnimationGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Compiled anchor lookup for the renderer.
    pub fn lookup(&self) -> &AnimationLookup {
        &self.lookup
    }

    /// Append a group.
    pub fn add<I>(&mut self, group: AnimationGroup, tilesets: &TilesetRegistry<I>) {
        self.groups.push(group);
        self.rebuild(tilesets);
    }

    /// Replace the group with `id`; returns false if there is none.
    pub fn update<I>(&mut self, id: Uuid, group: AnimationGroup, tilesets: &TilesetRegistry<I>) -> bool {
        let Some(slot) = self.groups.iter_mut().find(|g| g.id == id) else {
            return false;
        };
        *slot = group;
        self.rebuild(tilesets);
        true
    }

    /// Drop the group with `id`; returns false if there is none.
    pub fn remove<I>(&mut self, id: Uuid, tilesets: &TilesetRegistry<I>) -> bool {
        let before = self.groups.len();
        self.groups.retain(|g| g.id != id);
        if self.groups.len() == before {
            return false;
        }
        self.rebuild(tilesets);
        true
    }

    /// Replace every group at once.
    pub fn set_groups<I>(&mut self, groups: Vec<AnimationGroup>, tilesets: &TilesetRegistry<I>) {
        self.groups = groups;
        self.rebuild(tilesets);
    }

    /// Recompile against `tilesets`, e.g. after a reload.
    pub fn rebuild<I>(&mut self, tilesets: &TilesetRegistry<I>) {
        self.lookup = compile_lookup(&self.groups, tilesets);
        debug!(
            "rebuilt animation lookup: {} groups, {} animated tiles",
            self.groups.len(),
            self.lookup.len()
        );
    }
}
