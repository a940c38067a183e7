//! Structural edits used by the editing layer.
//!
//! Edits work on owned values (`Clone` is the deep copy); nothing here goes through
//! serialization. Callers push a history snapshot before invoking any of them.

use std::collections::BTreeSet;

use crate::{
    foundation::error::{CourtError, CourtResult},
    scenegraph::model::{Play, Scene, TimingGroup},
};

fn unique_id(base: &str, taken: &BTreeSet<String>) -> String {
    let first = format!("{base}-copy");
    if !taken.contains(&first) {
        return first;
    }
    (2u32..)
        .map(|n| format!("{base}-copy-{n}"))
        .find(|id| !taken.contains(id))
        .unwrap_or(first)
}

impl Play {
    fn annotation_ids(&self) -> BTreeSet<String> {
        self.scenes
            .iter()
            .flat_map(|s| s.timing_groups.iter())
            .flat_map(|g| g.annotations.iter())
            .map(|a| a.id.clone())
            .collect()
    }

    fn renumber_scenes(&mut self) {
        for (i, scene) in self.scenes.iter_mut().enumerate() {
            scene.order = i as u32;
        }
    }

    /// Copy the scene at playback index `index` and insert the copy right after it.
    ///
    /// The copy gets a fresh scene id and fresh annotation ids. Returns the new scene id.
    pub fn duplicate_scene(&mut self, index: usize) -> CourtResult<String> {
        self.scenes.sort_by_key(|s| s.order);
        let source = self.scenes.get(index).ok_or_else(|| {
            CourtError::validation(format!("no scene at index {index} to duplicate"))
        })?;

        let scene_ids: BTreeSet<String> = self.scenes.iter().map(|s| s.id.clone()).collect();
        let mut annotation_ids = self.annotation_ids();

        let mut copy = source.clone();
        copy.id = unique_id(&source.id, &scene_ids);
        for annotation in copy
            .timing_groups
            .iter_mut()
            .flat_map(|g| g.annotations.iter_mut())
        {
            let fresh = unique_id(&annotation.id, &annotation_ids);
            annotation_ids.insert(fresh.clone());
            annotation.id = fresh;
        }

        let new_id = copy.id.clone();
        self.scenes.insert(index + 1, copy);
        self.renumber_scenes();
        Ok(new_id)
    }

    /// Remove the scene at playback index `index`. The last remaining scene is never removed.
    pub fn remove_scene(&mut self, index: usize) -> CourtResult<Scene> {
        if self.scenes.len() <= 1 {
            return Err(CourtError::validation(
                "a play must keep at least one scene",
            ));
        }
        self.scenes.sort_by_key(|s| s.order);
        if index >= self.scenes.len() {
            return Err(CourtError::validation(format!(
                "no scene at index {index} to remove"
            )));
        }
        let removed = self.scenes.remove(index);
        self.renumber_scenes();
        Ok(removed)
    }
}

impl Scene {
    /// Append an empty step after the current last one. Returns its step number.
    pub fn add_step(&mut self, duration_ms: f64) -> u32 {
        let step = self
            .timing_groups
            .iter()
            .map(|g| g.step)
            .max()
            .unwrap_or(0)
            + 1;
        self.timing_groups.push(TimingGroup::new(step, duration_ms));
        step
    }

    /// Remove a step and renumber the remaining ones. Step 1 is never removed.
    pub fn remove_step(&mut self, step: u32) -> CourtResult<TimingGroup> {
        if step == 1 {
            return Err(CourtError::validation("step 1 cannot be removed"));
        }
        let idx = self
            .timing_groups
            .iter()
            .position(|g| g.step == step)
            .ok_or_else(|| {
                CourtError::validation(format!("scene '{}' has no step {step}", self.id))
            })?;
        let removed = self.timing_groups.remove(idx);
        self.normalize_steps();
        Ok(removed)
    }

    /// Move an annotation into another step of the same scene.
    pub fn move_annotation(&mut self, annotation_id: &str, to_step: u32) -> CourtResult<()> {
        if self.group(to_step).is_none() {
            return Err(CourtError::validation(format!(
                "scene '{}' has no step {to_step}",
                self.id
            )));
        }
        let annotation = self
            .timing_groups
            .iter_mut()
            .find_map(|g| {
                let pos = g.annotations.iter().position(|a| a.id == annotation_id)?;
                Some(g.annotations.remove(pos))
            })
            .ok_or_else(|| {
                CourtError::validation(format!(
                    "scene '{}' has no annotation '{annotation_id}'",
                    self.id
                ))
            })?;
        if let Some(target) = self.timing_groups.iter_mut().find(|g| g.step == to_step) {
            target.annotations.push(annotation);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scenegraph/edit.rs"]
mod tests;
