use std::collections::BTreeMap;

use crate::{
    effects::typewriter::TypewriterState,
    foundation::core::{FrameIndex, ObjectId},
    foundation::error::CaptionResult,
    host::scene_host::SceneHost,
};

/// Per-object frame tasks driven by the host's frame-change notification.
///
/// One task per text object; registering a second reveal for the same object replaces the
/// first. A task drops itself, and releases its host callback, after applying the first frame
/// past its window.
#[derive(Clone, Debug, Default)]
pub struct FrameTaskRegistry {
    tasks: BTreeMap<ObjectId, TypewriterState>,
}

impl FrameTaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `state` and ask the host for frame notifications on its object.
    pub fn register(
        &mut self,
        state: TypewriterState,
        host: &mut dyn SceneHost,
    ) -> CaptionResult<()> {
        host.register_frame_callback(state.target)?;
        if self.tasks.insert(state.target, state).is_some() {
            tracing::debug!("replaced an existing typewriter task");
        }
        Ok(())
    }

    /// Apply every task at `frame`; returns how many tasks ran.
    pub fn on_frame(&mut self, frame: FrameIndex, host: &mut dyn SceneHost) -> CaptionResult<usize> {
        let mut finished = Vec::new();
        for (id, task) in &self.tasks {
            host.set_text_body(*id, task.visible_at(frame))?;
            if task.is_finished(frame) {
                finished.push(*id);
            }
        }
        let ran = self.tasks.len();
        for id in finished {
            self.tasks.remove(&id);
            host.unregister_frame_callback(id)?;
            tracing::debug!(object = %id, frame = frame.0, "typewriter task finished");
        }
        Ok(ran)
    }

    pub fn get(&self, target: ObjectId) -> Option<&TypewriterState> {
        self.tasks.get(&target)
    }

    pub fn targets(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.tasks.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assembly/tasks.rs"]
mod tests;
