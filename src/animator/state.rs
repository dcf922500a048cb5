use serde::Serialize;
use std::sync::Arc;

use crate::shared::Coordinate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum AnimationState {
    #[default]
    Idle,
    Running,
    Finished,
}

/// What the rendering layer needs from the animation at one instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frame {
    pub state: AnimationState,
    pub index: usize,
    pub position: Option<Coordinate>,
}

/// A marker walking a path one point per tick.
///
/// While running, `index` is always a valid index into `path`. When the
/// path is exhausted the animation finishes and the marker stays on the
/// last point.
#[derive(Debug, Clone, Default)]
pub struct Animation {
    path: Arc<[Coordinate]>,
    index: usize,
    state: AnimationState,
}

impl Animation {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_running(&self) -> bool {
        self.state == AnimationState::Running
    }

    /// Idle has no marker; Finished keeps the last point.
    pub fn position(&self) -> Option<Coordinate> {
        match self.state {
            AnimationState::Idle => None,
            AnimationState::Running | AnimationState::Finished => self.path.get(self.index).copied(),
        }
    }

    pub fn frame(&self) -> Frame {
        Frame {
            state: self.state,
            index: self.index,
            position: self.position(),
        }
    }

    pub fn start(&mut self, path: Arc<[Coordinate]>) -> AnimationState {
        self.start_at(path, 0)
    }

    /// Starts at `index`, clamped to the last point.
    /// An empty path finishes immediately.
    pub fn start_at(&mut self, path: Arc<[Coordinate]>, index: usize) -> AnimationState {
        self.path = path;
        if self.path.is_empty() {
            self.index = 0;
            self.state = AnimationState::Finished;
        } else {
            self.index = index.min(self.path.len() - 1);
            self.state = AnimationState::Running;
        }
        self.state
    }

    /// Advances one point. Returns the new position, None once finished
    /// or when not running.
    pub fn tick(&mut self) -> Option<Coordinate> {
        if !self.is_running() {
            return None;
        }
        if self.index + 1 < self.path.len() {
            self.index += 1;
            self.path.get(self.index).copied()
        } else {
            self.state = AnimationState::Finished;
            None
        }
    }

    pub fn stop(&mut self) {
        self.path = Arc::from([]);
        self.index = 0;
        self.state = AnimationState::Idle;
    }
}
