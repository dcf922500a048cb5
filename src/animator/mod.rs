mod state;
pub use state::*;

use std::{sync::Arc, time::Duration};
use tokio::{
    sync::{mpsc, watch},
    time::{self, Instant, Interval, MissedTickBehavior},
};
use tracing::{debug, warn};

use crate::shared::Coordinate;

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Debug)]
enum Command {
    Start {
        path: Arc<[Coordinate]>,
        index: usize,
    },
    Stop,
}

/// Drives an [`Animation`] on a fixed interval.
///
/// One background task owns both the animation and its only timer; `start`
/// and `stop` are messages to that task. A restart replaces the timer
/// before the new path is armed, so two timers never run at once.
/// Dropping the handle ends the task.
#[derive(Debug)]
pub struct VehicleAnimator {
    commands: mpsc::UnboundedSender<Command>,
    frames: watch::Receiver<Frame>,
}

impl VehicleAnimator {
    /// Spawns the animation task on the current tokio runtime.
    pub fn spawn(interval: Duration) -> Self {
        let (commands, receiver) = mpsc::unbounded_channel();
        let (sender, frames) = watch::channel(Frame::default());
        tokio::spawn(run(receiver, sender, interval));
        Self { commands, frames }
    }

    pub fn start(&self, path: Arc<[Coordinate]>) {
        self.start_at(path, 0);
    }

    pub fn start_at(&self, path: Arc<[Coordinate]>, index: usize) {
        self.send(Command::Start { path, index });
    }

    pub fn stop(&self) {
        self.send(Command::Stop);
    }

    pub fn frame(&self) -> Frame {
        self.frames.borrow().clone()
    }

    pub fn position(&self) -> Option<Coordinate> {
        self.frames.borrow().position
    }

    pub fn state(&self) -> AnimationState {
        self.frames.borrow().state
    }

    /// Notified on every start, stop and tick.
    pub fn subscribe(&self) -> watch::Receiver<Frame> {
        self.frames.clone()
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            warn!("Animation task has stopped, command dropped");
        }
    }
}

async fn run(
    mut commands: mpsc::UnboundedReceiver<Command>,
    frames: watch::Sender<Frame>,
    period: Duration,
) {
    let mut animation = Animation::new();
    let mut timer: Option<Interval> = None;
    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else {
                    break;
                };
                timer = None;
                match command {
                    Command::Start { path, index } => {
                        debug!("Starting animation over {} points", path.len());
                        if animation.start_at(path, index) == AnimationState::Running {
                            let mut interval = time::interval_at(Instant::now() + period, period);
                            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                            timer = Some(interval);
                        }
                    }
                    Command::Stop => animation.stop(),
                }
            }
            _ = next_tick(&mut timer) => {
                animation.tick();
                if !animation.is_running() {
                    debug!("Animation finished");
                    timer = None;
                }
            }
        }
        frames.send_replace(animation.frame());
    }
    debug!("Animation task ended");
}

async fn next_tick(timer: &mut Option<Interval>) {
    match timer {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
