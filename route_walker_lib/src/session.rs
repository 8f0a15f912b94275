//! The walk state machine.
//!
//! ```text
//! Idle --start_route--> Active --end_route / media ended--> Finished
//!                       Active --repeat_route--> Active
//!                     Finished --repeat_route--> Active
//!                     Finished --leave--> Idle
//! ```
//!
//! A route is bound whenever the phase is not `Idle`. Everything the UI needs
//! to render comes out of [`SessionLifecycle::drain_events`] or the snapshot
//! getters, which return `None` while no route is bound.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    catalog::RouteCatalog,
    config::WalkConfig,
    coordinate::Coordinate,
    error::SessionError,
    format::{format_distance, format_time},
    motion::MotionSimulator,
    playback::{BindingId, MediaBackend, MediaEvent, MediaSignal, PlaybackController, StartRequest},
    projection,
    route::{Achievement, RouteDescriptor},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Idle,
    Active,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Completion {
    /// The video played to the end.
    Natural,
    /// The user ended the walk.
    Manual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub route_key: String,
    pub route_name: String,
    pub steps: u64,
    pub distance_km: f64,
    pub elapsed_secs: f64,
    pub achievement: Option<Achievement>,
    pub completion: Completion,
    pub final_position: Coordinate,
}

impl SessionSummary {
    pub fn time_text(&self) -> String {
        format_time(self.elapsed_secs)
    }

    pub fn distance_text(&self) -> String {
        format!("{} km", format_distance(self.distance_km))
    }
}

/// What the HUD and the mini-map show.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    pub steps: u64,
    pub distance_km: f64,
    pub elapsed_secs: f64,
    pub progress: f64,
    pub position: Coordinate,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Started { route_key: String, binding: BindingId },
    PlaybackStarted,
    AwaitingGesture,
    Progress(ProgressUpdate),
    Finished(SessionSummary),
    MediaFailed(String),
    Left,
}

pub struct SessionLifecycle<M: MediaBackend> {
    phase: SessionPhase,
    route: Option<Arc<RouteDescriptor>>,
    motion: MotionSimulator,
    playback: PlaybackController<M>,
    summary: Option<SessionSummary>,
    completed: Vec<SessionSummary>,
    events: Vec<SessionEvent>,
}

impl<M: MediaBackend> SessionLifecycle<M> {
    pub fn new(backend: M, config: &WalkConfig) -> Self {
        Self {
            phase: SessionPhase::Idle,
            route: None,
            motion: MotionSimulator::new(config.motion),
            playback: PlaybackController::new(backend, config.playback),
            summary: None,
            completed: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Resets all counters and binds the route's media. Playback waits for
    /// the first speed input.
    pub fn start_route(&mut self, route: Arc<RouteDescriptor>) -> Result<BindingId, SessionError> {
        self.motion.reset();
        self.summary = None;
        self.route = None;
        self.phase = SessionPhase::Idle;

        match self.playback.bind(route.media_source()) {
            Ok(binding) => {
                tracing::info!("Starting route {} ({})", route.name(), route.key());
                self.events.push(SessionEvent::Started { route_key: route.key().to_string(), binding });
                self.route = Some(route);
                self.phase = SessionPhase::Active;
                Ok(binding)
            }
            Err(err) => {
                tracing::error!("Cannot start route {}: {}", route.key(), err);
                self.events.push(SessionEvent::MediaFailed(err.to_string()));
                Err(err.into())
            }
        }
    }

    /// Looks the route up first. An unknown route leaves the session untouched.
    pub fn start_from_catalog(&mut self, catalog: &RouteCatalog, region: &str, key: &str) -> Result<BindingId, SessionError> {
        let route = catalog.lookup(region, key).inspect_err(|err| {
            tracing::warn!("Not starting route: {}", err);
        })?;
        self.start_route(route)
    }

    pub fn set_speed(&mut self, speed: f64) {
        if self.phase != SessionPhase::Active {
            return;
        }

        if self.motion.set_speed(speed) == 0.0 {
            self.playback.pause();
            return;
        }

        if self.playback.is_started() {
            self.playback.set_rate(self.motion.playback_rate());
            self.playback.resume();
            return;
        }

        match self.playback.request_start() {
            StartRequest::NotReady => tracing::debug!("Speed changed before media was ready"),
            request => tracing::trace!("Start request: {:?}", request),
        }
    }

    /// One animation frame: elapsed time, then distance and steps, then the
    /// map position. Does nothing unless a walk is active.
    pub fn frame(&mut self, timestamp_ms: f64) -> Option<ProgressUpdate> {
        if self.phase != SessionPhase::Active {
            return None;
        }

        let moved = self.motion.tick(timestamp_ms, self.playback.is_playing());
        if !moved {
            return None;
        }

        let update = self.snapshot()?;
        self.events.push(SessionEvent::Progress(update.clone()));
        Some(update)
    }

    pub fn handle_media(&mut self, signal: MediaSignal) {
        let Some(event) = self.playback.handle_signal(signal) else {
            return;
        };

        match event {
            MediaEvent::Ready => {
                tracing::info!("Media ready");
            }
            MediaEvent::PlayGranted => {
                if self.motion.is_moving() {
                    self.playback.set_rate(self.motion.playback_rate());
                } else {
                    // Speed went back to zero while the request was in flight
                    self.playback.pause();
                }
                self.events.push(SessionEvent::PlaybackStarted);
            }
            MediaEvent::PlayDeferred(_) => {
                if self.playback.awaiting_gesture() {
                    self.events.push(SessionEvent::AwaitingGesture);
                }
            }
            MediaEvent::Ended => {
                if self.phase == SessionPhase::Active {
                    self.finish(Completion::Natural);
                }
            }
            // A finished walk keeps its summary; repeat rebinds the media anyway
            MediaEvent::Failed(_) if self.phase != SessionPhase::Active => {}
            MediaEvent::Failed(reason) => {
                self.playback.stop();
                self.route = None;
                self.summary = None;
                self.phase = SessionPhase::Idle;
                self.motion.reset();
                self.events.push(SessionEvent::MediaFailed(reason));
            }
        }
    }

    pub fn end_route(&mut self) -> Result<SessionSummary, SessionError> {
        self.finish(Completion::Manual).ok_or(SessionError::NoActiveRoute)
    }

    /// Moves to `Finished` and records the walk. Calling it again returns the
    /// same summary without recording anything.
    pub fn finish(&mut self, completion: Completion) -> Option<SessionSummary> {
        match self.phase {
            SessionPhase::Idle => None,
            SessionPhase::Finished => self.summary.clone(),
            SessionPhase::Active => {
                let route = self.route.clone()?;
                self.playback.pause();

                let summary = SessionSummary {
                    route_key: route.key().to_string(),
                    route_name: route.name().to_string(),
                    steps: self.motion.steps(),
                    distance_km: self.motion.distance_km(),
                    elapsed_secs: self.motion.elapsed_secs(),
                    achievement: route.achievement().cloned(),
                    completion,
                    final_position: projection::project(&route, self.motion.distance_km()),
                };

                tracing::info!(
                    "Finished {} ({:?}): {} steps, {} km in {}",
                    summary.route_name, completion, summary.steps, summary.distance_text(), summary.time_text()
                );

                self.phase = SessionPhase::Finished;
                self.summary = Some(summary.clone());
                self.completed.push(summary.clone());
                self.events.push(SessionEvent::Finished(summary.clone()));
                Some(summary)
            }
        }
    }

    /// Walks the same route again from zero.
    pub fn repeat_route(&mut self) -> Result<BindingId, SessionError> {
        let route = self.route.clone().ok_or(SessionError::NoActiveRoute)?;
        self.start_route(route)
    }

    /// Back to route selection. Returns false if there was nothing to leave.
    pub fn leave(&mut self) -> bool {
        if self.phase == SessionPhase::Idle {
            return false;
        }

        self.playback.stop();
        self.motion.reset();
        self.route = None;
        self.summary = None;
        self.phase = SessionPhase::Idle;
        self.events.push(SessionEvent::Left);
        true
    }

    pub fn snapshot(&self) -> Option<ProgressUpdate> {
        let route = self.route.as_ref()?;
        let distance_km = self.motion.distance_km();

        Some(ProgressUpdate {
            steps: self.motion.steps(),
            distance_km,
            elapsed_secs: self.motion.elapsed_secs(),
            progress: projection::progress(route, distance_km),
            position: projection::project(route, distance_km),
        })
    }

    pub fn live_position(&self) -> Option<Coordinate> {
        self.snapshot().map(|update| update.position)
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn route(&self) -> Option<&Arc<RouteDescriptor>> {
        self.route.as_ref()
    }

    pub fn speed(&self) -> f64 {
        self.motion.speed()
    }

    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    /// Every walk finished during this page lifetime, oldest first.
    pub fn completed(&self) -> &[SessionSummary] {
        &self.completed
    }

    pub fn media_ready(&self) -> bool {
        self.playback.is_ready()
    }

    pub fn media_started(&self) -> bool {
        self.playback.is_started()
    }

    pub fn awaiting_gesture(&self) -> bool {
        self.playback.awaiting_gesture()
    }

    pub fn playback(&self) -> &PlaybackController<M> {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut PlaybackController<M> {
        &mut self.playback
    }
}
