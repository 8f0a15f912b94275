//! Ownership of the panoramic video.
//!
//! The controller owns at most one media binding. Platform media is reached
//! through [`MediaBackend`]; anything the platform reports back arrives as a
//! [`MediaSignal`] tagged with the [`BindingId`] it belongs to, so signals from
//! a binding that has since been torn down can be recognised and dropped.
//!
//! Starting playback is a two step affair. [`PlaybackController::request_start`]
//! asks the backend to play, and the outcome comes back later as either
//! [`MediaEvent::PlayGranted`] or [`MediaEvent::PlayDeferred`]. A deferred start
//! leaves the video paused until the next user gesture retries it.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::{config::PlaybackConfig, error::{MediaError, PlaybackError}};

/// Unique for the whole process, so a signal still in flight from a dropped
/// controller never matches a binding of its replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(pub u64);

static NEXT_BINDING: AtomicU64 = AtomicU64::new(1);

impl BindingId {
    fn next() -> Self {
        Self(NEXT_BINDING.fetch_add(1, Ordering::Relaxed))
    }
}

/// Platform side of the video element.
pub trait MediaBackend {
    /// Loads `source` and starts buffering. Readiness is reported later with
    /// [`MediaEvent::Ready`] carrying `binding`.
    fn attach(&mut self, source: &str, binding: BindingId) -> Result<(), MediaError>;

    /// Stops streaming and releases the decoder.
    fn detach(&mut self);

    /// Asks the platform to play. The outcome is reported later as
    /// [`MediaEvent::PlayGranted`] or [`MediaEvent::PlayDeferred`].
    fn play(&mut self, binding: BindingId);

    fn pause(&mut self);

    fn set_muted(&mut self, muted: bool);

    fn set_playback_rate(&mut self, rate: f64);
}

#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Enough is buffered to start playing.
    Ready,
    /// A play request went through.
    PlayGranted,
    /// A play request was refused, usually for lack of a user gesture.
    PlayDeferred(String),
    Ended,
    /// The media failed after attaching, e.g. the stream could not be decoded.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaSignal {
    pub binding: BindingId,
    pub event: MediaEvent,
}

impl MediaSignal {
    pub fn new(binding: BindingId, event: MediaEvent) -> Self {
        Self { binding, event }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartRequest {
    /// Play was requested; wait for the outcome signal.
    Requested,
    /// A request is already in flight.
    Pending,
    AlreadyStarted,
    /// Media is still buffering; the request is ignored.
    NotReady,
    Unbound,
}

#[derive(Debug, Clone)]
struct Binding {
    id: BindingId,
    source: String,
    ready: bool,
    started: bool,
    paused: bool,
    start_pending: bool,
    awaiting_gesture: bool,
    ended: bool,
}

impl Binding {
    fn new(id: BindingId, source: &str) -> Self {
        Self {
            id,
            source: source.to_string(),
            ready: false,
            started: false,
            paused: true,
            start_pending: false,
            awaiting_gesture: false,
            ended: false,
        }
    }
}

pub struct PlaybackController<M: MediaBackend> {
    backend: M,
    config: PlaybackConfig,
    binding: Option<Binding>,
}

impl<M: MediaBackend> PlaybackController<M> {
    pub fn new(backend: M, config: PlaybackConfig) -> Self {
        Self {
            backend,
            config,
            binding: None,
        }
    }

    /// Attaches `source`, always tearing down the current binding first.
    pub fn bind(&mut self, source: &str) -> Result<BindingId, PlaybackError> {
        self.stop();

        let id = BindingId::next();

        if let Err(err) = self.backend.attach(source, id) {
            tracing::warn!("Failed to attach media {}: {}", source, err);
            self.backend.detach();
            return Err(err.into());
        }

        tracing::debug!("Bound media {} as {:?}", source, id);
        self.binding = Some(Binding::new(id, source));
        Ok(id)
    }

    /// Pauses and releases the media. Safe to call when nothing is bound.
    pub fn stop(&mut self) {
        if let Some(binding) = self.binding.take() {
            tracing::debug!("Releasing media {:?}", binding.id);
            self.backend.pause();
            self.backend.detach();
        }
    }

    pub fn request_start(&mut self) -> StartRequest {
        let start_muted = self.config.start_muted;
        let Some(binding) = self.binding.as_mut() else {
            return StartRequest::Unbound;
        };

        if binding.started {
            return StartRequest::AlreadyStarted;
        }
        if !binding.ready {
            return StartRequest::NotReady;
        }
        if binding.start_pending {
            return StartRequest::Pending;
        }

        binding.start_pending = true;
        if start_muted {
            self.backend.set_muted(true);
        }
        self.backend.play(binding.id);
        StartRequest::Requested
    }

    /// Forwards a playback rate once the video is actually playing.
    pub fn set_rate(&mut self, rate: f64) -> bool {
        match &self.binding {
            Some(binding) if binding.started => {
                self.backend.set_playback_rate(rate);
                true
            }
            _ => false,
        }
    }

    pub fn pause(&mut self) {
        if let Some(binding) = self.binding.as_mut().filter(|b| b.started && !b.paused) {
            binding.paused = true;
            self.backend.pause();
        }
    }

    /// Resumes a started video that was paused by standing still.
    pub fn resume(&mut self) {
        if let Some(binding) = self.binding.as_mut().filter(|b| b.started && b.paused && !b.ended) {
            binding.paused = false;
            self.backend.play(binding.id);
        }
    }

    /// Applies a platform signal. Returns the event when it belongs to the
    /// current binding and changed something, `None` for stale or repeated
    /// signals.
    pub fn handle_signal(&mut self, signal: MediaSignal) -> Option<MediaEvent> {
        let Some(binding) = self.binding.as_mut().filter(|b| b.id == signal.binding) else {
            tracing::debug!("Ignoring stale media signal {:?}", signal);
            return None;
        };

        match &signal.event {
            MediaEvent::Ready => {
                if binding.ready {
                    return None;
                }
                binding.ready = true;
            }
            MediaEvent::PlayGranted => {
                if !binding.started && !binding.start_pending {
                    tracing::debug!("Ignoring play grant nobody asked for on {:?}", binding.id);
                    return None;
                }
                if binding.started {
                    // Resume after a pause
                    binding.paused = false;
                    return None;
                }
                binding.started = true;
                binding.paused = false;
                binding.start_pending = false;
                binding.awaiting_gesture = false;
                if self.config.start_muted {
                    self.backend.set_muted(false);
                }
            }
            MediaEvent::PlayDeferred(reason) => {
                tracing::info!("Playback deferred until next gesture: {}", reason);
                binding.start_pending = false;
                if binding.started {
                    binding.paused = true;
                } else {
                    binding.awaiting_gesture = true;
                }
            }
            MediaEvent::Ended => {
                if binding.ended {
                    return None;
                }
                binding.ended = true;
                binding.paused = true;
            }
            MediaEvent::Failed(reason) => {
                tracing::warn!("Media {:?} failed: {}", binding.id, reason);
            }
        }

        Some(signal.event)
    }

    pub fn binding_id(&self) -> Option<BindingId> {
        self.binding.as_ref().map(|b| b.id)
    }

    pub fn source(&self) -> Option<&str> {
        self.binding.as_ref().map(|b| b.source.as_str())
    }

    pub fn is_ready(&self) -> bool {
        self.binding.as_ref().is_some_and(|b| b.ready)
    }

    pub fn is_started(&self) -> bool {
        self.binding.as_ref().is_some_and(|b| b.started)
    }

    pub fn is_playing(&self) -> bool {
        self.binding.as_ref().is_some_and(|b| b.started && !b.paused)
    }

    pub fn awaiting_gesture(&self) -> bool {
        self.binding.as_ref().is_some_and(|b| b.awaiting_gesture)
    }

    pub fn backend(&self) -> &M {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut M {
        &mut self.backend
    }
}

impl<M: MediaBackend> Drop for PlaybackController<M> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Attach(String, BindingId),
        Detach,
        Play(BindingId),
        Pause,
        Muted(bool),
        Rate(f64),
    }

    /// Backend double that records every call.
    #[derive(Debug, Default)]
    pub struct RecordingBackend {
        pub calls: Vec<Call>,
        pub unsupported: bool,
    }

    impl MediaBackend for RecordingBackend {
        fn attach(&mut self, source: &str, binding: BindingId) -> Result<(), MediaError> {
            if self.unsupported {
                return Err(MediaError::Unsupported("no HLS".into()));
            }
            self.calls.push(Call::Attach(source.to_string(), binding));
            Ok(())
        }

        fn detach(&mut self) {
            self.calls.push(Call::Detach);
        }

        fn play(&mut self, binding: BindingId) {
            self.calls.push(Call::Play(binding));
        }

        fn pause(&mut self) {
            self.calls.push(Call::Pause);
        }

        fn set_muted(&mut self, muted: bool) {
            self.calls.push(Call::Muted(muted));
        }

        fn set_playback_rate(&mut self, rate: f64) {
            self.calls.push(Call::Rate(rate));
        }
    }
}
