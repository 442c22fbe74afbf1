use std::time::{Duration, Instant};
use thiserror::Error;

/// Hard cap on one recorded turn.
pub const MAX_RECORDING: Duration = Duration::from_secs(30);
/// Pause after playback before the microphone may open again, so the
/// tail of the spoken reply is not captured as the next turn.
pub const REARM_DELAY: Duration = Duration::from_millis(750);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Idle,
    Recording,
    Processing,
    Speaking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallEvent {
    StartRecording,
    StopRecording,
    /// Discards the current recording. Only valid while recording;
    /// once processing begins the turn runs to completion.
    CancelRecording,
    ReplyReady,
    /// The turn failed after processing began; back to idle without
    /// a re-arm delay.
    TurnFailed,
    SpeechEnded,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("{event:?} is not valid while {state:?}")]
    Invalid { state: CallState, event: CallEvent },
    #[error("microphone re-arm delay has not elapsed")]
    RearmPending,
}

/// One voice-call session as a typed state machine:
/// `Idle -> Recording -> Processing -> Speaking -> Idle`.
#[derive(Debug)]
pub struct CallSession {
    state: CallState,
    entered_at: Instant,
    rearm_until: Option<Instant>,
}

impl CallSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: CallState::Idle,
            entered_at: Instant::now(),
            rearm_until: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> CallState {
        self.state
    }

    /// True while recording once the hard cap has passed; the caller is
    /// expected to apply `StopRecording`.
    #[must_use]
    pub fn recording_expired(&self, now: Instant) -> bool {
        self.state == CallState::Recording && now.duration_since(self.entered_at) >= MAX_RECORDING
    }

    pub fn apply(&mut self, event: CallEvent) -> Result<CallState, TransitionError> {
        self.apply_at(event, Instant::now())
    }

    pub fn apply_at(&mut self, event: CallEvent, now: Instant) -> Result<CallState, TransitionError> {
        use CallEvent::*;
        use CallState::*;

        let next = match (self.state, event) {
            (Idle, StartRecording) => {
                if self.rearm_until.is_some_and(|until| now < until) {
                    return Err(TransitionError::RearmPending);
                }
                self.rearm_until = None;
                Recording
            }
            (Recording, StopRecording) => Processing,
            (Recording, CancelRecording) => Idle,
            (Processing, ReplyReady) => Speaking,
            (Processing, TurnFailed) => Idle,
            (Speaking, SpeechEnded) => {
                self.rearm_until = Some(now + REARM_DELAY);
                Idle
            }
            (state, event) => return Err(TransitionError::Invalid { state, event }),
        };

        self.state = next;
        self.entered_at = now;
        Ok(next)
    }
}

impl Default for CallSession {
    fn default() -> Self {
        Self::new()
    }
}
