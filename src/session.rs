//! Process-wide audio session and interruption handling.
//!
//! One [`AudioSession`] is created at startup and passed by reference to whoever
//! needs it. Platform glue posts interruptions through an
//! [`InterruptionNotifier`]; a [`SessionMonitor`] turns them into `stop()` /
//! `play()` calls on the control thread.

use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use std::sync::{Arc, Mutex};

use cpal::traits::HostTrait;

use crate::audio_engine::PlaybackControl;
use crate::audio_engine::audio_stream::{AudioStreamHandle, create_audio_stream};
use crate::audio_engine::errors::SessionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCategory {
    /// Audio keeps playing in the background; other apps' audio is muted.
    Playback,
}

/// Another process temporarily took over audio output, or gave it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interruption {
    Began,
    Ended,
}

type Listeners = Arc<Mutex<Vec<Sender<Interruption>>>>;

/// Cloneable handle for posting interruptions from any thread.
#[derive(Clone)]
pub struct InterruptionNotifier {
    listeners: Listeners,
}

impl InterruptionNotifier {
    /// Delivers `event` to every live subscriber. Returns how many received it.
    pub fn post(&self, event: Interruption) -> usize {
        let Ok(mut listeners) = self.listeners.lock() else {
            log::error!("Interruption listeners lock poisoned, dropping {event:?}");
            return 0;
        };

        listeners.retain(|tx| tx.send(event).is_ok());
        listeners.len()
    }
}

pub struct AudioSession {
    category: Option<SessionCategory>,
    listeners: Listeners,
}

impl Default for AudioSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSession {
    pub fn new() -> Self {
        Self {
            category: None,
            listeners: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Record the session category.
    ///
    /// [`SessionCategory::Playback`] requires an output device; without one
    /// the category is still recorded and an error is returned for the caller
    /// to log.
    pub fn set_category(&mut self, category: SessionCategory) -> Result<(), SessionError> {
        self.category = Some(category);

        if cpal::default_host().default_output_device().is_none() {
            return Err(SessionError::NoOutputDevice);
        }

        log::info!("Audio session category set to {category:?}");
        Ok(())
    }

    pub fn category(&self) -> Option<SessionCategory> {
        self.category
    }

    /// Open and start the default output stream.
    pub fn open_output(&self) -> Result<AudioStreamHandle, SessionError> {
        create_audio_stream()
    }

    pub fn notifier(&self) -> InterruptionNotifier {
        InterruptionNotifier {
            listeners: Arc::clone(&self.listeners),
        }
    }

    fn subscribe(&self) -> Receiver<Interruption> {
        let (tx, rx) = channel();
        match self.listeners.lock() {
            Ok(mut listeners) => listeners.push(tx),
            Err(_) => log::error!("Interruption listeners lock poisoned, subscription lost"),
        }
        rx
    }

    /// Explicit teardown: drops every subscription and forgets the category.
    pub fn deactivate(&mut self) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.clear();
        }
        self.category = None;
        log::info!("Audio session deactivated");
    }
}

/// Maps interruption-began to `stop()` and interruption-ended to `play()`.
pub struct SessionMonitor {
    rx: Receiver<Interruption>,
}

impl SessionMonitor {
    /// Subscribes once; the subscription lives until the session is deactivated.
    pub fn new(session: &AudioSession) -> Self {
        Self {
            rx: session.subscribe(),
        }
    }

    /// Apply every pending interruption to `target`.
    ///
    /// Returns the number of events handled.
    pub fn dispatch<T: PlaybackControl + ?Sized>(&self, target: &mut T) -> usize {
        let mut handled = 0;
        loop {
            match self.rx.try_recv() {
                Ok(Interruption::Began) => {
                    log::info!("Audio interruption began, stopping playback");
                    target.stop();
                }
                Ok(Interruption::Ended) => {
                    log::info!("Audio interruption ended, resuming playback");
                    target.play();
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return handled,
            }
            handled += 1;
        }
    }
}
