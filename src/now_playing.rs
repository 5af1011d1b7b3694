//! Now-playing metadata and remote play/pause commands.
//!
//! The platform side is represented by two seams: a [`NowPlayingSurface`] that
//! displays metadata, and a [`RemoteCommandSender`] that platform glue uses to
//! forward lock-screen or headset commands. Commands are queued and applied on
//! the control thread by
//! [`AmbientPlayer::process_remote_commands`](crate::audio_engine::AmbientPlayer::process_remote_commands).

use std::sync::mpsc::{Receiver, Sender, channel};

/// Metadata record shown by the system's now-playing surface.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NowPlayingInfo {
    pub title: String,
}

/// System-level display of current media metadata.
pub trait NowPlayingSurface: Send {
    fn publish(&mut self, info: &NowPlayingInfo);
}

/// Surface that only logs; used when no platform surface is available.
#[derive(Debug, Default)]
pub struct LogSurface;

impl NowPlayingSurface for LogSurface {
    fn publish(&mut self, info: &NowPlayingInfo) {
        log::info!("Now playing: {}", info.title);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCommand {
    Play,
    Pause,
}

/// Receiver of remote play/pause commands.
pub trait RemoteCommandTarget {
    fn on_remote_play(&mut self);
    fn on_remote_pause(&mut self);
}

/// Cloneable handle for posting remote commands from any thread.
#[derive(Debug, Clone)]
pub struct RemoteCommandSender {
    tx: Sender<RemoteCommand>,
}

impl RemoteCommandSender {
    /// Returns `false` if the bridge has been dropped.
    pub fn send(&self, command: RemoteCommand) -> bool {
        self.tx.send(command).is_ok()
    }
}

/// Publishes metadata and owns the single remote-command registration.
pub struct NowPlayingBridge {
    surface: Box<dyn NowPlayingSurface>,
    commands_tx: Sender<RemoteCommand>,
    commands_rx: Receiver<RemoteCommand>,
}

impl NowPlayingBridge {
    pub fn new(surface: Box<dyn NowPlayingSurface>) -> Self {
        let (commands_tx, commands_rx) = channel();
        Self {
            surface,
            commands_tx,
            commands_rx,
        }
    }

    pub fn publish_now_playing(&mut self, title: &str) {
        let info = NowPlayingInfo {
            title: title.to_string(),
        };
        self.surface.publish(&info);
    }

    /// Handle through which platform glue delivers remote commands.
    ///
    /// Every handle feeds the same queue; calling this repeatedly does not add
    /// handlers.
    pub fn remote(&self) -> RemoteCommandSender {
        RemoteCommandSender {
            tx: self.commands_tx.clone(),
        }
    }

    pub fn next_command(&self) -> Option<RemoteCommand> {
        self.commands_rx.try_recv().ok()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Surface that remembers everything published to it.
    #[derive(Clone, Default)]
    pub(crate) struct RecordingSurface {
        published: Arc<Mutex<Vec<NowPlayingInfo>>>,
    }

    impl RecordingSurface {
        pub(crate) fn published(&self) -> Vec<NowPlayingInfo> {
            self.published.lock().unwrap().clone()
        }
    }

    impl NowPlayingSurface for RecordingSurface {
        fn publish(&mut self, info: &NowPlayingInfo) {
            self.published.lock().unwrap().push(info.clone());
        }
    }

    #[derive(Default)]
    struct Toggle {
        plays: usize,
        pauses: usize,
    }

    impl RemoteCommandTarget for Toggle {
        fn on_remote_play(&mut self) {
            self.plays += 1;
        }

        fn on_remote_pause(&mut self) {
            self.pauses += 1;
        }
    }

    #[test]
    fn test_publish_reaches_surface() {
        let surface = RecordingSurface::default();
        let mut bridge = NowPlayingBridge::new(Box::new(surface.clone()));

        bridge.publish_now_playing("WhiteNoise1");

        assert_eq!(
            surface.published(),
            vec![NowPlayingInfo {
                title: "WhiteNoise1".to_string()
            }]
        );
    }

    #[test]
    fn test_commands_are_queued_in_order() {
        let bridge = NowPlayingBridge::new(Box::new(LogSurface));
        let remote = bridge.remote();

        assert!(remote.send(RemoteCommand::Play));
        assert!(bridge.remote().send(RemoteCommand::Pause));

        let mut target = Toggle::default();
        while let Some(command) = bridge.next_command() {
            match command {
                RemoteCommand::Play => target.on_remote_play(),
                RemoteCommand::Pause => target.on_remote_pause(),
            }
        }

        assert_eq!((target.plays, target.pauses), (1, 1));
        assert_eq!(bridge.next_command(), None);
    }

    #[test]
    fn test_remote_outliving_bridge() {
        let bridge = NowPlayingBridge::new(Box::new(LogSurface));
        let remote = bridge.remote();
        drop(bridge);

        assert!(!remote.send(RemoteCommand::Play));
    }
}
