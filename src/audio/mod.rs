//! Sound manager
//!
//! Plays named cues on demand. Gameplay never calls into here directly:
//! the manager consumes Sound-category events (play, pause, stop, volume,
//! mute) published on the bus. Cues are loaded once by string key and
//! replayed from their decoded bytes; a missing cue at play time is a
//! warning, not a fault.

use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, mixer::Mixer};
use rustc_hash::FxHashMap;

use crate::events::Event;

/// Errors that can occur during audio operations
#[derive(Debug, Clone)]
pub enum AudioError {
    /// No audio output device is available
    NoDevice,
    /// IO error reading a cue file
    Io(String),
    /// Error decoding audio data
    Decode(String),
}

impl std::fmt::Display for AudioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDevice => write!(f, "no audio output device available"),
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Decode(e) => write!(f, "Decode error: {e}"),
        }
    }
}

impl std::error::Error for AudioError {}

/// A loaded cue: raw encoded bytes plus the sink of its latest playback.
struct Cue {
    bytes: Arc<[u8]>,
    sink: Option<Sink>,
    volume: f32,
}

/// Event-driven audio output.
pub struct SoundManager {
    /// The output stream (must be kept alive)
    _stream: OutputStream,
    mixer: Mixer,
    cues: FxHashMap<String, Cue>,
    master_volume: f32,
    muted: bool,
}

impl SoundManager {
    /// Create a sound manager on the default output device
    ///
    /// # Errors
    ///
    /// Returns an error if no audio output device is available
    pub fn new() -> Result<Self, AudioError> {
        let stream = OutputStreamBuilder::from_default_device()
            .map_err(|_| AudioError::NoDevice)?
            .open_stream()
            .map_err(|_| AudioError::NoDevice)?;
        let mixer = stream.mixer().clone();

        Ok(Self {
            _stream: stream,
            mixer,
            cues: FxHashMap::default(),
            master_volume: 1.0,
            muted: false,
        })
    }

    /// Load a cue from a file and register it under a name
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded
    pub fn load(&mut self, name: impl Into<String>, path: impl AsRef<Path>) -> Result<(), AudioError> {
        let bytes = fs::read(path).map_err(|e| AudioError::Io(e.to_string()))?;
        self.load_bytes(name, bytes.into())
    }

    /// Register a cue from already-loaded bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes do not decode as audio
    pub fn load_bytes(
        &mut self,
        name: impl Into<String>,
        bytes: Arc<[u8]>,
    ) -> Result<(), AudioError> {
        // Validate once at load time so play never fails on bad data
        Decoder::new(Cursor::new(bytes.clone())).map_err(|e| AudioError::Decode(e.to_string()))?;
        self.cues.insert(
            name.into(),
            Cue {
                bytes,
                sink: None,
                volume: 1.0,
            },
        );
        Ok(())
    }

    #[must_use]
    pub fn has_cue(&self, name: &str) -> bool {
        self.cues.contains_key(name)
    }

    /// Start (or restart) a cue by name.
    pub fn play(&mut self, name: &str) -> bool {
        let muted = self.muted;
        let master = self.master_volume;
        let Some(cue) = self.cues.get_mut(name) else {
            log::warn!("unknown sound cue '{name}'");
            return false;
        };
        let Ok(source) = Decoder::new(Cursor::new(cue.bytes.clone())) else {
            // Validated at load time; a failure here means the data changed
            return false;
        };

        // Replacing the previous sink stops any still-running playback
        let sink = Sink::connect_new(&self.mixer);
        sink.set_volume(if muted { 0.0 } else { cue.volume * master });
        sink.append(source);
        sink.play();
        cue.sink = Some(sink);
        true
    }

    /// Pause a playing cue.
    pub fn pause(&mut self, name: &str) -> bool {
        match self.cues.get(name).and_then(|cue| cue.sink.as_ref()) {
            Some(sink) => {
                sink.pause();
                true
            }
            None => false,
        }
    }

    /// Resume a paused cue.
    pub fn resume(&mut self, name: &str) -> bool {
        match self.cues.get(name).and_then(|cue| cue.sink.as_ref()) {
            Some(sink) => {
                sink.play();
                true
            }
            None => false,
        }
    }

    /// Stop a cue; it cannot be resumed, only replayed.
    pub fn stop(&mut self, name: &str) -> bool {
        match self.cues.get_mut(name) {
            Some(cue) => {
                if let Some(sink) = cue.sink.take() {
                    sink.stop();
                }
                true
            }
            None => false,
        }
    }

    /// Stop every cue.
    pub fn stop_all(&mut self) {
        for cue in self.cues.values_mut() {
            if let Some(sink) = cue.sink.take() {
                sink.stop();
            }
        }
    }

    #[must_use]
    pub const fn master_volume(&self) -> f32 {
        self.master_volume
    }

    /// Adjust master volume by a signed amount, clamped at zero.
    pub fn volume_delta(&mut self, delta: f32) {
        self.master_volume = (self.master_volume + delta).max(0.0);
        self.apply_volumes();
    }

    pub fn mute(&mut self) {
        self.muted = true;
        self.apply_volumes();
    }

    pub fn unmute(&mut self) {
        self.muted = false;
        self.apply_volumes();
    }

    #[must_use]
    pub const fn is_muted(&self) -> bool {
        self.muted
    }

    fn apply_volumes(&mut self) {
        for cue in self.cues.values() {
            if let Some(sink) = &cue.sink {
                sink.set_volume(if self.muted {
                    0.0
                } else {
                    cue.volume * self.master_volume
                });
            }
        }
    }

    /// React to Sound-category events.
    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::PlaySound { name } => {
                self.play(name);
            }
            Event::PauseSound { name } => {
                self.pause(name);
            }
            Event::StopSound { name } => {
                self.stop(name);
            }
            Event::StopAllSounds => self.stop_all(),
            Event::VolumeDelta { delta } => self.volume_delta(*delta),
            Event::Mute => self.mute(),
            Event::Unmute => self.unmute(),
            _ => {}
        }
    }
}

impl std::fmt::Debug for SoundManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundManager")
            .field("cues", &self.cues.len())
            .field("master_volume", &self.master_volume)
            .field("muted", &self.muted)
            .finish()
    }
}
