use log::{info, warn};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source, source::Buffered};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Index of a loaded sound inside its sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundHandle(usize);

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("No audio output device: {0}")]
    Device(String),

    #[error("Failed to open sound {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode sound {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Playback failed: {0}")]
    Playback(String),

    #[error("Unknown sound handle {0:?}")]
    UnknownHandle(SoundHandle),
}

/// Where sound effects go. Playback is best-effort and never blocks.
pub trait AudioSink {
    fn load(&mut self, path: &Path) -> Result<SoundHandle, AudioError>;

    /// Play from the start
    fn play(&self, handle: SoundHandle) -> Result<(), AudioError>;

    /// Drop every loaded sound. Handles become invalid.
    fn unload_all(&mut self);
}

/// Sound output through rodio. Sounds are decoded once and buffered, so each
/// play only clones the buffer.
pub struct RodioSink {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    sounds: Vec<Buffered<Decoder<BufReader<File>>>>,
    volume: f32,
}

impl RodioSink {
    /// Open the default output device
    pub fn open(volume: f32) -> Result<Self, AudioError> {
        let (stream, stream_handle) =
            OutputStream::try_default().map_err(|err| AudioError::Device(err.to_string()))?;

        Ok(Self {
            _stream: stream,
            stream_handle,
            sounds: Vec::new(),
            volume,
        })
    }
}

impl AudioSink for RodioSink {
    fn load(&mut self, path: &Path) -> Result<SoundHandle, AudioError> {
        let file = File::open(path).map_err(|source| AudioError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let source = Decoder::new(BufReader::new(file)).map_err(|err| AudioError::Decode {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

        self.sounds.push(source.buffered());
        Ok(SoundHandle(self.sounds.len() - 1))
    }

    fn play(&self, handle: SoundHandle) -> Result<(), AudioError> {
        let sound = self
            .sounds
            .get(handle.0)
            .ok_or(AudioError::UnknownHandle(handle))?;

        let sink = Sink::try_new(&self.stream_handle)
            .map_err(|err| AudioError::Playback(err.to_string()))?;
        sink.set_volume(self.volume);
        sink.append(sound.clone());
        // Let it finish on the audio thread
        sink.detach();
        Ok(())
    }

    fn unload_all(&mut self) {
        self.sounds.clear();
    }
}

/// Used when no output device is available. Accepts loads and plays nothing.
#[derive(Debug, Default)]
pub struct SilentSink {
    loaded: usize,
}

impl AudioSink for SilentSink {
    fn load(&mut self, _path: &Path) -> Result<SoundHandle, AudioError> {
        self.loaded += 1;
        Ok(SoundHandle(self.loaded - 1))
    }

    fn play(&self, _handle: SoundHandle) -> Result<(), AudioError> {
        Ok(())
    }

    fn unload_all(&mut self) {
        self.loaded = 0;
    }
}

/// The game's sound effects. Every failure is logged and swallowed.
pub struct SoundBoard {
    sink: Box<dyn AudioSink>,
    blast: Option<SoundHandle>,
}

impl SoundBoard {
    pub fn new(mut sink: Box<dyn AudioSink>, blast_path: &Path) -> Self {
        let blast = match sink.load(blast_path) {
            Ok(handle) => {
                info!("Loaded blast sound from {}", blast_path.display());
                Some(handle)
            }
            Err(err) => {
                warn!("Error loading blast sound: {}", err);
                None
            }
        };
        Self { sink, blast }
    }

    /// Rodio output when a device exists, silence otherwise
    pub fn open_default(volume: f32, blast_path: &Path) -> Self {
        let sink: Box<dyn AudioSink> = match RodioSink::open(volume) {
            Ok(sink) => Box::new(sink),
            Err(err) => {
                warn!("{}; continuing without audio", err);
                Box::new(SilentSink::default())
            }
        };
        Self::new(sink, blast_path)
    }

    pub fn has_blast(&self) -> bool {
        self.blast.is_some()
    }

    pub fn play_blast(&self) {
        let Some(handle) = self.blast else {
            return;
        };
        if let Err(err) = self.sink.play(handle) {
            warn!("Error playing blast sound: {}", err);
        }
    }

    /// Release loaded sounds; later plays are no-ops
    pub fn release(&mut self) {
        if self.blast.take().is_some() {
            self.sink.unload_all();
            info!("Sound resources released");
        }
    }
}

impl Drop for SoundBoard {
    fn drop(&mut self) {
        self.release();
    }
}
