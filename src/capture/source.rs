use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::{Path, PathBuf};

use crossbeam_channel::{Receiver, Sender, TryRecvError};

use super::RgbaFrame;
use crate::config::Resolution;
use crate::error::{PulseError, Result};

/// Outcome of asking a source for the next frame
#[derive(Debug)]
pub enum FramePoll {
    /// A decoded frame is available
    Frame(RgbaFrame),
    /// No frame yet; the pass is skipped
    NotReady,
    /// The stream is over
    Ended,
}

/// A producer of decoded RGBA frames
///
/// `open` acquires the underlying resource and is the only place a source may
/// fail fatally. `close` releases it and must be safe to call more than once.
pub trait FrameSource: Send {
    fn open(&mut self) -> Result<()> {
        Ok(())
    }

    fn next_frame(&mut self) -> Result<FramePoll>;

    fn close(&mut self) {}

    fn resolution(&self) -> Resolution;
}

/// Frames stored back-to-back as raw RGBA bytes in a file
pub struct RawFileSource {
    path: PathBuf,
    resolution: Resolution,
    reader: Option<BufReader<File>>,
    frames_read: usize,
}

impl RawFileSource {
    pub fn new<P: AsRef<Path>>(path: P, resolution: Resolution) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            resolution,
            reader: None,
            frames_read: 0,
        }
    }

    pub fn frames_read(&self) -> usize {
        self.frames_read
    }
}

impl FrameSource for RawFileSource {
    fn open(&mut self) -> Result<()> {
        let file = File::open(&self.path).map_err(|e| {
            PulseError::CaptureDevice(format!("{}: {}", self.path.display(), e))
        })?;
        log::info!(
            "Reading {} frames from {}",
            self.resolution,
            self.path.display()
        );
        self.reader = Some(BufReader::new(file));
        self.frames_read = 0;
        Ok(())
    }

    fn next_frame(&mut self) -> Result<FramePoll> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(FramePoll::Ended);
        };

        let mut data = vec![0u8; self.resolution.frame_bytes()];
        match reader.read_exact(&mut data) {
            Ok(()) => {
                self.frames_read += 1;
                Ok(FramePoll::Frame(RgbaFrame::new(self.resolution, data)?))
            }
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                log::debug!("End of {} after {} frames", self.path.display(), self.frames_read);
                Ok(FramePoll::Ended)
            }
            Err(e) => {
                // A failed read leaves the stream at an unknown frame boundary
                log::warn!(
                    "Read error in {} after {} frames: {}",
                    self.path.display(),
                    self.frames_read,
                    e
                );
                self.reader = None;
                Ok(FramePoll::Ended)
            }
        }
    }

    fn close(&mut self) {
        self.reader = None;
    }

    fn resolution(&self) -> Resolution {
        self.resolution
    }
}

/// Frames handed over by a capture thread
///
/// The pipeline never blocks on the channel: an empty channel skips the pass,
/// a disconnected one ends the stream.
pub struct ChannelSource {
    rx: Receiver<RgbaFrame>,
    resolution: Resolution,
}

impl ChannelSource {
    pub fn new(rx: Receiver<RgbaFrame>, resolution: Resolution) -> Self {
        Self { rx, resolution }
    }

    /// Create a bounded channel and the source reading from it
    pub fn bounded(resolution: Resolution, capacity: usize) -> (Sender<RgbaFrame>, Self) {
        let (tx, rx) = crossbeam_channel::bounded(capacity);
        (tx, Self::new(rx, resolution))
    }
}

impl FrameSource for ChannelSource {
    fn next_frame(&mut self) -> Result<FramePoll> {
        match self.rx.try_recv() {
            Ok(frame) => Ok(FramePoll::Frame(frame)),
            Err(TryRecvError::Empty) => Ok(FramePoll::NotReady),
            Err(TryRecvError::Disconnected) => Ok(FramePoll::Ended),
        }
    }

    fn close(&mut self) {
        // Drop anything still queued so a restart does not see stale frames
        while self.rx.try_recv().is_ok() {}
    }

    fn resolution(&self) -> Resolution {
        self.resolution
    }
}
