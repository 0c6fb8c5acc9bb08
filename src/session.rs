use crate::capture::{FramePoll, FrameSource};
use crate::config::PulseConfig;
use crate::error::Result;
use crate::processing::{CycleResult, PulseProcessor, Status};

/// Outcome of one scheduled pass
#[derive(Debug, Clone, PartialEq)]
pub enum Tick {
    /// A frame was processed
    Cycle(CycleResult),
    /// No frame was ready; nothing changed
    NoFrame,
    /// The source has no more frames
    EndOfStream,
    /// The session is not running
    Inactive,
}

/// A start/stop bounded monitoring session
///
/// Owns the pipeline and, while running, the frame source. The host drives it
/// by calling [`MonitoringSession::tick`] once per captured frame; the session
/// never schedules itself.
pub struct MonitoringSession {
    processor: PulseProcessor,
    source: Option<Box<dyn FrameSource>>,
    status: Status,
}

impl MonitoringSession {
    pub fn new(config: &PulseConfig) -> Result<Self> {
        Ok(Self {
            processor: PulseProcessor::new(config)?,
            source: None,
            status: Status::Ready,
        })
    }

    /// Acquire the source and begin monitoring
    ///
    /// If the source cannot be opened the error is returned and the session
    /// stays stopped with its state untouched. Starting an active session
    /// stops the previous one first.
    pub fn start(&mut self, mut source: Box<dyn FrameSource>) -> Result<()> {
        if self.is_active() {
            self.stop();
        }

        if let Err(e) = source.open() {
            log::error!("Could not start monitoring: {}", e);
            return Err(e);
        }

        log::info!("Monitoring started ({})", source.resolution());
        self.processor.reset();
        self.source = Some(source);
        self.status = Status::Initializing;
        Ok(())
    }

    /// Release the source and clear all pipeline state
    pub fn stop(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.close();
            log::info!("Monitoring stopped");
        }
        self.processor.reset();
        self.status = Status::Ready;
    }

    /// Pull at most one frame from the source and process it
    pub fn tick(&mut self) -> Tick {
        let Some(source) = self.source.as_mut() else {
            return Tick::Inactive;
        };

        let frame = match source.next_frame() {
            Ok(FramePoll::Frame(frame)) => frame,
            Ok(FramePoll::NotReady) => return Tick::NoFrame,
            Ok(FramePoll::Ended) => return Tick::EndOfStream,
            Err(e) => {
                log::warn!("Frame unavailable: {}", e);
                return Tick::NoFrame;
            }
        };

        let result = self.processor.process_frame(&frame);
        self.status = result.status;
        Tick::Cycle(result)
    }

    pub fn is_active(&self) -> bool {
        self.source.is_some()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Current outputs without processing a frame
    pub fn snapshot(&self) -> CycleResult {
        CycleResult {
            status: self.status,
            heart_rate: self.processor.heart_rate(),
            peak: None,
            signal: Vec::new(),
            display_range: self.processor.display_range(),
            monitoring: self.is_active(),
        }
    }

    pub fn processor(&self) -> &PulseProcessor {
        &self.processor
    }
}

impl Drop for MonitoringSession {
    fn drop(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.close();
        }
    }
}
