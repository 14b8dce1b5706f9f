//! Destination for synthesized audio frames.

use crate::{MorseError, Result, SampleFrame};

/// Audio target consumed by [`crate::MorseEncoder`].
///
/// Implementations append frames in order and must not drop any. Sample rate
/// and channel count are read once when an encoder is built.
pub trait AudioSink {
    fn is_writable(&self) -> bool;

    fn sample_rate(&self) -> u32;

    fn number_of_channels(&self) -> usize;

    /// Consumes one segment of frames.
    fn write(&mut self, frames: &mut dyn Iterator<Item = SampleFrame>) -> Result<()>;
}

/// In-memory sink that keeps every frame and the length of every write.
#[derive(Debug, Clone)]
pub struct BufferSink {
    sample_rate: u32,
    channels: usize,
    writable: bool,
    frames: Vec<SampleFrame>,
    segments: Vec<usize>,
}

impl BufferSink {
    pub fn new(sample_rate: u32, channels: usize) -> Self {
        Self {
            sample_rate,
            channels,
            writable: true,
            frames: Vec::new(),
            segments: Vec::new(),
        }
    }

    /// A sink that reports itself as not writable.
    pub fn read_only(sample_rate: u32, channels: usize) -> Self {
        Self {
            writable: false,
            ..Self::new(sample_rate, channels)
        }
    }

    pub fn frames(&self) -> &[SampleFrame] {
        &self.frames
    }

    /// Frame count of each write call, in order.
    pub fn segments(&self) -> &[usize] {
        &self.segments
    }

    /// Samples of a single channel across all frames.
    pub fn channel(&self, index: usize) -> Vec<f32> {
        self.frames
            .iter()
            .map(|frame| frame.samples().get(index).copied().unwrap_or(0.0))
            .collect()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
        self.segments.clear();
    }
}

impl AudioSink for BufferSink {
    fn is_writable(&self) -> bool {
        self.writable
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn number_of_channels(&self) -> usize {
        self.channels
    }

    fn write(&mut self, frames: &mut dyn Iterator<Item = SampleFrame>) -> Result<()> {
        if !self.writable {
            return Err(MorseError::SinkNotWritable);
        }

        let before = self.frames.len();
        for frame in frames {
            if frame.channels() != self.channels {
                return Err(MorseError::sink(format!(
                    "frame has {} channels, sink expects {}",
                    frame.channels(),
                    self.channels
                )));
            }
            self.frames.push(frame);
        }
        self.segments.push(self.frames.len() - before);
        Ok(())
    }
}
