//! Per-sample waveform synthesis.
//!
//! Segments are produced lazily as iterators of [`SampleFrame`] so a sink can
//! consume them without the whole message being held in memory.

use std::collections::BTreeSet;
use std::f64::consts::PI;

/// One sample instant across all output channels.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleFrame {
    samples: Vec<f32>,
}

impl SampleFrame {
    pub fn new(samples: Vec<f32>) -> Self {
        Self { samples }
    }

    pub fn silent(channels: usize) -> Self {
        Self::new(vec![0.0; channels])
    }

    pub fn channels(&self) -> usize {
        self.samples.len()
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}

/// Number of frames covering `duration` seconds, rounded to the nearest
/// integer with halves away from zero. Negative or NaN durations give zero.
pub fn frame_count(sample_rate: u32, duration: f64) -> usize {
    (f64::from(sample_rate) * duration).round() as usize
}

/// Builds tone and silence segments for a fixed sink layout.
#[derive(Debug, Clone)]
pub struct WaveformSynthesizer {
    sample_rate: u32,
    active: Vec<bool>,
}

impl WaveformSynthesizer {
    /// Indices in `channels` outside `0..number_of_channels` are ignored.
    pub fn new(
        sample_rate: u32,
        number_of_channels: usize,
        channels: &BTreeSet<usize>,
    ) -> Self {
        let mut synth = Self {
            sample_rate,
            active: vec![false; number_of_channels],
        };
        synth.set_channels(channels);
        synth
    }

    pub fn set_channels(&mut self, channels: &BTreeSet<usize>) {
        for (index, slot) in self.active.iter_mut().enumerate() {
            *slot = channels.contains(&index);
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn number_of_channels(&self) -> usize {
        self.active.len()
    }

    pub fn is_active(&self, channel: usize) -> bool {
        self.active.get(channel).copied().unwrap_or(false)
    }

    /// Sine tone starting at phase zero, placed on the active channels only.
    pub fn tone(&self, duration: f64, frequency: f64, volume: f64) -> ToneFrames<'_> {
        ToneFrames {
            active: &self.active,
            sample_rate: self.sample_rate,
            frequency,
            volume,
            index: 0,
            count: frame_count(self.sample_rate, duration),
        }
    }

    pub fn silence(&self, duration: f64) -> SilenceFrames {
        SilenceFrames {
            channels: self.active.len(),
            remaining: frame_count(self.sample_rate, duration),
        }
    }
}

/// Iterator over the frames of one tone segment.
#[derive(Debug)]
pub struct ToneFrames<'a> {
    active: &'a [bool],
    sample_rate: u32,
    frequency: f64,
    volume: f64,
    index: usize,
    count: usize,
}

impl Iterator for ToneFrames<'_> {
    type Item = SampleFrame;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }

        let phase = 2.0 * PI * self.frequency * self.index as f64 / f64::from(self.sample_rate);
        let level = (self.volume * phase.sin()) as f32;
        self.index += 1;

        let samples = self
            .active
            .iter()
            .map(|&on| if on { level } else { 0.0 })
            .collect();
        Some(SampleFrame::new(samples))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.count - self.index;
        (left, Some(left))
    }
}

impl ExactSizeIterator for ToneFrames<'_> {}

/// Iterator over the all-zero frames of one silence segment.
#[derive(Debug)]
pub struct SilenceFrames {
    channels: usize,
    remaining: usize,
}

impl Iterator for SilenceFrames {
    type Item = SampleFrame;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(SampleFrame::silent(self.channels))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for SilenceFrames {}
