use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};
use morse_wave_core::{AudioSink, MorseError, OutputConfig, Result, SampleFrame};

/// WAV file sink. Float frames are written as-is for 32-bit output and scaled
/// to signed integers for 16-bit output.
pub struct WavSink {
    writer: Option<WavWriter<BufWriter<File>>>,
    spec: WavSpec,
}

impl WavSink {
    pub fn create(path: impl AsRef<Path>, output: &OutputConfig) -> Result<Self> {
        output.validate()?;
        let spec = WavSpec {
            channels: output.channels,
            sample_rate: output.sample_rate,
            bits_per_sample: output.bits_per_sample,
            sample_format: if output.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        };
        let writer = WavWriter::create(path, spec).map_err(wav_error)?;
        Ok(Self {
            writer: Some(writer),
            spec,
        })
    }

    /// Flushes the header and closes the file. The sink is not writable
    /// afterwards.
    pub fn finalize(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.take() {
            writer.finalize().map_err(wav_error)?;
        }
        Ok(())
    }
}

impl AudioSink for WavSink {
    fn is_writable(&self) -> bool {
        self.writer.is_some()
    }

    fn sample_rate(&self) -> u32 {
        self.spec.sample_rate
    }

    fn number_of_channels(&self) -> usize {
        usize::from(self.spec.channels)
    }

    fn write(&mut self, frames: &mut dyn Iterator<Item = SampleFrame>) -> Result<()> {
        let format = self.spec.sample_format;
        let writer = self.writer.as_mut().ok_or(MorseError::SinkNotWritable)?;
        for frame in frames {
            for &sample in frame.samples() {
                let written = match format {
                    SampleFormat::Float => writer.write_sample(sample),
                    SampleFormat::Int => writer.write_sample(to_i16(sample)),
                };
                written.map_err(wav_error)?;
            }
        }
        Ok(())
    }
}

fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)).round() as i16
}

fn wav_error(err: hound::Error) -> MorseError {
    match err {
        hound::Error::IoError(io) => MorseError::Io(io),
        other => MorseError::sink(other.to_string()),
    }
}
