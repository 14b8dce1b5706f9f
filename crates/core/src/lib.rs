//! Core library for turning text into Morse code audio.
//!
//! Text is parsed into Morse codes using static tables, timed from a
//! words-per-minute speed and synthesized into per-channel sample frames that
//! are streamed into an [`AudioSink`]. Writing those frames to a file is left
//! to the sink implementation.

pub mod config;
pub mod encoder;
pub mod error;
pub mod parser;
pub mod sink;
pub mod synth;
pub mod tables;
pub mod timing;

pub use config::{AppConfig, EncoderConfig, OutputConfig};
pub use encoder::MorseEncoder;
pub use error::{MorseError, Result};
pub use parser::{EmissionUnit, TextParser};
pub use sink::{AudioSink, BufferSink};
pub use synth::{frame_count, SampleFrame, SilenceFrames, ToneFrames, WaveformSynthesizer};
pub use tables::{Catalogue, MorseCode, MorseSymbol, ProceduralSignal};
pub use timing::DerivedTimings;
