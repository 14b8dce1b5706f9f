use std::collections::BTreeSet;

use crate::{
    AudioSink, DerivedTimings, EmissionUnit, EncoderConfig, MorseCode, MorseError, MorseSymbol,
    ProceduralSignal, Result, TextParser, WaveformSynthesizer,
};

/// Streams Morse code for text and procedural signals into an [`AudioSink`].
///
/// Sample rate and channel count are read from the sink once, at
/// construction. Every emitting call writes its segments straight to the
/// sink; when a call fails, segments already written stay written.
#[derive(Debug)]
pub struct MorseEncoder<S: AudioSink> {
    sink: S,
    synth: WaveformSynthesizer,
    config: EncoderConfig,
    timings: DerivedTimings,
}

impl<S: AudioSink> MorseEncoder<S> {
    /// Creates an encoder with default speed, tone and volume that keys the
    /// given channels.
    pub fn new(sink: S, channels: impl IntoIterator<Item = usize>) -> Result<Self> {
        let config = EncoderConfig {
            channels: channels.into_iter().collect(),
            ..EncoderConfig::default()
        };
        Self::with_config(sink, config)
    }

    pub fn with_config(sink: S, config: EncoderConfig) -> Result<Self> {
        if !sink.is_writable() {
            return Err(MorseError::SinkNotWritable);
        }

        let sample_rate = sink.sample_rate();
        let number_of_channels = sink.number_of_channels();
        tracing::debug!(
            sample_rate,
            number_of_channels,
            wpm = config.wpm,
            tone = config.tone,
            "creating morse encoder"
        );

        Ok(Self {
            synth: WaveformSynthesizer::new(sample_rate, number_of_channels, &config.channels),
            timings: DerivedTimings::from_wpm(config.wpm),
            config,
            sink,
        })
    }

    pub fn with_wpm(mut self, wpm: f64) -> Self {
        self.set_wpm(wpm);
        self
    }

    pub fn with_tone(mut self, tone: f64) -> Self {
        self.set_tone(tone);
        self
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.set_volume(volume);
        self
    }

    pub fn wpm(&self) -> f64 {
        self.config.wpm
    }

    /// Changes the speed and recomputes the derived timings.
    pub fn set_wpm(&mut self, wpm: f64) -> &mut Self {
        self.config.wpm = wpm;
        self.timings = DerivedTimings::from_wpm(wpm);
        tracing::trace!(wpm, timings = ?self.timings, "recomputed timings");
        self
    }

    pub fn tone(&self) -> f64 {
        self.config.tone
    }

    pub fn set_tone(&mut self, tone: f64) -> &mut Self {
        self.config.tone = tone;
        self
    }

    pub fn volume(&self) -> f64 {
        self.config.volume
    }

    pub fn set_volume(&mut self, volume: f64) -> &mut Self {
        self.config.volume = volume;
        self
    }

    pub fn short_numbers(&self) -> bool {
        self.config.short_numbers
    }

    pub fn set_short_numbers(&mut self, short_numbers: bool) -> &mut Self {
        self.config.short_numbers = short_numbers;
        self
    }

    pub fn channels(&self) -> &BTreeSet<usize> {
        &self.config.channels
    }

    pub fn set_channels(&mut self, channels: impl IntoIterator<Item = usize>) -> &mut Self {
        self.config.channels = channels.into_iter().collect();
        self.synth.set_channels(&self.config.channels);
        self
    }

    pub fn timings(&self) -> DerivedTimings {
        self.timings
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    pub fn sample_rate(&self) -> u32 {
        self.synth.sample_rate()
    }

    pub fn number_of_channels(&self) -> usize {
        self.synth.number_of_channels()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Encodes `text`, including `<NAME>` procedural escapes.
    pub fn text(&mut self, text: &str) -> Result<&mut Self> {
        let mut units = 0usize;
        for unit in TextParser::new(text, self.config.short_numbers) {
            match unit? {
                EmissionUnit::WordSpace => self.send_silence(self.timings.space)?,
                EmissionUnit::Code(code) => self.send_code(code)?,
            }
            units += 1;
        }
        tracing::debug!(units, "encoded text");
        Ok(self)
    }

    /// Emits one inter-word silence.
    pub fn space(&mut self) -> Result<&mut Self> {
        self.send_silence(self.timings.space)?;
        Ok(self)
    }

    pub fn procedural(&mut self, signal: ProceduralSignal) -> Result<&mut Self> {
        self.send_code(signal.code())?;
        Ok(self)
    }

    /// `AR`
    pub fn end_of_message(&mut self) -> Result<&mut Self> {
        self.procedural(ProceduralSignal::EndOfMessage)
    }

    /// `AS`
    pub fn wait(&mut self) -> Result<&mut Self> {
        self.procedural(ProceduralSignal::Wait)
    }

    /// `BK`
    pub fn break_in(&mut self) -> Result<&mut Self> {
        self.procedural(ProceduralSignal::BreakIn)
    }

    /// `EC`
    pub fn end_copy(&mut self) -> Result<&mut Self> {
        self.procedural(ProceduralSignal::EndCopy)
    }

    /// `HH`
    pub fn correction(&mut self) -> Result<&mut Self> {
        self.procedural(ProceduralSignal::Correction)
    }

    /// `KA`
    pub fn attention(&mut self) -> Result<&mut Self> {
        self.procedural(ProceduralSignal::Attention)
    }

    /// `KN`
    pub fn go_ahead(&mut self) -> Result<&mut Self> {
        self.procedural(ProceduralSignal::GoAhead)
    }

    /// `RT`
    pub fn new_line(&mut self) -> Result<&mut Self> {
        self.procedural(ProceduralSignal::NewLine)
    }

    /// `SK`
    pub fn silent_key(&mut self) -> Result<&mut Self> {
        self.procedural(ProceduralSignal::SilentKey)
    }

    pub fn sos(&mut self) -> Result<&mut Self> {
        self.procedural(ProceduralSignal::Sos)
    }

    /// `VE`
    pub fn verified(&mut self) -> Result<&mut Self> {
        self.procedural(ProceduralSignal::Verified)
    }

    // The gap after the last symbol is a dash long and doubles as the
    // inter-character gap.
    fn send_code(&mut self, code: MorseCode) -> Result<()> {
        let last = code.len().saturating_sub(1);
        for (index, symbol) in code.symbols().enumerate() {
            let length = match symbol {
                MorseSymbol::Dot => self.timings.dot,
                MorseSymbol::Dash => self.timings.dash,
            };
            self.send_tone(length)?;
            self.send_silence(if index == last {
                self.timings.dash
            } else {
                self.timings.dot
            })?;
        }
        Ok(())
    }

    fn send_tone(&mut self, length: f64) -> Result<()> {
        let mut frames = self
            .synth
            .tone(length, self.config.tone, self.config.volume);
        self.sink.write(&mut frames)
    }

    fn send_silence(&mut self, length: f64) -> Result<()> {
        self.sink.write(&mut self.synth.silence(length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tables, BufferSink};

    const DOT: usize = 60;
    const DASH: usize = 180;
    const SPACE: usize = 600;

    fn encoder(channels: usize) -> MorseEncoder<BufferSink> {
        MorseEncoder::new(BufferSink::new(1000, channels), [0]).unwrap()
    }

    fn expected_segments(code: &str) -> Vec<usize> {
        let last = code.len() - 1;
        code.bytes()
            .enumerate()
            .flat_map(|(i, b)| {
                let tone = if b == b'.' { DOT } else { DASH };
                [tone, if i == last { DASH } else { DOT }]
            })
            .collect()
    }

    #[test]
    fn defaults() {
        let enc = encoder(1);
        assert_eq!(enc.wpm(), 20.0);
        assert_eq!(enc.tone(), 700.0);
        assert_eq!(enc.volume(), 1.0);
        assert!(!enc.short_numbers());
        assert_eq!(enc.sample_rate(), 1000);
        assert_eq!(enc.number_of_channels(), 1);
    }

    #[test]
    fn every_letter_matches_its_table_entry() {
        for (letter, code) in tables::letters() {
            let mut upper = encoder(1);
            upper.text(&letter.to_string()).unwrap();
            assert_eq!(
                upper.sink().segments(),
                expected_segments(code.as_str()).as_slice(),
                "letter {letter}"
            );

            let mut lower = encoder(1);
            lower.text(&letter.to_ascii_lowercase().to_string()).unwrap();
            assert_eq!(lower.sink().frames(), upper.sink().frames());
        }
    }

    #[test]
    fn short_numbers_switch_digit_codes() {
        let mut enc = encoder(1);
        enc.text("1").unwrap();
        assert_eq!(enc.sink().segments(), expected_segments(".----").as_slice());

        enc.sink_mut().clear();
        enc.set_short_numbers(true).text("1").unwrap();
        assert_eq!(enc.sink().segments(), expected_segments(".-").as_slice());
    }

    #[test]
    fn bracket_escape_matches_shortcut() {
        let mut escaped = encoder(1);
        escaped.text("<SOS>").unwrap();
        let mut shortcut = encoder(1);
        shortcut.sos().unwrap();
        assert_eq!(escaped.sink().frames(), shortcut.sink().frames());
        assert_eq!(
            escaped.sink().segments(),
            expected_segments("...---...").as_slice()
        );
    }

    #[test]
    fn every_shortcut_emits_its_signal() {
        type Enc = MorseEncoder<BufferSink>;
        type Shortcut = fn(&mut Enc) -> Result<&mut Enc>;
        let shortcuts: [(Shortcut, &str); 11] = [
            (Enc::end_of_message, "AR"),
            (Enc::wait, "AS"),
            (Enc::break_in, "BK"),
            (Enc::end_copy, "EC"),
            (Enc::correction, "HH"),
            (Enc::attention, "KA"),
            (Enc::go_ahead, "KN"),
            (Enc::new_line, "RT"),
            (Enc::silent_key, "SK"),
            (Enc::sos, "SOS"),
            (Enc::verified, "VE"),
        ];
        for (shortcut, name) in shortcuts {
            let mut direct = encoder(1);
            shortcut(&mut direct).unwrap();
            let mut parsed = encoder(1);
            parsed.text(&format!("<{}>", name.to_lowercase())).unwrap();
            assert_eq!(direct.sink().frames(), parsed.sink().frames(), "{name}");
        }
    }

    #[test]
    fn unknown_procedural_character_fails() {
        let mut enc = encoder(1);
        let err = enc.text("<XY>").unwrap_err();
        assert!(matches!(err, MorseError::UnknownProceduralCharacter(ref n) if n == "XY"));
        assert!(enc.sink().frames().is_empty());
    }

    #[test]
    fn unterminated_escape_keeps_the_prefix() {
        let mut enc = encoder(1);
        let err = enc.text("A<AR").unwrap_err();
        assert!(matches!(err, MorseError::UnterminatedProceduralCharacter));
        assert_eq!(enc.sink().segments(), expected_segments(".-").as_slice());
    }

    #[test]
    fn unknown_character_fails_after_prefix() {
        let mut enc = encoder(1);
        let err = enc.text("E~").unwrap_err();
        assert!(matches!(err, MorseError::UnknownCharacter('~')));
        assert_eq!(enc.sink().frames().len(), DOT + DASH);
    }

    #[test]
    fn empty_text_emits_nothing() {
        let mut enc = encoder(2);
        enc.text("").unwrap();
        assert!(enc.sink().frames().is_empty());
        assert!(enc.sink().segments().is_empty());
    }

    #[test]
    fn spaces_emit_word_silence() {
        let mut enc = encoder(1);
        enc.text("E E").unwrap();
        assert_eq!(enc.sink().segments(), &[DOT, DASH, SPACE, DOT, DASH]);

        enc.sink_mut().clear();
        enc.space().unwrap();
        assert_eq!(enc.sink().segments(), &[SPACE]);
        assert!(enc.sink().channel(0).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn calls_chain() {
        let mut enc = encoder(1);
        enc.text("E").unwrap().space().unwrap().text("T").unwrap();
        assert_eq!(enc.sink().segments(), &[DOT, DASH, SPACE, DASH, DASH]);
    }

    #[test]
    fn doubling_speed_halves_segments() {
        let mut enc = encoder(1);
        enc.set_wpm(40.0).text("E E").unwrap();
        assert_eq!(
            enc.sink().segments(),
            &[DOT / 2, DASH / 2, SPACE / 2, DOT / 2, DASH / 2]
        );

        let slow = DerivedTimings::from_wpm(20.0);
        let fast = enc.timings();
        assert!((fast.dot * 2.0 - slow.dot).abs() < 1e-12);
        assert!((fast.dash * 2.0 - slow.dash).abs() < 1e-12);
        assert!((fast.space * 2.0 - slow.space).abs() < 1e-12);
    }

    #[test]
    fn inactive_channels_are_silent() {
        for total in 1..=4 {
            let mut enc = MorseEncoder::new(BufferSink::new(8000, total), [0]).unwrap();
            enc.text("K <VE>").unwrap();
            assert!(enc.sink().channel(0).iter().any(|&s| s != 0.0));
            for channel in 1..total {
                assert!(enc.sink().channel(channel).iter().all(|&s| s == 0.0));
            }
        }
    }

    #[test]
    fn set_channels_moves_the_tone() {
        let mut enc = encoder(2);
        enc.set_channels([1]).text("T").unwrap();
        assert!(enc.sink().channel(0).iter().all(|&s| s == 0.0));
        assert!(enc.sink().channel(1).iter().any(|&s| s != 0.0));
        assert_eq!(enc.channels(), &BTreeSet::from([1]));
    }

    #[test]
    fn volume_scales_amplitude() {
        let mut enc = encoder(1).with_volume(0.25).with_tone(250.0);
        enc.text("T").unwrap();
        let peak = enc
            .sink()
            .channel(0)
            .iter()
            .fold(0.0f32, |acc, &s| acc.max(s.abs()));
        assert!((peak - 0.25).abs() < 1e-6);
    }

    #[test]
    fn non_writable_sink_is_rejected() {
        let err = MorseEncoder::new(BufferSink::read_only(1000, 1), [0]).unwrap_err();
        assert!(matches!(err, MorseError::SinkNotWritable));
    }

    #[test]
    fn with_config_applies_every_field() {
        let config = EncoderConfig {
            wpm: 10.0,
            tone: 500.0,
            volume: 0.5,
            short_numbers: true,
            channels: BTreeSet::from([1]),
        };
        let enc = MorseEncoder::with_config(BufferSink::new(1000, 2), config.clone()).unwrap();
        assert_eq!(enc.config(), &config);
        assert_eq!(enc.timings(), DerivedTimings::from_wpm(10.0));
        assert_eq!(enc.into_sink().number_of_channels(), 2);
    }
}
