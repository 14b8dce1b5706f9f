mod wav;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use morse_wave_core::{AppConfig, Catalogue, MorseEncoder, ProceduralSignal};
use tracing_subscriber::EnvFilter;

use crate::wav::WavSink;

fn main() -> morse_wave_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Encode { text, render } => run_encode(&text, &render),
        Commands::Signal { name, render } => run_signal(&name, &render),
        Commands::Tables => print_tables(),
    }
}

fn run_encode(text: &str, render: &RenderArgs) -> morse_wave_core::Result<()> {
    tracing::info!(output = ?render.output, chars = text.chars().count(), "encoding text");
    render_to_wav(render, |encoder| encoder.text(text).map(|_| ()))
}

fn run_signal(name: &str, render: &RenderArgs) -> morse_wave_core::Result<()> {
    let signal: ProceduralSignal = name.parse()?;
    tracing::info!(output = ?render.output, signal = signal.name(), "encoding procedural signal");
    render_to_wav(render, |encoder| encoder.procedural(signal).map(|_| ()))
}

fn print_tables() -> morse_wave_core::Result<()> {
    println!("{}", serde_json::to_string_pretty(&Catalogue::new())?);
    Ok(())
}

fn render_to_wav<F>(render: &RenderArgs, emit: F) -> morse_wave_core::Result<()>
where
    F: FnOnce(&mut MorseEncoder<WavSink>) -> morse_wave_core::Result<()>,
{
    let config = resolve_config(render)?;
    let sink = WavSink::create(&render.output, &config.output)?;
    let mut encoder = MorseEncoder::with_config(sink, config.encoder)?;

    emit(&mut encoder)?;

    let timings = encoder.timings();
    encoder.into_sink().finalize()?;
    tracing::info!(
        output = ?render.output,
        dot = timings.dot,
        dash = timings.dash,
        space = timings.space,
        "wrote wav file"
    );
    Ok(())
}

fn resolve_config(render: &RenderArgs) -> morse_wave_core::Result<AppConfig> {
    let mut config = match &render.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    if let Some(wpm) = render.wpm {
        config.encoder.wpm = wpm;
    }
    if let Some(tone) = render.tone {
        config.encoder.tone = tone;
    }
    if let Some(volume) = render.volume {
        config.encoder.volume = volume;
    }
    if render.short_numbers {
        config.encoder.short_numbers = true;
    }
    if !render.channel.is_empty() {
        config.encoder.channels = render.channel.iter().copied().collect();
    }
    if let Some(sample_rate) = render.sample_rate {
        config.output.sample_rate = sample_rate;
    }
    if let Some(channels) = render.channels {
        config.output.channels = channels;
    }
    if let Some(bits) = render.bits {
        config.output.bits_per_sample = bits;
    }

    config.validate()?;
    Ok(config)
}

fn load_config(path: &Path) -> morse_wave_core::Result<AppConfig> {
    tracing::debug!(?path, "loading configuration");
    AppConfig::load(path)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Render text as Morse code audio", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode text, including `<NAME>` procedural escapes, into a WAV file.
    Encode {
        /// Text to send.
        text: String,
        #[command(flatten)]
        render: RenderArgs,
    },
    /// Encode a single procedural signal such as `SOS` or `AR`.
    Signal {
        /// Procedural character name, case-insensitive.
        name: String,
        #[command(flatten)]
        render: RenderArgs,
    },
    /// Print the code tables as JSON.
    Tables,
}

#[derive(Args, Debug, Default)]
struct RenderArgs {
    /// Output WAV file.
    #[arg(short, long)]
    output: PathBuf,
    /// JSON configuration file; flags override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Speed in words per minute.
    #[arg(long)]
    wpm: Option<f64>,
    /// Tone frequency in Hz.
    #[arg(long)]
    tone: Option<f64>,
    #[arg(long)]
    volume: Option<f64>,
    /// Send digits as cut numbers.
    #[arg(long)]
    short_numbers: bool,
    /// Channel carrying the tone. Repeat for several channels.
    #[arg(long = "channel")]
    channel: Vec<usize>,
    #[arg(long)]
    sample_rate: Option<u32>,
    /// Number of channels in the WAV file.
    #[arg(long)]
    channels: Option<u16>,
    /// 16 for integer PCM, 32 for float.
    #[arg(long)]
    bits: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let render = RenderArgs {
            wpm: Some(30.0),
            channel: vec![0, 1],
            channels: Some(2),
            short_numbers: true,
            ..RenderArgs::default()
        };
        let config = resolve_config(&render).unwrap();
        assert_eq!(config.encoder.wpm, 30.0);
        assert!(config.encoder.short_numbers);
        assert_eq!(config.encoder.channels.len(), 2);
        assert_eq!(config.output.channels, 2);
        assert_eq!(config.output.sample_rate, 44_100);
    }

    #[test]
    fn invalid_overrides_are_rejected() {
        let render = RenderArgs {
            bits: Some(24),
            ..RenderArgs::default()
        };
        assert!(resolve_config(&render).is_err());
    }

    #[test]
    fn cli_parses_encode() {
        let cli = Cli::try_parse_from([
            "morse-wave",
            "encode",
            "cq <kn>",
            "--output",
            "out.wav",
            "--channel",
            "1",
            "--wpm",
            "25",
        ])
        .unwrap();
        match cli.command {
            Commands::Encode { text, render } => {
                assert_eq!(text, "cq <kn>");
                assert_eq!(render.channel, vec![1]);
                assert_eq!(render.wpm, Some(25.0));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn renders_signal_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let render = RenderArgs {
            output: dir.path().join("sos.wav"),
            sample_rate: Some(1000),
            ..RenderArgs::default()
        };
        run_signal("sos", &render).unwrap();

        let reader = hound::WavReader::open(&render.output).unwrap();
        // Nine symbols: 6 dots and 3 dashes, 8 dot gaps and a final dash gap.
        assert_eq!(reader.len(), 6 * 60 + 3 * 180 + 8 * 60 + 180);
    }

    #[test]
    fn unknown_signal_name_fails() {
        let render = RenderArgs::default();
        assert!(run_signal("zz", &render).is_err());
    }
}
