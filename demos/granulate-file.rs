//! Granulates a mono recording, stretches or compresses its timeline and writes the
//! reconstructed signal into a 32-bit float wav file.
//!
//! Accepts wav files or raw little-endian `f32` PCM data at 44100 Hz (`.raw`, `.bytes`).

use std::{
    error::Error,
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use arg::{parse_args, Args};
use byteorder::{ByteOrder, LittleEndian};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use grainstretch::{utils::buffer::buffer_rms, utils::linear_to_db, GrainParameters, Grainer};

// -------------------------------------------------------------------------------------------------

const DEFAULT_LOG_LEVEL: log::Level = if cfg!(debug_assertions) {
    log::Level::Debug
} else {
    log::Level::Warn
};

const DEFAULT_OUTPUT_PATH: &str = "granulated.wav";

// -------------------------------------------------------------------------------------------------

/// Program arguments.
#[derive(Args, Debug, Default)]
struct Arguments {
    #[arg(short = "o", long = "output")]
    /// Path of the wav file to write. By default \"granulated.wav\".
    output_path: Option<PathBuf>,
    #[arg(short = "w", long = "width")]
    /// Grain width in seconds. By default 0.2.
    width: Option<f32>,
    #[arg(short = "s", long = "stride")]
    /// Distance between grains in seconds. By default 0.1.
    stride: Option<f32>,
    #[arg(short = "t", long = "scale")]
    /// Time scale factor for the grain positions. By default 1.5.
    scale: Option<f32>,
    #[arg(short = "g", long = "gain")]
    /// Output gain factor. By default 1.0.
    gain: Option<f32>,
    #[arg(short = "l", long = "log-level")]
    /// Set logging level to \"debug\", \"info\", \"warn\" or \"error\".
    /// By default \"debug\" in dev builds and \"warn\" in release builds.
    log_level: Option<log::Level>,
    /// Path of the wav or raw f32 file to granulate.
    input_path: PathBuf,
}

// -------------------------------------------------------------------------------------------------

fn main() -> Result<(), Box<dyn Error>> {
    let args = parse_args::<Arguments>();

    simple_logger::SimpleLogger::new()
        .with_level(args.log_level.unwrap_or(DEFAULT_LOG_LEVEL).to_level_filter())
        .init()?;

    let width = clamped("width", args.width.unwrap_or(0.2), GrainParameters::WIDTH_RANGE);
    let stride = clamped("stride", args.stride.unwrap_or(0.1), GrainParameters::STRIDE_RANGE);
    let scale = clamped("scale", args.scale.unwrap_or(1.5), GrainParameters::SCALE_RANGE);
    let gain = clamped("gain", args.gain.unwrap_or(1.0), GrainParameters::GAIN_RANGE);

    let (samples, sample_rate) = read_mono(&args.input_path)?;
    log::info!(
        "Loaded {} samples at {}Hz from '{}' ({:.2} dB RMS)",
        samples.len(),
        sample_rate,
        args.input_path.display(),
        linear_to_db(buffer_rms(&samples))
    );

    let mut grainer = Grainer::new();
    let parameters = GrainParameters::new(width, stride);
    let grain_count = grainer.granulate(&samples, sample_rate, &parameters)?;
    if grain_count == 0 {
        return Err("The input file contains no audio".into());
    }
    println!("Extracted {grain_count} grains");

    grainer.scale_grain_time(scale, false);
    let output = grainer.reconstruct_grains(gain)?;
    log::info!(
        "Reconstructed {} samples ({:.2} dB RMS)",
        output.len(),
        linear_to_db(buffer_rms(&output))
    );

    let output_path = args
        .output_path
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH));
    write_wav(&output_path, &output, sample_rate)?;
    println!(
        "Wrote {:.2}s of audio to '{}'",
        output.len() as f32 / sample_rate as f32,
        output_path.display()
    );

    Ok(())
}

// -------------------------------------------------------------------------------------------------

/// Clamp a user supplied value into its recommended range, warning when it gets changed.
fn clamped(name: &str, value: f32, range: std::ops::RangeInclusive<f32>) -> f32 {
    let clamped = value.clamp(*range.start(), *range.end());
    if clamped != value {
        log::warn!("{name} {value} is out of range {range:?}, using {clamped}");
    }
    clamped
}

// -------------------------------------------------------------------------------------------------

/// Read a mono sample buffer and its sample rate from a wav or raw f32 file.
/// Multi-channel wav files get mixed down.
fn read_mono(path: &Path) -> Result<(Vec<f32>, u32), Box<dyn Error>> {
    let is_wav = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));
    if is_wav {
        read_wav(path)
    } else {
        Ok((read_raw(path)?, grainstretch::DEFAULT_SAMPLE_RATE))
    }
}

fn read_wav(path: &Path) -> Result<(Vec<f32>, u32), Box<dyn Error>> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            let scale = 1.0 / (1u64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|value| value as f32 * scale))
                .collect::<Result<_, _>>()?
        }
    };
    let channel_count = spec.channels as usize;
    if channel_count > 1 {
        log::debug!("Mixing down {channel_count} channels to mono");
    }
    let mono = interleaved
        .chunks_exact(channel_count)
        .map(|frame| frame.iter().sum::<f32>() / channel_count as f32)
        .collect();
    Ok((mono, spec.sample_rate))
}

fn read_raw(path: &Path) -> Result<Vec<f32>, Box<dyn Error>> {
    let mut bytes = Vec::new();
    BufReader::new(File::open(path)?).read_to_end(&mut bytes)?;
    if bytes.len() % 4 != 0 {
        log::warn!(
            "Raw file '{}' has {} trailing bytes, ignoring them",
            path.display(),
            bytes.len() % 4
        );
    }
    let mut samples = vec![0.0f32; bytes.len() / 4];
    LittleEndian::read_f32_into(&bytes[..samples.len() * 4], &mut samples);
    Ok(samples)
}

fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<(), Box<dyn Error>> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for sample in samples {
        writer.write_sample(*sample)?;
    }
    writer.finalize()?;
    Ok(())
}
