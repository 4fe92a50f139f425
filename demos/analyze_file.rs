//! Example: Detect beats and estimate the tempo of a WAV file
//!
//! Usage:
//!   cargo run --release --example analyze_file -- [--json] [--min BPM] [--max BPM] <file.wav>
//!
//! The file must be 16-bit PCM. Mono files are duplicated to both channels.

use std::env;
use stratum_beat::io::pad_to_even;
use stratum_beat::{detect_beats, estimate_bpm, BpmConfig, SpectralConfig};

fn load_wav(path: &str) -> Result<(Vec<i16>, u32), Box<dyn std::error::Error>> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(format!("{}: only 16-bit PCM is supported", path).into());
    }

    let samples = reader.samples::<i16>().collect::<Result<Vec<_>, _>>()?;
    let stereo = match spec.channels {
        1 => samples.iter().flat_map(|&s| [s, s]).collect(),
        2 => samples,
        n => return Err(format!("{}: unsupported channel count {}", path, n).into()),
    };
    Ok((pad_to_even(stereo), spec.sample_rate))
}

fn parse_bpm(value: Option<String>, flag: &str) -> Result<f32, Box<dyn std::error::Error>> {
    let value = value.ok_or_else(|| format!("{} requires a value", flag))?;
    Ok(value.parse()?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut json = false;
    let mut config = BpmConfig::driver_default();
    let mut path: Option<String> = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--min" => config.min_bpm = parse_bpm(args.next(), "--min")?,
            "--max" => config.max_bpm = parse_bpm(args.next(), "--max")?,
            "-h" | "--help" => {
                println!(
                    "Usage: analyze_file [--json] [--min BPM] [--max BPM] <file.wav>\n\
                     \n\
                     --json     Emit both reports as one JSON object\n\
                     --min BPM  Lower bound of the tempo search (default: 90)\n\
                     --max BPM  Upper bound of the tempo search (default: 180)\n"
                );
                return Ok(());
            }
            _ => path = Some(arg),
        }
    }

    let path = path.ok_or("No input file given (see --help)")?;
    let (samples, sample_rate) = load_wav(&path)?;

    let beats = detect_beats(&samples, sample_rate, SpectralConfig::default())?;
    let tempo = estimate_bpm(&samples, sample_rate, config)?;

    if json {
        println!(
            "{{\"path\":{},\"spectral\":{},\"tempo\":{}}}",
            serde_json::to_string(&path)?,
            serde_json::to_string(&beats)?,
            serde_json::to_string(&tempo)?
        );
        return Ok(());
    }

    println!("Analysis Results ({}):", path);
    println!("  Duration: {:.2} s at {} Hz", tempo.metadata.duration_seconds, sample_rate);
    println!("  Spectral beats: {}", beats.timeline.len());
    println!(
        "  BPM: {:.1} (1-BPM contest: {}, running estimate: {:.2})",
        tempo.bpm(),
        tempo.winning_bpm_lo,
        tempo.current_bpm
    );
    println!("  Beat ticks: {}", tempo.timeline.len());
    for event in tempo.timeline.iter().take(16) {
        println!("    {:>8.3} s  (frequency {:.3})", event.time_seconds, event.frequency);
    }
    println!(
        "  Processing time: {:.2} ms + {:.2} ms",
        beats.metadata.processing_time_ms, tempo.metadata.processing_time_ms
    );

    Ok(())
}
