//! File-based effect rendering command.
//!
//! Every slot receives the same send (the input file) and sums into one
//! shared output bus laid out for the chosen speaker configuration, the way
//! a mixer's auxiliary slots feed the device mix.

use crate::commands::common::{linear_to_db, parse_key_val, peak, rms};
use crate::wav::{Audio, read_wav, write_wav};
use anyhow::Context;
use auxfx_config::{
    DeviceConfig, SessionConfig, SlotConfig, normalize_param_name, parse_param_value,
};
use auxfx_core::{BUFFER_LINE_SIZE, DeviceParams, MAX_INPUT_CHANNELS, buffer_lines};
use auxfx_registry::AuxSlot;
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file (the effect send)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Single effect to apply, by id (see `auxfx effects`)
    #[arg(short, long, conflicts_with = "session")]
    effect: Option<String>,

    /// Effect parameters (e.g., "delay=250ms")
    #[arg(long, value_parser = parse_key_val, number_of_values = 1, requires = "effect")]
    param: Vec<(String, String)>,

    /// Send gain for --effect (0 to 1)
    #[arg(long, default_value = "1.0")]
    gain: f32,

    /// Session file (TOML) listing the slots to render
    #[arg(short, long)]
    session: Option<PathBuf>,

    /// Output channel layout (mono, stereo, quad, 5.1, 6.1, 7.1)
    #[arg(short, long)]
    layout: Option<String>,

    /// Samples per process call (1 to 1024)
    #[arg(long, default_value = "1024")]
    block_size: usize,

    /// Seconds of silence rendered after the input so tails can ring out
    #[arg(long, default_value = "0")]
    tail: f32,

    /// Trim the slots' reported latency from the start of the output
    #[arg(long)]
    compensate_latency: bool,

    /// Write the effective session to this file
    #[arg(long)]
    save_session: Option<PathBuf>,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    println!("Reading {}...", args.input.display());
    let input = read_wav(&args.input)?;
    println!(
        "  {} frames, {} channel(s), {} Hz, {:.2}s",
        input.frames(),
        input.channels.len(),
        input.sample_rate,
        input.duration_secs()
    );

    let session = build_session(&args, input.sample_rate)?;
    session.validate()?;
    if let Some(path) = &args.save_session {
        session.save(path)?;
        println!("Saved session to {}", path.display());
    }

    let device = session.device.to_device_params()?;
    let send_channels = input.channels.len().clamp(1, MAX_INPUT_CHANNELS);
    if input.channels.len() > MAX_INPUT_CHANNELS {
        tracing::warn!(
            channels = input.channels.len(),
            used = MAX_INPUT_CHANNELS,
            "input has more channels than a send can carry"
        );
    }
    let mut slots = session.build_slots(send_channels)?;
    anyhow::ensure!(!slots.is_empty(), "session has no slots to render");

    let latency = slots.iter().map(AuxSlot::latency_samples).max().unwrap_or(0);
    let tail = (args.tail.max(0.0) * device.frequency()) as usize;
    println!(
        "Rendering {} slot(s) to {} ({} channel(s), latency {} samples)...",
        slots.len(),
        device.layout.name(),
        device.layout.channel_count(),
        latency
    );

    let output = if args.compensate_latency {
        let mut output = render(&mut slots, &input, device, args.block_size, tail + latency);
        for channel in &mut output.channels {
            channel.drain(..latency.min(channel.len()));
        }
        output
    } else {
        render(&mut slots, &input, device, args.block_size, tail)
    };

    let all_in: Vec<f32> = input.channels.concat();
    let all_out: Vec<f32> = output.channels.concat();
    println!("\nStats:");
    println!(
        "  Input:  RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(rms(&all_in)),
        linear_to_db(peak(&all_in))
    );
    println!(
        "  Output: RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(rms(&all_out)),
        linear_to_db(peak(&all_out))
    );

    println!("\nWriting {}...", args.output.display());
    write_wav(&args.output, &output, args.bit_depth)?;
    println!("Done!");

    Ok(())
}

/// Builds the session to render from either `--session` or `--effect`.
///
/// The device always runs at the input file's sample rate; `--layout`
/// overrides the session's layout.
fn build_session(args: &ProcessArgs, sample_rate: u32) -> anyhow::Result<SessionConfig> {
    let mut session = if let Some(path) = &args.session {
        SessionConfig::load(path).with_context(|| format!("loading session {}", path.display()))?
    } else if let Some(effect) = &args.effect {
        let mut slot = SlotConfig::new(effect.as_str()).with_gain(args.gain);
        for (name, value) in &args.param {
            let value = parse_param_value(name, value)?;
            slot = slot.with_param(normalize_param_name(name), value);
        }
        SessionConfig::new(DeviceConfig::default()).with_slot(slot)
    } else {
        anyhow::bail!("No effect specified. Use --effect or --session");
    };

    if session.device.sample_rate != sample_rate {
        if args.session.is_some() {
            tracing::warn!(
                session = session.device.sample_rate,
                file = sample_rate,
                "session sample rate differs from the input; rendering at the input rate"
            );
        }
        session.device.sample_rate = sample_rate;
    }
    if let Some(layout) = &args.layout {
        session.device.layout.clone_from(layout);
    }
    Ok(session)
}

/// Renders `input` plus `tail` frames of silence through every slot, summing
/// into one bus of `device.layout` channels.
pub fn render(
    slots: &mut [AuxSlot],
    input: &Audio,
    device: DeviceParams,
    block_size: usize,
    tail: usize,
) -> Audio {
    let out_channels = device.layout.channel_count();
    let in_channels = input.channels.len().clamp(1, MAX_INPUT_CHANNELS);
    let total = input.frames() + tail;
    let block = block_size.clamp(1, BUFFER_LINE_SIZE);

    let mut in_lines = buffer_lines(in_channels);
    let mut out_lines = buffer_lines(out_channels);
    let mut channels = vec![Vec::with_capacity(total); out_channels];

    let mut pos = 0;
    while pos < total {
        let todo = block.min(total - pos);
        for (line, channel) in in_lines.iter_mut().zip(&input.channels) {
            for (i, sample) in line[..todo].iter_mut().enumerate() {
                *sample = channel.get(pos + i).copied().unwrap_or(0.0);
            }
        }
        for line in &mut out_lines {
            line[..todo].fill(0.0);
        }
        for slot in slots.iter_mut() {
            slot.process(todo, &in_lines, &mut out_lines);
        }
        for (channel, line) in channels.iter_mut().zip(&out_lines) {
            channel.extend_from_slice(&line[..todo]);
        }
        pos += todo;
    }

    Audio {
        channels,
        sample_rate: device.sample_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auxfx_core::ChannelLayout;

    fn impulse(frames: usize) -> Audio {
        let mut channel = vec![0.0; frames];
        channel[0] = 1.0;
        Audio {
            channels: vec![channel],
            sample_rate: 48000,
        }
    }

    fn args(effect: Option<&str>, params: &[(&str, &str)]) -> ProcessArgs {
        ProcessArgs {
            input: PathBuf::from("in.wav"),
            output: PathBuf::from("out.wav"),
            effect: effect.map(str::to_string),
            param: params
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            gain: 0.5,
            session: None,
            layout: Some("mono".to_string()),
            block_size: 1024,
            tail: 0.0,
            compensate_latency: false,
            save_session: None,
            bit_depth: 32,
        }
    }

    #[test]
    fn test_session_from_effect_args() {
        let params = [("LR-Delay", "0"), ("delay", "50ms")];
        let session = build_session(&args(Some("echo"), &params), 44100).unwrap();
        assert_eq!(session.device.sample_rate, 44100);
        assert_eq!(session.device.layout, "mono");
        assert_eq!(session.slots.len(), 1);
        let slot = &session.slots[0];
        assert_eq!(slot.effect, "echo");
        assert_eq!(slot.gain, 0.5);
        assert_eq!(slot.params.get("lr_delay"), Some(&0.0));
        assert!((slot.params["delay"] - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_session_requires_an_effect() {
        assert!(build_session(&args(None, &[]), 48000).is_err());
        assert!(build_session(&args(Some("echo"), &[("delay", "later")]), 48000).is_err());
    }

    #[test]
    fn test_render_block_size_does_not_change_output() {
        let params = [("delay", "30ms"), ("lr_delay", "0")];
        let session = build_session(&args(Some("echo"), &params), 48000).unwrap();
        // Echoes land after the first block, once both gain fades are done.
        let input = impulse(4000);

        let mut a = session.build_slots(1).unwrap();
        let mut b = session.build_slots(1).unwrap();
        let device = session.device.to_device_params().unwrap();
        let whole = render(&mut a, &input, device, 1024, 0);
        let pieces = render(&mut b, &input, device, 100, 0);
        assert_eq!(whole.channels[0].len(), 4000);
        assert_eq!(whole.channels[0].len(), pieces.channels[0].len());
        for (x, y) in whole.channels[0].iter().zip(&pieces.channels[0]) {
            assert!((x - y).abs() < 1e-5);
        }
        assert!(whole.channels[0].iter().any(|&s| s != 0.0));
    }

    #[test]
    fn test_render_tail_and_layout() {
        let device = DeviceParams::new(48000, ChannelLayout::Surround51);
        let mut slots = vec![AuxSlot::new(device, 1).unwrap()];
        let out = render(&mut slots, &impulse(10), device, 1024, 90);
        assert_eq!(out.channels.len(), 6);
        assert!(out.channels.iter().all(|c| c.len() == 100));
        // The null effect adds nothing.
        assert!(out.channels.iter().flatten().all(|&s| s == 0.0));
    }
}
