//! Resolved effect parameters.
//!
//! One plain struct per effect family, plus the [`EffectProps`] union that
//! `update` receives. Defaults and ranges follow the EFX conventions; values
//! reaching `update` are assumed to be in range (the configuration layer
//! validates them against [`ParameterInfo`]).
//!
//! ## Parameter ranges
//!
//! | Effect | Parameter | Range | Default |
//! |--------|-----------|-------|---------|
//! | Chorus | delay | 0 - 0.016 s | 0.016 s |
//! | Flanger | delay | 0 - 0.004 s | 0.002 s |
//! | Echo | delay / lr_delay | 0 - 0.207 s / 0 - 0.404 s | 0.1 s / 0.1 s |
//! | Distortion | edge / gain | 0 - 1 / 0.01 - 1 | 0.2 / 0.05 |
//! | Equalizer | band gains | -18 - +18 dB | 0 dB |
//! | Ring modulator | frequency | 0 - 8000 Hz | 440 Hz |
//! | Autowah | peak_gain | 0.00003 - 31621 | 11.22 |
//! | Frequency shifter | frequency | 0 - 24000 Hz | 0 Hz |
//! | Pitch shifter | coarse / fine | -12 - 12 st / -50 - 50 ct | 12 / 0 |

use crate::param_info::{ParamDescriptor, ParamUnit, ParameterInfo};

/// Implements index conversion for an enumerated parameter.
macro_rules! choice {
    ($ty:ident { $($variant:ident),+ $(,)? }) => {
        impl $ty {
            /// All variants, in parameter-index order.
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// Variant for a stepped parameter value (clamped to the last variant).
            pub fn from_index(value: f32) -> Self {
                let index = (value.max(0.0).round() as usize).min(Self::ALL.len() - 1);
                Self::ALL[index]
            }

            /// Parameter value for this variant.
            pub fn index(self) -> f32 {
                Self::ALL.iter().position(|&v| v == self).unwrap_or(0) as f32
            }
        }
    };
}

/// LFO shape for chorus and flanger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChorusWaveform {
    /// Sine LFO
    Sinusoid,
    /// Triangle LFO
    #[default]
    Triangle,
}
choice!(ChorusWaveform { Sinusoid, Triangle });

/// Carrier shape for the ring modulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModulatorWaveform {
    /// Sine carrier
    #[default]
    Sinusoid,
    /// Rising sawtooth carrier
    Sawtooth,
    /// Square carrier
    Square,
}
choice!(ModulatorWaveform { Sinusoid, Sawtooth, Square });

/// Direction of one frequency-shifter output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShiftDirection {
    /// Shift spectrum down
    #[default]
    Down,
    /// Shift spectrum up
    Up,
    /// No shift
    Off,
}
choice!(ShiftDirection { Down, Up, Off });

/// Vowel whose formants the vocal morpher imposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phoneme {
    /// "ah"
    #[default]
    A,
    /// "eh"
    E,
    /// "ee"
    I,
    /// "oh"
    O,
    /// "oo"
    U,
}
choice!(Phoneme { A, E, I, O, U });

/// Blend LFO shape for the vocal morpher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MorpherWaveform {
    /// Sine LFO
    #[default]
    Sinusoid,
    /// Triangle LFO
    Triangle,
    /// Sawtooth LFO
    Sawtooth,
}
choice!(MorpherWaveform { Sinusoid, Triangle, Sawtooth });

/// Chorus and flanger parameters. Flanger uses the same fields with a
/// shorter delay range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChorusProps {
    /// LFO shape.
    pub waveform: ChorusWaveform,
    /// Right-channel LFO phase offset in degrees (-180 to 180).
    pub phase: i32,
    /// LFO rate in Hz (0 to 10).
    pub rate: f32,
    /// Modulation depth relative to the delay (0 to 1).
    pub depth: f32,
    /// Feedback amount (-1 to 1).
    pub feedback: f32,
    /// Base delay in seconds.
    pub delay: f32,
}

impl ChorusProps {
    /// Longest chorus delay in seconds.
    pub const CHORUS_MAX_DELAY: f32 = 0.016;
    /// Longest flanger delay in seconds.
    pub const FLANGER_MAX_DELAY: f32 = 0.004;

    /// Default chorus settings.
    pub const fn chorus() -> Self {
        Self {
            waveform: ChorusWaveform::Triangle,
            phase: 90,
            rate: 1.1,
            depth: 0.1,
            feedback: 0.25,
            delay: 0.016,
        }
    }

    /// Default flanger settings.
    pub const fn flanger() -> Self {
        Self {
            waveform: ChorusWaveform::Triangle,
            phase: 0,
            rate: 0.27,
            depth: 1.0,
            feedback: -0.5,
            delay: 0.002,
        }
    }

    fn descriptor(index: usize, max_delay: f32, defaults: &Self) -> Option<ParamDescriptor> {
        Some(match index {
            0 => ParamDescriptor::choice(
                "Waveform",
                "waveform",
                2,
                defaults.waveform.index() as usize,
            ),
            1 => ParamDescriptor::new(
                "Phase",
                "phase",
                ParamUnit::Degrees,
                -180.0,
                180.0,
                defaults.phase as f32,
            )
            .stepped(),
            2 => ParamDescriptor::new("Rate", "rate", ParamUnit::Hertz, 0.0, 10.0, defaults.rate),
            3 => ParamDescriptor::new("Depth", "depth", ParamUnit::None, 0.0, 1.0, defaults.depth),
            4 => ParamDescriptor::new(
                "Feedback",
                "feedback",
                ParamUnit::None,
                -1.0,
                1.0,
                defaults.feedback,
            ),
            5 => ParamDescriptor::new(
                "Delay",
                "delay",
                ParamUnit::Seconds,
                0.0,
                max_delay,
                defaults.delay,
            ),
            _ => return None,
        })
    }

    fn get(&self, index: usize) -> f32 {
        match index {
            0 => self.waveform.index(),
            1 => self.phase as f32,
            2 => self.rate,
            3 => self.depth,
            4 => self.feedback,
            5 => self.delay,
            _ => 0.0,
        }
    }

    fn set(&mut self, index: usize, value: f32, max_delay: f32) {
        match index {
            0 => self.waveform = ChorusWaveform::from_index(value),
            1 => self.phase = value.round().clamp(-180.0, 180.0) as i32,
            2 => self.rate = value.clamp(0.0, 10.0),
            3 => self.depth = value.clamp(0.0, 1.0),
            4 => self.feedback = value.clamp(-1.0, 1.0),
            5 => self.delay = value.clamp(0.0, max_delay),
            _ => {}
        }
    }
}

impl Default for ChorusProps {
    fn default() -> Self {
        Self::chorus()
    }
}

/// Echo parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EchoProps {
    /// Delay of the first tap in seconds (0 to 0.207).
    pub delay: f32,
    /// Additional delay of the second tap in seconds (0 to 0.404).
    pub lr_delay: f32,
    /// High-frequency loss per repeat (0 to 0.99).
    pub damping: f32,
    /// Amount of the second tap fed back (0 to 1).
    pub feedback: f32,
    /// Stereo spread of the two taps (-1 to 1).
    pub spread: f32,
}

impl EchoProps {
    /// Longest first-tap delay in seconds.
    pub const MAX_DELAY: f32 = 0.207;
    /// Longest second-tap extra delay in seconds.
    pub const MAX_LR_DELAY: f32 = 0.404;
}

impl Default for EchoProps {
    fn default() -> Self {
        Self {
            delay: 0.1,
            lr_delay: 0.1,
            damping: 0.5,
            feedback: 0.5,
            spread: -1.0,
        }
    }
}

impl ParameterInfo for EchoProps {
    fn param_count(&self) -> usize {
        5
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        Some(match index {
            0 => ParamDescriptor::new(
                "Delay",
                "delay",
                ParamUnit::Seconds,
                0.0,
                Self::MAX_DELAY,
                0.1,
            ),
            1 => ParamDescriptor::new(
                "LR Delay",
                "lr_delay",
                ParamUnit::Seconds,
                0.0,
                Self::MAX_LR_DELAY,
                0.1,
            ),
            2 => ParamDescriptor::new("Damping", "damping", ParamUnit::None, 0.0, 0.99, 0.5),
            3 => ParamDescriptor::new("Feedback", "feedback", ParamUnit::None, 0.0, 1.0, 0.5),
            4 => ParamDescriptor::new("Spread", "spread", ParamUnit::None, -1.0, 1.0, -1.0),
            _ => return None,
        })
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.delay,
            1 => self.lr_delay,
            2 => self.damping,
            3 => self.feedback,
            4 => self.spread,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.delay = value.clamp(0.0, Self::MAX_DELAY),
            1 => self.lr_delay = value.clamp(0.0, Self::MAX_LR_DELAY),
            2 => self.damping = value.clamp(0.0, 0.99),
            3 => self.feedback = value.clamp(0.0, 1.0),
            4 => self.spread = value.clamp(-1.0, 1.0),
            _ => {}
        }
    }
}

/// Distortion parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistortionProps {
    /// Shape of the waveshaper (0 = clean, 1 = hardest).
    pub edge: f32,
    /// Output gain (0.01 to 1).
    pub gain: f32,
    /// Pre-shaper lowpass cutoff in Hz.
    pub lowpass_cutoff: f32,
    /// Post-shaper band-pass center in Hz.
    pub eq_center: f32,
    /// Post-shaper band-pass width in Hz.
    pub eq_bandwidth: f32,
}

impl Default for DistortionProps {
    fn default() -> Self {
        Self {
            edge: 0.2,
            gain: 0.05,
            lowpass_cutoff: 8000.0,
            eq_center: 3600.0,
            eq_bandwidth: 3600.0,
        }
    }
}

impl ParameterInfo for DistortionProps {
    fn param_count(&self) -> usize {
        5
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        Some(match index {
            0 => ParamDescriptor::new("Edge", "edge", ParamUnit::None, 0.0, 1.0, 0.2),
            1 => ParamDescriptor::new("Gain", "gain", ParamUnit::None, 0.01, 1.0, 0.05),
            2 => ParamDescriptor::new(
                "Lowpass Cutoff",
                "lowpass_cutoff",
                ParamUnit::Hertz,
                80.0,
                24000.0,
                8000.0,
            ),
            3 => ParamDescriptor::new(
                "EQ Center",
                "eq_center",
                ParamUnit::Hertz,
                80.0,
                24000.0,
                3600.0,
            ),
            4 => ParamDescriptor::new(
                "EQ Bandwidth",
                "eq_bandwidth",
                ParamUnit::Hertz,
                80.0,
                24000.0,
                3600.0,
            ),
            _ => return None,
        })
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.edge,
            1 => self.gain,
            2 => self.lowpass_cutoff,
            3 => self.eq_center,
            4 => self.eq_bandwidth,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.edge = value.clamp(0.0, 1.0),
            1 => self.gain = value.clamp(0.01, 1.0),
            2 => self.lowpass_cutoff = value.clamp(80.0, 24000.0),
            3 => self.eq_center = value.clamp(80.0, 24000.0),
            4 => self.eq_bandwidth = value.clamp(80.0, 24000.0),
            _ => {}
        }
    }
}

/// Four-band equalizer parameters. Gains are in dB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EqualizerProps {
    /// Low shelf gain in dB.
    pub low_gain: f32,
    /// Low shelf corner in Hz (50 to 800).
    pub low_cutoff: f32,
    /// First peaking band gain in dB.
    pub mid1_gain: f32,
    /// First peaking band center in Hz (200 to 3000).
    pub mid1_center: f32,
    /// First peaking band width in octaves (0.01 to 1).
    pub mid1_width: f32,
    /// Second peaking band gain in dB.
    pub mid2_gain: f32,
    /// Second peaking band center in Hz (1000 to 8000).
    pub mid2_center: f32,
    /// Second peaking band width in octaves (0.01 to 1).
    pub mid2_width: f32,
    /// High shelf gain in dB.
    pub high_gain: f32,
    /// High shelf corner in Hz (4000 to 16000).
    pub high_cutoff: f32,
}

impl Default for EqualizerProps {
    fn default() -> Self {
        Self {
            low_gain: 0.0,
            low_cutoff: 200.0,
            mid1_gain: 0.0,
            mid1_center: 500.0,
            mid1_width: 1.0,
            mid2_gain: 0.0,
            mid2_center: 3000.0,
            mid2_width: 1.0,
            high_gain: 0.0,
            high_cutoff: 6000.0,
        }
    }
}

const EQ_PARAMS: [ParamDescriptor; 10] = [
    ParamDescriptor::new("Low Gain", "low_gain", ParamUnit::Decibels, -18.0, 18.0, 0.0),
    ParamDescriptor::new("Low Cutoff", "low_cutoff", ParamUnit::Hertz, 50.0, 800.0, 200.0),
    ParamDescriptor::new("Mid1 Gain", "mid1_gain", ParamUnit::Decibels, -18.0, 18.0, 0.0),
    ParamDescriptor::new("Mid1 Center", "mid1_center", ParamUnit::Hertz, 200.0, 3000.0, 500.0),
    ParamDescriptor::new("Mid1 Width", "mid1_width", ParamUnit::Octaves, 0.01, 1.0, 1.0),
    ParamDescriptor::new("Mid2 Gain", "mid2_gain", ParamUnit::Decibels, -18.0, 18.0, 0.0),
    ParamDescriptor::new("Mid2 Center", "mid2_center", ParamUnit::Hertz, 1000.0, 8000.0, 3000.0),
    ParamDescriptor::new("Mid2 Width", "mid2_width", ParamUnit::Octaves, 0.01, 1.0, 1.0),
    ParamDescriptor::new("High Gain", "high_gain", ParamUnit::Decibels, -18.0, 18.0, 0.0),
    ParamDescriptor::new("High Cutoff", "high_cutoff", ParamUnit::Hertz, 4000.0, 16000.0, 6000.0),
];

impl ParameterInfo for EqualizerProps {
    fn param_count(&self) -> usize {
        EQ_PARAMS.len()
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        EQ_PARAMS.get(index).copied()
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.low_gain,
            1 => self.low_cutoff,
            2 => self.mid1_gain,
            3 => self.mid1_center,
            4 => self.mid1_width,
            5 => self.mid2_gain,
            6 => self.mid2_center,
            7 => self.mid2_width,
            8 => self.high_gain,
            9 => self.high_cutoff,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        let Some(desc) = EQ_PARAMS.get(index) else {
            return;
        };
        let value = desc.clamp(value);
        match index {
            0 => self.low_gain = value,
            1 => self.low_cutoff = value,
            2 => self.mid1_gain = value,
            3 => self.mid1_center = value,
            4 => self.mid1_width = value,
            5 => self.mid2_gain = value,
            6 => self.mid2_center = value,
            7 => self.mid2_width = value,
            8 => self.high_gain = value,
            _ => self.high_cutoff = value,
        }
    }
}

/// Compressor parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressorProps {
    /// Compression enabled.
    pub on: bool,
}

impl Default for CompressorProps {
    fn default() -> Self {
        Self { on: true }
    }
}

impl ParameterInfo for CompressorProps {
    fn param_count(&self) -> usize {
        1
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        (index == 0).then(|| ParamDescriptor::choice("On/Off", "on", 2, 1))
    }

    fn get_param(&self, index: usize) -> f32 {
        if index == 0 && self.on { 1.0 } else { 0.0 }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        if index == 0 {
            self.on = value >= 0.5;
        }
    }
}

/// Ring modulator parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModulatorProps {
    /// Carrier frequency in Hz (0 to 8000).
    pub frequency: f32,
    /// Input highpass cutoff in Hz (0 to 24000).
    pub high_pass_cutoff: f32,
    /// Carrier shape.
    pub waveform: ModulatorWaveform,
}

impl Default for ModulatorProps {
    fn default() -> Self {
        Self {
            frequency: 440.0,
            high_pass_cutoff: 800.0,
            waveform: ModulatorWaveform::Sinusoid,
        }
    }
}

impl ParameterInfo for ModulatorProps {
    fn param_count(&self) -> usize {
        3
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        Some(match index {
            0 => ParamDescriptor::new(
                "Frequency",
                "frequency",
                ParamUnit::Hertz,
                0.0,
                8000.0,
                440.0,
            ),
            1 => ParamDescriptor::new(
                "Highpass Cutoff",
                "high_pass_cutoff",
                ParamUnit::Hertz,
                0.0,
                24000.0,
                800.0,
            ),
            2 => ParamDescriptor::choice("Waveform", "waveform", 3, 0),
            _ => return None,
        })
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.frequency,
            1 => self.high_pass_cutoff,
            2 => self.waveform.index(),
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.frequency = value.clamp(0.0, 8000.0),
            1 => self.high_pass_cutoff = value.clamp(0.0, 24000.0),
            2 => self.waveform = ModulatorWaveform::from_index(value),
            _ => {}
        }
    }
}

/// Autowah parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutowahProps {
    /// Envelope attack time in seconds (0.0001 to 1).
    pub attack_time: f32,
    /// Envelope release time in seconds (0.0001 to 1).
    pub release_time: f32,
    /// Filter resonance (2 to 1000).
    pub resonance: f32,
    /// Input level driving the sweep (0.00003 to 31621).
    pub peak_gain: f32,
}

impl AutowahProps {
    /// Largest peak gain; the envelope is measured relative to it.
    pub const MAX_PEAK_GAIN: f32 = 31621.0;
}

impl Default for AutowahProps {
    fn default() -> Self {
        Self {
            attack_time: 0.06,
            release_time: 0.06,
            resonance: 1000.0,
            peak_gain: 11.22,
        }
    }
}

impl ParameterInfo for AutowahProps {
    fn param_count(&self) -> usize {
        4
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        Some(match index {
            0 => ParamDescriptor::new(
                "Attack",
                "attack_time",
                ParamUnit::Seconds,
                0.0001,
                1.0,
                0.06,
            ),
            1 => ParamDescriptor::new(
                "Release",
                "release_time",
                ParamUnit::Seconds,
                0.0001,
                1.0,
                0.06,
            ),
            2 => ParamDescriptor::new(
                "Resonance",
                "resonance",
                ParamUnit::None,
                2.0,
                1000.0,
                1000.0,
            ),
            3 => ParamDescriptor::new(
                "Peak Gain",
                "peak_gain",
                ParamUnit::None,
                0.00003,
                Self::MAX_PEAK_GAIN,
                11.22,
            ),
            _ => return None,
        })
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.attack_time,
            1 => self.release_time,
            2 => self.resonance,
            3 => self.peak_gain,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.attack_time = value.clamp(0.0001, 1.0),
            1 => self.release_time = value.clamp(0.0001, 1.0),
            2 => self.resonance = value.clamp(2.0, 1000.0),
            3 => self.peak_gain = value.clamp(0.00003, Self::MAX_PEAK_GAIN),
            _ => {}
        }
    }
}

/// Frequency shifter parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FshifterProps {
    /// Shift amount in Hz (0 to 24000).
    pub frequency: f32,
    /// Direction for the left output.
    pub left_direction: ShiftDirection,
    /// Direction for the right output.
    pub right_direction: ShiftDirection,
}

impl ParameterInfo for FshifterProps {
    fn param_count(&self) -> usize {
        3
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        Some(match index {
            0 => ParamDescriptor::new(
                "Frequency",
                "frequency",
                ParamUnit::Hertz,
                0.0,
                24000.0,
                0.0,
            ),
            1 => ParamDescriptor::choice("Left Direction", "left_direction", 3, 0),
            2 => ParamDescriptor::choice("Right Direction", "right_direction", 3, 0),
            _ => return None,
        })
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.frequency,
            1 => self.left_direction.index(),
            2 => self.right_direction.index(),
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.frequency = value.clamp(0.0, 24000.0),
            1 => self.left_direction = ShiftDirection::from_index(value),
            2 => self.right_direction = ShiftDirection::from_index(value),
            _ => {}
        }
    }
}

/// Pitch shifter parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PshifterProps {
    /// Shift in semitones (-12 to 12).
    pub coarse_tune: i32,
    /// Additional shift in cents (-50 to 50).
    pub fine_tune: i32,
}

impl PshifterProps {
    /// Pitch ratio `2^((coarse + fine/100) / 12)`.
    pub fn ratio(&self) -> f32 {
        libm::powf(2.0, (self.coarse_tune * 100 + self.fine_tune) as f32 / 1200.0)
    }
}

impl Default for PshifterProps {
    fn default() -> Self {
        Self {
            coarse_tune: 12,
            fine_tune: 0,
        }
    }
}

impl ParameterInfo for PshifterProps {
    fn param_count(&self) -> usize {
        2
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        Some(match index {
            0 => ParamDescriptor::new(
                "Coarse Tune",
                "coarse_tune",
                ParamUnit::Semitones,
                -12.0,
                12.0,
                12.0,
            )
            .stepped(),
            1 => ParamDescriptor::new(
                "Fine Tune",
                "fine_tune",
                ParamUnit::Cents,
                -50.0,
                50.0,
                0.0,
            )
            .stepped(),
            _ => return None,
        })
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.coarse_tune as f32,
            1 => self.fine_tune as f32,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.coarse_tune = value.round().clamp(-12.0, 12.0) as i32,
            1 => self.fine_tune = value.round().clamp(-50.0, 50.0) as i32,
            _ => {}
        }
    }
}

/// Vocal morpher parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VmorpherProps {
    /// First vowel.
    pub phoneme_a: Phoneme,
    /// First vowel transposition in semitones (-24 to 24).
    pub phoneme_a_coarse_tuning: i32,
    /// Second vowel.
    pub phoneme_b: Phoneme,
    /// Second vowel transposition in semitones (-24 to 24).
    pub phoneme_b_coarse_tuning: i32,
    /// Blend LFO shape.
    pub waveform: MorpherWaveform,
    /// Blend LFO rate in Hz (0 to 10).
    pub rate: f32,
}

impl Default for VmorpherProps {
    fn default() -> Self {
        Self {
            phoneme_a: Phoneme::A,
            phoneme_a_coarse_tuning: 0,
            phoneme_b: Phoneme::O,
            phoneme_b_coarse_tuning: 0,
            waveform: MorpherWaveform::Sinusoid,
            rate: 1.41,
        }
    }
}

impl ParameterInfo for VmorpherProps {
    fn param_count(&self) -> usize {
        6
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        Some(match index {
            0 => ParamDescriptor::choice("Phoneme A", "phoneme_a", Phoneme::ALL.len(), 0),
            1 => ParamDescriptor::new(
                "Phoneme A Tuning",
                "phoneme_a_coarse_tuning",
                ParamUnit::Semitones,
                -24.0,
                24.0,
                0.0,
            )
            .stepped(),
            2 => ParamDescriptor::choice("Phoneme B", "phoneme_b", Phoneme::ALL.len(), 3),
            3 => ParamDescriptor::new(
                "Phoneme B Tuning",
                "phoneme_b_coarse_tuning",
                ParamUnit::Semitones,
                -24.0,
                24.0,
                0.0,
            )
            .stepped(),
            4 => ParamDescriptor::choice("Waveform", "waveform", 3, 0),
            5 => ParamDescriptor::new("Rate", "rate", ParamUnit::Hertz, 0.0, 10.0, 1.41),
            _ => return None,
        })
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.phoneme_a.index(),
            1 => self.phoneme_a_coarse_tuning as f32,
            2 => self.phoneme_b.index(),
            3 => self.phoneme_b_coarse_tuning as f32,
            4 => self.waveform.index(),
            5 => self.rate,
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.phoneme_a = Phoneme::from_index(value),
            1 => self.phoneme_a_coarse_tuning = value.round().clamp(-24.0, 24.0) as i32,
            2 => self.phoneme_b = Phoneme::from_index(value),
            3 => self.phoneme_b_coarse_tuning = value.round().clamp(-24.0, 24.0) as i32,
            4 => self.waveform = MorpherWaveform::from_index(value),
            5 => self.rate = value.clamp(0.0, 10.0),
            _ => {}
        }
    }
}

/// Dedicated dialog/LFE parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DedicatedProps {
    /// Linear gain applied on top of the slot gain (0 to 16).
    pub gain: f32,
}

impl Default for DedicatedProps {
    fn default() -> Self {
        Self { gain: 1.0 }
    }
}

impl ParameterInfo for DedicatedProps {
    fn param_count(&self) -> usize {
        1
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        (index == 0).then(|| ParamDescriptor::new("Gain", "gain", ParamUnit::None, 0.0, 16.0, 1.0))
    }

    fn get_param(&self, index: usize) -> f32 {
        if index == 0 { self.gain } else { 0.0 }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        if index == 0 {
            self.gain = value.clamp(0.0, 16.0);
        }
    }
}

/// The effect variants an auxiliary slot can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectType {
    /// Produces no output.
    Null,
    /// Stereo modulated delay.
    Chorus,
    /// Short modulated delay with feedback.
    Flanger,
    /// Two-tap feedback delay.
    Echo,
    /// Oversampled waveshaper.
    Distortion,
    /// Four-band equalizer.
    Equalizer,
    /// Automatic gain control.
    Compressor,
    /// Ring modulator.
    RingModulator,
    /// Envelope-controlled peaking filter.
    Autowah,
    /// Single-sideband frequency shifter.
    FrequencyShifter,
    /// Phase-vocoder pitch shifter.
    PitchShifter,
    /// Two-vowel formant filter.
    VocalMorpher,
    /// Routes the send to the front-center speaker.
    DedicatedDialog,
    /// Routes the send to the LFE channel.
    DedicatedLfe,
}

impl EffectType {
    /// Every effect type.
    pub const ALL: [EffectType; 14] = [
        EffectType::Null,
        EffectType::Chorus,
        EffectType::Flanger,
        EffectType::Echo,
        EffectType::Distortion,
        EffectType::Equalizer,
        EffectType::Compressor,
        EffectType::RingModulator,
        EffectType::Autowah,
        EffectType::FrequencyShifter,
        EffectType::PitchShifter,
        EffectType::VocalMorpher,
        EffectType::DedicatedDialog,
        EffectType::DedicatedLfe,
    ];

    /// Stable identifier used in configuration files.
    pub const fn id(self) -> &'static str {
        match self {
            EffectType::Null => "null",
            EffectType::Chorus => "chorus",
            EffectType::Flanger => "flanger",
            EffectType::Echo => "echo",
            EffectType::Distortion => "distortion",
            EffectType::Equalizer => "equalizer",
            EffectType::Compressor => "compressor",
            EffectType::RingModulator => "ring_modulator",
            EffectType::Autowah => "autowah",
            EffectType::FrequencyShifter => "frequency_shifter",
            EffectType::PitchShifter => "pitch_shifter",
            EffectType::VocalMorpher => "vocal_morpher",
            EffectType::DedicatedDialog => "dedicated_dialog",
            EffectType::DedicatedLfe => "dedicated_lfe",
        }
    }

    /// Looks up a type by [`id`](Self::id).
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id)
    }
}

/// Parameters for one effect, tagged by variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectProps {
    /// No parameters.
    Null,
    /// Chorus parameters.
    Chorus(ChorusProps),
    /// Flanger parameters.
    Flanger(ChorusProps),
    /// Echo parameters.
    Echo(EchoProps),
    /// Distortion parameters.
    Distortion(DistortionProps),
    /// Equalizer parameters.
    Equalizer(EqualizerProps),
    /// Compressor parameters.
    Compressor(CompressorProps),
    /// Ring modulator parameters.
    RingModulator(ModulatorProps),
    /// Autowah parameters.
    Autowah(AutowahProps),
    /// Frequency shifter parameters.
    FrequencyShifter(FshifterProps),
    /// Pitch shifter parameters.
    PitchShifter(PshifterProps),
    /// Vocal morpher parameters.
    VocalMorpher(VmorpherProps),
    /// Dedicated dialog parameters.
    DedicatedDialog(DedicatedProps),
    /// Dedicated LFE parameters.
    DedicatedLfe(DedicatedProps),
}

impl EffectProps {
    /// Default parameters for `kind`.
    pub fn default_for(kind: EffectType) -> Self {
        match kind {
            EffectType::Null => EffectProps::Null,
            EffectType::Chorus => EffectProps::Chorus(ChorusProps::chorus()),
            EffectType::Flanger => EffectProps::Flanger(ChorusProps::flanger()),
            EffectType::Echo => EffectProps::Echo(EchoProps::default()),
            EffectType::Distortion => EffectProps::Distortion(DistortionProps::default()),
            EffectType::Equalizer => EffectProps::Equalizer(EqualizerProps::default()),
            EffectType::Compressor => EffectProps::Compressor(CompressorProps::default()),
            EffectType::RingModulator => EffectProps::RingModulator(ModulatorProps::default()),
            EffectType::Autowah => EffectProps::Autowah(AutowahProps::default()),
            EffectType::FrequencyShifter => EffectProps::FrequencyShifter(FshifterProps::default()),
            EffectType::PitchShifter => EffectProps::PitchShifter(PshifterProps::default()),
            EffectType::VocalMorpher => EffectProps::VocalMorpher(VmorpherProps::default()),
            EffectType::DedicatedDialog => EffectProps::DedicatedDialog(DedicatedProps::default()),
            EffectType::DedicatedLfe => EffectProps::DedicatedLfe(DedicatedProps::default()),
        }
    }

    /// Variant tag of these parameters.
    pub fn effect_type(&self) -> EffectType {
        match self {
            EffectProps::Null => EffectType::Null,
            EffectProps::Chorus(_) => EffectType::Chorus,
            EffectProps::Flanger(_) => EffectType::Flanger,
            EffectProps::Echo(_) => EffectType::Echo,
            EffectProps::Distortion(_) => EffectType::Distortion,
            EffectProps::Equalizer(_) => EffectType::Equalizer,
            EffectProps::Compressor(_) => EffectType::Compressor,
            EffectProps::RingModulator(_) => EffectType::RingModulator,
            EffectProps::Autowah(_) => EffectType::Autowah,
            EffectProps::FrequencyShifter(_) => EffectType::FrequencyShifter,
            EffectProps::PitchShifter(_) => EffectType::PitchShifter,
            EffectProps::VocalMorpher(_) => EffectType::VocalMorpher,
            EffectProps::DedicatedDialog(_) => EffectType::DedicatedDialog,
            EffectProps::DedicatedLfe(_) => EffectType::DedicatedLfe,
        }
    }

    fn params(&self) -> Option<&dyn ParameterInfo> {
        let params: &dyn ParameterInfo = match self {
            EffectProps::Null | EffectProps::Chorus(_) | EffectProps::Flanger(_) => return None,
            EffectProps::Echo(p) => p,
            EffectProps::Distortion(p) => p,
            EffectProps::Equalizer(p) => p,
            EffectProps::Compressor(p) => p,
            EffectProps::RingModulator(p) => p,
            EffectProps::Autowah(p) => p,
            EffectProps::FrequencyShifter(p) => p,
            EffectProps::PitchShifter(p) => p,
            EffectProps::VocalMorpher(p) => p,
            EffectProps::DedicatedDialog(p) | EffectProps::DedicatedLfe(p) => p,
        };
        Some(params)
    }

    fn params_mut(&mut self) -> Option<&mut dyn ParameterInfo> {
        let params: &mut dyn ParameterInfo = match self {
            EffectProps::Null | EffectProps::Chorus(_) | EffectProps::Flanger(_) => return None,
            EffectProps::Echo(p) => p,
            EffectProps::Distortion(p) => p,
            EffectProps::Equalizer(p) => p,
            EffectProps::Compressor(p) => p,
            EffectProps::RingModulator(p) => p,
            EffectProps::Autowah(p) => p,
            EffectProps::FrequencyShifter(p) => p,
            EffectProps::PitchShifter(p) => p,
            EffectProps::VocalMorpher(p) => p,
            EffectProps::DedicatedDialog(p) | EffectProps::DedicatedLfe(p) => p,
        };
        Some(params)
    }

    /// Chorus and flanger share one struct with different delay ranges.
    fn chorus_family(&self) -> Option<(&ChorusProps, f32, ChorusProps)> {
        match self {
            EffectProps::Chorus(p) => Some((
                p,
                ChorusProps::CHORUS_MAX_DELAY,
                ChorusProps::chorus(),
            )),
            EffectProps::Flanger(p) => Some((
                p,
                ChorusProps::FLANGER_MAX_DELAY,
                ChorusProps::flanger(),
            )),
            _ => None,
        }
    }
}

impl ParameterInfo for EffectProps {
    fn param_count(&self) -> usize {
        if self.chorus_family().is_some() {
            return 6;
        }
        self.params().map_or(0, |p| p.param_count())
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        if let Some((_, max_delay, defaults)) = self.chorus_family() {
            return ChorusProps::descriptor(index, max_delay, &defaults);
        }
        self.params().and_then(|p| p.param_info(index))
    }

    fn get_param(&self, index: usize) -> f32 {
        if let Some((props, _, _)) = self.chorus_family() {
            return props.get(index);
        }
        self.params().map_or(0.0, |p| p.get_param(index))
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match self {
            EffectProps::Chorus(p) => p.set(index, value, ChorusProps::CHORUS_MAX_DELAY),
            EffectProps::Flanger(p) => p.set(index, value, ChorusProps::FLANGER_MAX_DELAY),
            _ => {
                if let Some(p) = self.params_mut() {
                    p.set_param(index, value);
                }
            }
        }
    }
}
