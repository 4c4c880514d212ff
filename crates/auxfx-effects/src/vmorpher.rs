//! Vocal morpher.
//!
//! Two banks of four formant filters each impose a vowel on the input; an
//! LFO cross-fades between the banks:
//!
//! ```text
//!          ┌─► formants(A) ─┐
//!   in ────┤                ├─► lerp(A, B, lfo) ─► out
//!          └─► formants(B) ─┘
//! ```
//!
//! Formant frequencies and levels are the soprano set, transposed by the
//! per-vowel coarse tuning. Each formant is a state-variable band-pass from
//! a topology-preserving transform; its band output is scaled by the formant
//! level and summed.

use auxfx_core::{
    DeviceParams, EffectError, EffectProps, EffectState, EffectTarget, EffectType, FloatBufferLine,
    MAX_INPUT_CHANNELS, MAX_UPDATE_SAMPLES, MorpherWaveform, OutputGains, Phoneme, lerp,
};
use core::f32::consts::{PI, TAU};
use libm::{fabsf, powf, sinf, tanf};

const NUM_FORMANTS: usize = 4;
const Q_FACTOR: f32 = 5.0;
/// Formant centres stay below Nyquist, where the prewarp diverges.
const MAX_F0NORM: f32 = 0.49;

const WAVEFORM_FRACBITS: u32 = 24;
const WAVEFORM_FRACONE: u32 = 1 << WAVEFORM_FRACBITS;
const WAVEFORM_FRACMASK: u32 = WAVEFORM_FRACONE - 1;

/// `(frequency in Hz, linear level)` for each formant of a vowel.
fn formant_table(phoneme: Phoneme) -> [(f32, f32); NUM_FORMANTS] {
    match phoneme {
        Phoneme::A => [(800.0, 1.0), (1150.0, 0.501187), (2900.0, 0.025118), (3900.0, 0.1)],
        Phoneme::E => [(350.0, 1.0), (2000.0, 0.1), (2800.0, 0.177827), (3600.0, 0.009999)],
        Phoneme::I => [(270.0, 1.0), (2140.0, 0.251188), (2950.0, 0.050118), (3900.0, 0.050118)],
        Phoneme::O => [(450.0, 1.0), (800.0, 0.281838), (2830.0, 0.079432), (3800.0, 0.079432)],
        Phoneme::U => [(325.0, 1.0), (700.0, 0.158489), (2700.0, 0.017782), (3800.0, 0.009999)],
    }
}

/// TPT state-variable band-pass with a fixed Q.
#[derive(Debug, Clone, Copy)]
struct FormantFilter {
    coeff: f32,
    gain: f32,
    s1: f32,
    s2: f32,
}

impl Default for FormantFilter {
    fn default() -> Self {
        Self {
            coeff: 0.0,
            gain: 1.0,
            s1: 0.0,
            s2: 0.0,
        }
    }
}

impl FormantFilter {
    /// Sets the centre frequency and level. History is kept.
    fn set_params(&mut self, f0norm: f32, gain: f32) {
        self.coeff = tanf(PI * f0norm.min(MAX_F0NORM));
        self.gain = gain;
    }

    /// Adds this formant's band output for `input` into `output`.
    fn process_add(&mut self, input: &[f32], output: &mut [f32]) {
        let g = self.coeff;
        let h = 1.0 / (1.0 + g / Q_FACTOR + g * g);
        let (mut s1, mut s2) = (self.s1, self.s2);
        for (out, &x) in output.iter_mut().zip(input) {
            let high = (x - (1.0 / Q_FACTOR + g) * s1 - s2) * h;
            let band = g * high + s1;
            let low = g * band + s2;
            s1 = g * high + band;
            s2 = g * band + low;
            *out += band * self.gain;
        }
        self.s1 = s1;
        self.s2 = s2;
    }

    fn clear(&mut self) {
        self.s1 = 0.0;
        self.s2 = 0.0;
    }
}

fn vowel_filters(
    phoneme: Phoneme,
    coarse_tuning: i32,
    frequency: f32,
) -> [FormantFilter; NUM_FORMANTS] {
    let pitch = powf(2.0, coarse_tuning as f32 / 12.0);
    let mut filters = [FormantFilter::default(); NUM_FORMANTS];
    for (filter, (hz, gain)) in filters.iter_mut().zip(formant_table(phoneme)) {
        filter.set_params(hz * pitch / frequency, gain);
    }
    filters
}

#[derive(Debug, Clone, Default)]
struct ChannelVowels {
    vowel_a: [FormantFilter; NUM_FORMANTS],
    vowel_b: [FormantFilter; NUM_FORMANTS],
    gains: OutputGains,
}

/// Vocal morpher effect state.
#[derive(Debug, Clone)]
pub struct VmorpherState {
    waveform: MorpherWaveform,
    index: u32,
    step: u32,
    channels: [ChannelVowels; MAX_INPUT_CHANNELS],
    active: usize,
}

impl VmorpherState {
    /// Creates a morpher with a sine blend LFO.
    pub fn new() -> Self {
        Self {
            waveform: MorpherWaveform::Sinusoid,
            index: 0,
            step: 1,
            channels: Default::default(),
            active: 0,
        }
    }

    /// Fills `lfo` with blend weights in [0, 1]; 0 selects vowel A.
    fn fill_lfo(&mut self, lfo: &mut [f32]) {
        if self.step == 0 {
            lfo.fill(0.5);
            return;
        }
        let shape = |index: u32| match self.waveform {
            MorpherWaveform::Sinusoid => {
                sinf(index as f32 * (TAU / WAVEFORM_FRACONE as f32)) * 0.5 + 0.5
            }
            MorpherWaveform::Sawtooth => index as f32 / WAVEFORM_FRACONE as f32,
            MorpherWaveform::Triangle => {
                fabsf(index as f32 * (2.0 / WAVEFORM_FRACONE as f32) - 1.0)
            }
        };
        let mut index = self.index;
        for value in lfo {
            index = (index + self.step) & WAVEFORM_FRACMASK;
            *value = shape(index);
        }
        self.index = index;
    }
}

impl Default for VmorpherState {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectState for VmorpherState {
    fn device_update(&mut self, device: &DeviceParams) -> Result<(), EffectError> {
        device.validate()?;
        for channel in &mut self.channels {
            channel.vowel_a.iter_mut().chain(&mut channel.vowel_b).for_each(FormantFilter::clear);
            channel.gains.reset();
        }
        Ok(())
    }

    fn update(&mut self, target: &EffectTarget, props: &EffectProps) {
        let EffectProps::VocalMorpher(props) = props else {
            return;
        };
        let frequency = target.device.frequency();

        let step = (props.rate / frequency * WAVEFORM_FRACONE as f32)
            .clamp(0.0, (WAVEFORM_FRACONE - 1) as f32);
        self.step = step as u32;
        self.waveform = props.waveform;

        let vowel_a = vowel_filters(props.phoneme_a, props.phoneme_a_coarse_tuning, frequency);
        let vowel_b = vowel_filters(props.phoneme_b, props.phoneme_b_coarse_tuning, frequency);

        self.active = target.input_channels.clamp(1, MAX_INPUT_CHANNELS);
        for (index, channel) in self.channels[..self.active].iter_mut().enumerate() {
            let pairs = channel
                .vowel_a
                .iter_mut()
                .zip(&vowel_a)
                .chain(channel.vowel_b.iter_mut().zip(&vowel_b));
            for (filter, source) in pairs {
                filter.coeff = source.coeff;
                filter.gain = source.gain;
            }
            channel.gains.set_target(target.channel_gains(index));
        }
    }

    fn process(
        &mut self,
        samples_to_do: usize,
        input: &[FloatBufferLine],
        output: &mut [FloatBufferLine],
    ) {
        let mut base = 0;
        while base < samples_to_do {
            let todo = MAX_UPDATE_SAMPLES.min(samples_to_do - base);
            let mut lfo = [0.0f32; MAX_UPDATE_SAMPLES];
            self.fill_lfo(&mut lfo[..todo]);

            for (channel, line) in self.channels[..self.active].iter_mut().zip(input) {
                let src = &line[base..base + todo];
                let mut vowel_a = [0.0f32; MAX_UPDATE_SAMPLES];
                let mut vowel_b = [0.0f32; MAX_UPDATE_SAMPLES];
                for filter in &mut channel.vowel_a {
                    filter.process_add(src, &mut vowel_a[..todo]);
                }
                for filter in &mut channel.vowel_b {
                    filter.process_add(src, &mut vowel_b[..todo]);
                }

                let mut blended = [0.0f32; MAX_UPDATE_SAMPLES];
                let vowels = blended.iter_mut().zip(&vowel_a).zip(&vowel_b);
                for (((out, &a), &b), &t) in vowels.zip(&lfo) {
                    *out = lerp(a, b, t);
                }
                channel.gains.mix(&blended[..todo], output, samples_to_do - base, base);
            }
            base += todo;
        }
    }

    fn effect_type(&self) -> EffectType {
        EffectType::VocalMorpher
    }
}
