//! Output channel layouts and the panning used to derive per-channel gains.
//!
//! Effects never position sound in 3D. They only need to send a signal to
//! "front center", "hard left" or "input channel *i*", so panning here is a
//! plain pairwise constant-power law across the layout's speakers (stereo
//! uses a sine law so hard left/right reach a single speaker).

use crate::MAX_OUTPUT_CHANNELS;
use core::f32::consts::{FRAC_PI_2, PI, TAU};
use libm::{cosf, sinf, sqrtf};

/// A physical speaker position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Speaker {
    /// Front left
    FrontLeft,
    /// Front right
    FrontRight,
    /// Front center
    FrontCenter,
    /// Low-frequency effects channel (not directional)
    Lfe,
    /// Rear left
    BackLeft,
    /// Rear right
    BackRight,
    /// Rear center
    BackCenter,
    /// Side left
    SideLeft,
    /// Side right
    SideRight,
}

impl Speaker {
    /// Azimuth in radians, clockwise from front (negative is left).
    /// `None` for the LFE channel.
    pub fn azimuth(self, layout: ChannelLayout) -> Option<f32> {
        let degrees: f32 = match (self, layout) {
            (Speaker::Lfe, _) => return None,
            (Speaker::FrontLeft, ChannelLayout::Quad) => -45.0,
            (Speaker::FrontRight, ChannelLayout::Quad) => 45.0,
            (Speaker::BackLeft, ChannelLayout::Quad) => -135.0,
            (Speaker::BackRight, ChannelLayout::Quad) => 135.0,
            (Speaker::FrontLeft, _) => -30.0,
            (Speaker::FrontRight, _) => 30.0,
            (Speaker::FrontCenter, _) => 0.0,
            (Speaker::BackLeft, ChannelLayout::Surround71) => -150.0,
            (Speaker::BackRight, ChannelLayout::Surround71) => 150.0,
            (Speaker::BackLeft, _) => -110.0,
            (Speaker::BackRight, _) => 110.0,
            (Speaker::BackCenter, _) => 180.0,
            (Speaker::SideLeft, _) => -90.0,
            (Speaker::SideRight, _) => 90.0,
        };
        Some(degrees.to_radians())
    }
}

/// Channel configuration of the output device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChannelLayout {
    /// Single channel
    Mono,
    /// Left, right
    #[default]
    Stereo,
    /// Front left/right, back left/right
    Quad,
    /// 5.1 (FL, FR, FC, LFE, BL, BR)
    Surround51,
    /// 6.1 (FL, FR, FC, LFE, BC, SL, SR)
    Surround61,
    /// 7.1 (FL, FR, FC, LFE, BL, BR, SL, SR)
    Surround71,
}

impl ChannelLayout {
    /// Speakers in channel order.
    pub fn speakers(self) -> &'static [Speaker] {
        use Speaker::*;
        match self {
            ChannelLayout::Mono => &[FrontCenter],
            ChannelLayout::Stereo => &[FrontLeft, FrontRight],
            ChannelLayout::Quad => &[FrontLeft, FrontRight, BackLeft, BackRight],
            ChannelLayout::Surround51 => {
                &[FrontLeft, FrontRight, FrontCenter, Lfe, BackLeft, BackRight]
            }
            ChannelLayout::Surround61 => &[
                FrontLeft,
                FrontRight,
                FrontCenter,
                Lfe,
                BackCenter,
                SideLeft,
                SideRight,
            ],
            ChannelLayout::Surround71 => &[
                FrontLeft,
                FrontRight,
                FrontCenter,
                Lfe,
                BackLeft,
                BackRight,
                SideLeft,
                SideRight,
            ],
        }
    }

    /// Number of output channels.
    pub fn channel_count(self) -> usize {
        self.speakers().len()
    }

    /// Channel index of `speaker`, if the layout has it.
    pub fn channel_of(self, speaker: Speaker) -> Option<usize> {
        self.speakers().iter().position(|&s| s == speaker)
    }

    /// Short lowercase name, as used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            ChannelLayout::Mono => "mono",
            ChannelLayout::Stereo => "stereo",
            ChannelLayout::Quad => "quad",
            ChannelLayout::Surround51 => "5.1",
            ChannelLayout::Surround61 => "6.1",
            ChannelLayout::Surround71 => "7.1",
        }
    }

    /// Parses a name produced by [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Self> {
        [
            ChannelLayout::Mono,
            ChannelLayout::Stereo,
            ChannelLayout::Quad,
            ChannelLayout::Surround51,
            ChannelLayout::Surround61,
            ChannelLayout::Surround71,
        ]
        .into_iter()
        .find(|layout| layout.name().eq_ignore_ascii_case(name))
    }
}

/// Per-channel gains placing a signal at `azimuth` radians (0 is front,
/// negative is left) with overall amplitude `gain`.
///
/// Mono layouts receive the full gain. The LFE channel never receives a
/// panned signal.
pub fn pan_gains(layout: ChannelLayout, azimuth: f32, gain: f32) -> [f32; MAX_OUTPUT_CHANNELS] {
    let mut gains = [0.0; MAX_OUTPUT_CHANNELS];
    match layout {
        ChannelLayout::Mono => gains[0] = gain,
        ChannelLayout::Stereo => {
            let x = sinf(azimuth).clamp(-1.0, 1.0);
            gains[0] = sqrtf((1.0 - x) * 0.5) * gain;
            gains[1] = sqrtf((1.0 + x) * 0.5) * gain;
        }
        _ => {
            let theta = wrap_angle(azimuth);
            // Nearest speaker at or counter-clockwise of theta, and nearest
            // strictly clockwise of it.
            let mut before = (usize::MAX, TAU);
            let mut after = (usize::MAX, TAU);
            for (index, speaker) in layout.speakers().iter().enumerate() {
                let Some(az) = speaker.azimuth(layout) else {
                    continue;
                };
                let az = wrap_angle(az);
                let ccw = wrap_angle(theta - az);
                let cw = wrap_angle(az - theta);
                if ccw < before.1 {
                    before = (index, ccw);
                }
                if cw > 0.0 && cw < after.1 {
                    after = (index, cw);
                }
            }
            if before.1 <= f32::EPSILON || after.0 == usize::MAX {
                gains[before.0] = gain;
            } else {
                let t = before.1 / (before.1 + after.1);
                gains[before.0] = cosf(t * FRAC_PI_2) * gain;
                gains[after.0] = sinf(t * FRAC_PI_2) * gain;
            }
        }
    }
    gains
}

/// Maps an angle into [0, 2π).
fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle % TAU;
    if wrapped < 0.0 { wrapped + TAU } else { wrapped }
}

/// Azimuth of the hard-left pan position.
pub const LEFT: f32 = -FRAC_PI_2;
/// Azimuth of the hard-right pan position.
pub const RIGHT: f32 = FRAC_PI_2;
/// Azimuth of the front-center pan position.
pub const FRONT: f32 = 0.0;
/// Azimuth directly behind the listener.
pub const BACK: f32 = PI;

#[cfg(test)]
mod tests {
    use super::*;

    fn power(gains: &[f32]) -> f32 {
        gains.iter().map(|g| g * g).sum()
    }

    #[test]
    fn test_mono_takes_full_gain() {
        let gains = pan_gains(ChannelLayout::Mono, LEFT, 0.8);
        assert_eq!(gains[0], 0.8);
        assert!(gains[1..].iter().all(|&g| g == 0.0));
    }

    #[test]
    fn test_stereo_hard_left_and_right() {
        let left = pan_gains(ChannelLayout::Stereo, LEFT, 1.0);
        assert!((left[0] - 1.0).abs() < 1e-6);
        assert!(left[1].abs() < 1e-6);

        let right = pan_gains(ChannelLayout::Stereo, RIGHT, 1.0);
        assert!(right[0].abs() < 1e-6);
        assert!((right[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_stereo_center_is_constant_power() {
        let center = pan_gains(ChannelLayout::Stereo, FRONT, 1.0);
        assert!((center[0] - center[1]).abs() < 1e-6);
        assert!((power(&center) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_surround_front_hits_center_speaker() {
        let gains = pan_gains(ChannelLayout::Surround51, FRONT, 1.0);
        assert!((gains[2] - 1.0).abs() < 1e-6);
        assert_eq!(gains[3], 0.0, "LFE must stay silent");
    }

    #[test]
    fn test_pairwise_pans_are_constant_power() {
        for layout in [
            ChannelLayout::Quad,
            ChannelLayout::Surround51,
            ChannelLayout::Surround61,
            ChannelLayout::Surround71,
        ] {
            for step in 0..36 {
                let az = (step as f32 * 10.0 - 180.0).to_radians();
                let gains = pan_gains(layout, az, 1.0);
                assert!(
                    (power(&gains) - 1.0).abs() < 1e-4,
                    "{layout:?} at {step}: {gains:?}"
                );
                assert_eq!(gains[layout.channel_count()..].iter().sum::<f32>(), 0.0);
            }
        }
    }

    #[test]
    fn test_quad_hard_left_splits_left_pair() {
        let gains = pan_gains(ChannelLayout::Quad, LEFT, 1.0);
        assert!((gains[0] - gains[2]).abs() < 1e-5);
        assert!(gains[1].abs() < 1e-6 && gains[3].abs() < 1e-6);
    }

    #[test]
    fn test_layout_names_round_trip() {
        for layout in [ChannelLayout::Mono, ChannelLayout::Surround71] {
            assert_eq!(ChannelLayout::from_name(layout.name()), Some(layout));
        }
        assert_eq!(ChannelLayout::from_name("STEREO"), Some(ChannelLayout::Stereo));
        assert_eq!(ChannelLayout::from_name("ambisonic"), None);
    }

    #[test]
    fn test_channel_of() {
        assert_eq!(ChannelLayout::Surround51.channel_of(Speaker::Lfe), Some(3));
        assert_eq!(ChannelLayout::Stereo.channel_of(Speaker::FrontCenter), None);
    }
}
