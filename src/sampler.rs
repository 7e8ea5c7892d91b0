//! # Input Sampling Seam
//!
//! The bridge does not own joystick hardware. Backends (evdev, SDL, a GUI
//! editor's virtual sticks) live outside the crate and plug in through
//! [`InputSampler`]; the transmit loop only ever sees an [`InputSnapshot`].

use crate::error::SamplerError;
use crate::mapping::HatAxis;

/// One polling tick's worth of raw input.
///
/// Axes are signed normalized floats in `[-1.0, 1.0]`, buttons are
/// booleans, hats are `(x, y)` pairs in `{-1, 0, 1}`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InputSnapshot {
    pub axes: Vec<f32>,
    pub buttons: Vec<bool>,
    pub hats: Vec<(i8, i8)>,
}

impl InputSnapshot {
    pub fn axis(&self, index: u8) -> Option<f32> {
        self.axes.get(index as usize).copied()
    }

    pub fn button(&self, index: u8) -> Option<bool> {
        self.buttons.get(index as usize).copied()
    }

    pub fn hat(&self, index: u8, axis: HatAxis) -> Option<i8> {
        self.hats.get(index as usize).map(|&(x, y)| match axis {
            HatAxis::X => x,
            HatAxis::Y => y,
        })
    }
}

/// Source of raw input snapshots, polled once per transmit tick.
pub trait InputSampler: Send {
    fn sample(&mut self) -> Result<InputSnapshot, SamplerError>;
}

/// Sampler that always reports centered axes and released buttons.
///
/// Keeps a valid frame stream on the wire when no input backend is wired
/// in; also handy as a test fixture.
#[derive(Debug, Clone)]
pub struct NeutralSampler {
    snapshot: InputSnapshot,
}

impl NeutralSampler {
    pub fn new(axes: usize, buttons: usize, hats: usize) -> Self {
        Self {
            snapshot: InputSnapshot {
                axes: vec![0.0; axes],
                buttons: vec![false; buttons],
                hats: vec![(0, 0); hats],
            },
        }
    }
}

impl InputSampler for NeutralSampler {
    fn sample(&mut self) -> Result<InputSnapshot, SamplerError> {
        Ok(self.snapshot.clone())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_accessors() {
        let snapshot = InputSnapshot {
            axes: vec![0.25, -0.5],
            buttons: vec![true],
            hats: vec![(-1, 1)],
        };
        assert_eq!(snapshot.axis(1), Some(-0.5));
        assert_eq!(snapshot.axis(2), None);
        assert_eq!(snapshot.button(0), Some(true));
        assert_eq!(snapshot.button(1), None);
        assert_eq!(snapshot.hat(0, HatAxis::X), Some(-1));
        assert_eq!(snapshot.hat(0, HatAxis::Y), Some(1));
        assert_eq!(snapshot.hat(1, HatAxis::X), None);
    }

    #[test]
    fn neutral_sampler_is_centered() {
        let mut sampler = NeutralSampler::new(4, 2, 1);
        let snapshot = sampler.sample().unwrap();
        assert_eq!(snapshot.axes, vec![0.0; 4]);
        assert_eq!(snapshot.buttons, vec![false; 2]);
        assert_eq!(snapshot.hats, vec![(0, 0)]);
    }
}
