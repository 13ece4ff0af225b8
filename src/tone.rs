use log::{debug, trace};

use crate::{
    axis::FrequencyRange,
    device::{AudioDevice, VoiceId},
};

pub const FADE_SECONDS: f32 = 0.01;
pub const GLIDE_SECONDS: f32 = 0.05;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ToneState {
    Silent,
    Sounding { voice: VoiceId, frequency: f64 },
    Releasing { voice: VoiceId, remaining: f32 },
}

/// Drives a single oscillator from a stream of target frequencies.
///
/// Every audible change goes through a short ramp: a gain fade on start and
/// stop, a fixed-length glide between targets. A stopped voice keeps fading
/// until `tick` has covered the fade time and is then released.
pub struct ToneController<D> {
    device: D,
    range: FrequencyRange,
    state: ToneState,
}

impl<D: AudioDevice> ToneController<D> {
    pub fn new(device: D, range: FrequencyRange) -> Self {
        Self {
            device,
            range,
            state: ToneState::Silent,
        }
    }

    pub fn state(&self) -> ToneState {
        self.state
    }

    pub fn current_frequency(&self) -> Option<f64> {
        match self.state {
            ToneState::Sounding { frequency, .. } => Some(frequency),
            _ => None,
        }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn set_target(&mut self, frequency: f64) {
        if !self.range.contains(frequency) {
            trace!("ignoring out-of-band target {frequency:.2} Hz");
            return;
        }
        let hz = frequency as f32;
        self.state = match self.state {
            ToneState::Silent => {
                let voice = self.device.create_oscillator();
                self.device.ramp_frequency(voice, hz, 0.0);
                self.device.ramp_gain(voice, 1.0, FADE_SECONDS);
                debug!("tone start {frequency:.1} Hz on {voice:?}");
                ToneState::Sounding { voice, frequency }
            }
            ToneState::Sounding { voice, .. } => {
                self.device.ramp_frequency(voice, hz, GLIDE_SECONDS);
                ToneState::Sounding { voice, frequency }
            }
            ToneState::Releasing { voice, .. } => {
                self.device.ramp_gain(voice, 1.0, FADE_SECONDS);
                self.device.ramp_frequency(voice, hz, GLIDE_SECONDS);
                debug!("tone resumed {frequency:.1} Hz on {voice:?}");
                ToneState::Sounding { voice, frequency }
            }
        };
    }

    pub fn stop(&mut self) {
        if let ToneState::Sounding { voice, frequency } = self.state {
            self.device.ramp_gain(voice, 0.0, FADE_SECONDS);
            debug!("tone stop {frequency:.1} Hz on {voice:?}");
            self.state = ToneState::Releasing {
                voice,
                remaining: FADE_SECONDS,
            };
        }
    }

    pub fn tick(&mut self, dt: f32) {
        if let ToneState::Releasing { voice, remaining } = self.state {
            let remaining = remaining - dt.max(0.0);
            if remaining <= 0.0 {
                self.device.release_oscillator(voice);
                self.state = ToneState::Silent;
            } else {
                self.state = ToneState::Releasing { voice, remaining };
            }
        }
    }
}
