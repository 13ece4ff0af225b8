use std::collections::{HashMap, HashSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VoiceId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Param {
    Frequency,
    Gain,
}

/// Sink for oscillator automation requests.
///
/// Requests are fire-and-forget. A ramp on a parameter starts from that
/// parameter's current value and replaces any ramp still in flight on it.
/// A duration of zero sets the value immediately. New oscillators start
/// with zero gain.
pub trait AudioDevice {
    fn create_oscillator(&mut self) -> VoiceId;
    fn ramp_frequency(&mut self, voice: VoiceId, target_hz: f32, seconds: f32);
    fn ramp_gain(&mut self, voice: VoiceId, target_gain: f32, seconds: f32);
    fn release_oscillator(&mut self, voice: VoiceId);
}

impl<T: AudioDevice + ?Sized> AudioDevice for Box<T> {
    fn create_oscillator(&mut self) -> VoiceId {
        (**self).create_oscillator()
    }

    fn ramp_frequency(&mut self, voice: VoiceId, target_hz: f32, seconds: f32) {
        (**self).ramp_frequency(voice, target_hz, seconds)
    }

    fn ramp_gain(&mut self, voice: VoiceId, target_gain: f32, seconds: f32) {
        (**self).ramp_gain(voice, target_gain, seconds)
    }

    fn release_oscillator(&mut self, voice: VoiceId) {
        (**self).release_oscillator(voice)
    }
}

/// Accepts every request and produces nothing. Used when no output device
/// is available or audio is muted.
#[derive(Debug, Default)]
pub struct SilentDevice {
    next_id: u32,
}

impl AudioDevice for SilentDevice {
    fn create_oscillator(&mut self) -> VoiceId {
        self.next_id = self.next_id.wrapping_add(1);
        VoiceId(self.next_id)
    }

    fn ramp_frequency(&mut self, _voice: VoiceId, _target_hz: f32, _seconds: f32) {}

    fn ramp_gain(&mut self, _voice: VoiceId, _target_gain: f32, _seconds: f32) {}

    fn release_oscillator(&mut self, _voice: VoiceId) {}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DeviceCall {
    Create(VoiceId),
    Ramp {
        voice: VoiceId,
        param: Param,
        target: f32,
        seconds: f32,
    },
    Release(VoiceId),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScheduledRamp {
    pub target: f32,
    pub seconds: f32,
}

/// Records every request and keeps the last-writer-wins view of which ramp
/// is active on each parameter.
#[derive(Debug, Default)]
pub struct RecordingDevice {
    calls: Vec<DeviceCall>,
    active: HashMap<(VoiceId, Param), ScheduledRamp>,
    live: HashSet<VoiceId>,
    next_id: u32,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[DeviceCall] {
        &self.calls
    }

    pub fn active_ramp(&self, voice: VoiceId, param: Param) -> Option<ScheduledRamp> {
        self.active.get(&(voice, param)).copied()
    }

    pub fn live_voices(&self) -> usize {
        self.live.len()
    }

    pub fn is_live(&self, voice: VoiceId) -> bool {
        self.live.contains(&voice)
    }

    fn schedule(&mut self, voice: VoiceId, param: Param, target: f32, seconds: f32) {
        self.calls.push(DeviceCall::Ramp {
            voice,
            param,
            target,
            seconds,
        });
        self.active
            .insert((voice, param), ScheduledRamp { target, seconds });
    }
}

impl AudioDevice for RecordingDevice {
    fn create_oscillator(&mut self) -> VoiceId {
        self.next_id += 1;
        let voice = VoiceId(self.next_id);
        self.live.insert(voice);
        self.calls.push(DeviceCall::Create(voice));
        voice
    }

    fn ramp_frequency(&mut self, voice: VoiceId, target_hz: f32, seconds: f32) {
        self.schedule(voice, Param::Frequency, target_hz, seconds);
    }

    fn ramp_gain(&mut self, voice: VoiceId, target_gain: f32, seconds: f32) {
        self.schedule(voice, Param::Gain, target_gain, seconds);
    }

    fn release_oscillator(&mut self, voice: VoiceId) {
        self.live.remove(&voice);
        self.active.retain(|(id, _), _| *id != voice);
        self.calls.push(DeviceCall::Release(voice));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_device_replaces_ramps_per_param() {
        let mut device = RecordingDevice::new();
        let voice = device.create_oscillator();
        device.ramp_frequency(voice, 300.0, 0.05);
        device.ramp_gain(voice, 1.0, 0.01);
        device.ramp_frequency(voice, 400.0, 0.05);
        assert_eq!(
            device.active_ramp(voice, Param::Frequency),
            Some(ScheduledRamp {
                target: 400.0,
                seconds: 0.05
            })
        );
        assert_eq!(device.active_ramp(voice, Param::Gain).map(|r| r.target), Some(1.0));
        device.release_oscillator(voice);
        assert_eq!(device.live_voices(), 0);
        assert!(device.active_ramp(voice, Param::Frequency).is_none());
    }

    #[test]
    fn boxed_device_forwards() {
        let mut device: Box<dyn AudioDevice> = Box::new(SilentDevice::default());
        let a = device.create_oscillator();
        let b = device.create_oscillator();
        assert_ne!(a, b);
    }
}
