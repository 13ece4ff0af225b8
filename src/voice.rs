use std::sync::{Arc, Mutex, mpsc};

use log::{trace, warn};
use tokio::runtime::Runtime;

use crate::device::{AudioDevice, VoiceId};

pub const DEFAULT_SAMPLE_RATE: f32 = 44_100.0;

/// Linear automation of one parameter, advanced once per sample.
///
/// Scheduling starts from the current interpolated value and discards the
/// ramp in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ramp {
    value: f32,
    target: f32,
    step: f32,
    remaining: u32,
}

impl Ramp {
    pub fn new(value: f32) -> Self {
        Self {
            value,
            target: value,
            step: 0.0,
            remaining: 0,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_settled(&self) -> bool {
        self.remaining == 0
    }

    pub fn schedule(&mut self, target: f32, seconds: f32, sample_rate: f32) {
        let samples = (seconds.max(0.0) * sample_rate).round() as u32;
        self.target = target;
        if samples == 0 {
            self.value = target;
            self.step = 0.0;
            self.remaining = 0;
        } else {
            self.step = (target - self.value) / samples as f32;
            self.remaining = samples;
        }
    }

    pub fn next(&mut self) -> f32 {
        if self.remaining > 0 {
            self.remaining -= 1;
            self.value = if self.remaining == 0 {
                self.target
            } else {
                self.value + self.step
            };
        }
        self.value
    }
}

#[derive(Clone, Debug)]
pub struct Voice {
    phase: f32,
    frequency: Ramp,
    gain: Ramp,
    released: bool,
}

impl Voice {
    pub fn new() -> Self {
        Self {
            phase: 0.0,
            frequency: Ramp::new(0.0),
            gain: Ramp::new(0.0),
            released: false,
        }
    }

    pub fn frequency(&self) -> &Ramp {
        &self.frequency
    }

    pub fn gain(&self) -> &Ramp {
        &self.gain
    }

    fn finished(&self) -> bool {
        self.released && self.gain.is_settled()
    }

    fn sample(&mut self, sample_rate: f32) -> f32 {
        let frequency = self.frequency.next();
        let gain = self.gain.next();
        self.phase = (self.phase + frequency / sample_rate).fract();
        (self.phase * std::f32::consts::TAU).sin() * gain
    }
}

impl Default for Voice {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VoiceCommand {
    Create(VoiceId),
    RampFrequency {
        voice: VoiceId,
        target_hz: f32,
        seconds: f32,
    },
    RampGain {
        voice: VoiceId,
        target_gain: f32,
        seconds: f32,
    },
    Release(VoiceId),
}

pub type SharedBank = Arc<Mutex<VoiceBank>>;

/// Every oscillator the audio callback renders.
///
/// A released voice keeps playing until its gain ramp has settled, so a
/// release that overtakes the fade-out cannot cut the tone off.
pub struct VoiceBank {
    voices: Vec<(VoiceId, Voice)>,
    sample_rate: f32,
    master: f32,
}

impl VoiceBank {
    pub fn new(master: f32) -> Self {
        Self {
            voices: Vec::new(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            master: master.clamp(0.0, 1.0),
        }
    }

    pub fn shared(master: f32) -> SharedBank {
        Arc::new(Mutex::new(Self::new(master)))
    }

    pub fn set_sample_rate(&mut self, rate: f32) {
        self.sample_rate = rate.max(1.0);
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn voice(&self, id: VoiceId) -> Option<&Voice> {
        self.voices
            .iter()
            .find(|(voice_id, _)| *voice_id == id)
            .map(|(_, voice)| voice)
    }

    fn voice_mut(&mut self, id: VoiceId) -> Option<&mut Voice> {
        self.voices
            .iter_mut()
            .find(|(voice_id, _)| *voice_id == id)
            .map(|(_, voice)| voice)
    }

    pub fn apply(&mut self, command: VoiceCommand) {
        let sample_rate = self.sample_rate;
        match command {
            VoiceCommand::Create(id) => self.voices.push((id, Voice::new())),
            VoiceCommand::RampFrequency {
                voice,
                target_hz,
                seconds,
            } => {
                if let Some(v) = self.voice_mut(voice) {
                    v.frequency.schedule(target_hz, seconds, sample_rate);
                }
            }
            VoiceCommand::RampGain {
                voice,
                target_gain,
                seconds,
            } => {
                if let Some(v) = self.voice_mut(voice) {
                    v.gain.schedule(target_gain, seconds, sample_rate);
                }
            }
            VoiceCommand::Release(voice) => {
                if let Some(v) = self.voice_mut(voice) {
                    v.released = true;
                }
            }
        }
    }

    pub fn next_sample(&mut self) -> f32 {
        let sample_rate = self.sample_rate;
        let mixed = self
            .voices
            .iter_mut()
            .map(|(_, voice)| voice.sample(sample_rate))
            .sum::<f32>();
        self.voices.retain(|(_, voice)| !voice.finished());
        mixed * self.master
    }
}

pub fn spawn_voice_worker(runtime: &Runtime, bank: SharedBank) -> mpsc::Sender<VoiceCommand> {
    let (tx, rx) = mpsc::channel::<VoiceCommand>();

    runtime.spawn_blocking(move || {
        while let Ok(command) = rx.recv() {
            trace!("voice command {command:?}");
            match bank.lock() {
                Ok(mut guard) => guard.apply(command),
                Err(_) => {
                    warn!("voice bank poisoned; stopping worker");
                    break;
                }
            }
        }
    });

    tx
}

/// `AudioDevice` that forwards every request to the voice worker.
pub struct ChannelDevice {
    tx: mpsc::Sender<VoiceCommand>,
    next_id: u32,
}

impl ChannelDevice {
    pub fn new(tx: mpsc::Sender<VoiceCommand>) -> Self {
        Self { tx, next_id: 0 }
    }

    fn send(&self, command: VoiceCommand) {
        if let Err(err) = self.tx.send(command) {
            warn!("voice worker gone, dropped {:?}", err.0);
        }
    }
}

impl AudioDevice for ChannelDevice {
    fn create_oscillator(&mut self) -> VoiceId {
        self.next_id = self.next_id.wrapping_add(1);
        let voice = VoiceId(self.next_id);
        self.send(VoiceCommand::Create(voice));
        voice
    }

    fn ramp_frequency(&mut self, voice: VoiceId, target_hz: f32, seconds: f32) {
        self.send(VoiceCommand::RampFrequency {
            voice,
            target_hz,
            seconds,
        });
    }

    fn ramp_gain(&mut self, voice: VoiceId, target_gain: f32, seconds: f32) {
        self.send(VoiceCommand::RampGain {
            voice,
            target_gain,
            seconds,
        });
    }

    fn release_oscillator(&mut self, voice: VoiceId) {
        self.send(VoiceCommand::Release(voice));
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    const SR: f32 = 1_000.0;

    fn bank() -> VoiceBank {
        let mut bank = VoiceBank::new(1.0);
        bank.set_sample_rate(SR);
        bank
    }

    #[test]
    fn ramp_reaches_target_exactly() {
        let mut ramp = Ramp::new(100.0);
        ramp.schedule(200.0, 0.01, SR);
        let values: Vec<f32> = (0..12).map(|_| ramp.next()).collect();
        assert!(values.windows(2).all(|w| w[1] >= w[0]));
        assert_eq!(values[9], 200.0);
        assert!(ramp.is_settled());
    }

    #[test]
    fn zero_duration_sets_immediately() {
        let mut ramp = Ramp::new(0.0);
        ramp.schedule(440.0, 0.0, SR);
        assert_eq!(ramp.value(), 440.0);
        assert!(ramp.is_settled());
    }

    #[test]
    fn reschedule_starts_from_current_value() {
        let mut ramp = Ramp::new(200.0);
        ramp.schedule(1000.0, 0.05, SR);
        for _ in 0..5 {
            ramp.next();
        }
        let midway = ramp.value();
        ramp.schedule(150.0, 0.05, SR);
        let mut peak = midway;
        for _ in 0..100 {
            peak = peak.max(ramp.next());
        }
        assert!(peak < 1000.0);
        assert!((peak - midway).abs() < 1e-3);
        assert_eq!(ramp.value(), 150.0);
    }

    #[test]
    fn new_voice_fades_in_from_silence() {
        let mut bank = bank();
        let id = VoiceId(1);
        bank.apply(VoiceCommand::Create(id));
        bank.apply(VoiceCommand::RampFrequency {
            voice: id,
            target_hz: 50.0,
            seconds: 0.0,
        });
        bank.apply(VoiceCommand::RampGain {
            voice: id,
            target_gain: 1.0,
            seconds: 0.01,
        });
        let first = bank.next_sample().abs();
        assert!(first < 0.1);
        for _ in 0..20 {
            bank.next_sample();
        }
        assert_eq!(bank.voice(id).map(|v| v.gain().value()), Some(1.0));
    }

    #[test]
    fn release_waits_for_fade_out() {
        let mut bank = bank();
        let id = VoiceId(7);
        bank.apply(VoiceCommand::Create(id));
        bank.apply(VoiceCommand::RampGain {
            voice: id,
            target_gain: 0.0,
            seconds: 0.01,
        });
        bank.apply(VoiceCommand::Release(id));
        for _ in 0..5 {
            bank.next_sample();
        }
        assert_eq!(bank.len(), 1);
        for _ in 0..10 {
            bank.next_sample();
        }
        assert!(bank.is_empty());
    }

    #[test]
    fn commands_for_unknown_voices_are_ignored() {
        let mut bank = bank();
        bank.apply(VoiceCommand::Release(VoiceId(3)));
        bank.apply(VoiceCommand::RampGain {
            voice: VoiceId(3),
            target_gain: 1.0,
            seconds: 0.0,
        });
        assert!(bank.is_empty());
        assert_eq!(bank.next_sample(), 0.0);
    }

    #[test]
    fn worker_applies_channel_device_requests() {
        let runtime = Runtime::new().expect("runtime");
        let shared = VoiceBank::shared(1.0);
        let mut device = ChannelDevice::new(spawn_voice_worker(&runtime, shared.clone()));
        let voice = device.create_oscillator();
        device.ramp_frequency(voice, 330.0, 0.0);

        let deadline = Instant::now() + Duration::from_secs(2);
        loop {
            let applied = shared
                .lock()
                .expect("bank lock")
                .voice(voice)
                .map(|v| v.frequency().value());
            if applied == Some(330.0) {
                break;
            }
            assert!(Instant::now() < deadline, "worker never applied commands");
            std::thread::sleep(Duration::from_millis(5));
        }
        drop(device);
        runtime.shutdown_timeout(Duration::from_millis(100));
    }
}
