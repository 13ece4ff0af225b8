use anyhow::{Result, anyhow};
use cpal::{
    SampleFormat, SizedSample, Stream,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use log::{error, info};

use crate::voice::SharedBank;

const HEADROOM: f32 = 0.98;

pub struct AudioEngine {
    _stream: Stream,
}

impl AudioEngine {
    pub fn start(bank: SharedBank) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("No default audio output"))?;
        let supported = device.default_output_config()?;
        let config = supported.config();
        let sample_rate = config.sample_rate.0 as f32;
        bank.lock()
            .map_err(|_| anyhow!("voice bank poisoned"))?
            .set_sample_rate(sample_rate);
        let stream = match supported.sample_format() {
            SampleFormat::I16 => build_stream(&device, &config, bank, to_i16)?,
            SampleFormat::U16 => build_stream(&device, &config, bank, to_u16)?,
            SampleFormat::F64 => {
                build_stream(&device, &config, bank, |sample: f32| f64::from(sample))?
            }
            _ => build_stream(&device, &config, bank, |sample: f32| sample)?,
        };
        stream.play()?;
        info!(
            "audio output {} @ {sample_rate} Hz, {} ch, {:?}",
            device.name().unwrap_or_else(|_| "unknown".into()),
            config.channels,
            supported.sample_format()
        );
        Ok(Self { _stream: stream })
    }
}

fn build_stream<T, F>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    bank: SharedBank,
    mut convert: F,
) -> Result<Stream>
where
    T: SizedSample + Send + 'static,
    F: FnMut(f32) -> T + Send + 'static,
{
    let channels = config.channels as usize;
    let stream = device.build_output_stream(
        config,
        move |output: &mut [T], _: &cpal::OutputCallbackInfo| {
            fill_output_buffer(output, channels, &bank, &mut convert);
        },
        move |err| error!("audio stream error: {err}"),
        None,
    )?;
    Ok(stream)
}

fn to_i16(sample: f32) -> i16 {
    (sample * i16::MAX as f32) as i16
}

fn to_u16(sample: f32) -> u16 {
    let scaled = (sample * 0.5 + 0.5).clamp(0.0, 1.0);
    (scaled * u16::MAX as f32) as u16
}

/// Writes one mono sample per frame to every channel. A poisoned bank
/// renders silence.
pub fn fill_output_buffer<T, F>(output: &mut [T], channels: usize, bank: &SharedBank, mut convert: F)
where
    F: FnMut(f32) -> T,
    T: Copy,
{
    let Ok(mut voices) = bank.lock() else {
        let silence = convert(0.0);
        output.iter_mut().for_each(|slot| *slot = silence);
        return;
    };
    for frame in output.chunks_mut(channels.max(1)) {
        let sample = voices.next_sample().clamp(-HEADROOM, HEADROOM);
        let value = convert(sample);
        for channel in frame {
            *channel = value;
        }
    }
}
