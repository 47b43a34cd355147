use super::software::Mixer;
use crate::synth::error::SynthError;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, Stream};
use std::sync::{Arc, Mutex};

/// Plays a [`Mixer`] through a `cpal` output stream.
pub struct CpalBackend {
    stream: Stream,
    playing: bool,
}

impl CpalBackend {
    pub fn new(mixer: Arc<Mutex<Mixer>>, device_name: Option<&str>) -> Result<Self, SynthError> {
        let host = cpal::default_host();
        let device = select_output_device(&host, device_name)?;
        log::info!(
            "Selected output device: {}",
            device.name().unwrap_or_default()
        );
        let stream = build_stream(&device, mixer)?;
        Ok(Self {
            stream,
            playing: false,
        })
    }

    pub fn start(&mut self) -> Result<(), SynthError> {
        if !self.playing {
            self.stream.play()?;
            self.playing = true;
        }
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), SynthError> {
        if self.playing {
            self.stream.pause()?;
            self.playing = false;
        }
        Ok(())
    }
}

fn select_output_device(
    host: &cpal::Host,
    preferred: Option<&str>,
) -> Result<cpal::Device, SynthError> {
    if let Some(wanted) = preferred {
        let wanted = wanted.to_lowercase();
        if let Some(device) = host
            .output_devices()?
            .find(|d| d.name().map(|n| n.to_lowercase().contains(&wanted)).unwrap_or(false))
        {
            return Ok(device);
        }
        log::warn!("Output device '{}' not found, using the default", wanted);
    }

    if cfg!(target_os = "linux") {
        // Prefer the sound server's device over raw hardware devices.
        for device in host.output_devices()? {
            let name = device.name().unwrap_or_default().to_lowercase();
            if name.starts_with("default") || name.contains("pipewire") {
                return Ok(device);
            }
        }
    }

    host.default_output_device()
        .ok_or_else(|| SynthError::Device("No output device available".to_string()))
}

fn build_stream(device: &cpal::Device, mixer: Arc<Mutex<Mixer>>) -> Result<Stream, SynthError> {
    let supported_config = device.default_output_config()?;
    let stream_config: cpal::StreamConfig = supported_config.clone().into();

    let sample_rate = stream_config.sample_rate.0;
    let channels = stream_config.channels as usize;

    {
        let mut mixer = mixer
            .lock()
            .map_err(|_| SynthError::Engine("mixer lock poisoned".to_string()))?;
        mixer.set_sample_rate(sample_rate as f32);
    }
    log::info!("Output stream: {} Hz, {} channels", sample_rate, channels);

    let mut buffer = Vec::new();
    let stream = match supported_config.sample_format() {
        SampleFormat::F32 => device.build_output_stream(
            &stream_config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let frames = data.len() / channels;
                buffer.resize(frames, 0.0);
                match mixer.lock() {
                    Ok(mut mixer) => mixer.render(&mut buffer),
                    Err(_) => buffer.fill(0.0),
                }

                for (i, frame) in data.chunks_mut(channels).enumerate() {
                    for sample in frame.iter_mut() {
                        *sample = buffer[i];
                    }
                }
            },
            |err| log::error!("Stream error: {}", err),
            None,
        )?,
        other => {
            return Err(SynthError::Device(format!(
                "Unsupported sample format {other:?}"
            )))
        }
    };

    Ok(stream)
}
