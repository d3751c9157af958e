// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Implements a universal asset loader for audio formats using the `symphonia` library.

use crate::asset_lane::AssetLoaderLane;
use anyhow::anyhow;
use jig_data::assets::SoundData;
use std::{error::Error, io::Cursor};
use symphonia::core::{
    audio::SampleBuffer, codecs::DecoderOptions, errors::Error as SymphoniaError,
    formats::FormatOptions, io::MediaSourceStream, meta::MetadataOptions, probe::Hint,
};

/// An `AssetLoaderLane` that uses `symphonia` to decode OGG/Vorbis, FLAC, MP3,
/// WAV and the other formats symphonia supports.
#[derive(Default)]
pub struct SymphoniaLoaderLane {
    extension_hint: Option<String>,
}

impl SymphoniaLoaderLane {
    /// Creates a lane that probes the container format from the bytes alone.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a lane that hints the prober with a file extension such as `"ogg"`.
    pub fn with_extension_hint(extension: impl Into<String>) -> Self {
        Self {
            extension_hint: Some(extension.into()),
        }
    }
}

impl AssetLoaderLane<SoundData> for SymphoniaLoaderLane {
    fn load(&self, bytes: &[u8]) -> Result<SoundData, Box<dyn Error + Send + Sync>> {
        let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());

        let mut hint = Hint::new();
        if let Some(extension) = &self.extension_hint {
            hint.with_extension(extension);
        }
        let meta_opts: MetadataOptions = Default::default();
        let fmt_opts: FormatOptions = Default::default();
        let probed = symphonia::default::get_probe().format(&hint, mss, &fmt_opts, &meta_opts)?;
        let mut format_reader = probed.format;

        let track = format_reader
            .default_track()
            .ok_or_else(|| anyhow!("No default audio track found"))?;

        let track_id = track.id;
        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or_else(|| anyhow!("Unknown sample rate"))?;
        let channels = track
            .codec_params
            .channels
            .ok_or_else(|| anyhow!("Unknown channel count"))?;

        let dec_opts: DecoderOptions = Default::default();
        let mut decoder = symphonia::default::get_codecs().make(&track.codec_params, &dec_opts)?;

        let mut all_samples = Vec::<f32>::new();

        loop {
            match format_reader.next_packet() {
                Ok(packet) => {
                    if packet.track_id() != track_id {
                        continue;
                    }

                    match decoder.decode(&packet) {
                        Ok(decoded) => {
                            // Symphonia hands out planar buffers; interleave into LRLR...
                            let mut sample_buf = SampleBuffer::<f32>::new(
                                decoded.capacity() as u64,
                                *decoded.spec(),
                            );
                            sample_buf.copy_interleaved_ref(decoded);
                            all_samples.extend_from_slice(sample_buf.samples());
                        }
                        // A corrupt packet is skipped, not fatal.
                        Err(SymphoniaError::DecodeError(e)) => {
                            log::warn!("Skipping undecodable audio packet: {}", e);
                        }
                        Err(e) => return Err(Box::new(e)),
                    }
                }
                // End of stream
                Err(SymphoniaError::IoError(_)) => break,
                Err(e) => return Err(Box::new(e)),
            }
        }

        Ok(SoundData {
            samples: all_samples,
            channels: channels.count() as u16,
            sample_rate,
        })
    }

    fn strategy_name(&self) -> &'static str {
        "SymphoniaLoader"
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::wav_bytes;
    use super::*;

    #[test]
    fn decodes_wav_through_symphonia() {
        let samples: Vec<i16> = (0..200).map(|i| (i * 100) as i16).collect();
        let bytes = wav_bytes(&samples, 2, 8000);

        let sound = SymphoniaLoaderLane::with_extension_hint("wav")
            .load(&bytes)
            .unwrap();

        assert_eq!(sound.sample_rate, 8000);
        assert_eq!(sound.channels, 2);
        assert_eq!(sound.samples.len(), 200);
    }

    #[test]
    fn rejects_unknown_container() {
        let loader = SymphoniaLoaderLane::new();
        assert!(loader.load(&[0u8; 64]).is_err());
    }
}
