use std::path::Path;

use mp3lame_encoder::{
    max_required_buffer_size, Bitrate, Builder, DualPcm, FlushNoGap, MonoPcm, Quality,
};

use super::process::EspeakError;

fn encode_err(e: impl std::fmt::Debug) -> EspeakError {
    EspeakError::Encode(format!("{e:?}"))
}

/// Re-encode a 16-bit PCM WAV file as MP3 at `mp3_path`.
///
/// Returns the audio duration in seconds.
pub(crate) fn wav_to_mp3(wav_path: &Path, mp3_path: &Path) -> Result<f64, EspeakError> {
    let mut reader = hound::WavReader::open(wav_path)?;
    let spec = reader.spec();
    if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(EspeakError::Encode(format!(
            "expected 16-bit PCM input, got {}-bit {:?}",
            spec.bits_per_sample, spec.sample_format
        )));
    }

    let samples = reader
        .samples::<i16>()
        .collect::<Result<Vec<_>, _>>()?;
    if samples.is_empty() {
        return Err(EspeakError::EmptyOutput(wav_path.to_path_buf()));
    }

    let mut builder = Builder::new()
        .ok_or_else(|| EspeakError::Encode("failed to allocate LAME encoder".to_string()))?;
    builder
        .set_num_channels(spec.channels as u8)
        .map_err(encode_err)?;
    builder.set_sample_rate(spec.sample_rate).map_err(encode_err)?;
    builder.set_brate(Bitrate::Kbps64).map_err(encode_err)?;
    builder.set_quality(Quality::Good).map_err(encode_err)?;
    let mut encoder = builder.build().map_err(encode_err)?;

    let frames = samples.len() / spec.channels.max(1) as usize;
    let mut mp3 = Vec::with_capacity(max_required_buffer_size(frames));
    match spec.channels {
        1 => {
            encoder
                .encode_to_vec(MonoPcm(&samples), &mut mp3)
                .map_err(encode_err)?;
        }
        2 => {
            let (left, right): (Vec<i16>, Vec<i16>) = samples
                .chunks_exact(2)
                .map(|frame| (frame[0], frame[1]))
                .unzip();
            encoder
                .encode_to_vec(
                    DualPcm {
                        left: &left,
                        right: &right,
                    },
                    &mut mp3,
                )
                .map_err(encode_err)?;
        }
        n => {
            return Err(EspeakError::Encode(format!("unsupported channel count {n}")));
        }
    }
    encoder
        .flush_to_vec::<FlushNoGap>(&mut mp3)
        .map_err(encode_err)?;

    std::fs::write(mp3_path, &mp3)?;
    Ok(frames as f64 / spec.sample_rate as f64)
}

#[cfg(test)]
pub(crate) fn looks_like_mp3(bytes: &[u8]) -> bool {
    bytes.starts_with(b"ID3") || (bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] & 0xE0 == 0xE0)
}

#[cfg(test)]
pub(crate) fn write_test_wav(path: &Path, channels: u16, secs: f32) {
    let spec = hound::WavSpec {
        channels,
        sample_rate: 22_050,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    let frames = (spec.sample_rate as f32 * secs) as usize;
    for i in 0..frames {
        let t = i as f32 / spec.sample_rate as f32;
        let sample = ((t * 440.0 * 2.0 * std::f32::consts::PI).sin() * 8000.0) as i16;
        for _ in 0..channels {
            writer.write_sample(sample).unwrap();
        }
    }
    writer.finalize().unwrap();
}
