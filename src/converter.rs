use std::path::PathBuf;

use crate::artifact::{package, ArtifactFile, PackagedAudio};
use crate::config::ConverterConfig;
use crate::engines::{CloudParams, EngineSession, LocalParams};
use crate::error::ConversionError;
use crate::request::{ConversionRequest, Language, EMPTY_TEXT_MESSAGE};
use crate::SynthesisEngine;

#[cfg(feature = "gtts")]
use crate::engines::{espeak::EspeakEngine, gtts::GttsEngine};

/// Turns a [`ConversionRequest`] into packaged audio.
///
/// English goes to the local engine `L` with the request's rate and voice
/// index; Arabic goes to the cloud engine `C` at normal pace. Each call runs
/// to completion on the calling thread.
pub struct Converter<L, C> {
    local: L,
    cloud: C,
    work_dir: PathBuf,
}

#[cfg(feature = "gtts")]
impl Converter<EspeakEngine, GttsEngine> {
    /// Converter with the espeak-ng and Google Translate engines.
    pub fn new(config: ConverterConfig) -> Self {
        let local = EspeakEngine::with_config(config.espeak.clone(), &config.local_voice_language);
        let cloud = GttsEngine::new(config.cloud.clone());
        Self::with_engines(local, cloud, &config)
    }
}

impl<L, C> Converter<L, C>
where
    L: SynthesisEngine<SynthesisParams = LocalParams>,
    C: SynthesisEngine<SynthesisParams = CloudParams>,
{
    /// Converter over caller-supplied engines.
    ///
    /// [`Converter::new`] exists only with the default `gtts` feature. Without
    /// it, pair [`EspeakEngine`](crate::engines::espeak::EspeakEngine) with any
    /// engine taking [`CloudParams`]:
    ///
    /// ```rust,no_run
    /// # use std::path::Path;
    /// use tts_converter::engines::{espeak::EspeakEngine, CloudParams};
    /// use tts_converter::{Converter, ConverterConfig, EngineError, SynthesisEngine};
    ///
    /// struct NoCloud;
    ///
    /// impl SynthesisEngine for NoCloud {
    ///     type SynthesisParams = CloudParams;
    ///     fn name(&self) -> &'static str {
    ///         "none"
    ///     }
    ///     fn synthesize_to_file(
    ///         &mut self,
    ///         _text: &str,
    ///         _out_path: &Path,
    ///         _params: Option<CloudParams>,
    ///     ) -> Result<(), EngineError> {
    ///         Err("Arabic is not available in this build".into())
    ///     }
    /// }
    ///
    /// let config = ConverterConfig::default();
    /// let local = EspeakEngine::with_config(config.espeak.clone(), "en");
    /// let _converter = Converter::with_engines(local, NoCloud, &config);
    /// ```
    pub fn with_engines(local: L, cloud: C, config: &ConverterConfig) -> Self {
        Self {
            local,
            cloud,
            work_dir: config.work_dir(),
        }
    }

    /// Synthesize the request into a fresh artifact file.
    ///
    /// On failure nothing is left on disk: the artifact is dropped, which
    /// removes any partial output.
    pub fn synthesize(
        &mut self,
        request: &ConversionRequest,
    ) -> Result<ArtifactFile, ConversionError> {
        let text = request.text();
        if text.trim().is_empty() {
            return Err(ConversionError::Validation(EMPTY_TEXT_MESSAGE.to_string()));
        }

        let artifact = ArtifactFile::create_in(&self.work_dir)?;
        log::info!(
            "Converting {} chars of '{}' text into {}",
            text.chars().count(),
            request.language(),
            artifact.file_name()
        );

        match request.language() {
            Language::Ar => {
                let params = CloudParams {
                    lang: request.language().code().to_string(),
                    slow: false,
                };
                run_engine(&mut self.cloud, text, &artifact, params)?;
            }
            Language::En => {
                let params = LocalParams {
                    rate: request.speed().unwrap_or_default().wpm(),
                    voice_index: request.voice().index(),
                };
                run_engine(&mut self.local, text, &artifact, params)?;
            }
        }

        if !artifact.path().exists() {
            return Err(ConversionError::ArtifactMissing(artifact.path().to_path_buf()));
        }
        Ok(artifact)
    }

    /// Synthesize and package in one step. The artifact file is gone afterwards.
    pub fn convert(
        &mut self,
        request: &ConversionRequest,
    ) -> Result<PackagedAudio, ConversionError> {
        let artifact = self.synthesize(request)?;
        let packaged = package(artifact)?;
        log::info!(
            "Conversion complete: {} ({} bytes)",
            packaged.download().file_name(),
            packaged.audio().bytes().len()
        );
        Ok(packaged)
    }

    pub fn local_engine(&self) -> &L {
        &self.local
    }

    pub fn cloud_engine(&self) -> &C {
        &self.cloud
    }
}

fn run_engine<E: SynthesisEngine>(
    engine: &mut E,
    text: &str,
    artifact: &ArtifactFile,
    params: E::SynthesisParams,
) -> Result<(), ConversionError> {
    let name = engine.name();
    let wrap = |source| ConversionError::Synthesis {
        engine: name,
        source,
    };
    let mut session = EngineSession::open(engine).map_err(wrap)?;
    session
        .synthesize_to_file(text, artifact.path(), params)
        .map_err(wrap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::is_artifact_file_name;
    use crate::request::{ConversionRequestBuilder, Voice};
    use crate::EngineError;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    /// Records every call and writes fixed bytes, or fails on demand.
    struct MockEngine<P> {
        calls: Arc<Mutex<Vec<(String, P)>>>,
        loads: Arc<Mutex<usize>>,
        unloads: Arc<Mutex<usize>>,
        fail: bool,
        write_output: bool,
    }

    impl<P> MockEngine<P> {
        fn working() -> Self {
            Self {
                calls: Arc::default(),
                loads: Arc::default(),
                unloads: Arc::default(),
                fail: false,
                write_output: true,
            }
        }
    }

    impl<P: Default + Clone> SynthesisEngine for MockEngine<P> {
        type SynthesisParams = P;

        fn name(&self) -> &'static str {
            "mock"
        }

        fn load(&mut self) -> Result<(), EngineError> {
            *self.loads.lock().unwrap() += 1;
            Ok(())
        }

        fn unload(&mut self) {
            *self.unloads.lock().unwrap() += 1;
        }

        fn synthesize_to_file(
            &mut self,
            text: &str,
            out_path: &Path,
            params: Option<P>,
        ) -> Result<(), EngineError> {
            self.calls
                .lock()
                .unwrap()
                .push((text.to_string(), params.unwrap_or_default()));
            if self.fail {
                std::fs::write(out_path, b"partial")?;
                return Err("mock engine failure".into());
            }
            if self.write_output {
                std::fs::write(out_path, format!("audio for {text}"))?;
            }
            Ok(())
        }
    }

    type MockConverter = Converter<MockEngine<LocalParams>, MockEngine<CloudParams>>;

    fn converter(
        work: &Path,
        local: MockEngine<LocalParams>,
        cloud: MockEngine<CloudParams>,
    ) -> MockConverter {
        let config = ConverterConfig {
            work_dir: Some(work.to_path_buf()),
            ..ConverterConfig::default()
        };
        Converter::with_engines(local, cloud, &config)
    }

    fn is_empty_dir(dir: &Path) -> bool {
        std::fs::read_dir(dir).unwrap().next().is_none()
    }

    #[test]
    fn english_goes_to_local_engine_with_rate_and_voice() {
        let work = tempfile::tempdir().unwrap();
        let mut conv = converter(work.path(), MockEngine::working(), MockEngine::working());
        let request = ConversionRequestBuilder::default()
            .text("Hello world")
            .language(Language::En)
            .voice(Voice::Male)
            .speed(175u16)
            .build()
            .unwrap();

        let packaged = conv.convert(&request).unwrap();

        let calls = conv.local_engine().calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![(
                "Hello world".to_string(),
                LocalParams {
                    rate: 175,
                    voice_index: 0
                }
            )]
        );
        assert!(conv.cloud_engine().calls.lock().unwrap().is_empty());
        assert!(is_artifact_file_name(packaged.download().file_name()));
        assert_eq!(packaged.audio().bytes(), b"audio for Hello world");
        assert_eq!(packaged.download().decode().unwrap(), b"audio for Hello world");
        assert!(is_empty_dir(work.path()));
    }

    #[test]
    fn female_voice_selects_second_voice() {
        let work = tempfile::tempdir().unwrap();
        let mut conv = converter(work.path(), MockEngine::working(), MockEngine::working());
        let request = ConversionRequestBuilder::default()
            .text("Hi")
            .voice(Voice::Female)
            .speed(500u16)
            .build()
            .unwrap();

        conv.convert(&request).unwrap();

        let calls = conv.local_engine().calls.lock().unwrap();
        assert_eq!(calls[0].1.voice_index, 1);
        assert_eq!(calls[0].1.rate, 300);
    }

    #[test]
    fn arabic_goes_to_cloud_engine_at_normal_pace() {
        let work = tempfile::tempdir().unwrap();
        let mut conv = converter(work.path(), MockEngine::working(), MockEngine::working());
        let request = ConversionRequestBuilder::default()
            .text("مرحبا")
            .language(Language::Ar)
            .voice(Voice::Male)
            .speed(90u16)
            .build()
            .unwrap();

        let packaged = conv.convert(&request).unwrap();

        let calls = conv.cloud_engine().calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![(
                "مرحبا".to_string(),
                CloudParams {
                    lang: "ar".to_string(),
                    slow: false
                }
            )]
        );
        assert!(conv.local_engine().calls.lock().unwrap().is_empty());
        assert!(!packaged.audio().bytes().is_empty());
        assert!(is_empty_dir(work.path()));
    }

    #[test]
    fn engine_is_loaded_and_unloaded_per_request() {
        let work = tempfile::tempdir().unwrap();
        let mut conv = converter(work.path(), MockEngine::working(), MockEngine::working());
        let request = ConversionRequestBuilder::default().text("one").build().unwrap();

        conv.convert(&request).unwrap();
        conv.convert(&request).unwrap();

        assert_eq!(*conv.local_engine().loads.lock().unwrap(), 2);
        assert_eq!(*conv.local_engine().unloads.lock().unwrap(), 2);
        assert_eq!(*conv.cloud_engine().loads.lock().unwrap(), 0);
    }

    #[test]
    fn engine_failure_surfaces_and_leaves_no_file() {
        let work = tempfile::tempdir().unwrap();
        let failing = MockEngine {
            fail: true,
            ..MockEngine::working()
        };
        let mut conv = converter(work.path(), failing, MockEngine::working());
        let request = ConversionRequestBuilder::default().text("Hello").build().unwrap();

        match conv.convert(&request) {
            Err(err @ ConversionError::Synthesis { engine, .. }) => {
                assert_eq!(engine, "mock");
                assert!(err.user_message().contains("mock engine failure"));
            }
            other => panic!("expected Synthesis error, got {other:?}"),
        }
        assert_eq!(*conv.local_engine().unloads.lock().unwrap(), 1);
        assert!(is_empty_dir(work.path()));
    }

    #[test]
    fn silent_engine_reports_missing_artifact() {
        let work = tempfile::tempdir().unwrap();
        let silent = MockEngine {
            write_output: false,
            ..MockEngine::working()
        };
        let mut conv = converter(work.path(), silent, MockEngine::working());
        let request = ConversionRequestBuilder::default().text("Hello").build().unwrap();

        assert!(matches!(
            conv.convert(&request),
            Err(ConversionError::ArtifactMissing(_))
        ));
        assert!(is_empty_dir(work.path()));
    }

    #[test]
    fn empty_text_never_reaches_an_engine() {
        let work = tempfile::tempdir().unwrap();
        let conv = converter(work.path(), MockEngine::working(), MockEngine::working());

        let err: ConversionError = ConversionRequestBuilder::default()
            .text("   ")
            .build()
            .unwrap_err()
            .into();

        assert!(matches!(err, ConversionError::Validation(_)));
        assert_eq!(err.user_message(), EMPTY_TEXT_MESSAGE);
        assert!(conv.local_engine().calls.lock().unwrap().is_empty());
        assert!(is_empty_dir(work.path()));
    }

    #[cfg(all(unix, feature = "gtts"))]
    #[test]
    fn english_download_is_mp3_encoded() {
        let bin = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let config = ConverterConfig {
            work_dir: Some(work.path().to_path_buf()),
            espeak: crate::engines::espeak::test_support::fake_espeak(bin.path()),
            ..ConverterConfig::default()
        };
        let mut conv = Converter::new(config);
        let request = ConversionRequestBuilder::default()
            .text("Hello world")
            .voice(Voice::Female)
            .build()
            .unwrap();

        let packaged = conv.convert(&request).unwrap();

        let bytes = packaged.download().decode().unwrap();
        assert!(crate::engines::espeak::looks_like_mp3(&bytes));
        assert!(!bytes.starts_with(b"RIFF"));
        assert_eq!(packaged.download().mime_type(), "audio/mpeg");
        assert!(is_artifact_file_name(packaged.download().file_name()));
        assert!(is_empty_dir(work.path()));
    }
}
