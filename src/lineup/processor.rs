//! Background lineup recognition.
//!
//! One job at a time runs on its own thread. The UI thread polls for
//! progress and the final extraction each frame, so the board stays
//! interactive while the recogniser works.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use super::{Extraction, LineupExtractor, TextRecognizer};

enum WorkerMessage {
    Progress(f32),
    Done(Extraction),
}

pub struct LineupProcessor {
    recognizer: Arc<dyn TextRecognizer>,
    extractor: Arc<LineupExtractor>,
    language: String,
    job: Option<Receiver<WorkerMessage>>,
    progress: f32,
}

impl LineupProcessor {
    pub fn new(
        recognizer: Arc<dyn TextRecognizer>,
        extractor: LineupExtractor,
        language: impl Into<String>,
    ) -> Self {
        Self {
            recognizer,
            extractor: Arc::new(extractor),
            language: language.into(),
            job: None,
            progress: 0.0,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.job.is_some()
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Starts recognising `image_path`. Returns `false` and does nothing
    /// while another job is still running.
    pub fn submit(&mut self, image_path: PathBuf) -> bool {
        if self.is_busy() {
            log::warn!(
                "lineup job already running, ignoring {}",
                image_path.display()
            );
            return false;
        }

        let (sender, receiver) = mpsc::channel();
        let recognizer = Arc::clone(&self.recognizer);
        let extractor = Arc::clone(&self.extractor);
        let language = self.language.clone();

        let spawned = thread::Builder::new()
            .name("lineup-ocr".to_string())
            .spawn(move || run_job(recognizer.as_ref(), &extractor, &language, image_path, sender));
        if let Err(e) = spawned {
            // The sender went down with the closure; the next poll falls back.
            log::warn!("failed to start lineup worker: {e}");
        }

        self.job = Some(receiver);
        self.progress = 0.0;
        true
    }

    /// Drains worker messages. Returns the extraction once the job is over.
    pub fn poll(&mut self) -> Option<Extraction> {
        let receiver = self.job.as_ref()?;

        let extraction = loop {
            match receiver.try_recv() {
                Ok(WorkerMessage::Progress(progress)) => self.progress = progress,
                Ok(WorkerMessage::Done(extraction)) => break extraction,
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => {
                    log::warn!("lineup worker exited without a result, using reference lineup");
                    break Extraction::reference();
                }
            }
        };

        self.job = None;
        self.progress = 1.0;
        Some(extraction)
    }
}

fn run_job(
    recognizer: &dyn TextRecognizer,
    extractor: &LineupExtractor,
    language: &str,
    image_path: PathBuf,
    sender: Sender<WorkerMessage>,
) {
    match image::image_dimensions(&image_path) {
        Ok((width, height)) => log::info!(
            "processing lineup image {} ({width}x{height}px)",
            image_path.display()
        ),
        Err(e) => log::warn!("could not decode {}: {e}", image_path.display()),
    }

    let mut report = |progress: f32| {
        let _ = sender.send(WorkerMessage::Progress(progress));
    };
    let extraction = match recognizer.recognize(&image_path, language, &mut report) {
        Ok(text) => {
            log::debug!("recognised text:\n{text}");
            extractor.extract(&text)
        }
        Err(e) => {
            log::warn!("recognition failed, using reference lineup: {e:#}");
            Extraction::reference()
        }
    };

    log::info!(
        "lineup from {}: {} players",
        extraction.source.label(),
        extraction.records.len()
    );
    let _ = sender.send(WorkerMessage::Done(extraction));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Mutex;
    use std::time::Duration;

    use anyhow::{anyhow, Result};

    use crate::config::LineupConfig;
    use crate::lineup::{ExtractionSource, reference_lineup};

    struct FixedText(&'static str);

    impl TextRecognizer for FixedText {
        fn recognize(&self, _: &Path, _: &str, progress: &mut dyn FnMut(f32)) -> Result<String> {
            progress(0.5);
            progress(1.0);
            Ok(self.0.to_string())
        }
    }

    struct Failing;

    impl TextRecognizer for Failing {
        fn recognize(&self, _: &Path, _: &str, _: &mut dyn FnMut(f32)) -> Result<String> {
            Err(anyhow!("engine unavailable"))
        }
    }

    struct Panicking;

    impl TextRecognizer for Panicking {
        fn recognize(&self, _: &Path, _: &str, _: &mut dyn FnMut(f32)) -> Result<String> {
            panic!("recogniser crashed");
        }
    }

    /// Blocks until the test releases it.
    struct Gated(Mutex<Receiver<()>>);

    impl TextRecognizer for Gated {
        fn recognize(&self, _: &Path, _: &str, _: &mut dyn FnMut(f32)) -> Result<String> {
            let gate = self.0.lock().map_err(|_| anyhow!("gate poisoned"))?;
            gate.recv()?;
            Ok(String::new())
        }
    }

    fn processor(recognizer: Arc<dyn TextRecognizer>) -> LineupProcessor {
        let extractor = LineupExtractor::new(LineupConfig::default()).unwrap();
        LineupProcessor::new(recognizer, extractor, "eng")
    }

    fn wait_for(processor: &mut LineupProcessor) -> Extraction {
        for _ in 0..500 {
            if let Some(extraction) = processor.poll() {
                return extraction;
            }
            thread::sleep(Duration::from_millis(10));
        }
        panic!("lineup job did not finish");
    }

    #[test]
    fn test_recognised_text_is_extracted() {
        let text = "1 Alisson\n2 Arnold\n4 Dijk\n5 Konate\n26 Robertson\n3 Fabinho";
        let mut processor = processor(Arc::new(FixedText(text)));

        assert!(!processor.is_busy());
        assert!(processor.submit(PathBuf::from("missing-lineup.png")));
        let extraction = wait_for(&mut processor);

        assert_eq!(extraction.source, ExtractionSource::NumberedPairs);
        assert_eq!(extraction.records.len(), 6);
        assert!(!processor.is_busy());
        assert_eq!(processor.progress(), 1.0);
    }

    #[test]
    fn test_recognition_failure_yields_reference() {
        let mut processor = processor(Arc::new(Failing));
        assert!(processor.submit(PathBuf::from("lineup.png")));
        let extraction = wait_for(&mut processor);
        assert_eq!(extraction.source, ExtractionSource::Reference);
        assert_eq!(extraction.records, reference_lineup());
    }

    #[test]
    fn test_worker_crash_yields_reference() {
        let mut processor = processor(Arc::new(Panicking));
        assert!(processor.submit(PathBuf::from("lineup.png")));
        let extraction = wait_for(&mut processor);
        assert_eq!(extraction.source, ExtractionSource::Reference);
    }

    #[test]
    fn test_second_submit_is_rejected_while_busy() {
        let (release, gate) = mpsc::channel();
        let mut processor = processor(Arc::new(Gated(Mutex::new(gate))));

        assert!(processor.submit(PathBuf::from("first.png")));
        assert!(processor.is_busy());
        assert!(!processor.submit(PathBuf::from("second.png")));
        assert!(processor.poll().is_none());

        release.send(()).unwrap();
        let extraction = wait_for(&mut processor);
        assert_eq!(extraction.source, ExtractionSource::Reference);
        assert!(processor.submit(PathBuf::from("third.png")));
        drop(release);
        wait_for(&mut processor);
    }

    #[test]
    fn test_poll_without_job_is_none() {
        let mut processor = processor(Arc::new(Failing));
        assert!(processor.poll().is_none());
    }
}
