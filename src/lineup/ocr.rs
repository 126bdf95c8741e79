use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{anyhow, Context, Result};

use crate::config::OcrConfig;

const DEFAULT_EXECUTABLE: &str = "tesseract";

/// Turns an image file into plain text.
pub trait TextRecognizer: Send + Sync {
    /// `progress` receives values in `0.0..=1.0`.
    fn recognize(
        &self,
        image_path: &Path,
        language: &str,
        progress: &mut dyn FnMut(f32),
    ) -> Result<String>;
}

/// Runs the `tesseract` executable and reads its stdout.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    executable: PathBuf,
    page_segmentation_mode: u8,
}

impl TesseractCli {
    pub fn new(config: &OcrConfig) -> Self {
        let executable = config
            .tesseract_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXECUTABLE));
        Self {
            executable,
            page_segmentation_mode: config.page_segmentation_mode,
        }
    }
}

impl TextRecognizer for TesseractCli {
    fn recognize(
        &self,
        image_path: &Path,
        language: &str,
        progress: &mut dyn FnMut(f32),
    ) -> Result<String> {
        progress(0.0);

        let output = Command::new(&self.executable)
            .arg(image_path)
            .arg("stdout")
            .arg("-l")
            .arg(language)
            .arg("--psm")
            .arg(self.page_segmentation_mode.to_string())
            .output()
            .with_context(|| format!("failed to run {}", self.executable.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("tesseract failed: {}", stderr.trim()));
        }

        progress(1.0);
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_executable_is_an_error() {
        let config = OcrConfig {
            tesseract_path: Some(PathBuf::from("/nonexistent/tesseract-binary")),
            ..OcrConfig::default()
        };
        let recognizer = TesseractCli::new(&config);
        let mut reported = Vec::new();
        let result = recognizer.recognize(Path::new("lineup.png"), "eng", &mut |p| {
            reported.push(p)
        });
        assert!(result.is_err());
        assert_eq!(reported, vec![0.0]);
    }
}
