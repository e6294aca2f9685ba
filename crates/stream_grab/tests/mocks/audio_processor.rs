use std::{
    fs::OpenOptions,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use stream_source::{AudioProcessor, SourceError};

#[derive(Clone, Default)]
pub struct MockAudioProcessor {
    pub calls: Arc<Mutex<Vec<(PathBuf, PathBuf)>>>,
    pub fail_with: Option<String>,
}

impl MockAudioProcessor {
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

impl AudioProcessor for MockAudioProcessor {
    fn extract_audio(&self, src: &Path, dest: &Path) -> Result<(), SourceError> {
        self.calls
            .lock()
            .unwrap()
            .push((src.to_path_buf(), dest.to_path_buf()));

        if let Some(ref msg) = self.fail_with {
            return Err(SourceError::Io(io::Error::other(msg.clone())));
        }
        if !src.exists() {
            return Err(SourceError::MissingOutput(src.to_path_buf()));
        }

        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(dest)
            .and_then(|mut file| file.write_all(b"audio-bytes"))?;
        Ok(())
    }
}
