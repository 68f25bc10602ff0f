//! PNG-per-layer sink.

use std::path::{Path, PathBuf};

use image::RgbaImage;

use super::{LayerSink, SinkError};
use crate::signal::PixelBuffer;

/// Writes each frame to `<dir>/layer_NN.png`.
#[derive(Debug, Clone)]
pub struct ImageSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl ImageSink {
    /// Create the sink, creating `dir` if needed.
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, SinkError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            written: Vec::new(),
        })
    }

    /// Path the frame for `layer` is written to.
    pub fn path_for(&self, layer: u32) -> PathBuf {
        self.dir.join(format!("layer_{:02}.png", layer))
    }

    /// Files written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl LayerSink for ImageSink {
    fn deliver(&mut self, layer: u32, buffer: &PixelBuffer) -> Result<(), SinkError> {
        let (width, height) = (buffer.width(), buffer.height());
        let image = RgbaImage::from_raw(width, height, buffer.as_bytes().to_vec())
            .ok_or_else(|| anyhow::anyhow!("buffer does not match {}x{} RGBA", width, height))?;

        let path = self.path_for(layer);
        image.save(&path)?;
        log::debug!("Wrote layer {} to {}", layer, path.display());
        self.written.push(path);
        Ok(())
    }
}
