//! Frame sinks.
//!
//! A sink receives each layer's frame from the cascade driver. Delivery can
//! fail; the driver logs the failure and moves on to the next layer.
//!
//! Provided sinks:
//! - [`NullSink`]: discards frames
//! - [`MemorySink`]: keeps every frame in memory
//! - [`ImageSink`]: writes one PNG per layer
//! - [`ChannelSink`]: forwards frames to a display pump thread
//!
//! Any `FnMut(u32, &PixelBuffer) -> anyhow::Result<()>` closure is a sink too.

mod channel;
mod image_sink;

pub use channel::{spawn_display_pump, ChannelSink, DisplayPump, LayerFrame};
pub use image_sink::ImageSink;

use crate::signal::PixelBuffer;

/// Errors a sink can report for a single layer.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Display pump disconnected before layer {layer}")]
    Disconnected { layer: u32 },
    #[error("Frame rejected: {0}")]
    Rejected(#[from] anyhow::Error),
}

/// Consumer of rendered layer frames.
pub trait LayerSink {
    /// Consume or display the frame for `layer`.
    fn deliver(&mut self, layer: u32, buffer: &PixelBuffer) -> Result<(), SinkError>;
}

impl<F> LayerSink for F
where
    F: FnMut(u32, &PixelBuffer) -> anyhow::Result<()>,
{
    fn deliver(&mut self, layer: u32, buffer: &PixelBuffer) -> Result<(), SinkError> {
        self(layer, buffer).map_err(SinkError::Rejected)
    }
}

/// Sink that drops every frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl LayerSink for NullSink {
    fn deliver(&mut self, _layer: u32, _buffer: &PixelBuffer) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Sink that keeps a copy of every delivered frame.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    frames: Vec<(u32, PixelBuffer)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivered frames in delivery order.
    pub fn frames(&self) -> &[(u32, PixelBuffer)] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<(u32, PixelBuffer)> {
        self.frames
    }
}

impl LayerSink for MemorySink {
    fn deliver(&mut self, layer: u32, buffer: &PixelBuffer) -> Result<(), SinkError> {
        self.frames.push((layer, buffer.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_keeps_order() {
        let mut sink = MemorySink::new();
        sink.deliver(2, &PixelBuffer::new(1, 1)).unwrap();
        sink.deliver(0, &PixelBuffer::new(2, 1)).unwrap();
        let layers: Vec<u32> = sink.frames().iter().map(|(l, _)| *l).collect();
        assert_eq!(layers, vec![2, 0]);
        assert_eq!(sink.frames()[1].1.width(), 2);
    }

    #[test]
    fn test_closure_sink_error_is_rejected() {
        let mut sink = |layer: u32, _: &PixelBuffer| -> anyhow::Result<()> {
            anyhow::bail!("layer {} refused", layer)
        };
        let err = sink.deliver(4, &PixelBuffer::new(1, 1)).unwrap_err();
        assert!(matches!(err, SinkError::Rejected(_)));
        assert!(err.to_string().contains("layer 4 refused"));
    }
}
