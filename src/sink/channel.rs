//! Channel sink feeding a separate display pump thread.
//!
//! The pump owns its receiver and the display callback; the driver only owns
//! the sending half. Nothing mutable is shared between the two threads.

use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};

use super::{LayerSink, SinkError};
use crate::signal::PixelBuffer;

/// A frame handed to the display pump.
#[derive(Debug, Clone)]
pub struct LayerFrame {
    pub layer: u32,
    pub buffer: PixelBuffer,
}

/// Sink that forwards frames over a bounded channel.
///
/// When the channel is full the driver blocks until the pump catches up.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: SyncSender<LayerFrame>,
}

impl ChannelSink {
    /// Create a sink and the matching receiver.
    pub fn bounded(capacity: usize) -> (Self, Receiver<LayerFrame>) {
        let (sender, receiver) = mpsc::sync_channel(capacity);
        (Self { sender }, receiver)
    }
}

impl LayerSink for ChannelSink {
    fn deliver(&mut self, layer: u32, buffer: &PixelBuffer) -> Result<(), SinkError> {
        let frame = LayerFrame {
            layer,
            buffer: buffer.clone(),
        };
        match self.sender.try_send(frame) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(frame)) => self
                .sender
                .send(frame)
                .map_err(|_| SinkError::Disconnected { layer }),
            Err(TrySendError::Disconnected(_)) => Err(SinkError::Disconnected { layer }),
        }
    }
}

/// Handle to a running display pump.
#[derive(Debug)]
pub struct DisplayPump {
    handle: JoinHandle<usize>,
}

impl DisplayPump {
    /// Wait for the pump to drain and return how many frames it displayed.
    ///
    /// All [`ChannelSink`]s must be dropped first, otherwise this blocks.
    pub fn join(self) -> Result<usize, SinkError> {
        self.handle
            .join()
            .map_err(|_| SinkError::Rejected(anyhow::anyhow!("display pump panicked")))
    }
}

/// Spawn a thread that calls `display` for every frame sent to the returned sink.
///
/// The pump exits once every clone of the sink has been dropped.
pub fn spawn_display_pump<F>(
    capacity: usize,
    mut display: F,
) -> Result<(ChannelSink, DisplayPump), SinkError>
where
    F: FnMut(LayerFrame) + Send + 'static,
{
    let (sink, receiver) = ChannelSink::bounded(capacity);
    let handle = thread::Builder::new()
        .name("display-pump".into())
        .spawn(move || {
            let mut displayed = 0;
            for frame in receiver {
                log::trace!("Displaying layer {}", frame.layer);
                display(frame);
                displayed += 1;
            }
            displayed
        })?;

    Ok((sink, DisplayPump { handle }))
}
