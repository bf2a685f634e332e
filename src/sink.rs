//! Outbound byte transports

use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::trace;

use crate::{Result, TelemetryError};

/// Capability accepting finished packets.
///
/// Implementations decide their own retry policy; the driver never retries a packet.
pub trait ByteSink {
    fn write(&mut self, bytes: &[u8]) -> Result<()>;
}

impl<T: ByteSink + ?Sized> ByteSink for &mut T {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write(bytes)
    }
}

impl<T: ByteSink + ?Sized> ByteSink for Box<T> {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write(bytes)
    }
}

/// Sink over any [`std::io::Write`] implementation, such as an open serial port.
///
/// Each packet is written in full and flushed before `write` returns.
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ByteSink for WriterSink<W> {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes).and_then(|()| self.writer.flush()).map_err(|e| {
            TelemetryError::transport_failed_with_source(
                format!("writing {} byte packet", bytes.len()),
                Box::new(e),
            )
        })
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    packets: Vec<Vec<u8>>,
    failures_remaining: usize,
}

/// In-memory sink recording every packet written to it.
///
/// Clones share the same storage, so a handle kept by the caller observes writes made
/// through a clone handed to the driver.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    state: Arc<Mutex<MemoryState>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` writes fail with a transport error.
    pub fn fail_next(&self, count: usize) {
        self.lock().failures_remaining = count;
    }

    /// Copies of every packet written so far, oldest first.
    pub fn packets(&self) -> Vec<Vec<u8>> {
        self.lock().packets.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lock().packets.clear();
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ByteSink for MemorySink {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let mut state = self.lock();
        if state.failures_remaining > 0 {
            state.failures_remaining -= 1;
            return Err(TelemetryError::transport_failed("memory sink scripted failure"));
        }
        trace!("Recorded {} byte packet", bytes.len());
        state.packets.push(bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "port closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writer_sink_writes_whole_packet() {
        let mut sink = WriterSink::new(Vec::new());
        sink.write(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        sink.write(&[9; 8]).unwrap();
        assert_eq!(sink.get_ref().len(), 16);
    }

    #[test]
    fn writer_sink_maps_io_errors_to_transport() {
        let mut sink = WriterSink::new(BrokenPipe);
        let error = sink.write(&[0; 16]).unwrap_err();
        assert!(error.is_retryable());
        assert!(matches!(error, TelemetryError::Transport { source: Some(_), .. }));
        assert!(error.to_string().contains("16 byte packet"));
    }

    #[test]
    fn memory_sink_clones_share_storage() {
        let observer = MemorySink::new();
        let mut writer = observer.clone();
        writer.write(b"packet").unwrap();

        assert_eq!(observer.len(), 1);
        assert_eq!(observer.packets(), vec![b"packet".to_vec()]);

        observer.clear();
        assert!(observer.is_empty());
    }

    #[test]
    fn memory_sink_scripted_failures() {
        let mut sink = MemorySink::new();
        sink.fail_next(2);
        assert!(sink.write(b"a").is_err());
        assert!(sink.write(b"b").is_err());
        assert!(sink.write(b"c").is_ok());
        assert_eq!(sink.packets(), vec![b"c".to_vec()]);
    }
}
