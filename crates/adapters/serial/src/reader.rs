//! Device reader — keeps a transport open and forwards decoded events.
//!
//! The reader owns the blocking side of the gateway. It runs on a dedicated
//! blocking thread, decodes the stream with [`LineDecoder`] and pushes each
//! [`RawEvent`] into a bounded channel drained by the async gateway. When the
//! stream fails it reopens the transport, giving up after too many
//! consecutive failures.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use alerthub_domain::event::RawEvent;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::TransportConfig;
use crate::decoder::LineDecoder;
use crate::error::SerialError;
use crate::transport::LineSource;

const STOP_POLL: Duration = Duration::from_millis(50);

/// How one connected session ended.
enum Session {
    /// Stop was requested or nobody is listening any more.
    Stopped,
    /// The stream failed or closed.
    Ended { progress: bool, cause: SerialError },
}

pub struct DeviceReader {
    source: Box<dyn LineSource>,
    reconnect_attempts: u32,
    reconnect_delay: Duration,
    stop: Arc<AtomicBool>,
    tx: mpsc::Sender<RawEvent>,
}

/// Handle on a reader running in the background.
pub struct ReaderHandle {
    stop: Arc<AtomicBool>,
    join: JoinHandle<Result<(), SerialError>>,
}

impl ReaderHandle {
    /// Ask the reader to stop; it notices within one read timeout.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the reader thread to exit.
    ///
    /// # Errors
    ///
    /// Returns the error that made the reader give up, or [`SerialError::Io`]
    /// if the reader thread panicked.
    pub async fn join(self) -> Result<(), SerialError> {
        match self.join.await {
            Ok(result) => result,
            Err(err) => Err(SerialError::Io(std::io::Error::other(err))),
        }
    }
}

impl DeviceReader {
    pub fn new(
        source: Box<dyn LineSource>,
        config: &TransportConfig,
        tx: mpsc::Sender<RawEvent>,
    ) -> Self {
        Self {
            source,
            reconnect_attempts: config.reconnect_attempts,
            reconnect_delay: config.reconnect_delay(),
            stop: Arc::new(AtomicBool::new(false)),
            tx,
        }
    }

    /// Shared flag that makes [`DeviceReader::run`] return once set.
    #[must_use]
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Run the reader on the tokio blocking pool.
    pub fn start(
        source: Box<dyn LineSource>,
        config: &TransportConfig,
        tx: mpsc::Sender<RawEvent>,
    ) -> ReaderHandle {
        let reader = Self::new(source, config, tx);
        let stop = reader.stop_flag();
        let join = tokio::task::spawn_blocking(move || reader.run());
        ReaderHandle { stop, join }
    }

    fn stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Read until stopped, the receiver is dropped, or the transport keeps
    /// failing. Blocks the calling thread.
    ///
    /// # Errors
    ///
    /// Returns [`SerialError::GaveUp`] after more than `reconnect_attempts`
    /// consecutive failed sessions.
    pub fn run(mut self) -> Result<(), SerialError> {
        let mut failures: u32 = 0;
        loop {
            if self.stopped() {
                return Ok(());
            }

            let cause = match self.source.open() {
                Ok(stream) => match self.pump(stream) {
                    Session::Stopped => return Ok(()),
                    Session::Ended { progress, cause } => {
                        if progress {
                            failures = 0;
                        } else {
                            failures += 1;
                        }
                        cause
                    }
                },
                Err(err) => {
                    failures += 1;
                    err
                }
            };

            if failures > self.reconnect_attempts {
                tracing::error!(
                    device = %self.source.describe(),
                    err = %cause,
                    failures,
                    "giving up on device"
                );
                return Err(SerialError::GaveUp {
                    attempts: failures,
                    last: Box::new(cause),
                });
            }

            tracing::warn!(
                device = %self.source.describe(),
                err = %cause,
                failures,
                delay_ms = self.reconnect_delay.as_millis(),
                "device stream lost, reconnecting"
            );
            self.pause();
        }
    }

    fn pump(&self, stream: Box<dyn std::io::Read + Send>) -> Session {
        let mut progress = false;
        for item in LineDecoder::new(stream) {
            if self.stopped() {
                return Session::Stopped;
            }
            match item {
                Ok(event) => {
                    progress = true;
                    tracing::debug!(code = %event.device_code, value = %event.raw_value, "device event");
                    if self.tx.blocking_send(event).is_err() {
                        tracing::debug!("event receiver dropped, stopping reader");
                        return Session::Stopped;
                    }
                }
                // A quiet but open stream is healthy.
                Err(SerialError::Timeout) => progress = true,
                Err(cause) => return Session::Ended { progress, cause },
            }
        }
        Session::Ended {
            progress,
            cause: SerialError::Closed,
        }
    }

    fn pause(&self) {
        let deadline = Instant::now() + self.reconnect_delay;
        loop {
            if self.stopped() {
                return;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return;
            }
            std::thread::sleep(remaining.min(STOP_POLL));
        }
    }
}
