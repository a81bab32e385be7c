//! Channel-fed landmark source

use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use crate::{LandmarkFrame, LandmarkSource, SourceError};

/// Receives frames pushed by an external perception process
pub struct ChannelSource {
    receiver: Receiver<LandmarkFrame>,
    poll_timeout: Duration,
}

impl ChannelSource {
    /// Wrap a receiver; a wait longer than `poll_timeout` yields `Unavailable`
    pub fn new(receiver: Receiver<LandmarkFrame>, poll_timeout: Duration) -> Self {
        Self {
            receiver,
            poll_timeout,
        }
    }
}

impl LandmarkSource for ChannelSource {
    fn next_frame(&mut self) -> Result<LandmarkFrame, SourceError> {
        match self.receiver.recv_timeout(self.poll_timeout) {
            Ok(frame) => Ok(frame),
            Err(RecvTimeoutError::Timeout) => Err(SourceError::Unavailable(format!(
                "no frame within {:?}",
                self.poll_timeout
            ))),
            Err(RecvTimeoutError::Disconnected) => Err(SourceError::Closed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Instant;

    #[test]
    fn test_receives_pushed_frame() {
        let (tx, rx) = mpsc::channel();
        let mut source = ChannelSource::new(rx, Duration::from_millis(50));

        let at = Instant::now();
        tx.send(LandmarkFrame::empty(at)).unwrap();

        let frame = source.next_frame().unwrap();
        assert_eq!(frame.captured_at, at);
    }

    #[test]
    fn test_timeout_is_unavailable() {
        let (_tx, rx) = mpsc::channel::<LandmarkFrame>();
        let mut source = ChannelSource::new(rx, Duration::from_millis(10));

        assert!(matches!(source.next_frame(), Err(SourceError::Unavailable(_))));
    }

    #[test]
    fn test_disconnect_is_closed() {
        let (tx, rx) = mpsc::channel::<LandmarkFrame>();
        drop(tx);
        let mut source = ChannelSource::new(rx, Duration::from_millis(10));

        assert!(matches!(source.next_frame(), Err(SourceError::Closed)));
    }
}
