//! A minimal terminal spinner for visual feedback while models answer.

use std::io::Write;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Braille spinner frames.
const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Frame interval.
const INTERVAL: Duration = Duration::from_millis(80);

/// A terminal spinner that runs in a background task.
///
/// Call [`Spinner::start`] to begin, [`Spinner::set_message`] as work
/// progresses, then [`Spinner::stop`] when done. Writes to stderr so it
/// doesn't interfere with stdout output.
pub struct Spinner {
    handle: JoinHandle<()>,
    message: watch::Sender<String>,
    cancel: watch::Sender<bool>,
}

impl Spinner {
    /// Start a spinner with the given message (e.g. `"asking DistilBERT"`).
    pub fn start(message: &str) -> Self {
        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let (message_tx, message_rx) = watch::channel(message.to_string());

        let handle = tokio::spawn(async move {
            let mut i = 0;
            loop {
                let frame = FRAMES[i % FRAMES.len()];
                let message = message_rx.borrow().clone();
                // \r moves to start of line, \x1b[2K clears the line
                eprint!("\x1b[2K\r{frame} {message}");
                let _ = std::io::stderr().flush();

                tokio::select! {
                    _ = tokio::time::sleep(INTERVAL) => {}
                    _ = cancel_rx.changed() => break,
                }
                i += 1;
            }
            eprint!("\x1b[2K\r");
            let _ = std::io::stderr().flush();
        });

        Self {
            handle,
            message: message_tx,
            cancel: cancel_tx,
        }
    }

    /// Replace the text shown next to the spinner.
    pub fn set_message(&self, message: &str) {
        let _ = self.message.send(message.to_string());
    }

    /// Stop the spinner and clear its line.
    pub async fn stop(self) {
        let _ = self.cancel.send(true);
        let _ = self.handle.await;
    }
}
