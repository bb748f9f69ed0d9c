use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

/// How often the backing file is re-checked while waiting.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// File-based semaphore for coordinating with an external operator process.
///
/// The external party (e.g. a dashboard button handler) writes a token into
/// the backing file; this side polls for it and deletes the file on receipt,
/// so each wait consumes the signal at most once. With no path configured
/// the channel degrades to a no-op and every wait resolves immediately.
pub struct SignalChannel {
    path: Option<PathBuf>,
}

impl SignalChannel {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Block until the backing file contains `token`, then consume the file.
    ///
    /// There is no timeout: this can wait indefinitely. Failure to delete the
    /// consumed file is logged but never blocks resolution; a concurrent
    /// writer racing the delete is an accepted risk.
    pub fn wait_for(&self, token: &str) {
        let Some(path) = &self.path else {
            debug!("No signal file configured, resolving immediately");
            return;
        };

        info!(
            "Waiting for '{}' signal in {}",
            token,
            path.display()
        );

        loop {
            match fs::read_to_string(path) {
                Ok(content) => {
                    debug!("Signal file content: {:?}", content);
                    if content.contains(token) {
                        info!("Signal '{}' received", token);
                        if let Err(e) = fs::remove_file(path) {
                            warn!("Failed to delete signal file: {}", e);
                        }
                        return;
                    }
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!("Signal file not present yet");
                }
                Err(e) => {
                    warn!("Error reading signal file: {}", e);
                }
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Instant;

    #[test]
    fn resolves_immediately_without_configured_path() {
        let channel = SignalChannel::new(None);
        let start = Instant::now();
        channel.wait_for("captcha_solved");
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn consumes_existing_signal_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comm.txt");
        fs::write(&path, "captcha_solved").unwrap();

        let channel = SignalChannel::new(Some(path.clone()));
        channel.wait_for("captcha_solved");

        assert!(!path.exists(), "signal file should be deleted on consume");
    }

    #[test]
    fn token_match_is_substring_based() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comm.txt");
        fs::write(&path, "status: captcha_solved at 12:03").unwrap();

        let channel = SignalChannel::new(Some(path.clone()));
        channel.wait_for("captcha_solved");

        assert!(!path.exists());
    }

    #[test]
    fn unblocks_when_token_arrives_mid_poll() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comm.txt");

        let writer_path = path.clone();
        let writer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(200));
            fs::write(&writer_path, "captcha_solved").unwrap();
        });

        let channel = SignalChannel::new(Some(path.clone()));
        channel.wait_for("captcha_solved");

        writer.join().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn ignores_file_with_wrong_token_until_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comm.txt");
        fs::write(&path, "some_other_signal").unwrap();

        let writer_path = path.clone();
        let writer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(200));
            fs::write(&writer_path, "captcha_solved").unwrap();
        });

        let channel = SignalChannel::new(Some(path.clone()));
        channel.wait_for("captcha_solved");

        writer.join().unwrap();
        assert!(!path.exists());
    }
}
