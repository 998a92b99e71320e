use std::path::Path;
use std::process::{Child, Command, Stdio};

use log::{debug, warn};

/// Plays clips through an external command. Never blocks the event loop:
/// the child is polled on each tick to release the replay lock.
pub struct AudioPlayer {
    program: String,
    args: Vec<String>,
    enabled: bool,
    child: Option<Child>,
    locked: bool,
}

impl AudioPlayer {
    pub fn new(program: &str, args: &[String], enabled: bool) -> Self {
        Self {
            program: program.to_string(),
            args: args.to_vec(),
            enabled,
            child: None,
            locked: false,
        }
    }

    pub fn disabled() -> Self {
        Self::new("", &[], false)
    }

    /// Whether replay is currently blocked by a locking clip.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn play(&mut self, path: &Path, lock_until_complete: bool) {
        if !self.enabled {
            return;
        }
        if self.locked {
            debug!("replay locked, skipping {}", path.display());
            return;
        }
        self.stop();

        let spawned = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(child) => {
                self.child = Some(child);
                self.locked = lock_until_complete;
            }
            Err(e) => warn!("failed to start {} for {}: {e}", self.program, path.display()),
        }
    }

    /// Reap a finished clip and release the lock.
    pub fn poll(&mut self) {
        if let Some(ref mut child) = self.child {
            match child.try_wait() {
                Ok(Some(_)) | Err(_) => {
                    self.child = None;
                    self.locked = false;
                }
                Ok(None) => {}
            }
        }
    }

    pub fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        self.locked = false;
    }
}

impl Drop for AudioPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}
