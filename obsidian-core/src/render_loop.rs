/// Start/stop controlled frame loop on a dedicated thread
use std::fmt;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Counts frames over one second windows.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window_start: Option<Instant>,
    frames: u32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            window_start: None,
            frames: 0,
        }
    }

    /// Record a frame at `now`. Returns the frame count of the window that
    /// just closed, once a full second has passed. The frame that closes a
    /// window is the first frame of the next one.
    pub fn tick(&mut self, now: Instant) -> Option<u32> {
        let start = match self.window_start {
            Some(start) => start,
            None => {
                self.window_start = Some(now);
                self.frames = 1;
                return None;
            }
        };

        if now.duration_since(start) >= Duration::from_secs(1) {
            let fps = self.frames;
            self.window_start = Some(now);
            self.frames = 1;
            Some(fps)
        } else {
            self.frames += 1;
            None
        }
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives a frame callback on a background thread until stopped.
///
/// The stop flag is checked once per iteration. Without a frame cap the loop
/// spins as fast as the callback returns.
pub struct RenderLoop {
    running: Arc<AtomicBool>,
    fps: Arc<AtomicU32>,
    frame_cap: Option<Duration>,
    handle: Option<JoinHandle<()>>,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            fps: Arc::new(AtomicU32::new(0)),
            frame_cap: None,
            handle: None,
        }
    }

    /// Sleep out the rest of each frame so it takes at least `1 / fps`.
    pub fn with_fps_cap(mut self, fps: u32) -> Self {
        self.frame_cap = (fps > 0).then(|| Duration::from_secs(1) / fps);
        self
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Frames rendered during the last full second.
    pub fn fps(&self) -> u32 {
        self.fps.load(Ordering::Relaxed)
    }

    /// Shared handle to the measured frame rate, readable from the callback.
    pub fn fps_handle(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.fps)
    }

    /// Start calling `frame` in a loop. A running loop is stopped first.
    ///
    /// An error returned by `frame` is logged and only aborts that frame.
    pub fn start<F, E>(&mut self, mut frame: F) -> io::Result<()>
    where
        F: FnMut() -> Result<(), E> + Send + 'static,
        E: fmt::Display,
    {
        self.stop();

        self.running.store(true, Ordering::Release);
        let running = Arc::clone(&self.running);
        let fps = Arc::clone(&self.fps);
        let frame_cap = self.frame_cap;

        let spawned = thread::Builder::new()
            .name("render".to_string())
            .spawn(move || {
                let mut counter = FpsCounter::new();
                log::info!("render loop started");

                while running.load(Ordering::Acquire) {
                    let frame_start = Instant::now();
                    if let Some(measured) = counter.tick(frame_start) {
                        fps.store(measured, Ordering::Relaxed);
                    }

                    if let Err(err) = frame() {
                        log::warn!("frame aborted: {}", err);
                    }

                    if let Some(cap) = frame_cap {
                        let elapsed = frame_start.elapsed();
                        if elapsed < cap {
                            thread::sleep(cap - elapsed);
                        }
                    }
                }

                log::info!("render loop stopped");
            });

        match spawned {
            Ok(handle) => {
                self.handle = Some(handle);
                Ok(())
            }
            Err(err) => {
                self.running.store(false, Ordering::Release);
                Err(err)
            }
        }
    }

    /// Clear the stop flag and wait for the current frame to finish.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("render thread panicked");
            }
        }
    }
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
