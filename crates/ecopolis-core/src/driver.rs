//! Fixed-interval game loop.
//!
//! The engine is shared behind one mutex. The driver thread takes the lock
//! for exactly one `advance_day` per interval and player commands take the
//! same lock through [`GameLoop::with_engine`], so ticks and commands never
//! interleave.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::engine::{CityEngine, TickReport};
use crate::notify::Notification;
use crate::snapshot::CityView;

/// Called after every tick, outside the engine lock, with the notifications
/// drained during that tick. Without an observer they stay queued on the
/// engine.
pub type TickObserver = Box<dyn FnMut(&TickReport, &CityView, &[Notification]) + Send>;

pub struct GameLoop {
    engine: Arc<Mutex<CityEngine>>,
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

fn lock(engine: &Mutex<CityEngine>) -> MutexGuard<'_, CityEngine> {
    engine.lock().unwrap_or_else(PoisonError::into_inner)
}

impl GameLoop {
    pub fn new(engine: CityEngine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            stop_tx: None,
            handle: None,
        }
    }

    /// Run `f` with exclusive access to the engine.
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut CityEngine) -> R) -> R {
        let mut engine = lock(&self.engine);
        f(&mut engine)
    }

    /// Start ticking every `tick_interval_ms`. Does nothing if the driver
    /// is already running.
    pub fn start(&mut self, mut on_tick: Option<TickObserver>) {
        if self.is_running() {
            return;
        }

        let interval = {
            let engine = lock(&self.engine);
            Duration::from_millis(engine.config().tick_interval_ms)
        };
        let engine = Arc::clone(&self.engine);
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = std::thread::spawn(move || loop {
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }

            let (report, view, notes, over) = {
                let mut engine = lock(&engine);
                let report = engine.advance_day();
                let notes = if on_tick.is_some() {
                    engine.drain_notifications()
                } else {
                    Vec::new()
                };
                let over = engine.state().is_over();
                (report, engine.snapshot(), notes, over)
            };

            if let (Some(report), Some(observer)) = (report.as_ref(), on_tick.as_mut()) {
                observer(report, &view, &notes);
            }
            if over {
                log::info!("Game loop finished");
                break;
            }
        });

        self.stop_tx = Some(stop_tx);
        self.handle = Some(handle);
    }

    /// Whether the driver thread is alive.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the driver and wait for it to exit.
    pub fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            // The thread may already have exited on game over.
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("Game loop thread panicked");
            }
        }
    }
}

impl Drop for GameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
