use crate::engine::AnimationEngine;
use kinetic_world::WorldBackend;
use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Background thread calling [`AnimationEngine::tick`] once per period until stopped.
///
/// If a tick panics the thread shuts the engine down, cancelling every
/// running animation so no structure is left busy, and exits.
pub struct FixedTicker {
    stop_tx: Option<mpsc::Sender<()>>,
    worker: Option<JoinHandle<()>>,
    ticks: Arc<AtomicU64>,
}

impl FixedTicker {
    pub fn start<B>(engine: Arc<AnimationEngine<B>>, period: Duration) -> io::Result<Self>
    where
        B: WorldBackend + 'static,
    {
        let ticks = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&ticks);
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let worker = thread::Builder::new()
            .name("kinetic-ticker".into())
            .spawn(move || loop {
                match stop_rx.recv_timeout(period) {
                    Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
                    Err(mpsc::RecvTimeoutError::Timeout) => {
                        let ticked = panic::catch_unwind(AssertUnwindSafe(|| engine.tick()));
                        if let Err(payload) = ticked {
                            log::error!("Tick failed: {}", panic_message(payload.as_ref()));
                            engine.shutdown();
                            break;
                        }
                        counter.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })?;

        log::debug!("Ticker started with a {} ms period", period.as_millis());
        Ok(Self {
            stop_tx: Some(stop_tx),
            worker: Some(worker),
            ticks,
        })
    }

    /// Ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|w| !w.is_finished())
    }

    /// Stop the thread and wait for the tick in progress to finish.
    pub fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("Ticker thread panicked");
            }
        }
    }
}

impl Drop for FixedTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "unknown panic"
    }
}
