pub mod auction_house;
pub mod bidding_engine;
pub mod console;
pub mod ui;

pub use self::{auction_house::*, bidding_engine::*, console::*, ui::*};
use anyhow::{format_err, Result};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
};
use tracing::{error, info, info_span};

pub type ServiceId = String;

/// A service that is a loop that does something
///
/// An iteration should not block for long: termination is only checked
/// in between iterations.
pub trait LoopService: Send {
    fn service_id(&self) -> ServiceId;

    fn run_iteration(&mut self) -> Result<()>;
}

/// Service execution control instance
///
/// All services are basically a loop, and we would like to be able to
/// gracefully terminate them, and handle and top-level error of any
/// of them by gracefully stopping everything else.
#[derive(Clone, Default)]
pub struct ServiceControl {
    stop_all: Arc<AtomicBool>,
}

impl ServiceControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop_all(&self) {
        self.stop_all.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stop_all.load(Ordering::SeqCst)
    }

    pub fn spawn_loop(&self, mut service: impl LoopService + 'static) -> JoinHandle {
        let service_id = service.service_id();
        self.spawn_loop_raw(service_id, move || service.run_iteration())
    }

    /// Start a new service as a loop, with a certain body
    ///
    /// This will take care of checking termination condition and
    /// handling any errors returned by `f`
    fn spawn_loop_raw<F>(&self, service_id: ServiceId, mut f: F) -> JoinHandle
    where
        F: FnMut() -> Result<()> + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));

        JoinHandle::new(
            stop.clone(),
            thread::spawn({
                let stop_all = self.stop_all.clone();
                move || {
                    let _span = info_span!("service", id = %service_id).entered();
                    info!("service started");

                    let res = match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| -> Result<()> {
                        while !stop.load(Ordering::SeqCst) && !stop_all.load(Ordering::SeqCst) {
                            f()?;
                        }
                        Ok(())
                    })) {
                        Err(_e) => Err(format_err!("service {service_id} panicked")),
                        Ok(res) => res,
                    };

                    match res {
                        Ok(()) => {
                            info!("service stopped");
                            Ok(())
                        }
                        Err(e) => {
                            error!(error = ?e, "service failed, stopping all services");
                            stop_all.store(true, Ordering::SeqCst);
                            Err(e.context(format!("service {service_id} failed")))
                        }
                    }
                }
            }),
        )
    }
}

/// Simple thread join wrapper that stops and joins the thread on drop
pub struct JoinHandle {
    stop: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<Result<()>>>,
}

impl JoinHandle {
    fn new(stop: Arc<AtomicBool>, handle: thread::JoinHandle<Result<()>>) -> Self {
        JoinHandle {
            stop,
            thread: Some(handle),
        }
    }

    fn join_mut(&mut self) -> Result<()> {
        if let Some(h) = self.thread.take() {
            h.join().map_err(|e| format_err!("join failed: {:?}", e))?
        } else {
            Ok(())
        }
    }

    /// Wait for the service to terminate on its own (or via `stop_all`)
    pub fn join(mut self) -> Result<()> {
        self.join_mut()
    }
}

impl Drop for JoinHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Err(e) = self.join_mut() {
            error!(error = ?e, "service terminated with an error");
        }
    }
}
