//! Explicit initialization lifecycle for a lazily created service.
//!
//! A consumer holds a [`ServiceHandle`] and asks it for the service instead
//! of probing shared globals. The handle moves through
//! `Uninitialized -> Loading -> Ready | Failed`; `Failed` is sticky until
//! [`ServiceHandle::reset`].
//!
//! ```ignore
//! let mut renderer: ServiceHandle<GpuState, GpuError> = ServiceHandle::new();
//! renderer.initialize(|| pollster::block_on(GpuState::new(window, &field)));
//! if let Some(gpu) = renderer.get_mut() {
//!     gpu.render(clock.elapsed())?;
//! }
//! ```

use std::fmt;

/// Where a service is in its lifecycle, without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    Uninitialized,
    Loading,
    Ready,
    Failed,
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ServiceStatus::Uninitialized => "uninitialized",
            ServiceStatus::Loading => "loading",
            ServiceStatus::Ready => "ready",
            ServiceStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug)]
enum ServiceState<T, E> {
    Uninitialized,
    Loading,
    Ready(T),
    Failed(E),
}

/// Owner of a service and its initialization state.
#[derive(Debug)]
pub struct ServiceHandle<T, E> {
    state: ServiceState<T, E>,
}

impl<T, E> ServiceHandle<T, E> {
    pub fn new() -> Self {
        Self {
            state: ServiceState::Uninitialized,
        }
    }

    pub fn status(&self) -> ServiceStatus {
        match self.state {
            ServiceState::Uninitialized => ServiceStatus::Uninitialized,
            ServiceState::Loading => ServiceStatus::Loading,
            ServiceState::Ready(_) => ServiceStatus::Ready,
            ServiceState::Failed(_) => ServiceStatus::Failed,
        }
    }

    /// Move from `Uninitialized` to `Loading`.
    ///
    /// Returns `false` (and changes nothing) from any other state, so only
    /// one caller starts the load.
    pub fn begin_loading(&mut self) -> bool {
        if matches!(self.state, ServiceState::Uninitialized) {
            self.state = ServiceState::Loading;
            true
        } else {
            false
        }
    }

    /// Finish a load started with [`begin_loading`](Self::begin_loading).
    ///
    /// Returns `false` if the handle was not `Loading`; the result is dropped.
    pub fn complete(&mut self, result: Result<T, E>) -> bool {
        if !matches!(self.state, ServiceState::Loading) {
            return false;
        }
        self.state = match result {
            Ok(service) => ServiceState::Ready(service),
            Err(e) => ServiceState::Failed(e),
        };
        true
    }

    /// Run `init` if the handle is `Uninitialized`, then return the status.
    pub fn initialize<F>(&mut self, init: F) -> ServiceStatus
    where
        F: FnOnce() -> Result<T, E>,
    {
        if self.begin_loading() {
            self.complete(init());
        }
        self.status()
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(self.state, ServiceState::Ready(_))
    }

    /// The service, if ready.
    pub fn get(&self) -> Option<&T> {
        match &self.state {
            ServiceState::Ready(service) => Some(service),
            _ => None,
        }
    }

    /// The service, if ready.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        match &mut self.state {
            ServiceState::Ready(service) => Some(service),
            _ => None,
        }
    }

    /// The failure, if initialization failed.
    pub fn error(&self) -> Option<&E> {
        match &self.state {
            ServiceState::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Consume the handle, returning the failure if there was one.
    pub fn into_error(self) -> Option<E> {
        match self.state {
            ServiceState::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Drop any service or error and return to `Uninitialized`.
    pub fn reset(&mut self) {
        self.state = ServiceState::Uninitialized;
    }
}

impl<T, E> Default for ServiceHandle<T, E> {
    fn default() -> Self {
        Self::new()
    }
}
