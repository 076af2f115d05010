use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::sync::{oneshot, Mutex as AsyncMutex, OwnedMutexGuard};
use tokio::task::JoinHandle;

pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryReason {
    TimedOut,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceStatus {
    Active,
    Expired(ExpiryReason),
}

/// Active/Expired state of one rendered surface. `Expired` is terminal.
#[derive(Debug)]
pub struct Lifecycle {
    status: SurfaceStatus,
    deadline: Instant,
}

impl Lifecycle {
    pub fn new(opened_at: Instant, ttl: Duration) -> Self {
        Self {
            status: SurfaceStatus::Active,
            deadline: opened_at + ttl,
        }
    }

    pub fn status(&self) -> SurfaceStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == SurfaceStatus::Active
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Moves to `Expired`. Only the call that performs the transition returns true.
    pub fn expire(&mut self, reason: ExpiryReason) -> bool {
        if !self.is_active() {
            return false;
        }
        self.status = SurfaceStatus::Expired(reason);
        true
    }

    pub fn expire_if_due(&mut self, now: Instant) -> bool {
        if now < self.deadline {
            return false;
        }
        self.expire(ExpiryReason::TimedOut)
    }
}

/// Exclusive hold on a live surface for the duration of one user action.
///
/// While held, the deadline task cannot expire the surface, so a render issued
/// here always lands before the terminal render.
pub struct ActiveSurface {
    guard: OwnedMutexGuard<Lifecycle>,
}

impl ActiveSurface {
    /// Ends the surface on behalf of the user. The hold is kept until drop.
    pub fn close(&mut self) -> bool {
        self.guard.expire(ExpiryReason::Closed)
    }
}

/// One-shot deadline bound to a single surface instance.
pub struct SessionTimer {
    lifecycle: Arc<AsyncMutex<Lifecycle>>,
    deadline: Instant,
    cancel: Mutex<Option<oneshot::Sender<()>>>,
}

impl SessionTimer {
    pub fn new(ttl: Duration) -> Self {
        let lifecycle = Lifecycle::new(Instant::now(), ttl);
        let deadline = lifecycle.deadline();
        Self {
            lifecycle: Arc::new(AsyncMutex::new(lifecycle)),
            deadline,
            cancel: Mutex::new(None),
        }
    }

    pub async fn status(&self) -> SurfaceStatus {
        self.lifecycle.lock().await.status()
    }

    /// Waits for any in-flight action or expiry, then returns a hold if the
    /// surface is still live.
    pub async fn acquire(&self) -> Option<ActiveSurface> {
        let guard = Arc::clone(&self.lifecycle).lock_owned().await;
        if guard.is_active() {
            Some(ActiveSurface { guard })
        } else {
            None
        }
    }

    /// Schedules the deadline. `on_expire` runs at most once, while the
    /// surface is held, and never if the surface was closed first.
    pub fn arm<F, Fut>(&self, on_expire: F) -> JoinHandle<()>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        if let Some(previous) = self.cancel.lock().unwrap().replace(tx) {
            let _ = previous.send(());
        }

        let lifecycle = Arc::clone(&self.lifecycle);
        let deadline = tokio::time::Instant::from_std(self.deadline);

        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep_until(deadline) => {
                    let mut lifecycle = lifecycle.lock().await;
                    if lifecycle.expire_if_due(Instant::now()) {
                        on_expire().await;
                    }
                }
                _ = rx => {
                    log::debug!("Surface deadline disarmed");
                }
            }
        })
    }

    /// Cancels the pending deadline. Returns false if nothing was armed.
    pub fn disarm(&self) -> bool {
        match self.cancel.lock().unwrap().take() {
            Some(tx) => {
                let _ = tx.send(());
                true
            }
            None => false,
        }
    }
}
