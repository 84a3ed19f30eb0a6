//! Pending command table bridging libvcx callbacks to futures.
//!
//! Flow:
//! 1. [`dispatch`] registers a pending slot and receives a fresh handle.
//! 2. The native entry point is invoked with that handle and one of the
//!    `extern "C"` callbacks below.
//! 3. libvcx invokes the callback from one of its own threads; the callback
//!    removes the slot and completes it.
//! 4. The awaiting caller receives the result through a oneshot channel.
//!
//! C callbacks carry no context besides the handle, so the tables the
//! callbacks complete are process-wide.

use std::{
    ffi::{c_char, CStr},
    sync::atomic::{AtomicU32, Ordering},
    time::{Duration, Instant},
};

use dashmap::DashMap;
use lazy_static::lazy_static;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::{
    error::{check_result, Result, VcxError},
    native::CommandHandle,
};

static NEXT_COMMAND_HANDLE: AtomicU32 = AtomicU32::new(1);

lazy_static! {
    /// Commands completed through [`payload_callback`].
    pub(crate) static ref PAYLOAD_COMMANDS: CommandRegistry<String> = CommandRegistry::new();
    /// Commands completed through [`status_callback`].
    pub(crate) static ref STATUS_COMMANDS: CommandRegistry<()> = CommandRegistry::new();
}

/// Returns a process-wide unique command handle. Zero is never handed out.
pub fn next_command_handle() -> CommandHandle {
    loop {
        let handle = NEXT_COMMAND_HANDLE.fetch_add(1, Ordering::Relaxed);
        if handle != 0 {
            return handle;
        }
    }
}

struct PendingCommand<T> {
    sender: oneshot::Sender<Result<T>>,
    operation: &'static str,
    created_at: Instant,
}

/// Maps command handles to the result slots of in-flight native calls.
pub struct CommandRegistry<T> {
    pending: DashMap<CommandHandle, PendingCommand<T>>,
}

impl<T> Default for CommandRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CommandRegistry<T> {
    pub fn new() -> Self {
        Self {
            pending: DashMap::new(),
        }
    }

    /// Stores a new result slot and returns its handle with the receiving end.
    pub fn register(
        &self,
        operation: &'static str,
    ) -> (CommandHandle, oneshot::Receiver<Result<T>>) {
        let (sender, receiver) = oneshot::channel();
        let handle = next_command_handle();

        self.pending.insert(
            handle,
            PendingCommand {
                sender,
                operation,
                created_at: Instant::now(),
            },
        );

        debug!(command_handle = handle, operation, "registered command");
        (handle, receiver)
    }

    /// Removes the slot for `handle` and completes it with `result`.
    ///
    /// Returns false if the handle is unknown or the waiter is gone.
    pub fn complete(&self, handle: CommandHandle, result: Result<T>) -> bool {
        self.complete_with(handle, |_| result)
    }

    /// Like [`CommandRegistry::complete`], but only builds the result once the
    /// slot is found. The closure receives the operation name of the slot.
    pub fn complete_with<F>(&self, handle: CommandHandle, build: F) -> bool
    where
        F: FnOnce(&'static str) -> Result<T>,
    {
        let Some((_, pending)) = self.pending.remove(&handle) else {
            warn!(
                command_handle = handle,
                "callback for unknown or expired command handle"
            );
            return false;
        };

        let elapsed = pending.created_at.elapsed();
        if pending.sender.send(build(pending.operation)).is_err() {
            debug!(
                command_handle = handle,
                operation = pending.operation,
                "command waiter dropped before completion"
            );
            return false;
        }

        debug!(
            command_handle = handle,
            operation = pending.operation,
            elapsed_ms = elapsed.as_millis(),
            "completed command"
        );
        true
    }

    /// Drops the slot for `handle` without completing it.
    pub fn cancel(&self, handle: CommandHandle) -> bool {
        self.pending.remove(&handle).is_some()
    }

    pub fn is_pending(&self, handle: CommandHandle) -> bool {
        self.pending.contains_key(&handle)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Drops every slot older than `max_age`, returning how many were removed.
    pub fn remove_expired(&self, max_age: Duration) -> usize {
        let mut removed = 0;
        self.pending.retain(|handle, pending| {
            let elapsed = pending.created_at.elapsed();
            if elapsed > max_age {
                warn!(
                    command_handle = *handle,
                    operation = pending.operation,
                    elapsed_ms = elapsed.as_millis(),
                    "removing expired command"
                );
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }
}

/// Drops the slot for `handle` when the waiting future goes away, whether it
/// finished, failed, timed out or was dropped by the caller.
struct SlotGuard<'a, T> {
    registry: &'a CommandRegistry<T>,
    operation: &'static str,
    handle: CommandHandle,
}

impl<T> Drop for SlotGuard<'_, T> {
    fn drop(&mut self) {
        if self.registry.cancel(self.handle) {
            debug!(
                command_handle = self.handle,
                operation = self.operation,
                "released command slot without a callback"
            );
        }
    }
}

/// Runs one native call through `registry`.
///
/// `call` receives the registered handle and returns the synchronous libvcx
/// status. A non-zero status means the callback will never fire, so the slot
/// is dropped and the status returned as an error. The slot is also dropped
/// if the returned future is dropped before the callback arrives.
pub(crate) async fn dispatch<T, F>(
    registry: &CommandRegistry<T>,
    operation: &'static str,
    timeout: Option<Duration>,
    call: F,
) -> Result<T>
where
    F: FnOnce(CommandHandle) -> u32,
{
    let (handle, receiver) = registry.register(operation);
    let _slot = SlotGuard {
        registry,
        operation,
        handle,
    };

    if let Err(err) = check_result(call(handle)) {
        warn!(command_handle = handle, operation, "native call rejected: {err}");
        return Err(err);
    }

    let received = match timeout {
        Some(limit) => match tokio::time::timeout(limit, receiver).await {
            Ok(received) => received,
            Err(_) => {
                warn!(
                    command_handle = handle,
                    operation,
                    timeout_ms = limit.as_millis(),
                    "command timed out"
                );
                return Err(VcxError::Timeout { operation, handle });
            }
        },
        None => receiver.await,
    };

    let result = received.map_err(|_| VcxError::Cancelled { operation, handle })?;
    if let Err(err) = &result {
        warn!(command_handle = handle, operation, "command failed: {err}");
    }
    result
}

/// Number of commands waiting for a libvcx callback, across both tables.
pub fn pending_commands() -> usize {
    PAYLOAD_COMMANDS.pending_count() + STATUS_COMMANDS.pending_count()
}

/// Whether `handle` is still waiting for a libvcx callback.
pub fn is_command_pending(handle: CommandHandle) -> bool {
    PAYLOAD_COMMANDS.is_pending(handle) || STATUS_COMMANDS.is_pending(handle)
}

/// Sweeps both tables for commands older than `max_age`.
pub fn remove_expired_commands(max_age: Duration) -> usize {
    PAYLOAD_COMMANDS.remove_expired(max_age) + STATUS_COMMANDS.remove_expired(max_age)
}

/// Completes a command from [`PAYLOAD_COMMANDS`].
pub(crate) extern "C" fn payload_callback(
    command_handle: CommandHandle,
    err: u32,
    payload: *const c_char,
) {
    debug!(command_handle, err, "payload callback");
    PAYLOAD_COMMANDS.complete_with(command_handle, |operation| {
        check_result(err)?;
        if payload.is_null() {
            return Err(VcxError::MissingPayload { operation });
        }
        // SAFETY: libvcx passes a NUL-terminated string that stays valid until the callback returns.
        let payload = unsafe { CStr::from_ptr(payload) };
        payload
            .to_str()
            .map(str::to_owned)
            .map_err(|_| VcxError::InvalidUtf8 { operation })
    });
}

/// Completes a command from [`STATUS_COMMANDS`].
pub(crate) extern "C" fn status_callback(command_handle: CommandHandle, err: u32) {
    debug!(command_handle, err, "status callback");
    STATUS_COMMANDS.complete(command_handle, check_result(err));
}
