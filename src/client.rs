use std::{fmt, sync::Arc, time::Duration};

use crate::{
    command,
    config::Config,
    native::{CommandHandle, NativeApi},
};

/// Async entry point to libvcx.
///
/// Cloning is cheap; clones share the same native library.
#[derive(Clone)]
pub struct Vcx {
    pub(crate) native: Arc<dyn NativeApi>,
    config: Config,
}

impl Vcx {
    pub fn new(native: Arc<dyn NativeApi>, config: Config) -> Self {
        Self { native, config }
    }

    /// A client calling into the linked libvcx shared library.
    #[cfg(feature = "libvcx")]
    pub fn linked(config: Config) -> Self {
        Self::new(Arc::new(crate::native::LinkedLibrary), config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of commands still waiting for a libvcx callback, process-wide.
    pub fn pending_commands(&self) -> usize {
        command::pending_commands()
    }

    pub fn is_command_pending(&self, handle: CommandHandle) -> bool {
        command::is_command_pending(handle)
    }

    /// Drops commands that have waited longer than `max_age` for a callback.
    /// Their futures resolve with [`crate::VcxError::Cancelled`].
    pub fn remove_expired_commands(&self, max_age: Duration) -> usize {
        command::remove_expired_commands(max_age)
    }

    pub(crate) fn command_timeout(&self) -> Option<Duration> {
        self.config.command_timeout()
    }
}

impl fmt::Debug for Vcx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vcx")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
