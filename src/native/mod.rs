//! The boundary to the native libvcx library.
//!
//! Every asynchronous libvcx entry point takes a caller-chosen command handle
//! and a C callback. libvcx performs the work on its own threads and invokes
//! the callback with the same handle once it is done. The [`NativeApi`] trait
//! mirrors those entry points one-to-one so the rest of the crate can be
//! driven by the linked library or by any other implementation of the C ABI.

use std::ffi::{c_char, CStr};

#[cfg(feature = "libvcx")]
mod linked;

#[cfg(feature = "libvcx")]
pub use linked::LinkedLibrary;

/// Correlates a native request with the callback that completes it.
pub type CommandHandle = u32;

/// Callback for entry points that produce a text payload.
pub type PayloadCallback =
    extern "C" fn(command_handle: CommandHandle, err: u32, payload: *const c_char);

/// Callback for entry points that only report an error code.
pub type StatusCallback = extern "C" fn(command_handle: CommandHandle, err: u32);

/// The libvcx entry points used by this crate.
///
/// Methods returning `u32` return the synchronous libvcx status: zero means
/// the request was accepted and `cb` will be invoked exactly once with
/// `command_handle`; anything else means `cb` will never be invoked.
pub trait NativeApi: Send + Sync {
    /// `vcx_provision_agent`. Blocks until provisioning finishes and returns
    /// the agent configuration, or `None` if libvcx returned null.
    fn provision_agent(&self, config: &CStr) -> Option<String>;

    /// `vcx_agent_provision_async`.
    fn agent_provision_async(
        &self,
        command_handle: CommandHandle,
        config: &CStr,
        cb: PayloadCallback,
    ) -> u32;

    /// `vcx_agent_update_info`.
    fn agent_update_info(
        &self,
        command_handle: CommandHandle,
        config: &CStr,
        cb: StatusCallback,
    ) -> u32;

    /// `vcx_messages_download`. `uids` and `pw_dids` are passed as null when absent.
    fn messages_download(
        &self,
        command_handle: CommandHandle,
        message_status: &CStr,
        uids: Option<&CStr>,
        pw_dids: Option<&CStr>,
        cb: PayloadCallback,
    ) -> u32;

    /// `vcx_messages_update_status`.
    fn messages_update_status(
        &self,
        command_handle: CommandHandle,
        message_status: &CStr,
        msg_json: &CStr,
        cb: StatusCallback,
    ) -> u32;
}
