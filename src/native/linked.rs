use std::{
    ffi::{c_char, CStr},
    ptr,
};

use super::{CommandHandle, NativeApi, PayloadCallback, StatusCallback};

#[link(name = "vcx")]
extern "C" {
    fn vcx_provision_agent(json: *const c_char) -> *mut c_char;

    fn vcx_agent_provision_async(
        command_handle: CommandHandle,
        json: *const c_char,
        cb: Option<PayloadCallback>,
    ) -> u32;

    fn vcx_agent_update_info(
        command_handle: CommandHandle,
        json: *const c_char,
        cb: Option<StatusCallback>,
    ) -> u32;

    fn vcx_messages_download(
        command_handle: CommandHandle,
        message_status: *const c_char,
        uids: *const c_char,
        pw_dids: *const c_char,
        cb: Option<PayloadCallback>,
    ) -> u32;

    fn vcx_messages_update_status(
        command_handle: CommandHandle,
        message_status: *const c_char,
        msg_json: *const c_char,
        cb: Option<StatusCallback>,
    ) -> u32;
}

/// [`NativeApi`] backed by the `libvcx` shared library found by the linker.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkedLibrary;

fn nullable(value: Option<&CStr>) -> *const c_char {
    value.map_or(ptr::null(), CStr::as_ptr)
}

impl NativeApi for LinkedLibrary {
    fn provision_agent(&self, config: &CStr) -> Option<String> {
        // SAFETY: `config` is a valid NUL-terminated string for the duration of the call.
        let result = unsafe { vcx_provision_agent(config.as_ptr()) };
        if result.is_null() {
            return None;
        }
        // SAFETY: libvcx returns a NUL-terminated string it allocated.
        // TODO: release the string once libvcx exports a matching free function.
        let value = unsafe { CStr::from_ptr(result) };
        Some(value.to_string_lossy().into_owned())
    }

    fn agent_provision_async(
        &self,
        command_handle: CommandHandle,
        config: &CStr,
        cb: PayloadCallback,
    ) -> u32 {
        // SAFETY: libvcx copies its string arguments before returning.
        unsafe { vcx_agent_provision_async(command_handle, config.as_ptr(), Some(cb)) }
    }

    fn agent_update_info(
        &self,
        command_handle: CommandHandle,
        config: &CStr,
        cb: StatusCallback,
    ) -> u32 {
        // SAFETY: see `agent_provision_async`.
        unsafe { vcx_agent_update_info(command_handle, config.as_ptr(), Some(cb)) }
    }

    fn messages_download(
        &self,
        command_handle: CommandHandle,
        message_status: &CStr,
        uids: Option<&CStr>,
        pw_dids: Option<&CStr>,
        cb: PayloadCallback,
    ) -> u32 {
        // SAFETY: see `agent_provision_async`; null is accepted for the optional filters.
        unsafe {
            vcx_messages_download(
                command_handle,
                message_status.as_ptr(),
                nullable(uids),
                nullable(pw_dids),
                Some(cb),
            )
        }
    }

    fn messages_update_status(
        &self,
        command_handle: CommandHandle,
        message_status: &CStr,
        msg_json: &CStr,
        cb: StatusCallback,
    ) -> u32 {
        // SAFETY: see `agent_provision_async`.
        unsafe {
            vcx_messages_update_status(
                command_handle,
                message_status.as_ptr(),
                msg_json.as_ptr(),
                Some(cb),
            )
        }
    }
}
