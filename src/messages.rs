use std::{fmt, str::FromStr};

use anyhow::{bail, Error};
use tracing::debug;

use crate::{
    client::Vcx,
    command::{dispatch, payload_callback, status_callback, PAYLOAD_COMMANDS, STATUS_COMMANDS},
    error::Result,
    guard,
};

/// Message states tracked by the agency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageStatus {
    Created,
    Sent,
    Received,
    Accepted,
    Rejected,
    Reviewed,
}

impl MessageStatus {
    pub fn code(&self) -> &'static str {
        match self {
            MessageStatus::Created => "MS-101",
            MessageStatus::Sent => "MS-102",
            MessageStatus::Received => "MS-103",
            MessageStatus::Accepted => "MS-104",
            MessageStatus::Rejected => "MS-105",
            MessageStatus::Reviewed => "MS-106",
        }
    }

    /// Builds the comma-separated status filter accepted by
    /// [`Vcx::download_messages`].
    pub fn join(statuses: &[MessageStatus]) -> String {
        statuses
            .iter()
            .map(MessageStatus::code)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for MessageStatus {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim() {
            "MS-101" => MessageStatus::Created,
            "MS-102" => MessageStatus::Sent,
            "MS-103" => MessageStatus::Received,
            "MS-104" => MessageStatus::Accepted,
            "MS-105" => MessageStatus::Rejected,
            "MS-106" => MessageStatus::Reviewed,
            other => bail!("unknown message status {other}"),
        })
    }
}

impl Vcx {
    /// Downloads messages from the agency.
    ///
    /// `message_status` is a comma-separated list of status codes. `uids` and
    /// `pw_dids` optionally narrow the download to specific messages and
    /// pairwise DIDs. Resolves with the messages JSON as returned by libvcx.
    pub async fn download_messages(
        &self,
        message_status: &str,
        uids: Option<&str>,
        pw_dids: Option<&str>,
    ) -> Result<String> {
        debug!(
            operation = "vcx_messages_download",
            message_status,
            uids = uids.unwrap_or_default(),
            pw_dids = pw_dids.unwrap_or_default(),
            "entry point called"
        );
        let message_status = guard::not_blank(message_status, "message_status")?;
        let uids = guard::optional(uids, "uids")?;
        let pw_dids = guard::optional(pw_dids, "pw_dids")?;

        dispatch(
            &*PAYLOAD_COMMANDS,
            "vcx_messages_download",
            self.command_timeout(),
            |handle| {
                self.native.messages_download(
                    handle,
                    &message_status,
                    uids.as_deref(),
                    pw_dids.as_deref(),
                    payload_callback,
                )
            },
        )
        .await
    }

    /// Sets `message_status` on the messages listed in `msg_json`.
    pub async fn update_message_status(&self, message_status: &str, msg_json: &str) -> Result<()> {
        debug!(
            operation = "vcx_messages_update_status",
            message_status,
            msg_json_len = msg_json.len(),
            "entry point called"
        );
        let message_status = guard::not_blank(message_status, "message_status")?;
        let msg_json = guard::to_c_string(msg_json, "msg_json")?;

        dispatch(
            &*STATUS_COMMANDS,
            "vcx_messages_update_status",
            self.command_timeout(),
            |handle| {
                self.native
                    .messages_update_status(handle, &message_status, &msg_json, status_callback)
            },
        )
        .await
    }
}
