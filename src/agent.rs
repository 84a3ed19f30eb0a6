use tracing::debug;

use crate::{
    client::Vcx,
    command::{dispatch, payload_callback, status_callback, PAYLOAD_COMMANDS, STATUS_COMMANDS},
    error::{Result, VcxError},
    guard,
};

impl Vcx {
    /// Provisions a cloud agent and returns the resulting agent configuration.
    ///
    /// This blocks the current thread until libvcx has finished talking to the
    /// agency; prefer [`Vcx::agent_provision_async`] inside async code.
    pub fn provision_agent(&self, config: &str) -> Result<String> {
        debug!(
            operation = "vcx_provision_agent",
            config_len = config.len(),
            "entry point called"
        );
        let config = guard::not_blank(config, "config")?;

        let result = self
            .native
            .provision_agent(&config)
            .ok_or(VcxError::ProvisionFailed)?;
        debug!(
            operation = "vcx_provision_agent",
            result_len = result.len(),
            "entry point finished"
        );
        Ok(result)
    }

    /// Provisions a cloud agent without blocking and resolves with the agent
    /// configuration JSON produced by libvcx.
    pub async fn agent_provision_async(&self, config: &str) -> Result<String> {
        debug!(
            operation = "vcx_agent_provision_async",
            config_len = config.len(),
            "entry point called"
        );
        let config = guard::not_blank(config, "config")?;

        dispatch(
            &*PAYLOAD_COMMANDS,
            "vcx_agent_provision_async",
            self.command_timeout(),
            |handle| {
                self.native
                    .agent_provision_async(handle, &config, payload_callback)
            },
        )
        .await
    }

    /// Updates the agent with new information, such as a push-notification
    /// token. `config` is forwarded to libvcx untouched.
    pub async fn update_agent_info(&self, config: &str) -> Result<()> {
        debug!(
            operation = "vcx_agent_update_info",
            config_len = config.len(),
            "entry point called"
        );
        let config = guard::not_blank(config, "config")?;

        dispatch(
            &*STATUS_COMMANDS,
            "vcx_agent_update_info",
            self.command_timeout(),
            |handle| self.native.agent_update_info(handle, &config, status_callback),
        )
        .await
    }
}
