//! Async Rust bindings for the agent and messaging entry points of [libvcx].
//!
//! [libvcx]: <https://github.com/hyperledger/indy-sdk/tree/master/vcx>
//!
//! # Usage
//!
//! ```ignore
//! use vcx_utils::{Config, MessageStatus, Vcx};
//!
//! let vcx = Vcx::linked(Config::default());
//!
//! // Provision a cloud agent with the agency.
//! let agent_config = vcx
//!     .agent_provision_async(r#"{"agency_url":"https://agency.example.com", ...}"#)
//!     .await?;
//!
//! // Fetch unread messages and mark them as reviewed.
//! let messages = vcx
//!     .download_messages(&MessageStatus::Received.to_string(), None, None)
//!     .await?;
//! vcx.update_message_status(&MessageStatus::Reviewed.to_string(), &uids_json)
//!     .await?;
//! ```
//!
//! # How calls are bridged
//!
//! libvcx reports results through C callbacks keyed by a caller-chosen
//! command handle. Each call here registers a pending slot under a fresh
//! handle, passes the handle and a callback to libvcx, and awaits the slot.
//! The callback, invoked on a libvcx thread, removes the slot and completes it.
//! See [`command`] for the table itself.
//!
//! Payloads such as agent configuration and message lists are opaque JSON
//! strings; they are forwarded without interpretation.
//!
//! # Linking
//!
//! The `libvcx` feature links the native library and enables
//! [`Vcx::linked`]. Without it, provide your own [`NativeApi`].
//!
//! [`NativeApi`]: crate::native::NativeApi

mod agent;
pub mod client;
pub mod command;
pub mod config;
pub mod error;
pub mod guard;
pub mod messages;
pub mod native;

pub use client::Vcx;
pub use config::Config;
pub use error::{ErrorCode, Result, VcxError};
pub use messages::MessageStatus;
