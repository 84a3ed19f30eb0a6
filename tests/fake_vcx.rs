use std::{
    collections::VecDeque,
    ffi::{CStr, CString},
    ptr,
    sync::{Arc, Mutex},
    thread::{self, JoinHandle},
    time::Duration,
};

use vcx_utils::{
    native::{CommandHandle, NativeApi, PayloadCallback, StatusCallback},
    Config, Vcx,
};

/// How the fake library answers every asynchronous call.
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Accept the call and call back with success and the given payload.
    Succeed(Option<String>),
    /// Accept the call and call back with the handle as a JSON payload.
    EchoHandle,
    /// Accept the call and call back with a non-zero error code.
    Fail(u32),
    /// Refuse the call synchronously; the callback is never invoked.
    Reject(u32),
    /// Accept the call and call back with success after a delay.
    Delayed(Duration),
    /// Accept the call and never call back.
    Hang,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub entry_point: &'static str,
    pub handle: CommandHandle,
    pub args: Vec<Option<String>>,
}

/// Stand-in for libvcx that answers from its own threads, as libvcx does.
#[derive(Debug)]
pub struct FakeVcx {
    /// One entry per call; the last entry answers every remaining call.
    behaviors: Mutex<VecDeque<Behavior>>,
    provisioned: Option<String>,
    calls: Mutex<Vec<Call>>,
    callbacks: Mutex<Vec<JoinHandle<()>>>,
}

impl FakeVcx {
    pub fn new(behavior: Behavior) -> Arc<Self> {
        Self::scripted(vec![behavior])
    }

    /// Answers the n-th call with the n-th behavior.
    pub fn scripted(behaviors: Vec<Behavior>) -> Arc<Self> {
        assert!(!behaviors.is_empty());
        Arc::new(Self {
            behaviors: Mutex::new(behaviors.into()),
            provisioned: None,
            calls: Mutex::new(Vec::new()),
            callbacks: Mutex::new(Vec::new()),
        })
    }

    pub fn provisioning(result: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            behaviors: Mutex::new(VecDeque::from([Behavior::Hang])),
            provisioned: result.map(str::to_owned),
            calls: Mutex::new(Vec::new()),
            callbacks: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Waits for every callback thread spawned so far, re-raising any panic
    /// that happened inside a callback.
    pub fn join_callbacks(&self) {
        let callbacks: Vec<_> = self.callbacks.lock().unwrap().drain(..).collect();
        for callback in callbacks {
            if let Err(panic) = callback.join() {
                std::panic::resume_unwind(panic);
            }
        }
    }

    fn next_behavior(&self) -> Behavior {
        let mut behaviors = self.behaviors.lock().unwrap();
        if behaviors.len() > 1 {
            behaviors.pop_front().unwrap()
        } else {
            behaviors[0].clone()
        }
    }

    fn spawn_callback<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.callbacks.lock().unwrap().push(thread::spawn(callback));
    }

    fn record(&self, entry_point: &'static str, handle: CommandHandle, args: &[Option<&CStr>]) {
        let args = args
            .iter()
            .map(|arg| arg.map(|a| a.to_string_lossy().into_owned()))
            .collect();
        self.calls.lock().unwrap().push(Call {
            entry_point,
            handle,
            args,
        });
    }

    fn answer_payload(&self, handle: CommandHandle, cb: PayloadCallback) -> u32 {
        let payload = match self.next_behavior() {
            Behavior::Reject(rc) => return rc,
            Behavior::Hang => return 0,
            Behavior::Fail(err) => {
                self.spawn_callback(move || cb(handle, err, ptr::null()));
                return 0;
            }
            Behavior::Succeed(payload) => payload,
            Behavior::EchoHandle => Some(format!(r#"{{"handle":{handle}}}"#)),
            Behavior::Delayed(delay) => {
                self.spawn_callback(move || {
                    thread::sleep(delay);
                    let payload = CString::new("late").unwrap();
                    cb(handle, 0, payload.as_ptr());
                });
                return 0;
            }
        };

        self.spawn_callback(move || {
            let payload = payload.map(|p| CString::new(p).unwrap());
            cb(handle, 0, payload.as_ref().map_or(ptr::null(), |p| p.as_ptr()));
        });
        0
    }

    fn answer_status(&self, handle: CommandHandle, cb: StatusCallback) -> u32 {
        match self.next_behavior() {
            Behavior::Reject(rc) => return rc,
            Behavior::Hang => return 0,
            Behavior::Fail(err) => {
                self.spawn_callback(move || cb(handle, err));
            }
            Behavior::Delayed(delay) => {
                self.spawn_callback(move || {
                    thread::sleep(delay);
                    cb(handle, 0);
                });
            }
            Behavior::Succeed(_) | Behavior::EchoHandle => {
                self.spawn_callback(move || cb(handle, 0));
            }
        }
        0
    }
}

impl NativeApi for FakeVcx {
    fn provision_agent(&self, config: &CStr) -> Option<String> {
        self.record("vcx_provision_agent", 0, &[Some(config)]);
        self.provisioned.clone()
    }

    fn agent_provision_async(
        &self,
        command_handle: CommandHandle,
        config: &CStr,
        cb: PayloadCallback,
    ) -> u32 {
        self.record("vcx_agent_provision_async", command_handle, &[Some(config)]);
        self.answer_payload(command_handle, cb)
    }

    fn agent_update_info(
        &self,
        command_handle: CommandHandle,
        config: &CStr,
        cb: StatusCallback,
    ) -> u32 {
        self.record("vcx_agent_update_info", command_handle, &[Some(config)]);
        self.answer_status(command_handle, cb)
    }

    fn messages_download(
        &self,
        command_handle: CommandHandle,
        message_status: &CStr,
        uids: Option<&CStr>,
        pw_dids: Option<&CStr>,
        cb: PayloadCallback,
    ) -> u32 {
        self.record(
            "vcx_messages_download",
            command_handle,
            &[Some(message_status), uids, pw_dids],
        );
        self.answer_payload(command_handle, cb)
    }

    fn messages_update_status(
        &self,
        command_handle: CommandHandle,
        message_status: &CStr,
        msg_json: &CStr,
        cb: StatusCallback,
    ) -> u32 {
        self.record(
            "vcx_messages_update_status",
            command_handle,
            &[Some(message_status), Some(msg_json)],
        );
        self.answer_status(command_handle, cb)
    }
}

pub fn client(fake: &Arc<FakeVcx>) -> Vcx {
    Vcx::new(fake.clone(), Config::default())
}

pub fn client_with_timeout(fake: &Arc<FakeVcx>, timeout: Duration) -> Vcx {
    Vcx::new(
        fake.clone(),
        Config::default().with_command_timeout(timeout),
    )
}
