//! Stub Effect Host
//!
//! In-memory `EffectHost` used by tests. Records every parameter write with
//! the identity token of the instance that issued it, answers status reads
//! from injectable values, and can be told to fail instance creation or
//! reject writes to specific parameter ids.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::error::HostError;
use crate::status;
use crate::traits::{EffectHost, RemoteEffect};

/// One recorded parameter write.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteRecord {
    /// Identity token of the instance that wrote
    pub token: u64,

    /// Numeric parameter id
    pub id: u32,

    /// Encoded payload bytes
    pub payload: Vec<u8>,
}

struct StubState {
    next_token: AtomicU64,
    writes: Mutex<Vec<WriteRecord>>,
    rejected_ids: Mutex<HashSet<u32>>,
    fail_creates: AtomicBool,
    pid: AtomicI32,
    sample_rate: AtomicI32,
    buffer_length: AtomicI32,
    block_length: AtomicI32,
    released: AtomicUsize,
}

/// Recording in-memory effect host.
#[derive(Clone)]
pub struct StubHost {
    state: Arc<StubState>,
}

impl StubHost {
    pub fn new() -> Self {
        Self {
            state: Arc::new(StubState {
                next_token: AtomicU64::new(1),
                writes: Mutex::new(Vec::new()),
                rejected_ids: Mutex::new(HashSet::new()),
                fail_creates: AtomicBool::new(false),
                pid: AtomicI32::new(4242),
                sample_rate: AtomicI32::new(48000),
                buffer_length: AtomicI32::new(960),
                block_length: AtomicI32::new(1024),
                released: AtomicUsize::new(0),
            }),
        }
    }

    /// All writes recorded so far, oldest first.
    pub fn writes(&self) -> Vec<WriteRecord> {
        self.state.writes.lock().clone()
    }

    pub fn clear_writes(&self) {
        self.state.writes.lock().clear();
    }

    /// Writes issued against a given parameter id.
    pub fn writes_for(&self, id: u32) -> Vec<WriteRecord> {
        self.state
            .writes
            .lock()
            .iter()
            .filter(|w| w.id == id)
            .cloned()
            .collect()
    }

    /// Reject all subsequent writes to `id`.
    pub fn reject_writes_to(&self, id: u32) {
        self.state.rejected_ids.lock().insert(id);
    }

    pub fn accept_all_writes(&self) {
        self.state.rejected_ids.lock().clear();
    }

    /// Make `create_effect` fail until switched back off.
    pub fn fail_creates(&self, fail: bool) {
        self.state.fail_creates.store(fail, Ordering::SeqCst);
    }

    /// Value answered for the process-id status read. Set <= 0 to simulate
    /// a crashed engine.
    pub fn set_pid(&self, pid: i32) {
        self.state.pid.store(pid, Ordering::SeqCst);
    }

    /// Value answered for the sample-rate status read.
    pub fn set_sample_rate(&self, rate: i32) {
        self.state.sample_rate.store(rate, Ordering::SeqCst);
    }

    /// Number of instances released (dropped) so far.
    pub fn released(&self) -> usize {
        self.state.released.load(Ordering::SeqCst)
    }

    /// Token that will be handed to the next created instance.
    pub fn next_token(&self) -> u64 {
        self.state.next_token.load(Ordering::SeqCst)
    }
}

impl Default for StubHost {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectHost for StubHost {
    fn name(&self) -> &'static str {
        "Stub"
    }

    fn create_effect(
        &self,
        session_id: i32,
        priority: i32,
    ) -> Result<Box<dyn RemoteEffect>, HostError> {
        if self.state.fail_creates.load(Ordering::SeqCst) {
            return Err(HostError::CreateFailed {
                session_id,
                reason: "stub host configured to fail".into(),
            });
        }
        let token = self.state.next_token.fetch_add(1, Ordering::SeqCst);
        debug!(session_id, priority, token, "stub effect created");
        Ok(Box::new(StubEffect {
            state: Arc::clone(&self.state),
            token,
            session_id,
            enabled: false,
        }))
    }
}

struct StubEffect {
    state: Arc<StubState>,
    token: u64,
    session_id: i32,
    enabled: bool,
}

impl RemoteEffect for StubEffect {
    fn token(&self) -> u64 {
        self.token
    }

    fn session_id(&self) -> i32 {
        self.session_id
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<(), HostError> {
        self.enabled = enabled;
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_parameter(&mut self, id: u32, payload: &[u8]) -> Result<(), HostError> {
        if self.state.rejected_ids.lock().contains(&id) {
            return Err(HostError::WriteRejected { id });
        }
        self.state.writes.lock().push(WriteRecord {
            token: self.token,
            id,
            payload: payload.to_vec(),
        });
        Ok(())
    }

    fn get_parameter_int(&self, id: u32) -> Option<i32> {
        match id {
            status::PROCESS_ID => Some(self.state.pid.load(Ordering::SeqCst)),
            status::SAMPLE_RATE => Some(self.state.sample_rate.load(Ordering::SeqCst)),
            status::COMMITTED_PARAM_COUNT => Some(self.state.writes.lock().len() as i32),
            status::BUFFER_LENGTH => Some(self.state.buffer_length.load(Ordering::SeqCst)),
            status::ALLOCATED_BLOCK_LENGTH => Some(self.state.block_length.load(Ordering::SeqCst)),
            _ => None,
        }
    }
}

impl Drop for StubEffect {
    fn drop(&mut self) {
        self.state.released.fetch_add(1, Ordering::SeqCst);
    }
}
