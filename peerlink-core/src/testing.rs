//! In-memory recording doubles for the engine, transport and observer ports.
//!
//! Each double is `Clone`; clones share one log so a test can keep a copy
//! while the orchestrator (or the runtime control task) owns another.

use crate::domain::{
    CloseReason, EngineHandle, IceCandidate, MediaTrack, PeerId, SessionDescription,
    SessionGeneration, TrackBinding,
};
use crate::ports::{
    EngineConfig, EngineError, NegotiationEngine, ServerAddress, SessionObserver,
    SignalingTransport, TransportError,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// One call made on [`RecordingEngine`]
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Create {
        handle: EngineHandle,
        security_enabled: bool,
    },
    Destroy(EngineHandle),
    CreateOffer(EngineHandle),
    CreateAnswer(EngineHandle),
    SetLocalDescription(EngineHandle, SessionDescription),
    SetRemoteDescription(EngineHandle, SessionDescription),
    AddRemoteCandidate(EngineHandle, IceCandidate),
    AddTrack(EngineHandle, MediaTrack, Vec<String>),
    SetAudioEnabled(EngineHandle, bool),
}

#[derive(Debug, Default)]
struct EngineLog {
    calls: Vec<EngineCall>,
    next_handle: u64,
    created: Vec<(EngineHandle, SessionGeneration)>,
    senders: HashMap<EngineHandle, Vec<TrackBinding>>,
    fail_creates: usize,
    reuse_handles: bool,
    reject_local_descriptions: bool,
    reject_remote_descriptions: bool,
    reject_candidates: bool,
}

impl EngineLog {
    /// Fresh handle, or the lowest free slot when reuse is enabled
    fn allocate(&mut self) -> EngineHandle {
        if self.reuse_handles {
            let mut slot = 0;
            while self.senders.contains_key(&EngineHandle(slot)) {
                slot += 1;
            }
            return EngineHandle(slot);
        }
        self.next_handle += 1;
        EngineHandle(self.next_handle)
    }
}

/// Negotiation engine double that records every call
#[derive(Debug, Clone, Default)]
pub struct RecordingEngine {
    log: Arc<Mutex<EngineLog>>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        lock(&self.log).calls.clone()
    }

    pub fn clear_calls(&self) {
        lock(&self.log).calls.clear();
    }

    /// Make the next `count` calls to `create_engine` fail
    pub fn fail_next_creates(&self, count: usize) {
        lock(&self.log).fail_creates = count;
    }

    /// Hand out the lowest free slot index instead of a fresh handle, like
    /// engines that recycle instances
    pub fn reuse_handles(&self, reuse: bool) {
        lock(&self.log).reuse_handles = reuse;
    }

    pub fn reject_local_descriptions(&self, reject: bool) {
        lock(&self.log).reject_local_descriptions = reject;
    }

    pub fn reject_remote_descriptions(&self, reject: bool) {
        lock(&self.log).reject_remote_descriptions = reject;
    }

    pub fn reject_candidates(&self, reject: bool) {
        lock(&self.log).reject_candidates = reject;
    }

    /// Handles created and not yet destroyed
    pub fn live_handles(&self) -> Vec<EngineHandle> {
        let log = lock(&self.log);
        let mut handles: Vec<_> = log.senders.keys().copied().collect();
        handles.sort_by_key(|h| h.0);
        handles
    }

    pub fn last_handle(&self) -> Option<EngineHandle> {
        lock(&self.log).calls.iter().rev().find_map(|call| match call {
            EngineCall::Create { handle, .. } => Some(*handle),
            _ => None,
        })
    }

    /// Handle and generation of the most recently created engine
    pub fn last_engine(&self) -> Option<(EngineHandle, SessionGeneration)> {
        lock(&self.log).created.last().copied()
    }

    pub fn count(&self, predicate: impl Fn(&EngineCall) -> bool) -> usize {
        lock(&self.log).calls.iter().filter(|c| predicate(c)).count()
    }

    pub fn create_answer_count(&self) -> usize {
        self.count(|c| matches!(c, EngineCall::CreateAnswer(_)))
    }

    pub fn create_offer_count(&self) -> usize {
        self.count(|c| matches!(c, EngineCall::CreateOffer(_)))
    }

    pub fn remote_candidates(&self) -> Vec<IceCandidate> {
        lock(&self.log)
            .calls
            .iter()
            .filter_map(|call| match call {
                EngineCall::AddRemoteCandidate(_, candidate) => Some(candidate.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: EngineCall) {
        lock(&self.log).calls.push(call);
    }

    fn ensure_live(&self, handle: EngineHandle) -> Result<(), EngineError> {
        if lock(&self.log).senders.contains_key(&handle) {
            Ok(())
        } else {
            Err(EngineError::UnknownHandle(handle))
        }
    }
}

impl NegotiationEngine for RecordingEngine {
    fn create_engine(&mut self, config: &EngineConfig) -> Result<EngineHandle, EngineError> {
        let mut log = lock(&self.log);
        if log.fail_creates > 0 {
            log.fail_creates -= 1;
            return Err(EngineError::Unavailable("factory refused".to_string()));
        }
        let handle = log.allocate();
        log.senders.insert(handle, Vec::new());
        log.created.push((handle, config.generation));
        log.calls.push(EngineCall::Create {
            handle,
            security_enabled: config.security_enabled,
        });
        Ok(handle)
    }

    fn destroy_engine(&mut self, handle: EngineHandle) {
        let mut log = lock(&self.log);
        log.senders.remove(&handle);
        log.calls.push(EngineCall::Destroy(handle));
    }

    fn create_offer(&mut self, handle: EngineHandle) -> Result<(), EngineError> {
        self.ensure_live(handle)?;
        self.record(EngineCall::CreateOffer(handle));
        Ok(())
    }

    fn create_answer(&mut self, handle: EngineHandle) -> Result<(), EngineError> {
        self.ensure_live(handle)?;
        self.record(EngineCall::CreateAnswer(handle));
        Ok(())
    }

    fn set_local_description(
        &mut self,
        handle: EngineHandle,
        description: &SessionDescription,
    ) -> Result<(), EngineError> {
        self.ensure_live(handle)?;
        let reject = lock(&self.log).reject_local_descriptions;
        self.record(EngineCall::SetLocalDescription(handle, description.clone()));
        if reject {
            return Err(EngineError::Rejected("local description".to_string()));
        }
        Ok(())
    }

    fn set_remote_description(
        &mut self,
        handle: EngineHandle,
        description: SessionDescription,
    ) -> Result<(), EngineError> {
        self.ensure_live(handle)?;
        let reject = lock(&self.log).reject_remote_descriptions;
        self.record(EngineCall::SetRemoteDescription(handle, description));
        if reject {
            return Err(EngineError::Rejected("remote description".to_string()));
        }
        Ok(())
    }

    fn add_remote_candidate(
        &mut self,
        handle: EngineHandle,
        candidate: &IceCandidate,
    ) -> Result<(), EngineError> {
        self.ensure_live(handle)?;
        let reject = lock(&self.log).reject_candidates;
        self.record(EngineCall::AddRemoteCandidate(handle, candidate.clone()));
        if reject {
            return Err(EngineError::Rejected("candidate".to_string()));
        }
        Ok(())
    }

    fn list_senders(&self, handle: EngineHandle) -> Vec<TrackBinding> {
        lock(&self.log)
            .senders
            .get(&handle)
            .cloned()
            .unwrap_or_default()
    }

    fn add_track(
        &mut self,
        handle: EngineHandle,
        track: &MediaTrack,
        stream_ids: &[String],
    ) -> Result<(), EngineError> {
        let mut log = lock(&self.log);
        let senders = log
            .senders
            .get_mut(&handle)
            .ok_or(EngineError::UnknownHandle(handle))?;
        senders.push(TrackBinding::new(track.clone(), stream_ids.to_vec()));
        log.calls.push(EngineCall::AddTrack(
            handle,
            track.clone(),
            stream_ids.to_vec(),
        ));
        Ok(())
    }

    fn set_audio_enabled(&mut self, handle: EngineHandle, enabled: bool) -> Result<(), EngineError> {
        self.ensure_live(handle)?;
        self.record(EngineCall::SetAudioEnabled(handle, enabled));
        Ok(())
    }
}

#[derive(Debug)]
struct TransportLog {
    local_id: Option<PeerId>,
    assigned_id: PeerId,
    connected: bool,
    busy: bool,
    fail_sends: bool,
    fail_connect: bool,
    connects: Vec<(ServerAddress, String)>,
    sign_outs: usize,
    sent: Vec<(PeerId, String)>,
    hang_ups: Vec<PeerId>,
}

/// Signaling transport double.
///
/// `connect` succeeds immediately and assigns the configured local id.
/// Sends are recorded; completion is reported by the test feeding
/// `TransportEvent::MessageSent` back to the orchestrator.
#[derive(Debug, Clone)]
pub struct RecordingTransport {
    log: Arc<Mutex<TransportLog>>,
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new(PeerId(1))
    }
}

impl RecordingTransport {
    pub fn new(local_id: PeerId) -> Self {
        Self {
            log: Arc::new(Mutex::new(TransportLog {
                local_id: None,
                assigned_id: local_id,
                connected: false,
                busy: false,
                fail_sends: false,
                fail_connect: false,
                connects: Vec::new(),
                sign_outs: 0,
                sent: Vec::new(),
                hang_ups: Vec::new(),
            })),
        }
    }

    /// Start out already signed in
    pub fn signed_in(local_id: PeerId) -> Self {
        let transport = Self::new(local_id);
        {
            let mut log = lock(&transport.log);
            log.connected = true;
            log.local_id = Some(local_id);
        }
        transport
    }

    pub fn sent(&self) -> Vec<(PeerId, String)> {
        lock(&self.log).sent.clone()
    }

    pub fn sent_payloads(&self) -> Vec<String> {
        lock(&self.log).sent.iter().map(|(_, p)| p.clone()).collect()
    }

    pub fn hang_ups(&self) -> Vec<PeerId> {
        lock(&self.log).hang_ups.clone()
    }

    pub fn connects(&self) -> Vec<(ServerAddress, String)> {
        lock(&self.log).connects.clone()
    }

    pub fn sign_outs(&self) -> usize {
        lock(&self.log).sign_outs
    }

    /// Report `is_sending_message() == true` until cleared
    pub fn set_busy(&self, busy: bool) {
        lock(&self.log).busy = busy;
    }

    pub fn fail_sends(&self, fail: bool) {
        lock(&self.log).fail_sends = fail;
    }

    pub fn fail_connect(&self, fail: bool) {
        lock(&self.log).fail_connect = fail;
    }

    /// Drop the connection without going through `sign_out`
    pub fn drop_connection(&self) {
        let mut log = lock(&self.log);
        log.connected = false;
        log.local_id = None;
    }
}

impl SignalingTransport for RecordingTransport {
    fn connect(&mut self, server: &ServerAddress, display_name: &str) -> Result<(), TransportError> {
        let mut log = lock(&self.log);
        log.connects.push((server.clone(), display_name.to_string()));
        if log.fail_connect {
            return Err(TransportError::ConnectFailed(server.to_string()));
        }
        log.connected = true;
        log.local_id = Some(log.assigned_id);
        Ok(())
    }

    fn sign_out(&mut self) {
        let mut log = lock(&self.log);
        log.sign_outs += 1;
        log.connected = false;
        log.local_id = None;
    }

    fn send_to_peer(&mut self, peer: PeerId, message: &str) -> Result<(), TransportError> {
        let mut log = lock(&self.log);
        if !log.connected {
            return Err(TransportError::NotConnected);
        }
        if log.fail_sends {
            return Err(TransportError::SendFailed(format!("to peer {peer}")));
        }
        log.sent.push((peer, message.to_string()));
        Ok(())
    }

    fn send_hang_up(&mut self, peer: PeerId) -> Result<(), TransportError> {
        let mut log = lock(&self.log);
        if !log.connected {
            return Err(TransportError::NotConnected);
        }
        log.hang_ups.push(peer);
        Ok(())
    }

    fn is_sending_message(&self) -> bool {
        lock(&self.log).busy
    }

    fn is_connected(&self) -> bool {
        lock(&self.log).connected
    }

    fn local_peer_id(&self) -> Option<PeerId> {
        lock(&self.log).local_id
    }
}

/// One callback received by [`RecordingObserver`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservedEvent {
    SignedIn,
    ServerDisconnected,
    ServerConnectionFailure,
    PeerConnected(PeerId, String),
    PeerDisconnected(PeerId),
    SessionStarted { peer: PeerId, loopback: bool },
    SessionClosed { peer: PeerId, reason: CloseReason },
    TrackAdded(String),
    TrackRemoved(String),
    NegotiationFailure(String),
}

#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<ObservedEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ObservedEvent> {
        lock(&self.events).clone()
    }

    pub fn close_reasons(&self) -> Vec<CloseReason> {
        lock(&self.events)
            .iter()
            .filter_map(|e| match e {
                ObservedEvent::SessionClosed { reason, .. } => Some(*reason),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ObservedEvent) {
        lock(&self.events).push(event);
    }
}

impl SessionObserver for RecordingObserver {
    fn on_signed_in(&mut self) {
        self.push(ObservedEvent::SignedIn);
    }

    fn on_server_disconnected(&mut self) {
        self.push(ObservedEvent::ServerDisconnected);
    }

    fn on_server_connection_failure(&mut self) {
        self.push(ObservedEvent::ServerConnectionFailure);
    }

    fn on_peer_connected(&mut self, peer: PeerId, name: &str) {
        self.push(ObservedEvent::PeerConnected(peer, name.to_string()));
    }

    fn on_peer_disconnected(&mut self, peer: PeerId) {
        self.push(ObservedEvent::PeerDisconnected(peer));
    }

    fn on_session_started(&mut self, peer: PeerId, loopback: bool) {
        self.push(ObservedEvent::SessionStarted { peer, loopback });
    }

    fn on_session_closed(&mut self, peer: PeerId, reason: CloseReason) {
        self.push(ObservedEvent::SessionClosed { peer, reason });
    }

    fn on_track_added(&mut self, track_id: &str) {
        self.push(ObservedEvent::TrackAdded(track_id.to_string()));
    }

    fn on_track_removed(&mut self, track_id: &str) {
        self.push(ObservedEvent::TrackRemoved(track_id.to_string()));
    }

    fn on_negotiation_failure(&mut self, reason: &str) {
        self.push(ObservedEvent::NegotiationFailure(reason.to_string()));
    }
}
