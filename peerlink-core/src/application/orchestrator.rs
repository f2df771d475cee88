use crate::application::{OutboundQueue, SessionCommand, SessionConfig};
use crate::codec;
use crate::domain::{
    CloseReason, EngineHandle, IceCandidate, MediaTrack, PeerId, PeerSession, SdpKind,
    SessionDescription, SessionGeneration, SessionState, SignalingMessage,
};
use crate::error::{Result, SessionError};
use crate::ports::{
    EngineConfig, EngineEvent, NegotiationEngine, ServerAddress, SessionObserver,
    SignalingTransport, TransportError, TransportEvent,
};
use std::collections::BTreeMap;

/// Read-only view of the orchestrator for presentation layers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub peer_id: Option<PeerId>,
    pub loopback: bool,
    pub generation: SessionGeneration,
    pub signed_in: bool,
    pub queued_messages: usize,
    pub online_peers: Vec<(PeerId, String)>,
    pub last_close: Option<CloseReason>,
}

/// Owns the single peer session and translates between engine callbacks,
/// signaling messages and presentation commands.
///
/// Synchronous and single-threaded: every input goes through `&mut self`.
/// The runtime crate funnels the asynchronous sources onto one task.
#[derive(Debug)]
pub struct Orchestrator<E, T, O> {
    engine: E,
    transport: T,
    observer: O,
    config: SessionConfig,
    session: Option<PeerSession>,
    generation: SessionGeneration,
    outbound: OutboundQueue,
    online_peers: BTreeMap<PeerId, String>,
    last_close: Option<CloseReason>,
}

impl<E, T, O> Orchestrator<E, T, O>
where
    E: NegotiationEngine,
    T: SignalingTransport,
    O: SessionObserver,
{
    pub fn new(config: SessionConfig, engine: E, transport: T, observer: O) -> Self {
        let outbound = OutboundQueue::with_limit(config.outbound_queue_limit);
        Self {
            engine,
            transport,
            observer,
            config,
            session: None,
            generation: SessionGeneration::default(),
            outbound,
            online_peers: BTreeMap::new(),
            last_close: None,
        }
    }

    /// Run one presentation command
    pub fn execute(&mut self, command: SessionCommand) -> Result<()> {
        tracing::debug!("▶️ Command: {}", command.name());
        match command {
            SessionCommand::StartLogin { server, port } => self.start_login(&server, port),
            SessionCommand::DisconnectFromServer => self.disconnect_from_server(),
            SessionCommand::ConnectToPeer { peer_id } => self.connect_to_peer(peer_id),
            SessionCommand::DisconnectFromCurrentPeer => self.disconnect_from_current_peer(),
            SessionCommand::StartLoopbackTest => self.start_loopback_test(),
            SessionCommand::SetAudioMuted { muted } => self.set_audio_muted(muted),
            SessionCommand::Close => self.close(),
        }
    }

    // ===== Commands =====

    /// Sign in to `server:port`. An empty server or a zero port falls back
    /// to the configured default.
    pub fn start_login(&mut self, server: &str, port: u16) -> Result<()> {
        if self.transport.is_connected() {
            tracing::debug!("Already connected, ignoring login");
            return Ok(());
        }

        let server = match server.trim() {
            "" => self.config.default_server.trim(),
            host => host,
        };
        if server.is_empty() || server.contains(char::is_whitespace) {
            return Err(SessionError::InvalidArgument(format!(
                "invalid server address '{server}'"
            )));
        }
        let port = if port == 0 { self.config.default_port } else { port };
        if port == 0 {
            return Err(SessionError::InvalidArgument("port must be non-zero".to_string()));
        }

        let address = ServerAddress::new(server, port);
        tracing::info!("🔌 Signing in to {} as {}", address, self.config.display_name);
        self.transport
            .connect(&address, &self.config.display_name)
            .map_err(|e| {
                tracing::error!("❌ Connect to {} failed: {}", address, e);
                SessionError::TransportFailure(e)
            })
    }

    pub fn disconnect_from_server(&mut self) -> Result<()> {
        self.teardown(CloseReason::LocalClose);
        self.online_peers.clear();
        if self.transport.is_connected() {
            tracing::info!("👋 Signing out");
            self.transport.sign_out();
        }
        Ok(())
    }

    pub fn connect_to_peer(&mut self, peer: PeerId) -> Result<()> {
        if let Some(session) = &self.session {
            tracing::warn!(
                "⚠️ Cannot connect to peer {}: already bound to peer {}",
                peer,
                session.peer_id()
            );
            return Err(SessionError::InvalidState(format!(
                "already bound to peer {}",
                session.peer_id()
            )));
        }

        let handle = self.open_session(peer)?;
        self.observer.on_session_started(peer, false);
        self.engine.create_offer(handle).map_err(|e| {
            tracing::error!("❌ Failed to request offer: {}", e);
            SessionError::ApplyFailure(e.to_string())
        })
    }

    pub fn disconnect_from_current_peer(&mut self) -> Result<()> {
        let peer = self
            .session
            .as_ref()
            .map(PeerSession::peer_id)
            .ok_or_else(|| SessionError::InvalidState("no active peer".to_string()))?;

        if self.transport.is_connected() {
            if let Err(e) = self.transport.send_hang_up(peer) {
                tracing::warn!("⚠️ Hang-up to peer {} not delivered: {}", peer, e);
            }
        }
        self.teardown(CloseReason::LocalHangUp);
        Ok(())
    }

    /// Negotiate with our own signaling id, security disabled
    pub fn start_loopback_test(&mut self) -> Result<()> {
        if let Some(session) = &self.session {
            return Err(SessionError::InvalidState(format!(
                "already bound to peer {}",
                session.peer_id()
            )));
        }
        let own_id = self
            .transport
            .local_peer_id()
            .ok_or_else(|| SessionError::InvalidState("not signed in".to_string()))?;

        self.open_session(own_id)?;
        self.restart_as_loopback(false)
    }

    pub fn set_audio_muted(&mut self, muted: bool) -> Result<()> {
        let handle = self
            .session
            .as_ref()
            .map(PeerSession::engine)
            .ok_or_else(|| SessionError::InvalidState("no active peer".to_string()))?;

        tracing::info!("🔇 Audio {}", if muted { "muted" } else { "unmuted" });
        self.engine
            .set_audio_enabled(handle, !muted)
            .map_err(|e| SessionError::ApplyFailure(e.to_string()))
    }

    pub fn close(&mut self) -> Result<()> {
        self.teardown(CloseReason::LocalClose);
        self.outbound.clear();
        self.online_peers.clear();
        if self.transport.is_connected() {
            self.transport.sign_out();
        }
        tracing::info!("🛑 Orchestrator closed");
        Ok(())
    }

    // ===== Transport events =====

    pub fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::SignedIn => {
                tracing::info!("✅ Signed in as {:?}", self.transport.local_peer_id());
                self.observer.on_signed_in();
            }
            TransportEvent::Disconnected => {
                tracing::info!("🔌 Disconnected from signaling server");
                self.online_peers.clear();
                self.teardown(CloseReason::TransportDisconnected);
                self.outbound.clear();
                self.observer.on_server_disconnected();
            }
            TransportEvent::PeerConnected { id, name } => {
                tracing::info!("👤 Peer {} online ({})", id, name);
                self.observer.on_peer_connected(id, &name);
                self.online_peers.insert(id, name);
            }
            TransportEvent::PeerDisconnected(id) => {
                tracing::info!("👤 Peer {} offline", id);
                self.online_peers.remove(&id);
                if self.peer_id() == Some(id) {
                    self.teardown(CloseReason::PeerDisconnected);
                }
                self.observer.on_peer_disconnected(id);
            }
            TransportEvent::MessageFromPeer { from, message } => {
                if let Err(e) = self.dispatch_remote(from, &message) {
                    if e.is_fatal() {
                        tracing::error!("❌ Message from peer {} ended the attempt: {}", from, e);
                    } else {
                        tracing::debug!("Message from peer {} not applied: {}", from, e);
                    }
                }
            }
            TransportEvent::MessageSent(result) => {
                self.outbound.complete();
                match result {
                    Ok(()) => self.pump_outbound(),
                    Err(e) => self.transport_failure(e),
                }
            }
            TransportEvent::ServerConnectionFailure => {
                tracing::error!("❌ Signaling server connection failed");
                self.online_peers.clear();
                self.teardown(CloseReason::TransportFailure);
                self.outbound.clear();
                self.observer.on_server_connection_failure();
            }
        }
    }

    /// Decode and apply one message from the signaling server.
    ///
    /// Decode, mismatch and apply errors are logged and returned; none of
    /// them touches the bound session.
    pub(crate) fn dispatch_remote(&mut self, from: PeerId, raw: &str) -> Result<()> {
        let message = match codec::decode(raw) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!("⚠️ Discarding undecodable message from peer {}: {}", from, e);
                return Err(e.into());
            }
        };
        tracing::debug!("📥 {} from peer {}", message.kind_name(), from);

        let bound = self
            .session
            .as_ref()
            .map(|session| (session.peer_id(), session.engine()));
        let announced = bound.is_some();
        let handle = match bound {
            None => {
                let handle = self.open_session(from)?;
                if !matches!(message, SignalingMessage::ControlLoopbackOffer) {
                    self.observer.on_session_started(from, false);
                }
                handle
            }
            Some((peer, _)) if peer != from => {
                tracing::warn!(
                    "⚠️ Discarding {} from peer {}: bound to peer {}",
                    message.kind_name(),
                    from,
                    peer
                );
                return Err(SessionError::PeerMismatch {
                    expected: peer,
                    actual: from,
                });
            }
            Some((_, engine)) => engine,
        };

        match message {
            SignalingMessage::ControlLoopbackOffer => self.restart_as_loopback(announced),
            SignalingMessage::SessionDescription(description) => {
                self.apply_remote_description(handle, description)
            }
            SignalingMessage::IceCandidate {
                sdp_mid,
                sdp_mline_index,
                candidate,
            } => self.apply_remote_candidate(handle, &sdp_mid, sdp_mline_index, candidate),
        }
    }

    fn apply_remote_description(
        &mut self,
        handle: EngineHandle,
        description: SessionDescription,
    ) -> Result<()> {
        if let Err(e) = description.validate() {
            tracing::warn!("⚠️ Discarding remote {}: {}", description.kind, e);
            return Err(SessionError::ApplyFailure(e.to_string()));
        }

        let kind = description.kind;
        if let Err(e) = self.engine.set_remote_description(handle, description) {
            tracing::warn!("⚠️ Remote {} rejected: {}", kind, e);
            return Err(SessionError::ApplyFailure(e.to_string()));
        }
        self.mark_established();
        tracing::info!("📥 Applied remote {}", kind);

        if kind == SdpKind::Offer {
            self.engine.create_answer(handle).map_err(|e| {
                tracing::warn!("⚠️ Answer request failed: {}", e);
                SessionError::ApplyFailure(e.to_string())
            })?;
        }
        Ok(())
    }

    fn apply_remote_candidate(
        &mut self,
        handle: EngineHandle,
        sdp_mid: &str,
        sdp_mline_index: u32,
        line: String,
    ) -> Result<()> {
        let candidate = IceCandidate::new(sdp_mid, sdp_mline_index, line).map_err(|e| {
            tracing::warn!("⚠️ Discarding malformed candidate: {}", e);
            SessionError::ApplyFailure(e.to_string())
        })?;

        self.engine
            .add_remote_candidate(handle, &candidate)
            .map_err(|e| {
                tracing::warn!("⚠️ Remote candidate rejected: {}", e);
                SessionError::ApplyFailure(e.to_string())
            })
    }

    // ===== Engine callbacks =====

    /// Handle a callback from engine instance `handle`, created for
    /// `generation`.
    ///
    /// Callbacks from any engine instance other than the live one are
    /// dropped, even when the engine has handed the same handle out again.
    pub fn handle_engine_event(
        &mut self,
        handle: EngineHandle,
        generation: SessionGeneration,
        event: EngineEvent,
    ) {
        let (peer, loopback) = match &self.session {
            Some(session) if session.owns(handle, generation) => {
                (session.peer_id(), session.is_loopback())
            }
            _ => {
                tracing::debug!("Dropping stale callback from {} ({})", handle, generation);
                return;
            }
        };

        match event {
            EngineEvent::LocalDescriptionReady(description) => {
                match self.engine.set_local_description(handle, &description) {
                    Ok(()) => self.mark_established(),
                    Err(e) => tracing::warn!("⚠️ Local {} rejected: {}", description.kind, e),
                }
                self.enqueue_outbound(peer, codec::encode_session_description(&description));
            }
            EngineEvent::LocalCandidateReady(candidate) => {
                if loopback {
                    if let Err(e) = self.engine.add_remote_candidate(handle, &candidate) {
                        tracing::warn!("⚠️ Loopback candidate rejected: {}", e);
                    }
                } else {
                    self.enqueue_outbound(peer, codec::encode_ice_candidate(&candidate));
                }
            }
            EngineEvent::TrackAdded(track_id) => {
                tracing::info!("🎵 Track added: {}", track_id);
                self.observer.on_track_added(&track_id);
            }
            EngineEvent::TrackRemoved(track_id) => {
                tracing::info!("🎵 Track removed: {}", track_id);
                self.observer.on_track_removed(&track_id);
            }
            EngineEvent::NegotiationFailure(reason) => {
                tracing::warn!("⚠️ Negotiation failure: {}", reason);
                self.observer.on_negotiation_failure(&reason);
            }
        }
    }

    // ===== Queries =====

    pub fn state(&self) -> SessionState {
        self.session
            .as_ref()
            .map(PeerSession::state)
            .unwrap_or(SessionState::Idle)
    }

    pub fn peer_id(&self) -> Option<PeerId> {
        self.session.as_ref().map(PeerSession::peer_id)
    }

    pub fn is_loopback(&self) -> bool {
        self.session
            .as_ref()
            .map(PeerSession::is_loopback)
            .unwrap_or(false)
    }

    pub fn session(&self) -> Option<&PeerSession> {
        self.session.as_ref()
    }

    /// Online peers, ordered by id
    pub fn online_peers(&self) -> Vec<(PeerId, String)> {
        self.online_peers
            .iter()
            .map(|(id, name)| (*id, name.clone()))
            .collect()
    }

    pub fn last_close_reason(&self) -> Option<CloseReason> {
        self.last_close
    }

    pub fn outbound(&self) -> &OutboundQueue {
        &self.outbound
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state(),
            peer_id: self.peer_id(),
            loopback: self.is_loopback(),
            generation: self.generation,
            signed_in: self.transport.is_connected(),
            queued_messages: self.outbound.len(),
            online_peers: self.online_peers(),
            last_close: self.last_close,
        }
    }

    // ===== Internals =====

    /// Config for the next engine instance; every instance gets a fresh
    /// generation
    fn next_engine_config(&mut self, security_enabled: bool) -> EngineConfig {
        self.generation = self.generation.next();
        EngineConfig {
            security_enabled,
            ice_servers: self.config.ice_servers.clone(),
            generation: self.generation,
        }
    }

    /// Bind `peer`, create its engine and attach local audio.
    ///
    /// The caller reports the session start once it knows which engine
    /// will carry it.
    fn open_session(&mut self, peer: PeerId) -> Result<EngineHandle> {
        let config = self.next_engine_config(true);
        let handle = match self.engine.create_engine(&config) {
            Ok(handle) => handle,
            Err(e) => {
                tracing::error!("❌ Engine creation for peer {} failed: {}", peer, e);
                self.last_close = Some(CloseReason::EngineInitFailure);
                self.outbound.clear();
                self.transport.sign_out();
                return Err(SessionError::EngineInitFailure(e));
            }
        };

        self.session = Some(PeerSession::new(peer, handle, self.generation));
        self.attach_local_audio(handle);

        tracing::info!("🤝 Session {} with peer {} on {}", self.generation, peer, handle);
        Ok(handle)
    }

    fn attach_local_audio(&mut self, handle: EngineHandle) {
        if !self.engine.list_senders(handle).is_empty() {
            return;
        }
        let track = MediaTrack::audio(self.config.audio_label.clone());
        let streams = [self.config.stream_id.clone()];
        if let Err(e) = self.engine.add_track(handle, &track, &streams) {
            tracing::warn!("⚠️ Failed to add local audio track: {}", e);
        }
    }

    /// Replace the live engine with a security-disabled one bound to the
    /// same peer, carry the tracks over and request an offer.
    ///
    /// `announced` tells whether the observer already saw the session start;
    /// if so the replaced session is reported closed first.
    fn restart_as_loopback(&mut self, announced: bool) -> Result<()> {
        let current = self
            .session
            .take()
            .ok_or_else(|| SessionError::InvalidState("no active peer".to_string()))?;
        let peer = current.peer_id();
        let old_handle = current.engine();

        let tracks = self.engine.list_senders(old_handle);
        self.engine.destroy_engine(old_handle);
        self.outbound.clear();

        let config = self.next_engine_config(false);
        let handle = match self.engine.create_engine(&config) {
            Ok(handle) => handle,
            Err(e) => {
                tracing::error!("❌ Loopback engine creation failed: {}", e);
                self.last_close = Some(CloseReason::LoopbackRestartFailed);
                if announced {
                    self.observer
                        .on_session_closed(peer, CloseReason::LoopbackRestartFailed);
                }
                self.transport.sign_out();
                return Err(SessionError::EngineInitFailure(e));
            }
        };

        for binding in &tracks {
            if let Err(e) = self.engine.add_track(handle, &binding.track, &binding.stream_ids) {
                tracing::warn!("⚠️ Failed to carry track {} over: {}", binding.track.id, e);
            }
        }

        if announced {
            self.last_close = Some(CloseReason::SwitchedToLoopback);
            self.observer
                .on_session_closed(peer, CloseReason::SwitchedToLoopback);
        }
        self.session = Some(current.loopback_successor(handle, self.generation));
        tracing::info!("🔁 Loopback session {} on {}", self.generation, handle);
        self.observer.on_session_started(peer, true);

        self.engine.create_offer(handle).map_err(|e| {
            tracing::error!("❌ Failed to request loopback offer: {}", e);
            SessionError::ApplyFailure(e.to_string())
        })
    }

    fn mark_established(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.mark_established();
        }
    }

    fn enqueue_outbound(&mut self, peer: PeerId, payload: String) {
        match self.outbound.enqueue(peer, payload) {
            Ok(sequence) => tracing::debug!("📤 Queued message #{} for peer {}", sequence, peer),
            Err(e) => {
                tracing::warn!("⚠️ Dropping message for peer {}: {}", peer, e);
                return;
            }
        }
        self.pump_outbound();
    }

    /// Hand the next queued message to the transport if nothing is in flight
    fn pump_outbound(&mut self) {
        if self.transport.is_sending_message() {
            return;
        }
        let (peer, payload) = match self.outbound.begin_send() {
            Some(message) => (message.peer, message.payload.clone()),
            None => return,
        };

        tracing::debug!("📤 Sending {} bytes to peer {}", payload.len(), peer);
        if let Err(e) = self.transport.send_to_peer(peer, &payload) {
            self.outbound.complete();
            self.transport_failure(e);
        }
    }

    fn transport_failure(&mut self, error: TransportError) {
        tracing::error!("❌ Transport failure: {}", error);
        self.teardown(CloseReason::TransportFailure);
        self.outbound.clear();
        if self.transport.is_connected() {
            self.transport.sign_out();
        }
    }

    /// End the active session, if any, and release its engine
    fn teardown(&mut self, reason: CloseReason) {
        let Some(session) = self.session.take() else {
            return;
        };
        self.engine.destroy_engine(session.engine());
        self.outbound.clear();
        self.last_close = Some(reason);

        tracing::info!(
            "🔚 Session {} with peer {} closed ({}) after {:?}",
            session.generation(),
            session.peer_id(),
            reason,
            session.age()
        );
        self.observer.on_session_closed(session.peer_id(), reason);
    }
}
