use crate::domain::PeerId;
use std::collections::VecDeque;

/// An encoded signaling message waiting for the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOutboundMessage {
    pub sequence: u64,
    pub peer: PeerId,
    pub payload: String,
}

/// FIFO of encoded messages with at most one send in flight.
///
/// `begin_send` hands out the head only when nothing is in flight;
/// `complete` releases the slot once the transport reports the result.
#[derive(Debug, Default)]
pub struct OutboundQueue {
    queue: VecDeque<PendingOutboundMessage>,
    in_flight: Option<PendingOutboundMessage>,
    next_sequence: u64,
    limit: Option<usize>,
}

impl OutboundQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Append to the tail, returning the assigned sequence number
    pub fn enqueue(&mut self, peer: PeerId, payload: String) -> Result<u64, QueueError> {
        if let Some(max) = self.limit {
            if self.queue.len() >= max {
                return Err(QueueError::Full { max });
            }
        }
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.queue.push_back(PendingOutboundMessage {
            sequence,
            peer,
            payload,
        });
        Ok(sequence)
    }

    /// Move the head into the in-flight slot
    pub fn begin_send(&mut self) -> Option<&PendingOutboundMessage> {
        if self.in_flight.is_some() {
            return None;
        }
        self.in_flight = self.queue.pop_front();
        self.in_flight.as_ref()
    }

    /// Release the in-flight slot
    pub fn complete(&mut self) -> Option<PendingOutboundMessage> {
        self.in_flight.take()
    }

    /// Drop queued and in-flight messages
    pub fn clear(&mut self) {
        self.queue.clear();
        self.in_flight = None;
    }

    /// Messages waiting behind the in-flight one
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("Outbound queue is full (max size: {max})")]
    Full { max: usize },
}
