mod outbound_queue;

pub use outbound_queue::{OutboundQueue, PendingOutboundMessage, QueueError};
