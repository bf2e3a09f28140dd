//! Outbound commands waiting for an open connection.

use std::collections::VecDeque;

use devsync_shared::OutboundCommand;

use super::connection::Link;

/// Unbounded FIFO of commands produced while the connection was not open.
///
/// No deduplication or coalescing happens here; superseded slider values are
/// already dropped by the projector's debouncer.
#[derive(Debug, Default)]
pub struct OutboundQueue {
    pending: VecDeque<OutboundCommand>,
}

/// The link refused a command mid-drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkClosed {
    /// Commands transmitted before the link went away.
    pub sent: usize,
}

impl OutboundQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, command: OutboundCommand) {
        self.pending.push_back(command);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Transmit queued commands head-first.
    ///
    /// Stops at the first refusal; the refused command goes back to the head
    /// so nothing is lost or reordered.
    pub fn drain_into<L: Link>(&mut self, link: &mut L) -> Result<usize, LinkClosed> {
        let mut sent = 0;
        while let Some(command) = self.pending.pop_front() {
            if let Err(command) = link.transmit(command) {
                self.pending.push_front(command);
                return Err(LinkClosed { sent });
            }
            sent += 1;
        }
        Ok(sent)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OutboundCommand> {
        self.pending.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ws::connection::testing::RecordingLink;

    fn set(n: f64) -> OutboundCommand {
        OutboundCommand::set("Dimmer", "brightness", n)
    }

    #[test]
    fn drains_in_fifo_order() {
        let mut queue = OutboundQueue::new();
        for n in [1.0, 2.0, 3.0] {
            queue.enqueue(set(n));
        }
        let mut link = RecordingLink::new();

        assert_eq!(queue.drain_into(&mut link), Ok(3));
        assert!(queue.is_empty());
        assert_eq!(link.sent(), vec![set(1.0), set(2.0), set(3.0)]);
    }

    #[test]
    fn refused_command_stays_at_head() {
        let mut queue = OutboundQueue::new();
        for n in [1.0, 2.0, 3.0] {
            queue.enqueue(set(n));
        }
        let mut link = RecordingLink::with_budget(1);

        assert_eq!(queue.drain_into(&mut link), Err(LinkClosed { sent: 1 }));
        assert_eq!(link.sent(), vec![set(1.0)]);
        assert_eq!(queue.iter().cloned().collect::<Vec<_>>(), vec![set(2.0), set(3.0)]);

        let mut next = RecordingLink::new();
        assert_eq!(queue.drain_into(&mut next), Ok(2));
        assert_eq!(next.sent(), vec![set(2.0), set(3.0)]);
    }
}
