//! Range-gated broadcast delivery (phase ②).

use ks_behavior::Controller;
use ks_core::Tick;

use crate::Agent;

/// Delivers each agent's outbound message to every agent in range.
///
/// The router holds no per-message state; it owns only the rate gate.
/// Message contents are opaque to it.
#[derive(Copy, Clone, Debug)]
pub struct CommRouter {
    comm_rate: u64,
}

impl CommRouter {
    pub fn new(comm_rate: u64) -> Self {
        Self { comm_rate }
    }

    /// `true` on ticks where messages are exchanged.
    #[inline]
    pub fn is_round(&self, tick: Tick) -> bool {
        tick.is_every(self.comm_rate)
    }

    /// Run one communication round.  Returns the number of deliveries.
    ///
    /// Outbound messages are collected first, in agent order.  A message
    /// reaches receiver `r` when both the sender and `r` accept the measured
    /// centre distance.  Each delivery calls the receiver's `message_rx` and
    /// then the sender's `message_tx_success`, so a sender heard by three
    /// agents is told three times.
    pub fn route<C: Controller>(&self, agents: &mut [Agent<C>]) -> usize {
        let outbound: Vec<_> = agents
            .iter_mut()
            .enumerate()
            .filter_map(|(i, a)| a.take_outbound_message().map(|m| (i, m)))
            .collect();

        let mut delivered = 0;
        for (tx, message) in outbound {
            for rx in 0..agents.len() {
                if rx == tx {
                    continue;
                }
                let distance = agents[tx].distance_to(&agents[rx]);
                if agents[tx].accepts_range(distance) && agents[rx].accepts_range(distance) {
                    agents[rx].deliver_message(&message, distance);
                    agents[tx].notify_transmit_success();
                    delivered += 1;
                }
            }
        }
        delivered
    }
}
