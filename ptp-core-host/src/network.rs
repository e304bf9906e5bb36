//! An in-process "network" connecting two [`PtpInstance`](ptp_core::PtpInstance)s
//! without any real socket, for a single-binary demonstration of BMCA and
//! synchronization. Grounded on the shape of the teacher's
//! `LinuxNetworkPort` (a `Network` impl per port, timestamping both
//! directions), minus the actual interface/multicast plumbing.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use ptp_core::hal::{DestinationClass, Network, RawMessage, SendHandle};
use ptp_core::time::Instant;

use crate::clock::wall_clock_now;

type Queue = Rc<RefCell<VecDeque<RawMessage>>>;

pub struct LoopbackNetwork {
    /// Datagrams this port has sent; the peer's `inbound`.
    outbound: Queue,
    /// Datagrams addressed to this port; the peer's `outbound`.
    inbound: Queue,
    next_handle: u32,
    /// Transmit timestamps available immediately, since there is no real
    /// transport latency to wait out.
    pending_tx: Vec<(SendHandle, Instant)>,
}

/// Builds two ends of the same loopback link, one per port.
pub fn loopback_pair() -> (LoopbackNetwork, LoopbackNetwork) {
    let a_to_b = Rc::new(RefCell::new(VecDeque::new()));
    let b_to_a = Rc::new(RefCell::new(VecDeque::new()));

    let a = LoopbackNetwork {
        outbound: a_to_b.clone(),
        inbound: b_to_a.clone(),
        next_handle: 0,
        pending_tx: Vec::new(),
    };
    let b = LoopbackNetwork {
        outbound: b_to_a,
        inbound: a_to_b,
        next_handle: 0,
        pending_tx: Vec::new(),
    };
    (a, b)
}

impl Network for LoopbackNetwork {
    fn send(&mut self, data: &[u8], class: DestinationClass) -> Option<SendHandle> {
        let mut raw = RawMessage::new();
        if raw.try_extend_from_slice(data).is_err() {
            log::warn!("dropped outbound datagram larger than the loopback MTU");
            return None;
        }
        self.outbound.borrow_mut().push_back(raw);

        match class {
            DestinationClass::Event => {
                let handle = SendHandle(self.next_handle);
                self.next_handle = self.next_handle.wrapping_add(1);
                self.pending_tx.push((handle, wall_clock_now()));
                Some(handle)
            }
            DestinationClass::General => None,
        }
    }

    fn try_recv(&mut self) -> Option<(Instant, RawMessage)> {
        self.inbound.borrow_mut().pop_front().map(|raw| (wall_clock_now(), raw))
    }

    fn take_tx_timestamp(&mut self, handle: SendHandle) -> Option<Instant> {
        let index = self.pending_tx.iter().position(|(h, _)| *h == handle)?;
        Some(self.pending_tx.remove(index).1)
    }

    fn mtu(&self) -> usize {
        ptp_core::datastructures::messages::MAX_MESSAGE_LEN
    }
}
