//! Per-control request generations.
//!
//! Every request takes a ticket from its control's counter when it starts.
//! When the response lands, it is applied only if no newer request for the
//! same control has started in the meantime.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Register,
    Login,
    ProfileLoad,
    Avatar,
    Age,
}

impl Control {
    fn index(self) -> usize {
        match self {
            Control::Register => 0,
            Control::Login => 1,
            Control::ProfileLoad => 2,
            Control::Avatar => 3,
            Control::Age => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    control: Control,
    generation: u64,
}

#[derive(Debug, Default)]
pub struct Generations {
    counters: [AtomicU64; 5],
}

impl Generations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self, control: Control) -> Ticket {
        let generation = self.counters[control.index()].fetch_add(1, Ordering::SeqCst) + 1;
        Ticket {
            control,
            generation,
        }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.counters[ticket.control.index()].load(Ordering::SeqCst) == ticket.generation
    }
}
