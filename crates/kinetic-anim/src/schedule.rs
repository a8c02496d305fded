use kinetic_core::direction::BlockRotation;

/// Block reorientations that fire exactly once, each at a fixed tick.
///
/// Ticks are 1-based elapsed-tick counts; an entry fires on the first tick
/// whose count reaches it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OneShotSchedule {
    entries: Vec<(u32, BlockRotation)>,
    next: usize,
}

impl OneShotSchedule {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(mut entries: Vec<(u32, BlockRotation)>) -> Self {
        entries.sort_by_key(|(tick, _)| *tick);
        Self { entries, next: 0 }
    }

    /// One rotation at the middle of a `total_ticks` animation.
    pub fn halfway(total_ticks: u32, rotation: BlockRotation) -> Self {
        Self::new(vec![((total_ticks / 2).max(1), rotation)])
    }

    /// One rotation in the middle of each of `quarters` equal segments.
    pub fn per_quarter(total_ticks: u32, quarters: u32, rotation: BlockRotation) -> Self {
        if quarters == 0 {
            return Self::empty();
        }
        let per_quarter = total_ticks as f64 / quarters as f64;
        let entries = (0..quarters)
            .map(|q| {
                let tick = ((q as f64 + 0.5) * per_quarter).round() as u32;
                (tick.max(1), rotation)
            })
            .collect();
        Self::new(entries)
    }

    /// Pop every rotation due at or before `tick`.
    pub fn due(&mut self, tick: u32) -> Vec<BlockRotation> {
        let mut fired = Vec::new();
        while let Some(&(at, rotation)) = self.entries.get(self.next) {
            if at > tick {
                break;
            }
            fired.push(rotation);
            self.next += 1;
        }
        fired
    }

    /// Pop every rotation that has not fired yet.
    pub fn drain_remaining(&mut self) -> Vec<BlockRotation> {
        let rest = self.entries[self.next..].iter().map(|(_, r)| *r).collect();
        self.next = self.entries.len();
        rest
    }

    pub fn pending(&self) -> usize {
        self.entries.len() - self.next
    }
}
