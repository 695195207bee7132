use foundation::time::Time;

/// Temporal grouping of trigger events.
///
/// A trigger joins the current group when it fires no more than
/// `reset_window_s` after the *previous* trigger; otherwise it opens a new
/// group and stagger slots restart at zero. The window slides, so a steady
/// trickle of triggers less than a window apart keeps extending one group.
///
/// Grouping is purely time-based: unrelated page regions that scroll into view
/// together share one stagger sequence. Use separate schedulers to isolate
/// regions.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupingState {
    reset_window_s: f64,
    last_trigger: Option<Time>,
    window_start: Option<Time>,
    member_count: u32,
    groups_started: u64,
}

impl GroupingState {
    pub fn new(reset_window_s: f64) -> Self {
        Self {
            reset_window_s,
            last_trigger: None,
            window_start: None,
            member_count: 0,
            groups_started: 0,
        }
    }

    /// Records a trigger at `now`. Returns `true` if it opened a new group.
    ///
    /// Every trigger moves the window, including ones with an explicit delay
    /// that never claim a slot.
    pub fn observe(&mut self, now: Time) -> bool {
        let opens_group = match self.last_trigger {
            Some(last) => now.since(last) > self.reset_window_s,
            None => true,
        };
        if opens_group {
            self.member_count = 0;
            self.window_start = Some(now);
            self.groups_started += 1;
        }
        self.last_trigger = Some(now);
        opens_group
    }

    /// Claims the next stagger slot (0, 1, 2, ...) in the current group.
    pub fn claim_slot(&mut self) -> u32 {
        let slot = self.member_count;
        self.member_count = self.member_count.saturating_add(1);
        slot
    }

    /// Forgets all history; the next trigger opens a new group.
    pub fn reset(&mut self) {
        *self = Self::new(self.reset_window_s);
    }

    pub fn reset_window_s(&self) -> f64 {
        self.reset_window_s
    }

    pub fn last_trigger(&self) -> Option<Time> {
        self.last_trigger
    }

    pub fn window_start(&self) -> Option<Time> {
        self.window_start
    }

    /// Slots claimed in the current group.
    pub fn member_count(&self) -> u32 {
        self.member_count
    }

    pub fn groups_started(&self) -> u64 {
        self.groups_started
    }
}
