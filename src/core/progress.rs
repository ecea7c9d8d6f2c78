use std::collections::HashMap;

use rand::RngExt;

use crate::models::media::SlotKey;

/// Upper bound of one progress increment, matching the reference animation.
pub const MAX_STEP: f64 = 15.0;

/// Source of progress increments. Injectable so tests can script exact runs.
pub trait StepSource: Send {
    /// Next increment, uniform on (0, MAX_STEP].
    fn next_step(&mut self) -> f64;
}

pub struct UniformStep;

impl StepSource for UniformStep {
    fn next_step(&mut self) -> f64 {
        // random_range yields [0, MAX_STEP); flipping the interval keeps a
        // zero step impossible so progress strictly increases.
        MAX_STEP - rand::rng().random_range(0.0..MAX_STEP)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SlotPhase {
    Idle,
    Active(f64),
    /// Progress pinned at 100, waiting out the settle delay.
    Completing,
    /// Settled. Stays pinned at 100 until a new descriptor resets the board,
    /// but may be restarted from zero.
    Done,
    Cancelled,
}

#[derive(Debug, PartialEq)]
pub enum Tick {
    Advanced(f64),
    /// First tick at or past 100.
    Full,
}

/// Per-format download animation with one process-wide active slot.
pub struct DownloadSim {
    slots: HashMap<SlotKey, SlotPhase>,
    active: Option<SlotKey>,
    steps: Box<dyn StepSource>,
}

impl DownloadSim {
    pub fn new(steps: Box<dyn StepSource>) -> Self {
        Self {
            slots: HashMap::new(),
            active: None,
            steps,
        }
    }

    pub fn uniform() -> Self {
        Self::new(Box::new(UniformStep))
    }

    /// IDLE -> ACTIVE(0). Rejected while any other slot is active.
    pub fn begin(&mut self, key: &SlotKey) -> bool {
        if self.active.is_some() {
            return false;
        }
        self.active = Some(key.clone());
        self.slots.insert(key.clone(), SlotPhase::Active(0.0));
        true
    }

    /// Advance the active slot by one increment.
    pub fn tick(&mut self) -> Option<Tick> {
        let key = self.active.clone()?;
        let phase = self.slots.get(&key).cloned()?;
        match phase {
            SlotPhase::Active(progress) => {
                let next = progress + self.steps.next_step();
                if next >= 100.0 {
                    self.slots.insert(key, SlotPhase::Completing);
                    Some(Tick::Full)
                } else {
                    self.slots.insert(key, SlotPhase::Active(next));
                    Some(Tick::Advanced(next))
                }
            }
            SlotPhase::Completing => Some(Tick::Full),
            _ => None,
        }
    }

    /// COMPLETING -> DONE once the settle delay has elapsed. Frees the active
    /// marker and returns the settled slot.
    pub fn settle(&mut self) -> Option<SlotKey> {
        let key = self.active.clone()?;
        match self.slots.get(&key) {
            Some(SlotPhase::Completing) => {
                self.slots.insert(key.clone(), SlotPhase::Done);
                self.active = None;
                Some(key)
            }
            _ => None,
        }
    }

    /// ACTIVE/COMPLETING -> CANCELLED. Frees the active marker.
    pub fn cancel(&mut self) -> Option<SlotKey> {
        let key = self.active.take()?;
        self.slots.insert(key.clone(), SlotPhase::Cancelled);
        Some(key)
    }

    pub fn progress(&self, key: &SlotKey) -> f64 {
        match self.slots.get(key) {
            Some(SlotPhase::Active(p)) => *p,
            Some(SlotPhase::Completing) | Some(SlotPhase::Done) => 100.0,
            _ => 0.0,
        }
    }

    pub fn phase(&self, key: &SlotKey) -> SlotPhase {
        self.slots.get(key).cloned().unwrap_or(SlotPhase::Idle)
    }

    pub fn active(&self) -> Option<&SlotKey> {
        self.active.as_ref()
    }

    /// Clears the whole board. Called when a new descriptor replaces the
    /// previous result.
    pub fn reset(&mut self) {
        self.slots.clear();
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::media::FormatKind;

    struct Scripted {
        steps: Vec<f64>,
        at: usize,
    }

    impl Scripted {
        fn new(steps: &[f64]) -> Box<Self> {
            Box::new(Self {
                steps: steps.to_vec(),
                at: 0,
            })
        }
    }

    impl StepSource for Scripted {
        fn next_step(&mut self) -> f64 {
            let step = self.steps[self.at % self.steps.len()];
            self.at += 1;
            step
        }
    }

    fn key(quality: &str, kind: FormatKind) -> SlotKey {
        SlotKey {
            quality: quality.into(),
            kind,
        }
    }

    #[test]
    fn second_slot_rejected_while_one_is_active() {
        let mut sim = DownloadSim::new(Scripted::new(&[10.0]));
        let video = key("1080p", FormatKind::Video);
        let audio = key("320kbps", FormatKind::Audio);

        assert!(sim.begin(&video));
        assert!(!sim.begin(&audio));
        assert_eq!(sim.phase(&audio), SlotPhase::Idle);
        assert_eq!(sim.active(), Some(&video));
    }

    #[test]
    fn ticks_strictly_increase_until_pinned_at_100() {
        let mut sim = DownloadSim::new(Scripted::new(&[40.0]));
        let slot = key("720p", FormatKind::Video);
        sim.begin(&slot);

        assert_eq!(sim.tick(), Some(Tick::Advanced(40.0)));
        assert_eq!(sim.tick(), Some(Tick::Advanced(80.0)));
        // 120 would exceed 100: pinned to exactly 100 on the third tick.
        assert_eq!(sim.tick(), Some(Tick::Full));
        assert_eq!(sim.progress(&slot), 100.0);
        assert_eq!(sim.phase(&slot), SlotPhase::Completing);
    }

    #[test]
    fn exact_tick_count_with_deterministic_steps() {
        let mut sim = DownloadSim::new(Scripted::new(&[15.0]));
        let slot = key("4K", FormatKind::Video);
        sim.begin(&slot);

        let mut ticks = 0;
        while sim.tick() == Some(Tick::Advanced(15.0 * (ticks + 1) as f64)) {
            ticks += 1;
        }
        // 6 partial ticks (90.0), the 7th reaches 105 and pins.
        assert_eq!(ticks, 6);
        assert_eq!(sim.progress(&slot), 100.0);
    }

    #[test]
    fn settle_frees_the_active_marker() {
        let mut sim = DownloadSim::new(Scripted::new(&[60.0]));
        let slot = key("1080p", FormatKind::Video);
        sim.begin(&slot);
        sim.tick();
        sim.tick();
        assert_eq!(sim.settle(), Some(slot.clone()));
        assert_eq!(sim.phase(&slot), SlotPhase::Done);
        assert_eq!(sim.progress(&slot), 100.0);
        assert!(sim.active().is_none());

        // Another slot may start now.
        assert!(sim.begin(&key("320kbps", FormatKind::Audio)));
    }

    #[test]
    fn settle_before_completion_is_a_no_op() {
        let mut sim = DownloadSim::new(Scripted::new(&[10.0]));
        let slot = key("480p", FormatKind::Video);
        sim.begin(&slot);
        sim.tick();
        assert_eq!(sim.settle(), None);
        assert_eq!(sim.phase(&slot), SlotPhase::Active(10.0));
    }

    #[test]
    fn cancel_is_terminal_and_frees_the_slot() {
        let mut sim = DownloadSim::new(Scripted::new(&[10.0]));
        let slot = key("720p", FormatKind::Video);
        sim.begin(&slot);
        sim.tick();
        assert_eq!(sim.cancel(), Some(slot.clone()));
        assert_eq!(sim.phase(&slot), SlotPhase::Cancelled);
        assert_eq!(sim.progress(&slot), 0.0);
        assert!(sim.tick().is_none());
        assert!(sim.begin(&key("1080p", FormatKind::Video)));
    }

    #[test]
    fn done_slot_can_restart_from_zero() {
        let mut sim = DownloadSim::new(Scripted::new(&[100.0]));
        let slot = key("720p", FormatKind::Video);
        sim.begin(&slot);
        sim.tick();
        sim.settle();
        assert!(sim.begin(&slot));
        assert_eq!(sim.phase(&slot), SlotPhase::Active(0.0));
    }

    #[test]
    fn reset_clears_the_board() {
        let mut sim = DownloadSim::new(Scripted::new(&[100.0]));
        let slot = key("720p", FormatKind::Video);
        sim.begin(&slot);
        sim.tick();
        sim.settle();
        sim.reset();
        assert_eq!(sim.phase(&slot), SlotPhase::Idle);
        assert_eq!(sim.progress(&slot), 0.0);
    }
}
