// Jitter tolerated between an animation-frame timestamp and the schedule.
const SLACK_MS: f64 = 1.0;

pub struct FramePacer {
    interval_ms: f64,
    next_due: Option<f64>,
}

impl FramePacer {
    pub fn new(target_fps: u32) -> Self {
        FramePacer {
            interval_ms: 1000.0 / f64::from(target_fps.max(1)),
            next_due: None,
        }
    }

    #[cfg(test)]
    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    pub fn ready(&mut self, now_ms: f64) -> bool {
        match self.next_due {
            Some(due) if now_ms + SLACK_MS < due => false,
            Some(due) => {
                let mut next = due + self.interval_ms;
                // after a stall, resync instead of bursting to catch up
                if next <= now_ms {
                    next = now_ms + self.interval_ms;
                }
                self.next_due = Some(next);
                true
            }
            None => {
                self.next_due = Some(now_ms + self.interval_ms);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames_run(pacer: &mut FramePacer, refresh_hz: f64, seconds: f64) -> usize {
        let step = 1000.0 / refresh_hz;
        let count = (seconds * refresh_hz) as usize;
        (0..count).filter(|i| pacer.ready(*i as f64 * step)).count()
    }

    #[test]
    fn test_matching_refresh_runs_every_callback() {
        let mut pacer = FramePacer::new(60);
        assert_eq!(frames_run(&mut pacer, 60.0, 2.0), 120);
    }

    #[test]
    fn test_fast_display_is_capped() {
        let mut pacer = FramePacer::new(60);
        let ran = frames_run(&mut pacer, 144.0, 2.0);
        assert!((115..=121).contains(&ran), "ran {} frames", ran);
    }

    #[test]
    fn test_slow_display_runs_every_callback() {
        let mut pacer = FramePacer::new(60);
        assert_eq!(frames_run(&mut pacer, 30.0, 2.0), 60);
    }

    #[test]
    fn test_stall_does_not_burst() {
        let mut pacer = FramePacer::new(60);
        assert!(pacer.ready(0.0));
        assert!(pacer.ready(1000.0));
        assert!(!pacer.ready(1005.0));
        assert!(pacer.ready(1000.0 + pacer.interval_ms()));
    }
}
