use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::game::config::Tuning;
use crate::game::entities::{Car, Obstacle, Pedestrian, Tree};
use crate::game::input::Controls;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Running,
    GameOver,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub spawned: bool,
    pub scored: u32,
    pub crashed: bool,
}

pub struct World {
    pub car: Car,
    pub obstacles: Vec<Obstacle>,
    pub trees: Vec<Tree>,
    pub pedestrian: Pedestrian,
    // Depth offset of the ground and road bands.
    pub scroll: f32,
    pub score: u32,
    pub spawn_timer: u32,
    phase: Phase,
    tuning: Tuning,
    rng: SmallRng,
}

impl World {
    pub fn new(tuning: Tuning, mut rng: SmallRng) -> Self {
        let trees = Tree::row(&mut rng, &tuning);
        World {
            car: Car::new(&tuning),
            obstacles: Vec::new(),
            trees,
            pedestrian: Pedestrian::new(&tuning),
            scroll: 0.0,
            score: 0,
            spawn_timer: 0,
            phase: Phase::Running,
            tuning,
            rng,
        }
    }

    pub fn with_seed(tuning: Tuning, seed: u64) -> Self {
        Self::new(tuning, SmallRng::seed_from_u64(seed))
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn spawn_interval(&self) -> f32 {
        self.tuning.spawn_base / self.car.speed
    }

    pub fn step(&mut self, controls: Controls) -> StepOutcome {
        let mut outcome = StepOutcome::default();
        if self.phase == Phase::GameOver {
            return outcome;
        }

        self.car.apply(controls, &self.tuning);
        let speed = self.car.speed;

        self.scroll += speed;
        if self.scroll > self.tuning.scroll_wrap {
            self.scroll = 0.0;
        }

        self.spawn_timer += 1;
        if self.spawn_timer as f32 > self.spawn_interval() {
            let obstacle = Obstacle::spawn(&mut self.rng, &self.tuning);
            self.obstacles.push(obstacle);
            self.spawn_timer = 0;
            outcome.spawned = true;
        }

        let (scored, hit) = self.advance_obstacles(speed);
        self.score += scored;
        outcome.scored = scored;
        if hit {
            self.phase = Phase::GameOver;
            outcome.crashed = true;
        }

        self.pedestrian.advance(speed, &mut self.rng, &self.tuning);
        for tree in &mut self.trees {
            tree.advance(speed, &self.tuning);
        }

        outcome
    }

    fn advance_obstacles(&mut self, speed: f32) -> (u32, bool) {
        let tuning = &self.tuning;
        let car = &self.car;
        let mut scored = 0;
        let mut hit = false;
        self.obstacles.retain_mut(|obstacle| {
            obstacle.z += speed;
            if obstacle.z > tuning.pass_depth {
                scored += 1;
                return false;
            }
            if obstacle.hits(car, tuning) {
                hit = true;
            }
            true
        });
        (scored, hit)
    }

    // Only honoured after a game over; scenery keeps its place.
    pub fn restart(&mut self) -> bool {
        if self.phase != Phase::GameOver {
            return false;
        }
        self.car = Car::new(&self.tuning);
        self.scroll = 0.0;
        self.score = 0;
        self.obstacles.clear();
        self.spawn_timer = 0;
        self.phase = Phase::Running;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        World::with_seed(Tuning::default(), 42)
    }

    fn run_until_game_over(world: &mut World, max_frames: usize) -> Option<usize> {
        (0..max_frames).find(|_| world.step(Controls::default()).crashed)
    }

    #[test]
    fn test_initial_state() {
        let world = world();
        assert_eq!(world.phase(), Phase::Running);
        assert_eq!(world.car.x, 0.0);
        assert_eq!(world.car.speed, 0.5);
        assert_eq!(world.trees.len(), 30);
        assert!(world.obstacles.is_empty());
    }

    #[test]
    fn test_bounds_hold_under_sustained_input() {
        let mut world = world();
        let floor_it = Controls { right: true, accelerate: true, ..Controls::default() };
        for _ in 0..2000 {
            world.step(floor_it);
            assert!((-4.0..=4.0).contains(&world.car.x));
            assert!((0.2..=0.8).contains(&world.car.speed));
            // keep the road clear so the run continues
            world.obstacles.clear();
        }
        assert_eq!(world.car.x, 4.0);
        assert_eq!(world.car.speed, 0.8);
    }

    #[test]
    fn test_faster_car_spawns_more() {
        let count_spawns = |speed: f32| {
            let mut world = world();
            world.car.speed = speed;
            let mut spawns = 0;
            for _ in 0..1000 {
                if world.step(Controls::default()).spawned {
                    spawns += 1;
                }
                world.obstacles.clear();
            }
            spawns
        };
        let slow = count_spawns(0.2);
        let fast = count_spawns(0.8);
        // 100/0.2 and 100/0.8 frame intervals
        assert!((1..=2).contains(&slow), "slow spawned {}", slow);
        assert!((7..=8).contains(&fast), "fast spawned {}", fast);
        assert!(fast > slow);
    }

    #[test]
    fn test_at_most_one_spawn_per_interval() {
        let mut world = world();
        world.car.speed = 0.8;
        let mut last = None;
        for frame in 0..1000usize {
            if world.step(Controls::default()).spawned {
                if let Some(previous) = last {
                    assert!((frame - previous) as f32 > world.spawn_interval());
                }
                last = Some(frame);
            }
            world.obstacles.clear();
        }
    }

    #[test]
    fn test_passed_obstacle_scores_once() {
        let mut world = world();
        world.car.x = -4.0;
        world.obstacles.push(Obstacle::new(4.0, 19.8, 1.0));
        let outcome = world.step(Controls::default());
        assert_eq!(outcome.scored, 1);
        assert_eq!(world.score, 1);
        assert!(world.obstacles.is_empty());

        let outcome = world.step(Controls::default());
        assert_eq!(outcome.scored, 0);
        assert_eq!(world.score, 1);
    }

    #[test]
    fn test_head_on_obstacle_ends_game() {
        let mut world = world();
        world.obstacles.push(Obstacle::new(0.0, -100.0, 0.75));
        let frame = run_until_game_over(&mut world, 400).expect("no collision");
        // 0.5 per frame from -100 first exceeds 3.5 on frame 208
        assert_eq!(frame, 207);
        assert!(world.is_game_over());
        let hit = world.obstacles.iter().find(|o| o.x == 0.0 && o.size == 0.75).unwrap();
        assert!(hit.z > 3.5 && hit.z < 6.5);
    }

    #[test]
    fn test_far_side_obstacle_passes() {
        let mut world = world();
        world.car.x = -4.0;
        world.obstacles.push(Obstacle::new(4.0, -100.0, 1.0));
        for _ in 0..241 {
            world.step(Controls::default());
        }
        assert!(!world.is_game_over());
        assert_eq!(world.score, 1);
    }

    #[test]
    fn test_double_overlap_transitions_once() {
        let mut world = world();
        world.obstacles.push(Obstacle::new(0.0, 4.0, 1.0));
        world.obstacles.push(Obstacle::new(0.3, 5.0, 1.0));
        let outcome = world.step(Controls::default());
        assert!(outcome.crashed);
        assert!(world.is_game_over());

        let frozen: Vec<f32> = world.obstacles.iter().map(|o| o.z).collect();
        let outcome = world.step(Controls { left: true, ..Controls::default() });
        assert_eq!(outcome, StepOutcome::default());
        assert_eq!(world.obstacles.iter().map(|o| o.z).collect::<Vec<_>>(), frozen);
        assert_eq!(world.car.x, 0.0);
    }

    #[test]
    fn test_game_over_freezes_scenery() {
        let mut world = world();
        world.obstacles.push(Obstacle::new(0.0, 5.0, 1.0));
        world.step(Controls::default());
        let pedestrian = world.pedestrian.clone();
        let trees = world.trees.clone();
        let scroll = world.scroll;
        for _ in 0..10 {
            world.step(Controls::default());
        }
        assert_eq!(world.pedestrian, pedestrian);
        assert_eq!(world.trees, trees);
        assert_eq!(world.scroll, scroll);
    }

    #[test]
    fn test_restart_resets_run_but_not_scenery() {
        let mut world = world();
        world.car.x = 2.0;
        world.car.speed = 0.7;
        world.score = 12;
        world.spawn_timer = 40;
        world.obstacles.push(Obstacle::new(2.0, 5.0, 1.0));
        world.obstacles.push(Obstacle::new(-3.0, -50.0, 1.0));
        world.step(Controls::default());
        assert!(world.is_game_over());

        let trees = world.trees.clone();
        let pedestrian = world.pedestrian.clone();
        assert!(world.restart());
        assert_eq!(world.phase(), Phase::Running);
        assert_eq!(world.score, 0);
        assert_eq!(world.car.speed, 0.5);
        assert_eq!(world.car.x, 0.0);
        assert_eq!(world.spawn_timer, 0);
        assert_eq!(world.scroll, 0.0);
        assert!(world.obstacles.is_empty());
        assert_eq!(world.trees, trees);
        assert_eq!(world.pedestrian, pedestrian);
    }

    #[test]
    fn test_restart_ignored_while_running() {
        let mut world = world();
        world.score = 3;
        assert!(!world.restart());
        assert_eq!(world.score, 3);
    }

    #[test]
    fn test_scroll_wraps() {
        let mut world = world();
        world.scroll = 99.8;
        world.step(Controls::default());
        assert_eq!(world.scroll, 0.0);
    }
}
