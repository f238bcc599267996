use rand::Rng;

use crate::game::config::Tuning;
use crate::game::input::Controls;

#[derive(Clone, Debug, PartialEq)]
pub struct Car {
    pub x: f32,
    pub speed: f32,
}

impl Car {
    pub fn new(tuning: &Tuning) -> Self {
        Car { x: 0.0, speed: tuning.initial_speed }
    }

    pub fn apply(&mut self, controls: Controls, tuning: &Tuning) {
        self.x = (self.x + controls.steering() * tuning.steer_step)
            .clamp(-tuning.car_limit, tuning.car_limit);
        self.speed = (self.speed + controls.throttle() * tuning.speed_step)
            .clamp(tuning.min_speed, tuning.max_speed);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub size: f32,
}

impl Obstacle {
    pub fn new(x: f32, z: f32, size: f32) -> Self {
        Obstacle { x, y: size / 2.0, z, size }
    }

    pub fn spawn<R: Rng>(rng: &mut R, tuning: &Tuning) -> Self {
        let size = rng.gen_range(tuning.obstacle_min_size..tuning.obstacle_max_size);
        let x = rng.gen_range(-tuning.obstacle_spread..tuning.obstacle_spread);
        Obstacle::new(x, tuning.spawn_depth, size)
    }

    pub fn in_collision_window(&self, tuning: &Tuning) -> bool {
        self.z > tuning.collision_near && self.z < tuning.collision_far
    }

    pub fn hits(&self, car: &Car, tuning: &Tuning) -> bool {
        self.in_collision_window(tuning)
            && (self.x - car.x).abs() < self.size / 2.0 + tuning.car_half_width
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tree {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Tree {
    pub fn planted<R: Rng>(rng: &mut R, z: f32, tuning: &Tuning) -> Self {
        let side = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let x = (tuning.tree_min_offset + rng.gen_range(0.0..tuning.tree_offset_range)) * side;
        Tree { x, y: 0.0, z }
    }

    pub fn row<R: Rng>(rng: &mut R, tuning: &Tuning) -> Vec<Tree> {
        (0..tuning.tree_count)
            .map(|i| {
                let z = -(i as f32) * tuning.tree_spacing - tuning.tree_first_depth;
                Tree::planted(rng, z, tuning)
            })
            .collect()
    }

    pub fn advance(&mut self, distance: f32, tuning: &Tuning) {
        self.z += distance;
        if self.z > tuning.tree_wrap_depth {
            self.z -= tuning.tree_loop_length;
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Pedestrian {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Pedestrian {
    pub fn new(tuning: &Tuning) -> Self {
        Pedestrian { x: tuning.pedestrian_start_x, y: 0.0, z: 0.0 }
    }

    pub fn advance<R: Rng>(&mut self, speed: f32, rng: &mut R, tuning: &Tuning) {
        self.z += speed * tuning.pedestrian_speed_factor;
        if self.z > tuning.pedestrian_wrap_depth {
            self.z = tuning.pedestrian_respawn_depth;
            self.x = rng.gen_range(-tuning.pedestrian_spread..tuning.pedestrian_spread);
        }
    }
}
