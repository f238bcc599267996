use crate::engine::text::Label;
use crate::game::world::World;

pub const CONTROLS_HINT: &str = "Use WASD or Arrow Keys to control the car";

// Overlay text for the current phase, positioned on an 800x600 surface.
pub fn labels(world: &World) -> Vec<Label> {
    if world.is_game_over() {
        vec![
            Label::new(format!("Game Over! Score: {}", world.score), 300.0, 400.0),
            Label::new("Press R to restart", 320.0, 350.0),
        ]
    } else {
        vec![
            Label::new(format!("Score: {}", world.score), 10.0, 570.0),
            Label::new(format!("Speed: {:.2}", world.car.speed), 10.0, 540.0),
            Label::new(CONTROLS_HINT, 200.0, 570.0),
        ]
    }
}
