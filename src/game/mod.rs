pub mod config;
pub mod entities;
pub mod hud;
pub mod input;
pub mod scene;
pub mod world;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use web_sys::Document;

use crate::engine::error::EngineResult;
use crate::engine::renderer::Renderer;
use crate::engine::text::TextOverlay;
use crate::engine::timing::FramePacer;
use crate::game::config::{DisplayConfig, GameConfig};
use crate::game::input::{Command, InputState};
use crate::game::scene::{MeshLibrary, RendererSink, SKY_BLUE};
use crate::game::world::World;

pub struct Game {
    renderer: Renderer,
    meshes: MeshLibrary,
    overlay: TextOverlay,
    pub world: World,
    pub input: InputState,
    pacer: FramePacer,
    display: DisplayConfig,
}

impl Game {
    pub fn new(renderer: Renderer, document: &Document, config: GameConfig) -> EngineResult<Self> {
        let meshes = MeshLibrary::upload(&renderer)?;
        let overlay = TextOverlay::new(document, &renderer)?;

        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let world = World::new(config.tuning, rng);

        renderer.resize(config.display.width as i32, config.display.height as i32);
        renderer.enable_depth_test();

        Ok(Game {
            renderer,
            meshes,
            overlay,
            world,
            input: InputState::new(),
            pacer: FramePacer::new(config.display.target_fps),
            display: config.display,
        })
    }

    pub fn frame(&mut self, now_ms: f64) -> bool {
        if !self.pacer.ready(now_ms) {
            return true;
        }
        let commands = self.input.drain_commands();
        if !apply_commands(&mut self.world, &commands) {
            return false;
        }
        self.update();
        self.render();
        true
    }

    pub fn update(&mut self) {
        let outcome = self.world.step(self.input.controls());
        if outcome.spawned {
            if let Some(obstacle) = self.world.obstacles.last() {
                log::debug!("Obstacle spawned at x={:.2} size={:.2}", obstacle.x, obstacle.size);
            }
        }
        if outcome.scored > 0 {
            log::debug!("Passed {} obstacle(s), score {}", outcome.scored, self.world.score);
        }
        if outcome.crashed {
            log::info!("Game over with score {}", self.world.score);
        }
    }

    pub fn render(&mut self) {
        self.renderer.clear(SKY_BLUE);

        let mut sink = RendererSink {
            renderer: &self.renderer,
            meshes: &self.meshes,
            view_projection: scene::view_projection(&self.world, &self.display),
        };
        scene::draw_world(&self.world, &mut sink);

        let labels = hud::labels(&self.world);
        self.overlay.draw(
            &self.renderer,
            &labels,
            self.display.width as f32,
            self.display.height as f32,
        );
    }
}

pub fn apply_commands(world: &mut World, commands: &[Command]) -> bool {
    for command in commands {
        match command {
            Command::Quit => {
                log::info!("Quit requested");
                return false;
            }
            Command::Restart => {
                if world.restart() {
                    log::info!("Restarted");
                }
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::Tuning;
    use crate::game::entities::Obstacle;
    use crate::game::world::Phase;

    #[test]
    fn test_restart_command_only_after_game_over() {
        let mut world = World::with_seed(Tuning::default(), 2);
        world.score = 5;
        assert!(apply_commands(&mut world, &[Command::Restart]));
        assert_eq!(world.score, 5);

        world.obstacles.push(Obstacle::new(0.0, 5.0, 1.0));
        world.step(Default::default());
        assert_eq!(world.phase(), Phase::GameOver);
        assert!(apply_commands(&mut world, &[Command::Restart]));
        assert_eq!(world.phase(), Phase::Running);
        assert_eq!(world.score, 0);
    }

    #[test]
    fn test_quit_stops_loop() {
        let mut world = World::with_seed(Tuning::default(), 2);
        assert!(!apply_commands(&mut world, &[Command::Quit]));
        assert!(apply_commands(&mut world, &[]));
    }
}
