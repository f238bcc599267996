use std::collections::{HashMap, HashSet};

use nalgebra::{Matrix4, Vector3};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, WebGlTexture};

use crate::engine::error::{EngineError, EngineResult};
use crate::engine::mesh::Mesh;
use crate::engine::renderer::{GpuMesh, Renderer};

const FONT: &str = "24px sans-serif";
const LINE_HEIGHT: u32 = 28;

// A string placed on screen, `x`/`y` being the bottom-left corner in pixels
// with the origin at the bottom-left of the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

impl Label {
    pub fn new(text: impl Into<String>, x: f32, y: f32) -> Self {
        Label { text: text.into(), x, y }
    }
}

struct TextSprite {
    texture: WebGlTexture,
    width: f32,
    height: f32,
}

// Textures kept for reuse once their text leaves the screen.
const MAX_SPARE: usize = 4;

// Per-text sprites. Entries not drawn during a frame are retired at its end
// and their payload recycled for the next new text.
struct SpriteCache<T> {
    live: HashMap<String, T>,
    drawn: HashSet<String>,
    spare: Vec<T>,
}

impl<T> SpriteCache<T> {
    fn new() -> Self {
        SpriteCache {
            live: HashMap::new(),
            drawn: HashSet::new(),
            spare: Vec::new(),
        }
    }

    fn contains(&self, text: &str) -> bool {
        self.live.contains_key(text)
    }

    fn insert(&mut self, text: &str, sprite: T) {
        self.live.insert(text.to_string(), sprite);
    }

    fn take_spare(&mut self) -> Option<T> {
        self.spare.pop()
    }

    fn mark_drawn(&mut self, text: &str) -> Option<&T> {
        let sprite = self.live.get(text)?;
        self.drawn.insert(text.to_string());
        Some(sprite)
    }

    // Returns what no longer fits in the spare pool.
    fn end_frame(&mut self) -> Vec<T> {
        let drawn = std::mem::take(&mut self.drawn);
        let stale: Vec<String> = self.live.keys().filter(|text| !drawn.contains(*text)).cloned().collect();
        let mut overflow = Vec::new();
        for text in stale {
            if let Some(sprite) = self.live.remove(&text) {
                if self.spare.len() < MAX_SPARE {
                    self.spare.push(sprite);
                } else {
                    overflow.push(sprite);
                }
            }
        }
        overflow
    }
}

pub struct TextOverlay {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    quad: GpuMesh,
    sprites: SpriteCache<TextSprite>,
}

impl TextOverlay {
    pub fn new(document: &Document, renderer: &Renderer) -> EngineResult<Self> {
        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| EngineError::MissingBrowserObject("canvas"))?;
        let context = canvas
            .get_context("2d")?
            .ok_or(EngineError::Context("2d"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| EngineError::Context("2d"))?;
        let quad = renderer.upload(&Mesh::overlay_quad())?;

        Ok(TextOverlay {
            canvas,
            context,
            quad,
            sprites: SpriteCache::new(),
        })
    }

    fn rasterize(&self, renderer: &Renderer, text: &str, reuse: Option<WebGlTexture>) -> EngineResult<TextSprite> {
        self.context.set_font(FONT);
        let width = self.context.measure_text(text)?.width().ceil().max(1.0) as u32;

        // resizing the canvas resets the context state
        self.canvas.set_width(width);
        self.canvas.set_height(LINE_HEIGHT);
        self.context.set_font(FONT);
        self.context.set_text_baseline("top");
        self.context.clear_rect(0.0, 0.0, f64::from(width), f64::from(LINE_HEIGHT));
        self.context.set_fill_style_str("white");
        self.context.fill_text(text, 0.0, 2.0)?;

        let texture = match reuse {
            Some(texture) => {
                renderer.upload_canvas(&texture, &self.canvas)?;
                texture
            }
            None => renderer.create_canvas_texture(&self.canvas)?,
        };
        Ok(TextSprite {
            texture,
            width: width as f32,
            height: LINE_HEIGHT as f32,
        })
    }

    pub fn draw(&mut self, renderer: &Renderer, labels: &[Label], width: f32, height: f32) {
        let projection = Matrix4::new_orthographic(0.0, width, 0.0, height, -1.0, 1.0);

        renderer.disable_depth_test();
        renderer.enable_blend();
        for label in labels {
            if !self.sprites.contains(&label.text) {
                let reuse = self.sprites.take_spare().map(|sprite| sprite.texture);
                match self.rasterize(renderer, &label.text, reuse) {
                    Ok(sprite) => self.sprites.insert(&label.text, sprite),
                    Err(e) => {
                        log::warn!("Skipping label {:?}: {}", label.text, e);
                        continue;
                    }
                }
            }
            if let Some(sprite) = self.sprites.mark_drawn(&label.text) {
                let model = Matrix4::new_translation(&Vector3::new(label.x, label.y, 0.0))
                    * Matrix4::new_nonuniform_scaling(&Vector3::new(sprite.width, sprite.height, 1.0));
                renderer.draw_textured(&self.quad, &sprite.texture, &model, &projection);
            }
        }
        renderer.disable_blend();
        renderer.enable_depth_test();

        for sprite in self.sprites.end_frame() {
            renderer.delete_texture(&sprite.texture);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changing_text_recycles_instead_of_growing() {
        let mut cache = SpriteCache::new();
        let mut created = 0;
        let mut deleted = 0;
        for frame in 0..100 {
            let speed = format!("Speed: {:.2}", 0.5 + frame as f32 * 0.005);
            for text in ["Score: 0", speed.as_str()] {
                if !cache.contains(text) {
                    let sprite = cache.take_spare().unwrap_or_else(|| {
                        created += 1;
                        created
                    });
                    cache.insert(text, sprite);
                }
                assert!(cache.mark_drawn(text).is_some());
            }
            deleted += cache.end_frame().len();
        }
        // one texture per label plus the one retired each frame
        assert_eq!(created, 3);
        assert_eq!(deleted, 0);
    }

    #[test]
    fn test_undrawn_sprites_retire_and_overflow() {
        let mut cache = SpriteCache::new();
        for i in 0..6 {
            cache.insert(&format!("label {}", i), i);
        }
        cache.mark_drawn("label 0");
        let overflow = cache.end_frame();
        assert_eq!(overflow.len(), 5 - MAX_SPARE);
        assert!(cache.contains("label 0"));
        assert!(!cache.contains("label 1"));

        // nothing drawn: the last live sprite retires as well
        assert_eq!(cache.end_frame().len(), 1);
        assert!(!cache.contains("label 0"));
    }
}
