pub mod engine;
pub mod game;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Event, HtmlCanvasElement, KeyboardEvent, Request, RequestInit, RequestMode, Response, WebGlRenderingContext, Window};
use std::cell::RefCell;
use log::LevelFilter;
use std::rc::Rc;
use crate::engine::console;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::renderer::Renderer;
use crate::game::Game;
use crate::game::config::GameConfig;

const CONFIG_URL: &str = "/assets/config.json";

thread_local! {
    static GAME: RefCell<Option<Game>> = const { RefCell::new(None) };
}

#[wasm_bindgen]
pub async fn init_game() -> Result<(), JsValue> {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));

    let window = web_sys::window().ok_or(EngineError::MissingBrowserObject("window"))?;
    let document = window.document().ok_or(EngineError::MissingBrowserObject("document"))?;

    console::init(LevelFilter::Info);
    let config = load_config(&window).await;
    console::init(config.log_level);

    let canvas = document.get_element_by_id("canvas")
        .ok_or(EngineError::MissingBrowserObject("canvas"))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| EngineError::MissingBrowserObject("canvas"))?;
    canvas.set_width(config.display.width);
    canvas.set_height(config.display.height);

    let gl = canvas
        .get_context("webgl")?
        .ok_or(EngineError::Context("webgl"))?
        .dyn_into::<WebGlRenderingContext>()
        .map_err(|_| EngineError::Context("webgl"))?;

    let renderer = Renderer::new(gl)?;
    log::info!(
        "Starting {}x{} at {} fps, seed {:?}",
        config.display.width, config.display.height, config.display.target_fps, config.seed
    );

    let game = Game::new(renderer, &document, config)?;
    GAME.with(|g| *g.borrow_mut() = Some(game));

    install_input_listeners(&window)?;

    // Game loop
    let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
        let running = GAME.with(|game| {
            game.borrow_mut().as_mut().map_or(false, |game| game.frame(now))
        });
        if !running {
            log::info!("Frame loop stopped");
            return;
        }
        if let Some(callback) = f.borrow().as_ref() {
            if let Err(e) = request_animation_frame(callback) {
                log::error!("Frame scheduling failed: {}", e);
            }
        }
    }) as Box<dyn FnMut(f64)>));

    if let Some(callback) = g.borrow().as_ref() {
        request_animation_frame(callback)?;
    }

    Ok(())
}

async fn load_config(window: &Window) -> GameConfig {
    match fetch_text(window, CONFIG_URL).await {
        Ok(Some(text)) => match GameConfig::from_json(&text) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring {}: {}", CONFIG_URL, e);
                GameConfig::default()
            }
        },
        Ok(None) => {
            log::info!("No {}, using defaults", CONFIG_URL);
            GameConfig::default()
        }
        Err(e) => {
            log::warn!("Could not fetch {}: {}", CONFIG_URL, e);
            GameConfig::default()
        }
    }
}

async fn fetch_text(window: &Window, url: &str) -> EngineResult<Option<String>> {
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init(url, &opts)?;
    let resp: Response = JsFuture::from(window.fetch_with_request(&request)).await?.dyn_into()?;
    if !resp.ok() {
        return Ok(None);
    }
    let text = JsFuture::from(resp.text()?).await?;
    Ok(text.as_string())
}

fn install_input_listeners(window: &Window) -> EngineResult<()> {
    let keydown = Closure::wrap(Box::new(move |event: KeyboardEvent| {
        let handled = GAME.with(|g| {
            g.borrow_mut().as_mut().map_or(false, |game| game.input.key_down(&event.key()))
        });
        if handled {
            event.prevent_default();
        }
    }) as Box<dyn FnMut(_)>);
    window.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
    keydown.forget();

    let keyup = Closure::wrap(Box::new(move |event: KeyboardEvent| {
        GAME.with(|g| {
            if let Some(game) = g.borrow_mut().as_mut() {
                game.input.key_up(&event.key());
            }
        });
    }) as Box<dyn FnMut(_)>);
    window.add_event_listener_with_callback("keyup", keyup.as_ref().unchecked_ref())?;
    keyup.forget();

    let blur = Closure::wrap(Box::new(move |_: Event| {
        GAME.with(|g| {
            if let Some(game) = g.borrow_mut().as_mut() {
                game.input.release_all();
            }
        });
    }) as Box<dyn FnMut(_)>);
    window.add_event_listener_with_callback("blur", blur.as_ref().unchecked_ref())?;
    blur.forget();

    Ok(())
}

fn request_animation_frame(f: &Closure<dyn FnMut(f64)>) -> EngineResult<i32> {
    let window = web_sys::window().ok_or(EngineError::MissingBrowserObject("window"))?;
    Ok(window.request_animation_frame(f.as_ref().unchecked_ref())?)
}
