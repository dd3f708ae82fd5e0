//! Shared fixtures for integration tests

#![allow(dead_code)]

use image::{Rgba, RgbaImage};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, HashSet};

use squad_token::composition::{rasterize, Container};
use squad_token::renderer::{RenderError, Renderer};
use squad_token::world::{ActorRecord, TokenRecord, World, WorldData};
use squad_token::{ActorId, TokenId, Texture, TokenVisual};

pub fn solid(w: u32, h: u32, color: [u8; 4]) -> Texture {
    Texture::new(RgbaImage::from_pixel(w, h, Rgba(color)))
}

/// In-memory renderer with scripted backgrounds and failures.
#[derive(Default)]
pub struct FakeRenderer {
    pub backgrounds: RefCell<HashMap<String, Texture>>,
    pub failing: RefCell<HashSet<String>>,
    /// Yield once inside `load_texture` so other futures can interleave
    pub yield_on_load: Cell<bool>,
    pub loads: Cell<usize>,
    pub installs: Cell<usize>,
    pub scenes: RefCell<Vec<Container>>,
    slots: RefCell<BTreeMap<TokenId, (ActorId, TokenVisual)>>,
    refreshes: RefCell<HashMap<TokenId, u64>>,
}

impl FakeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_background(self, path: &str, texture: Texture) -> Self {
        self.backgrounds.borrow_mut().insert(path.to_string(), texture);
        self
    }

    pub fn fail_path(&self, path: &str) {
        self.failing.borrow_mut().insert(path.to_string());
    }

    pub fn place(&self, token: &str, actor: &str, image: Texture) {
        self.slots
            .borrow_mut()
            .insert(TokenId::from(token), (ActorId::from(actor), TokenVisual::original(image)));
    }

    /// Overwrite a slot directly, bypassing the compositor.
    pub fn force_visual(&self, token: &str, visual: TokenVisual) {
        let mut slots = self.slots.borrow_mut();
        let slot = slots.get_mut(&TokenId::from(token)).expect("token placed");
        slot.1 = visual;
    }

    pub fn visual(&self, token: &str) -> TokenVisual {
        self.displayed(&TokenId::from(token)).expect("token placed")
    }

    pub fn refresh_count(&self, token: &str) -> u64 {
        self.refreshes.borrow().get(&TokenId::from(token)).copied().unwrap_or(0)
    }
}

impl Renderer for FakeRenderer {
    async fn load_texture(&self, path: &str) -> Result<Texture, RenderError> {
        self.loads.set(self.loads.get() + 1);
        if self.yield_on_load.get() {
            tokio::task::yield_now().await;
        }
        if self.failing.borrow().contains(path) {
            return Err(RenderError::Io {
                path: path.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
            });
        }
        self.backgrounds.borrow().get(path).cloned().ok_or_else(|| RenderError::Io {
            path: path.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "unknown background"),
        })
    }

    fn render_to_texture(&self, scene: &Container) -> Result<Texture, RenderError> {
        self.scenes.borrow_mut().push(scene.clone());
        Ok(Texture::new(rasterize(scene)))
    }

    fn tokens(&self) -> Vec<TokenId> {
        self.slots.borrow().keys().cloned().collect()
    }

    fn actor_of(&self, token: &TokenId) -> Option<ActorId> {
        self.slots.borrow().get(token).map(|(actor, _)| actor.clone())
    }

    fn displayed(&self, token: &TokenId) -> Option<TokenVisual> {
        self.slots.borrow().get(token).map(|(_, visual)| visual.clone())
    }

    fn set_displayed_image(&self, token: &TokenId, visual: TokenVisual) -> Result<(), RenderError> {
        let mut slots = self.slots.borrow_mut();
        let slot = slots.get_mut(token).ok_or_else(|| RenderError::UnknownToken(token.clone()))?;
        slot.1 = visual;
        self.installs.set(self.installs.get() + 1);
        Ok(())
    }

    fn refresh(&self, token: &TokenId) {
        *self.refreshes.borrow_mut().entry(token.clone()).or_default() += 1;
    }
}

/// A world with the given actors; `locked` actors reject writes.
pub fn world_with(actors: &[(&str, bool)], locked: &[&str]) -> World {
    let mut data = WorldData::default();
    for (id, squad) in actors {
        let mut record = ActorRecord { locked: locked.contains(id), ..Default::default() };
        if *squad {
            record
                .flags
                .entry("squad-token".to_string())
                .or_default()
                .insert("is-squad".to_string(), serde_json::Value::Bool(true));
        }
        data.actors.insert(ActorId::from(*id), record);
    }
    World::from_data(data)
}

pub fn token_record(id: &str, actor: &str, img: &str) -> TokenRecord {
    TokenRecord { id: TokenId::from(id), actor: ActorId::from(actor), img: img.to_string() }
}
