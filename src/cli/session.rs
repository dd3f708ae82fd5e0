//! Shared command setup: config, world document, and renderer

use std::path::Path;
use thiserror::Error;

use crate::config::{load_config, merge_cli_overrides, CliOverrides, ConfigError, SquadConfig};
use crate::hooks::{Hook, SquadToken};
use crate::renderer::{Renderer, SoftwareRenderer};
use crate::world::{World, WorldError};

#[derive(Debug, Error)]
pub(crate) enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    World(#[from] WorldError),
}

/// Everything a command works on.
pub(crate) struct Session {
    pub config: SquadConfig,
    pub world: World,
    pub renderer: SoftwareRenderer,
}

pub(crate) type Module<'a> = SquadToken<'a, SoftwareRenderer, World, World>;

impl Session {
    pub fn open(config_path: Option<&Path>, overrides: &CliOverrides) -> Result<Self, SessionError> {
        let mut config = load_config(config_path)?;
        merge_cli_overrides(&mut config, overrides);

        let world = World::load(&config.world.path)?;
        let renderer = SoftwareRenderer::new(config.assets.root.clone());
        Ok(Self { config, world, renderer })
    }

    /// Bind the module to this session and run `setup`.
    pub async fn module(&self) -> Module<'_> {
        let module = SquadToken::new(&self.renderer, &self.world, &self.world)
            .with_default_background(self.config.compositor.default_background.clone());
        if let Err(e) = module.handle(&Hook::Setup).await {
            log::error!("setup failed: {}", e);
        }
        module
    }

    /// Load every token's image and place it on the canvas.
    ///
    /// Tokens whose image cannot be loaded are skipped. Returns how many were placed.
    pub async fn place_tokens(&self) -> usize {
        let mut placed = 0;
        for record in self.world.tokens() {
            match self.renderer.load_texture(&record.img).await {
                Ok(texture) => {
                    self.renderer.place_token(record.id, record.actor, texture);
                    placed += 1;
                }
                Err(e) => eprintln!("Warning: skipping token '{}': {}", record.id, e),
            }
        }
        placed
    }

    /// Persist the world, reporting failures on stderr.
    pub fn save(&self) -> bool {
        match self.world.save() {
            Ok(_) => true,
            Err(e) => {
                eprintln!("Error: {}", e);
                false
            }
        }
    }
}
