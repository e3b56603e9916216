//! Wiring for the command line: configuration, the on-disk board and the
//! generator, resolved the same way for every command.

use crate::board::Board;
use crate::clock::SystemClock;
use crate::config::{self, Config, ConfigLoad, ConfigOverrides};
use crate::error::AppError;
use crate::generate::{FALLBACK_STEPS, FixedGenerator, GeminiGenerator, SubstepGenerator};
use crate::ids::UuidIds;
use crate::storage::{FileStorage, store_dir};

/// File config, then environment credential, then command-line overrides.
pub fn resolve_config(overrides: &ConfigOverrides) -> ConfigLoad {
    let ConfigLoad { config, error } = config::load_config_with_fallback();
    let config = config::merge_overrides(&config::apply_env(config), overrides);
    ConfigLoad { config, error }
}

pub fn open_board(config: &Config) -> Result<Board<FileStorage>, AppError> {
    let dir = store_dir(config.store_dir.as_deref())?;
    tracing::debug!(dir = %dir.display(), "opening board");
    Ok(Board::open(
        FileStorage::new(dir),
        Box::new(UuidIds),
        Box::new(SystemClock),
    ))
}

/// `offline` never touches the network and answers with the fallback steps.
pub fn generator_for(config: &Config, offline: bool) -> Box<dyn SubstepGenerator> {
    if offline {
        return Box::new(FixedGenerator::steps(FALLBACK_STEPS));
    }
    Box::new(GeminiGenerator::from_config(config))
}
