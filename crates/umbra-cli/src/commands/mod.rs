pub mod check;
pub mod constraints;
pub mod play;

use std::fs;
use std::path::Path;

use umbra_engine::{Engine, EngineConfig};

use crate::SessionArgs;

/// Build the engine configuration: the TOML file first, then flags on top.
fn load_config(args: &SessionArgs) -> Result<EngineConfig, String> {
    let mut config = match &args.config {
        Some(path) => {
            let content = fs::read_to_string(path)
                .map_err(|e| format!("failed to read config '{}': {e}", path.display()))?;
            toml::from_str(&content)
                .map_err(|e| format!("failed to parse config '{}': {e}", path.display()))?
        }
        None => EngineConfig::default(),
    };
    if let Some(dir) = &args.data {
        config = config.with_content_dir(dir);
    }
    if let Some(layer) = args.max_layer {
        config = config.with_max_layer(layer);
    }
    Ok(config)
}

/// Start a fresh session or resume the one in `--load`.
fn start_engine(args: &SessionArgs) -> Result<Engine, String> {
    let config = load_config(args)?;
    match &args.load {
        Some(path) => {
            let json = fs::read_to_string(path)
                .map_err(|e| format!("failed to read save '{}': {e}", path.display()))?;
            Engine::deserialize(&json, config)
                .map_err(|e| format!("failed to load save '{}': {e}", path.display()))
        }
        None => Engine::new(config, None).map_err(|e| format!("failed to start session: {e}")),
    }
}

/// Write the session to `path`.
fn write_save(engine: &Engine, path: &Path) -> Result<(), String> {
    let json = engine
        .serialize()
        .map_err(|e| format!("failed to serialize session: {e}"))?;
    fs::write(path, json)
        .map_err(|e| format!("failed to write save '{}': {e}", path.display()))?;
    tracing::debug!(path = %path.display(), "session saved");
    Ok(())
}
