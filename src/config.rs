use std::path::Path;

use anyhow::{Context, Result};

use crate::logging::LogLevel;
use crate::resource::propfile::PropertyFile;

/// Default frame time of the conversation driver, in milliseconds
pub const DEFAULT_TICK_MS: u64 = 16;

/// Default number of ticks before a conversation is abandoned
pub const DEFAULT_MAX_TICKS: u64 = 100_000;

/// Application options that can be set via CLI or config file
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    // Commandline-only options
    pub catalog: Option<String>,
    pub script: Option<String>,
    pub choices: Vec<usize>,
    pub monologue: bool,

    // Commandline and config options
    pub animated_windows: bool,
    pub tick_ms: u64,
    pub max_ticks: u64,
    pub log_level: LogLevel,
    pub player: String,
    pub npc: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            catalog: None,
            script: None,
            choices: Vec::new(),
            monologue: false,
            animated_windows: true,
            tick_ms: DEFAULT_TICK_MS,
            max_ticks: DEFAULT_MAX_TICKS,
            log_level: LogLevel::Info,
            player: "Hero".to_string(),
            npc: "Smith".to_string(),
        }
    }
}

/// Load options from a config file, or defaults when `path` is `None`
pub fn load_config(path: Option<&Path>) -> Result<Options> {
    let mut opts = Options::default();
    let Some(path) = path else {
        return Ok(opts);
    };

    let props = PropertyFile::load(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    apply_properties(&mut opts, &props)?;
    Ok(opts)
}

/// Overlay the values present in `props`
pub fn apply_properties(opts: &mut Options, props: &PropertyFile) -> Result<()> {
    if props.contains("game.animatedWindows") {
        opts.animated_windows = props
            .get_bool("game.animatedWindows")
            .context("game.animatedWindows must be a boolean")?;
    }
    if props.contains("game.tickMs") {
        opts.tick_ms = parse_tick(&props.get_or("game.tickMs", ""))?;
    }
    if props.contains("game.maxTicks") {
        let max_ticks = props
            .get_u64("game.maxTicks")
            .context("game.maxTicks must be a number")?;
        opts.max_ticks = parse_max_ticks(max_ticks)?;
    }
    if let Some(level) = props.get("log.level") {
        opts.log_level = level.parse()?;
    }
    if let Some(player) = props.get("dialog.player") {
        opts.player = player.clone();
    }
    if let Some(npc) = props.get("dialog.npc") {
        opts.npc = npc.clone();
    }
    Ok(())
}

/// Reject a tick limit of zero
pub fn parse_max_ticks(n: u64) -> Result<u64> {
    if n == 0 {
        anyhow::bail!("Tick limit must be positive");
    }
    Ok(n)
}

/// Parse a tick length in milliseconds
pub fn parse_tick(s: &str) -> Result<u64> {
    let ms: u64 = s
        .trim()
        .parse()
        .with_context(|| format!("Invalid tick length: {}", s))?;
    if ms == 0 {
        anyhow::bail!("Tick length must be positive");
    }
    Ok(ms)
}
