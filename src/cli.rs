use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::{parse_max_ticks, parse_tick, Options};
use crate::logging::LogLevel;

/// Play a scripted conversation in the terminal
#[derive(Parser, Debug, Default)]
#[command(name = "dlgsession")]
#[command(version = "0.1.0")]
#[command(about = "Run a dialogue session from a message catalog and script book", long_about = None)]
pub struct Cli {
    /// Message catalog (ID = text, ID.time = ms)
    #[arg(short, long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Script book with the dialogue infos
    #[arg(short, long, value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// Config file (game.animatedWindows, game.tickMs, log.level, ...)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Choice index to take at each menu (can be repeated or comma separated)
    #[arg(long, value_name = "INDEX", value_delimiter = ',')]
    pub choose: Vec<usize>,

    /// Tick length in milliseconds
    #[arg(short, long, value_name = "MS")]
    pub tick: Option<String>,

    /// Disable dialogue box animations
    #[arg(long = "no-animation")]
    pub no_animation: bool,

    /// Give up after this many ticks
    #[arg(long, value_name = "N")]
    pub max_ticks: Option<u64>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(short, long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Name of the player actor
    #[arg(long, value_name = "NAME")]
    pub player: Option<String>,

    /// Name of the actor to talk to
    #[arg(long, value_name = "NAME")]
    pub npc: Option<String>,

    /// The player talks to itself through an interactive object
    #[arg(short, long)]
    pub monologue: bool,
}

impl Cli {
    /// Merge CLI arguments into the options struct
    pub fn merge_into_options(&self, mut opts: Options) -> Result<Options> {
        if let Some(ref catalog) = self.catalog {
            opts.catalog = Some(catalog.display().to_string());
        }

        if let Some(ref script) = self.script {
            opts.script = Some(script.display().to_string());
        }

        if !self.choose.is_empty() {
            opts.choices = self.choose.clone();
        }

        if let Some(ref tick) = self.tick {
            opts.tick_ms = parse_tick(tick)?;
        }

        if self.no_animation {
            opts.animated_windows = false;
        }

        if let Some(max_ticks) = self.max_ticks {
            opts.max_ticks = parse_max_ticks(max_ticks)?;
        }

        if let Some(ref level) = self.log_level {
            opts.log_level = level
                .parse::<LogLevel>()
                .context("Invalid log level")?;
        }

        if let Some(ref player) = self.player {
            opts.player = player.clone();
        }

        if let Some(ref npc) = self.npc {
            opts.npc = npc.clone();
        }

        if self.monologue {
            opts.monologue = true;
        }

        Ok(opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let cli = Cli::try_parse_from([
            "dlgsession",
            "--catalog",
            "msg.txt",
            "--script",
            "book.txt",
            "--choose",
            "1,0",
            "--choose",
            "2",
            "--no-animation",
        ])
        .unwrap();
        assert_eq!(cli.catalog, Some(PathBuf::from("msg.txt")));
        assert_eq!(cli.choose, vec![1, 0, 2]);
        assert!(cli.no_animation);
    }

    #[test]
    fn test_merge_basic_options() {
        let cli = Cli {
            tick: Some("20".to_string()),
            no_animation: true,
            choose: vec![1],
            npc: Some("Guard".to_string()),
            ..Default::default()
        };

        let opts = cli.merge_into_options(Options::default()).unwrap();
        assert_eq!(opts.tick_ms, 20);
        assert!(!opts.animated_windows);
        assert_eq!(opts.choices, vec![1]);
        assert_eq!(opts.npc, "Guard");
        assert_eq!(opts.player, "Hero");
    }

    #[test]
    fn test_cli_keeps_config_values() {
        let config = Options {
            tick_ms: 33,
            log_level: LogLevel::Debug,
            ..Default::default()
        };
        let opts = Cli::default().merge_into_options(config.clone()).unwrap();
        assert_eq!(opts, config);
    }

    #[test]
    fn test_invalid_tick() {
        let cli = Cli {
            tick: Some("soon".to_string()),
            ..Default::default()
        };
        assert!(cli.merge_into_options(Options::default()).is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let cli = Cli {
            log_level: Some("loud".to_string()),
            ..Default::default()
        };
        assert!(cli.merge_into_options(Options::default()).is_err());
    }

    #[test]
    fn test_zero_tick_limit() {
        let cli = Cli {
            max_ticks: Some(0),
            ..Default::default()
        };
        assert!(cli.merge_into_options(Options::default()).is_err());
    }
}
