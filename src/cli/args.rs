//! CLI argument definitions using clap derive

use crate::cache::BuildCacheKey;
use crate::config::{BackendKind, Config};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// buildcache - Build output cache
///
/// Loads and stores build outputs in a local or remote cache, keyed by
/// content fingerprints.
#[derive(Parser, Debug)]
#[command(name = "buildcache")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "BUILDCACHE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Cache backend (overrides cache.backend)
    #[arg(long, global = true, value_enum)]
    pub backend: Option<BackendKind>,

    /// Local cache directory (overrides cache.directory)
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Remote cache URL (overrides cache.url)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Treat the cache as read-only for this build
    #[arg(long, global = true)]
    pub no_push: bool,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(backend) = self.backend {
            config.cache.backend = backend;
        }
        if let Some(ref dir) = self.cache_dir {
            config.cache.directory = dir.clone();
        }
        if let Some(ref url) = self.url {
            config.cache.url = Some(url.clone());
        }
        if self.no_push {
            config.cache.push = false;
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a cache entry
    Load(LoadArgs),

    /// Store a file as a cache entry
    Store(StoreArgs),

    /// Show which cache service is in use
    Describe,

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// Arguments for the load command
#[derive(Parser, Debug)]
pub struct LoadArgs {
    /// Cache key
    pub key: BuildCacheKey,

    /// Write the entry to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the store command
#[derive(Parser, Debug)]
pub struct StoreArgs {
    /// Cache key
    pub key: BuildCacheKey,

    /// File holding the entry contents
    pub file: PathBuf,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Print the config file path
    Path,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_load() {
        let cli = Cli::parse_from(["buildcache", "load", "abc123", "-o", "out.bin"]);
        match cli.command {
            Commands::Load(args) => {
                assert_eq!(args.key.hash_code(), "abc123");
                assert_eq!(args.output, Some(PathBuf::from("out.bin")));
            }
            _ => panic!("expected Load command"),
        }
    }

    #[test]
    fn cli_parses_store() {
        let cli = Cli::parse_from(["buildcache", "store", "abc123", "app.jar"]);
        match cli.command {
            Commands::Store(args) => {
                assert_eq!(args.key.hash_code(), "abc123");
                assert_eq!(args.file, PathBuf::from("app.jar"));
            }
            _ => panic!("expected Store command"),
        }
    }

    #[test]
    fn cli_rejects_bad_key() {
        assert!(Cli::try_parse_from(["buildcache", "load", "../etc"]).is_err());
    }

    #[test]
    fn cli_verbose_levels() {
        let cli = Cli::parse_from(["buildcache", "describe"]);
        assert_eq!(cli.verbose, 0);

        let cli = Cli::parse_from(["buildcache", "-vv", "describe"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn overrides_apply() {
        let cli = Cli::parse_from([
            "buildcache",
            "--backend",
            "http",
            "--url",
            "https://cache.example.com",
            "--no-push",
            "describe",
        ]);
        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.cache.backend, BackendKind::Http);
        assert_eq!(config.cache.url.as_deref(), Some("https://cache.example.com"));
        assert!(!config.cache.push);
    }

    #[test]
    fn no_overrides_keep_config() {
        let cli = Cli::parse_from(["buildcache", "describe"]);
        let mut config = Config::default();
        config.cache.push = true;
        cli.apply_overrides(&mut config);

        assert!(config.cache.push);
        assert_eq!(config.cache.backend, BackendKind::Directory);
    }
}
