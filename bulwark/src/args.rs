use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Bulwark API backend
#[derive(Debug, Parser)]
#[command(name = "bulwark", about = "JSON API backend with a single error pipeline")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "bulwark.toml", env = "BULWARK_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "BULWARK_LISTEN")]
    pub listen: Option<SocketAddr>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Serve the API (default)
    Serve,

    /// Apply SQL migrations and exit
    Migrate {
        /// Directory holding `*.sql` files, applied in file-name order
        #[arg(long, default_value = "migrations")]
        dir: PathBuf,
    },
}

impl Args {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default() {
        let args = Args::try_parse_from(["bulwark"]).unwrap();
        assert_eq!(args.command(), Command::Serve);
        assert_eq!(args.config, PathBuf::from("bulwark.toml"));
        assert!(args.listen.is_none());
    }

    #[test]
    fn migrate_takes_a_directory() {
        let args = Args::try_parse_from(["bulwark", "--config", "prod.toml", "migrate", "--dir", "db/sql"]).unwrap();
        assert_eq!(
            args.command(),
            Command::Migrate {
                dir: PathBuf::from("db/sql")
            }
        );
        assert_eq!(args.config, PathBuf::from("prod.toml"));
    }

    #[test]
    fn listen_override_parses_socket_address() {
        let args = Args::try_parse_from(["bulwark", "--listen", "127.0.0.1:8080"]).unwrap();
        assert_eq!(args.listen, Some(SocketAddr::from(([127, 0, 0, 1], 8080))));
    }
}
