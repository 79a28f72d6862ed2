//! We can have a little hard-coded config, [as a
//! snack](https://knowyourmeme.com/memes/cats-can-have-a-little-salami).
//! Each default can be overridden from the environment (or `.env`).

use anyhow::{Context, Result};
use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};

/// The notes file must already exist and hold at least `[]`; we never
/// create it.
pub const DEFAULT_NOTES_FILE: &str = "./notes.json";
pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub notes_file: PathBuf,
    pub addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let notes_file = lookup("NOTES_FILE")
            .unwrap_or_else(|| DEFAULT_NOTES_FILE.to_string())
            .into();
        let host = match lookup("NOTES_HOST") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("NOTES_HOST {raw:?} is not an IP"))?,
            None => DEFAULT_HOST,
        };
        let port = match lookup("NOTES_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("NOTES_PORT {raw:?} is not a port"))?,
            None => DEFAULT_PORT,
        };

        Ok(Config {
            notes_file,
            addr: SocketAddr::new(host, port),
        })
    }
}
