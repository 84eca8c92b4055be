use std::time::Duration;

use medview_core::{BlankPolicy, EndpointConfig, IdPolicy, NormalizeOptions};

use crate::cli::Cli;

/// Endpoint settings, resolved in order:
/// 1. command-line flags
/// 2. environment (including `.env`)
/// 3. built-in defaults
pub fn resolve_endpoint(cli: &Cli) -> medview_core::Result<EndpointConfig> {
    let mut cfg = EndpointConfig::from_env()?;
    if let Some(url) = &cli.base_url {
        cfg = cfg.with_base_url(url)?;
    }
    if let Some(secs) = cli.timeout {
        cfg = cfg.with_timeout(Duration::from_secs(secs))?;
    }
    if cli.insecure {
        cfg = cfg.with_verify_tls(false);
    }
    Ok(cfg)
}

pub fn id_policy(cli: &Cli) -> IdPolicy {
    if cli.lenient_ids {
        IdPolicy::Lenient
    } else {
        IdPolicy::Strict
    }
}

pub fn normalize_options(cli: &Cli) -> NormalizeOptions {
    let mut options = NormalizeOptions::default();
    if cli.keep_placeholder {
        options.placeholder = None;
    }
    if cli.no_truncate {
        options.truncate_at = None;
    }
    if cli.omit_blank {
        options.blank_policy = BlankPolicy::Omit;
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_flags_map_to_options() {
        let cli = Cli::parse_from([
            "medview",
            "--lenient-ids",
            "--keep-placeholder",
            "--omit-blank",
            "fetch",
            "A-1",
        ]);
        assert_eq!(id_policy(&cli), IdPolicy::Lenient);
        let options = normalize_options(&cli);
        assert_eq!(options.placeholder, None);
        assert_eq!(options.truncate_at, Some(100));
        assert_eq!(options.blank_policy, BlankPolicy::Omit);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["medview", "fetch"]);
        assert_eq!(id_policy(&cli), IdPolicy::Strict);
        assert_eq!(normalize_options(&cli), NormalizeOptions::default());
    }
}
