use crate::refresher::MAX_REFRESH_INTERVAL;
use crate::server;
use crate::youtube_api::client::{DEFAULT_BASE_URL, DEFAULT_MAX_RESULTS};
use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::cors::CorsLayer;

/// Startup configuration. Every option can be given as a flag or through the environment.
#[derive(Parser, Debug, Clone)]
#[command(name = "yt-live-status")]
#[command(about = "Serves whether a YouTube channel is live, or its latest video, as JSON")]
pub struct Config {
    /// YouTube channel to watch
    #[arg(long, env = "CHANNEL_ID")]
    pub channel_id: String,

    /// YouTube Data API key
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Seconds between refreshes, at most a day
    #[arg(
        long,
        env = "REFRESH_INTERVAL_SECS",
        default_value = "900",
        value_parser = clap::value_parser!(u64).range(1..=MAX_REFRESH_INTERVAL.as_secs())
    )]
    pub refresh_interval_secs: u64,

    /// Value of the Access-Control-Allow-Origin response header
    #[arg(long, env = "ALLOWED_ORIGIN", default_value = "*")]
    pub allowed_origin: String,

    /// Address the HTTP server listens on
    #[arg(long = "listen", env = "LISTEN_ADDR", default_value = "0.0.0.0:3000")]
    pub listen_addr: SocketAddr,

    /// Timeout in seconds for each request to the YouTube API
    #[arg(
        long,
        env = "REQUEST_TIMEOUT_SECS",
        default_value = "10",
        value_parser = clap::value_parser!(u64).range(1..=300)
    )]
    pub request_timeout_secs: u64,

    /// Root of the YouTube Data API
    #[arg(long, env = "YOUTUBE_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub api_base_url: String,

    /// Origin sent along with search requests, for referrer-restricted API keys
    #[arg(long, env = "YOUTUBE_API_ORIGIN")]
    pub api_origin: Option<String>,

    /// Number of recent videos to inspect per refresh
    #[arg(
        long,
        env = "SEARCH_MAX_RESULTS",
        default_value_t = DEFAULT_MAX_RESULTS,
        value_parser = clap::value_parser!(u32).range(1..=50)
    )]
    pub max_results: u32,
}

impl Config {
    /// Loads `.env` from the working directory or one of its parents, if there is one, then
    /// parses flags with the environment as fallback. Variables already set win over the file.
    pub fn load() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded environment file"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(error = %e, "failed to read environment file"),
        }
        Self::parse()
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn cors(&self) -> eyre::Result<CorsLayer> {
        server::cors_layer(&self.allowed_origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, FromArgMatches};
    use pretty_assertions::assert_eq;

    /// Parses flags only, so variables exported in the developer's shell don't leak in.
    fn parse(args: &[&str]) -> Result<Config, clap::Error> {
        let matches = Config::command()
            .mut_args(|arg| arg.env(None::<&'static str>))
            .try_get_matches_from(std::iter::once("yt-live-status").chain(args.iter().copied()))?;
        Config::from_arg_matches(&matches)
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["--channel-id", "UC1", "--api-key", "k"]).unwrap();
        assert_eq!(config.channel_id, "UC1");
        assert_eq!(config.refresh_interval(), Duration::from_secs(15 * 60));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.listen_addr, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.api_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api_origin, None);
        assert_eq!(config.max_results, 5);
        assert_eq!(config.allowed_origin, "*");
        assert!(config.cors().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = parse(&[
            "--channel-id",
            "UC1",
            "--api-key",
            "k",
            "--refresh-interval-secs",
            "5",
            "--allowed-origin",
            "https://example.github.io",
            "--listen",
            "127.0.0.1:8080",
            "--max-results",
            "50",
        ])
        .unwrap();
        assert_eq!(config.refresh_interval(), Duration::from_secs(5));
        assert_eq!(config.listen_addr, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.max_results, 50);
        assert_eq!(config.allowed_origin, "https://example.github.io");
        assert!(config.cors().is_ok());
    }

    #[test]
    fn test_required_values_missing() {
        assert!(parse(&["--channel-id", "UC1"]).is_err());
        assert!(parse(&["--api-key", "k"]).is_err());
    }

    #[test]
    fn test_rejects_zero_interval() {
        let err = parse(&[
            "--channel-id",
            "UC1",
            "--api-key",
            "k",
            "--refresh-interval-secs",
            "0",
        ]);
        assert!(err.is_err());
    }

    #[test]
    fn test_interval_upper_bound() {
        let args = |secs: &'static str| {
            [
                "--channel-id",
                "UC1",
                "--api-key",
                "k",
                "--refresh-interval-secs",
                secs,
            ]
        };
        let config = parse(&args("86400")).unwrap();
        assert_eq!(config.refresh_interval(), MAX_REFRESH_INTERVAL);
        assert!(parse(&args("86401")).is_err());
        assert!(parse(&args("18446744073709551615")).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_page_size() {
        let err = parse(&["--channel-id", "UC1", "--api-key", "k", "--max-results", "51"]);
        assert!(err.is_err());
    }

    #[test]
    fn test_invalid_origin_is_rejected() {
        let config = parse(&[
            "--channel-id",
            "UC1",
            "--api-key",
            "k",
            "--allowed-origin",
            "bad\norigin",
        ])
        .unwrap();
        assert!(config.cors().is_err());
    }

    #[test]
    fn test_env_file_fills_in_missing_flags() {
        let path = std::env::temp_dir().join(format!("yt-live-status-{}.env", std::process::id()));
        std::fs::write(
            &path,
            "CHANNEL_ID=UCfromfile\nAPI_KEY=filekey\nREFRESH_INTERVAL_SECS=60\n",
        )
        .unwrap();
        // the other tests here ignore the environment, so overriding it is contained
        dotenvy::from_path_override(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let config = Config::try_parse_from(["yt-live-status", "--channel-id", "UCflag"]).unwrap();
        assert_eq!(config.channel_id, "UCflag");
        assert_eq!(config.api_key, "filekey");
        assert_eq!(config.refresh_interval(), Duration::from_secs(60));
    }
}
