use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// TMDB movies table (id, title, overview, genres, keywords)
    #[serde(default = "default_movies_path")]
    pub movies_path: String,

    /// TMDB credits table (title, cast, crew)
    #[serde(default = "default_credits_path")]
    pub credits_path: String,

    /// Upper bound on vocabulary size
    #[serde(default = "default_max_features")]
    pub max_features: usize,

    /// Number of similar titles returned per query
    #[serde(default = "default_recommendation_count")]
    pub recommendation_count: usize,

    /// Cap on the title list served to the UI
    #[serde(default = "default_title_list_limit")]
    pub title_list_limit: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_movies_path() -> String {
    "data/tmdb_5000_movies.csv".to_string()
}

fn default_credits_path() -> String {
    "data/tmdb_5000_credits.csv".to_string()
}

fn default_max_features() -> usize {
    5000
}

fn default_recommendation_count() -> usize {
    10
}

fn default_title_list_limit() -> usize {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            movies_path: default_movies_path(),
            credits_path: default_credits_path(),
            max_features: default_max_features(),
            recommendation_count: default_recommendation_count(),
            title_list_limit: default_title_list_limit(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Address the HTTP listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.max_features, 5000);
        assert_eq!(config.recommendation_count, 10);
        assert_eq!(config.title_list_limit, 1000);
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_from_iter_applies_overrides() {
        let vars = vec![
            ("PORT".to_string(), "8080".to_string()),
            ("MAX_FEATURES".to_string(), "250".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_features, 250);
        assert_eq!(config.movies_path, "data/tmdb_5000_movies.csv");
    }
}
