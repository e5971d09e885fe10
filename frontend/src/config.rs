//! Build-time configuration.
//!
//! Values come from environment variables present when the bundle is built
//! (`trunk build`); anything unset falls back to the defaults below.

const DEFAULT_API_URL: &str = "http://localhost:8000/api";
const DEFAULT_SEARCH_RADIUS_KM: u32 = 10;

/// How the API authenticates browser requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// Bearer token only.
    #[default]
    Bearer,
    /// Bearer token plus an anti-forgery cookie echoed as a header.
    Cookie,
}

impl AuthMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bearer" | "token" => Some(Self::Bearer),
            "cookie" | "sanctum" => Some(Self::Cookie),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// API root without a trailing slash.
    pub api_base_url: String,
    pub auth_mode: AuthMode,
    pub search_radius_km: u32,
}

impl AppConfig {
    pub fn new(api_base_url: &str) -> Self {
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            auth_mode: AuthMode::default(),
            search_radius_km: DEFAULT_SEARCH_RADIUS_KM,
        }
    }

    pub fn from_env() -> Self {
        Self::from_values(
            option_env!("FIELDSERVE_API_URL"),
            option_env!("FIELDSERVE_AUTH_MODE"),
            option_env!("FIELDSERVE_SEARCH_RADIUS_KM"),
        )
    }

    fn from_values(url: Option<&str>, auth_mode: Option<&str>, radius: Option<&str>) -> Self {
        let mut config = Self::new(url.filter(|u| !u.trim().is_empty()).unwrap_or(DEFAULT_API_URL));

        if let Some(raw) = auth_mode {
            match AuthMode::parse(raw) {
                Some(mode) => config.auth_mode = mode,
                None => log::warn!("unknown auth mode {raw:?}, using {:?}", config.auth_mode),
            }
        }

        if let Some(raw) = radius {
            match raw.trim().parse::<u32>() {
                Ok(km) if km > 0 => config.search_radius_km = km,
                _ => log::warn!(
                    "invalid search radius {raw:?}, using {} km",
                    config.search_radius_km
                ),
            }
        }

        config
    }

    #[cfg(test)]
    pub fn with_auth_mode(mut self, auth_mode: AuthMode) -> Self {
        self.auth_mode = auth_mode;
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
