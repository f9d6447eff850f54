use anyhow::{ensure, Context, Result};
use std::{env, path::PathBuf};

const DEFAULT_DEVICE_URL: &str = "http://192.168.4.1";

/// Shell configuration, read from the environment once at startup
#[derive(Clone, Debug)]
pub struct ShellConfig {
    /// Address of the device serving the settings store
    pub device_url: String,

    /// Control layout replacing the built-in one
    pub layout_path: Option<PathBuf>,
}

impl ShellConfig {
    pub fn load() -> Result<Self> {
        let device_url = env::var("WIFI_PORTAL_URL").unwrap_or_else(|_| DEFAULT_DEVICE_URL.into());
        let device_url = Self::normalize_url(&device_url)
            .context("failed to parse WIFI_PORTAL_URL: invalid format")?;

        let layout_path = env::var_os("WIFI_PORTAL_LAYOUT").map(PathBuf::from);

        Ok(Self {
            device_url,
            layout_path,
        })
    }

    /// Device address without trailing slashes
    fn normalize_url(url: &str) -> Result<String> {
        let url = url.trim().trim_end_matches('/');

        ensure!(
            url.starts_with("http://") || url.starts_with("https://"),
            "'{url}' is not an http(s) address"
        );

        Ok(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_url_loses_trailing_slash() {
        assert_eq!(
            ShellConfig::normalize_url("http://192.168.4.1/").unwrap(),
            "http://192.168.4.1"
        );
    }

    #[test]
    fn device_url_requires_http_scheme() {
        let err = ShellConfig::normalize_url("192.168.4.1").unwrap_err();
        assert!(err.to_string().contains("not an http(s) address"));
    }
}
