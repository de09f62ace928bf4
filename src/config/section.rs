//! Configuration section definitions.
//!
//! | Struct          | TOML Section | Purpose                                 |
//! |-----------------|--------------|-----------------------------------------|
//! | `PathsConfig`   | `[paths]`    | Source and output roots                 |
//! | `ServeConfig`   | `[serve]`    | Development server and reload socket    |
//! | `StylesConfig`  | `[styles]`   | Autoprefixer targets, bundle filename   |
//! | `ScriptsConfig` | `[scripts]`  | Transpile target                        |
//! | `ImagesConfig`  | `[images]`   | Lossy encoder settings                  |

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// `[paths]` section.
///
/// ```toml
/// [paths]
/// src = "src"     # source tree, relative to the project root
/// dist = "dist"   # output tree, wiped by `assetline build`
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub src: PathBuf,
    pub dist: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            src: PathBuf::from("src"),
            dist: PathBuf::from("dist"),
        }
    }
}

/// `[serve]` section.
///
/// ```toml
/// [serve]
/// interface = "127.0.0.1"   # 0.0.0.0 to expose on the LAN
/// port = 3000               # HTTP port
/// ws_port = 35729           # live-reload WebSocket port
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    pub interface: IpAddr,
    pub port: u16,
    pub ws_port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 3000,
            ws_port: 35729,
        }
    }
}

/// `[styles]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StylesConfig {
    /// Browserslist queries used for vendor prefixing.
    pub browsers: Vec<String>,
    /// Filename of the concatenated stylesheet.
    pub bundle: String,
}

impl Default for StylesConfig {
    fn default() -> Self {
        Self {
            browsers: vec!["last 10 versions".to_string()],
            bundle: "main.min.css".to_string(),
        }
    }
}

/// `[scripts]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptsConfig {
    /// Lowest ECMAScript version the output must run on.
    pub target: String,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            target: "es2015".to_string(),
        }
    }
}

/// `[images]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// JPEG quality, 1..=100.
    pub jpeg_quality: u8,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self { jpeg_quality: 75 }
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");

        assert_eq!(config.paths.src.to_str(), Some("src"));
        assert_eq!(config.paths.dist.to_str(), Some("dist"));
        assert_eq!(
            config.serve.interface,
            IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
        );
        assert_eq!(config.serve.port, 3000);
        assert_eq!(config.serve.ws_port, 35729);
        assert_eq!(config.styles.browsers, vec!["last 10 versions"]);
        assert_eq!(config.styles.bundle, "main.min.css");
        assert_eq!(config.scripts.target, "es2015");
        assert_eq!(config.images.jpeg_quality, 75);
    }

    #[test]
    fn test_serve_partial_override() {
        let config = test_parse_config("[serve]\nport = 8080");

        assert_eq!(config.serve.port, 8080);
        // untouched fields keep their defaults
        assert_eq!(config.serve.ws_port, 35729);
        assert_eq!(
            config.serve.interface,
            IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
        );
    }

    #[test]
    fn test_paths_override() {
        let config = test_parse_config("[paths]\nsrc = \"assets\"\ndist = \"public\"");
        assert_eq!(config.paths.src.to_str(), Some("assets"));
        assert_eq!(config.paths.dist.to_str(), Some("public"));
    }

    #[test]
    fn test_styles_browsers_override() {
        let config = test_parse_config("[styles]\nbrowsers = [\"defaults\", \"not dead\"]");
        assert_eq!(config.styles.browsers, vec!["defaults", "not dead"]);
        assert_eq!(config.styles.bundle, "main.min.css");
    }
}
