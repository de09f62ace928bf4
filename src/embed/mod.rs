//! Resources compiled into the binary.
//!
//! The only one is the live-reload client served to browsers in develop
//! mode. It is minified at build time (see `build.rs`) and its WebSocket
//! port is filled in per request.

mod template;

pub use template::{Template, TemplateVars};

pub mod serve {
    use super::{Template, TemplateVars};

    /// Variables for livereload.js.
    pub struct LivereloadVars {
        pub ws_port: u16,
    }

    impl TemplateVars for LivereloadVars {
        fn pairs(&self) -> Vec<(&'static str, String)> {
            vec![("__ASSETLINE_WS_PORT__", self.ws_port.to_string())]
        }
    }

    /// Live-reload client, minified.
    pub const LIVERELOAD_JS: Template<LivereloadVars> =
        Template::new(include_str!(concat!(env!("OUT_DIR"), "/livereload.min.js")));

    /// URL the dev server answers with the client script. Never collides
    /// with an output file.
    pub const LIVERELOAD_URL: &str = "/__assetline/livereload.js";

    /// Tag injected into served HTML pages.
    pub fn script_tag() -> String {
        format!(r#"<script src="{LIVERELOAD_URL}"></script>"#)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_render_fills_port() {
            let js = LIVERELOAD_JS.render(&LivereloadVars { ws_port: 35730 });
            assert!(js.contains("35730"));
            assert!(!js.contains("__ASSETLINE_WS_PORT__"));
        }

        #[test]
        fn test_minified_client_keeps_port_marker() {
            let vars = LivereloadVars { ws_port: 1 };
            assert!(LIVERELOAD_JS.missing_markers(&vars).is_empty());
        }

        #[test]
        fn test_script_tag() {
            assert_eq!(script_tag(), r#"<script src="/__assetline/livereload.js"></script>"#);
        }
    }
}
