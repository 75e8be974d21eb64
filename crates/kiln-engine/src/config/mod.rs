//! Engine configuration.
//!
//! `Config` is a plain value. Components copy what they need at initialization
//! time, so loading a new config does not retroactively touch live windows or
//! GPU objects.

mod parse;

use std::path::{Path, PathBuf};

use crate::color::{palette, Color};
use crate::logging::Verbosity;

pub use parse::DEFAULT_CONFIG_PATH;

pub const DEFAULT_WINDOW_WIDTH: u32 = 800;
pub const DEFAULT_WINDOW_HEIGHT: u32 = 800;
pub const DEFAULT_MIN_WINDOW_WIDTH: u32 = 640;
pub const DEFAULT_MIN_WINDOW_HEIGHT: u32 = 480;
pub const DEFAULT_WINDOW_TITLE: &str = "kiln";
pub const DEFAULT_BACKGROUND_COLOR: Color = palette::material_dark::BACKGROUND;
pub const DEFAULT_LOG_FILE_PATH: &str = "log.txt";
pub const DEFAULT_RESOURCES_DIRECTORY: &str = "resources/";

#[cfg(debug_assertions)]
pub const DEFAULT_VERBOSITY: Verbosity = Verbosity::Debug;
#[cfg(not(debug_assertions))]
pub const DEFAULT_VERBOSITY: Verbosity = Verbosity::Info;

pub const DEFAULT_SHOW_FPS: bool = cfg!(debug_assertions);

/// Window, logging and asset settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub window_width: u32,
    pub window_height: u32,
    pub min_window_width: u32,
    pub min_window_height: u32,
    pub window_title: String,
    pub background_color: Color,
    pub verbosity: Verbosity,
    pub log_file_path: PathBuf,
    pub show_fps: bool,
    pub start_window_maximized: bool,
    pub resources_directory: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            min_window_width: DEFAULT_MIN_WINDOW_WIDTH,
            min_window_height: DEFAULT_MIN_WINDOW_HEIGHT,
            window_title: DEFAULT_WINDOW_TITLE.to_string(),
            background_color: DEFAULT_BACKGROUND_COLOR,
            verbosity: DEFAULT_VERBOSITY,
            log_file_path: PathBuf::from(DEFAULT_LOG_FILE_PATH),
            show_fps: DEFAULT_SHOW_FPS,
            start_window_maximized: false,
            resources_directory: PathBuf::from(DEFAULT_RESOURCES_DIRECTORY),
        }
    }
}

impl Config {
    pub fn with_window_width(mut self, width: u32) -> Self {
        self.window_width = width;
        self
    }

    pub fn with_window_height(mut self, height: u32) -> Self {
        self.window_height = height;
        self
    }

    pub fn with_min_window_size(mut self, width: u32, height: u32) -> Self {
        self.min_window_width = width;
        self.min_window_height = height;
        self
    }

    pub fn with_window_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = title.into();
        self
    }

    pub fn with_background_color(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_log_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file_path = path.into();
        self
    }

    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    pub fn with_start_window_maximized(mut self, maximized: bool) -> Self {
        self.start_window_maximized = maximized;
        self
    }

    pub fn with_resources_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.resources_directory = path.into();
        self
    }

    /// Resolves `name` inside the resources directory.
    pub fn resource(&self, name: impl AsRef<Path>) -> PathBuf {
        self.resources_directory.join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = Config::default();
        assert_eq!((cfg.window_width, cfg.window_height), (800, 800));
        assert_eq!((cfg.min_window_width, cfg.min_window_height), (640, 480));
        assert_eq!(cfg.background_color.to_hex(), "#121212");
        assert!(!cfg.start_window_maximized);
        assert_eq!(cfg.resources_directory, PathBuf::from("resources/"));
    }

    #[test]
    fn builders_chain() {
        let cfg = Config::default()
            .with_window_width(1024)
            .with_window_height(768)
            .with_window_title("demo")
            .with_show_fps(false)
            .with_verbosity(Verbosity::Warning);

        assert_eq!(cfg.window_width, 1024);
        assert_eq!(cfg.window_height, 768);
        assert_eq!(cfg.window_title, "demo");
        assert!(!cfg.show_fps);
        assert_eq!(cfg.verbosity, Verbosity::Warning);
    }

    #[test]
    fn resource_paths_are_joined() {
        let cfg = Config::default().with_resources_directory("assets");
        assert_eq!(cfg.resource("teapot.obj"), PathBuf::from("assets/teapot.obj"));
    }
}
