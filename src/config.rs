//! Options parsing and the immutable runtime configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reading direction of the slider, fixed at initialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    /// Parse a user-supplied direction string. Anything other than `"rtl"`
    /// or `"ltr"` is corrected to `Ltr` with a diagnostic warning.
    pub fn parse(value: &str) -> Self {
        match value {
            "ltr" => Direction::Ltr,
            "rtl" => Direction::Rtl,
            other => {
                log::warn!("unknown direction {other:?}, falling back to ltr");
                Direction::Ltr
            }
        }
    }

    pub fn is_rtl(self) -> bool {
        matches!(self, Direction::Rtl)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }
}

/// Conditions that abort initialization. No partial controller is ever
/// returned to the host when one of these fires.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("slider root not found for selector {0:?}")]
    MissingRoot(String),
    #[error("slider track not found for selector {0:?}")]
    MissingTrack(String),
    #[error("no slides matched selector {0:?}")]
    NoSlides(String),
    #[error("invalid slider options: {0}")]
    BadOptions(String),
}

/// Raw options as they arrive over the wasm boundary (camelCase JSON).
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    pub selector: String,
    pub track_selector: String,
    pub slide_selector: String,
    pub dots_selector: String,
    pub prev_selector: String,
    pub next_selector: String,
    pub toggle_selector: String,
    pub speed: u32,
    pub delay: u32,
    #[serde(rename = "loop")]
    pub loop_: bool,
    pub infinite: bool,
    pub autoplay: bool,
    pub pause_on_hover: bool,
    pub easing: String,
    pub direction: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            selector: String::new(),
            track_selector: ".slider-track".into(),
            slide_selector: ".slider-slide".into(),
            dots_selector: ".slider-dots".into(),
            prev_selector: ".slider-prev".into(),
            next_selector: ".slider-next".into(),
            toggle_selector: ".slider-toggle".into(),
            speed: 500,
            delay: 2000,
            loop_: true,
            infinite: false,
            autoplay: true,
            pause_on_hover: true,
            easing: "ease".into(),
            direction: "ltr".into(),
        }
    }
}

impl Options {
    // serde(default) eats a missing `loop` key, so `selector` presence is
    // checked separately rather than via a deserialization failure.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let opts: Options =
            serde_json::from_str(json).map_err(|e| ConfigError::BadOptions(e.to_string()))?;
        if opts.selector.is_empty() {
            return Err(ConfigError::BadOptions("`selector` is required".into()));
        }
        Ok(opts)
    }

    pub fn into_config(self) -> SliderConfig {
        SliderConfig {
            speed: self.speed,
            delay: self.delay,
            // infinite takes precedence over loop when both are set
            loop_: self.loop_ && !self.infinite,
            infinite: self.infinite,
            autoplay: self.autoplay,
            pause_on_hover: self.pause_on_hover,
            easing: self.easing,
            direction: Direction::parse(&self.direction),
        }
    }
}

/// Validated behavioural configuration consumed by the engine. Selectors stay
/// behind in [`Options`]; they only matter to the DOM shell during discovery.
#[derive(Clone, Debug)]
pub struct SliderConfig {
    pub speed: u32,
    pub delay: u32,
    pub loop_: bool,
    pub infinite: bool,
    pub autoplay: bool,
    pub pause_on_hover: bool,
    pub easing: String,
    pub direction: Direction,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Options::default().into_config()
    }
}

impl SliderConfig {
    /// Autoplay period: the configured delay (floored so a zero delay cannot
    /// spin the timer) plus the transition time itself.
    pub fn autoplay_period_ms(&self) -> u32 {
        self.delay.max(200) + self.speed
    }

    /// Grace added on top of `speed` before the settle fallback fires.
    pub fn settle_fallback_ms(&self) -> u32 {
        self.speed + 160
    }
}
