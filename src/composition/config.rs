//! Render configuration: canvas, frame rate, fonts, narration, labels and the visual theme.
//!
//! Every field has a default reproducing the stock purple reel, and every section is
//! `#[serde(default)]`, so a JSON config only needs to name what it overrides.

use std::{io::Read, path::Path};

use anyhow::Context;

use crate::animation::spring::SpringConfig;
use crate::foundation::color::Color;
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};

/// Complete render configuration for one reel.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ReelConfig {
    /// Output size in pixels.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// Font files.
    pub fonts: FontConfig,
    /// Narration track. `null` renders a silent video.
    pub narration: Option<NarrationConfig>,
    /// Indicator labels per segment kind.
    pub labels: SegmentLabels,
    /// Visual constants.
    pub theme: Theme,
}

impl Default for ReelConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            fps: Fps::default(),
            fonts: FontConfig::default(),
            narration: Some(NarrationConfig::default()),
            labels: SegmentLabels::default(),
            theme: Theme::default(),
        }
    }
}

impl ReelConfig {
    /// Parse a config from JSON.
    pub fn from_reader(reader: impl Read) -> ReelResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Read and parse a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("open config '{}'", path.display()))?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Pretty JSON form.
    pub fn to_json_pretty(&self) -> ReelResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that the config can drive a render.
    pub fn validate(&self) -> ReelResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ReelError::validation("canvas width/height must be > 0"));
        }
        if self.canvas.width % 2 != 0 || self.canvas.height % 2 != 0 {
            return Err(ReelError::validation(format!(
                "canvas {}x{} must have even dimensions (yuv420p output)",
                self.canvas.width, self.canvas.height
            )));
        }
        // Re-run the constructor checks; `Fps` fields are public.
        Fps::new(self.fps.num, self.fps.den)?;

        if self.fonts.words.trim().is_empty() {
            return Err(ReelError::validation("fonts.words must be non-empty"));
        }
        if let Some(label) = &self.fonts.label
            && label.trim().is_empty()
        {
            return Err(ReelError::validation(
                "fonts.label must be non-empty when set",
            ));
        }

        if let Some(n) = &self.narration {
            n.validate()?;
        }
        if self.labels.hook.trim().is_empty() || self.labels.cta.trim().is_empty() {
            return Err(ReelError::validation(
                "labels.hook and labels.cta must be non-empty",
            ));
        }
        self.theme.validate()
    }
}

/// Font files, relative to the assets root.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Font used for the karaoke words.
    pub words: String,
    /// Font for the segment indicator. Falls back to [`FontConfig::words`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            words: "fonts/Inter-Black.ttf".to_owned(),
            label: None,
        }
    }
}

impl FontConfig {
    /// Path of the font used for `role`.
    pub fn source_for(&self, role: FontRole) -> &str {
        match role {
            FontRole::Words => &self.words,
            FontRole::Label => self.label.as_deref().unwrap_or(&self.words),
        }
    }
}

/// Narration audio placed under the video.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct NarrationConfig {
    /// Audio file, relative to the assets root.
    pub source: String,
    /// Seconds skipped at the start of the source.
    pub trim_start_sec: f64,
    /// Volume multiplier.
    pub volume: f64,
    /// Frame at which the narration starts playing.
    pub offset_frames: u64,
    /// Fade-in duration in seconds.
    pub fade_in_sec: f64,
    /// Fade-out duration in seconds, ending at the video end.
    pub fade_out_sec: f64,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            source: "narration.mp3".to_owned(),
            trim_start_sec: 0.0,
            volume: 1.0,
            offset_frames: 0,
            fade_in_sec: 0.0,
            fade_out_sec: 0.0,
        }
    }
}

impl NarrationConfig {
    fn validate(&self) -> ReelResult<()> {
        if self.source.trim().is_empty() {
            return Err(ReelError::validation("narration.source must be non-empty"));
        }
        for (name, v) in [
            ("trim_start_sec", self.trim_start_sec),
            ("volume", self.volume),
            ("fade_in_sec", self.fade_in_sec),
            ("fade_out_sec", self.fade_out_sec),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(ReelError::validation(format!(
                    "narration.{name} must be finite and >= 0, got {v}"
                )));
            }
        }
        Ok(())
    }
}

/// Indicator labels for each segment kind.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SegmentLabels {
    /// Label of the opening segment.
    pub hook: String,
    /// Body part `i` (0-based) is labeled `"{body_prefix} {i + 1}"`.
    pub body_prefix: String,
    /// Label of the closing segment.
    pub cta: String,
}

impl Default for SegmentLabels {
    fn default() -> Self {
        Self {
            hook: "HOOK".to_owned(),
            body_prefix: "PARTE".to_owned(),
            cta: "CTA".to_owned(),
        }
    }
}

impl SegmentLabels {
    /// Label of body part `index` (0-based).
    pub fn body(&self, index: usize) -> String {
        format!("{} {}", self.body_prefix, index + 1)
    }
}

/// Which configured font a piece of text uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontRole {
    /// [`FontConfig::words`].
    Words,
    /// [`FontConfig::label`].
    Label,
}

/// Typography shared by measurement and drawing.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextStyle {
    /// Font used.
    pub font: FontRole,
    /// Font size in pixels.
    pub size_px: f64,
    /// Extra advance after every character, in pixels.
    #[serde(default)]
    pub letter_spacing: f64,
    /// Display text uppercased.
    #[serde(default)]
    pub uppercase: bool,
}

impl TextStyle {
    /// Apply the case transform.
    pub fn display_text(&self, text: &str) -> String {
        if self.uppercase {
            text.to_uppercase()
        } else {
            text.to_owned()
        }
    }

    fn validate(&self, name: &str) -> ReelResult<()> {
        if !self.size_px.is_finite() || self.size_px <= 0.0 {
            return Err(ReelError::validation(format!(
                "{name}.size_px must be finite and > 0"
            )));
        }
        if !self.letter_spacing.is_finite() {
            return Err(ReelError::validation(format!(
                "{name}.letter_spacing must be finite"
            )));
        }
        Ok(())
    }
}

/// CSS-like box/text shadow: offset, blur radius and color.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Shadow {
    /// Horizontal offset in pixels.
    #[serde(default)]
    pub offset_x: f64,
    /// Vertical offset in pixels.
    #[serde(default)]
    pub offset_y: f64,
    /// Blur radius in pixels. The Gaussian sigma is half of it.
    pub blur: f64,
    /// Shadow color.
    pub color: Color,
}

impl Shadow {
    fn validate(&self, name: &str) -> ReelResult<()> {
        if !self.blur.is_finite() || self.blur < 0.0 {
            return Err(ReelError::validation(format!(
                "{name}.blur must be finite and >= 0"
            )));
        }
        if !self.offset_x.is_finite() || !self.offset_y.is_finite() {
            return Err(ReelError::validation(format!(
                "{name} offsets must be finite"
            )));
        }
        Ok(())
    }
}

/// Visual constants of the reel.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Animated background.
    pub background: BackgroundStyle,
    /// Karaoke words.
    pub words: WordStyle,
    /// Segment indicator pill.
    pub indicator: IndicatorStyle,
    /// Progress bar.
    pub progress: ProgressStyle,
    /// Draw blurred shadows and glows.
    pub shadows: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: BackgroundStyle::default(),
            words: WordStyle::default(),
            indicator: IndicatorStyle::default(),
            progress: ProgressStyle::default(),
            shadows: true,
        }
    }
}

impl Theme {
    fn validate(&self) -> ReelResult<()> {
        self.background.validate()?;
        self.words.validate()?;
        self.indicator.validate()?;
        self.progress.validate()
    }
}

/// Gradient color stop.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GradientStop {
    /// Position along the gradient line, `[0, 1]`.
    pub offset: f64,
    /// Stop color.
    pub color: Color,
}

/// Linear gradient plus a slowly bobbing radial glow.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BackgroundStyle {
    /// CSS gradient angle: 0 points up, 90 points right.
    pub angle_deg: f64,
    /// Gradient stops, sorted by offset.
    pub stops: Vec<GradientStop>,
    /// Glow color at its center.
    pub glow_color: Color,
    /// Glow radius as a percentage of the farthest-corner distance.
    pub glow_radius_pct: f64,
    /// Horizontal glow center, percent of width.
    pub glow_center_x_pct: f64,
    /// Resting vertical glow center, percent of height.
    pub glow_base_y_pct: f64,
    /// Vertical swing of the glow center, percent of height.
    pub glow_amplitude_pct: f64,
    /// Frames per radian of the glow swing.
    pub glow_period_frames: f64,
}

impl Default for BackgroundStyle {
    fn default() -> Self {
        let dark = Color::from_rgb8_alpha(0x0a, 0x0a, 0x0a, 1.0);
        Self {
            angle_deg: 135.0,
            stops: vec![
                GradientStop {
                    offset: 0.0,
                    color: dark,
                },
                GradientStop {
                    offset: 0.5,
                    color: Color::from_rgb8_alpha(0x1a, 0x0a, 0x2e, 1.0),
                },
                GradientStop {
                    offset: 1.0,
                    color: dark,
                },
            ],
            glow_color: Color::from_rgb8_alpha(138, 43, 226, 0.15),
            glow_radius_pct: 50.0,
            glow_center_x_pct: 50.0,
            glow_base_y_pct: 30.0,
            glow_amplitude_pct: 10.0,
            glow_period_frames: 30.0,
        }
    }
}

impl BackgroundStyle {
    fn validate(&self) -> ReelResult<()> {
        if self.stops.is_empty() {
            return Err(ReelError::validation(
                "theme.background.stops must be non-empty",
            ));
        }
        let mut prev = f64::NEG_INFINITY;
        for s in &self.stops {
            if !(0.0..=1.0).contains(&s.offset) || s.offset < prev {
                return Err(ReelError::validation(
                    "theme.background.stops offsets must be sorted within [0, 1]",
                ));
            }
            prev = s.offset;
        }
        if !self.glow_period_frames.is_finite() || self.glow_period_frames <= 0.0 {
            return Err(ReelError::validation(
                "theme.background.glow_period_frames must be > 0",
            ));
        }
        if !self.glow_radius_pct.is_finite() || self.glow_radius_pct < 0.0 {
            return Err(ReelError::validation(
                "theme.background.glow_radius_pct must be >= 0",
            ));
        }
        Ok(())
    }
}

/// Karaoke word typography, timing and container layout.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WordStyle {
    /// Word typography.
    pub text: TextStyle,
    /// Color once a word has been reached.
    pub active_color: Color,
    /// Color before a word is reached.
    pub inactive_color: Color,
    /// Opacity before a word is reached.
    pub inactive_opacity: f64,
    /// Frames over which opacity ramps up before a word starts.
    pub fade_in_frames: f64,
    /// Extra scale of the current word at rest (`0.15` means 115%).
    pub emphasis_scale: f64,
    /// Spring driving the current word's pop.
    pub spring: SpringConfig,
    /// Gap between words, both axes.
    pub gap: f64,
    /// Padding of the word container.
    pub padding: f64,
    /// Maximum width of the word container's content box (padding is added outside).
    pub max_width: f64,
    /// Drop shadow on every word.
    pub shadow: Shadow,
    /// Extra glow on the current word.
    pub glow: Shadow,
}

impl Default for WordStyle {
    fn default() -> Self {
        Self {
            text: TextStyle {
                font: FontRole::Words,
                size_px: 72.0,
                letter_spacing: 2.0,
                uppercase: true,
            },
            active_color: Color::rgba(1.0, 1.0, 1.0, 1.0),
            inactive_color: Color::from_rgb8_alpha(0x66, 0x66, 0x66, 1.0),
            inactive_opacity: 0.3,
            fade_in_frames: 5.0,
            emphasis_scale: 0.15,
            spring: SpringConfig {
                damping: 12.0,
                stiffness: 200.0,
                ..SpringConfig::default()
            },
            gap: 12.0,
            padding: 40.0,
            max_width: 900.0,
            shadow: Shadow {
                offset_x: 0.0,
                offset_y: 4.0,
                blur: 20.0,
                color: Color::rgba(0.0, 0.0, 0.0, 0.5),
            },
            glow: Shadow {
                offset_x: 0.0,
                offset_y: 0.0,
                blur: 40.0,
                color: Color::from_rgb8_alpha(138, 43, 226, 0.8),
            },
        }
    }
}

impl WordStyle {
    fn validate(&self) -> ReelResult<()> {
        self.text.validate("theme.words.text")?;
        self.spring.validate()?;
        self.shadow.validate("theme.words.shadow")?;
        self.glow.validate("theme.words.glow")?;
        if !(0.0..=1.0).contains(&self.inactive_opacity) {
            return Err(ReelError::validation(
                "theme.words.inactive_opacity must be within [0, 1]",
            ));
        }
        if !self.fade_in_frames.is_finite() || self.fade_in_frames <= 0.0 {
            return Err(ReelError::validation(
                "theme.words.fade_in_frames must be > 0",
            ));
        }
        for (name, v) in [
            ("emphasis_scale", self.emphasis_scale),
            ("gap", self.gap),
            ("padding", self.padding),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(ReelError::validation(format!(
                    "theme.words.{name} must be finite and >= 0"
                )));
            }
        }
        if !self.max_width.is_finite() || self.max_width <= 2.0 * self.padding {
            return Err(ReelError::validation(
                "theme.words.max_width must exceed twice the padding",
            ));
        }
        Ok(())
    }
}

/// Segment indicator pill in the top-left corner.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct IndicatorStyle {
    /// Distance from the top edge.
    pub top: f64,
    /// Distance from the left edge.
    pub left: f64,
    /// Vertical padding.
    pub padding_y: f64,
    /// Horizontal padding.
    pub padding_x: f64,
    /// Corner radius.
    pub radius: f64,
    /// Label typography.
    pub text: TextStyle,
    /// Label color.
    pub text_color: Color,
    /// Pill fill when active.
    pub active_background: Color,
    /// Pill fill when inactive.
    pub inactive_background: Color,
}

impl Default for IndicatorStyle {
    fn default() -> Self {
        Self {
            top: 60.0,
            left: 40.0,
            padding_y: 12.0,
            padding_x: 24.0,
            radius: 8.0,
            text: TextStyle {
                font: FontRole::Label,
                size_px: 24.0,
                letter_spacing: 3.0,
                uppercase: true,
            },
            text_color: Color::rgba(1.0, 1.0, 1.0, 1.0),
            active_background: Color::from_rgb8_alpha(0x8a, 0x2b, 0xe2, 1.0),
            inactive_background: Color::rgba(0.0, 0.0, 0.0, 0.5),
        }
    }
}

impl IndicatorStyle {
    fn validate(&self) -> ReelResult<()> {
        self.text.validate("theme.indicator.text")?;
        for (name, v) in [
            ("top", self.top),
            ("left", self.left),
            ("padding_y", self.padding_y),
            ("padding_x", self.padding_x),
            ("radius", self.radius),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(ReelError::validation(format!(
                    "theme.indicator.{name} must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }
}

/// Progress bar along the bottom edge.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ProgressStyle {
    /// Distance from the bottom edge.
    pub bottom: f64,
    /// Left and right inset.
    pub inset: f64,
    /// Bar height.
    pub height: f64,
    /// Corner radius of track and fill.
    pub radius: f64,
    /// Track color.
    pub track_color: Color,
    /// Fill color.
    pub fill_color: Color,
    /// Glow around the fill.
    pub glow: Shadow,
}

impl Default for ProgressStyle {
    fn default() -> Self {
        Self {
            bottom: 60.0,
            inset: 40.0,
            height: 6.0,
            radius: 3.0,
            track_color: Color::rgba(1.0, 1.0, 1.0, 0.2),
            fill_color: Color::from_rgb8_alpha(0x8a, 0x2b, 0xe2, 1.0),
            glow: Shadow {
                offset_x: 0.0,
                offset_y: 0.0,
                blur: 20.0,
                color: Color::from_rgb8_alpha(138, 43, 226, 0.6),
            },
        }
    }
}

impl ProgressStyle {
    fn validate(&self) -> ReelResult<()> {
        self.glow.validate("theme.progress.glow")?;
        if !self.height.is_finite() || self.height <= 0.0 {
            return Err(ReelError::validation("theme.progress.height must be > 0"));
        }
        for (name, v) in [
            ("bottom", self.bottom),
            ("inset", self.inset),
            ("radius", self.radius),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(ReelError::validation(format!(
                    "theme.progress.{name} must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/config.rs"]
mod tests;
