use crate::composition::config::ReelConfig;
use crate::foundation::error::ReelResult;
use crate::script::model::VideoScript;
use crate::timeline::segments::Timeline;

/// A script paired with the configuration it is rendered with.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReelComposition {
    /// Render configuration.
    pub config: ReelConfig,
    /// Reel content.
    pub script: VideoScript,
}

impl ReelComposition {
    /// Pair a script with a config.
    pub fn new(config: ReelConfig, script: VideoScript) -> Self {
        Self { config, script }
    }

    /// The built-in demo script with default configuration.
    pub fn demo() -> Self {
        Self::new(ReelConfig::default(), VideoScript::demo())
    }

    /// Validate both documents and the resulting timeline.
    pub fn validate(&self) -> ReelResult<()> {
        self.config.validate()?;
        self.script.validate()?;
        self.timeline().map(|_| ())
    }

    /// Segment timeline at the configured frame rate.
    pub fn timeline(&self) -> ReelResult<Timeline> {
        Timeline::build(&self.script, self.config.fps, &self.config.labels)
    }

    /// Total frame count.
    pub fn duration_frames(&self) -> ReelResult<u64> {
        Ok(self.timeline()?.duration)
    }
}
