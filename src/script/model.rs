use std::{io::Read, path::Path};

use anyhow::Context;

use crate::foundation::error::{ReelError, ReelResult};

/// One narrated block of the script.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScriptSegment {
    /// Narration text, shown word by word.
    pub text: String,
    /// Duration in seconds.
    pub duration: f64,
    /// Art-direction note. Carried through for tooling; never rendered.
    #[serde(default)]
    pub visual: String,
}

/// Publishing metadata that travels with a script.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScriptMetadata {
    /// Intended total duration in seconds (informational).
    pub total_duration: f64,
    /// Name of the hook pattern used by the writer.
    pub hook_pattern: String,
    /// Hashtags suggested for the post.
    pub hashtags: Vec<String>,
}

/// Reel content: a hook, any number of body parts and a call to action.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VideoScript {
    /// Opening segment.
    pub hook: ScriptSegment,
    /// Body parts, in order. May be empty.
    #[serde(default)]
    pub body: Vec<ScriptSegment>,
    /// Closing call to action.
    pub cta: ScriptSegment,
    /// Publishing metadata.
    #[serde(default)]
    pub metadata: ScriptMetadata,
}

impl VideoScript {
    /// Parse a script from JSON.
    pub fn from_reader(reader: impl Read) -> ReelResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Read and parse a JSON script file.
    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("open script '{}'", path.display()))?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Pretty JSON form.
    pub fn to_json_pretty(&self) -> ReelResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Segments in playback order: hook, body parts, CTA.
    pub fn segments(&self) -> impl Iterator<Item = &ScriptSegment> {
        std::iter::once(&self.hook)
            .chain(self.body.iter())
            .chain(std::iter::once(&self.cta))
    }

    /// Per-segment durations in playback order.
    pub fn segment_durations_secs(&self) -> Vec<f64> {
        self.segments().map(|s| s.duration).collect()
    }

    /// Sum of every segment duration.
    pub fn total_duration_secs(&self) -> f64 {
        self.segments().map(|s| s.duration).sum()
    }

    /// Check texts, durations and hashtags.
    pub fn validate(&self) -> ReelResult<()> {
        validate_segment(&self.hook, "hook")?;
        for (i, seg) in self.body.iter().enumerate() {
            validate_segment(seg, &format!("body[{i}]"))?;
        }
        validate_segment(&self.cta, "cta")?;

        if !self.metadata.total_duration.is_finite() || self.metadata.total_duration < 0.0 {
            return Err(ReelError::validation(
                "metadata.total_duration must be finite and >= 0",
            ));
        }
        if let Some(i) = self
            .metadata
            .hashtags
            .iter()
            .position(|h| h.trim().is_empty())
        {
            return Err(ReelError::validation(format!(
                "metadata.hashtags[{i}] must be non-empty"
            )));
        }
        Ok(())
    }
}

fn validate_segment(seg: &ScriptSegment, name: &str) -> ReelResult<()> {
    if seg.text.trim().is_empty() {
        return Err(ReelError::validation(format!("{name}.text must be non-empty")));
    }
    if !seg.duration.is_finite() || seg.duration <= 0.0 {
        return Err(ReelError::validation(format!(
            "{name}.duration must be finite and > 0, got {}",
            seg.duration
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/script/model.rs"]
mod tests;
