use crate::assets::fonts::PreparedFonts;
use crate::eval::evaluator::EvaluatedFrame;
use crate::eval::prepared::PreparedReel;
use crate::foundation::error::ReelResult;

/// A rendered frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**. The `premultiplied` flag makes this explicit at API
/// boundaries.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Premultiplied RGBA of the pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data
            .get(i..i + 4)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }
}

/// A renderer that turns an evaluated frame into pixels.
///
/// Most callers use [`crate::render_frame`] and friends, which evaluate the frame first.
pub trait RenderBackend {
    /// Rasterize `eval`, a frame of `prepared`.
    fn render_frame(
        &mut self,
        prepared: &PreparedReel,
        eval: &EvaluatedFrame,
    ) -> ReelResult<FrameRGBA>;

    /// Settings that build an equivalent backend on a worker thread.
    ///
    /// Parallel rendering requires this.
    fn worker_render_settings(&self) -> Option<RenderSettings> {
        None
    }
}

/// What a [`crate::CpuBackend`] needs to draw.
#[derive(Clone, Debug)]
pub struct RenderSettings {
    /// Fonts for every text role.
    pub fonts: PreparedFonts,
}
