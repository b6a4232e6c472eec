//! Pixel-buffer helpers shared by the CPU backend.
//!
//! Buffers are tightly packed premultiplied RGBA8, row-major.

use std::sync::Arc;

use crate::foundation::color::Color;
use crate::foundation::core::{Point, Rect};
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::mul_div255_u8;

pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> ReelResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ReelError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ReelError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(ReelError::render("pixmap byte len mismatch"));
    }
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

pub(crate) fn premul_bytes_to_image(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> ReelResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

/// Fill `dst` with the CSS `linear-gradient(angle, stops...)` of a `width x height` box.
pub(crate) fn paint_linear_gradient(
    dst: &mut [u8],
    width: u32,
    height: u32,
    angle_deg: f64,
    stops: &[(f64, Color)],
) -> ReelResult<()> {
    if dst.len() != (width as usize) * (height as usize) * 4 {
        return Err(ReelError::render("gradient buffer size mismatch"));
    }
    if stops.is_empty() {
        return Err(ReelError::render("gradient needs at least one stop"));
    }
    let (w, h) = (f64::from(width), f64::from(height));
    let theta = angle_deg.to_radians();
    let (dx, dy) = (theta.sin(), -theta.cos());
    // Length of the gradient line so that both end corners land on offsets 0 and 1.
    let len = (w * dx).abs() + (h * dy).abs();
    let len = if len > 0.0 { len } else { 1.0 };

    for (y, row) in dst.chunks_exact_mut(width as usize * 4).enumerate() {
        let py = y as f64 + 0.5 - h / 2.0;
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            let pxx = x as f64 + 0.5 - w / 2.0;
            let t = (pxx * dx + py * dy) / len + 0.5;
            px.copy_from_slice(&sample_stops(stops, t).to_rgba8_premul().to_array());
        }
    }
    Ok(())
}

fn sample_stops(stops: &[(f64, Color)], t: f64) -> Color {
    let first = stops[0];
    if t <= first.0 {
        return first.1;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.0 {
            let span = b.0 - a.0;
            if span <= 0.0 {
                return b.1;
            }
            return Color::lerp(a.1, b.1, (t - a.0) / span);
        }
    }
    stops[stops.len() - 1].1
}

/// Composite a radial glow (`color` at `center`, transparent at `radius`) over `dst`.
///
/// Only the pixels inside the glow's bounding square are touched.
pub(crate) fn composite_radial_glow(
    dst: &mut [u8],
    width: u32,
    height: u32,
    center: Point,
    radius: f64,
    color: Color,
) -> ReelResult<()> {
    if dst.len() != (width as usize) * (height as usize) * 4 {
        return Err(ReelError::render("glow buffer size mismatch"));
    }
    if !radius.is_finite() || radius <= 0.0 || color.a <= 0.0 {
        return Ok(());
    }
    let bounds = Rect::new(
        center.x - radius,
        center.y - radius,
        center.x + radius,
        center.y + radius,
    );
    let x0 = bounds.x0.floor().clamp(0.0, f64::from(width)) as usize;
    let x1 = bounds.x1.ceil().clamp(0.0, f64::from(width)) as usize;
    let y0 = bounds.y0.floor().clamp(0.0, f64::from(height)) as usize;
    let y1 = bounds.y1.ceil().clamp(0.0, f64::from(height)) as usize;

    let a = color.a.clamp(0.0, 1.0);
    let premul = [
        color.r.clamp(0.0, 1.0) * a,
        color.g.clamp(0.0, 1.0) * a,
        color.b.clamp(0.0, 1.0) * a,
        a,
    ];
    let stride = width as usize * 4;
    for y in y0..y1 {
        let fy = y as f64 + 0.5 - center.y;
        for x in x0..x1 {
            let fx = x as f64 + 0.5 - center.x;
            let k = 1.0 - fx.hypot(fy) / radius;
            if k <= 0.0 {
                continue;
            }
            let src = premul.map(|c| (c * k * 255.0).round().clamp(0.0, 255.0) as u8);
            let idx = y * stride + x * 4;
            let out = premul_over_px([dst[idx], dst[idx + 1], dst[idx + 2], dst[idx + 3]], src);
            dst[idx..idx + 4].copy_from_slice(&out);
        }
    }
    Ok(())
}

/// Kernel radius covering three standard deviations.
pub(crate) fn blur_radius_for_sigma(sigma: f64) -> u32 {
    if !sigma.is_finite() || sigma <= 0.0 {
        0
    } else {
        (sigma * 3.0).ceil() as u32
    }
}

pub(crate) fn gaussian_kernel_q16(radius: u32, sigma: f32) -> ReelResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(ReelError::validation("blur sigma must be finite and > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
    for i in -r..=r {
        let x = f64::from(i);
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(ReelError::render("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = (((wf / sum) * 65536.0).round() as i64).clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    // Push the rounding residue into the center tap so the kernel sums to exactly 1.0.
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }
    Ok(weights)
}

/// Separable blur of `src` into `dst`, using `tmp` for the horizontal pass.
///
/// Samples outside the buffer read as transparent.
pub(crate) fn blur_rgba8_premul_q16(
    src: &[u8],
    dst: &mut [u8],
    tmp: &mut [u8],
    width: u32,
    height: u32,
    kernel_q16: &[u32],
) -> ReelResult<()> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| ReelError::render("blur buffer size overflow"))?;
    if src.len() != expected || dst.len() != expected || tmp.len() != expected {
        return Err(ReelError::render(
            "blur expects src/dst/tmp matching width*height*4",
        ));
    }
    if kernel_q16.len() <= 1 {
        dst.copy_from_slice(src);
        return Ok(());
    }
    horizontal_blur_q16(src, tmp, width, height, kernel_q16);
    vertical_blur_q16(tmp, dst, width, height, kernel_q16);
    Ok(())
}

fn horizontal_blur_q16(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i64;
    let w = i64::from(width);
    for y in 0..i64::from(height) {
        let row = (y * w) as usize;
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = x + ki as i64 - radius;
                if sx < 0 || sx >= w {
                    continue;
                }
                let idx = (row + sx as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out = (row + x as usize) * 4;
            for c in 0..4 {
                dst[out + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_blur_q16(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i64;
    let w = i64::from(width);
    let h = i64::from(height);
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = y + ki as i64 - radius;
                if sy < 0 || sy >= h {
                    continue;
                }
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

pub(crate) fn premul_over_px(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let sa = u16::from(src[3]);
    if sa == 0 {
        return dst;
    }
    let inv = 255u16 - sa;
    let mut out = [0u8; 4];
    for c in 0..4 {
        out[c] = src[c].saturating_add(mul_div255_u8(u16::from(dst[c]), inv));
    }
    out
}

/// Set every alpha to 255. Only valid when the buffer was drawn over an opaque base.
pub(crate) fn force_opaque(premul: &mut [u8]) {
    for px in premul.chunks_exact_mut(4) {
        px[3] = 255;
    }
}

/// Undo premultiplication, for formats that store straight alpha.
pub(crate) fn unpremultiply_rgba8(premul: &[u8]) -> Vec<u8> {
    let mut out = premul.to_vec();
    for px in out.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
