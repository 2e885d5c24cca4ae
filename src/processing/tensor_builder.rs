//! Turns a decoded image into the `[1, 3, H, W]` input tensor a model expects.

use rayon::prelude::*;
use crate::common::PixelBuffer;
use crate::data::{PipelineError, PipelineResult, Tensor};

/// Resizes `pixels` to `target_w x target_h` with nearest-neighbour sampling
/// and normalises each channel as `(sample / 255 - mean[c]) / std[c]`,
/// writing NCHW (channel-major) order.
///
/// The image is stretched to fill the target; aspect ratio is not kept and no
/// padding is added. Normalised values are never clamped.
pub fn build(
    pixels: &PixelBuffer,
    target_w: u32,
    target_h: u32,
    mean: [f32; 3],
    std: [f32; 3],
) -> PipelineResult<Tensor> {
    if target_w == 0 || target_h == 0 {
        return Err(PipelineError::Preprocess(format!(
            "target size must be positive, got {}x{}",
            target_w, target_h
        )));
    }
    if pixels.is_empty() {
        return Err(PipelineError::Preprocess(format!(
            "source image is empty ({}x{})",
            pixels.width(), pixels.height()
        )));
    }
    if let Some(c) = std.iter().position(|s| *s == 0.0) {
        return Err(PipelineError::Preprocess(format!("std[{c}] is zero")));
    }

    let (w, h) = (target_w as usize, target_h as usize);
    let (src_w, src_h) = (pixels.width() as usize, pixels.height() as usize);
    let hw = w * h;

    // floor(x * src_w / w), computed exactly in integers
    let src_xs: Vec<usize> = (0..w).map(|x| (x * src_w / w).min(src_w - 1)).collect();
    let src_ys: Vec<usize> = (0..h).map(|y| (y * src_h / h).min(src_h - 1)).collect();

    let mut out = vec![0.0f32; 3 * hw];
    out.par_chunks_mut(hw)
        .enumerate()
        .for_each(|(c, plane)| {
            let (m, s) = (mean[c], std[c]);
            for (y, &sy) in src_ys.iter().enumerate() {
                let row = &mut plane[y * w..(y + 1) * w];
                for (x, &sx) in src_xs.iter().enumerate() {
                    let sample = pixels.sample(sx, sy, c) as f32;
                    row[x] = (sample / 255.0 - m) / s;
                }
            }
        });

    Tensor::from_shape_vec(&[1, 3, h, w], out)
}
