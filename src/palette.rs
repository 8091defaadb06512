//! Palette extraction: reduce a screenshot to its dominant colors.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An sRGB color, serialized as `[r, g, b]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Something that can summarize an image file as an ordered palette.
///
/// Implementations return colors in rank order, most dominant first.
pub trait ColorExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<Vec<Rgb>>;
}

/// Median-cut quantizer over the image's opaque pixels
#[derive(Debug, Clone, Copy)]
pub struct MedianCut {
    /// Maximum number of colors returned
    pub palette_size: usize,
    /// Sample every `step`-th pixel (1 = every pixel)
    pub step: usize,
}

impl Default for MedianCut {
    fn default() -> Self {
        Self {
            palette_size: 6,
            step: 4,
        }
    }
}

impl MedianCut {
    pub fn new(palette_size: usize) -> Self {
        Self {
            palette_size,
            ..Default::default()
        }
    }

    /// Quantize raw RGBA bytes. Pixels with alpha below 125 are ignored.
    pub fn quantize_rgba(&self, rgba: &[u8]) -> Vec<Rgb> {
        let step = self.step.max(1);
        let pixels: Vec<[u8; 3]> = rgba
            .chunks_exact(4)
            .step_by(step)
            .filter(|px| px[3] >= 125)
            .map(|px| [px[0], px[1], px[2]])
            .collect();
        median_cut(pixels, self.palette_size)
    }
}

impl ColorExtractor for MedianCut {
    fn extract(&self, path: &Path) -> Result<Vec<Rgb>> {
        let img = image::open(path)?.to_rgba8();
        Ok(self.quantize_rgba(img.as_raw()))
    }
}

struct ColorBox {
    pixels: Vec<[u8; 3]>,
}

impl ColorBox {
    /// Channel with the largest spread, and that spread
    fn widest_channel(&self) -> (usize, u8) {
        (0..3)
            .map(|c| {
                let (lo, hi) = self
                    .pixels
                    .iter()
                    .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p[c]), hi.max(p[c])));
                (c, hi.saturating_sub(lo))
            })
            .max_by_key(|&(c, range)| (range, std::cmp::Reverse(c)))
            .unwrap_or((0, 0))
    }

    fn average(&self) -> Rgb {
        let n = self.pixels.len().max(1) as u64;
        let sum = self.pixels.iter().fold([0u64; 3], |mut acc, p| {
            for c in 0..3 {
                acc[c] += p[c] as u64;
            }
            acc
        });
        let avg = |c: usize| ((sum[c] + n / 2) / n) as u8;
        Rgb(avg(0), avg(1), avg(2))
    }
}

fn median_cut(pixels: Vec<[u8; 3]>, max_colors: usize) -> Vec<Rgb> {
    if pixels.is_empty() || max_colors == 0 {
        return Vec::new();
    }

    let mut boxes = vec![ColorBox { pixels }];
    while boxes.len() < max_colors {
        // Split the box with the widest spread, larger population breaking ties
        let candidate = boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.pixels.len() > 1)
            .map(|(i, b)| {
                let (channel, range) = b.widest_channel();
                (i, channel, range, b.pixels.len())
            })
            .filter(|&(_, _, range, _)| range > 0)
            .max_by_key(|&(_, _, range, len)| (range, len));

        let Some((i, channel, _, _)) = candidate else {
            break;
        };
        let target = &mut boxes[i];
        target.pixels.sort_unstable_by_key(|p| p[channel]);
        let upper = target.pixels.split_off(target.pixels.len() / 2);
        boxes.push(ColorBox { pixels: upper });
    }

    let mut ranked: Vec<(Rgb, usize)> = Vec::with_capacity(boxes.len());
    for b in &boxes {
        let color = b.average();
        match ranked.iter_mut().find(|(c, _)| *c == color) {
            Some((_, count)) => *count += b.pixels.len(),
            None => ranked.push((color, b.pixels.len())),
        }
    }
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().map(|(c, _)| c).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgba(colors: &[([u8; 3], usize)]) -> Vec<u8> {
        colors
            .iter()
            .flat_map(|&(c, n)| std::iter::repeat([c[0], c[1], c[2], 255]).take(n))
            .flatten()
            .collect()
    }

    #[test]
    fn dominant_color_comes_first() {
        let q = MedianCut {
            palette_size: 4,
            step: 1,
        };
        let data = rgba(&[([200, 10, 10], 300), ([10, 10, 200], 100)]);
        let palette = q.quantize_rgba(&data);
        assert_eq!(palette, vec![Rgb(200, 10, 10), Rgb(10, 10, 200)]);
    }

    #[test]
    fn respects_palette_size() {
        let q = MedianCut {
            palette_size: 2,
            step: 1,
        };
        let data = rgba(&[
            ([0, 0, 0], 10),
            ([255, 0, 0], 10),
            ([0, 255, 0], 10),
            ([0, 0, 255], 10),
        ]);
        assert_eq!(q.quantize_rgba(&data).len(), 2);
    }

    #[test]
    fn transparent_pixels_are_ignored() {
        let q = MedianCut {
            palette_size: 3,
            step: 1,
        };
        let mut data = rgba(&[([20, 30, 40], 5)]);
        data.extend_from_slice(&[255, 255, 255, 0]);
        assert_eq!(q.quantize_rgba(&data), vec![Rgb(20, 30, 40)]);
        assert!(q.quantize_rgba(&[1, 2, 3, 0]).is_empty());
    }

    #[test]
    fn rgb_serializes_as_triple() {
        assert_eq!(serde_json::to_string(&Rgb(1, 2, 3)).unwrap(), "[1,2,3]");
    }

    #[test]
    fn extracts_from_png_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swatch.png");
        let img = image::RgbaImage::from_fn(8, 8, |x, _| {
            if x < 6 {
                image::Rgba([250, 250, 250, 255])
            } else {
                image::Rgba([30, 60, 90, 255])
            }
        });
        img.save(&path).unwrap();

        let palette = MedianCut {
            palette_size: 4,
            step: 1,
        }
        .extract(&path)
        .unwrap();
        assert_eq!(palette[0], Rgb(250, 250, 250));
        assert!(palette.contains(&Rgb(30, 60, 90)));
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();
        assert!(MedianCut::default().extract(&path).is_err());
    }
}
