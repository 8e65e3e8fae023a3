use anyhow::{Result, anyhow};
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest canvas a bitmap may hold (64 megapixels, 192 MiB of RGB).
pub const MAX_PIXELS: u64 = 64 * 1024 * 1024;

/// A rendered chart: tightly packed 8-bit RGB pixels, row-major.
///
/// The buffer length always matches the dimensions, including after deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBitmap")]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[derive(Deserialize)]
struct RawBitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl TryFrom<RawBitmap> for Bitmap {
    type Error = anyhow::Error;

    fn try_from(raw: RawBitmap) -> Result<Self> {
        Bitmap::from_rgb(raw.width, raw.height, raw.pixels)
    }
}

impl Bitmap {
    /// Byte length of an RGB buffer for `width` x `height`, refusing canvases above
    /// [`MAX_PIXELS`].
    pub fn buffer_len(width: u32, height: u32) -> Result<usize> {
        let pixels = u64::from(width) * u64::from(height);
        if pixels > MAX_PIXELS {
            return Err(anyhow!(
                "canvas too large: {width}x{height} exceeds {MAX_PIXELS} pixels"
            ));
        }
        usize::try_from(pixels)
            .ok()
            .and_then(|p| p.checked_mul(3))
            .ok_or_else(|| anyhow!("canvas too large: {width}x{height}"))
    }

    /// Wrap an RGB buffer; fails when the buffer size does not match the dimensions.
    pub fn from_rgb(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = Self::buffer_len(width, height)?;
        if pixels.len() != expected {
            return Err(anyhow!(
                "pixel buffer has {} bytes, expected {expected} for {width}x{height}",
                pixels.len()
            ));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGB bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGB triple at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Some((self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]))
    }

    /// Encode as PNG in memory.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        PngEncoder::new(&mut out)
            .write_image(&self.pixels, self.width, self.height, ColorType::Rgb8)
            .map_err(|e| anyhow!("png encoding failed: {e}"))?;
        Ok(out)
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_png()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_length_must_match() {
        assert!(Bitmap::from_rgb(2, 2, vec![0; 12]).is_ok());
        assert!(Bitmap::from_rgb(2, 2, vec![0; 11]).is_err());
    }

    #[test]
    fn oversized_canvases_are_refused_before_allocating() {
        assert_eq!(Bitmap::buffer_len(100, 10).unwrap(), 3000);
        let e = Bitmap::buffer_len(4_000_000_000, 4_000_000_000).unwrap_err();
        assert!(e.to_string().contains("canvas too large"));
        assert!(Bitmap::buffer_len(50_000, 50_000).is_err());
    }

    #[test]
    fn deserialization_checks_the_buffer() {
        let bad = serde_json::from_str::<Bitmap>(r#"{"width":5,"height":5,"pixels":[]}"#);
        assert!(bad.is_err());

        let good: Bitmap =
            serde_json::from_str(r#"{"width":1,"height":1,"pixels":[1,2,3]}"#).unwrap();
        assert_eq!(good.pixel(0, 0), Some((1, 2, 3)));
        let json = serde_json::to_string(&good).unwrap();
        assert_eq!(serde_json::from_str::<Bitmap>(&json).unwrap(), good);
    }
}
