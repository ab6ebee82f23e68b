//! Texture decoding.

use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Raw texture data loaded from PNG.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    /// Texture width in pixels.
    pub width: u32,
    /// Texture height in pixels.
    pub height: u32,
    /// RGBA8 pixel data (4 bytes per pixel).
    pub pixels: Vec<u8>,
    /// Animation frame count (1 if not animated).
    pub frame_count: u32,
}

impl TextureData {
    /// Create a new texture from RGBA data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
            frame_count: 1,
        }
    }

    /// A single-colour texture.
    pub fn solid(size: u32, rgba: [u8; 4]) -> Self {
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take((size * size * 4) as usize)
            .collect();
        Self::new(size, size, pixels)
    }

    /// Create a placeholder texture (magenta/black checkerboard).
    pub fn placeholder() -> Self {
        let size = 16;
        let mut pixels = vec![0u8; (size * size * 4) as usize];

        for y in 0..size {
            for x in 0..size {
                let idx = ((y * size + x) * 4) as usize;
                let magenta = ((x / 8) + (y / 8)) % 2 == 0;
                let color = if magenta { [255, 0, 255, 255] } else { [0, 0, 0, 255] };
                pixels[idx..idx + 4].copy_from_slice(&color);
            }
        }

        Self::new(size, size, pixels)
    }

    pub fn is_animated(&self) -> bool {
        self.frame_count > 1
    }

    /// Get the first frame of an animated texture (or the whole texture if not animated).
    pub fn first_frame(&self) -> TextureData {
        if !self.is_animated() {
            return self.clone();
        }

        let frame_height = self.height / self.frame_count;
        let frame_size = (self.width * frame_height * 4) as usize;

        Self::new(self.width, frame_height, self.pixels[..frame_size].to_vec())
    }

    /// The texture as a square `size` x `size` image, nearest-neighbour scaled.
    pub fn to_tile(&self, size: u32) -> Option<RgbaImage> {
        let frame = self.first_frame();
        let image = RgbaImage::from_raw(frame.width, frame.height, frame.pixels)?;
        if image.width() == size && image.height() == size {
            return Some(image);
        }
        Some(imageops::resize(&image, size, size, FilterType::Nearest))
    }
}

/// Load a texture from PNG bytes, keeping only the first animation frame.
pub fn load_texture_from_bytes(data: &[u8]) -> Result<TextureData, image::ImageError> {
    let img = image::load_from_memory(data)?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    // Animated textures stack square frames vertically.
    let frame_count = if width > 0 && height > width && height % width == 0 {
        height / width
    } else {
        1
    };

    let texture = TextureData {
        width,
        height,
        pixels: rgba.into_raw(),
        frame_count,
    };
    Ok(texture.first_frame())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_fn(width, height, |_, y| {
            if y < width {
                image::Rgba([255, 0, 0, 255])
            } else {
                image::Rgba([0, 0, 255, 255])
            }
        });
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn pixel(tex: &TextureData, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y * tex.width + x) * 4) as usize;
        tex.pixels[idx..idx + 4].try_into().unwrap()
    }

    #[test]
    fn test_placeholder_texture() {
        let tex = TextureData::placeholder();
        assert_eq!(tex.width, 16);
        assert_eq!(tex.height, 16);
        assert_eq!(tex.pixels.len(), 16 * 16 * 4);
        assert_eq!(pixel(&tex, 0, 0), [255, 0, 255, 255]);
        assert_eq!(pixel(&tex, 8, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn test_animated_texture_keeps_first_frame() {
        let tex = load_texture_from_bytes(&png(4, 12)).unwrap();
        assert_eq!((tex.width, tex.height), (4, 4));
        assert!(!tex.is_animated());
        assert_eq!(pixel(&tex, 0, 3), [255, 0, 0, 255]);
    }

    #[test]
    fn test_to_tile_scales() {
        let tex = TextureData::solid(32, [1, 2, 3, 255]);
        let tile = tex.to_tile(16).unwrap();
        assert_eq!(tile.dimensions(), (16, 16));
        assert_eq!(tile.get_pixel(5, 5).0, [1, 2, 3, 255]);
    }

    #[test]
    fn test_invalid_png() {
        assert!(load_texture_from_bytes(b"not a png").is_err());
    }
}
