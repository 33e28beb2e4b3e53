//! Structs and functions for handling textures.
//!
//! The module provides the [`Texture`] struct which is a CPU representation of a GPU texture, and
//! the lookup table that decides how each decoded pixel layout is handed to OpenGL.

use std::{path::Path, sync::Arc};

use image::DynamicImage;

use crate::abs::Gpu;

/// Channel layout and order of decoded pixel data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Luma8,
    LumaA8,
    Rgb8,
    Rgba8,
    Bgr8,
    Bgra8,
    Luma16,
    LumaA16,
    Rgb16,
    Rgba16,
    Rgb32F,
    Rgba32F,
    /// Any layout the decoder produces that has no name here.
    Other,
}

/// How pixel data is passed to `glTexImage2D`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureUpload {
    pub internal_format: u32,
    pub format: u32,
    pub data_type: u32,
}

/// Pixel formats with an upload path. Anything missing here is skipped.
pub const TEXTURE_FORMATS: &[(PixelFormat, TextureUpload)] = &[
    (
        PixelFormat::Rgb8,
        TextureUpload {
            internal_format: glow::SRGB8,
            format: glow::RGB,
            data_type: glow::UNSIGNED_BYTE,
        },
    ),
    (
        PixelFormat::Rgba8,
        TextureUpload {
            internal_format: glow::SRGB8_ALPHA8,
            format: glow::RGBA,
            data_type: glow::UNSIGNED_BYTE,
        },
    ),
    (
        PixelFormat::Bgr8,
        TextureUpload {
            internal_format: glow::SRGB8,
            format: glow::BGR,
            data_type: glow::UNSIGNED_BYTE,
        },
    ),
    (
        PixelFormat::Bgra8,
        TextureUpload {
            internal_format: glow::SRGB8_ALPHA8,
            format: glow::BGRA,
            data_type: glow::UNSIGNED_BYTE,
        },
    ),
];

impl PixelFormat {
    /// Returns the upload path for this format, or `None` if textures in this format are skipped.
    pub fn upload(self) -> Option<TextureUpload> {
        TEXTURE_FORMATS
            .iter()
            .find(|(format, _)| *format == self)
            .map(|(_, upload)| *upload)
    }

    fn of(image: &DynamicImage) -> Self {
        match image {
            DynamicImage::ImageLuma8(_) => Self::Luma8,
            DynamicImage::ImageLumaA8(_) => Self::LumaA8,
            DynamicImage::ImageRgb8(_) => Self::Rgb8,
            DynamicImage::ImageRgba8(_) => Self::Rgba8,
            DynamicImage::ImageLuma16(_) => Self::Luma16,
            DynamicImage::ImageLumaA16(_) => Self::LumaA16,
            DynamicImage::ImageRgb16(_) => Self::Rgb16,
            DynamicImage::ImageRgba16(_) => Self::Rgba16,
            DynamicImage::ImageRgb32F(_) => Self::Rgb32F,
            DynamicImage::ImageRgba32F(_) => Self::Rgba32F,
            _ => Self::Other,
        }
    }
}

/// Decoded pixel data waiting to be uploaded.
#[derive(Clone, Debug)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub pixels: Vec<u8>,
}

impl TextureImage {
    /// Decodes the image file at `path`, keeping its native pixel layout.
    pub fn load(path: &Path) -> Result<Self, String> {
        let image = image::open(path).map_err(|e| e.to_string())?;
        Ok(image.into())
    }
}

impl From<DynamicImage> for TextureImage {
    fn from(image: DynamicImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            format: PixelFormat::of(&image),
            pixels: image.into_bytes(),
        }
    }
}

/// Represents a texture stored on the GPU side.
pub struct Texture<G: Gpu = glow::Context> {
    gpu: Arc<G>,
    id: G::TextureId,
    width: u32,
    height: u32,
}

impl<G: Gpu> Texture<G> {
    /// Uploads the given image, dispatching on its pixel format.
    ///
    /// Fails without touching the GPU if the format has no upload path.
    pub fn new(gpu: &Arc<G>, image: &TextureImage) -> Result<Self, String> {
        let upload = image
            .format
            .upload()
            .ok_or_else(|| format!("Unsupported texture format: {:?}", image.format))?;
        let id = gpu.upload_texture(image, &upload)?;

        Ok(Self {
            gpu: Arc::clone(gpu),
            id,
            width: image.width,
            height: image.height,
        })
    }

    /// Returns the width of the texture.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the texture.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Binds the texture to the specified texture unit.
    pub fn bind(&self, unit: u32) {
        self.gpu.bind_texture_unit(self.id, unit);
    }
}

impl<G: Gpu> Drop for Texture<G> {
    fn drop(&mut self) {
        self.gpu.release_texture(self.id);
    }
}

#[cfg(test)]
mod tests {
    use image::{ImageBuffer, Luma, Rgb, Rgba};

    use super::*;
    use crate::abs::gpu::recording::{Call, Kind, RecordingGpu};

    #[test]
    fn test_format_dispatch() {
        let rgb = PixelFormat::Rgb8.upload().unwrap();
        assert_eq!(rgb.internal_format, glow::SRGB8);
        assert_eq!(rgb.format, glow::RGB);
        assert_eq!(rgb.data_type, glow::UNSIGNED_BYTE);

        let bgr = PixelFormat::Bgr8.upload().unwrap();
        assert_eq!(bgr.internal_format, glow::SRGB8);
        assert_eq!(bgr.format, glow::BGR);

        let rgba = PixelFormat::Rgba8.upload().unwrap();
        assert_eq!(rgba.internal_format, glow::SRGB8_ALPHA8);
        assert_eq!(rgba.format, glow::RGBA);

        let bgra = PixelFormat::Bgra8.upload().unwrap();
        assert_eq!(bgra.internal_format, glow::SRGB8_ALPHA8);
        assert_eq!(bgra.format, glow::BGRA);

        for skipped in [
            PixelFormat::Luma8,
            PixelFormat::LumaA8,
            PixelFormat::Luma16,
            PixelFormat::LumaA16,
            PixelFormat::Rgb16,
            PixelFormat::Rgba16,
            PixelFormat::Rgb32F,
            PixelFormat::Rgba32F,
            PixelFormat::Other,
        ] {
            assert_eq!(skipped.upload(), None, "{skipped:?} should be skipped");
        }
    }

    #[test]
    fn test_format_table_has_no_duplicates() {
        for (i, (a, _)) in TEXTURE_FORMATS.iter().enumerate() {
            for (b, _) in &TEXTURE_FORMATS[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_decoded_layout_is_kept() {
        let rgb: TextureImage =
            DynamicImage::ImageRgb8(ImageBuffer::from_pixel(3, 2, Rgb([1u8, 2, 3]))).into();
        assert_eq!(rgb.format, PixelFormat::Rgb8);
        assert_eq!((rgb.width, rgb.height), (3, 2));
        assert_eq!(rgb.pixels.len(), 3 * 2 * 3);
        assert_eq!(&rgb.pixels[..3], &[1, 2, 3]);

        let rgba: TextureImage =
            DynamicImage::ImageRgba8(ImageBuffer::from_pixel(2, 2, Rgba([9u8, 8, 7, 6]))).into();
        assert_eq!(rgba.format, PixelFormat::Rgba8);
        assert_eq!(rgba.pixels.len(), 2 * 2 * 4);

        let luma: TextureImage =
            DynamicImage::ImageLuma8(ImageBuffer::from_pixel(2, 2, Luma([5u8]))).into();
        assert_eq!(luma.format, PixelFormat::Luma8);
    }

    #[test]
    fn test_texture_upload_and_release() {
        let gpu = Arc::new(RecordingGpu::default());
        let image: TextureImage =
            DynamicImage::ImageRgb8(ImageBuffer::from_pixel(4, 4, Rgb([0u8, 0, 0]))).into();

        let texture = Texture::new(&gpu, &image).unwrap();
        assert_eq!((texture.width(), texture.height()), (4, 4));
        texture.bind(0);
        drop(texture);

        assert_eq!(
            gpu.calls(),
            vec![
                Call::Create(Kind::Texture, 1),
                Call::Texture {
                    id: 1,
                    upload: PixelFormat::Rgb8.upload().unwrap(),
                },
                Call::BindTexture(1, 0),
                Call::Release(Kind::Texture, 1),
            ]
        );
    }

    #[test]
    fn test_unsupported_format_creates_nothing() {
        let gpu = Arc::new(RecordingGpu::default());
        let image: TextureImage =
            DynamicImage::ImageLuma8(ImageBuffer::from_pixel(4, 4, Luma([0u8]))).into();

        assert!(Texture::new(&gpu, &image).is_err());
        assert!(gpu.calls().is_empty());
    }
}
