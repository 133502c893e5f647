//! CPU-side asset loading.
//!
//! Decodes texture images and reads shader sources from disk before any GPU
//! state exists. Everything in this crate is a pure function of file paths;
//! upload is the renderer's job.
//!
//! # Invariants
//! - Only 3- and 4-channel source images are accepted; anything else is a
//!   startup error, never silently converted.
//! - Images are vertically flipped on load (bottom-left texture origin
//!   convention of the authored UVs).
//! - Batch loads stop at the first failure.

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use std::path::{Path, PathBuf};

/// Channel layout of the source image. Pixels are carried as RGBA8 either
/// way; this records what the file actually contained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorFormat {
    Rgb,
    Rgba,
}

/// Errors from asset loading.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("{path}: {channels}-channel images are not supported (expected 3 or 4)")]
    UnsupportedChannels { path: PathBuf, channels: u8 },
}

/// One mip level of a decoded texture, RGBA8.
#[derive(Debug, Clone)]
pub struct MipLevel {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// A decoded, validated, vertically flipped texture image.
#[derive(Debug, Clone)]
pub struct TextureImage {
    path: PathBuf,
    format: ColorFormat,
    pixels: RgbaImage,
}

impl TextureImage {
    /// Validate and normalize an already-decoded image.
    ///
    /// Rejects channel counts other than 3 and 4, flips vertically, and
    /// expands to RGBA8.
    pub fn from_decoded(image: DynamicImage, path: &Path) -> Result<Self, AssetError> {
        let channels = image.color().channel_count();
        let format = match channels {
            3 => ColorFormat::Rgb,
            4 => ColorFormat::Rgba,
            _ => {
                return Err(AssetError::UnsupportedChannels {
                    path: path.to_path_buf(),
                    channels,
                });
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            format,
            pixels: image.flipv().to_rgba8(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> ColorFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Base-level pixels, RGBA8 row-major.
    pub fn pixels(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// Number of mip levels down to 1x1.
    pub fn mip_level_count(&self) -> u32 {
        32 - self.width().max(self.height()).leading_zeros()
    }

    /// Full mip chain, base level first. Each level is downsampled from the
    /// base image; dimensions halve and clamp at 1.
    pub fn mip_levels(&self) -> Vec<MipLevel> {
        let mut levels = Vec::with_capacity(self.mip_level_count() as usize);
        levels.push(MipLevel {
            width: self.width(),
            height: self.height(),
            pixels: self.pixels.as_raw().clone(),
        });

        let (mut width, mut height) = (self.width(), self.height());
        while width > 1 || height > 1 {
            width = (width / 2).max(1);
            height = (height / 2).max(1);
            let scaled = imageops::resize(&self.pixels, width, height, FilterType::Triangle);
            levels.push(MipLevel {
                width,
                height,
                pixels: scaled.into_raw(),
            });
        }
        levels
    }
}

/// Decode one texture file.
pub fn load_texture(path: impl AsRef<Path>) -> Result<TextureImage, AssetError> {
    let path = path.as_ref();
    let decoded = image::open(path).map_err(|e| match e {
        image::ImageError::IoError(source) => AssetError::Io {
            path: path.to_path_buf(),
            source,
        },
        source => AssetError::Decode {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let texture = TextureImage::from_decoded(decoded, path)?;
    tracing::debug!(
        path = %path.display(),
        width = texture.width(),
        height = texture.height(),
        format = ?texture.format(),
        "texture loaded"
    );
    Ok(texture)
}

/// Decode every texture in `manifest` (paths relative to `root`), in order,
/// stopping at the first failure.
pub fn load_textures<'a>(
    root: &Path,
    manifest: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<TextureImage>, AssetError> {
    let mut textures = Vec::new();
    for relative in manifest {
        textures.push(load_texture(root.join(relative))?);
    }
    tracing::info!(count = textures.len(), "all textures loaded");
    Ok(textures)
}

/// A WGSL shader source read from disk.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    pub label: String,
    pub code: String,
}

/// Read one WGSL shader file. The file must exist; validation happens when
/// the renderer compiles it.
pub fn load_shader(path: impl AsRef<Path>) -> Result<ShaderSource, AssetError> {
    let path = path.as_ref();
    let code = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let label = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "shader".to_string());
    tracing::debug!(path = %path.display(), bytes = code.len(), "shader source loaded");
    Ok(ShaderSource { label, code })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayAlphaImage, GrayImage, Rgb, RgbImage, RgbaImage};

    fn decoded(img: DynamicImage) -> Result<TextureImage, AssetError> {
        TextureImage::from_decoded(img, Path::new("test.jpg"))
    }

    #[test]
    fn one_and_two_channel_images_are_rejected() {
        let gray = decoded(DynamicImage::ImageLuma8(GrayImage::new(4, 4)));
        assert!(matches!(
            gray,
            Err(AssetError::UnsupportedChannels { channels: 1, .. })
        ));

        let gray_alpha = decoded(DynamicImage::ImageLumaA8(GrayAlphaImage::new(4, 4)));
        assert!(matches!(
            gray_alpha,
            Err(AssetError::UnsupportedChannels { channels: 2, .. })
        ));
    }

    #[test]
    fn three_and_four_channel_images_are_accepted() {
        let rgb = decoded(DynamicImage::ImageRgb8(RgbImage::new(4, 4))).unwrap();
        assert_eq!(rgb.format(), ColorFormat::Rgb);

        let rgba = decoded(DynamicImage::ImageRgba8(RgbaImage::new(4, 4))).unwrap();
        assert_eq!(rgba.format(), ColorFormat::Rgba);
    }

    #[test]
    fn load_flips_vertically() {
        let mut img = RgbImage::new(1, 2);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(0, 1, Rgb([0, 0, 255]));

        let texture = decoded(DynamicImage::ImageRgb8(img)).unwrap();
        // The bottom row of the file becomes the first row in memory.
        assert_eq!(&texture.pixels()[..4], &[0, 0, 255, 255]);
    }

    #[test]
    fn mip_chain_halves_down_to_one_pixel() {
        let texture = decoded(DynamicImage::ImageRgb8(RgbImage::new(8, 3))).unwrap();
        assert_eq!(texture.mip_level_count(), 4);

        let levels = texture.mip_levels();
        let dims: Vec<(u32, u32)> = levels.iter().map(|l| (l.width, l.height)).collect();
        assert_eq!(dims, vec![(8, 3), (4, 1), (2, 1), (1, 1)]);
        for level in &levels {
            assert_eq!(level.pixels.len(), (level.width * level.height * 4) as usize);
        }
    }

    #[test]
    fn load_texture_reads_a_real_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.png");
        RgbImage::new(2, 2).save(&path).unwrap();

        let texture = load_texture(&path).unwrap();
        assert_eq!(texture.format(), ColorFormat::Rgb);
        assert_eq!((texture.width(), texture.height()), (2, 2));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_texture("no/such/file.jpg").unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }

    #[test]
    fn batch_load_stops_at_first_failure() {
        let dir = tempfile::tempdir().unwrap();
        RgbImage::new(2, 2).save(dir.path().join("a.png")).unwrap();
        // b.png does not exist; c.png does not exist either.
        let err = load_textures(dir.path(), ["a.png", "b.png", "c.png"]).unwrap_err();
        match err {
            AssetError::Io { path, .. } => {
                // Failed on b, never reached c.
                assert!(path.ends_with("b.png"), "stopped at {path:?}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn shader_source_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.wgsl");
        std::fs::write(&path, "// wgsl\n").unwrap();

        let shader = load_shader(&path).unwrap();
        assert_eq!(shader.label, "scene");
        assert!(shader.code.starts_with("// wgsl"));

        assert!(matches!(
            load_shader(dir.path().join("lamp.wgsl")),
            Err(AssetError::Io { .. })
        ));
    }
}
