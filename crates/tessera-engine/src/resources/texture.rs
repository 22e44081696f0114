use crate::error::{RenderError, Result};

/// A validated full-mip-0 upload for a 2D texture.
///
/// `data` is tightly packed: row stride is `width * bytes_per_pixel`.
#[derive(Debug, Clone, Copy)]
pub struct TextureUpload<'a> {
    pub(crate) label: &'a str,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) format: wgpu::TextureFormat,
    pub(crate) bytes_per_row: u32,
    pub(crate) data: &'a [u8],
}

impl<'a> TextureUpload<'a> {
    pub fn new(
        label: &'a str,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        data: &'a [u8],
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::resource(
                label,
                format!("texture extent {width}x{height} has a zero side"),
            ));
        }
        if format.block_dimensions() != (1, 1) {
            return Err(RenderError::resource(
                label,
                format!("{format:?} is block-compressed; only per-pixel formats are uploaded"),
            ));
        }
        let Some(bytes_per_pixel) = format.block_copy_size(None) else {
            return Err(RenderError::resource(
                label,
                format!("{format:?} has no single copyable aspect"),
            ));
        };

        let bytes_per_row = width
            .checked_mul(bytes_per_pixel)
            .ok_or_else(|| RenderError::resource(label, "row size overflows u32"))?;
        let expected = bytes_per_row as usize * height as usize;
        if data.len() != expected {
            return Err(RenderError::TextureUpload {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            label,
            width,
            height,
            format,
            bytes_per_row,
            data,
        })
    }

    /// Convenience for packed RGBA8 (sRGB) pixel data.
    pub fn rgba8(label: &'a str, width: u32, height: u32, data: &'a [u8]) -> Result<Self> {
        Self::new(label, width, height, wgpu::TextureFormat::Rgba8UnormSrgb, data)
    }

    /// Rejects extents wider or taller than `max_dimension`.
    pub(crate) fn check_dimension(&self, max_dimension: u32) -> Result<()> {
        if self.width > max_dimension || self.height > max_dimension {
            return Err(RenderError::resource(
                self.label,
                format!(
                    "texture extent {}x{} exceeds the device limit of {max_dimension}",
                    self.width, self.height
                ),
            ));
        }
        Ok(())
    }

    pub fn bytes_per_row(&self) -> u32 {
        self.bytes_per_row
    }

    pub(crate) fn extent(&self) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        }
    }
}

/// Texture with its default view and the sampler it is read through.
#[derive(Debug)]
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba8_row_stride_is_width_times_four() {
        let pixels = vec![0u8; 8 * 4 * 4];
        let up = TextureUpload::rgba8("checker", 8, 4, &pixels).unwrap();
        assert_eq!(up.bytes_per_row(), 8 * 4);
        assert_eq!(up.extent().depth_or_array_layers, 1);
    }

    #[test]
    fn short_buffer_is_rejected_not_truncated() {
        let pixels = vec![0u8; 2 * 2 * 4 - 1];
        match TextureUpload::rgba8("short", 2, 2, &pixels) {
            Err(RenderError::TextureUpload { expected, actual }) => {
                assert_eq!(expected, 16);
                assert_eq!(actual, 15);
            }
            other => panic!("expected TextureUpload error, got {other:?}"),
        }
    }

    #[test]
    fn long_buffer_is_rejected() {
        let pixels = vec![0u8; 17];
        assert!(matches!(
            TextureUpload::rgba8("long", 2, 2, &pixels),
            Err(RenderError::TextureUpload { expected: 16, actual: 17 })
        ));
    }

    #[test]
    fn zero_extent_is_a_resource_error() {
        assert!(matches!(
            TextureUpload::rgba8("empty", 0, 4, &[]),
            Err(RenderError::ResourceCreation { .. })
        ));
    }

    #[test]
    fn extent_is_checked_against_max_dimension() {
        let pixels = vec![0u8; 9 * 2 * 4];
        let up = TextureUpload::rgba8("wide", 9, 2, &pixels).unwrap();
        up.check_dimension(9).unwrap();
        assert!(matches!(
            up.check_dimension(8),
            Err(RenderError::ResourceCreation { label, .. }) if label == "wide"
        ));
    }

    #[test]
    fn compressed_formats_are_rejected() {
        let data = vec![0u8; 16];
        assert!(TextureUpload::new("bc", 4, 4, wgpu::TextureFormat::Bc1RgbaUnorm, &data).is_err());
    }

    #[test]
    fn single_channel_stride() {
        let data = vec![0u8; 3 * 2];
        let up = TextureUpload::new("r8", 3, 2, wgpu::TextureFormat::R8Unorm, &data).unwrap();
        assert_eq!(up.bytes_per_row(), 3);
    }
}
