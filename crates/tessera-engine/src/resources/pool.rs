use std::borrow::Cow;

use bytemuck::Pod;
use wgpu::util::DeviceExt;

use crate::device::validated;
use crate::error::{RenderError, Result};
use crate::pipeline::{BindingKind, Pipeline};

use super::buffer::{aligned_size, check_buffer_limit, check_write};
use super::{BindResource, BufferKind, GpuBuffer, GpuTexture, TextureUpload, UniformBlock};

/// Allocation front-end over a device and its queue.
///
/// Obtain one with [`Context::resources`](crate::device::Context::resources).
#[derive(Clone, Copy)]
pub struct ResourcePool<'a> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
}

impl<'a> ResourcePool<'a> {
    pub fn new(device: &'a wgpu::Device, queue: &'a wgpu::Queue) -> Self {
        Self { device, queue }
    }

    pub fn device(&self) -> &'a wgpu::Device {
        self.device
    }

    pub fn queue(&self) -> &'a wgpu::Queue {
        self.queue
    }

    /// Allocates an uninitialized buffer of at least `size` bytes.
    ///
    /// Sizes are aligned for `kind` and checked against the device limits.
    pub fn create_buffer(&self, kind: BufferKind, size: u64, label: &str) -> Result<GpuBuffer> {
        let size = self.sized(kind, size, label)?;
        let raw = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: kind.usage(),
            mapped_at_creation: false,
        });
        log::debug!("created {kind:?} buffer `{label}` ({size} bytes)");
        Ok(GpuBuffer::new(raw, kind, size, label.to_string()))
    }

    /// Creates a buffer holding `contents`, zero-padded to the kind's alignment.
    pub fn create_buffer_init(
        &self,
        kind: BufferKind,
        contents: &[u8],
        label: &str,
    ) -> Result<GpuBuffer> {
        let size = self.sized(kind, contents.len() as u64, label)?;
        let raw = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: &pad_to(contents, size),
                usage: kind.usage(),
            });
        log::debug!("created {kind:?} buffer `{label}` ({size} bytes, initialized)");
        Ok(GpuBuffer::new(raw, kind, size, label.to_string()))
    }

    fn sized(&self, kind: BufferKind, requested: u64, label: &str) -> Result<u64> {
        let size = aligned_size(kind, requested, label)?;
        check_buffer_limit(size, self.device.limits().max_buffer_size, label)?;
        Ok(size)
    }

    /// Queues an upload into `buffer` at `offset`.
    ///
    /// Writes are ordered within a queue submission; there is no other
    /// atomicity guarantee.
    pub fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        check_write(buffer.size(), offset, data.len() as u64, buffer.label())?;
        let padded_len = (data.len() as u64).div_ceil(wgpu::COPY_BUFFER_ALIGNMENT)
            * wgpu::COPY_BUFFER_ALIGNMENT;
        self.queue
            .write_buffer(&buffer.raw, offset, &pad_to(data, padded_len));
        Ok(())
    }

    pub fn create_uniform<T: Pod>(&self, value: T, label: &str) -> Result<UniformBlock<T>> {
        if std::mem::size_of::<T>() % wgpu::COPY_BUFFER_ALIGNMENT as usize != 0 {
            return Err(RenderError::resource(
                label,
                "uniform block size must be a multiple of 4 bytes",
            ));
        }
        let buffer =
            self.create_buffer_init(BufferKind::Uniform, bytemuck::bytes_of(&value), label)?;
        Ok(UniformBlock::new(buffer, value))
    }

    /// Creates a 2D texture, uploads mip level 0 once, and builds a view and a
    /// linear clamp-to-edge sampler for it.
    pub fn create_texture(&self, upload: &TextureUpload<'_>) -> Result<GpuTexture> {
        upload.check_dimension(self.device.limits().max_texture_dimension_2d)?;

        let (texture, error) = validated(self.device, || {
            self.device.create_texture(&wgpu::TextureDescriptor {
                label: Some(upload.label),
                size: upload.extent(),
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: upload.format,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            })
        });
        if let Some(error) = error {
            return Err(RenderError::resource(upload.label, error.to_string()));
        }

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            upload.data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(upload.bytes_per_row),
                rows_per_image: Some(upload.height),
            },
            upload.extent(),
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = self.create_sampler(upload.label, wgpu::FilterMode::Linear);

        log::debug!(
            "uploaded texture `{}` {}x{} {:?}",
            upload.label,
            upload.width,
            upload.height,
            upload.format
        );
        Ok(GpuTexture {
            texture,
            view,
            sampler,
        })
    }

    pub fn create_sampler(&self, label: &str, filter: wgpu::FilterMode) -> wgpu::Sampler {
        self.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: filter,
            min_filter: filter,
            ..Default::default()
        })
    }

    /// Binds `entries` to group `group` of `pipeline`.
    ///
    /// The entries must match the group's declared shape exactly.
    pub fn create_bind_group(
        &self,
        pipeline: &Pipeline,
        group: u32,
        entries: &[(u32, BindResource<'_>)],
        label: &str,
    ) -> Result<wgpu::BindGroup> {
        let (Some(shape), Some(layout)) =
            (pipeline.shape(group), pipeline.bind_group_layout(group))
        else {
            return Err(RenderError::binding(
                group,
                format!(
                    "pipeline `{}` declares {} groups",
                    pipeline.label(),
                    pipeline.group_count()
                ),
            ));
        };

        let kinds = entries
            .iter()
            .map(|(slot, res)| res.kind().map(|k| (*slot, k)))
            .collect::<Result<Vec<(u32, BindingKind)>>>()?;
        shape.check_entries(group, &kinds)?;

        let wgpu_entries: Vec<wgpu::BindGroupEntry<'_>> = entries
            .iter()
            .map(|(slot, res)| wgpu::BindGroupEntry {
                binding: *slot,
                resource: res.as_wgpu(),
            })
            .collect();

        let (bind_group, error) = validated(self.device, || {
            self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout,
                entries: &wgpu_entries,
            })
        });
        match error {
            Some(error) => Err(RenderError::binding(group, error.to_string())),
            None => Ok(bind_group),
        }
    }
}

fn pad_to(data: &[u8], len: u64) -> Cow<'_, [u8]> {
    if data.len() as u64 == len {
        Cow::Borrowed(data)
    } else {
        let mut v = data.to_vec();
        v.resize(len as usize, 0);
        Cow::Owned(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{noop_device, scaled_pipeline};

    #[test]
    fn padding_only_copies_when_needed() {
        let data = [1u8, 2, 3, 4];
        assert!(matches!(pad_to(&data, 4), Cow::Borrowed(_)));

        let padded = pad_to(&data[..3], 16);
        assert_eq!(padded.len(), 16);
        assert_eq!(&padded[..3], &[1, 2, 3]);
        assert!(padded[3..].iter().all(|b| *b == 0));
    }

    #[test]
    fn buffer_over_device_limit_is_rejected() {
        let (device, queue) = noop_device();
        let pool = ResourcePool::new(&device, &queue);
        let max = device.limits().max_buffer_size;

        let err = pool.create_buffer(BufferKind::Storage, max + 16, "huge").unwrap_err();
        assert!(matches!(err, RenderError::ResourceCreation { label, .. } if label == "huge"));

        let ok = pool.create_buffer(BufferKind::Uniform, 20, "small").unwrap();
        assert_eq!(ok.size(), 32);
    }

    #[test]
    fn texture_over_device_limit_is_rejected() {
        let (device, queue) = noop_device();
        let pool = ResourcePool::new(&device, &queue);
        let width = device.limits().max_texture_dimension_2d + 1;
        let pixels = vec![0u8; width as usize * 4];

        let upload = TextureUpload::rgba8("wide", width, 1, &pixels).unwrap();
        assert!(matches!(
            pool.create_texture(&upload),
            Err(RenderError::ResourceCreation { label, .. }) if label == "wide"
        ));
    }

    #[test]
    fn texture_upload_creates_view_and_sampler() {
        let (device, queue) = noop_device();
        let pool = ResourcePool::new(&device, &queue);
        let pixels = vec![255u8; 4 * 4 * 4];
        let upload = TextureUpload::rgba8("white", 4, 4, &pixels).unwrap();

        let texture = pool.create_texture(&upload).unwrap();
        assert_eq!(texture.texture.width(), 4);
        assert_eq!(texture.texture.format(), wgpu::TextureFormat::Rgba8UnormSrgb);
    }

    #[test]
    fn uniform_blocks_must_be_word_sized() {
        let (device, queue) = noop_device();
        let pool = ResourcePool::new(&device, &queue);
        assert!(pool.create_uniform([0u8; 3], "odd").is_err());

        let block = pool.create_uniform([1.0f32, 2.0, 3.0], "vec3").unwrap();
        assert_eq!(block.buffer().size(), 16);
        assert_eq!(block.get(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn writes_past_the_end_fail() {
        let (device, queue) = noop_device();
        let pool = ResourcePool::new(&device, &queue);
        let buffer = pool.create_buffer(BufferKind::Vertex, 8, "vbo").unwrap();

        pool.write_buffer(&buffer, 0, &[0u8; 8]).unwrap();
        assert!(pool.write_buffer(&buffer, 4, &[0u8; 8]).is_err());
    }

    #[test]
    fn bind_groups_follow_the_declared_shape() {
        let (device, queue) = noop_device();
        let pool = ResourcePool::new(&device, &queue);
        let pipeline = scaled_pipeline(&device);
        let uniform = pool.create_uniform([0.0f32; 4], "scale").unwrap();

        pool.create_bind_group(
            &pipeline,
            0,
            &[(0, BindResource::Buffer(uniform.buffer()))],
            "ok",
        )
        .unwrap();

        let sampler = pool.create_sampler("s", wgpu::FilterMode::Nearest);
        assert!(matches!(
            pool.create_bind_group(&pipeline, 0, &[(0, BindResource::Sampler(&sampler))], "kind"),
            Err(RenderError::BindingMismatch { group: 0, .. })
        ));
        assert!(matches!(
            pool.create_bind_group(
                &pipeline,
                1,
                &[(0, BindResource::Buffer(uniform.buffer()))],
                "group"
            ),
            Err(RenderError::BindingMismatch { group: 1, .. })
        ));
        assert!(pool.create_bind_group(&pipeline, 0, &[], "missing").is_err());
    }
}
