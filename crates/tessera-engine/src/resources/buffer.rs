use crate::error::{RenderError, Result};

/// Uniform buffer sizes are rounded up to this many bytes.
pub const UNIFORM_ALIGNMENT: u64 = 16;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferKind {
    Vertex,
    Index,
    Uniform,
    Storage,
}

impl BufferKind {
    /// Usage flags; every kind is writable from the queue.
    pub fn usage(self) -> wgpu::BufferUsages {
        let base = match self {
            BufferKind::Vertex => wgpu::BufferUsages::VERTEX,
            BufferKind::Index => wgpu::BufferUsages::INDEX,
            BufferKind::Uniform => wgpu::BufferUsages::UNIFORM,
            BufferKind::Storage => wgpu::BufferUsages::STORAGE,
        };
        base | wgpu::BufferUsages::COPY_DST
    }

    fn alignment(self) -> u64 {
        match self {
            BufferKind::Uniform => UNIFORM_ALIGNMENT,
            _ => wgpu::COPY_BUFFER_ALIGNMENT,
        }
    }
}

/// A buffer and the parameters it was created with.
#[derive(Debug)]
pub struct GpuBuffer {
    pub(crate) raw: wgpu::Buffer,
    kind: BufferKind,
    size: u64,
    label: String,
}

impl GpuBuffer {
    pub(crate) fn new(raw: wgpu::Buffer, kind: BufferKind, size: u64, label: String) -> Self {
        Self {
            raw,
            kind,
            size,
            label,
        }
    }

    pub fn raw(&self) -> &wgpu::Buffer {
        &self.raw
    }

    pub fn kind(&self) -> BufferKind {
        self.kind
    }

    /// Allocated size in bytes (after alignment).
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Rounds `requested` up to the kind's alignment. Zero is rejected.
///
/// An unaligned uniform size is not an error; the buffer just carries padding.
pub(crate) fn aligned_size(kind: BufferKind, requested: u64, label: &str) -> Result<u64> {
    if requested == 0 {
        return Err(RenderError::resource(label, "buffer size must be positive"));
    }
    let align = kind.alignment();
    Ok(requested.div_ceil(align) * align)
}

/// Rejects an aligned size above the device's `max_buffer_size`.
pub(crate) fn check_buffer_limit(size: u64, max: u64, label: &str) -> Result<()> {
    if size > max {
        return Err(RenderError::resource(
            label,
            format!("buffer of {size} bytes exceeds the device limit of {max} bytes"),
        ));
    }
    Ok(())
}

/// Validates a queued write of `len` bytes at `offset` into a buffer of `size` bytes.
pub(crate) fn check_write(size: u64, offset: u64, len: u64, label: &str) -> Result<()> {
    if offset % wgpu::COPY_BUFFER_ALIGNMENT != 0 {
        return Err(RenderError::resource(
            label,
            format!("write offset {offset} is not 4-byte aligned"),
        ));
    }
    let end = offset.saturating_add(len);
    if end > size {
        return Err(RenderError::resource(
            label,
            format!("write of {len} bytes at {offset} overflows buffer of {size} bytes"),
        ));
    }
    Ok(())
}
