use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};

use bytemuck::Pod;

use crate::error::{RenderError, Result};

use super::{BufferKind, GpuBuffer, ResourcePool};

/// CPU-side geometry: interleaved vertex bytes plus optional 32-bit indices.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    vertices: Vec<u8>,
    stride: u64,
    indices: Option<Vec<u32>>,
}

impl Geometry {
    /// Geometry whose stride is `size_of::<V>()`.
    pub fn from_vertices<V: Pod>(vertices: &[V]) -> Self {
        Self {
            vertices: bytemuck::cast_slice(vertices).to_vec(),
            stride: std::mem::size_of::<V>() as u64,
            indices: None,
        }
    }

    pub fn with_indices(mut self, indices: Vec<u32>) -> Self {
        self.indices = Some(indices);
        self
    }

    pub fn stride(&self) -> u64 {
        self.stride
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> u32 {
        if self.stride == 0 {
            return 0;
        }
        (self.vertices.len() as u64 / self.stride) as u32
    }

    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    pub fn index_count(&self) -> Option<u32> {
        self.indices.as_ref().map(|i| i.len() as u32)
    }

    /// Index data as uploaded (`Uint32`, 4 bytes per index).
    pub fn index_bytes(&self) -> &[u8] {
        self.indices
            .as_deref()
            .map(|i| bytemuck::cast_slice::<u32, u8>(i))
            .unwrap_or(&[])
    }

    pub fn content_hash(&self) -> u64 {
        let mut h = DefaultHasher::new();
        self.stride.hash(&mut h);
        self.vertices.hash(&mut h);
        self.indices.hash(&mut h);
        h.finish()
    }
}

/// Identity of a geometry in a [`GeometryPool`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct GeometryKey(pub u32);

/// What [`GeometryPool::upload`] did with a geometry.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Refresh {
    /// New buffers were allocated.
    Create,
    /// Contents changed and were written into the existing buffers.
    Rewrite,
    /// Contents unchanged; nothing was queued.
    Keep,
}

/// Buffers resident on the device for one geometry.
#[derive(Debug)]
pub struct GpuGeometry {
    pub vertex: GpuBuffer,
    pub index: Option<GpuBuffer>,
    pub vertex_count: u32,
    pub index_count: Option<u32>,
    pub stride: u64,
    hash: u64,
}

impl GpuGeometry {
    fn residency(&self) -> Residency {
        Residency {
            hash: self.hash,
            stride: self.stride,
            vertex_capacity: self.vertex.size(),
            index_capacity: self.index.as_ref().map(GpuBuffer::size),
        }
    }
}

#[derive(Debug, Copy, Clone)]
struct Residency {
    hash: u64,
    stride: u64,
    vertex_capacity: u64,
    index_capacity: Option<u64>,
}

fn plan_refresh(existing: Option<Residency>, geometry: &Geometry) -> Refresh {
    let Some(existing) = existing else {
        return Refresh::Create;
    };
    if existing.hash == geometry.content_hash() {
        return Refresh::Keep;
    }
    // A stride change never reuses buffers.
    if existing.stride != geometry.stride() {
        return Refresh::Create;
    }

    let vertex_fits = geometry.vertex_bytes().len() as u64 <= existing.vertex_capacity;
    let index_fits = match (existing.index_capacity, geometry.indices()) {
        (None, None) => true,
        (Some(cap), Some(_)) => geometry.index_bytes().len() as u64 <= cap,
        _ => false,
    };

    if vertex_fits && index_fits {
        Refresh::Rewrite
    } else {
        Refresh::Create
    }
}

/// Persistent geometry buffers keyed by [`GeometryKey`].
///
/// Uploading the same contents again is free; changed contents with the same
/// stride are written in place when they fit, otherwise the buffers are
/// replaced.
#[derive(Debug, Default)]
pub struct GeometryPool {
    entries: HashMap<GeometryKey, GpuGeometry>,
}

impl GeometryPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: GeometryKey) -> Option<&GpuGeometry> {
        self.entries.get(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn upload(
        &mut self,
        resources: &ResourcePool<'_>,
        key: GeometryKey,
        geometry: &Geometry,
    ) -> Result<Refresh> {
        let label = format!("geometry {}", key.0);
        if geometry.vertex_count() == 0 {
            return Err(RenderError::resource(label, "geometry has no vertices"));
        }

        let existing = self.entries.get(&key).map(GpuGeometry::residency);
        let refresh = plan_refresh(existing, geometry);

        match refresh {
            Refresh::Keep => {}
            Refresh::Rewrite => {
                if let Some(entry) = self.entries.get_mut(&key) {
                    resources.write_buffer(&entry.vertex, 0, geometry.vertex_bytes())?;
                    if let Some(index) = &entry.index {
                        resources.write_buffer(index, 0, geometry.index_bytes())?;
                    }
                    entry.vertex_count = geometry.vertex_count();
                    entry.index_count = geometry.index_count();
                    entry.hash = geometry.content_hash();
                }
            }
            Refresh::Create => {
                let vertex = resources.create_buffer_init(
                    BufferKind::Vertex,
                    geometry.vertex_bytes(),
                    &format!("{label} vbo"),
                )?;
                let index = match geometry.indices() {
                    Some(_) => Some(resources.create_buffer_init(
                        BufferKind::Index,
                        geometry.index_bytes(),
                        &format!("{label} ibo"),
                    )?),
                    None => None,
                };
                self.entries.insert(
                    key,
                    GpuGeometry {
                        vertex,
                        index,
                        vertex_count: geometry.vertex_count(),
                        index_count: geometry.index_count(),
                        stride: geometry.stride(),
                        hash: geometry.content_hash(),
                    },
                );
            }
        }

        log::trace!("{label}: {refresh:?}");
        Ok(refresh)
    }
}
