use bytemuck::Pod;

use super::GpuBuffer;

/// Host-side copy of a uniform value.
///
/// The mirror is the source of truth: it is written to the device and never
/// read back. It keeps the last value set until the next `set`.
#[derive(Debug, Copy, Clone)]
pub struct UniformMirror<T: Pod> {
    value: T,
    dirty: bool,
}

impl<T: Pod> UniformMirror<T> {
    pub fn new(value: T) -> Self {
        Self { value, dirty: true }
    }

    #[inline]
    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn set(&mut self, value: T) {
        self.value = value;
        self.dirty = true;
    }

    pub fn update(&mut self, f: impl FnOnce(&mut T)) {
        f(&mut self.value);
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.value)
    }

    /// Clears the dirty flag, returning whether it was set.
    pub(crate) fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

/// A uniform buffer paired with its host mirror.
#[derive(Debug)]
pub struct UniformBlock<T: Pod> {
    buffer: GpuBuffer,
    mirror: UniformMirror<T>,
}

impl<T: Pod> UniformBlock<T> {
    pub(crate) fn new(buffer: GpuBuffer, value: T) -> Self {
        Self {
            buffer,
            mirror: UniformMirror::new(value),
        }
    }

    pub fn buffer(&self) -> &GpuBuffer {
        &self.buffer
    }

    pub fn get(&self) -> &T {
        self.mirror.get()
    }

    pub fn set(&mut self, value: T) {
        self.mirror.set(value);
    }

    pub fn update(&mut self, f: impl FnOnce(&mut T)) {
        self.mirror.update(f);
    }

    pub fn mirror(&self) -> &UniformMirror<T> {
        &self.mirror
    }

    /// Queues an upload of the mirror if it changed since the last write.
    ///
    /// Returns whether a write was queued.
    pub fn write(&mut self, queue: &wgpu::Queue) -> bool {
        if !self.mirror.take_dirty() {
            return false;
        }
        queue.write_buffer(&self.buffer.raw, 0, self.mirror.bytes());
        true
    }
}
