use std::ops::{Deref, DerefMut};

use crate::caps::CapabilityTier;
use crate::driver::{BufferId, BufferTarget, Driver, TextureId, VertexArrayId};

/// Transient GPU state for a single draw.
///
/// Buffers uploaded through the scope, attribute slots it enabled, the
/// texture it bound and (on tiers that use them) its vertex array are all
/// released when the scope drops, whether the draw completed or bailed out
/// early with an error.
pub(crate) struct DrawScope<'d, D: Driver + ?Sized> {
    driver: &'d mut D,
    vertex_array: Option<VertexArrayId>,
    buffers: Vec<BufferId>,
    slots: Vec<u32>,
    bound_texture: bool,
}

impl<'d, D: Driver + ?Sized> DrawScope<'d, D> {
    /// Opens a scope, creating and binding a vertex array if `tier` uses them.
    pub(crate) fn begin(driver: &'d mut D, tier: CapabilityTier) -> Self {
        let vertex_array = tier.uses_vertex_arrays().then(|| {
            let vertex_array = driver.create_vertex_array();
            driver.bind_vertex_array(Some(vertex_array));
            vertex_array
        });

        Self {
            driver,
            vertex_array,
            buffers: Vec::new(),
            slots: Vec::new(),
            bound_texture: false,
        }
    }

    /// Uploads `data` and feeds it to attribute `slot`.
    pub(crate) fn attribute(&mut self, slot: u32, data: &[f32], components: u32) -> BufferId {
        let buffer = self.upload(BufferTarget::Vertex, bytemuck::cast_slice(data));
        self.driver.enable_attribute(slot, buffer, components);
        self.slots.push(slot);
        buffer
    }

    /// Uploads `indices` and binds them for indexed drawing.
    pub(crate) fn indices(&mut self, indices: &[u32]) -> BufferId {
        let buffer = self.upload(BufferTarget::Index, bytemuck::cast_slice(indices));
        self.driver.bind_index_buffer(buffer);
        buffer
    }

    pub(crate) fn bind_texture(&mut self, texture: TextureId) {
        self.driver.bind_texture(Some(texture));
        self.bound_texture = true;
    }

    fn upload(&mut self, target: BufferTarget, bytes: &[u8]) -> BufferId {
        let buffer = self.driver.create_buffer(target, bytes);
        self.buffers.push(buffer);
        buffer
    }
}

impl<D: Driver + ?Sized> Deref for DrawScope<'_, D> {
    type Target = D;

    fn deref(&self) -> &D {
        &*self.driver
    }
}

impl<D: Driver + ?Sized> DerefMut for DrawScope<'_, D> {
    fn deref_mut(&mut self) -> &mut D {
        &mut *self.driver
    }
}

impl<D: Driver + ?Sized> Drop for DrawScope<'_, D> {
    fn drop(&mut self) {
        for buffer in self.buffers.drain(..) {
            self.driver.delete_buffer(buffer);
        }
        for slot in self.slots.drain(..) {
            self.driver.disable_attribute(slot);
        }
        if self.bound_texture {
            self.driver.bind_texture(None);
        }
        if let Some(vertex_array) = self.vertex_array.take() {
            self.driver.bind_vertex_array(None);
            self.driver.delete_vertex_array(vertex_array);
        }
    }
}
