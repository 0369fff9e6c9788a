use std::collections::HashMap;

use crate::driver::BufferId;
use crate::shader::ProgramKind;

/// Attribute slots a vertex array can hold.
pub(super) const MAX_ATTRIBUTES: usize = 4;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(super) struct Binding {
    pub buffer: BufferId,
    pub components: u32,
}

/// Attribute bindings plus index buffer: what a vertex-array object records.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub(super) struct AttributeState {
    slots: [Option<Binding>; MAX_ATTRIBUTES],
    pub index: Option<BufferId>,
}

impl AttributeState {
    /// Returns false when `slot` is out of range.
    pub fn enable(&mut self, slot: u32, buffer: BufferId, components: u32) -> bool {
        match self.slots.get_mut(slot as usize) {
            Some(entry) => {
                *entry = Some(Binding { buffer, components });
                true
            }
            None => false,
        }
    }

    pub fn disable(&mut self, slot: u32) {
        if let Some(entry) = self.slots.get_mut(slot as usize) {
            *entry = None;
        }
    }

    pub fn binding(&self, slot: u32) -> Option<Binding> {
        self.slots.get(slot as usize).copied().flatten()
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(super) enum DrawCall {
    Indexed(u32),
    Arrays(u32),
}

/// Where the data for one pipeline vertex buffer comes from.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(super) enum VertexSource {
    Bound(BufferId),
    /// Attribute not enabled: the shader reads zeros.
    Zeroed { size: u64 },
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub(super) struct DrawPlan {
    pub vertex_buffers: Vec<VertexSource>,
    pub index_buffer: Option<BufferId>,
}

/// Matches the enabled attributes against `kind`'s layout.
///
/// `Ok(None)` means there is nothing to draw. `Err` carries the message for
/// an `INVALID_OPERATION`.
pub(super) fn plan_draw(
    kind: ProgramKind,
    attributes: &AttributeState,
    buffer_len: impl Fn(BufferId) -> Option<u64>,
    call: DrawCall,
) -> Result<Option<DrawPlan>, String> {
    let count = match call {
        DrawCall::Indexed(n) | DrawCall::Arrays(n) => n,
    };
    if count == 0 {
        return Ok(None);
    }

    let mut bound = Vec::with_capacity(kind.attributes().len());
    let mut vertex_count: Option<u64> = None;
    for attribute in kind.attributes() {
        let Some(binding) = attributes.binding(attribute.slot) else {
            bound.push(None);
            continue;
        };
        if binding.components != attribute.components {
            return Err(format!(
                "attribute slot {} has {} components, {kind} program reads {}",
                attribute.slot, binding.components, attribute.components
            ));
        }
        let len = buffer_len(binding.buffer)
            .ok_or_else(|| format!("attribute slot {} reads a deleted buffer", attribute.slot))?;
        if len == 0 {
            bound.push(None);
            continue;
        }

        let stride = u64::from(attribute.components) * 4;
        vertex_count = Some(vertex_count.map_or(len / stride, |n| n.min(len / stride)));
        bound.push(Some(binding.buffer));
    }

    let Some(vertex_count) = vertex_count else {
        return Err(format!("{kind} draw with no vertex attributes enabled"));
    };
    if vertex_count == 0 {
        return Ok(None);
    }

    let index_buffer = match call {
        DrawCall::Indexed(_) => {
            let index = attributes
                .index
                .filter(|id| buffer_len(*id).is_some_and(|len| len >= u64::from(count) * 4))
                .ok_or_else(|| format!("indexed draw of {count} without a large enough index buffer"))?;
            Some(index)
        }
        DrawCall::Arrays(n) if u64::from(n) > vertex_count => {
            return Err(format!("draw of {n} vertices, only {vertex_count} bound"));
        }
        DrawCall::Arrays(_) => None,
    };

    let vertex_buffers = kind
        .attributes()
        .iter()
        .zip(bound)
        .map(|(attribute, buffer)| match buffer {
            Some(id) => VertexSource::Bound(id),
            None => VertexSource::Zeroed {
                size: vertex_count * u64::from(attribute.components) * 4,
            },
        })
        .collect();

    Ok(Some(DrawPlan {
        vertex_buffers,
        index_buffer,
    }))
}

pub(super) fn resolve_buffer(
    device: &wgpu::Device,
    buffers: &HashMap<BufferId, wgpu::Buffer>,
    source: &VertexSource,
) -> Option<wgpu::Buffer> {
    match source {
        VertexSource::Bound(id) => buffers.get(id).cloned(),
        // wgpu zero-initialises new buffers.
        VertexSource::Zeroed { size } => Some(device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tessel zeroed attribute"),
            size: *size,
            usage: wgpu::BufferUsages::VERTEX,
            mapped_at_creation: false,
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lens(entries: &[(u32, u64)]) -> impl Fn(BufferId) -> Option<u64> + '_ {
        move |id| entries.iter().find(|(raw, _)| *raw == id.0).map(|(_, len)| *len)
    }

    #[test]
    fn missing_uv_attribute_reads_zeros() {
        let mut attrs = AttributeState::default();
        attrs.enable(0, BufferId(1), 4);
        attrs.enable(1, BufferId(2), 3);
        attrs.index = Some(BufferId(3));

        let plan = plan_draw(
            ProgramKind::Geometry,
            &attrs,
            lens(&[(1, 8 * 16), (2, 8 * 12), (3, 36 * 4)]),
            DrawCall::Indexed(36),
        )
        .unwrap()
        .unwrap();

        assert_eq!(
            plan.vertex_buffers,
            vec![
                VertexSource::Bound(BufferId(1)),
                VertexSource::Bound(BufferId(2)),
                VertexSource::Zeroed { size: 8 * 8 },
            ]
        );
        assert_eq!(plan.index_buffer, Some(BufferId(3)));
    }

    #[test]
    fn indexed_draw_needs_index_buffer() {
        let mut attrs = AttributeState::default();
        attrs.enable(0, BufferId(1), 4);
        let err = plan_draw(ProgramKind::Geometry, &attrs, lens(&[(1, 64)]), DrawCall::Indexed(3))
            .unwrap_err();
        assert!(err.contains("index buffer"));
    }

    #[test]
    fn component_mismatch_is_rejected() {
        let mut attrs = AttributeState::default();
        attrs.enable(0, BufferId(1), 3);
        assert!(plan_draw(ProgramKind::Text, &attrs, lens(&[(1, 72)]), DrawCall::Arrays(6)).is_err());
    }

    #[test]
    fn nothing_enabled_is_rejected_and_empty_draw_is_skipped() {
        let attrs = AttributeState::default();
        assert!(plan_draw(ProgramKind::Text, &attrs, lens(&[]), DrawCall::Arrays(6)).is_err());
        assert_eq!(
            plan_draw(ProgramKind::Text, &attrs, lens(&[]), DrawCall::Arrays(0)),
            Ok(None)
        );
    }

    #[test]
    fn quad_draw_within_bounds() {
        let mut attrs = AttributeState::default();
        attrs.enable(0, BufferId(1), 4);
        attrs.enable(1, BufferId(2), 2);
        let ok = plan_draw(ProgramKind::Text, &attrs, lens(&[(1, 96), (2, 48)]), DrawCall::Arrays(6));
        assert!(matches!(ok, Ok(Some(_))));
        let too_many =
            plan_draw(ProgramKind::Text, &attrs, lens(&[(1, 96), (2, 48)]), DrawCall::Arrays(7));
        assert!(too_many.is_err());
    }

    #[test]
    fn out_of_range_slot_is_refused() {
        let mut attrs = AttributeState::default();
        assert!(!attrs.enable(MAX_ATTRIBUTES as u32, BufferId(1), 4));
        attrs.enable(2, BufferId(1), 2);
        attrs.disable(2);
        assert_eq!(attrs.binding(2), None);
    }
}
