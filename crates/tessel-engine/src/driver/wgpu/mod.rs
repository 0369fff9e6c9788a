//! wgpu implementation of [`Driver`].
//!
//! Immediate-mode calls are recorded as state (current program, attribute
//! bindings, bound texture, CPU-side uniform blocks) and turned into one
//! render pass per draw call. Validation errors reported by the device are
//! collected into the same queue [`Driver::pop_error`] drains.

mod pipeline;
mod state;

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::device::{Gpu, SurfaceErrorAction};
use crate::shader::ProgramKind;

use super::{
    BufferId, BufferTarget, Driver, DriverCaps, GpuError, GpuErrorCode, ProgramId, ShaderId,
    ShaderStage, TextureFormat, TextureId, TextureUpload, UniformLocation, VertexArrayId,
};
use pipeline::Layouts;
use state::{AttributeState, DrawCall};

type ErrorQueue = Arc<Mutex<VecDeque<GpuError>>>;

struct ShaderObject {
    stage: ShaderStage,
    module: wgpu::ShaderModule,
}

struct Program {
    kind: ProgramKind,
    pipeline: wgpu::RenderPipeline,
    /// CPU copy of the uniform block, uploaded on every draw.
    uniforms: Vec<u8>,
}

struct Texture {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

struct Frame {
    texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
}

/// Production [`Driver`] on top of wgpu.
pub struct WgpuDriver {
    // Resources first: they are dropped before the device inside `gpu`.
    frame: Option<Frame>,
    shaders: HashMap<ShaderId, ShaderObject>,
    programs: HashMap<ProgramId, Program>,
    buffers: HashMap<BufferId, wgpu::Buffer>,
    textures: HashMap<TextureId, Texture>,
    vertex_arrays: HashMap<VertexArrayId, AttributeState>,
    fallback_texture: wgpu::BindGroup,
    sampler: wgpu::Sampler,
    layouts: Layouts,

    gpu: Gpu,
    caps: DriverCaps,
    errors: ErrorQueue,
    next_id: u32,

    default_attributes: AttributeState,
    current_vertex_array: Option<VertexArrayId>,
    current_program: Option<ProgramId>,
    current_texture: Option<TextureId>,
    clear_color: wgpu::Color,
}

/// Reads the adapter's downlevel capabilities into the two shader tiers.
fn read_caps(adapter: &wgpu::Adapter) -> DriverCaps {
    let info = adapter.get_info();
    let downlevel = adapter.get_downlevel_capabilities();

    let (tier_a, tier_b) = match downlevel.shader_model {
        wgpu::ShaderModel::Sm5 => (downlevel.is_webgpu_compliant(), true),
        wgpu::ShaderModel::Sm2 => (false, false),
        _ => (false, true),
    };

    DriverCaps {
        version: format!(
            "{} ({:?}, {} {})",
            info.name, info.backend, info.driver, info.driver_info
        ),
        tier_a,
        tier_b,
    }
}

fn map_device_error(error: &wgpu::Error) -> GpuError {
    match error {
        wgpu::Error::OutOfMemory { .. } => GpuError::new(GpuErrorCode::OutOfMemory),
        wgpu::Error::Validation { description, .. } => {
            GpuError::with_detail(GpuErrorCode::InvalidOperation, description.clone())
        }
        other => GpuError::with_detail(GpuErrorCode::Unknown, other.to_string()),
    }
}

/// Device error handler that appends every uncaptured error to `queue`.
fn error_sink(queue: ErrorQueue) -> Arc<dyn wgpu::UncapturedErrorHandler> {
    Arc::new(move |e: wgpu::Error| {
        log::debug!("wgpu reported: {e}");
        queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(map_device_error(&e));
    })
}

/// Converts float RGBA to the bytes `format` stores.
fn texel_bytes(format: TextureFormat, pixels: &[f32]) -> Vec<u8> {
    match format {
        TextureFormat::Rgba32Float => bytemuck::cast_slice(pixels).to_vec(),
        TextureFormat::Rgba8Unorm => pixels
            .iter()
            .map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
            .collect(),
    }
}

fn wgpu_format(format: TextureFormat) -> (wgpu::TextureFormat, u32) {
    match format {
        TextureFormat::Rgba32Float => (wgpu::TextureFormat::Rgba32Float, 16),
        TextureFormat::Rgba8Unorm => (wgpu::TextureFormat::Rgba8Unorm, 4),
    }
}

impl WgpuDriver {
    pub fn new(gpu: Gpu) -> Self {
        let errors: ErrorQueue = Arc::new(Mutex::new(VecDeque::new()));
        gpu.device().on_uncaptured_error(error_sink(Arc::clone(&errors)));

        let caps = read_caps(gpu.adapter());
        let layouts = Layouts::new(gpu.device());
        let sampler = pipeline::create_sampler(gpu.device());

        Self {
            frame: None,
            shaders: HashMap::new(),
            programs: HashMap::new(),
            buffers: HashMap::new(),
            textures: HashMap::new(),
            vertex_arrays: HashMap::new(),
            fallback_texture: Self::placeholder_bind_group(&gpu, &layouts, &sampler),
            sampler,
            layouts,
            gpu,
            caps,
            errors,
            next_id: 0,
            default_attributes: AttributeState::default(),
            current_vertex_array: None,
            current_program: None,
            current_texture: None,
            clear_color: wgpu::Color::BLACK,
        }
    }

    pub fn gpu(&self) -> &Gpu {
        &self.gpu
    }

    pub fn gpu_mut(&mut self) -> &mut Gpu {
        &mut self.gpu
    }

    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn queue(&self) -> std::sync::MutexGuard<'_, VecDeque<GpuError>> {
        self.errors.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push_error(&self, code: GpuErrorCode, detail: impl Into<String>) {
        self.queue().push_back(GpuError::with_detail(code, detail));
    }

    /// Runs `f` and returns the device errors it raised, removing them from
    /// the queue.
    fn capture<T>(&self, f: impl FnOnce() -> T) -> (T, Vec<GpuError>) {
        let before = self.queue().len();
        let value = f();
        let mut queue = self.queue();
        let split = before.min(queue.len());
        let raised = queue.drain(split..).collect();
        (value, raised)
    }

    /// 1x1 opaque white, sampled when no texture is bound.
    fn placeholder_bind_group(gpu: &Gpu, layouts: &Layouts, sampler: &wgpu::Sampler) -> wgpu::BindGroup {
        let texture = gpu.device().create_texture(&wgpu::TextureDescriptor {
            label: Some("tessel placeholder texture"),
            size: wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        gpu.queue().write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &[255, 255, 255, 255],
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4),
                rows_per_image: Some(1),
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self::texture_bind_group(gpu.device(), layouts, sampler, &view)
    }

    fn texture_bind_group(
        device: &wgpu::Device,
        layouts: &Layouts,
        sampler: &wgpu::Sampler,
        view: &wgpu::TextureView,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessel texture bind group"),
            layout: &layouts.texture,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    fn attributes(&self) -> &AttributeState {
        self.current_vertex_array
            .and_then(|id| self.vertex_arrays.get(&id))
            .unwrap_or(&self.default_attributes)
    }

    fn attributes_mut(&mut self) -> &mut AttributeState {
        match self.current_vertex_array {
            Some(id) if self.vertex_arrays.contains_key(&id) => {
                self.vertex_arrays.entry(id).or_default()
            }
            _ => &mut self.default_attributes,
        }
    }

    /// Acquires the surface texture for the current frame if not held yet.
    fn ensure_frame(&mut self) -> bool {
        if self.frame.is_some() {
            return true;
        }
        match self.gpu.acquire() {
            Ok(texture) => {
                let view = texture
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                self.frame = Some(Frame { texture, view });
                true
            }
            Err(SurfaceErrorAction::Fatal) => {
                self.push_error(GpuErrorCode::OutOfMemory, "surface ran out of memory");
                false
            }
            Err(_) => false,
        }
    }

    fn set_uniform(&mut self, location: UniformLocation, value: &[f32]) {
        let Some(program) = self.current_program.and_then(|id| self.programs.get_mut(&id)) else {
            self.push_error(GpuErrorCode::InvalidOperation, "uniform set without a program in use");
            return;
        };

        let bytes: &[u8] = bytemuck::cast_slice(value);
        match program.kind.uniforms().get(location.0 as usize) {
            Some(slot) if slot.size as usize == bytes.len() => {
                let start = slot.offset as usize;
                program.uniforms[start..start + bytes.len()].copy_from_slice(bytes);
            }
            Some(slot) => {
                let detail = format!("uniform {} takes {} bytes, got {}", slot.name, slot.size, bytes.len());
                self.push_error(GpuErrorCode::InvalidOperation, detail);
            }
            None => self.push_error(GpuErrorCode::InvalidOperation, "unknown uniform location"),
        }
    }

    fn draw(&mut self, call: DrawCall) {
        let Some(program) = self.current_program.and_then(|id| self.programs.get(&id)) else {
            self.push_error(GpuErrorCode::InvalidOperation, "draw without a program in use");
            return;
        };

        let buffer_len = |id: BufferId| self.buffers.get(&id).map(wgpu::Buffer::size);
        let plan = match state::plan_draw(program.kind, self.attributes(), buffer_len, call) {
            Ok(Some(plan)) => plan,
            Ok(None) => return,
            Err(detail) => {
                self.push_error(GpuErrorCode::InvalidOperation, detail);
                return;
            }
        };

        let device = self.gpu.device();
        let pipeline = program.pipeline.clone();
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tessel uniforms"),
            contents: &program.uniforms,
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let uniforms = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessel uniforms bind group"),
            layout: &self.layouts.uniforms,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let texture = self
            .current_texture
            .and_then(|id| self.textures.get(&id))
            .map_or_else(|| self.fallback_texture.clone(), |t| t.bind_group.clone());

        let Some(vertex_buffers) = plan
            .vertex_buffers
            .iter()
            .map(|source| state::resolve_buffer(device, &self.buffers, source))
            .collect::<Option<Vec<wgpu::Buffer>>>()
        else {
            return;
        };

        if !self.ensure_frame() {
            return;
        }
        let Some(frame) = self.frame.as_ref() else {
            return;
        };

        let device = self.gpu.device();
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("tessel draw encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("tessel draw pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.gpu.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            pass.set_pipeline(&pipeline);
            pass.set_bind_group(0, &uniforms, &[]);
            pass.set_bind_group(1, &texture, &[]);
            for (slot, buffer) in vertex_buffers.iter().enumerate() {
                pass.set_vertex_buffer(slot as u32, buffer.slice(..));
            }

            match (call, plan.index_buffer.and_then(|id| self.buffers.get(&id))) {
                (DrawCall::Indexed(count), Some(index)) => {
                    pass.set_index_buffer(index.slice(..), wgpu::IndexFormat::Uint32);
                    pass.draw_indexed(0..count, 0, 0..1);
                }
                (DrawCall::Arrays(count), _) => pass.draw(0..count, 0..1),
                // plan_draw rejects indexed draws without an index buffer.
                (DrawCall::Indexed(_), None) => {}
            }
        }
        self.gpu.queue().submit(std::iter::once(encoder.finish()));
    }
}

impl Driver for WgpuDriver {
    fn caps(&self) -> &DriverCaps {
        &self.caps
    }

    fn drawable_size(&self) -> Option<(u32, u32)> {
        let size = self.gpu.size();
        (size.width > 0 && size.height > 0).then_some((size.width, size.height))
    }

    fn set_clear_color(&mut self, [r, g, b, a]: [f32; 4]) {
        self.clear_color = wgpu::Color {
            r: r.into(),
            g: g.into(),
            b: b.into(),
            a: a.into(),
        };
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        // A held surface texture belongs to the old configuration.
        self.frame = None;
        self.gpu.resize(PhysicalSize::new(width, height));
    }

    fn clear(&mut self) {
        if !self.ensure_frame() {
            return;
        }
        let Some(frame) = self.frame.as_ref() else {
            return;
        };

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("tessel clear encoder"),
            });
        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("tessel clear pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.gpu.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }
        self.gpu.queue().submit(std::iter::once(encoder.finish()));
    }

    fn present(&mut self) {
        let Some(frame) = self.frame.take() else {
            log::trace!("present with nothing drawn this frame");
            return;
        };
        if let Some(window) = self.gpu.window() {
            window.pre_present_notify();
        }
        drop(frame.view);
        frame.texture.present();
    }

    fn create_shader(&mut self, stage: ShaderStage, source: &str) -> Result<ShaderId, String> {
        let device = self.gpu.device();
        let (module, raised) = self.capture(|| {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(stage.name()),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            })
        });
        if !raised.is_empty() {
            return Err(error_log(&raised));
        }

        let id = ShaderId(self.next());
        self.shaders.insert(id, ShaderObject { stage, module });
        Ok(id)
    }

    fn delete_shader(&mut self, shader: ShaderId) {
        if self.shaders.remove(&shader).is_none() {
            self.push_error(GpuErrorCode::InvalidValue, format!("no shader {}", shader.raw()));
        }
    }

    fn link_program(
        &mut self,
        kind: ProgramKind,
        vertex: ShaderId,
        fragment: ShaderId,
    ) -> Result<ProgramId, String> {
        let (Some(vs), Some(fs)) = (self.shaders.get(&vertex), self.shaders.get(&fragment)) else {
            return Err("unknown shader object".to_string());
        };
        if vs.stage != ShaderStage::Vertex || fs.stage != ShaderStage::Fragment {
            return Err("program needs one vertex and one fragment shader".to_string());
        }

        let color_format = self.gpu.surface_format();
        let (pipeline, raised) = self.capture(|| {
            pipeline::create_pipeline(
                self.gpu.device(),
                &self.layouts,
                kind,
                &vs.module,
                &fs.module,
                color_format,
            )
        });
        if !raised.is_empty() {
            return Err(error_log(&raised));
        }

        let id = ProgramId(self.next());
        self.programs.insert(
            id,
            Program {
                kind,
                pipeline,
                uniforms: vec![0; kind.uniform_block_size() as usize],
            },
        );
        Ok(id)
    }

    fn delete_program(&mut self, program: ProgramId) {
        if self.programs.remove(&program).is_none() {
            self.push_error(GpuErrorCode::InvalidValue, format!("no program {}", program.raw()));
        }
        if self.current_program == Some(program) {
            self.current_program = None;
        }
    }

    fn use_program(&mut self, program: Option<ProgramId>) {
        if let Some(id) = program {
            if !self.programs.contains_key(&id) {
                self.push_error(GpuErrorCode::InvalidValue, format!("no program {}", id.raw()));
                return;
            }
        }
        self.current_program = program;
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        let kind = self.programs.get(&program)?.kind;
        kind.uniform(name).map(|(i, _)| UniformLocation(i as u32))
    }

    fn set_uniform_mat4(&mut self, location: UniformLocation, value: &[f32; 16]) {
        self.set_uniform(location, value);
    }

    fn set_uniform_vec4(&mut self, location: UniformLocation, value: [f32; 4]) {
        self.set_uniform(location, &value);
    }

    fn set_uniform_vec3(&mut self, location: UniformLocation, value: [f32; 3]) {
        self.set_uniform(location, &value);
    }

    fn create_buffer(&mut self, target: BufferTarget, data: &[u8]) -> BufferId {
        let usage = match target {
            BufferTarget::Vertex => wgpu::BufferUsages::VERTEX,
            BufferTarget::Index => wgpu::BufferUsages::INDEX,
        };
        let buffer = self
            .gpu
            .device()
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("tessel buffer"),
                contents: data,
                usage,
            });
        let id = BufferId(self.next());
        self.buffers.insert(id, buffer);
        id
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        match self.buffers.remove(&buffer) {
            Some(b) => b.destroy(),
            None => self.push_error(GpuErrorCode::InvalidValue, format!("no buffer {}", buffer.raw())),
        }
    }

    fn bind_index_buffer(&mut self, buffer: BufferId) {
        self.attributes_mut().index = Some(buffer);
    }

    fn enable_attribute(&mut self, slot: u32, buffer: BufferId, components: u32) {
        if !(1..=4).contains(&components) {
            self.push_error(GpuErrorCode::InvalidValue, format!("{components} components per vertex"));
            return;
        }
        if !self.attributes_mut().enable(slot, buffer, components) {
            self.push_error(GpuErrorCode::InvalidValue, format!("attribute slot {slot} out of range"));
        }
    }

    fn disable_attribute(&mut self, slot: u32) {
        self.attributes_mut().disable(slot);
    }

    fn create_vertex_array(&mut self) -> VertexArrayId {
        let id = VertexArrayId(self.next());
        self.vertex_arrays.insert(id, AttributeState::default());
        id
    }

    fn bind_vertex_array(&mut self, vertex_array: Option<VertexArrayId>) {
        if let Some(id) = vertex_array {
            if !self.vertex_arrays.contains_key(&id) {
                self.push_error(GpuErrorCode::InvalidOperation, format!("no vertex array {}", id.raw()));
                return;
            }
        }
        self.current_vertex_array = vertex_array;
    }

    fn delete_vertex_array(&mut self, vertex_array: VertexArrayId) {
        self.vertex_arrays.remove(&vertex_array);
        if self.current_vertex_array == Some(vertex_array) {
            self.current_vertex_array = None;
        }
    }

    fn create_texture(&mut self, upload: TextureUpload<'_>) -> TextureId {
        let (format, bytes_per_texel) = wgpu_format(upload.format);
        let (width, height) = (upload.width.max(1), upload.height.max(1));
        let expected = width as usize * height as usize * 4;

        let texels = if upload.pixels.len() == expected {
            texel_bytes(upload.format, upload.pixels)
        } else {
            self.push_error(
                GpuErrorCode::InvalidValue,
                format!(
                    "{} floats for a {width}x{height} texture, expected {expected}",
                    upload.pixels.len()
                ),
            );
            vec![0; expected / 4 * bytes_per_texel as usize]
        };

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let device = self.gpu.device();
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("tessel texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        self.gpu.queue().write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &texels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * bytes_per_texel),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = Self::texture_bind_group(device, &self.layouts, &self.sampler, &view);

        let id = TextureId(self.next());
        self.textures.insert(
            id,
            Texture {
                _texture: texture,
                bind_group,
            },
        );
        id
    }

    fn bind_texture(&mut self, texture: Option<TextureId>) {
        self.current_texture = texture;
    }

    fn delete_texture(&mut self, texture: TextureId) {
        if self.textures.remove(&texture).is_none() {
            self.push_error(GpuErrorCode::InvalidValue, format!("no texture {}", texture.raw()));
        }
        if self.current_texture == Some(texture) {
            self.current_texture = None;
        }
    }

    fn draw_indexed(&mut self, index_count: u32) {
        self.draw(DrawCall::Indexed(index_count));
    }

    fn draw_arrays(&mut self, vertex_count: u32) {
        self.draw(DrawCall::Arrays(vertex_count));
    }

    fn pop_error(&mut self) -> Option<GpuError> {
        self.queue().pop_front()
    }

    fn release_surface(&mut self) {
        self.frame = None;
        self.gpu.release_surface();
    }
}

fn error_log(errors: &[GpuError]) -> String {
    errors
        .iter()
        .map(|e| e.detail.clone().unwrap_or_else(|| e.to_string()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unorm_texels_are_quantized_and_clamped() {
        let bytes = texel_bytes(TextureFormat::Rgba8Unorm, &[0.0, 0.5, 1.0, 2.0]);
        assert_eq!(bytes, vec![0, 128, 255, 255]);
    }

    #[test]
    fn float_texels_are_passed_through() {
        let bytes = texel_bytes(TextureFormat::Rgba32Float, &[0.25, 0.5, 0.75, 1.0]);
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[..4], &0.25f32.to_ne_bytes());
    }

    #[test]
    fn uncaptured_errors_land_in_the_queue_in_order() {
        let queue: ErrorQueue = Arc::new(Mutex::new(VecDeque::new()));
        let sink = error_sink(Arc::clone(&queue));

        sink(wgpu::Error::Validation {
            source: Box::new(std::io::Error::other("bad binding")),
            description: "binding 0 is not a uniform buffer".to_string(),
        });
        sink(wgpu::Error::OutOfMemory {
            source: Box::new(std::io::Error::other("oom")),
        });

        let drained: Vec<GpuError> = queue.lock().unwrap().drain(..).collect();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].code, GpuErrorCode::InvalidOperation);
        assert_eq!(drained[0].detail.as_deref(), Some("binding 0 is not a uniform buffer"));
        assert_eq!(drained[1].code, GpuErrorCode::OutOfMemory);
    }

    #[test]
    fn compile_log_joins_details() {
        let log = error_log(&[
            GpuError::with_detail(GpuErrorCode::InvalidOperation, "error: expected `;`"),
            GpuError::new(GpuErrorCode::OutOfMemory),
        ]);
        assert!(log.starts_with("error: expected `;`\n"));
        assert!(log.contains("OUT_OF_MEMORY"));
    }
}
