//! Recording driver for tests.
//!
//! Simulates a capability set, journals every call and tracks which objects
//! are still alive so tests can assert on leaks and ordering.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use super::{
    BufferId, BufferTarget, Driver, DriverCaps, GpuError, GpuErrorCode, ProgramId, ShaderId,
    ShaderStage, TextureFormat, TextureId, TextureUpload, UniformLocation, VertexArrayId,
};
use crate::shader::ProgramKind;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    SetClearColor([f32; 4]),
    SetViewport(u32, u32),
    Clear,
    Present,
    CreateShader(ShaderStage, ShaderId),
    DeleteShader(ShaderId),
    LinkProgram(ProgramKind, ProgramId),
    DeleteProgram(ProgramId),
    UseProgram(Option<ProgramId>),
    SetUniform(&'static str, Vec<f32>),
    CreateBuffer(BufferTarget, BufferId, usize),
    DeleteBuffer(BufferId),
    BindIndexBuffer(BufferId),
    EnableAttribute(u32, BufferId, u32),
    DisableAttribute(u32),
    CreateVertexArray(VertexArrayId),
    BindVertexArray(Option<VertexArrayId>),
    DeleteVertexArray(VertexArrayId),
    CreateTexture(TextureId, u32, u32, TextureFormat),
    BindTexture(Option<TextureId>),
    DeleteTexture(TextureId),
    DrawIndexed(u32),
    DrawArrays(u32),
    ReleaseSurface,
    /// Pushed by test rasterizers when they are dropped.
    FontReleased,
}

pub(crate) type Journal = Rc<RefCell<Vec<Call>>>;

pub(crate) struct RecordingDriver {
    caps: DriverCaps,
    next_id: u32,
    journal: Journal,
    errors: VecDeque<GpuError>,

    pub(crate) compiled_sources: Vec<String>,
    /// Compilation fails for any source containing this marker.
    pub(crate) fail_compile_marker: Option<String>,
    /// Linking fails for this program kind.
    pub(crate) fail_link: Option<ProgramKind>,
    /// Queued into the error queue by the next draw call.
    pub(crate) errors_on_next_draw: Vec<GpuError>,
    /// Queued by the next successful link.
    pub(crate) errors_on_link: Vec<GpuError>,
    /// Reported by `drawable_size`.
    pub(crate) drawable: Option<(u32, u32)>,

    shaders: HashSet<ShaderId>,
    programs: HashMap<ProgramId, ProgramKind>,
    buffers: HashMap<BufferId, usize>,
    textures: HashSet<TextureId>,
    vertex_arrays: HashSet<VertexArrayId>,
    enabled_slots: HashSet<u32>,
    current_program: Option<ProgramId>,
    bound_texture: Option<TextureId>,
}

impl RecordingDriver {
    pub(crate) fn new(tier_a: bool, tier_b: bool) -> Self {
        Self {
            caps: DriverCaps {
                version: "recording driver 1.0".to_string(),
                tier_a,
                tier_b,
            },
            next_id: 0,
            journal: Rc::new(RefCell::new(Vec::new())),
            errors: VecDeque::new(),
            compiled_sources: Vec::new(),
            fail_compile_marker: None,
            fail_link: None,
            errors_on_next_draw: Vec::new(),
            errors_on_link: Vec::new(),
            drawable: None,
            shaders: HashSet::new(),
            programs: HashMap::new(),
            buffers: HashMap::new(),
            textures: HashSet::new(),
            vertex_arrays: HashSet::new(),
            enabled_slots: HashSet::new(),
            current_program: None,
            bound_texture: None,
        }
    }

    pub(crate) fn tier_a() -> Self {
        Self::new(true, true)
    }

    pub(crate) fn tier_b_only() -> Self {
        Self::new(false, true)
    }

    pub(crate) fn journal(&self) -> Journal {
        Rc::clone(&self.journal)
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.journal.borrow().clone()
    }

    pub(crate) fn clear_journal(&self) {
        self.journal.borrow_mut().clear();
    }

    pub(crate) fn queue_error(&mut self, code: GpuErrorCode) {
        self.errors.push_back(GpuError::new(code));
    }

    pub(crate) fn pending_errors(&self) -> usize {
        self.errors.len()
    }

    pub(crate) fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    pub(crate) fn live_textures(&self) -> usize {
        self.textures.len()
    }

    pub(crate) fn live_vertex_arrays(&self) -> usize {
        self.vertex_arrays.len()
    }

    pub(crate) fn live_programs(&self) -> usize {
        self.programs.len()
    }

    pub(crate) fn live_shaders(&self) -> usize {
        self.shaders.len()
    }

    pub(crate) fn enabled_slots(&self) -> usize {
        self.enabled_slots.len()
    }

    pub(crate) fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.journal.borrow().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.journal.borrow_mut().push(call);
    }

    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn uniform_name(&self, location: UniformLocation) -> Option<&'static str> {
        let kind = self.programs.get(&self.current_program?)?;
        kind.uniforms().get(location.0 as usize).map(|u| u.name)
    }

    fn set_uniform(&mut self, location: UniformLocation, value: &[f32]) {
        match self.uniform_name(location) {
            Some(name) => self.record(Call::SetUniform(name, value.to_vec())),
            None => self.errors.push_back(GpuError::new(GpuErrorCode::InvalidOperation)),
        }
    }

    fn draw(&mut self) {
        if self.current_program.is_none() {
            self.errors.push_back(GpuError::new(GpuErrorCode::InvalidOperation));
        }
        self.errors.extend(self.errors_on_next_draw.drain(..));
    }
}

impl Driver for RecordingDriver {
    fn caps(&self) -> &DriverCaps {
        &self.caps
    }

    fn drawable_size(&self) -> Option<(u32, u32)> {
        self.drawable
    }

    fn set_clear_color(&mut self, rgba: [f32; 4]) {
        self.record(Call::SetClearColor(rgba));
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.record(Call::SetViewport(width, height));
    }

    fn clear(&mut self) {
        self.record(Call::Clear);
    }

    fn present(&mut self) {
        self.record(Call::Present);
    }

    fn create_shader(&mut self, stage: ShaderStage, source: &str) -> Result<ShaderId, String> {
        if let Some(marker) = &self.fail_compile_marker {
            if source.contains(marker.as_str()) {
                return Err(format!("error: unexpected token `{marker}`"));
            }
        }
        let id = ShaderId(self.next());
        self.shaders.insert(id);
        self.compiled_sources.push(source.to_string());
        self.record(Call::CreateShader(stage, id));
        Ok(id)
    }

    fn delete_shader(&mut self, shader: ShaderId) {
        self.shaders.remove(&shader);
        self.record(Call::DeleteShader(shader));
    }

    fn link_program(
        &mut self,
        kind: ProgramKind,
        vertex: ShaderId,
        fragment: ShaderId,
    ) -> Result<ProgramId, String> {
        if self.fail_link == Some(kind) {
            return Err("error: vertex output `uv` not consumed".to_string());
        }
        if !self.shaders.contains(&vertex) || !self.shaders.contains(&fragment) {
            return Err("unknown shader object".to_string());
        }
        self.errors.extend(self.errors_on_link.drain(..));
        let id = ProgramId(self.next());
        self.programs.insert(id, kind);
        self.record(Call::LinkProgram(kind, id));
        Ok(id)
    }

    fn delete_program(&mut self, program: ProgramId) {
        self.programs.remove(&program);
        self.record(Call::DeleteProgram(program));
    }

    fn use_program(&mut self, program: Option<ProgramId>) {
        self.current_program = program;
        self.record(Call::UseProgram(program));
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        let kind = self.programs.get(&program)?;
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
        let id = BufferId(self.next());
        self.buffers.insert(id, data.len());
        self.record(Call::CreateBuffer(target, id, data.len()));
        id
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        if self.buffers.remove(&buffer).is_none() {
            self.errors.push_back(GpuError::new(GpuErrorCode::InvalidValue));
        }
        self.record(Call::DeleteBuffer(buffer));
    }

    fn bind_index_buffer(&mut self, buffer: BufferId) {
        self.record(Call::BindIndexBuffer(buffer));
    }

    fn enable_attribute(&mut self, slot: u32, buffer: BufferId, components: u32) {
        self.enabled_slots.insert(slot);
        self.record(Call::EnableAttribute(slot, buffer, components));
    }

    fn disable_attribute(&mut self, slot: u32) {
        self.enabled_slots.remove(&slot);
        self.record(Call::DisableAttribute(slot));
    }

    fn create_vertex_array(&mut self) -> VertexArrayId {
        let id = VertexArrayId(self.next());
        self.vertex_arrays.insert(id);
        self.record(Call::CreateVertexArray(id));
        id
    }

    fn bind_vertex_array(&mut self, vertex_array: Option<VertexArrayId>) {
        self.record(Call::BindVertexArray(vertex_array));
    }

    fn delete_vertex_array(&mut self, vertex_array: VertexArrayId) {
        self.vertex_arrays.remove(&vertex_array);
        self.record(Call::DeleteVertexArray(vertex_array));
    }

    fn create_texture(&mut self, upload: TextureUpload<'_>) -> TextureId {
        if upload.pixels.len() != (upload.width * upload.height * 4) as usize {
            self.errors.push_back(GpuError::new(GpuErrorCode::InvalidValue));
        }
        let id = TextureId(self.next());
        self.textures.insert(id);
        self.record(Call::CreateTexture(id, upload.width, upload.height, upload.format));
        id
    }

    fn bind_texture(&mut self, texture: Option<TextureId>) {
        self.bound_texture = texture;
        self.record(Call::BindTexture(texture));
    }

    fn delete_texture(&mut self, texture: TextureId) {
        self.textures.remove(&texture);
        self.record(Call::DeleteTexture(texture));
    }

    fn draw_indexed(&mut self, index_count: u32) {
        self.draw();
        self.record(Call::DrawIndexed(index_count));
    }

    fn draw_arrays(&mut self, vertex_count: u32) {
        self.draw();
        self.record(Call::DrawArrays(vertex_count));
    }

    fn pop_error(&mut self) -> Option<GpuError> {
        self.errors.pop_front()
    }

    fn release_surface(&mut self) {
        self.record(Call::ReleaseSurface);
    }
}
