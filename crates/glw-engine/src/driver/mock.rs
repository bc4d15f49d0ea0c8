//! Recording driver for unit tests.
//!
//! Keeps just enough state to behave like a GL 3.3 core context for the paths
//! this crate exercises: object names, buffer storage, level-0 texture images,
//! per-unit texture bindings, a configurable shader interface and a sticky
//! error flag. Every call is logged by name; uploads, attribute pointers and
//! draws are logged with their arguments.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use super::{ActiveVariable, Driver, ProgramBinary, RawName};

/// Binary format the mock produces and accepts.
pub(crate) const BINARY_FORMAT: u32 = 0xB1_0001;
const BINARY_MAGIC: &[u8] = b"mock-program";

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Upload {
    pub entry: &'static str,
    pub location: u32,
    pub words: Vec<u32>,
}

impl Upload {
    pub fn floats(&self) -> Vec<f32> {
        self.words.iter().map(|w| f32::from_bits(*w)).collect()
    }

    pub fn ints(&self) -> Vec<i32> {
        self.words.iter().map(|w| *w as i32).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Pointer {
    pub index: u32,
    pub size: i32,
    pub data_type: u32,
    pub integer: bool,
    pub stride: i32,
    pub offset: i32,
    pub buffer: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Draw {
    pub mode: u32,
    pub first_or_offset: i32,
    pub count: i32,
    pub element_type: Option<u32>,
    pub program: Option<u32>,
}

#[derive(Debug, Clone)]
struct Variable {
    name: String,
    gl_type: u32,
    size: i32,
    location: Option<u32>,
}

#[derive(Debug, Clone, Default)]
struct Image {
    size: [i32; 3],
    bytes_per_pixel: usize,
    data: Vec<u8>,
}

#[derive(Default)]
struct State {
    live: HashSet<u32>,
    fail_creation: bool,

    calls: Vec<&'static str>,
    uploads: Vec<Upload>,
    pointers: Vec<Pointer>,
    draws: Vec<Draw>,

    error: u32,
    fail_on: HashMap<&'static str, u32>,
    parameters: HashMap<u32, i32>,

    buffers: HashMap<u32, (Vec<u8>, u32)>,
    bound_buffers: HashMap<u32, u32>,

    active_unit: u32,
    unit_textures: HashMap<(u32, u32), u32>,
    unit_samplers: HashMap<u32, u32>,
    images: HashMap<u32, Image>,
    sampler_params: HashMap<u32, HashMap<u32, i32>>,

    shader_stages: HashMap<u32, u32>,
    compiled: HashSet<u32>,
    compile_errors: HashMap<u32, String>,
    link_error: Option<String>,
    linked: HashSet<u32>,
    attached: HashMap<u32, Vec<u32>>,
    binaries: HashMap<u32, ProgramBinary>,
    binary_logs: HashMap<u32, String>,
    retrievable: HashSet<u32>,
    no_binary_formats: bool,
    attributes: Vec<Variable>,
    uniforms: Vec<Variable>,
    next_attribute_location: u32,
    next_uniform_location: u32,

    program: Option<u32>,
    vertex_array: Option<u32>,
    enabled_arrays: HashSet<u32>,
}

impl State {
    fn record(&mut self, call: &'static str) {
        self.calls.push(call);
        if let Some(code) = self.fail_on.remove(call) {
            self.raise(code);
        }
    }

    /// GL keeps the first error until it is queried.
    fn raise(&mut self, code: u32) {
        if self.error == glow::NO_ERROR {
            self.error = code;
        }
    }

    fn create(&mut self, call: &'static str) -> Result<RawName, String> {
        self.record(call);
        if self.fail_creation {
            return Err("out of object names".into());
        }
        // Drivers hand out the lowest free name, so deleted names come back.
        let name = (1..).find(|n| !self.live.contains(n)).unwrap_or(0);
        self.live.insert(name);
        RawName::new(name).ok_or_else(|| "name counter wrapped".to_string())
    }

    fn delete(&mut self, call: &'static str, name: RawName) {
        self.record(call);
        assert!(
            self.live.remove(&name.get()),
            "{call}: object {name} released twice or never created"
        );
    }

    fn bound_texture(&self, target: u32) -> Option<u32> {
        self.unit_textures.get(&(self.active_unit, target)).copied()
    }

    fn upload(&mut self, entry: &'static str, location: u32, words: Vec<u32>) {
        self.record(entry);
        if self.program.is_none() {
            self.raise(glow::INVALID_OPERATION);
            return;
        }
        self.uploads.push(Upload {
            entry,
            location,
            words,
        });
    }

    fn reported_name(v: &Variable) -> String {
        if v.size > 1 {
            format!("{}[0]", v.name)
        } else {
            v.name.clone()
        }
    }

    fn is_linked(&self, program: RawName) -> bool {
        self.linked.contains(&program.get())
    }
}

fn channels(format: u32) -> usize {
    match format {
        glow::RG | glow::RG_INTEGER => 2,
        glow::RGB | glow::BGR | glow::RGB_INTEGER => 3,
        glow::RGBA | glow::BGRA | glow::RGBA_INTEGER => 4,
        _ => 1,
    }
}

fn type_width(ty: u32) -> usize {
    match ty {
        glow::UNSIGNED_SHORT | glow::SHORT | glow::HALF_FLOAT => 2,
        glow::UNSIGNED_INT | glow::INT | glow::FLOAT => 4,
        glow::DOUBLE => 8,
        _ => 1,
    }
}

pub(crate) struct MockDriver {
    state: RefCell<State>,
}

impl MockDriver {
    pub fn new() -> Self {
        let mut state = State::default();
        state
            .parameters
            .insert(glow::MAX_COMBINED_TEXTURE_IMAGE_UNITS, 16);
        Self {
            state: RefCell::new(state),
        }
    }

    // ── configuration ─────────────────────────────────────────────────────

    /// Declares an active attribute; locations are handed out in order and
    /// matrices take one location per column.
    pub fn with_attribute(self, name: &str, gl_type: u32, size: i32) -> Self {
        {
            let mut s = self.state.borrow_mut();
            let columns = match gl_type {
                glow::FLOAT_MAT2 => 2,
                glow::FLOAT_MAT3 => 3,
                glow::FLOAT_MAT4 => 4,
                _ => 1,
            };
            let location = s.next_attribute_location;
            s.next_attribute_location += columns * size as u32;
            s.attributes.push(Variable {
                name: name.into(),
                gl_type,
                size,
                location: Some(location),
            });
        }
        self
    }

    /// Declares an active built-in input (`gl_VertexID`, ...), which has no
    /// location.
    pub fn with_builtin_attribute(self, name: &str, gl_type: u32) -> Self {
        self.state.borrow_mut().attributes.push(Variable {
            name: name.into(),
            gl_type,
            size: 1,
            location: None,
        });
        self
    }

    pub fn with_uniform(self, name: &str, gl_type: u32, size: i32) -> Self {
        self.add_uniform(name, gl_type, size);
        self
    }

    /// Declares a uniform for programs linked from now on.
    pub fn add_uniform(&self, name: &str, gl_type: u32, size: i32) {
        let mut s = self.state.borrow_mut();
        let location = s.next_uniform_location;
        s.next_uniform_location += size as u32;
        s.uniforms.push(Variable {
            name: name.into(),
            gl_type,
            size,
            location: Some(location),
        });
    }

    /// Forgets the declared attributes and uniforms.
    pub fn clear_interface(&self) {
        let mut s = self.state.borrow_mut();
        s.attributes.clear();
        s.uniforms.clear();
        s.next_attribute_location = 0;
        s.next_uniform_location = 0;
    }

    /// Declares a uniform-block member, which is active but has no location.
    pub fn with_block_uniform(self, name: &str, gl_type: u32) -> Self {
        self.state.borrow_mut().uniforms.push(Variable {
            name: name.into(),
            gl_type,
            size: 1,
            location: None,
        });
        self
    }

    pub fn with_compile_error(self, stage: u32, log: &str) -> Self {
        self.state
            .borrow_mut()
            .compile_errors
            .insert(stage, log.into());
        self
    }

    pub fn with_link_error(self, log: &str) -> Self {
        self.state.borrow_mut().link_error = Some(log.into());
        self
    }

    /// Reports zero program binary formats.
    pub fn without_binary_formats(self) -> Self {
        self.state.borrow_mut().no_binary_formats = true;
        self
    }

    pub fn with_parameter(self, parameter: u32, value: i32) -> Self {
        self.state.borrow_mut().parameters.insert(parameter, value);
        self
    }

    /// Makes the next call to `call` raise `code`.
    pub fn fail_next(&self, call: &'static str, code: u32) {
        self.state.borrow_mut().fail_on.insert(call, code);
    }

    pub fn fail_creation(&self) {
        self.state.borrow_mut().fail_creation = true;
    }

    pub fn clear_link_error(&self) {
        self.state.borrow_mut().link_error = None;
    }

    // ── inspection ────────────────────────────────────────────────────────

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.borrow().calls.clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.state.borrow().calls.iter().filter(|c| **c == call).count()
    }

    /// Forgets recorded calls, uploads, pointers and draws.
    pub fn clear_log(&self) {
        let mut s = self.state.borrow_mut();
        s.calls.clear();
        s.uploads.clear();
        s.pointers.clear();
        s.draws.clear();
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.state.borrow().uploads.clone()
    }

    pub fn pointers(&self) -> Vec<Pointer> {
        self.state.borrow().pointers.clone()
    }

    pub fn draws(&self) -> Vec<Draw> {
        self.state.borrow().draws.clone()
    }

    pub fn is_live(&self, name: RawName) -> bool {
        self.state.borrow().live.contains(&name.get())
    }

    pub fn live_objects(&self) -> usize {
        self.state.borrow().live.len()
    }

    pub fn pending_error(&self) -> u32 {
        self.state.borrow().error
    }

    pub fn current_program(&self) -> Option<u32> {
        self.state.borrow().program
    }

    pub fn texture_on_unit(&self, unit: u32, target: u32) -> Option<u32> {
        self.state
            .borrow()
            .unit_textures
            .get(&(unit, target))
            .copied()
    }

    pub fn sampler_on_unit(&self, unit: u32) -> Option<u32> {
        self.state.borrow().unit_samplers.get(&unit).copied()
    }

    pub fn sampler_parameter(&self, sampler: RawName, parameter: u32) -> Option<i32> {
        self.state
            .borrow()
            .sampler_params
            .get(&sampler.get())
            .and_then(|p| p.get(&parameter))
            .copied()
    }

    pub fn is_retrievable(&self, program: RawName) -> bool {
        self.state.borrow().retrievable.contains(&program.get())
    }

    pub fn is_array_enabled(&self, index: u32) -> bool {
        self.state.borrow().enabled_arrays.contains(&index)
    }
}

impl Driver for MockDriver {
    // ── state queries ─────────────────────────────────────────────────────

    fn get_error(&self) -> u32 {
        std::mem::replace(&mut self.state.borrow_mut().error, glow::NO_ERROR)
    }

    fn get_parameter_i32(&self, parameter: u32) -> i32 {
        let mut s = self.state.borrow_mut();
        s.record("get_parameter_i32");
        s.parameters.get(&parameter).copied().unwrap_or(0)
    }

    // ── object lifetime ───────────────────────────────────────────────────

    fn create_buffer(&self) -> Result<RawName, String> {
        self.state.borrow_mut().create("create_buffer")
    }

    fn delete_buffer(&self, buffer: RawName) {
        let mut s = self.state.borrow_mut();
        s.delete("delete_buffer", buffer);
        s.buffers.remove(&buffer.get());
        s.bound_buffers.retain(|_, b| *b != buffer.get());
    }

    fn create_texture(&self) -> Result<RawName, String> {
        self.state.borrow_mut().create("create_texture")
    }

    fn delete_texture(&self, texture: RawName) {
        let mut s = self.state.borrow_mut();
        s.delete("delete_texture", texture);
        s.images.remove(&texture.get());
        s.unit_textures.retain(|_, t| *t != texture.get());
    }

    fn create_sampler(&self) -> Result<RawName, String> {
        self.state.borrow_mut().create("create_sampler")
    }

    fn delete_sampler(&self, sampler: RawName) {
        let mut s = self.state.borrow_mut();
        s.delete("delete_sampler", sampler);
        s.sampler_params.remove(&sampler.get());
        s.unit_samplers.retain(|_, t| *t != sampler.get());
    }

    fn create_shader(&self, stage: u32) -> Result<RawName, String> {
        let mut s = self.state.borrow_mut();
        let name = s.create("create_shader")?;
        s.shader_stages.insert(name.get(), stage);
        Ok(name)
    }

    fn delete_shader(&self, shader: RawName) {
        let mut s = self.state.borrow_mut();
        s.delete("delete_shader", shader);
        s.shader_stages.remove(&shader.get());
        s.compiled.remove(&shader.get());
    }

    fn create_program(&self) -> Result<RawName, String> {
        self.state.borrow_mut().create("create_program")
    }

    fn delete_program(&self, program: RawName) {
        let mut s = self.state.borrow_mut();
        s.delete("delete_program", program);
        s.linked.remove(&program.get());
        s.attached.remove(&program.get());
        s.binary_logs.remove(&program.get());
        s.retrievable.remove(&program.get());
        s.binaries.remove(&program.get());
        if s.program == Some(program.get()) {
            s.program = None;
        }
    }

    fn create_vertex_array(&self) -> Result<RawName, String> {
        self.state.borrow_mut().create("create_vertex_array")
    }

    fn delete_vertex_array(&self, vertex_array: RawName) {
        let mut s = self.state.borrow_mut();
        s.delete("delete_vertex_array", vertex_array);
        if s.vertex_array == Some(vertex_array.get()) {
            s.vertex_array = None;
        }
    }

    // ── buffers ───────────────────────────────────────────────────────────

    fn bind_buffer(&self, target: u32, buffer: Option<RawName>) {
        let mut s = self.state.borrow_mut();
        s.record("bind_buffer");
        match buffer {
            Some(b) if !s.live.contains(&b.get()) => s.raise(glow::INVALID_OPERATION),
            Some(b) => {
                s.bound_buffers.insert(target, b.get());
            }
            None => {
                s.bound_buffers.remove(&target);
            }
        }
    }

    fn buffer_data_size(&self, target: u32, size: i32, usage: u32) {
        let mut s = self.state.borrow_mut();
        s.record("buffer_data_size");
        match s.bound_buffers.get(&target).copied() {
            Some(b) => {
                s.buffers.insert(b, (vec![0; size as usize], usage));
            }
            None => s.raise(glow::INVALID_OPERATION),
        }
    }

    fn buffer_data_u8_slice(&self, target: u32, data: &[u8], usage: u32) {
        let mut s = self.state.borrow_mut();
        s.record("buffer_data_u8_slice");
        match s.bound_buffers.get(&target).copied() {
            Some(b) => {
                s.buffers.insert(b, (data.to_vec(), usage));
            }
            None => s.raise(glow::INVALID_OPERATION),
        }
    }

    fn buffer_sub_data_u8_slice(&self, target: u32, offset: i32, data: &[u8]) {
        let mut s = self.state.borrow_mut();
        s.record("buffer_sub_data_u8_slice");
        let Some(b) = s.bound_buffers.get(&target).copied() else {
            return s.raise(glow::INVALID_OPERATION);
        };
        let offset = offset as usize;
        match s.buffers.get_mut(&b) {
            Some((store, _)) if offset + data.len() <= store.len() => {
                store[offset..offset + data.len()].copy_from_slice(data);
            }
            _ => s.raise(glow::INVALID_VALUE),
        }
    }

    fn get_buffer_sub_data(&self, target: u32, offset: i32, dst: &mut [u8]) {
        let mut s = self.state.borrow_mut();
        s.record("get_buffer_sub_data");
        let Some(b) = s.bound_buffers.get(&target).copied() else {
            return s.raise(glow::INVALID_OPERATION);
        };
        let offset = offset as usize;
        match s.buffers.get(&b) {
            Some((store, _)) if offset + dst.len() <= store.len() => {
                dst.copy_from_slice(&store[offset..offset + dst.len()]);
            }
            _ => s.raise(glow::INVALID_VALUE),
        }
    }

    fn get_buffer_parameter_i32(&self, target: u32, parameter: u32) -> i32 {
        let mut s = self.state.borrow_mut();
        s.record("get_buffer_parameter_i32");
        let info = s
            .bound_buffers
            .get(&target)
            .and_then(|b| s.buffers.get(b))
            .map(|(store, usage)| (store.len(), *usage));
        let Some((len, usage)) = info else {
            s.raise(glow::INVALID_OPERATION);
            return 0;
        };
        match parameter {
            glow::BUFFER_SIZE => len as i32,
            glow::BUFFER_USAGE => usage as i32,
            _ => {
                s.raise(glow::INVALID_ENUM);
                0
            }
        }
    }

    // ── textures ──────────────────────────────────────────────────────────

    fn active_texture(&self, unit: u32) {
        let mut s = self.state.borrow_mut();
        s.record("active_texture");
        s.active_unit = unit - glow::TEXTURE0;
    }

    fn bind_texture(&self, target: u32, texture: Option<RawName>) {
        let mut s = self.state.borrow_mut();
        s.record("bind_texture");
        let unit = s.active_unit;
        match texture {
            Some(t) if !s.live.contains(&t.get()) => s.raise(glow::INVALID_OPERATION),
            Some(t) => {
                s.unit_textures.insert((unit, target), t.get());
            }
            None => {
                s.unit_textures.remove(&(unit, target));
            }
        }
    }

    fn tex_parameter_i32(&self, target: u32, _parameter: u32, _value: i32) {
        let mut s = self.state.borrow_mut();
        s.record("tex_parameter_i32");
        if s.bound_texture(target).is_none() {
            s.raise(glow::INVALID_OPERATION);
        }
    }

    fn tex_image(
        &self,
        target: u32,
        level: i32,
        _internal_format: i32,
        size: [i32; 3],
        format: u32,
        ty: u32,
        pixels: Option<&[u8]>,
    ) {
        let mut s = self.state.borrow_mut();
        s.record("tex_image");
        let Some(t) = s.bound_texture(target) else {
            return s.raise(glow::INVALID_OPERATION);
        };
        if level != 0 {
            return;
        }
        let bytes_per_pixel = channels(format) * type_width(ty);
        let len = size.iter().map(|d| *d as usize).product::<usize>() * bytes_per_pixel;
        let data = match pixels {
            Some(p) => p.to_vec(),
            None => vec![0; len],
        };
        s.images.insert(
            t,
            Image {
                size,
                bytes_per_pixel,
                data,
            },
        );
    }

    fn tex_sub_image(
        &self,
        target: u32,
        level: i32,
        offset: [i32; 3],
        size: [i32; 3],
        _format: u32,
        _ty: u32,
        pixels: &[u8],
    ) {
        let mut s = self.state.borrow_mut();
        s.record("tex_sub_image");
        let Some(t) = s.bound_texture(target) else {
            return s.raise(glow::INVALID_OPERATION);
        };
        if level != 0 {
            return;
        }
        let Some(image) = s.images.get_mut(&t) else {
            return s.raise(glow::INVALID_OPERATION);
        };
        let [x, y, z] = offset.map(|d| d as usize);
        let [w, h, d] = size.map(|d| d as usize);
        let bpp = image.bytes_per_pixel;
        let pitch = image.size[0] as usize * bpp;
        let slice = pitch * image.size[1] as usize;
        let row = w * bpp;
        for k in 0..d {
            for r in 0..h {
                let src = (k * h + r) * row;
                let dst = (z + k) * slice + (y + r) * pitch + x * bpp;
                image.data[dst..dst + row].copy_from_slice(&pixels[src..src + row]);
            }
        }
    }

    fn get_tex_image(&self, target: u32, level: i32, _format: u32, _ty: u32, dst: &mut [u8]) {
        let mut s = self.state.borrow_mut();
        s.record("get_tex_image");
        let Some(t) = s.bound_texture(target) else {
            return s.raise(glow::INVALID_OPERATION);
        };
        match s.images.get(&t) {
            Some(image) if level == 0 => {
                let n = dst.len().min(image.data.len());
                dst[..n].copy_from_slice(&image.data[..n]);
            }
            _ => dst.fill(0),
        }
    }

    fn generate_mipmap(&self, target: u32) {
        let mut s = self.state.borrow_mut();
        s.record("generate_mipmap");
        if s.bound_texture(target).is_none() {
            s.raise(glow::INVALID_OPERATION);
        }
    }

    // ── samplers ──────────────────────────────────────────────────────────

    fn bind_sampler(&self, unit: u32, sampler: Option<RawName>) {
        let mut s = self.state.borrow_mut();
        s.record("bind_sampler");
        match sampler {
            Some(name) => {
                s.unit_samplers.insert(unit, name.get());
            }
            None => {
                s.unit_samplers.remove(&unit);
            }
        }
    }

    fn sampler_parameter_i32(&self, sampler: RawName, parameter: u32, value: i32) {
        let mut s = self.state.borrow_mut();
        s.record("sampler_parameter_i32");
        s.sampler_params
            .entry(sampler.get())
            .or_default()
            .insert(parameter, value);
    }

    // ── shaders and programs ──────────────────────────────────────────────

    fn shader_source(&self, _shader: RawName, _source: &str) {
        self.state.borrow_mut().record("shader_source");
    }

    fn compile_shader(&self, shader: RawName) {
        let mut s = self.state.borrow_mut();
        s.record("compile_shader");
        let stage = s.shader_stages.get(&shader.get()).copied().unwrap_or(0);
        if s.compile_errors.contains_key(&stage) {
            s.compiled.remove(&shader.get());
        } else {
            s.compiled.insert(shader.get());
        }
    }

    fn get_shader_compile_status(&self, shader: RawName) -> bool {
        let mut s = self.state.borrow_mut();
        s.record("get_shader_compile_status");
        s.compiled.contains(&shader.get())
    }

    fn get_shader_info_log(&self, shader: RawName) -> String {
        let mut s = self.state.borrow_mut();
        s.record("get_shader_info_log");
        let stage = s.shader_stages.get(&shader.get()).copied().unwrap_or(0);
        s.compile_errors.get(&stage).cloned().unwrap_or_default()
    }

    fn attach_shader(&self, program: RawName, shader: RawName) {
        let mut s = self.state.borrow_mut();
        s.record("attach_shader");
        s.attached
            .entry(program.get())
            .or_default()
            .push(shader.get());
    }

    fn detach_shader(&self, program: RawName, shader: RawName) {
        let mut s = self.state.borrow_mut();
        s.record("detach_shader");
        if let Some(list) = s.attached.get_mut(&program.get()) {
            list.retain(|a| *a != shader.get());
        }
    }

    fn link_program(&self, program: RawName) {
        let mut s = self.state.borrow_mut();
        s.record("link_program");
        s.binary_logs.remove(&program.get());
        if s.link_error.is_none() {
            s.linked.insert(program.get());
            let mut data = BINARY_MAGIC.to_vec();
            data.extend_from_slice(&program.get().to_le_bytes());
            s.binaries.insert(
                program.get(),
                ProgramBinary {
                    format: BINARY_FORMAT,
                    data,
                },
            );
        } else {
            s.linked.remove(&program.get());
            s.binaries.remove(&program.get());
        }
    }

    fn get_program_link_status(&self, program: RawName) -> bool {
        let mut s = self.state.borrow_mut();
        s.record("get_program_link_status");
        s.is_linked(program)
    }

    fn get_program_info_log(&self, program: RawName) -> String {
        let mut s = self.state.borrow_mut();
        s.record("get_program_info_log");
        match s.binary_logs.get(&program.get()) {
            Some(log) => log.clone(),
            None => s.link_error.clone().unwrap_or_default(),
        }
    }

    fn program_binary_retrievable_hint(&self, program: RawName, value: bool) {
        let mut s = self.state.borrow_mut();
        s.record("program_binary_retrievable_hint");
        if value {
            s.retrievable.insert(program.get());
        } else {
            s.retrievable.remove(&program.get());
        }
    }

    fn get_program_binary(&self, program: RawName) -> Option<ProgramBinary> {
        let mut s = self.state.borrow_mut();
        s.record("get_program_binary");
        if s.no_binary_formats {
            return None;
        }
        if !s.is_linked(program) {
            s.raise(glow::INVALID_OPERATION);
            return None;
        }
        s.binaries.get(&program.get()).cloned()
    }

    /// Accepts binaries this mock produced; anything else leaves the program
    /// unlinked with a log, like a driver rejecting a stale binary.
    fn program_binary(&self, program: RawName, binary: &ProgramBinary) {
        let mut s = self.state.borrow_mut();
        s.record("program_binary");
        if s.no_binary_formats {
            return s.raise(glow::INVALID_ENUM);
        }
        if binary.format == BINARY_FORMAT && binary.data.starts_with(BINARY_MAGIC) {
            s.linked.insert(program.get());
            s.binary_logs.remove(&program.get());
            s.binaries.insert(program.get(), binary.clone());
        } else {
            s.linked.remove(&program.get());
            s.binary_logs
                .insert(program.get(), "program binary rejected".into());
        }
    }

    fn get_active_attributes(&self, program: RawName) -> u32 {
        let mut s = self.state.borrow_mut();
        s.record("get_active_attributes");
        if s.is_linked(program) {
            s.attributes.len() as u32
        } else {
            0
        }
    }

    fn get_active_attribute(&self, program: RawName, index: u32) -> Option<ActiveVariable> {
        let mut s = self.state.borrow_mut();
        s.record("get_active_attribute");
        if !s.is_linked(program) {
            return None;
        }
        s.attributes.get(index as usize).map(|v| ActiveVariable {
            name: State::reported_name(v),
            size: v.size,
            gl_type: v.gl_type,
        })
    }

    fn get_attrib_location(&self, program: RawName, name: &str) -> Option<u32> {
        let mut s = self.state.borrow_mut();
        s.record("get_attrib_location");
        if !s.is_linked(program) {
            return None;
        }
        s.attributes
            .iter()
            .find(|v| v.name == name || State::reported_name(v) == name)
            .and_then(|v| v.location)
    }

    fn get_active_uniforms(&self, program: RawName) -> u32 {
        let mut s = self.state.borrow_mut();
        s.record("get_active_uniforms");
        if s.is_linked(program) {
            s.uniforms.len() as u32
        } else {
            0
        }
    }

    fn get_active_uniform(&self, program: RawName, index: u32) -> Option<ActiveVariable> {
        let mut s = self.state.borrow_mut();
        s.record("get_active_uniform");
        if !s.is_linked(program) {
            return None;
        }
        s.uniforms.get(index as usize).map(|v| ActiveVariable {
            name: State::reported_name(v),
            size: v.size,
            gl_type: v.gl_type,
        })
    }

    fn get_uniform_location(&self, program: RawName, name: &str) -> Option<u32> {
        let mut s = self.state.borrow_mut();
        s.record("get_uniform_location");
        if !s.is_linked(program) {
            return None;
        }
        s.uniforms
            .iter()
            .find(|v| v.name == name || State::reported_name(v) == name)
            .and_then(|v| v.location)
    }

    fn use_program(&self, program: Option<RawName>) {
        let mut s = self.state.borrow_mut();
        s.record("use_program");
        match program {
            Some(p) if !s.is_linked(p) => s.raise(glow::INVALID_OPERATION),
            other => s.program = other.map(RawName::get),
        }
    }

    // ── vertex input ──────────────────────────────────────────────────────

    fn bind_vertex_array(&self, vertex_array: Option<RawName>) {
        let mut s = self.state.borrow_mut();
        s.record("bind_vertex_array");
        s.vertex_array = vertex_array.map(RawName::get);
    }

    fn vertex_attrib_pointer_f32(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        _normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        let mut s = self.state.borrow_mut();
        s.record("vertex_attrib_pointer_f32");
        let buffer = s.bound_buffers.get(&glow::ARRAY_BUFFER).copied();
        s.pointers.push(Pointer {
            index,
            size,
            data_type,
            integer: false,
            stride,
            offset,
            buffer,
        });
    }

    fn vertex_attrib_pointer_i32(
        &self,
        index: u32,
        size: i32,
        data_type: u32,
        stride: i32,
        offset: i32,
    ) {
        let mut s = self.state.borrow_mut();
        s.record("vertex_attrib_pointer_i32");
        let buffer = s.bound_buffers.get(&glow::ARRAY_BUFFER).copied();
        s.pointers.push(Pointer {
            index,
            size,
            data_type,
            integer: true,
            stride,
            offset,
            buffer,
        });
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        let mut s = self.state.borrow_mut();
        s.record("enable_vertex_attrib_array");
        s.enabled_arrays.insert(index);
    }

    // ── uniform uploads ───────────────────────────────────────────────────

    fn uniform_1_f32_slice(&self, location: u32, values: &[f32]) {
        let words = values.iter().map(|v| v.to_bits()).collect();
        self.state
            .borrow_mut()
            .upload("uniform_1_f32_slice", location, words);
    }

    fn uniform_2_f32_slice(&self, location: u32, values: &[f32]) {
        let words = values.iter().map(|v| v.to_bits()).collect();
        self.state
            .borrow_mut()
            .upload("uniform_2_f32_slice", location, words);
    }

    fn uniform_3_f32_slice(&self, location: u32, values: &[f32]) {
        let words = values.iter().map(|v| v.to_bits()).collect();
        self.state
            .borrow_mut()
            .upload("uniform_3_f32_slice", location, words);
    }

    fn uniform_4_f32_slice(&self, location: u32, values: &[f32]) {
        let words = values.iter().map(|v| v.to_bits()).collect();
        self.state
            .borrow_mut()
            .upload("uniform_4_f32_slice", location, words);
    }

    fn uniform_1_i32_slice(&self, location: u32, values: &[i32]) {
        let words = values.iter().map(|v| *v as u32).collect();
        self.state
            .borrow_mut()
            .upload("uniform_1_i32_slice", location, words);
    }

    fn uniform_2_i32_slice(&self, location: u32, values: &[i32]) {
        let words = values.iter().map(|v| *v as u32).collect();
        self.state
            .borrow_mut()
            .upload("uniform_2_i32_slice", location, words);
    }

    fn uniform_3_i32_slice(&self, location: u32, values: &[i32]) {
        let words = values.iter().map(|v| *v as u32).collect();
        self.state
            .borrow_mut()
            .upload("uniform_3_i32_slice", location, words);
    }

    fn uniform_4_i32_slice(&self, location: u32, values: &[i32]) {
        let words = values.iter().map(|v| *v as u32).collect();
        self.state
            .borrow_mut()
            .upload("uniform_4_i32_slice", location, words);
    }

    fn uniform_1_u32_slice(&self, location: u32, values: &[u32]) {
        self.state
            .borrow_mut()
            .upload("uniform_1_u32_slice", location, values.to_vec());
    }

    fn uniform_2_u32_slice(&self, location: u32, values: &[u32]) {
        self.state
            .borrow_mut()
            .upload("uniform_2_u32_slice", location, values.to_vec());
    }

    fn uniform_3_u32_slice(&self, location: u32, values: &[u32]) {
        self.state
            .borrow_mut()
            .upload("uniform_3_u32_slice", location, values.to_vec());
    }

    fn uniform_4_u32_slice(&self, location: u32, values: &[u32]) {
        self.state
            .borrow_mut()
            .upload("uniform_4_u32_slice", location, values.to_vec());
    }

    fn uniform_matrix_2_f32_slice(&self, location: u32, _transpose: bool, values: &[f32]) {
        let words = values.iter().map(|v| v.to_bits()).collect();
        self.state
            .borrow_mut()
            .upload("uniform_matrix_2_f32_slice", location, words);
    }

    fn uniform_matrix_3_f32_slice(&self, location: u32, _transpose: bool, values: &[f32]) {
        let words = values.iter().map(|v| v.to_bits()).collect();
        self.state
            .borrow_mut()
            .upload("uniform_matrix_3_f32_slice", location, words);
    }

    fn uniform_matrix_4_f32_slice(&self, location: u32, _transpose: bool, values: &[f32]) {
        let words = values.iter().map(|v| v.to_bits()).collect();
        self.state
            .borrow_mut()
            .upload("uniform_matrix_4_f32_slice", location, words);
    }

    // ── framebuffer and draws ─────────────────────────────────────────────

    fn clear(&self, _mask: u32) {
        self.state.borrow_mut().record("clear");
    }

    fn clear_color(&self, _red: f32, _green: f32, _blue: f32, _alpha: f32) {
        self.state.borrow_mut().record("clear_color");
    }

    fn enable(&self, _capability: u32) {
        self.state.borrow_mut().record("enable");
    }

    fn disable(&self, _capability: u32) {
        self.state.borrow_mut().record("disable");
    }

    fn viewport(&self, _x: i32, _y: i32, width: i32, height: i32) {
        let mut s = self.state.borrow_mut();
        s.record("viewport");
        if width < 0 || height < 0 {
            s.raise(glow::INVALID_VALUE);
        }
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        let mut s = self.state.borrow_mut();
        s.record("draw_arrays");
        if s.program.is_none() {
            return s.raise(glow::INVALID_OPERATION);
        }
        let program = s.program;
        s.draws.push(Draw {
            mode,
            first_or_offset: first,
            count,
            element_type: None,
            program,
        });
    }

    fn draw_elements(&self, mode: u32, count: i32, element_type: u32, offset: i32) {
        let mut s = self.state.borrow_mut();
        s.record("draw_elements");
        if s.program.is_none() || !s.bound_buffers.contains_key(&glow::ELEMENT_ARRAY_BUFFER) {
            return s.raise(glow::INVALID_OPERATION);
        }
        let program = s.program;
        s.draws.push(Draw {
            mode,
            first_or_offset: offset,
            count,
            element_type: Some(element_type),
            program,
        });
    }

    fn finish(&self) {
        self.state.borrow_mut().record("finish");
    }
}
