//! An in-memory [`ShaderDriver`] for tests.
//!
//! The "compiler" only knows a handful of rules, enough to tell the tutorial shaders apart from
//! obviously broken ones: a leading `#version` directive, statements terminated by `;`, balanced
//! braces, and `gl_Position` being a vertex-only builtin.

use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::CStr;

use crate::driver::{ProgramHandle, ShaderDriver, ShaderHandle, ShaderStage};

struct FakeShader {
    stage: ShaderStage,
    source: Option<String>,
    compiled: bool,
    log: String,
    compiles: usize,
    deleted: bool,
}

#[derive(Default)]
struct FakeProgram {
    attached: Vec<u32>,
    frag_outputs: Vec<(u32, String)>,
    inputs: Vec<String>,
    linked: bool,
    log: String,
    deleted: bool,
}

#[derive(Default)]
struct State {
    next_id: u32,
    shaders: HashMap<u32, FakeShader>,
    programs: HashMap<u32, FakeProgram>,
    current: Option<u32>,
}

#[derive(Default)]
pub struct FakeDriver {
    state: RefCell<State>,
    log_padding: usize,
    over_report: bool,
    refuse_create: bool,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `padding` bytes of notes to every failure log.
    pub fn with_log_padding(mut self, padding: usize) -> Self {
        self.log_padding = padding;
        self
    }

    /// Reports the full log length from the info log calls, not the number of bytes written.
    pub fn over_reporting(mut self) -> Self {
        self.over_report = true;
        self
    }

    pub fn refusing_to_create(mut self) -> Self {
        self.refuse_create = true;
        self
    }

    pub fn source_of(&self, shader: ShaderHandle) -> Option<String> {
        self.state.borrow().shaders.get(&shader.id()).and_then(|s| s.source.clone())
    }

    pub fn compile_count(&self, shader: ShaderHandle) -> usize {
        self.state.borrow().shaders.get(&shader.id()).map_or(0, |s| s.compiles)
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.values().filter(|s| !s.deleted).count()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.values().filter(|p| !p.deleted).count()
    }

    pub fn attached_to(&self, program: ProgramHandle) -> Vec<u32> {
        self.state.borrow().programs.get(&program.id()).map(|p| p.attached.clone()).unwrap_or_default()
    }

    pub fn frag_outputs(&self, program: ProgramHandle) -> Vec<(u32, String)> {
        self.state.borrow().programs.get(&program.id()).map(|p| p.frag_outputs.clone()).unwrap_or_default()
    }

    pub fn current_program(&self) -> Option<u32> {
        self.state.borrow().current
    }

    fn next_id(state: &mut State) -> u32 {
        state.next_id += 1;
        state.next_id
    }

    fn failure_log(&self, message: String) -> String {
        let mut log = message;
        if self.log_padding > 0 {
            log.push('\n');
            log.extend(std::iter::repeat('n').take(self.log_padding));
        }
        log
    }

    fn write_log(&self, log: &str, buf: &mut [u8]) -> usize {
        if buf.is_empty() {
            return 0;
        }

        let n = log.len().min(buf.len() - 1);
        buf[..n].copy_from_slice(&log.as_bytes()[..n]);
        buf[n] = 0;

        if self.over_report { log.len() } else { n }
    }
}

fn check_source(stage: ShaderStage, source: &str) -> Result<(), String> {
    let mut lines = source.lines().enumerate();

    match lines.next() {
        Some((_, first)) if first.trim_start().starts_with("#version") => {}
        _ => return Err("0:1(1): error: syntax error, missing #version directive".to_owned()),
    }

    let mut depth = 0i32;
    for (n, line) in lines {
        let line = line.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }

        depth += line.matches('{').count() as i32;
        depth -= line.matches('}').count() as i32;
        if depth < 0 {
            return Err(format!("0:{}(1): error: syntax error, unexpected '}}'", n + 1));
        }

        if !(line.ends_with(';') || line.ends_with('{') || line.ends_with('}')) {
            return Err(format!("0:{}(1): error: syntax error, unexpected end of line, expecting ';'", n + 1));
        }

        if stage == ShaderStage::Fragment && line.contains("gl_Position") {
            return Err(format!("0:{}(1): error: `gl_Position' undeclared", n + 1));
        }
    }

    if depth != 0 {
        return Err("0:0(0): error: syntax error, unexpected end of file".to_owned());
    }

    Ok(())
}

/// Names of `in` declarations, in order.
fn vertex_inputs(source: &str) -> Vec<String> {
    source
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("in "))
        .filter_map(|line| line.trim_end_matches(';').split_whitespace().nth(2).map(str::to_owned))
        .collect()
}

impl ShaderDriver for FakeDriver {
    fn create_shader(&self, stage: ShaderStage) -> Option<ShaderHandle> {
        if self.refuse_create {
            return None;
        }

        let mut state = self.state.borrow_mut();
        let id = Self::next_id(&mut state);
        state.shaders.insert(id, FakeShader {
            stage,
            source: None,
            compiled: false,
            log: String::new(),
            compiles: 0,
            deleted: false,
        });

        Some(ShaderHandle::new(id, stage))
    }

    fn delete_shader(&self, shader: ShaderHandle) {
        if let Some(s) = self.state.borrow_mut().shaders.get_mut(&shader.id()) {
            s.deleted = true;
        }
    }

    fn shader_source(&self, shader: ShaderHandle, source: &CStr) {
        if let Some(s) = self.state.borrow_mut().shaders.get_mut(&shader.id()) {
            s.source = Some(source.to_string_lossy().into_owned());
        }
    }

    fn compile_shader(&self, shader: ShaderHandle) {
        let mut state = self.state.borrow_mut();
        let s = match state.shaders.get_mut(&shader.id()) {
            Some(s) => s,
            None => return,
        };

        s.compiles += 1;
        let result = match &s.source {
            Some(source) => check_source(s.stage, source),
            None => Err("0:0(0): error: no source".to_owned()),
        };

        match result {
            Ok(()) => {
                s.compiled = true;
                s.log.clear();
            }
            Err(message) => {
                s.compiled = false;
                s.log = self.failure_log(message);
            }
        }
    }

    fn compile_status(&self, shader: ShaderHandle) -> bool {
        self.state.borrow().shaders.get(&shader.id()).map_or(false, |s| s.compiled)
    }

    fn shader_info_log(&self, shader: ShaderHandle, buf: &mut [u8]) -> usize {
        let state = self.state.borrow();
        match state.shaders.get(&shader.id()) {
            Some(s) => self.write_log(&s.log, buf),
            None => 0,
        }
    }

    fn create_program(&self) -> Option<ProgramHandle> {
        if self.refuse_create {
            return None;
        }

        let mut state = self.state.borrow_mut();
        let id = Self::next_id(&mut state);
        state.programs.insert(id, FakeProgram::default());

        Some(ProgramHandle::new(id))
    }

    fn delete_program(&self, program: ProgramHandle) {
        let mut state = self.state.borrow_mut();
        if let Some(p) = state.programs.get_mut(&program.id()) {
            p.deleted = true;
            p.attached.clear();
        }
        if state.current == Some(program.id()) {
            state.current = None;
        }
    }

    fn attach_shader(&self, program: ProgramHandle, shader: ShaderHandle) {
        if let Some(p) = self.state.borrow_mut().programs.get_mut(&program.id()) {
            if !p.attached.contains(&shader.id()) {
                p.attached.push(shader.id());
            }
        }
    }

    fn detach_shader(&self, program: ProgramHandle, shader: ShaderHandle) {
        if let Some(p) = self.state.borrow_mut().programs.get_mut(&program.id()) {
            p.attached.retain(|&id| id != shader.id());
        }
    }

    fn bind_frag_data_location(&self, program: ProgramHandle, color: u32, name: &CStr) {
        if let Some(p) = self.state.borrow_mut().programs.get_mut(&program.id()) {
            p.frag_outputs.push((color, name.to_string_lossy().into_owned()));
        }
    }

    fn link_program(&self, program: ProgramHandle) {
        let mut state = self.state.borrow_mut();
        let attached = match state.programs.get(&program.id()) {
            Some(p) => p.attached.clone(),
            None => return,
        };

        let mut vertex = None;
        let mut fragment = false;
        let mut problem = None;
        for id in &attached {
            let s = &state.shaders[id];
            if !s.compiled {
                problem = Some(format!("error: linking with uncompiled/unspecialized {} shader", s.stage));
                break;
            }
            match s.stage {
                ShaderStage::Vertex => vertex = s.source.clone(),
                ShaderStage::Fragment => fragment = true,
            }
        }

        let problem = problem
            .or_else(|| vertex.is_none().then(|| "error: no vertex shader attached".to_owned()))
            .or_else(|| (!fragment).then(|| "error: no fragment shader attached".to_owned()));

        let log = problem.map(|message| self.failure_log(message));
        let p = state.programs.get_mut(&program.id()).expect("program exists");
        match log {
            Some(log) => {
                p.linked = false;
                p.inputs.clear();
                p.log = log;
            }
            None => {
                p.linked = true;
                p.inputs = vertex.as_deref().map(vertex_inputs).unwrap_or_default();
                p.log.clear();
            }
        }
    }

    fn link_status(&self, program: ProgramHandle) -> bool {
        self.state.borrow().programs.get(&program.id()).map_or(false, |p| p.linked)
    }

    fn program_info_log(&self, program: ProgramHandle, buf: &mut [u8]) -> usize {
        let state = self.state.borrow();
        match state.programs.get(&program.id()) {
            Some(p) => self.write_log(&p.log, buf),
            None => 0,
        }
    }

    fn use_program(&self, program: ProgramHandle) {
        self.state.borrow_mut().current = Some(program.id());
    }

    fn attrib_location(&self, program: ProgramHandle, name: &CStr) -> Option<u32> {
        let state = self.state.borrow();
        let p = state.programs.get(&program.id()).filter(|p| p.linked)?;
        let name = name.to_str().ok()?;

        p.inputs.iter().position(|input| input == name).map(|i| i as u32)
    }
}
