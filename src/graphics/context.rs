use std::ffi::c_void;

use glutin::dpi::PhysicalSize;
use glutin::event_loop::EventLoop;
use glutin::{Api, Context, ContextBuilder, GlProfile, GlRequest, PossiblyCurrent};
use log::debug;

use crate::config::RenderConfig;
use crate::error::GlError;
use super::opengl::GlContext;

/// A windowless OpenGL 3.2 core context, current on the thread that created it.
pub struct HeadlessGl {
    // Dropped in declaration order: the loaded entry points go before the context they belong to
    gl: GlContext,
    _context: Context<PossiblyCurrent>,
    _event_loop: EventLoop<()>,
}

impl HeadlessGl {
    pub fn new(config: &RenderConfig) -> Result<Self, GlError> {
        let event_loop = new_event_loop();

        let context = ContextBuilder::new()
            .with_gl(GlRequest::Specific(Api::OpenGl, (3, 2)))
            .with_gl_profile(GlProfile::Core)
            .build_headless(&event_loop, PhysicalSize::new(config.width, config.height))
            .map_err(|e| GlError::Context(e.to_string()))?;

        let context = unsafe { context.make_current() }
            .map_err(|(_, e)| GlError::MakeCurrent(e.to_string()))?;

        let gl = unsafe { GlContext::load_with(|symbol| context.get_proc_address(symbol) as *const c_void)? };

        debug!("OpenGL loaded");
        debug!("Vendor: {}", gl.vendor().unwrap_or_default());
        debug!("Renderer: {}", gl.renderer().unwrap_or_default());
        debug!("Version: {}", gl.version().unwrap_or_default());

        Ok(Self {
            gl,
            _context: context,
            _event_loop: event_loop,
        })
    }

    pub fn gl(&self) -> &GlContext { &self.gl }
}

// Test harnesses run off the main thread, which winit refuses on these platforms by default
#[cfg(any(
    target_os = "linux",
    target_os = "dragonfly",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
))]
fn new_event_loop() -> EventLoop<()> {
    use glutin::platform::unix::EventLoopExtUnix;
    EventLoop::new_any_thread()
}

#[cfg(target_os = "windows")]
fn new_event_loop() -> EventLoop<()> {
    use glutin::platform::windows::EventLoopExtWindows;
    EventLoop::new_any_thread()
}

#[cfg(not(any(
    target_os = "linux",
    target_os = "dragonfly",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd",
    target_os = "windows"
)))]
fn new_event_loop() -> EventLoop<()> {
    EventLoop::new()
}
