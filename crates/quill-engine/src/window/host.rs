use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use crate::core::{AppControl, EventSource};
use crate::input::platform::winit::translate_window_event;
use crate::input::{InputState, Key};

/// Window configuration.
#[derive(Debug, Clone)]
pub struct HostConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            title: "quill".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Shared handle to the output window.
///
/// Cloning is cheap. The GPU surface keeps its own clone, so the window
/// outlives every surface created from it.
#[derive(Debug, Clone)]
pub struct SurfaceHandle(Arc<Window>);

impl SurfaceHandle {
    pub fn window(&self) -> &Window {
        &self.0
    }

    pub(crate) fn window_arc(&self) -> Arc<Window> {
        Arc::clone(&self.0)
    }

    pub fn scale_factor(&self) -> f32 {
        self.0.scale_factor() as f32
    }
}

struct HostHandler {
    config: HostConfig,
    window: Option<Arc<Window>>,
    create_error: Option<anyhow::Error>,

    input_state: InputState,
    pending_resize: Option<PhysicalSize<u32>>,
    close_requested: bool,
}

impl HostHandler {
    fn new(config: HostConfig) -> Self {
        Self {
            config,
            window: None,
            create_error: None,
            input_state: InputState::default(),
            pending_resize: None,
            close_requested: false,
        }
    }
}

impl ApplicationHandler for HostHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        match event_loop.create_window(attrs).context("failed to create window") {
            Ok(window) => {
                let size = window.inner_size();
                log::info!(
                    "window created: {}x{} @ {:.2}x",
                    size.width,
                    size.height,
                    window.scale_factor()
                );
                self.window = Some(Arc::new(window));
            }
            Err(e) => {
                self.create_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(ev) = translate_window_event(&event) {
            self.input_state.apply_event(ev);
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("window close requested");
                self.close_requested = true;
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.pending_resize = Some(size);
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(window) = &self.window {
                    self.pending_resize = Some(window.inner_size());
                }
            }
            _ => {}
        }
    }
}

/// Owns the platform event loop and the single output window.
pub struct Host {
    event_loop: EventLoop<()>,
    handler: HostHandler,
    exited: bool,
}

impl Host {
    /// Creates the platform event loop. No window exists yet.
    pub fn new(config: HostConfig) -> Result<Self> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        Ok(Self {
            event_loop,
            handler: HostHandler::new(config),
            exited: false,
        })
    }

    /// Pumps the event loop until the platform hands out the window.
    pub fn attach_surface(&mut self) -> Result<SurfaceHandle> {
        loop {
            let status = self
                .event_loop
                .pump_app_events(Some(Duration::from_millis(10)), &mut self.handler);

            if let Some(err) = self.handler.create_error.take() {
                return Err(err);
            }
            if let Some(window) = &self.handler.window {
                return Ok(SurfaceHandle(Arc::clone(window)));
            }
            if let PumpStatus::Exit(code) = status {
                self.exited = true;
                anyhow::bail!("event loop exited with code {code} before a window was created");
            }
        }
    }

    /// Focuses the window and hides the pointer over it.
    pub fn activate(&self) {
        if let Some(window) = &self.handler.window {
            window.set_cursor_visible(false);
            window.focus_window();
        }
    }
}

impl EventSource for Host {
    fn drain(&mut self, timeout: Duration) -> AppControl {
        if self.exited {
            return AppControl::Exit;
        }

        // Presented frames pace on vsync; after a skipped one, wait for events.
        let flow = if timeout.is_zero() { ControlFlow::Poll } else { ControlFlow::Wait };
        self.event_loop.set_control_flow(flow);
        let status = self.event_loop.pump_app_events(Some(timeout), &mut self.handler);

        if matches!(status, PumpStatus::Exit(_)) || self.handler.close_requested {
            self.exited = true;
            return AppControl::Exit;
        }
        AppControl::Continue
    }

    fn key_down(&self, key: Key) -> bool {
        self.handler.input_state.key_down(key)
    }

    fn take_resize(&mut self) -> Option<(u32, u32)> {
        self.handler
            .pending_resize
            .take()
            .map(|size| (size.width, size.height))
    }
}
