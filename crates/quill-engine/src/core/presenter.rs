use anyhow::{anyhow, Result};
use winit::dpi::PhysicalSize;

use crate::coords::Viewport;
use crate::device::{Gpu, GpuInit, ResourceTracker, SurfaceErrorAction, Tracked};
use crate::paint::Color;
use crate::render::shapes::rect::RectRenderer;
use crate::render::shapes::text::TextRenderer;
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::DrawList;
use crate::text::FontSystem;
use crate::window::SurfaceHandle;

/// Result of one [`Presenter::present`] call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PresentOutcome {
    Presented,
    /// No back buffer this frame (surface lost, outdated or timed out).
    Skipped,
}

/// Turns a recorded draw list into a presented frame.
pub trait Presenter {
    /// Surface size changed, in physical pixels.
    fn resize(&mut self, width: u32, height: u32);

    /// Clears to `clear`, renders `list` and presents.
    ///
    /// Recoverable surface errors skip the frame; fatal ones are returned.
    fn present(&mut self, clear: Color, list: &mut DrawList, fonts: &FontSystem) -> Result<PresentOutcome>;
}

/// [`Presenter`] over the wgpu device and the window's presentation chain.
pub struct GpuPresenter {
    // Renderer GPU objects go before the device that created them.
    text: TextRenderer,
    rects: RectRenderer,
    gpu: Tracked<Gpu>,
    window: SurfaceHandle,
}

impl GpuPresenter {
    /// Creates the graphics device and presentation chain for `window`.
    pub fn new(window: &SurfaceHandle, init: GpuInit, tracker: &ResourceTracker) -> Result<Self> {
        let gpu = pollster::block_on(Gpu::new(window, init))?;
        Ok(Self {
            text: TextRenderer::new(),
            rects: RectRenderer::new(),
            gpu: tracker.track("graphics device", gpu),
            window: window.clone(),
        })
    }
}

impl Presenter for GpuPresenter {
    fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(PhysicalSize::new(width, height));
    }

    fn present(&mut self, clear: Color, list: &mut DrawList, fonts: &FontSystem) -> Result<PresentOutcome> {
        let size = self.gpu.size();
        if size.width == 0 || size.height == 0 {
            // Minimized.
            return Ok(PresentOutcome::Skipped);
        }

        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => Err(anyhow!("presentation chain failed: out of memory")),
                    SurfaceErrorAction::Reconfigure | SurfaceErrorAction::SkipFrame => {
                        Ok(PresentOutcome::Skipped)
                    }
                };
            }
        };

        // Clear pass. Dropped before the encoder is borrowed again.
        {
            let _rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("quill clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }

        let scale = self.window.scale_factor();
        let gpu: &Gpu = &self.gpu;
        let rctx = RenderCtx::new(
            gpu.device(),
            gpu.queue(),
            gpu.surface_format(),
            Viewport::from_physical(size.width, size.height, scale),
            scale,
        );

        {
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
            self.rects.render(&rctx, &mut target, list);
            self.text.render(&rctx, &mut target, list, fonts);
        }

        self.window.window().pre_present_notify();
        gpu.submit(frame);

        Ok(PresentOutcome::Presented)
    }
}
