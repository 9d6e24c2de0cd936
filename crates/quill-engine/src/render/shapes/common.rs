//! Shared GPU types and utilities used by the shape renderers.

use std::ops::Range;

use bytemuck::{Pod, Zeroable};

use crate::coords::{Rect, Viewport};
use crate::render::RenderTarget;

// ── blend ─────────────────────────────────────────────────────────────────

pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── viewport uniform ──────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct ViewportUniform {
    pub viewport: [f32; 2],
    pub _pad: [f32; 2], // 16-byte alignment
}

impl ViewportUniform {
    pub(super) fn new(viewport: Viewport) -> Self {
        Self {
            viewport: [viewport.width.max(1.0), viewport.height.max(1.0)],
            _pad: [0.0; 2],
        }
    }
}

/// Minimum binding size for the viewport uniform buffer.
pub(super) fn viewport_ubo_min_binding_size() -> Option<std::num::NonZeroU64> {
    std::num::NonZeroU64::new(std::mem::size_of::<ViewportUniform>() as u64)
}

// ── quad vertex ───────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct QuadVertex {
    pub pos: [f32; 2], // 0..1
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub(super) const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [0.0, 0.0] },
    QuadVertex { pos: [1.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [0.0, 1.0] },
];

pub(super) const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

// ── passes ────────────────────────────────────────────────────────────────

/// Opens a render pass that keeps the existing contents of the target.
pub(super) fn load_pass<'e>(
    target: &'e mut RenderTarget<'_>,
    label: &'static str,
) -> wgpu::RenderPass<'e> {
    target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target.color_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Load,
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    })
}

// ── scissor rect ──────────────────────────────────────────────────────────

/// Converts a logical-pixel clip rect to physical scissor rect arguments for wgpu.
///
/// Returns `None` if the clip rect is zero-area (renderer should skip the draw call).
/// Returns `Some((x, y, w, h))` in physical pixels, clamped to the viewport.
/// The scissor never extends past the clip rect: edges are rounded inwards.
///
/// `clip = None` means "no scissor" → returns the full viewport rect.
pub(super) fn logical_clip_to_scissor(
    clip: Option<Rect>,
    viewport: Viewport,
    scale: f32,
) -> Option<(u32, u32, u32, u32)> {
    let phys_vw = (viewport.width * scale).max(1.0) as u32;
    let phys_vh = (viewport.height * scale).max(1.0) as u32;

    let (x, y, w, h) = match clip {
        None => (0, 0, phys_vw, phys_vh),
        Some(r) => {
            let r = r.normalized();
            let x  = ((r.origin.x * scale).ceil().max(0.0) as u32).min(phys_vw);
            let y  = ((r.origin.y * scale).ceil().max(0.0) as u32).min(phys_vh);
            let x2 = (((r.origin.x + r.size.x) * scale).floor().max(0.0) as u32).min(phys_vw);
            let y2 = (((r.origin.y + r.size.y) * scale).floor().max(0.0) as u32).min(phys_vh);
            (x, y, x2.saturating_sub(x), y2.saturating_sub(y))
        }
    };

    if w == 0 || h == 0 { None } else { Some((x, y, w, h)) }
}

/// Splits `clips` into runs of consecutive equal clip rects.
///
/// Each run becomes one instanced draw call with its own scissor.
pub(super) fn clip_runs(clips: &[Option<Rect>]) -> Vec<(Range<u32>, Option<Rect>)> {
    let mut runs = Vec::new();
    let mut i = 0usize;
    while i < clips.len() {
        let clip = clips[i];
        let mut j = i + 1;
        while j < clips.len() && clips[j] == clip {
            j += 1;
        }
        runs.push((i as u32..j as u32, clip));
        i = j;
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Viewport = Viewport::new(1280.0, 720.0);

    #[test]
    fn no_clip_covers_viewport() {
        assert_eq!(logical_clip_to_scissor(None, VIEW, 1.0), Some((0, 0, 1280, 720)));
        assert_eq!(logical_clip_to_scissor(None, VIEW, 2.0), Some((0, 0, 2560, 1440)));
    }

    #[test]
    fn clip_maps_to_physical_pixels() {
        let clip = Rect::new(50.0, 50.0, 200.0, 200.0);
        assert_eq!(logical_clip_to_scissor(Some(clip), VIEW, 1.0), Some((50, 50, 200, 200)));
        assert_eq!(logical_clip_to_scissor(Some(clip), VIEW, 1.5), Some((75, 75, 300, 300)));
    }

    #[test]
    fn fractional_clip_never_grows_past_the_rect() {
        let clip = Rect::new(10.4, 10.6, 20.3, 20.2);
        let (x, y, w, h) = logical_clip_to_scissor(Some(clip), VIEW, 1.0).unwrap();
        let scissor = Rect::new(x as f32, y as f32, w as f32, h as f32);
        assert!(clip.contains_rect(scissor), "{scissor:?} escapes {clip:?}");
    }

    #[test]
    fn offscreen_clip_is_skipped() {
        let clip = Rect::new(2000.0, 50.0, 200.0, 200.0);
        assert_eq!(logical_clip_to_scissor(Some(clip), VIEW, 1.0), None);
    }

    #[test]
    fn clip_runs_group_consecutive_equal_clips() {
        let a = Some(Rect::new(0.0, 0.0, 10.0, 10.0));
        let runs = clip_runs(&[None, None, a, a, None]);
        assert_eq!(runs, vec![(0..2, None), (2..4, a), (4..5, None)]);
    }

    #[test]
    fn clip_runs_of_nothing_is_empty() {
        assert!(clip_runs(&[]).is_empty());
    }
}
