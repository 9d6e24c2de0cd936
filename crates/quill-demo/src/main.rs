//! Text rendering demo: clipped and overflowing text, the three measuring
//! modes, and two moving text blocks with and without pixel snapping.
//!
//! Hold Escape to quit.

mod config;
mod resources;
mod view;

use anyhow::Result;
use quill_engine::core::{CancelToken, FrameLoop, GpuPresenter};
use quill_engine::device::{GpuInit, ResourceTracker};
use quill_engine::logging::{init_logging, LoggingConfig};
use quill_engine::text::FontDatabase;
use quill_engine::window::{Host, HostConfig};

use crate::config::DemoConfig;
use crate::resources::Resources;
use crate::view::DemoView;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());
    let config = DemoConfig::from_env();
    log::info!("animation: {:?}", config.animation);

    let tracker = ResourceTracker::new();
    run(&config, &tracker)?;

    tracker.report_leaks();
    Ok(())
}

/// initialize → attach surface → load resources → run → release (on scope exit).
fn run(config: &DemoConfig, tracker: &ResourceTracker) -> Result<()> {
    let mut host = Host::new(HostConfig {
        title: "quill: text rendering".to_string(),
        ..HostConfig::default()
    })?;
    let surface = host.attach_surface()?;

    let mut presenter = GpuPresenter::new(&surface, GpuInit::default(), tracker)?;
    let resources = Resources::load(&FontDatabase::system(), tracker, surface.scale_factor())?;

    host.activate();

    let mut view = DemoView::new(&resources, config.animation);
    let mut frame_loop = FrameLoop::new(config.exit_key);
    frame_loop.run(&mut host, &mut presenter, &mut view, &CancelToken::new())?;

    Ok(())
}
