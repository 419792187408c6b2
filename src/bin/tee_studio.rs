//! Tee Studio - Garment Preview
//!
//! Run with: `cargo run --bin tee_studio [config.json]`
//!
//! Controls:
//! - Drop an image file on the window: upload artwork (left quarter = front,
//!   right quarter = back, anywhere else = active tab)
//! - Left mouse drag: Orbit around the tee
//! - Scroll wheel: Zoom
//! - 1-8: Pick a colour swatch
//! - Tab: Switch active tab (front/back)
//! - S / M / L: Decal size for the active tab
//! - Delete / Backspace: Remove the active tab's artwork
//! - P: Export snapshot (PNG)
//! - G: Generate AI design
//! - R: Reset camera
//! - ESC: Exit
//!
//! Browser (wasm): build with `cargo build --bin tee_studio --target wasm32-unknown-unknown`,
//! then run `wasm-bindgen` and serve. A `<canvas id="tee-studio">` is used when
//! present, otherwise one is appended to the page. Files dropped on the canvas
//! are read in the page and upload with the same quarter rule.

use std::path::PathBuf;
use std::sync::Arc;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen_futures::spawn_local;

use tee_studio_engine::input::{self, KeyBindings, KeyCode, PointerState, ScrollDelta, StudioAction};
use tee_studio_engine::render::{FrameStatus, GpuContext, GpuContextConfig, PreviewRenderer};
use tee_studio_engine::scene::{GarmentMesh, MeshCache, MeshSource, Scene};
use tee_studio_engine::studio::{
    CandidateFile, DesignGenerator, NoticeBoard, PreviewRegistry, SWATCHES, Side, SnapshotExporter,
    StudioConfig, StudioError, StudioSession, UnavailableGenerator,
};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode as WinitKey, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

/// Longest frame step fed to the idle sway (seconds).
const MAX_FRAME_STEP: f32 = 0.25;

// ============================================================================
// CLOCK
// ============================================================================

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = Date, js_name = now)]
    fn date_now() -> f64;
}

/// Wall-clock milliseconds since the Unix epoch.
#[cfg(target_arch = "wasm32")]
fn now_ms() -> f64 {
    date_now()
}

/// Wall-clock milliseconds since the Unix epoch.
#[cfg(not(target_arch = "wasm32"))]
fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

fn map_key(key: WinitKey) -> Option<KeyCode> {
    Some(match key {
        WinitKey::Digit1 => KeyCode::Digit1,
        WinitKey::Digit2 => KeyCode::Digit2,
        WinitKey::Digit3 => KeyCode::Digit3,
        WinitKey::Digit4 => KeyCode::Digit4,
        WinitKey::Digit5 => KeyCode::Digit5,
        WinitKey::Digit6 => KeyCode::Digit6,
        WinitKey::Digit7 => KeyCode::Digit7,
        WinitKey::Digit8 => KeyCode::Digit8,
        WinitKey::Tab => KeyCode::Tab,
        WinitKey::KeyS => KeyCode::S,
        WinitKey::KeyM => KeyCode::M,
        WinitKey::KeyL => KeyCode::L,
        WinitKey::KeyP => KeyCode::P,
        WinitKey::KeyG => KeyCode::G,
        WinitKey::KeyR => KeyCode::R,
        WinitKey::Delete => KeyCode::Delete,
        WinitKey::Backspace => KeyCode::Backspace,
        WinitKey::Escape => KeyCode::Escape,
        _ => return None,
    })
}

// ============================================================================
// APP
// ============================================================================

struct TeeStudioApp {
    config: StudioConfig,
    window: Option<Arc<Window>>,
    scene: Option<Scene>,
    renderer: Option<PreviewRenderer>,
    mesh_cache: MeshCache,
    session: StudioSession,
    registry: PreviewRegistry,
    notices: NoticeBoard,
    generator: Box<dyn DesignGenerator>,
    exporter: SnapshotExporter,
    bindings: KeyBindings,
    pointer: PointerState,
    /// Session start, wall-clock ms.
    started_ms: f64,
    last_frame_ms: f64,
    title: String,
    #[cfg(target_arch = "wasm32")]
    browser_drops: browser_drop::DropInbox,
}

impl TeeStudioApp {
    fn new(config: StudioConfig) -> Self {
        let now = now_ms();
        Self {
            session: StudioSession::new(config.color.default_color),
            notices: NoticeBoard::new(config.notices.lifetime_secs),
            generator: Box::new(UnavailableGenerator::new(config.generation.delay_secs)),
            config,
            window: None,
            scene: None,
            renderer: None,
            mesh_cache: MeshCache::new(),
            registry: PreviewRegistry::new(),
            exporter: SnapshotExporter::default(),
            bindings: KeyBindings::default(),
            pointer: PointerState::new(),
            started_ms: now,
            last_frame_ms: now,
            title: String::new(),
            #[cfg(target_arch = "wasm32")]
            browser_drops: browser_drop::DropInbox::default(),
        }
    }

    /// Seconds since the app started; the notice and generation clock.
    fn session_time(&self) -> f64 {
        (now_ms() - self.started_ms) / 1000.0
    }

    fn window_attributes(&self) -> WindowAttributes {
        WindowAttributes::default()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ))
    }

    fn gpu_config(&self) -> GpuContextConfig {
        GpuContextConfig {
            vsync: self.config.window.vsync,
            ..Default::default()
        }
    }

    fn load_mesh(&mut self) -> Arc<GarmentMesh> {
        let source = MeshSource::from_option(self.config.mesh_path.as_deref());
        match self.mesh_cache.get(&source) {
            Ok(mesh) => mesh,
            Err(err) => {
                tracing::error!(%err, ?source, "garment mesh unavailable, using built-in tee");
                self.notices.error(&err);
                Arc::new(GarmentMesh::builtin_tee())
            }
        }
    }

    /// Build the scene and renderer once the GPU is ready.
    fn attach(&mut self, window: Arc<Window>, gpu: GpuContext) {
        let device_limit = gpu.device.limits().max_texture_dimension_2d;
        self.config.intake.clamp_texture_dimension(device_limit);
        tracing::info!(
            max_pixels = self.config.intake.max_texture_dimension,
            "artwork size limited to device textures"
        );

        let mesh = self.load_mesh();
        let mut scene = Scene::new(&self.config, mesh, gpu.aspect());
        let mut renderer = PreviewRenderer::new(gpu, &scene);
        let changes = scene.sync(&self.session);
        renderer.apply(changes, &scene, &self.session);

        self.scene = Some(scene);
        self.renderer = Some(renderer);
        self.window = Some(window);
        self.last_frame_ms = now_ms();
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.session.clear(&mut self.registry);
        let leaked = self.registry.release_all();
        if leaked > 0 {
            tracing::warn!(leaked, "preview handles released at shutdown");
        }
        tracing::info!(
            issued = self.registry.issued_count(),
            released = self.registry.released_count(),
            "tee studio closed"
        );
        event_loop.exit();
    }

    // ------------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------------

    fn handle_action(&mut self, action: StudioAction, event_loop: &ActiveEventLoop) {
        let active = self.session.active_tab();
        match action {
            StudioAction::SelectSwatch(index) => {
                if let Some(swatch) = SWATCHES.get(index) {
                    self.session.set_color(swatch.color);
                    tracing::info!(swatch = swatch.name, color = %swatch.color, "colour selected");
                }
            }
            StudioAction::ToggleTab => {
                self.session.set_active_tab(active.opposite());
                self.notices
                    .info(format!("{} tab: {}", active.opposite(), self.session.status_line(active.opposite())));
            }
            StudioAction::SetSize(size) => self.session.set_size(active, size),
            StudioAction::RemoveArtwork => {
                if self.session.remove(active, &mut self.registry) {
                    self.notices.info(format!("{} design removed", active));
                }
            }
            StudioAction::ExportSnapshot => self.export_snapshot(),
            StudioAction::GenerateDesign => {
                let now = self.session_time();
                self.generator.request("", now);
                self.notices.info("Generating design...");
            }
            StudioAction::ResetCamera => {
                if let Some(scene) = self.scene.as_mut() {
                    scene.camera.reset();
                }
            }
            StudioAction::Quit => self.shutdown(event_loop),
        }
    }

    fn upload(&mut self, side: Side, file: CandidateFile) {
        match self
            .session
            .upload(side, file, &self.config.intake, &mut self.registry)
        {
            Ok(artwork) => {
                tracing::info!(%side, name = artwork.name(), bytes = artwork.size(), "artwork uploaded");
                self.notices
                    .success(format!("{} design uploaded successfully!", side.label()));
            }
            Err(err) => {
                tracing::warn!(%side, %err, "upload rejected");
                self.notices.error(&err);
            }
        }
    }

    fn handle_drop(&mut self, path: PathBuf) {
        let width = self.renderer_width();
        let side = input::drop_target(
            self.session.active_tab(),
            self.pointer.horizontal_fraction(width),
        );
        match CandidateFile::from_path(&path) {
            Ok(file) => self.upload(side, file),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "dropped file unreadable");
                self.notices.error(&err);
            }
        }
    }

    /// Uploads for files the page read since the last frame.
    #[cfg(target_arch = "wasm32")]
    fn drain_browser_drops(&mut self) {
        for dropped in self.browser_drops.take() {
            let side = input::drop_target(self.session.active_tab(), dropped.horizontal_fraction);
            self.upload(side, dropped.file);
        }
    }

    fn renderer_width(&self) -> u32 {
        self.window
            .as_ref()
            .map(|w| w.inner_size().width)
            .unwrap_or(self.config.window.width)
    }

    fn export_snapshot(&mut self) {
        let Some(renderer) = self.renderer.as_mut() else {
            self.notices.error(&StudioError::NoFrame);
            return;
        };
        let result = self
            .exporter
            .export(renderer, now_ms() as u64)
            .and_then(|snapshot| snapshot.write_to(&self.config.export.directory));
        match result {
            Ok(path) => self
                .notices
                .success(format!("Snapshot saved to {}", path.display())),
            Err(err) => self.notices.error(&err),
        }
    }

    fn poll_generation(&mut self, now: f64) {
        match self.generator.poll(now) {
            None => {}
            Some(Ok(image)) => {
                let encoded = self.exporter.encode(image, now_ms() as u64);
                match encoded {
                    Ok(snapshot) => {
                        let file = CandidateFile::new("generated-design.png", "image/png", snapshot.png);
                        self.upload(self.session.active_tab(), file);
                    }
                    Err(err) => self.notices.error(&err),
                }
            }
            Some(Err(err)) => self.notices.error(&err),
        }
    }

    // ------------------------------------------------------------------------
    // Frame
    // ------------------------------------------------------------------------

    fn frame(&mut self) {
        let now_wall = now_ms();
        let dt = (((now_wall - self.last_frame_ms) / 1000.0) as f32).clamp(0.0, MAX_FRAME_STEP);
        self.last_frame_ms = now_wall;

        let now = self.session_time();
        self.notices.advance(now);
        self.poll_generation(now);
        #[cfg(target_arch = "wasm32")]
        self.drain_browser_drops();

        let (Some(scene), Some(renderer)) = (self.scene.as_mut(), self.renderer.as_mut()) else {
            return;
        };
        let changes = scene.sync(&self.session);
        if changes.any() {
            renderer.apply(changes, scene, &self.session);
        }
        scene.advance(dt);
        if renderer.render(scene) == FrameStatus::Reconfigured {
            tracing::debug!("surface reconfigured");
        }

        self.update_title();
    }

    fn update_title(&mut self) {
        let active = self.session.active_tab();
        let mut title = format!(
            "{} | {} | {} [{}] {}",
            self.config.window.title,
            self.session.color(),
            active,
            self.session.size(active).label(),
            self.session.status_line(active),
        );
        if let Some(notice) = self.notices.latest() {
            title.push_str(" | ");
            title.push_str(&notice.message);
        }
        if title != self.title {
            if let Some(window) = &self.window {
                window.set_title(&title);
            }
            self.title = title;
        }
    }
}

impl ApplicationHandler for TeeStudioApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let window = match event_loop.create_window(self.window_attributes()) {
                Ok(window) => Arc::new(window),
                Err(err) => {
                    tracing::error!(%err, "failed to create window");
                    event_loop.exit();
                    return;
                }
            };
            match GpuContext::new(Arc::clone(&window), self.gpu_config()) {
                Ok(gpu) => self.attach(window, gpu),
                Err(err) => {
                    tracing::error!(%err, "GPU initialisation failed");
                    event_loop.exit();
                }
            }
        }
        #[cfg(target_arch = "wasm32")]
        let _ = event_loop;
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                if let PhysicalKey::Code(code) = event.physical_key
                    && let Some(key) = map_key(code)
                    && let Some(action) = self.bindings.action(key)
                {
                    self.handle_action(action, event_loop);
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let pressed = state == ElementState::Pressed;
                self.pointer.left_pressed = pressed;
                if let Some(scene) = self.scene.as_mut() {
                    scene.camera.set_orbiting(pressed);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = (position.x as f32, position.y as f32);
                self.pointer.set_position(x, y);
                if let Some(scene) = self.scene.as_mut() {
                    scene.camera.handle_mouse_move(x, y);
                }
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer.clear();
                if let Some(scene) = self.scene.as_mut() {
                    scene.camera.set_orbiting(false);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(x, y) => ScrollDelta::from_lines(x, y),
                    MouseScrollDelta::PixelDelta(pos) => ScrollDelta::from_pixels(pos.x, pos.y),
                };
                if !scroll.is_zero()
                    && let Some(scene) = self.scene.as_mut()
                {
                    scene.camera.handle_scroll(scroll.y);
                }
            }
            WindowEvent::DroppedFile(path) => self.handle_drop(path),
            WindowEvent::Resized(size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(size.width, size.height);
                }
                if let Some(scene) = self.scene.as_mut() {
                    scene.camera.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.frame(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    // No system clock in the browser.
    #[cfg(target_arch = "wasm32")]
    let _ = builder.without_time().try_init();
    #[cfg(not(target_arch = "wasm32"))]
    let _ = builder.try_init();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;

    init_logging();

    let config = match std::env::args_os().nth(1) {
        Some(path) => StudioConfig::load(std::path::Path::new(&path))
            .with_context(|| format!("loading config {}", PathBuf::from(&path).display()))?,
        None => StudioConfig::default(),
    };
    tracing::info!(
        max_upload_mb = config.intake.max_megabytes(),
        default_color = %config.color.default_color,
        export_dir = %config.export.directory.display(),
        "starting tee studio"
    );

    let event_loop = EventLoop::new().context("creating event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);
    let mut app = TeeStudioApp::new(config);
    event_loop.run_app(&mut app).context("running event loop")?;
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}

/// File drops on the page canvas. winit reports no `DroppedFile` on the web,
/// so the canvas listens for `drop` itself and queues the bytes for the app.
#[cfg(target_arch = "wasm32")]
mod browser_drop {
    use std::cell::RefCell;
    use std::rc::Rc;

    use tee_studio_engine::studio::CandidateFile;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::{JsFuture, spawn_local};
    use web_sys::js_sys::Uint8Array;
    use web_sys::{DragEvent, File, HtmlCanvasElement};

    /// A dropped file, read and waiting for the next frame.
    pub struct BrowserDrop {
        pub file: CandidateFile,
        /// Drop position across the canvas, 0 at the left edge.
        pub horizontal_fraction: Option<f32>,
    }

    #[derive(Clone, Default)]
    pub struct DropInbox(Rc<RefCell<Vec<BrowserDrop>>>);

    impl DropInbox {
        pub fn take(&self) -> Vec<BrowserDrop> {
            std::mem::take(&mut *self.0.borrow_mut())
        }

        /// Attach `dragover` and `drop` listeners. They live as long as the page.
        pub fn listen(&self, canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
            let dragover = Closure::<dyn FnMut(DragEvent)>::new(|event: DragEvent| {
                event.prevent_default();
            });
            canvas.add_event_listener_with_callback("dragover", dragover.as_ref().unchecked_ref())?;
            dragover.forget();

            let inbox = self.clone();
            let target = canvas.clone();
            let on_drop = Closure::<dyn FnMut(DragEvent)>::new(move |event: DragEvent| {
                event.prevent_default();
                let width = target.client_width();
                let horizontal_fraction =
                    (width > 0).then(|| (event.offset_x() as f32 / width as f32).clamp(0.0, 1.0));
                let Some(file) = event
                    .data_transfer()
                    .and_then(|transfer| transfer.files())
                    .and_then(|files| files.get(0))
                else {
                    return;
                };
                let inbox = inbox.clone();
                spawn_local(async move {
                    match read_bytes(&file).await {
                        Ok(bytes) => inbox.0.borrow_mut().push(BrowserDrop {
                            // The browser-declared type goes through intake unchanged.
                            file: CandidateFile::new(file.name(), file.type_(), bytes),
                            horizontal_fraction,
                        }),
                        Err(err) => tracing::warn!(name = %file.name(), ?err, "dropped file unreadable"),
                    }
                });
            });
            canvas.add_event_listener_with_callback("drop", on_drop.as_ref().unchecked_ref())?;
            on_drop.forget();
            Ok(())
        }
    }

    async fn read_bytes(file: &File) -> Result<Vec<u8>, JsValue> {
        let buffer = JsFuture::from(file.array_buffer()).await?;
        Ok(Uint8Array::new(&buffer).to_vec())
    }
}

#[cfg(target_arch = "wasm32")]
fn page_canvas() -> Option<web_sys::HtmlCanvasElement> {
    web_sys::window()?
        .document()?
        .get_element_by_id("tee-studio")?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .ok()
}

/// Browser entry point. Async GPU init then runs the studio loop.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_start() {
    use winit::platform::web::{WindowAttributesExtWebSys, WindowExtWebSys};

    console_error_panic_hook::set_once();
    init_logging();

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            tracing::error!(%err, "failed to create event loop");
            return;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = TeeStudioApp::new(StudioConfig::default());
    let canvas = page_canvas();
    let append = canvas.is_none();
    let attrs = app.window_attributes().with_canvas(canvas).with_append(append);

    #[allow(deprecated)]
    let window = match event_loop.create_window(attrs) {
        Ok(window) => Arc::new(window),
        Err(err) => {
            tracing::error!(%err, "failed to create window");
            return;
        }
    };

    match window.canvas() {
        Some(canvas) => {
            if let Err(err) = app.browser_drops.listen(&canvas) {
                tracing::error!(?err, "file drop unavailable");
            }
        }
        None => tracing::error!("window has no canvas, file drop unavailable"),
    }

    spawn_local(async move {
        match GpuContext::new_async(Arc::clone(&window), app.gpu_config()).await {
            Ok(gpu) => app.attach(window, gpu),
            Err(err) => {
                tracing::error!(%err, "GPU initialisation failed");
                return;
            }
        }
        if let Err(err) = event_loop.run_app(&mut app) {
            tracing::error!(%err, "event loop stopped");
        }
    });
}
