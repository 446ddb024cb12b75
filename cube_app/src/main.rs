//! Spinning cube demo application
//!
//! Drives the software rasterization pipeline headlessly: renders a rotating
//! mesh for a fixed number of frames and writes the final frame to a PNG
//! file. If the image shows a lit, rotated cube, the whole pipeline works
//! end to end.

use raster_engine::assets::obj_loader::ObjLoader;
use raster_engine::config::Config;
use raster_engine::foundation::math::{Mat4, Mat4Ext, Vec3};
use raster_engine::foundation::time::FrameClock;
use raster_engine::render::{
    Camera, CullMode, FrameConstants, FrameInput, Mesh, OutputImage, Rasterizer, RasterizerConfig,
};
use serde::{Deserialize, Serialize};

/// Settings file read from the working directory when present
const SETTINGS_PATH: &str = "cube_demo.toml";

/// Demo application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoSettings {
    /// Output image width in pixels
    pub width: u32,
    /// Output image height in pixels
    pub height: u32,
    /// Number of frames to render before writing the image
    pub frames: u32,
    /// Path of the PNG written from the final frame
    pub output_path: String,
    /// Optional OBJ model to render instead of the built-in cube
    pub model_path: Option<String>,
    /// Worker threads for the rasterizer (0 = available parallelism)
    pub worker_threads: usize,
    /// Back-face culling policy
    pub cull_mode: CullMode,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            frames: 120,
            output_path: "cube_demo.png".to_string(),
            model_path: None,
            worker_threads: 0,
            cull_mode: CullMode::Back,
        }
    }
}

impl Config for DemoSettings {}

pub struct DemoApp {
    settings: DemoSettings,
    rasterizer: Rasterizer,
    camera: Camera,
    mesh: Mesh,
    clock: FrameClock,
    total_rotation: f32,
}

impl DemoApp {
    pub fn new(settings: DemoSettings) -> Self {
        log::info!("Creating cube demo application...");

        let aspect = settings.width as f32 / settings.height as f32;
        let camera = Camera::perspective(Vec3::new(2.5, 2.0, 4.0), 45.0, aspect, 0.1, 100.0);

        let rasterizer = Rasterizer::new(
            RasterizerConfig::new()
                .with_cull_mode(settings.cull_mode)
                .with_worker_threads(settings.worker_threads),
        );

        Self {
            settings,
            rasterizer,
            camera,
            mesh: Mesh::cube(),
            clock: FrameClock::new(),
            total_rotation: 0.0,
        }
    }

    /// Load the configured model, falling back to the built-in cube
    pub fn initialize(&mut self) {
        let Some(path) = self.settings.model_path.clone() else {
            log::info!("No model configured, rendering the built-in cube");
            return;
        };

        match ObjLoader::load_obj(&path) {
            Ok(mut mesh) => {
                fit_to_view(&mut mesh);
                log::info!(
                    "Loaded {} with {} vertices and {} triangles",
                    path,
                    mesh.vertex_count(),
                    mesh.triangle_count()
                );
                self.mesh = mesh;
            }
            Err(e) => {
                // Fallback keeps the demo usable without any assets on disk
                log::warn!("Failed to load {}: {}, using fallback cube", path, e);
            }
        }
    }

    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.initialize();
        log::info!(
            "Rendering {} frames at {}x{}...",
            self.settings.frames,
            self.settings.width,
            self.settings.height
        );

        let view = self.camera.view_matrix();
        let projection = self.camera.projection_matrix();

        for frame_index in 0..self.settings.frames {
            let delta = self.clock.tick();
            // One full turn every 8 seconds.
            self.total_rotation += delta * std::f32::consts::PI / 4.0;

            let model = Mat4::rotation_y(self.total_rotation);
            // The light circles the scene at half the model's rate, so the
            // lit face changes over the run.
            let light_angle = self.total_rotation * 0.5;
            let light_position = Vec3::new(6.0 * light_angle.cos(), 5.0, 6.0 * light_angle.sin());
            let constants = FrameConstants::new(model, view, projection, light_position);
            let input = FrameInput {
                width: self.settings.width,
                height: self.settings.height,
                time: self.clock.total_time(),
                geometry: self.mesh.buffers(),
                constants: &constants,
            };

            let output = self.rasterizer.render_frame(&input)?;
            if frame_index + 1 == self.settings.frames {
                save_png(output, &self.settings.output_path)?;
                log::info!("Wrote final frame to {}", self.settings.output_path);
            }
        }

        log::info!(
            "Rendered {} frames, {:.1} fps average ({:.2} ms/frame)",
            self.clock.frame_count(),
            self.clock.average_fps(),
            self.clock.average_frame_millis()
        );
        self.rasterizer.teardown();
        Ok(())
    }
}

/// Scale an arbitrary model into the few-units box the demo camera frames
fn fit_to_view(mesh: &mut Mesh) {
    let mut min_pos = [f32::MAX; 3];
    let mut max_pos = [f32::MIN; 3];
    for position in &mesh.positions {
        for axis in 0..3 {
            min_pos[axis] = min_pos[axis].min(position[axis]);
            max_pos[axis] = max_pos[axis].max(position[axis]);
        }
    }

    let max_extent = (max_pos[0] - min_pos[0])
        .max(max_pos[1] - min_pos[1])
        .max(max_pos[2] - min_pos[2]);
    if max_extent > 4.0 {
        let scale = 4.0 / max_extent;
        for position in &mut mesh.positions {
            for component in position.iter_mut() {
                *component *= scale;
            }
        }
        log::debug!("Scaled model by {:.3} to fit the view", scale);
    }
}

fn save_png(output: &OutputImage, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let buffer =
        image::RgbaImage::from_raw(output.width(), output.height(), output.as_bytes().to_vec())
            .ok_or("rendered image dimensions disagree with its byte length")?;
    buffer.save(path)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Starting cube demo");

    let settings = if std::path::Path::new(SETTINGS_PATH).exists() {
        match DemoSettings::load_from_file(SETTINGS_PATH) {
            Ok(settings) => {
                log::info!("Loaded settings from {SETTINGS_PATH}");
                settings
            }
            Err(e) => {
                log::warn!("Could not read {SETTINGS_PATH}: {e}, using defaults");
                DemoSettings::default()
            }
        }
    } else {
        DemoSettings::default()
    };

    let mut app = DemoApp::new(settings);
    app.run()?;

    log::info!("Cube demo finished successfully");
    Ok(())
}
