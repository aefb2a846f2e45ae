//! Interactive clipping-plane demo (headless)
//!
//! Composes a small scene of spinning cubes, drives the component
//! orchestrator at a fixed frame rate, and runs a scripted interaction
//! that would normally come from mouse picks: rays are cast into the
//! scene, clipping planes are created at the hit points, and the renderer
//! reports how much of the scene each plane cuts away.

use std::sync::{Arc, Mutex};

use rand::Rng;
use scene_engine::foundation::logging;
use scene_engine::prelude::*;
use thiserror::Error;

/// Demo failures
#[derive(Error, Debug)]
enum DemoError {
    /// Orchestrator misuse (a slot read before wiring)
    #[error(transparent)]
    Components(#[from] ComponentsError),

    /// Settings file present but unreadable
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

const SETTINGS_PATH: &str = "clipper.toml";
const CLIPPER_KEY: &str = "clipper";

/// Frames between spatial index rebuilds while meshes move
const REBUILD_INTERVAL: u64 = 60;
/// Length of one scripted interaction cycle
const SCRIPT_PERIOD: u64 = 600;

struct DemoApp {
    components: Components,
    run_frames: Option<u64>,
}

impl DemoApp {
    fn new(settings: Settings) -> Result<Self, DemoError> {
        install_acceleration(settings.acceleration.clone());

        let scheduler = Arc::new(Mutex::new(IntervalScheduler::new(settings.engine.target_fps)));
        let mut components = Components::new(scheduler);

        let spin_rate = settings.scene.spin_rate;
        let mut scene = SimpleScene::new();
        let mut handles = vec![
            scene.add_mesh(Mesh::cube("hero", 2.0).spinning(Vec3::y() * spin_rate)),
            scene.add_mesh(
                Mesh::cube("left", 1.0)
                    .at(Vec3::new(-4.0, 0.0, 0.0))
                    .spinning(Vec3::x() * spin_rate),
            ),
            scene.add_mesh(
                Mesh::cube("right", 1.0)
                    .at(Vec3::new(4.0, 0.0, 0.0))
                    .spinning(Vec3::z() * spin_rate),
            ),
        ];
        let mut rng = rand::thread_rng();
        for i in 0..settings.scene.debris_count {
            let position = Vec3::new(
                rng.gen_range(-8.0..8.0),
                rng.gen_range(-3.0..3.0),
                rng.gen_range(-8.0..8.0),
            );
            let spin = Vec3::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            ) * spin_rate;
            handles.push(scene.add_mesh(
                Mesh::cube(format!("debris_{i}"), 0.5).at(position).spinning(spin),
            ));
        }
        components.set_scene(Box::new(scene));
        components.meshes.append(&mut handles);

        let mut renderer = ForwardRenderer::new();
        renderer.set_background(Vec3::new(0.05, 0.05, 0.08));
        components.set_renderer(Box::new(renderer));

        let mut camera = OrbitCamera::new(settings.camera.distance);
        camera.orbit(settings.camera.yaw, settings.camera.pitch);
        components.set_camera(Box::new(camera));

        components.set_raycaster(Box::new(MeshRaycaster::new()));
        components.rebuild_pick_index()?;

        let shared = components.clipping_planes()?;
        components.register_tool(
            CLIPPER_KEY,
            Box::new(Clipper::with_config(shared, settings.clipper.clone())),
        );

        Ok(Self {
            components,
            run_frames: settings.engine.run_frames,
        })
    }

    fn run(mut self) -> Result<(), DemoError> {
        self.components.init();

        let mut frame: u64 = 0;
        loop {
            if let Some(limit) = self.run_frames {
                if frame >= limit {
                    break;
                }
            }
            if self.components.tick() {
                frame += 1;
                if frame % REBUILD_INTERVAL == 0 {
                    self.components.rebuild_pick_index()?;
                }
                self.drive_script(frame)?;
            }
        }

        self.components.dispose();
        self.report_stats()?;
        Ok(())
    }

    /// Scripted stand-in for mouse interaction
    fn drive_script(&mut self, frame: u64) -> Result<(), DemoError> {
        match frame % SCRIPT_PERIOD {
            120 => {
                let origin = self.components.camera()?.position();
                let ray = Ray::new(origin, Point3::origin() - origin);
                self.pick_and_clip(&ray)?;
            }
            300 => {
                let ray = Ray::new(Point3::new(15.0, 0.0, 0.0), -Vec3::x());
                self.pick_and_clip(&ray)?;
            }
            420 => {
                let clipper = self.clipper()?;
                if clipper.delete_nearest(Point3::origin()) {
                    log::info!("Deleted the clipping plane nearest the scene center");
                }
            }
            540 => {
                self.clipper()?.delete_all();
                log::info!("Cleared all clipping planes");
            }
            n if n % 120 == 0 => self.report_stats()?,
            _ => {}
        }
        Ok(())
    }

    fn pick_and_clip(&mut self, ray: &Ray) -> Result<(), DemoError> {
        match self.components.cast_ray(ray)? {
            Some(hit) => {
                log::info!(
                    "Pick hit at ({:.2}, {:.2}, {:.2}), distance {:.2}",
                    hit.point.x,
                    hit.point.y,
                    hit.point.z,
                    hit.distance
                );
                self.clipper()?.create_from_hit(&hit);
            }
            None => log::info!("Pick missed the scene"),
        }
        Ok(())
    }

    fn clipper(&mut self) -> Result<&mut Clipper, DemoError> {
        // The clipper is registered in `new`, so a miss here means the key
        // constant and registration diverged.
        Ok(self
            .components
            .tools_mut()
            .get_mut::<Clipper>(CLIPPER_KEY)
            .expect("clipper tool is registered at startup"))
    }

    fn report_stats(&self) -> Result<(), DemoError> {
        let scene = self.components.scene()?;
        let camera = self.components.camera()?;
        let renderer = self.components.renderer()?;
        if let Some(forward) = renderer.as_any().downcast_ref::<ForwardRenderer>() {
            let stats = forward.compose(scene, camera);
            log::info!(
                "Frame {}: {} drawn, {} clipped, {} hidden, {} plane(s) active",
                self.components.clock().frame_count(),
                stats.drawn,
                stats.clipped,
                stats.hidden,
                self.components.clipping_planes()?.read().unwrap().len()
            );
        }
        Ok(())
    }
}

fn main() -> Result<(), DemoError> {
    logging::init_with_level(log::LevelFilter::Info);

    println!("=== Clipping Plane Demo ===");
    println!("Headless run: a scripted interaction casts picking rays into");
    println!("a scene of spinning cubes and cuts it with clipping planes.");
    println!("Edit {SETTINGS_PATH} to change frame rate, camera, or clipper.");
    println!();

    let settings = Settings::load_or_default(SETTINGS_PATH)?;
    let app = DemoApp::new(settings)?;
    app.run()?;
    Ok(())
}
