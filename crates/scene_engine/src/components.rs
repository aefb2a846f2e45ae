//! Core component orchestrator

use thiserror::Error;

use crate::camera::CameraComponent;
use crate::foundation::time::Clock;
use crate::raycaster::{Ray, RaycastHit, RaycasterComponent};
use crate::render::{ClippingPlanes, RendererComponent};
use crate::scene::{MeshHandle, SceneComponent};
use crate::scheduler::{FrameHandle, SharedScheduler};
use crate::tools::{Tool, ToolRegistry};

/// Errors raised by the orchestrator
#[derive(Error, Debug)]
pub enum ComponentsError {
    /// A sub-system accessor was used before the sub-system was assigned.
    /// This is a programming error, not a runtime condition: configure the
    /// slot before reading it.
    #[error("the {0} sub-system has not been initialized; assign it before use")]
    NotInitialized(&'static str),
}

/// Central registry and lifecycle manager for scene composition
///
/// `Components` owns four optional sub-system slots (scene, renderer,
/// camera, raycaster), a membership list of meshes, and a registry of
/// tools. Once `init` is called it drives a fixed-order update every
/// scheduled frame (scene, renderer, camera, then tools) until `dispose`
/// cancels the chain.
///
/// Accessors and the frame update treat missing sub-systems differently,
/// on purpose: reading an unassigned slot through a getter is a hard
/// error, while the scheduled update silently skips unassigned slots.
/// Partial configurations are valid mid-setup; reaching for a slot that
/// was never wired is a bug.
pub struct Components {
    scene: Option<Box<dyn SceneComponent>>,
    renderer: Option<Box<dyn RendererComponent>>,
    camera: Option<Box<dyn CameraComponent>>,
    raycaster: Option<Box<dyn RaycasterComponent>>,

    /// Handles of meshes the caller has loaded
    ///
    /// Membership here is independent of the scene graph: adding a mesh to
    /// the scene does not add it here, and vice versa. Callers maintain
    /// both.
    pub meshes: Vec<MeshHandle>,

    tools: ToolRegistry,
    clock: Clock,
    scheduler: SharedScheduler,
    update_handle: Option<FrameHandle>,
}

impl Components {
    /// Create an orchestrator with every slot empty
    ///
    /// The clock starts stopped and no frame is armed until
    /// [`init`](Self::init).
    pub fn new(scheduler: SharedScheduler) -> Self {
        Self {
            scene: None,
            renderer: None,
            camera: None,
            raycaster: None,
            meshes: Vec::new(),
            tools: ToolRegistry::new(),
            clock: Clock::new(),
            scheduler,
            update_handle: None,
        }
    }

    /// Get the scene sub-system
    ///
    /// # Errors
    /// Returns [`ComponentsError::NotInitialized`] if no scene has been
    /// assigned.
    pub fn scene(&self) -> Result<&dyn SceneComponent, ComponentsError> {
        self.scene
            .as_deref()
            .ok_or(ComponentsError::NotInitialized("scene"))
    }

    /// Get mutable access to the scene sub-system
    ///
    /// # Errors
    /// Returns [`ComponentsError::NotInitialized`] if no scene has been
    /// assigned.
    pub fn scene_mut(&mut self) -> Result<&mut (dyn SceneComponent + 'static), ComponentsError> {
        self.scene
            .as_deref_mut()
            .ok_or(ComponentsError::NotInitialized("scene"))
    }

    /// Assign the scene sub-system
    ///
    /// Stores the reference unconditionally; assignment never starts the
    /// update chain.
    pub fn set_scene(&mut self, scene: Box<dyn SceneComponent>) {
        self.scene = Some(scene);
    }

    /// Get the renderer sub-system
    ///
    /// # Errors
    /// Returns [`ComponentsError::NotInitialized`] if no renderer has been
    /// assigned.
    pub fn renderer(&self) -> Result<&dyn RendererComponent, ComponentsError> {
        self.renderer
            .as_deref()
            .ok_or(ComponentsError::NotInitialized("renderer"))
    }

    /// Get mutable access to the renderer sub-system
    ///
    /// # Errors
    /// Returns [`ComponentsError::NotInitialized`] if no renderer has been
    /// assigned.
    pub fn renderer_mut(&mut self) -> Result<&mut (dyn RendererComponent + 'static), ComponentsError> {
        self.renderer
            .as_deref_mut()
            .ok_or(ComponentsError::NotInitialized("renderer"))
    }

    /// Assign the renderer sub-system
    pub fn set_renderer(&mut self, renderer: Box<dyn RendererComponent>) {
        self.renderer = Some(renderer);
    }

    /// Get the camera sub-system
    ///
    /// # Errors
    /// Returns [`ComponentsError::NotInitialized`] if no camera has been
    /// assigned.
    pub fn camera(&self) -> Result<&dyn CameraComponent, ComponentsError> {
        self.camera
            .as_deref()
            .ok_or(ComponentsError::NotInitialized("camera"))
    }

    /// Get mutable access to the camera sub-system
    ///
    /// # Errors
    /// Returns [`ComponentsError::NotInitialized`] if no camera has been
    /// assigned.
    pub fn camera_mut(&mut self) -> Result<&mut (dyn CameraComponent + 'static), ComponentsError> {
        self.camera
            .as_deref_mut()
            .ok_or(ComponentsError::NotInitialized("camera"))
    }

    /// Assign the camera sub-system
    pub fn set_camera(&mut self, camera: Box<dyn CameraComponent>) {
        self.camera = Some(camera);
    }

    /// Get the raycaster sub-system
    ///
    /// The raycaster is optional even for a fully running orchestrator,
    /// since only picking tools need it, but reading the slot before assignment
    /// fails like any other accessor.
    ///
    /// # Errors
    /// Returns [`ComponentsError::NotInitialized`] if no raycaster has
    /// been assigned.
    pub fn raycaster(&self) -> Result<&dyn RaycasterComponent, ComponentsError> {
        self.raycaster
            .as_deref()
            .ok_or(ComponentsError::NotInitialized("raycaster"))
    }

    /// Get mutable access to the raycaster sub-system
    ///
    /// # Errors
    /// Returns [`ComponentsError::NotInitialized`] if no raycaster has
    /// been assigned.
    pub fn raycaster_mut(&mut self) -> Result<&mut (dyn RaycasterComponent + 'static), ComponentsError> {
        self.raycaster
            .as_deref_mut()
            .ok_or(ComponentsError::NotInitialized("raycaster"))
    }

    /// Assign the raycaster sub-system
    pub fn set_raycaster(&mut self, raycaster: Box<dyn RaycasterComponent>) {
        self.raycaster = Some(raycaster);
    }

    /// Cast a ray against the scene through the raycaster slot
    ///
    /// # Errors
    /// Fails if the scene or raycaster has not been assigned. A ray that
    /// hits nothing is `Ok(None)`, not an error.
    pub fn cast_ray(&self, ray: &Ray) -> Result<Option<RaycastHit>, ComponentsError> {
        let scene = self.scene()?;
        let raycaster = self.raycaster()?;
        Ok(raycaster.cast(scene, ray))
    }

    /// Rebuild the raycaster's spatial index from the current scene
    ///
    /// Call after adding, removing, or moving meshes so accelerated picks
    /// see the new layout.
    ///
    /// # Errors
    /// Fails if the scene or raycaster has not been assigned.
    pub fn rebuild_pick_index(&mut self) -> Result<(), ComponentsError> {
        let scene = self
            .scene
            .as_deref()
            .ok_or(ComponentsError::NotInitialized("scene"))?;
        let raycaster = self
            .raycaster
            .as_deref_mut()
            .ok_or(ComponentsError::NotInitialized("raycaster"))?;
        raycaster.rebuild_index(scene);
        Ok(())
    }

    /// Shared handle to the renderer's clipping-plane list
    ///
    /// A convenience projection, not separately owned state: the handle
    /// aliases the very list the renderer culls against.
    ///
    /// # Errors
    /// Fails transitively if no renderer has been assigned.
    pub fn clipping_planes(&self) -> Result<ClippingPlanes, ComponentsError> {
        Ok(self.renderer()?.clipping_planes())
    }

    /// The tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Mutable access to the tool registry
    pub fn tools_mut(&mut self) -> &mut ToolRegistry {
        &mut self.tools
    }

    /// Register a tool under a capability key
    ///
    /// Convenience for `tools_mut().register(..)`; the orchestrator only
    /// ever drives tools through their update contract.
    pub fn register_tool(&mut self, key: impl Into<String>, tool: Box<dyn Tool>) {
        self.tools.register(key, tool);
    }

    /// The internal frame clock
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Whether the update chain is armed
    pub fn is_running(&self) -> bool {
        self.update_handle.is_some()
    }

    /// Start the clock and arm the recurring frame update
    ///
    /// Call exactly once. `init` is not idempotent: a second call restarts
    /// the clock and arms a fresh frame, orphaning the previously armed
    /// one (the stale frame is dropped on handle mismatch).
    pub fn init(&mut self) {
        log::info!("Components: starting update chain");
        self.clock.start();
        let handle = self.scheduler.lock().unwrap().schedule();
        self.update_handle = Some(handle);
    }

    /// Run one scheduled frame update if one is due
    ///
    /// Polls the scheduler for the armed frame; when it fires, updates the
    /// assigned sub-systems in fixed order (scene, renderer, camera, then
    /// every tool) with the clock's delta, and re-arms the next frame.
    /// Unassigned slots are skipped without error. Returns `true` if a
    /// frame ran.
    pub fn tick(&mut self) -> bool {
        let fired = self.scheduler.lock().unwrap().poll();
        let Some(fired) = fired else {
            return false;
        };
        if self.update_handle != Some(fired) {
            // A frame armed before dispose (or before a re-init) fired
            // late; the chain it belonged to is gone.
            log::debug!("Components: dropping stale frame {:?}", fired);
            return false;
        }

        let delta = self.clock.tick();

        if let Some(scene) = self.scene.as_deref_mut() {
            scene.update(delta);
        }
        if let Some(renderer) = self.renderer.as_deref_mut() {
            renderer.update(delta);
        }
        if let Some(camera) = self.camera.as_deref_mut() {
            camera.update(delta);
        }
        self.tools.update_all(delta);

        let handle = self.scheduler.lock().unwrap().schedule();
        self.update_handle = Some(handle);
        true
    }

    /// Cancel the update chain and stop the clock
    ///
    /// Only the armed next frame is canceled; a tick already executing
    /// runs to completion. Sub-systems, tools, and meshes are not torn
    /// down here; they are owned by this struct and released by `Drop`
    /// when the orchestrator itself goes away.
    pub fn dispose(&mut self) {
        log::info!("Components: disposing update chain");
        if let Some(handle) = self.update_handle.take() {
            self.scheduler.lock().unwrap().cancel(handle);
        }
        self.clock.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::OrbitCamera;
    use crate::foundation::math::{Mat4, Point3, Vec3};
    use crate::raycaster::{MeshRaycaster, Ray, RaycastHit};
    use crate::render::{ForwardRenderer, PostEffects};
    use crate::scene::{Mesh, SimpleScene};
    use crate::scheduler::ManualScheduler;
    use crate::spatial::Plane;
    use std::any::Any;
    use std::sync::{Arc, Mutex};

    type CallLog = Arc<Mutex<Vec<&'static str>>>;

    struct MockScene {
        log: CallLog,
        updates: usize,
    }

    impl SceneComponent for MockScene {
        fn update(&mut self, _delta: f32) {
            self.updates += 1;
            self.log.lock().unwrap().push("scene");
        }
        fn add_mesh(&mut self, _mesh: Mesh) -> MeshHandle {
            MeshHandle::default()
        }
        fn remove_mesh(&mut self, _handle: MeshHandle) -> Option<Mesh> {
            None
        }
        fn mesh(&self, _handle: MeshHandle) -> Option<&Mesh> {
            None
        }
        fn mesh_mut(&mut self, _handle: MeshHandle) -> Option<&mut Mesh> {
            None
        }
        fn mesh_handles(&self) -> Vec<MeshHandle> {
            Vec::new()
        }
        fn mesh_count(&self) -> usize {
            0
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    struct MockRenderer {
        log: CallLog,
        planes: ClippingPlanes,
    }

    impl MockRenderer {
        fn new(log: CallLog) -> Self {
            Self {
                log,
                planes: Arc::new(std::sync::RwLock::new(Vec::new())),
            }
        }
    }

    impl RendererComponent for MockRenderer {
        fn update(&mut self, _delta: f32) {
            self.log.lock().unwrap().push("renderer");
        }
        fn clipping_planes(&self) -> ClippingPlanes {
            Arc::clone(&self.planes)
        }
        fn post_effects(&self) -> PostEffects {
            PostEffects::empty()
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    struct MockCamera {
        log: CallLog,
    }

    impl CameraComponent for MockCamera {
        fn update(&mut self, _delta: f32) {
            self.log.lock().unwrap().push("camera");
        }
        fn view_matrix(&self) -> Mat4 {
            Mat4::identity()
        }
        fn projection_matrix(&self, _aspect: f32) -> Mat4 {
            Mat4::identity()
        }
        fn position(&self) -> Point3 {
            Point3::origin()
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    struct MockTool {
        label: &'static str,
        log: CallLog,
    }

    impl Tool for MockTool {
        fn update(&mut self, _delta: f32) {
            self.log.lock().unwrap().push(self.label);
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn manual_setup() -> (Components, Arc<Mutex<ManualScheduler>>) {
        let scheduler = Arc::new(Mutex::new(ManualScheduler::new()));
        let components = Components::new(scheduler.clone());
        (components, scheduler)
    }

    fn fully_mocked(log: &CallLog) -> (Components, Arc<Mutex<ManualScheduler>>) {
        let (mut components, scheduler) = manual_setup();
        components.set_scene(Box::new(MockScene {
            log: Arc::clone(log),
            updates: 0,
        }));
        components.set_renderer(Box::new(MockRenderer::new(Arc::clone(log))));
        components.set_camera(Box::new(MockCamera { log: Arc::clone(log) }));
        components.register_tool(
            "alpha",
            Box::new(MockTool {
                label: "tool:alpha",
                log: Arc::clone(log),
            }),
        );
        components.register_tool(
            "beta",
            Box::new(MockTool {
                label: "tool:beta",
                log: Arc::clone(log),
            }),
        );
        (components, scheduler)
    }

    fn run_frame(components: &mut Components, scheduler: &Arc<Mutex<ManualScheduler>>) -> bool {
        scheduler.lock().unwrap().advance();
        components.tick()
    }

    #[test]
    fn test_every_accessor_fails_before_assignment() {
        let (components, _) = manual_setup();

        assert!(matches!(
            components.scene(),
            Err(ComponentsError::NotInitialized("scene"))
        ));
        assert!(matches!(
            components.renderer(),
            Err(ComponentsError::NotInitialized("renderer"))
        ));
        assert!(matches!(
            components.camera(),
            Err(ComponentsError::NotInitialized("camera"))
        ));
        assert!(matches!(
            components.raycaster(),
            Err(ComponentsError::NotInitialized("raycaster"))
        ));
    }

    #[test]
    fn test_error_message_names_the_slot() {
        let (components, _) = manual_setup();
        let message = components.renderer().err().unwrap().to_string();
        assert!(message.contains("renderer"));
    }

    #[test]
    fn test_accessor_round_trip_returns_assigned_instance() {
        let (mut components, _) = manual_setup();
        let mut scene = SimpleScene::new();
        scene.add_mesh(Mesh::cube("marker", 1.0));
        components.set_scene(Box::new(scene));
        components.set_camera(Box::new(OrbitCamera::new(42.0)));
        components.set_raycaster(Box::new(MeshRaycaster::unaccelerated()));

        let scene = components.scene().unwrap();
        assert_eq!(scene.mesh_count(), 1);
        let camera = components
            .camera()
            .unwrap()
            .as_any()
            .downcast_ref::<OrbitCamera>()
            .expect("assigned camera should come back as an OrbitCamera");
        assert_eq!(camera.distance(), 42.0);
        assert!(components.raycaster().is_ok());
    }

    #[test]
    fn test_update_order_is_scene_renderer_camera_tools() {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let (mut components, scheduler) = fully_mocked(&log);

        components.init();
        assert!(run_frame(&mut components, &scheduler));

        assert_eq!(
            *log.lock().unwrap(),
            vec!["scene", "renderer", "camera", "tool:alpha", "tool:beta"]
        );
    }

    #[test]
    fn test_update_order_holds_every_frame() {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let (mut components, scheduler) = fully_mocked(&log);

        components.init();
        for _ in 0..3 {
            assert!(run_frame(&mut components, &scheduler));
        }

        let calls = log.lock().unwrap();
        assert_eq!(calls.len(), 15);
        for frame in calls.chunks(5) {
            assert_eq!(frame, ["scene", "renderer", "camera", "tool:alpha", "tool:beta"]);
        }
    }

    #[test]
    fn test_partial_configuration_updates_only_assigned() {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let (mut components, scheduler) = manual_setup();
        components.set_scene(Box::new(MockScene {
            log: Arc::clone(&log),
            updates: 0,
        }));

        components.init();
        assert!(run_frame(&mut components, &scheduler));

        assert_eq!(*log.lock().unwrap(), vec!["scene"]);
        let scene = components
            .scene()
            .unwrap()
            .as_any()
            .downcast_ref::<MockScene>()
            .unwrap();
        assert_eq!(scene.updates, 1);
    }

    #[test]
    fn test_empty_configuration_ticks_without_error() {
        let (mut components, scheduler) = manual_setup();
        components.init();
        assert!(run_frame(&mut components, &scheduler));
    }

    #[test]
    fn test_tick_without_due_frame_does_nothing() {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let (mut components, _scheduler) = fully_mocked(&log);

        components.init();
        assert!(!components.tick());
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_tick_before_init_does_nothing() {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let (mut components, scheduler) = fully_mocked(&log);

        scheduler.lock().unwrap().advance();
        assert!(!components.tick());
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_dispose_stops_all_further_updates() {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let (mut components, scheduler) = fully_mocked(&log);

        components.init();
        assert!(run_frame(&mut components, &scheduler));
        components.dispose();
        assert!(!components.is_running());

        let before = log.lock().unwrap().len();
        for _ in 0..5 {
            assert!(!run_frame(&mut components, &scheduler));
        }
        assert_eq!(log.lock().unwrap().len(), before);
        assert!(!components.clock().is_running());
    }

    #[test]
    fn test_init_starts_clock_and_arms_frame() {
        let (mut components, scheduler) = manual_setup();
        assert!(!components.is_running());

        components.init();
        assert!(components.is_running());
        assert!(components.clock().is_running());
        assert!(scheduler.lock().unwrap().is_armed());
    }

    #[test]
    fn test_clipping_planes_requires_renderer() {
        let (components, _) = manual_setup();
        assert!(matches!(
            components.clipping_planes(),
            Err(ComponentsError::NotInitialized("renderer"))
        ));
    }

    #[test]
    fn test_clipping_planes_alias_the_renderer_list() {
        let (mut components, _) = manual_setup();
        components.set_renderer(Box::new(ForwardRenderer::new()));

        let handle = components.clipping_planes().unwrap();
        handle
            .write()
            .unwrap()
            .push(Plane::from_point_normal(Point3::origin(), Vec3::x()));

        // The mutation is visible through a fresh projection from the
        // renderer itself: same list, not a copy.
        let renderer = components.renderer().unwrap();
        assert_eq!(renderer.clipping_planes().read().unwrap().len(), 1);
    }

    #[test]
    fn test_meshes_membership_is_not_synchronized_with_scene() {
        let (mut components, _) = manual_setup();
        components.set_scene(Box::new(SimpleScene::new()));

        let handle = components
            .scene_mut()
            .unwrap()
            .add_mesh(Mesh::cube("cube", 1.0));
        assert!(components.meshes.is_empty());

        components.meshes.push(handle);
        assert_eq!(components.meshes.len(), 1);
        assert_eq!(components.scene().unwrap().mesh_count(), 1);
    }

    #[test]
    fn test_raycaster_slot_works_through_orchestrator() {
        let (mut components, _) = manual_setup();
        let mut scene = SimpleScene::new();
        scene.add_mesh(Mesh::cube("cube", 2.0).at(Vec3::new(0.0, 0.0, -5.0)));
        components.set_scene(Box::new(scene));
        components.set_raycaster(Box::new(MeshRaycaster::unaccelerated()));

        components.rebuild_pick_index().unwrap();
        let hit: RaycastHit = components
            .cast_ray(&Ray::new(Point3::origin(), -Vec3::z()))
            .unwrap()
            .expect("ray should hit the cube");
        assert!(hit.distance > 0.0);
    }

    #[test]
    fn test_cast_ray_requires_scene_and_raycaster() {
        let (mut components, _) = manual_setup();
        let ray = Ray::new(Point3::origin(), -Vec3::z());

        assert!(matches!(
            components.cast_ray(&ray),
            Err(ComponentsError::NotInitialized("scene"))
        ));

        components.set_scene(Box::new(SimpleScene::new()));
        assert!(matches!(
            components.cast_ray(&ray),
            Err(ComponentsError::NotInitialized("raycaster"))
        ));
    }

    #[test]
    fn test_reinit_orphans_previous_frame() {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let (mut components, scheduler) = fully_mocked(&log);

        components.init();
        components.init();

        // The first armed frame was replaced by the second schedule call
        // on the same scheduler, so exactly one chain keeps running.
        assert!(run_frame(&mut components, &scheduler));
        assert_eq!(log.lock().unwrap().len(), 5);
    }
}
