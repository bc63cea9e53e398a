use crate::animator::Phase;
use crate::camera::{PerspectiveCamera, DEFAULT_POSITION};
use crate::controls::OrbitControls;
use crate::galaxy::GalaxyParameters;
use crate::label::create_text_label;
use crate::random::UniformSource;
use crate::scene::{Node, Scene, SceneComposer, GALAXY_OFFSET};
use crate::viewport::Viewport;

/// Height of the galaxy labels above the disc plane
const LABEL_HEIGHT: f32 = 3.0;

/// Application state
///
/// Owned by the frame loop and lent to the animator and the renderer each frame.
pub struct AppState {
    pub scene: Scene,
    pub composer: SceneComposer,
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    pub viewport: Viewport,
    /// Enable debug mode
    pub debug: bool,
    /// Simulation paused
    pub paused: bool,
    /// Phase seen on the previous frame
    pub last_phase: Option<Phase>,
}

impl AppState {
    /// Builds the scene with both labels; galaxies are added by `create_galaxies`
    pub fn new(primary: GalaxyParameters, companion: GalaxyParameters, viewport: Viewport) -> Self {
        let mut scene = Scene::new();
        scene.add(Node::Label(
            create_text_label("Milky Way", 60.0, 2.0).with_position([-GALAXY_OFFSET, LABEL_HEIGHT, 0.0]),
        ));
        scene.add(Node::Label(
            create_text_label("Andromeda", 60.0, 2.0).with_position([GALAXY_OFFSET, LABEL_HEIGHT, 0.0]),
        ));

        AppState {
            scene,
            composer: SceneComposer::new(primary, companion),
            camera: PerspectiveCamera::new(75.0, viewport.aspect(), 0.1, 100.0),
            controls: OrbitControls::default(),
            viewport,
            debug: false,
            paused: false,
            last_phase: None,
        }
    }

    pub fn create_galaxies(&mut self, rng: &mut impl UniformSource) {
        self.composer.create_galaxies(&mut self.scene, rng);
    }

    /// Resize listener: new surface size, new camera aspect
    pub fn resize(&mut self, columns: u16, rows: u16) {
        self.viewport.resize(columns, rows);
        self.camera.aspect = self.viewport.aspect();
        self.camera.update_projection_matrix();
        tracing::debug!(target: "app", columns, rows, aspect = self.camera.aspect, "viewport resized");
    }

    pub fn reset_camera(&mut self) {
        self.camera.position = DEFAULT_POSITION;
        self.camera.look_at(self.controls.target);
        self.controls = OrbitControls::default();
    }
}
