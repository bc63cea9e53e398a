use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use galaxy_collision::animator::Phase;
use galaxy_collision::app::App;
use galaxy_collision::camera::PerspectiveCamera;
use galaxy_collision::error::Result;
use galaxy_collision::galaxy::GalaxyParameters;
use galaxy_collision::graphics::Framebuffer;
use galaxy_collision::math::{length, scale};
use galaxy_collision::random::RngSource;
use galaxy_collision::render::{rasterize, Hud, Renderer};
use galaxy_collision::scene::{Node, Scene};
use galaxy_collision::state::AppState;
use galaxy_collision::viewport::Viewport;
use rand::rngs::StdRng;

/// Rasterizes into memory and keeps what it was handed
struct HeadlessRenderer {
    framebuffer: Framebuffer,
    frames: usize,
    points_nodes: Vec<usize>,
    last_hud: Hud,
    viewports: Vec<Viewport>,
}

impl HeadlessRenderer {
    fn new(viewport: &Viewport) -> Self {
        let (width, height) = viewport.framebuffer_size();
        HeadlessRenderer {
            framebuffer: Framebuffer::new(width, height),
            frames: 0,
            points_nodes: Vec::new(),
            last_hud: Hud::default(),
            viewports: Vec::new(),
        }
    }

    fn lit_pixels(&self) -> usize {
        self.framebuffer.pixels.iter().filter(|p| p.r + p.g + p.b > 0.0).count()
    }
}

impl Renderer for HeadlessRenderer {
    fn set_viewport(&mut self, viewport: &Viewport) {
        let (width, height) = viewport.framebuffer_size();
        self.framebuffer.resize(width, height);
        self.viewports.push(*viewport);
    }

    fn render(&mut self, scene: &mut Scene, camera: &PerspectiveCamera, hud: &Hud) -> Result<()> {
        rasterize(scene, camera, &mut self.framebuffer, 0.08, hud.outline_labels);
        self.frames += 1;
        self.points_nodes.push(scene.points_count());
        self.last_hud = hud.clone();
        Ok(())
    }
}

fn app(count: usize, approach_speed: f32) -> (App<RngSource<StdRng>>, HeadlessRenderer) {
    let primary = GalaxyParameters {
        count,
        ..GalaxyParameters::default()
    };
    let companion = primary.companion();
    let viewport = Viewport::new(100, 40, 2);
    let state = AppState::new(primary, companion, viewport);
    let renderer = HeadlessRenderer::new(&viewport);
    (App::new(state, RngSource::new(Some(2024)), approach_speed), renderer)
}

/// Mean world-space position of each galaxy's particles
fn world_centroids(app: &App<RngSource<StdRng>>) -> Vec<[f32; 3]> {
    let (left, right) = app.state.composer.galaxies().unwrap();
    [left, right]
        .into_iter()
        .map(|id| {
            let points = app.state.scene.points(id).unwrap();
            let cloud = &points.geometry.cloud;
            let mut sum = [0.0f32; 3];
            for i in 0..cloud.len() {
                let world = points.transform.to_world(&cloud.position(i));
                for axis in 0..3 {
                    sum[axis] += world[axis];
                }
            }
            scale(&sum, 1.0 / cloud.len() as f32)
        })
        .collect()
}

fn press(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

#[test]
fn default_frames_spin_without_colliding() {
    let (mut app, mut renderer) = app(2_000, 0.0);
    for _ in 0..30 {
        assert_eq!(app.step(&mut renderer).unwrap(), Some(Phase::Approaching));
    }
    assert_eq!(renderer.frames, 30);
    assert_eq!(app.frame(), 30);
    assert!(renderer.lit_pixels() > 0);
    assert_eq!(app.galaxy_distance(), Some(40.0));
    assert!((app.state.camera.position[2] - 30.0).abs() < 1e-3);
}

#[test]
fn approach_speed_reaches_the_collision() {
    let (mut app, mut renderer) = app(500, 1.0);
    let mut phases = Vec::new();
    for _ in 0..40 {
        phases.push(app.step(&mut renderer).unwrap());
    }
    // 40 apart, closing 2 units per frame, colliding once under 10
    assert_eq!(phases[0], Some(Phase::Approaching));
    assert_eq!(phases.last().copied().flatten(), Some(Phase::Colliding));
    assert_eq!(app.galaxy_distance(), Some(0.0));
    assert!(app.state.camera.position[2] < 30.0);
}

#[test]
fn approaching_galaxies_merge_at_the_world_origin() {
    let (mut app, mut renderer) = app(500, 1.0);
    let start = world_centroids(&app);
    // The tilted companion's baked offset is rotated about the origin too
    assert!(start.iter().all(|c| length(c) > 12.0), "{start:?}");

    for _ in 0..600 {
        app.step(&mut renderer).unwrap();
    }

    for centroid in world_centroids(&app) {
        assert!(length(&centroid) < 1.0, "centroid {centroid:?} did not reach the origin");
    }
    let (left, right) = app.state.composer.galaxies().unwrap();
    for id in [left, right] {
        assert_eq!(app.state.scene.points(id).unwrap().transform.position, [0.0; 3]);
    }
}

#[test]
fn pause_freezes_the_animation_but_keeps_drawing() {
    let (mut app, mut renderer) = app(100, 0.0);
    app.handle_event(&press(KeyCode::Char('p')), &mut renderer);
    let (left, _) = app.state.composer.galaxies().unwrap();
    let before = app.state.scene.points(left).unwrap().transform.rotation;

    assert_eq!(app.step(&mut renderer).unwrap(), None);
    assert_eq!(app.state.scene.points(left).unwrap().transform.rotation, before);
    assert_eq!(renderer.last_hud.banner.as_deref(), Some("Paused"));

    app.handle_event(&press(KeyCode::Char(' ')), &mut renderer);
    assert_eq!(app.step(&mut renderer).unwrap(), Some(Phase::Approaching));
    assert_eq!(renderer.last_hud.banner, None);
}

#[test]
fn regenerating_keeps_one_pair_in_the_scene() {
    let (mut app, mut renderer) = app(100, 0.0);
    app.step(&mut renderer).unwrap();
    app.handle_event(&press(KeyCode::Char('g')), &mut renderer);
    app.handle_event(&press(KeyCode::Char('g')), &mut renderer);
    app.step(&mut renderer).unwrap();

    assert_eq!(renderer.points_nodes, vec![2, 2]);
    let labels = app
        .state
        .scene
        .nodes()
        .filter(|node| matches!(node, Node::Label(_)))
        .count();
    assert_eq!(labels, 2);
}

#[test]
fn resize_reaches_camera_and_renderer() {
    let (mut app, mut renderer) = app(10, 0.0);
    app.handle_event(&Event::Resize(60, 15), &mut renderer);
    assert_eq!(renderer.viewports.len(), 1);
    assert_eq!(renderer.viewports[0].columns, 60);
    assert_eq!(renderer.framebuffer.height, 30);
    assert!((app.state.camera.aspect - 2.0).abs() < 1e-6);
}

#[test]
fn debug_overlay_and_quit() {
    let (mut app, mut renderer) = app(10, 0.0);
    app.handle_event(&press(KeyCode::Char('d')), &mut renderer);
    app.step(&mut renderer).unwrap();
    assert!(renderer.last_hud.outline_labels);
    assert!(renderer.last_hud.lines[0].starts_with("galaxy-collision"));

    assert!(app.is_running());
    app.handle_event(&press(KeyCode::Char('q')), &mut renderer);
    assert!(!app.is_running());
}

#[test]
fn arrow_keys_orbit_the_camera() {
    let (mut app, mut renderer) = app(10, 0.0);
    let start = app.state.camera.position;
    app.handle_event(&press(KeyCode::Right), &mut renderer);
    for _ in 0..10 {
        app.step(&mut renderer).unwrap();
    }
    assert!(app.state.camera.position[0] > start[0]);
}
