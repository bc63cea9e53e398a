use crate::animator::{CollisionAnimator, Phase};
use crate::error::Result;
use crate::math::distance;
use crate::random::UniformSource;
use crate::render::{Hud, Renderer};
use crate::state::AppState;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::{Duration, Instant};

/// Orbit angle per arrow key press, in radians
const ORBIT_STEP: f32 = 0.15;
/// Orbit radius scale per zoom key press
const ZOOM_STEP: f32 = 0.9;

/// Drives the frame loop: input, animation, controls, redraw
pub struct App<R: UniformSource> {
    pub state: AppState,
    animator: CollisionAnimator,
    rng: R,
    /// Units per frame each galaxy anchor moves toward the other
    approach_speed: f32,
    started: Instant,
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
    frame: u64,
    running: bool,
}

impl<R: UniformSource> App<R> {
    /// Creates the app and generates the first pair of galaxies
    pub fn new(mut state: AppState, mut rng: R, approach_speed: f32) -> Self {
        state.create_galaxies(&mut rng);
        App {
            state,
            animator: CollisionAnimator::default(),
            rng,
            approach_speed,
            started: Instant::now(),
            frames_since_last_update: 0,
            last_fps_calculation: Instant::now(),
            fps: 0.0,
            frame: 0,
            running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Asks the loop to stop at the next frame boundary
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Current anchor distance between the galaxies
    pub fn galaxy_distance(&self) -> Option<f32> {
        let (left, right) = self.state.composer.galaxies()?;
        let left = self.state.scene.points(left)?;
        let right = self.state.scene.points(right)?;
        Some(distance(&left.anchor, &right.anchor))
    }

    /// Moves both galaxies toward each other until their anchors meet
    fn approach(&mut self) {
        if self.approach_speed <= 0.0 {
            return;
        }
        let Some((left, right)) = self.state.composer.galaxies() else {
            return;
        };
        let Some((left, right)) = self.state.scene.points_pair_mut(left, right) else {
            return;
        };
        let gap = right.anchor[0] - left.anchor[0];
        let step = self.approach_speed.min(gap.max(0.0) / 2.0);
        if step <= 0.0 {
            return;
        }
        left.translate(&[step, 0.0, 0.0]);
        right.translate(&[-step, 0.0, 0.0]);
    }

    /// Advances exactly one frame and redraws
    pub fn step(&mut self, renderer: &mut impl Renderer) -> Result<Option<Phase>> {
        let phase = if self.state.paused {
            None
        } else {
            self.approach();
            self.animator.advance(&mut self.state, &mut self.rng)
        };

        self.state.controls.update(&mut self.state.camera);

        // Update FPS calculation
        self.frames_since_last_update += 1;
        let now = Instant::now();
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }

        let hud = self.hud();
        renderer.render(&mut self.state.scene, &self.state.camera, &hud)?;
        self.frame += 1;
        Ok(phase)
    }

    /// Debug lines and the pause banner
    pub fn hud(&self) -> Hud {
        let mut lines = Vec::new();
        if self.state.debug {
            let camera = self.state.camera.position;
            lines.push(format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")));
            lines.push(format!("FPS: {:.2}", self.fps));
            lines.push(format!("Elapsed: {:.1}s", self.started.elapsed().as_secs_f64()));
            lines.push(format!(
                "Camera: ({:.2}, {:.2}, {:.2})",
                camera[0], camera[1], camera[2]
            ));
            if let Some(distance) = self.galaxy_distance() {
                lines.push(format!(
                    "Distance: {:.2} ({:?})",
                    distance,
                    self.state.last_phase.unwrap_or(Phase::Approaching)
                ));
            }
            lines.push(format!(
                "Particles: {}",
                self.state.composer.primary.count + self.state.composer.companion.count
            ));
        }
        Hud {
            lines,
            banner: self.state.paused.then(|| "Paused".to_string()),
            outline_labels: self.state.debug,
        }
    }

    /// Handles one input or resize event
    pub fn handle_event(&mut self, event: &Event, renderer: &mut impl Renderer) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                modifiers,
                ..
            }) => self.handle_key(*code, *modifiers),
            Event::Resize(columns, rows) => {
                self.state.resize(*columns, *rows);
                renderer.set_viewport(&self.state.viewport);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        let paused = self.state.paused;
        match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => self.stop(),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.stop(),
            KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char(' ') => {
                self.state.paused = !paused;
                tracing::info!(target: "app", paused = self.state.paused, "pause toggled");
            }
            KeyCode::Char('d') | KeyCode::Char('D') => self.state.debug = !self.state.debug,
            KeyCode::Char('r') | KeyCode::Char('R') if !paused => self.state.reset_camera(),
            KeyCode::Char('g') | KeyCode::Char('G') if !paused => {
                self.state.create_galaxies(&mut self.rng);
            }
            KeyCode::Left if !paused => self.state.controls.rotate_left(ORBIT_STEP),
            KeyCode::Right if !paused => self.state.controls.rotate_left(-ORBIT_STEP),
            KeyCode::Up if !paused => self.state.controls.rotate_up(ORBIT_STEP),
            KeyCode::Down if !paused => self.state.controls.rotate_up(-ORBIT_STEP),
            KeyCode::Char('+') | KeyCode::Char('=') if !paused => self.state.controls.dolly(ZOOM_STEP),
            KeyCode::Char('-') if !paused => self.state.controls.dolly(1.0 / ZOOM_STEP),
            _ => {}
        }
    }

    /// Runs until stopped, polling input between frames
    pub fn run(&mut self, renderer: &mut impl Renderer, fps: u32) -> Result<()> {
        let frame_budget = Duration::from_secs_f64(1.0 / fps.max(1) as f64);
        tracing::info!(target: "app", fps, "frame loop started");

        while self.running {
            let frame_start = Instant::now();
            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(&event, renderer);
            }
            if !self.running {
                break;
            }

            self.step(renderer)?;

            if let Some(remaining) = frame_budget.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(remaining);
            }
        }

        tracing::info!(target: "app", frames = self.frame, "frame loop stopped");
        Ok(())
    }
}
