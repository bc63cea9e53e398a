//! Two procedurally generated spiral galaxies rendered as point clouds in the
//! terminal, with orbit controls, labels and a scripted collision sequence.
//!
//! The interesting parts are [`galaxy::generate_galaxy`], which builds the
//! point buffers, and [`animator::CollisionAnimator`], which updates them every
//! frame. [`app::App::step`] advances a single frame against any
//! [`render::Renderer`], so the loop can be driven without a terminal.

pub mod animator;
pub mod app;
pub mod camera;
pub mod color;
pub mod config;
pub mod controls;
pub mod error;
pub mod galaxy;
pub mod graphics;
pub mod label;
pub mod logging;
pub mod math;
pub mod random;
pub mod render;
pub mod scene;
pub mod state;
pub mod vertex;
pub mod viewport;
