use crate::color::Rgb;
use crate::error::{GalaxyError, Result};
use crate::galaxy::GalaxyParameters;
use clap::Parser;
use std::path::PathBuf;

/// Two spiral galaxies drifting through your terminal
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Cli {
    /// Particles per galaxy
    #[arg(long, default_value_t = 100_000)]
    pub count: usize,

    /// Point size in world units
    #[arg(long, default_value_t = 0.01)]
    pub size: f32,

    /// Galaxy radius
    #[arg(long, default_value_t = 16.07)]
    pub radius: f32,

    /// Number of spiral arms
    #[arg(long, default_value_t = 3)]
    pub branches: u32,

    /// Arm twist per unit of radius
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub spin: f32,

    /// Scatter as a fraction of radius
    #[arg(long, default_value_t = 0.2)]
    pub randomness: f32,

    /// Exponent pulling the scatter toward the arms
    #[arg(long, default_value_t = 3.0)]
    pub randomness_power: f32,

    /// Core color of the left galaxy
    #[arg(long, default_value = "#ff6030")]
    pub inside_color: Rgb,

    /// Rim color of the left galaxy
    #[arg(long, default_value = "#1b3984")]
    pub outside_color: Rgb,

    /// Core color of the right galaxy
    #[arg(long, default_value = "#30ff60")]
    pub second_inside_color: Rgb,

    /// Rim color of the right galaxy
    #[arg(long, default_value = "#841b39")]
    pub second_outside_color: Rgb,

    /// Seed for reproducible galaxies
    #[arg(long)]
    pub seed: Option<u64>,

    /// Target frames per second
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Vertical pixels per terminal cell (1 or 2)
    #[arg(long, default_value_t = 2)]
    pub pixel_ratio: u16,

    /// Brightness each particle adds to its pixel
    #[arg(long, default_value_t = 0.08)]
    pub exposure: f32,

    /// Units per frame each galaxy moves toward the other (0 keeps them apart)
    #[arg(long, default_value_t = 0.0)]
    pub approach_speed: f32,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Start with the debug overlay shown
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Parameters for the left and right galaxy
    pub fn galaxy_parameters(&self) -> Result<(GalaxyParameters, GalaxyParameters)> {
        let primary = GalaxyParameters {
            count: self.count,
            size: self.size,
            radius: self.radius,
            branches: self.branches,
            spin: self.spin,
            randomness: self.randomness,
            randomness_power: self.randomness_power,
            inside_color: self.inside_color,
            outside_color: self.outside_color,
        };
        let companion = GalaxyParameters {
            inside_color: self.second_inside_color,
            outside_color: self.second_outside_color,
            ..primary.clone()
        };
        primary.validate()?;
        Ok((primary, companion))
    }

    /// Rejects frame-loop settings that would stall or divide by zero
    pub fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            return Err(GalaxyError::InvalidParameter {
                name: "fps",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(self.exposure.is_finite() && self.exposure > 0.0) {
            return Err(GalaxyError::InvalidParameter {
                name: "exposure",
                reason: "must be a positive number".to_string(),
            });
        }
        if !(self.approach_speed.is_finite() && self.approach_speed >= 0.0) {
            return Err(GalaxyError::InvalidParameter {
                name: "approach_speed",
                reason: "must be zero or greater".to_string(),
            });
        }
        Ok(())
    }
}
