use clap::{Parser, Subcommand, value_parser};
use glam::Vec3;
use itertools::Itertools;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(name = "Wonderland")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Streams a snowy, endless world of cells around a camera")]
pub struct CliArgs {
    #[arg(long, global = true, env = "WONDERLAND_ASSET_DIR", default_value = "./assets")]
    pub asset_dir: String,

    #[command(subcommand)]
    pub operation_mode: OperationMode,
}

#[derive(Subcommand, Debug)]
pub enum OperationMode {
    /// Moves the camera along a straight line and streams the world around it, without a window.
    Flythrough {
        #[arg(value_parser = value_parser!(Vector3))]
        start: Vector3,
        /// Direction of flight, does not need to be normalized
        #[arg(long, value_parser = value_parser!(Vector3), default_value = "(1, 0, 0)")]
        heading: Vector3,
        /// world units per second
        #[arg(long, default_value_t = 120.0)]
        speed: f32,
        #[arg(long, default_value_t = 600)]
        frames: u32,
        #[arg(long, default_value_t = 60.0)]
        fps: f32,
        /// Skip rendering chunks beyond the visibility cutoff
        #[arg(long)]
        cull: bool,
    },
    /// Prints the decoration of a cell.
    Inspect {
        #[arg(allow_negative_numbers = true)]
        cell_x: i32,
        #[arg(allow_negative_numbers = true)]
        cell_z: i32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<Vector3> for Vec3 {
    fn from(value: Vector3) -> Self {
        Vec3::new(value.x, value.y, value.z)
    }
}

fn trim_brackets(input: &str) -> &str {
    let mut chars = input.chars();
    chars.next(); // skip first
    chars.next_back(); // skip last
    chars.as_str()
}

impl FromStr for Vector3 {
    type Err = String;

    // (-a, b, c)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let string: String = s.chars().filter(|&c| !c.is_whitespace()).collect();
        if !string.starts_with('(') || !string.ends_with(')') {
            return Err("Missing start or end bracket".to_string());
        }

        let trimmed_str = trim_brackets(string.as_str());
        let splits = trimmed_str.split(',').collect_vec();

        if splits.len() != 3 {
            return Err(format!("Comma splitting resulted in {} splits, not 3!", splits.len()));
        }

        let components: Vec<f32> = splits
            .iter()
            .map(|&split| {
                split
                    .parse::<f32>()
                    .map_err(|err| format!("Failed to parse component \"{}\": {}", split, err))
            })
            .collect::<Result<_, _>>()?;

        Ok(Vector3 {
            x: components[0],
            y: components[1],
            z: components[2],
        })
    }
}
