use anyhow::{ensure, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{debug, info};
use nalgebra::{Point3, Vector3};
use std::f32::consts::TAU;

use tilefit::buffer::{AttributeBuffers, VertexData};
use tilefit::geometry::FaceAxis;
use tilefit::primitive::cube::Cube;
use tilefit::primitive::extrude::Extrusion;
use tilefit::texture::{self, Caps, Rotation, TileOptions};
use tilefit::track::ScaleTracker;

/// Scale-aware texture coordinates without a renderer
#[derive(Parser)]
#[command(name = "rescale")]
#[command(about = "Recomputes texture coordinates of meshes as they are scaled")]
struct Cli {
    #[command(flatten)]
    tile: TileArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct TileArgs {
    /// Physical width covered by one tile
    #[arg(long, default_value_t = 1.0)]
    u_scale: f32,

    /// Physical height covered by one tile
    #[arg(long, default_value_t = 1.0)]
    v_scale: f32,

    /// Rotation of cap textures in degrees (0, 90, 180, or 270)
    #[arg(long, default_value_t = 0)]
    rotation: i32,

    /// Rotate bottom caps as well as top caps
    #[arg(long)]
    both_caps: bool,
}

impl TileArgs {
    fn options(&self) -> Result<TileOptions> {
        let options = TileOptions::default()
            .with_tile(self.u_scale, self.v_scale)
            .with_rotation(Rotation::from_degrees(self.rotation)?)
            .with_caps(if self.both_caps { Caps::Both } else { Caps::Top });
        options.validate()?;
        Ok(options)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Animate the scaling of a box and refit it every frame
    Cube {
        /// Scaling reached at the end of the animation
        #[arg(long, value_delimiter = ',', default_values_t = [1.0, 2.0, 1.0])]
        target: Vec<f32>,

        /// Number of frames to simulate
        #[arg(long, default_value_t = 8)]
        frames: usize,
    },

    /// Extrude a regular polygon and texture its caps
    Extrude {
        /// Number of sides of the polygon
        #[arg(long, default_value_t = 6)]
        sides: usize,

        /// Distance from the center of the polygon to its vertices
        #[arg(long, default_value_t = 1.0)]
        radius: f32,

        /// Depth of the extrusion
        #[arg(long, default_value_t = 0.5)]
        depth: f32,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let options = cli.tile.options()?;

    match cli.command {
        Commands::Cube { target, frames } => animate_cube(&target, frames, options),
        Commands::Extrude {
            sides,
            radius,
            depth,
        } => extrude(sides, radius, depth, &options),
    }
}

fn animate_cube(target: &[f32], frames: usize, options: TileOptions) -> Result<()> {
    ensure!(target.len() == 3, "target scaling must have three components");
    ensure!(frames > 0, "at least one frame is required");
    let target = Vector3::from_column_slice(target);

    let mut cube = Cube::new().to_buffers();
    let mut tracker = ScaleTracker::new(options);
    // The scaling grows over the first half of the animation and then holds.
    let ramp = (frames / 2).max(1);
    let mut refits = 0;
    for frame in 0..frames {
        let t = (frame as f32 / ramp as f32).min(1.0);
        cube.set_scaling(Vector3::repeat(1.0).lerp(&target, t));
        if tracker.before_render(&mut cube) {
            refits += 1;
            info!("frame {}: refit at scaling {:?}", frame, cube.scaling());
        }
        else {
            debug!("frame {}: scaling unchanged", frame);
        }
    }
    info!("{} refits over {} frames", refits, frames);
    print_faces(&cube, &Cube::FACES)
}

fn extrude(sides: usize, radius: f32, depth: f32, options: &TileOptions) -> Result<()> {
    let shape: Vec<_> = (0..sides)
        .map(|n| {
            let angle = TAU * (n as f32) / (sides as f32);
            Point3::new(radius * angle.cos(), 0.0, radius * angle.sin())
        })
        .collect();
    let uvs = texture::face_uvs_from_shape(&shape, options)?;
    info!("cap rectangle: {:?}", uvs.top.as_array());

    let extrusion = Extrusion::new(shape, depth)?;
    let mut buffers = extrusion.to_buffers(&uvs);
    let rotated = texture::rotate_cap_uvs(
        buffers.normals().context("extrusion has no normals")?,
        buffers.uvs().context("extrusion has no texture coordinates")?,
        options.rotation,
        options.caps,
    )?;
    buffers.set_uvs(rotated);

    for index in 0..sides {
        if let (Some(position), Some(uv)) = (buffers.position(index), buffers.uv(index)) {
            println!(
                "top {:>2}: ({:>6.3}, {:>6.3}) -> ({:>6.3}, {:>6.3})",
                index, position.x, position.z, uv.x, uv.y
            );
        }
    }
    Ok(())
}

fn print_faces(buffers: &AttributeBuffers, faces: &[FaceAxis]) -> Result<()> {
    for (n, face) in faces.iter().enumerate() {
        let uvs = (0..4)
            .map(|k| {
                buffers
                    .uv((n * 4) + k)
                    .map(|uv| format!("({:.3}, {:.3})", uv.x, uv.y))
                    .context("missing texture coordinate")
            })
            .collect::<Result<Vec<_>>>()?;
        println!("{:?} {:?}: {}", face.axis, face.sign, uvs.join(" "));
    }
    Ok(())
}
