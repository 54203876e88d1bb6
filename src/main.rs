use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use log::{debug, info};

use warpfield::biome::{Biome, ModelLook};
use warpfield::config::FieldConfig;
use warpfield::field::Field;
use warpfield::frame::{FrameContext, Resolution};
use warpfield::palette::PalettePreset;
use warpfield::render::{render_sequence, save_frame, SequenceConfig};
use warpfield::wgsl::fragment_shader;
use warpfield::window::{self, WindowOptions};

#[derive(Parser)]
#[command(name = "warpfield", version, about = "Domain-warped fractal noise backgrounds")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Options shared by every subcommand that builds a field.
#[derive(Args)]
struct LookArgs {
    /// JSON field configuration; missing keys take their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Palette preset, applied last
    #[arg(long)]
    palette: Option<PalettePreset>,
    /// Biome whose look to use
    #[arg(long, conflicts_with = "mesh")]
    biome: Option<Biome>,
    /// Mesh names to derive the biome from (repeatable)
    #[arg(long)]
    mesh: Vec<String>,
}

impl LookArgs {
    fn field(&self) -> Result<Field, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => FieldConfig::from_json_file(path)?,
            None => FieldConfig::default(),
        };

        let biome = match self.biome {
            Some(biome) => Some(biome),
            None if !self.mesh.is_empty() => {
                let look = ModelLook::derive(self.mesh.iter().map(String::as_str));
                debug!("resolved meshes {:?}", look.meshes);
                look.dominant
            }
            None => None,
        };
        if let Some(biome) = biome {
            info!("using {} biome", biome);
            config = biome.profile().apply(config);
        }

        if let Some(preset) = self.palette {
            config = config.with_preset(preset);
        }

        Ok(Field::new(config)?)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Render a single frame to an image file
    Still {
        #[arg(long, default_value_t = 1920)]
        width: u32,
        #[arg(long, default_value_t = 1080)]
        height: u32,
        /// Elapsed time in seconds
        #[arg(long, default_value_t = 0.0)]
        time: f32,
        #[arg(long, default_value = "warpfield.png")]
        out: PathBuf,
        #[command(flatten)]
        look: LookArgs,
    },
    /// Render a numbered PNG sequence
    Frames {
        #[arg(long, default_value_t = 1280)]
        width: u32,
        #[arg(long, default_value_t = 720)]
        height: u32,
        #[arg(long, default_value_t = 120)]
        count: u32,
        #[arg(long, default_value_t = 30.0)]
        fps: f32,
        /// Elapsed time of the first frame
        #[arg(long, default_value_t = 0.0)]
        start: f32,
        #[arg(long, default_value = "frames")]
        out_dir: PathBuf,
        #[command(flatten)]
        look: LookArgs,
    },
    /// Open a live GPU window
    Window {
        #[arg(long, default_value_t = 1280)]
        width: u32,
        #[arg(long, default_value_t = 720)]
        height: u32,
        #[command(flatten)]
        look: LookArgs,
    },
    /// Print the generated WGSL shader
    Shader {
        #[command(flatten)]
        look: LookArgs,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Still {
            width,
            height,
            time,
            out,
            look,
        } => {
            let field = look.field()?;
            let frame = FrameContext::new(time, Resolution::new(width, height));
            save_frame(&field, &frame, &out)?;
        }
        Command::Frames {
            width,
            height,
            count,
            fps,
            start,
            out_dir,
            look,
        } => {
            let field = look.field()?;
            let sequence = SequenceConfig {
                resolution: Resolution::new(width, height),
                count,
                fps,
                start,
                out_dir,
            };
            let written = render_sequence(&field, &sequence)?;
            info!("wrote {} frames", written.len());
        }
        Command::Window {
            width,
            height,
            look,
        } => {
            let field = look.field()?;
            window::run(field, WindowOptions { width, height })?;
        }
        Command::Shader { look } => {
            let field = look.field()?;
            println!("{}", fragment_shader(field.config()));
        }
    }
    Ok(())
}
