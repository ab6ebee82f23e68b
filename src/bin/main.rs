//! Structure Render CLI
//!
//! Decode Minecraft structure files into render data, texture atlases and meshes.

use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use structure_render::{
    build_render_data, build_structure_atlas, export_raw, formats, load_resource_pack,
    CoreConfig, Format, ShapeRegistry, Structure, StructureMesher,
};

#[derive(Parser)]
#[command(name = "structure-render")]
#[command(author, version, about = "Decode Minecraft structure files into renderable data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by every subcommand.
#[derive(Args)]
struct Common {
    /// Structure file (.schematic, .schem, .litematic or .mcstructure)
    input: PathBuf,

    /// Format tag, when the file extension is missing or misleading
    #[arg(short, long)]
    format: Option<String>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Shape registry payload replacing the built-in table
    #[arg(long)]
    shapes: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show dimensions, palette and block count
    Info {
        #[command(flatten)]
        common: Common,
    },

    /// Write per-block render data as JSON
    Render {
        #[command(flatten)]
        common: Common,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Build the texture atlas for the structure's palette
    Atlas {
        #[command(flatten)]
        common: Common,

        /// Path to resource pack (ZIP or directory)
        #[arg(short, long)]
        resource_pack: Option<PathBuf>,

        /// Output file path for the atlas JSON
        #[arg(short, long)]
        output: PathBuf,

        /// Also write the atlas image as PNG
        #[arg(long)]
        png: Option<PathBuf>,
    },

    /// Mesh the structure and write raw buffers as JSON
    Mesh {
        #[command(flatten)]
        common: Common,

        /// Path to resource pack (ZIP or directory)
        #[arg(short, long)]
        resource_pack: Option<PathBuf>,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Info { common } => {
            let (structure, _, _) = load(&common)?;
            show_info(&structure);
        }
        Commands::Render { common, output } => {
            let (structure, config, registry) = load(&common)?;
            let data = build_render_data(&structure, &registry, config.mesher.parallel);
            fs::write(&output, data.to_json()?)?;
            println!("Wrote {} blocks to {:?}", data.blocks.len(), output);
        }
        Commands::Atlas {
            common,
            resource_pack,
            output,
            png,
        } => {
            let (structure, config, _) = load(&common)?;
            let pack = match resource_pack {
                Some(path) => load_resource_pack(path)?,
                None => config.texture_pack()?,
            };
            let atlas = build_structure_atlas(&structure, &pack, &config.atlas)?;

            fs::write(&output, atlas.to_json()?)?;
            println!(
                "Atlas: {}x{} for {} blocks, written to {:?}",
                atlas.width,
                atlas.height,
                atlas.uv_mapping.len(),
                output
            );
            if let Some(png_path) = png {
                fs::write(&png_path, &atlas.atlas_image)?;
                println!("  Image: {:?}", png_path);
            }
            if atlas.has_missing_textures() {
                println!("  Missing textures ({}):", atlas.missing_textures.len());
                for name in &atlas.missing_textures {
                    println!("    {}", name);
                }
            }
        }
        Commands::Mesh {
            common,
            resource_pack,
            output,
        } => {
            let (structure, config, registry) = load(&common)?;
            let pack = match resource_pack {
                Some(path) => load_resource_pack(path)?,
                None => config.texture_pack()?,
            };
            let atlas = build_structure_atlas(&structure, &pack, &config.atlas)?;
            let mesher = StructureMesher::with_config(&registry, config.mesher);
            let mesh = mesher.mesh(&structure, &atlas);

            let raw = export_raw(&mesh, &atlas);
            fs::write(&output, serde_json::to_string(&raw)?)?;
            println!(
                "  Generated {} vertices, {} triangles from {} blocks",
                raw.vertex_count(),
                raw.triangle_count(),
                mesh.block_count
            );
            println!("Exported mesh to {:?}", output);
        }
    }

    Ok(())
}

/// Decode the input and set up configuration and shape registry.
fn load(
    common: &Common,
) -> Result<(Structure, CoreConfig, ShapeRegistry), Box<dyn std::error::Error>> {
    let mut config = match &common.config {
        Some(path) => CoreConfig::load(path)?,
        None => CoreConfig::default(),
    };
    if let Some(shapes) = &common.shapes {
        config.shape_registry = Some(shapes.clone());
    }
    let registry = config.shape_registry()?;

    let format = resolve_format(&common.input, common.format.as_deref())?;
    println!("Loading {} structure from {:?}...", format, common.input);
    let data = fs::read(&common.input)?;
    let structure = formats::decode(&data, format)?;

    Ok((structure, config, registry))
}

fn resolve_format(path: &Path, tag: Option<&str>) -> Result<Format, Box<dyn std::error::Error>> {
    if let Some(tag) = tag {
        return Ok(tag.parse()?);
    }
    Format::from_extension(path).ok_or_else(|| {
        format!(
            "cannot tell the format of {:?}; pass --format schematic|schem|litematic|mcstructure",
            path
        )
        .into()
    })
}

fn show_info(structure: &Structure) {
    let d = structure.dimensions;
    println!("\nStructure Info:");
    println!("  Name: {}", structure.name);
    println!("  Dimensions: {}x{}x{}", d.width(), d.height(), d.length());
    println!("  Blocks: {}", structure.block_count());
    let outside = structure.out_of_bounds_count();
    if outside > 0 {
        println!("  Blocks outside bounds: {}", outside);
    }
    println!("  Palette ({} entries):", structure.palette.len());
    for (i, state) in structure.palette.iter().enumerate() {
        println!("    {:>4}  {}", i, state);
    }
}
