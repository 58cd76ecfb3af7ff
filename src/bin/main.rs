//! Litematic Engine CLI
//!
//! Inspect, count, render and tile Minecraft litematic schematics.

use clap::{Parser, Subcommand, ValueEnum};
use litematic_engine::{AssemblyConfig, Engine, EngineConfig, Structure, Translations, ViewAxis};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "litematic-engine")]
#[command(author, version, about = "Process Minecraft litematic schematics", long_about = None)]
struct Cli {
    /// Engine configuration JSON (air ids, limits, colors)
    #[arg(short, long, global = true)]
    engine_config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show regions and metadata of a schematic
    Info {
        /// Input .litematic file
        file: PathBuf,
    },

    /// Print the material list
    Materials {
        /// Input .litematic file
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ListFormat,

        /// JSON table of display names keyed by block id
        #[arg(short, long)]
        translations: Option<PathBuf>,
    },

    /// Render top, front and side views as PNG
    Render {
        /// Input .litematic file
        file: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Tile regions and write the result as a new schematic
    Assemble {
        /// Input .litematic file
        file: PathBuf,

        /// Assembly JSON ({"entries": [...]})
        #[arg(short, long)]
        config: PathBuf,

        /// Output .litematic file
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ListFormat {
    /// JSON object keyed by block
    Json,
    /// name,count lines
    Csv,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.engine_config {
        Some(path) => EngineConfig::from_json(&fs::read_to_string(path)?)?,
        None => EngineConfig::default(),
    };
    let engine = Engine::new(config);

    match cli.command {
        Commands::Info { file } => {
            let structure = load(&engine, &file)?;
            show_info(&engine, &structure);
        }
        Commands::Materials {
            file,
            format,
            translations,
        } => {
            let structure = load(&engine, &file)?;
            print_materials(engine, &structure, format, translations.as_deref())?;
        }
        Commands::Render { file, output } => {
            let structure = load(&engine, &file)?;
            render_views(&engine, &structure, &output)?;
        }
        Commands::Assemble {
            file,
            config,
            output,
        } => {
            let structure = load(&engine, &file)?;
            let assembly = AssemblyConfig::from_json(&fs::read_to_string(&config)?)?;
            let tiled = engine.tile(&structure, &assembly)?;
            let bytes = engine.encode(&tiled)?;
            fs::write(&output, &bytes)?;
            println!(
                "Wrote {} regions ({} bytes) to {:?}",
                tiled.regions.len(),
                bytes.len(),
                output
            );
        }
    }

    Ok(())
}

fn load(engine: &Engine, path: &Path) -> Result<Structure, Box<dyn std::error::Error>> {
    let bytes = fs::read(path)?;
    Ok(engine.decode_and_build(&bytes)?)
}

fn show_info(engine: &Engine, structure: &Structure) {
    let meta = &structure.metadata;
    println!("Schematic Info:");
    if let Some(name) = &meta.name {
        println!("  Name: {}", name);
    }
    if let Some(author) = &meta.author {
        println!("  Author: {}", author);
    }
    println!("  Version: {}", structure.version);
    if let Some(data_version) = structure.minecraft_data_version {
        println!("  Data version: {}", data_version);
    }
    if let Some(bounds) = structure.bounds() {
        let dims = bounds.dimensions();
        println!("  Enclosing size: {}x{}x{}", dims.x, dims.y, dims.z);
    }
    println!(
        "  Blocks: {}",
        structure.non_air_count(&engine.config().air_ids)
    );

    println!("\nRegions:");
    for region in &structure.regions {
        let bounds = region.bounds();
        println!(
            "  {}: {:?} .. {:?}, {} palette entries, {} blocks",
            region.name,
            bounds.min.to_array(),
            bounds.max.to_array(),
            region.palette.len(),
            region.non_air_count(&engine.config().air_ids)
        );
    }
}

fn print_materials(
    engine: Engine,
    structure: &Structure,
    format: ListFormat,
    translations: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    match (format, translations) {
        (ListFormat::Csv, _) => print!("{}", engine.aggregate(structure).to_csv()),
        (ListFormat::Json, None) => {
            let json = engine.aggregate(structure).to_json();
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        (ListFormat::Json, Some(path)) => {
            let translations = Translations::from_json(&fs::read_to_string(path)?)?;
            let rows = engine.with_translations(translations).material_rows(structure);
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }
    Ok(())
}

fn render_views(
    engine: &Engine,
    structure: &Structure,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(output)?;
    let views = engine.render_views(structure)?;
    for axis in ViewAxis::ALL {
        let image = views.get(axis);
        let path = output.join(format!("{}.png", axis));
        if image.is_empty() {
            println!("Skipping empty {} view", axis);
            continue;
        }
        let png = image.to_png()?;
        fs::write(&path, &png)?;
        println!(
            "Exported {} view {}x{} ({} bytes) to {:?}",
            axis,
            image.width,
            image.height,
            png.len(),
            path
        );
    }
    Ok(())
}
