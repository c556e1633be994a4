use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use image_context_maker::{
    FrameOrder, ImageSequence, build_image_context,
    model::{DURATION_FIELD, MATERIAL_NAME, image_region},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, ValueEnum)]
enum Order {
    Natural,
    Lexical,
}

/// Build an image context from a directory of frames and summarise it.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Directory holding one image per frame
    directory: PathBuf,

    /// Playback rate
    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    /// How files are ordered into frames
    #[arg(long, value_enum, default_value = "natural")]
    order: Order,

    /// Save one frame of the image field as an 8-bit PNG
    #[arg(long, num_args = 2, value_names = ["FRAME", "PATH"])]
    export_frame: Option<Vec<String>>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let order = match args.order {
        Order::Natural => FrameOrder::Natural,
        Order::Lexical => FrameOrder::Lexical,
    };

    let images = ImageSequence::from_directory(&args.directory, order)?;
    info!(directory = %args.directory.display(), frames = images.len(), "found images");

    let data = build_image_context(images.image_files(), args.fps)?;
    let [width, height] = data.image_dimensions();
    println!("frames:     {}", data.frame_count());
    println!("dimensions: {width} x {height}");

    let Some(region) = image_region(data.context()) else {
        return Ok(());
    };
    let fields = region.field_module();
    if let Some(duration) = fields.find_field_by_name(DURATION_FIELD) {
        let value = fields.evaluate_real(&fields.create_field_cache(), duration)?;
        println!("duration:   {:.3} s", value[0]);
    }

    let Some(material) = region.material_module().find_material_by_name(MATERIAL_NAME) else {
        return Ok(());
    };
    if let Some([frame, path]) = args.export_frame.as_deref() {
        let index: usize = frame.parse()?;
        let volume = fields
            .field(material.image_field())?
            .image_volume()
            .ok_or("material is not backed by an image field")?;
        let image = volume
            .frame_image(index)
            .ok_or_else(|| format!("frame {index} is out of range"))?;
        image.save(path)?;
        info!(frame = index, path = %path, "exported frame");
    }

    Ok(())
}
