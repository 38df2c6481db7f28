use std::path::{Path, PathBuf};

use clap::Parser;

use crate::config::{load_config, EngineConfig};
use crate::engine::Engine;
use crate::error::{AppError, AppResult};
use crate::region::decode_snapshots;

#[derive(Parser, Debug)]
#[command(
    name = "redactor",
    version,
    about = "Pixelate, blur or black out regions of an image"
)]
pub struct CliArgs {
    /// Image to redact.
    pub input: PathBuf,

    /// JSON array of region snapshots (`{"id", "kind", "rect"}`).
    #[arg(short, long, value_name = "FILE")]
    pub regions: PathBuf,

    /// Output file; the format follows the extension.
    /// Defaults to `<input stem>-redacted.png` beside the input.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Filter strength as a fraction of the longer image edge.
    /// Overrides `filter_strength` from config.json.
    #[arg(long, value_name = "RATIO")]
    pub strength: Option<f64>,
}

impl CliArgs {
    fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.input))
    }

    fn engine_config(&self, mut config: EngineConfig) -> EngineConfig {
        if let Some(strength) = self.strength {
            config.filter_strength = strength;
        }
        config
    }
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    input.with_file_name(format!("{stem}-redacted.png"))
}

pub fn run(args: &CliArgs) -> AppResult<PathBuf> {
    let config = args.engine_config(load_config());
    let output = args.output_path();

    let image = image::open(&args.input)?.to_rgba8();
    let json = std::fs::read_to_string(&args.regions).map_err(|source| AppError::Read {
        path: args.regions.clone(),
        source,
    })?;
    let regions = decode_snapshots(&json)?;
    tracing::info!(
        input = %args.input.display(),
        regions = regions.len(),
        "applying regions"
    );

    let mut engine = Engine::with_config(&config);
    engine.set_image(Some(image));
    engine.insert_regions(regions);
    let rendered = engine.rendered_image().ok_or(AppError::NoImage)?;
    rendered.save(&output)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("redactor-cli-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("scratch dir should be creatable");
        dir
    }

    #[test]
    fn parses_positional_input_and_flags() {
        let args = CliArgs::try_parse_from([
            "redactor",
            "shot.png",
            "--regions",
            "r.json",
            "-o",
            "out.png",
            "--strength",
            "0.02",
        ])
        .expect("arguments should parse");
        assert_eq!(args.input, PathBuf::from("shot.png"));
        assert_eq!(args.regions, PathBuf::from("r.json"));
        assert_eq!(args.output_path(), PathBuf::from("out.png"));
        assert_eq!(args.engine_config(EngineConfig::default()).filter_strength, 0.02);
    }

    #[test]
    fn regions_flag_is_required() {
        assert!(CliArgs::try_parse_from(["redactor", "shot.png"]).is_err());
    }

    #[test]
    fn default_output_sits_beside_input() {
        assert_eq!(
            default_output_path(Path::new("/tmp/shots/screen.jpg")),
            PathBuf::from("/tmp/shots/screen-redacted.png")
        );
    }

    #[test]
    fn run_writes_redacted_image() {
        let dir = scratch_dir("run");
        let input = dir.join("input.png");
        RgbaImage::from_pixel(20, 10, Rgba([255, 255, 255, 255]))
            .save(&input)
            .expect("input should be writable");
        let regions = dir.join("regions.json");
        std::fs::write(
            &regions,
            r#"[{"id":"bar","kind":2,"rect":"{{0,0},{0.5,1}}"},{"id":"bad","kind":7,"rect":"{{0,0},{1,1}}"}]"#,
        )
        .expect("regions should be writable");

        let args = CliArgs {
            input,
            regions,
            output: None,
            strength: None,
        };
        let written = run(&args).expect("run should succeed");
        assert_eq!(written, dir.join("input-redacted.png"));

        let output = image::open(&written).expect("output should load").to_rgba8();
        assert_eq!(*output.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(*output.get_pixel(9, 9), Rgba([0, 0, 0, 255]));
        assert_eq!(*output.get_pixel(10, 0), Rgba([255, 255, 255, 255]));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn missing_regions_file_is_a_read_error() {
        let dir = scratch_dir("missing");
        let input = dir.join("input.png");
        RgbaImage::new(4, 4).save(&input).expect("input should be writable");
        let args = CliArgs {
            input,
            regions: dir.join("absent.json"),
            output: None,
            strength: None,
        };
        assert!(matches!(run(&args), Err(AppError::Read { .. })));
        let _ = std::fs::remove_dir_all(dir);
    }
}
