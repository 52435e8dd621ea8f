// Example runner for the `palette_recolor` library. The library entry point
// is `src/lib.rs`; this binary recolors one PNG from the command line so the
// engine can be eyeballed end-to-end.

use palette_recolor::core_modules::utils::image_helper::image_helper;
use palette_recolor::pipeline::{Outcome, RecolorConfig, RecolorPipeline, Rgb};
use std::env;

/// Parses `RRGGBB` (with or without a leading `#`) into an RGB triple.
fn parse_hex_color(raw: &str) -> Option<Rgb> {
    let hex = raw.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    let red = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let green = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let blue = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((red, green, blue))
}

fn main() {
    // --- 1. Argument Parsing & Setup ---
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        println!("Usage: palette_recolor <input_image> <output_png> [hex_color ...]");
        println!("Example: palette_recolor in.png out.png 1d3557 457b9d a8dacc");
        return;
    }
    let input_path = &args[1];
    let output_path = &args[2];

    let palette: Vec<Rgb> = if args.len() > 3 {
        args[3..]
            .iter()
            .filter_map(|raw| {
                let parsed = parse_hex_color(raw);
                if parsed.is_none() {
                    eprintln!("Skipping invalid hex color: {raw}");
                }
                parsed
            })
            .collect()
    } else {
        // A muted blue/sand default, three entries as the contract expects.
        vec![(29, 53, 87), (69, 123, 157), (230, 216, 178)]
    };

    // --- 2. Image Decode ---
    let (mut buffer, width, height) = match image_helper::load(input_path) {
        Ok(loaded) => loaded,
        Err(error) => {
            eprintln!("Failed to load {input_path}: {error}");
            std::process::exit(1);
        }
    };

    // --- 3. Recolor Pipeline ---
    let pipeline = RecolorPipeline::new(RecolorConfig {
        image_width: width,
        image_height: height,
        palette,
    });

    match pipeline.recolor_in_place(&mut buffer) {
        Ok(Outcome::Recolored(summary)) => {
            println!(
                "Recolored {} of {} pixels using {} dominant background color(s).",
                summary.stats.pixels_replaced,
                summary.stats.pixels_scanned,
                summary.dominant_colors.len()
            );
            for dominant in &summary.dominant_colors {
                let target = summary.color_mapping.get(&dominant.id);
                println!(
                    "  {:?} x{} -> {:?}",
                    dominant.rgb, dominant.count, target
                );
            }
        }
        Ok(Outcome::Unchanged) => {
            println!("No background pixels matched; output equals input.");
        }
        Err(error) => {
            eprintln!("Recolor failed: {error}");
            std::process::exit(1);
        }
    }

    // --- 4. Image Encode ---
    if let Err(error) = image_helper::save(output_path, width, height, &buffer) {
        eprintln!("Failed to save {output_path}: {error}");
        std::process::exit(1);
    }
    println!("Wrote {output_path} ({width}x{height}).");
}
