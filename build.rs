use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Panel geometry of the 1.54" SSD1681 display
const PANEL_WIDTH: u32 = 200;
const PANEL_HEIGHT: u32 = 200;

/// Convert a PNG image into the panel's packed RAM format at build time.
///
/// Rows are `ceil(width / 8)` bytes, MSB first. A set bit is a white pixel,
/// so the buffer starts as all `0xFF` and dark pixels clear their bit.
fn convert_image_to_binary(
    input_path: &str,
    output_path: &str,
    target_width: u32,
    target_height: u32,
    threshold: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed={}", input_path);

    if !Path::new(input_path).exists() {
        println!("cargo:warning=Image file '{}' not found, skipping conversion", input_path);
        // Create empty file so build doesn't fail
        let mut file = File::create(output_path)?;
        file.write_all(&[])?;
        return Ok(());
    }

    let img = image::open(input_path)?;
    println!("cargo:warning=Original image size: {}x{}", img.width(), img.height());

    // Fit inside the panel, preserving aspect ratio
    let orig_ratio = img.width() as f32 / img.height() as f32;
    let target_ratio = target_width as f32 / target_height as f32;

    let (new_width, new_height) = if orig_ratio > target_ratio {
        (target_width, (target_width as f32 / orig_ratio) as u32)
    } else {
        ((target_height as f32 * orig_ratio) as u32, target_height)
    };

    let gray = img
        .resize(new_width, new_height, image::imageops::FilterType::Lanczos3)
        .to_luma8();

    let bytes_per_row = target_width.div_ceil(8);
    let mut buffer = vec![0xFFu8; (bytes_per_row * target_height) as usize];

    let offset_x = (target_width - new_width) / 2;
    let offset_y = (target_height - new_height) / 2;

    for y in 0..target_height {
        for x in 0..target_width {
            let brightness = match (x.checked_sub(offset_x), y.checked_sub(offset_y)) {
                (Some(ix), Some(iy)) if ix < new_width && iy < new_height => {
                    gray.get_pixel(ix, iy)[0]
                }
                _ => 255,
            };

            if brightness < threshold {
                let byte_index = (y * bytes_per_row + x / 8) as usize;
                buffer[byte_index] &= !(0x80 >> (x % 8));
            }
        }
    }

    let mut file = File::create(output_path)?;
    file.write_all(&buffer)?;

    println!("cargo:warning=Binary image saved to: {} ({} bytes)", output_path, buffer.len());
    Ok(())
}

fn main() {
    // Only the firmware build links against ESP-IDF
    if env::var_os("CARGO_FEATURE_ESP32").is_some() {
        embuild::espidf::sysenv::output();
    }

    let out_dir = env::var("OUT_DIR").unwrap();
    let logo_output = format!("{}/logo.bin", out_dir);

    if let Err(e) = convert_image_to_binary(
        "logo.png",
        &logo_output,
        PANEL_WIDTH,
        PANEL_HEIGHT,
        128, // threshold (0-255, 128 = middle gray)
    ) {
        println!("cargo:warning=Failed to convert logo.png: {}", e);
    }

    println!("cargo:rerun-if-changed=logo.png");
}
