use std::fs;
use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use exif::{In, Reader, Tag, Value};
use log::{debug, warn};
use raylib::prelude::*;

/// EXIF orientation of a JPEG, 1 (upright) when absent or unreadable.
pub fn exif_orientation(file_bytes: &[u8]) -> Result<u16> {
    let exif = Reader::new().read_from_container(&mut Cursor::new(file_bytes))?;
    let orientation = match exif.get_field(Tag::Orientation, In::PRIMARY) {
        Some(field) => match &field.value {
            Value::Short(values) => values.first().copied().unwrap_or(1),
            _ => 1,
        },
        None => 1,
    };
    Ok(orientation)
}

/// Scale that fits a `width` x `height` picture inside the target area.
pub fn fit_scale(width: f32, height: f32, area_width: f32, area_height: f32) -> f32 {
    if width <= 0.0 || height <= 0.0 {
        return 1.0;
    }
    (area_width / width).min(area_height / height)
}

// --- Load Image, Apply EXIF Orientation, Create Texture ---
pub fn load_texture_with_exif_rotation(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    image_path: &Path,
) -> Result<Texture2D> {
    let file_bytes = fs::read(image_path)
        .with_context(|| format!("failed to read {}", image_path.display()))?;

    let extension = image_path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    // Only JPEG carries EXIF reliably
    let mut orientation = 1;
    if extension == "jpg" || extension == "jpeg" {
        match exif_orientation(&file_bytes) {
            Ok(value) => orientation = value,
            Err(e) => debug!("No EXIF data for {}: {}", image_path.display(), e),
        }
    }

    let mut image = Image::load_image_from_mem(&format!(".{}", extension), &file_bytes)
        .map_err(|e| anyhow!("failed to decode {}: {}", image_path.display(), e))?;

    // 2/4/5/7 are the mirrored variants of 1/3/6/8
    match orientation {
        1 => {}
        2 => image.flip_horizontal(),
        3 => {
            image.rotate_cw();
            image.rotate_cw();
        }
        4 => image.flip_vertical(),
        5 => {
            image.rotate_cw();
            image.flip_horizontal();
        }
        6 => image.rotate_cw(),
        7 => {
            image.rotate_ccw();
            image.flip_horizontal();
        }
        8 => image.rotate_ccw(),
        other => warn!("Unexpected EXIF orientation {} in {}", other, image_path.display()),
    }

    let texture = rl
        .load_texture_from_image(thread, &image)
        .map_err(|e| anyhow!("failed to create texture for {}: {}", image_path.display(), e))?;

    Ok(texture)
}
