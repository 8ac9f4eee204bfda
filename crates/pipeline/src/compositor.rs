//! Alpha-compositing of staged layer files into a single PNG.

use std::path::{Path, PathBuf};

use image::{imageops, ImageFormat};

use crate::error::PipelineError;

/// Flatten `layers` (bottom first) into a PNG at `output`.
///
/// The first layer is the canvas; every later layer is drawn over it at the
/// origin. Returns `Ok(false)` without writing anything when `layers` is
/// empty. Decoding and encoding run on the blocking pool.
pub async fn render(layers: &[PathBuf], output: &Path) -> Result<bool, PipelineError> {
    if layers.is_empty() {
        return Ok(false);
    }
    let layers = layers.to_vec();
    let output = output.to_path_buf();
    tokio::task::spawn_blocking(move || flatten(&layers, &output)).await??;
    Ok(true)
}

fn flatten(layers: &[PathBuf], output: &Path) -> Result<(), PipelineError> {
    let Some((base, rest)) = layers.split_first() else {
        return Ok(());
    };

    let mut canvas = image::open(base)?.to_rgba8();
    for path in rest {
        let layer = image::open(path)?.to_rgba8();
        imageops::overlay(&mut canvas, &layer, 0, 0);
    }

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    canvas.save_with_format(output, ImageFormat::Png)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn write_png(path: &Path, pixels: [[u8; 4]; 4]) {
        let mut img = RgbaImage::new(2, 2);
        for (i, px) in pixels.into_iter().enumerate() {
            img.put_pixel((i % 2) as u32, (i / 2) as u32, Rgba(px));
        }
        img.save_with_format(path, ImageFormat::Png).unwrap();
    }

    const CLEAR: [u8; 4] = [0, 0, 0, 0];
    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];

    #[tokio::test]
    async fn empty_list_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.png");
        assert!(!render(&[], &out).await.unwrap());
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn upper_layers_cover_lower_ones() {
        let dir = tempfile::tempdir().unwrap();
        let bottom = dir.path().join("bottom.png");
        let top = dir.path().join("top.png");
        write_png(&bottom, [RED, RED, RED, RED]);
        write_png(&top, [BLUE, CLEAR, CLEAR, BLUE]);

        let out = dir.path().join("nested/out.png");
        assert!(render(&[bottom, top], &out).await.unwrap());

        let result = image::open(&out).unwrap().to_rgba8();
        assert_eq!(result.dimensions(), (2, 2));
        assert_eq!(*result.get_pixel(0, 0), Rgba(BLUE));
        assert_eq!(*result.get_pixel(1, 0), Rgba(RED));
        assert_eq!(*result.get_pixel(0, 1), Rgba(RED));
        assert_eq!(*result.get_pixel(1, 1), Rgba(BLUE));
    }

    #[tokio::test]
    async fn single_layer_is_reencoded() {
        let dir = tempfile::tempdir().unwrap();
        let only = dir.path().join("only.png");
        write_png(&only, [RED, CLEAR, CLEAR, RED]);

        let out = dir.path().join("out.png");
        assert!(render(&[only], &out).await.unwrap());
        let result = image::open(&out).unwrap().to_rgba8();
        assert_eq!(*result.get_pixel(1, 0), Rgba(CLEAR));
    }

    #[tokio::test]
    async fn missing_layer_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.png");
        let err = render(&[dir.path().join("missing.png")], &out).await;
        assert!(err.is_err());
    }
}
