use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Rgba};

/// Converts image to binary by keeping only bright pixels.
///
/// Pixels where R > threshold AND G > threshold AND B > threshold become black (text).
/// All other pixels become white (background).
///
/// The lobby and result panels draw names in white over a dark, busy
/// background; Tesseract reads dark-on-light text far more reliably.
pub fn threshold_bright_pixels(
    img: &ImageBuffer<Rgba<u8>, Vec<u8>>,
    threshold: u8,
) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut output = ImageBuffer::new(width, height);

    for (x, y, pixel) in img.enumerate_pixels() {
        let [r, g, b, _] = pixel.0;
        let value = if r > threshold && g > threshold && b > threshold {
            0u8
        } else {
            255u8
        };
        output.put_pixel(x, y, Luma([value]));
    }

    output
}

/// Prepares a screenshot for Tesseract: binarized when a threshold is
/// configured, plain grayscale otherwise.
pub fn prepare_for_ocr(img: &DynamicImage, binarize_threshold: Option<u8>) -> GrayImage {
    match binarize_threshold {
        Some(threshold) => threshold_bright_pixels(&img.to_rgba8(), threshold),
        None => img.to_luma8(),
    }
}
