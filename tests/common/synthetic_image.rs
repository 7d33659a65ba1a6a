use plant_morphometry::image::RgbImageU8;
use plant_morphometry::types::Rect;

/// Dark background with a uniformly coloured plant box.
pub fn plant_scene(width: usize, height: usize, plant: Rect, rgb: [u8; 3]) -> RgbImageU8 {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    let mut img = RgbImageU8::filled(width, height, [5, 5, 5]);
    let (x0, y0, x1, y1) = plant
        .clamped(img.shape())
        .expect("plant box must overlap the image");
    for y in y0..y1 {
        for x in x0..x1 {
            img.put_pixel(x, y, rgb);
        }
    }
    img
}

/// Several plant boxes side by side, each with its own colour.
pub fn multi_plant_scene(width: usize, height: usize, plants: &[(Rect, [u8; 3])]) -> RgbImageU8 {
    let mut img = RgbImageU8::filled(width, height, [5, 5, 5]);
    for &(rect, rgb) in plants {
        if let Some((x0, y0, x1, y1)) = rect.clamped(img.shape()) {
            for y in y0..y1 {
                for x in x0..x1 {
                    img.put_pixel(x, y, rgb);
                }
            }
        }
    }
    img
}
