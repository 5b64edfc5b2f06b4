use crate::image::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMax {
    pub min: f64,
    pub max: f64,
}

impl MinMax {
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// Min and max over finite samples. `None` if there is no finite sample at all.
pub fn find_min_max(image: &ImageLayerF64) -> Option<MinMax> {
    image.iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some(MinMax { min: v, max: v }),
            Some(mm) => Some(MinMax { min: mm.min.min(v), max: mm.max.max(v) }),
        })
}

/// Linear min-max stretch into 0..=255.
///
/// Scaled values are truncated, so only the maximum reaches 255.
/// Non-finite samples become 0. Constant image (or image without
/// finite samples) gives all-zero result.
pub fn normalize_to_u8(image: &ImageLayerF64) -> ImageLayerU8 {
    let mut result = ImageLayerU8::new(image.width(), image.height());

    let min_max = match find_min_max(image) {
        Some(mm) if mm.range() > 0.0 => mm,
        _ => {
            log::debug!("Degenerate range, image is converted to zeros");
            return result;
        }
    };

    let range = min_max.range();
    for (d, s) in result.iter_mut().zip(image.iter()) {
        if !s.is_finite() { continue; }
        let norm = (s - min_max.min) / range;
        *d = (norm * 255.0).clamp(0.0, 255.0) as u8;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    fn layer(width: Crd, height: Crd, data: Vec<f64>) -> ImageLayerF64 {
        ImageLayerF64::from_vec(width, height, data).unwrap()
    }

    #[test]
    fn known_values() {
        let image = layer(3, 1, vec![10.0, 200.0, 105.0]);
        let result = normalize_to_u8(&image);
        // (105-10)/(200-10)*255 = 127.5 which is truncated
        assert_eq!(result.as_slice(), &[0, 255, 127]);
    }

    #[test]
    fn constant_image_is_black() {
        let image = layer(4, 4, vec![42.0; 16]);
        let result = normalize_to_u8(&image);
        assert!(result.iter().all(|&v| v == 0));
        assert_eq!(result.width(), 4);
        assert_eq!(result.height(), 4);
    }

    #[test]
    fn non_finite_values_are_ignored() {
        let image = layer(2, 2, vec![f64::NAN, 0.0, f64::INFINITY, 50.0]);
        assert_eq!(find_min_max(&image), Some(MinMax { min: 0.0, max: 50.0 }));
        let result = normalize_to_u8(&image);
        assert_eq!(result.as_slice(), &[0, 0, 0, 255]);
    }

    #[test]
    fn only_blank_values() {
        let image = layer(2, 1, vec![f64::NAN, f64::NAN]);
        assert_eq!(find_min_max(&image), None);
        assert_eq!(normalize_to_u8(&image).as_slice(), &[0, 0]);
    }

    #[test]
    fn negative_values() {
        let image = layer(3, 1, vec![-1000.0, 0.0, 1000.0]);
        assert_eq!(normalize_to_u8(&image).as_slice(), &[0, 127, 255]);
    }

    #[test]
    fn random_images_hit_both_ends() {
        let mut rng = StdRng::seed_from_u64(12345);
        for _ in 0..20 {
            let data: Vec<f64> = (0..64).map(|_| rng.gen_range(-5000.0..65535.0)).collect();
            let image = layer(8, 8, data);
            let mm = find_min_max(&image).unwrap();
            let result = normalize_to_u8(&image);
            for (src, dst) in image.iter().zip(result.iter()) {
                if *src == mm.min { assert_eq!(*dst, 0); }
                if *src == mm.max { assert_eq!(*dst, 255); }
            }
            assert!(result.iter().any(|&v| v == 0));
            assert!(result.iter().any(|&v| v == 255));
        }
    }
}
