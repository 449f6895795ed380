use image::imageops::{self, FilterType};

use super::{Classification, ClassifierError};

pub const INPUT_SIZE: u32 = 224;
pub const CHANNELS: usize = 3;

/// Decode, resize to the model input and scale RGB to [0, 1].
/// Output is NHWC with a batch of one, flattened row-major.
pub fn preprocess(bytes: &[u8]) -> Result<Vec<f32>, ClassifierError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| ClassifierError::InvalidImage(e.to_string()))?;

    let rgb = decoded.to_rgb8();
    let resized = imageops::resize(&rgb, INPUT_SIZE, INPUT_SIZE, FilterType::Triangle);

    Ok(resized
        .into_raw()
        .into_iter()
        .map(|v| f32::from(v) / 255.0)
        .collect())
}

/// Arg-max of the model output; ties go to the lowest index.
/// Raw logits are turned into probabilities first.
pub fn summarize(output: &[f32]) -> Result<Classification, ClassifierError> {
    if output.is_empty() || output.iter().any(|v| !v.is_finite()) {
        return Err(ClassifierError::Inference(
            "model produced no usable scores".to_string(),
        ));
    }

    let probabilities = if output.iter().all(|v| (0.0..=1.0).contains(v)) {
        output.to_vec()
    } else {
        softmax(output)
    };

    let mut best = 0;
    for (index, value) in probabilities.iter().enumerate() {
        if *value > probabilities[best] {
            best = index;
        }
    }

    Ok(Classification {
        class: best,
        probability: probabilities[best].clamp(0.0, 1.0),
    })
}

fn softmax(values: &[f32]) -> Vec<f32> {
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = values.iter().map(|v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|v| v / sum).collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageBuffer, ImageFormat, Rgb};
    use std::io::Cursor;

    /// A small PNG with a red left half and a blue right half
    pub(crate) fn sample_png(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_fn(width, height, |x, _| {
            if x < width / 2 {
                Rgb([255u8, 0, 0])
            } else {
                Rgb([0u8, 0, 255])
            }
        });
        let mut bytes = Cursor::new(Vec::new());
        img.write_to(&mut bytes, ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_preprocess_shape_and_range() {
        let input = preprocess(&sample_png(64, 48)).unwrap();
        assert_eq!(input.len(), (INPUT_SIZE * INPUT_SIZE) as usize * CHANNELS);
        assert!(input.iter().all(|v| (0.0..=1.0).contains(v)));

        // First pixel sits in the red half
        assert_eq!(&input[..3], &[1.0, 0.0, 0.0]);
        // Last pixel sits in the blue half
        assert_eq!(&input[input.len() - 3..], &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_preprocess_is_deterministic() {
        let png = sample_png(300, 200);
        assert_eq!(preprocess(&png).unwrap(), preprocess(&png).unwrap());
    }

    #[test]
    fn test_preprocess_rejects_garbage() {
        assert!(matches!(
            preprocess(b"definitely not an image"),
            Err(ClassifierError::InvalidImage(_))
        ));
    }

    #[test]
    fn test_summarize_picks_first_maximum() {
        let result = summarize(&[0.1, 0.4, 0.4, 0.1]).unwrap();
        assert_eq!(result.class, 1);
        assert!((result.probability - 0.4).abs() < f32::EPSILON);
    }

    #[test]
    fn test_summarize_normalizes_logits() {
        let result = summarize(&[-1.0, 3.0, 0.5]).unwrap();
        assert_eq!(result.class, 1);
        assert!(result.probability > 0.5 && result.probability <= 1.0);
    }

    #[test]
    fn test_summarize_rejects_empty_and_nan() {
        assert!(summarize(&[]).is_err());
        assert!(summarize(&[0.2, f32::NAN]).is_err());
    }
}
