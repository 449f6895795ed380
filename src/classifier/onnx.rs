use std::path::Path;

use tract_onnx::prelude::*;
use tracing::debug;

use super::preprocess::{self, CHANNELS, INPUT_SIZE};
use super::{Classification, Classifier, ClassifierError};

type Plan = TypedRunnableModel<TypedModel>;

/// ONNX image classifier taking NHWC `[1, 224, 224, 3]` float input
pub struct OnnxClassifier {
    model: Plan,
}

impl OnnxClassifier {
    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        let size = INPUT_SIZE as usize;
        let model = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| {
                model.with_input_fact(0, f32::fact([1, size, size, CHANNELS]).into())
            })
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| ClassifierError::Load(e.to_string()))?;

        Ok(Self { model })
    }

    fn run(&self, input: Vec<f32>) -> Result<Vec<f32>, ClassifierError> {
        let size = INPUT_SIZE as usize;
        let tensor: Tensor =
            tract_ndarray::Array4::from_shape_vec((1, size, size, CHANNELS), input)
                .map_err(|e| ClassifierError::Inference(e.to_string()))?
                .into();

        let outputs = self
            .model
            .run(tvec!(tensor.into()))
            .map_err(|e| ClassifierError::Inference(e.to_string()))?;

        let scores = outputs
            .first()
            .ok_or_else(|| ClassifierError::Inference("model returned no outputs".to_string()))?
            .to_array_view::<f32>()
            .map_err(|e| ClassifierError::Inference(e.to_string()))?
            .iter()
            .copied()
            .collect();

        Ok(scores)
    }
}

impl Classifier for OnnxClassifier {
    fn classify(&self, image: &[u8]) -> Result<Classification, ClassifierError> {
        let input = preprocess::preprocess(image)?;
        let scores = self.run(input)?;
        debug!("Model produced {} scores", scores.len());
        preprocess::summarize(&scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::preprocess::tests::sample_png;
    use image::{ImageBuffer, ImageFormat, Rgb};
    use std::io::Cursor;
    use std::path::PathBuf;

    const FIXTURE_CLASSES: usize = 3;

    /// Per-channel mean over H and W followed by softmax: `[1,224,224,3] -> [1,3]`
    fn fixture_path() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("src/classifier/testdata/channel_mean_softmax.onnx")
    }

    fn solid_png(color: [u8; 3]) -> Vec<u8> {
        let img = ImageBuffer::from_pixel(16, 16, Rgb(color));
        let mut bytes = Cursor::new(Vec::new());
        img.write_to(&mut bytes, ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_classify_fixed_image_is_bounded_and_repeatable() {
        let classifier = OnnxClassifier::load(&fixture_path()).unwrap();
        let image = sample_png(64, 48);

        let first = classifier.classify(&image).unwrap();
        let second = classifier.classify(&image).unwrap();

        assert!(first.class < FIXTURE_CLASSES);
        assert!((0.0..=1.0).contains(&first.probability));
        assert_eq!(first, second);
    }

    #[test]
    fn test_run_returns_one_score_per_class() {
        let classifier = OnnxClassifier::load(&fixture_path()).unwrap();
        let input = preprocess::preprocess(&solid_png([0, 255, 0])).unwrap();

        let scores = classifier.run(input).unwrap();

        assert_eq!(scores.len(), FIXTURE_CLASSES);
        let total: f32 = scores.iter().sum();
        assert!((total - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_dominant_channel_wins() {
        let classifier = OnnxClassifier::load(&fixture_path()).unwrap();

        let green = classifier.classify(&solid_png([0, 255, 0])).unwrap();
        assert_eq!(green.class, 1);
        let e = std::f32::consts::E;
        assert!((green.probability - e / (e + 2.0)).abs() < 1e-3);

        let blue = classifier.classify(&solid_png([0, 0, 255])).unwrap();
        assert_eq!(blue.class, 2);
    }

    #[test]
    fn test_wrong_input_length_is_an_inference_error() {
        let classifier = OnnxClassifier::load(&fixture_path()).unwrap();
        assert!(matches!(
            classifier.run(vec![0.0; 12]),
            Err(ClassifierError::Inference(_))
        ));
    }

    #[test]
    fn test_load_missing_file_is_a_load_error() {
        assert!(matches!(
            OnnxClassifier::load(Path::new("/nonexistent/model.onnx")),
            Err(ClassifierError::Load(_))
        ));
    }

    #[test]
    fn test_load_garbage_file_is_a_load_error() {
        let path = std::env::temp_dir().join(format!("not-a-model-{}.onnx", std::process::id()));
        std::fs::write(&path, b"not an onnx graph").unwrap();

        let result = OnnxClassifier::load(&path);
        let _ = std::fs::remove_file(&path);

        assert!(matches!(result, Err(ClassifierError::Load(_))));
    }
}
