//! Image embedding encoders.
//!
//! The catalog and ranker only depend on the [`ImageEncoder`] capability;
//! any model with a matching output dimension can stand in for the
//! reference CLIP encoder.

use image::DynamicImage;

use crate::error::Result;

#[cfg(feature = "embeddings")]
use crate::models::product::EMBEDDING_DIM;

#[cfg(feature = "embeddings")]
use std::path::Path;

#[cfg(feature = "embeddings")]
use tch::{CModule, Device, Kind, Tensor};

#[cfg(feature = "embeddings")]
use crate::error::AppError;

/// Capability interface for turning a decoded image into a raw embedding.
///
/// Implementations must be deterministic for a fixed model and input, and
/// read-only after construction so a single instance can be shared across
/// concurrent requests.
pub trait ImageEncoder: Send + Sync {
    /// Length of the vectors this encoder produces.
    fn dimension(&self) -> usize;

    /// Compute a raw (not yet normalized) embedding for an RGB image.
    fn encode(&self, image: &DynamicImage) -> Result<Vec<f32>>;
}

/// CLIP ViT-B/32 visual tower loaded from a TorchScript export.
///
/// Loading the weights is expensive and happens exactly once, at startup;
/// the loaded module holds no per-call state.
#[cfg(feature = "embeddings")]
pub struct ClipEncoder {
    model: CModule,
    device: Device,
}

#[cfg(feature = "embeddings")]
impl std::fmt::Debug for ClipEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipEncoder")
            .field("device", &self.device)
            .finish()
    }
}

#[cfg(feature = "embeddings")]
impl ClipEncoder {
    /// CLIP input resolution.
    const INPUT_SIZE: u32 = 224;
    /// CLIP preprocessing channel means.
    const MEAN: [f32; 3] = [0.481_454_66, 0.457_827_5, 0.408_210_73];
    /// CLIP preprocessing channel standard deviations.
    const STD: [f32; 3] = [0.268_629_54, 0.261_302_58, 0.275_777_1];

    /// Load the TorchScript visual tower from `path`.
    ///
    /// Fails with `EncodingUnavailable` when the weights are missing or
    /// unloadable; callers keep the rest of the service running in that
    /// degraded mode.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let device = Device::cuda_if_available();
        let model = CModule::load_on_device(path, device).map_err(|e| {
            AppError::EncodingUnavailable(format!(
                "failed to load encoder weights from {}: {}",
                path.display(),
                e
            ))
        })?;
        log::info!("Loaded CLIP encoder from {} on {:?}", path.display(), device);

        Ok(Self { model, device })
    }

    /// Preprocess an image into a normalized `[1, 3, 224, 224]` tensor.
    fn preprocess(&self, img: &DynamicImage) -> Result<Tensor> {
        let img = img.resize_exact(
            Self::INPUT_SIZE,
            Self::INPUT_SIZE,
            image::imageops::FilterType::Triangle,
        );
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();

        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let pixel = rgb.get_pixel(x, y);
                data.push(pixel[0] as f32 / 255.0); // R
                data.push(pixel[1] as f32 / 255.0); // G
                data.push(pixel[2] as f32 / 255.0); // B
            }
        }

        // HWC -> CHW
        let tensor = Tensor::of_slice(&data)
            .reshape(&[height as i64, width as i64, 3])
            .permute(&[2, 0, 1])
            .to_kind(Kind::Float);

        let mean = Tensor::of_slice(&Self::MEAN).view([3, 1, 1]);
        let std = Tensor::of_slice(&Self::STD).view([3, 1, 1]);
        let normalized = (tensor - mean) / std;

        Ok(normalized.unsqueeze(0))
    }
}

#[cfg(feature = "embeddings")]
impl ImageEncoder for ClipEncoder {
    fn dimension(&self) -> usize {
        EMBEDDING_DIM
    }

    fn encode(&self, image: &DynamicImage) -> Result<Vec<f32>> {
        let input = self.preprocess(image)?.to(self.device);

        let output = tch::no_grad(|| self.model.forward_ts(&[&input]))?;
        let flat = output.squeeze();
        let embedding = Vec::<f32>::try_from(&flat)?;

        if embedding.len() != EMBEDDING_DIM {
            return Err(AppError::Internal(format!(
                "encoder produced {} floats, expected {}",
                embedding.len(),
                EMBEDDING_DIM
            )));
        }
        Ok(embedding)
    }
}
