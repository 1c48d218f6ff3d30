use std::{path::PathBuf, sync::Arc};

use candle_core::{DType, Device, Module, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::depth_anything_v2::{DepthAnythingV2, DepthAnythingV2Config};
use candle_transformers::models::dinov2;

use parallax_image::{ops, Image, ImageSize};
use parallax_imgproc::interpolation::InterpolationMode;
use parallax_imgproc::normalize::{normalize_mean_std, normalize_min_max};
use parallax_imgproc::resize::resize_native;

use crate::estimator::{DepthError, DepthEstimator};

struct DepthAnythingV2Preprocessor {
    resized_image: Image<f32, 3>,
    normalized_image: Image<f32, 3>,
}

impl DepthAnythingV2Preprocessor {
    // ImageNet statistics the published checkpoints were trained with
    const MAGIC_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
    const MAGIC_STD: [f32; 3] = [0.229, 0.224, 0.225];

    const DINO_IMG_SIZE: usize = 518;

    pub fn new() -> Result<Self, DepthError> {
        let new_size = [Self::DINO_IMG_SIZE, Self::DINO_IMG_SIZE].into();
        Ok(Self {
            resized_image: Image::from_size_val(new_size, 0f32)?,
            normalized_image: Image::from_size_val(new_size, 0f32)?,
        })
    }

    pub fn preprocess(
        &mut self,
        image: &Image<u8, 3>,
        device: &Device,
    ) -> Result<Tensor, DepthError> {
        // cast the image to f32 and scale it to the range [0, 1]
        let mut image_f32 = Image::from_size_val(image.size(), 0f32)?;
        ops::cast_and_scale(image, &mut image_f32, 1.0 / 255.0)?;

        // resize the image to the model input size
        resize_native(
            &image_f32,
            &mut self.resized_image,
            InterpolationMode::Bilinear,
        )?;

        // normalize the image to the mean and std
        normalize_mean_std(
            &self.resized_image,
            &mut self.normalized_image,
            &Self::MAGIC_MEAN,
            &Self::MAGIC_STD,
        )?;

        // convert the image to a candle tensor
        let img_t = Tensor::from_slice(
            self.normalized_image.as_slice(),
            &[Self::DINO_IMG_SIZE, Self::DINO_IMG_SIZE, 3],
            device,
        )?;

        // permute the image to the shape (1, c, h, w)
        let img_t = img_t.permute((2, 0, 1))?.unsqueeze(0)?;

        Ok(img_t)
    }
}

struct DepthAnythingV2Postprocessor;

impl DepthAnythingV2Postprocessor {
    pub fn postprocess(
        depth: &Tensor,
        target_size: ImageSize,
    ) -> Result<Image<f32, 1>, DepthError> {
        // convert the depth tensor to an image of shape (h, w, 1)
        let (_, _, rows, cols) = depth.dims4()?;

        let depth_data = depth.flatten_all()?.to_vec1::<f32>()?;
        let depth_image = Image::from_size_slice([cols, rows].into(), depth_data.as_slice())?;

        // normalize the depth image to the range [0, 1]
        let mut normalized_depth = Image::from_size_val(depth_image.size(), 0f32)?;
        normalize_min_max(&depth_image, &mut normalized_depth, 0.0, 1.0)?;

        // bring the depth map back to the photograph resolution
        let mut resized_depth = Image::from_size_val(target_size, 0f32)?;
        resize_native(
            &normalized_depth,
            &mut resized_depth,
            InterpolationMode::Bilinear,
        )?;

        Ok(resized_depth)
    }
}

/// Monocular depth estimation with Depth Anything v2 on candle.
///
/// Downloads the DINOv2 backbone and the Depth Anything head from the
/// Hugging Face hub unless local safetensors files are provided.
pub struct DepthAnything {
    #[allow(unused)]
    dinov2: Arc<dinov2::DinoVisionTransformer>,
    depth_anything: DepthAnythingV2,
    preprocessor: DepthAnythingV2Preprocessor,
    device: Device,
}

impl DepthAnything {
    /// Create a new Depth Anything estimator.
    ///
    /// # Arguments
    ///
    /// * `dinov2_model` - Optional path to the DINOv2 safetensors file.
    /// * `depth_anything_v2_model` - Optional path to the head safetensors file.
    pub fn new(
        dinov2_model: Option<PathBuf>,
        depth_anything_v2_model: Option<PathBuf>,
    ) -> Result<Self, DepthError> {
        // set the device to cuda if available, otherwise use cpu
        let device = match Device::cuda_if_available(0) {
            Ok(device) => device,
            Err(e) => {
                log::warn!("Failed to use CUDA, using CPU instead: {}", e);
                Device::Cpu
            }
        };

        let dinov2_model_file = match dinov2_model {
            None => {
                let api = hf_hub::api::sync::Api::new()?;
                let api = api.model("lmz/candle-dino-v2".into());
                api.get("dinov2_vits14.safetensors")?
            }
            Some(dinov2_model) => dinov2_model,
        };

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[dinov2_model_file], DType::F32, &device)?
        };
        let dinov2 = Arc::new(dinov2::vit_small(vb)?);

        let depth_anything_model_file = match depth_anything_v2_model {
            None => {
                let api = hf_hub::api::sync::Api::new()?;
                let api = api.model("jeroenvlek/depth-anything-v2-safetensors".into());
                api.get("depth_anything_v2_vits.safetensors")?
            }
            Some(depth_anything_model) => depth_anything_model,
        };

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[depth_anything_model_file], DType::F32, &device)?
        };

        let config = DepthAnythingV2Config::vit_small();
        let depth_anything = DepthAnythingV2::new(dinov2.clone(), config, vb)?;

        let preprocessor = DepthAnythingV2Preprocessor::new()?;

        Ok(Self {
            dinov2,
            depth_anything,
            preprocessor,
            device,
        })
    }
}

impl DepthEstimator for DepthAnything {
    fn estimate(&mut self, image: &Image<u8, 3>) -> Result<Image<f32, 1>, DepthError> {
        let img_t = self.preprocessor.preprocess(image, &self.device)?;
        let depth_t = self.depth_anything.forward(&img_t)?;
        DepthAnythingV2Postprocessor::postprocess(&depth_t, image.size())
    }
}
