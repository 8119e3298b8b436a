//! Amazon Titan image generation

use domain::{GenerationRequest, InvocationResult, ModelSelection};
use serde::{Deserialize, Serialize};

use super::{
    DEFAULT_IMAGE_PROMPT, ProviderCodec, check_error_field, decode_base64, extract,
    parse_document, to_payload,
};
use crate::error::InvocationError;
use crate::parameters::{ParameterSet, ParameterSpec};

const TASK_TYPE: &str = "TEXT_IMAGE";

static PARAMETERS: ParameterSet = ParameterSet {
    model_id: "amazon.titan-image-generator-v1",
    prompt_label: "text",
    prompt: DEFAULT_IMAGE_PROMPT,
    options: &[
        ParameterSpec::int("numberOfImages", "3"),
        ParameterSpec::text("quality", "standard"),
        ParameterSpec::int("width", "1024"),
        ParameterSpec::int("height", "1024"),
        ParameterSpec::float("cfgScale", "8.0"),
        ParameterSpec::int("seed", "0"),
        ParameterSpec::text("negativeText", ""),
    ],
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TitanImageRequest<'a> {
    task_type: &'static str,
    text_to_image_params: TextToImageParams<'a>,
    image_generation_config: ImageGenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TextToImageParams<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    negative_text: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageGenerationConfig<'a> {
    number_of_images: i64,
    quality: &'a str,
    width: i64,
    height: i64,
    cfg_scale: f64,
    seed: i64,
}

#[derive(Debug, Deserialize)]
struct TitanImageResponse {
    images: Vec<String>,
}

/// Codec for `amazon.titan-image-generator-*`
#[derive(Debug, Default, Clone, Copy)]
pub struct TitanImageCodec;

impl ProviderCodec for TitanImageCodec {
    fn selection(&self) -> ModelSelection {
        ModelSelection::TitanImage
    }

    fn parameters(&self) -> &'static ParameterSet {
        &PARAMETERS
    }

    fn encode(
        &self,
        request: &GenerationRequest,
        _streaming: bool,
    ) -> Result<Vec<u8>, InvocationError> {
        let negative_text = request.text("negativeText")?;

        to_payload(&TitanImageRequest {
            task_type: TASK_TYPE,
            text_to_image_params: TextToImageParams {
                text: request.prompt(),
                negative_text: Some(negative_text).filter(|text| !text.is_empty()),
            },
            image_generation_config: ImageGenerationConfig {
                number_of_images: request.int("numberOfImages")?,
                quality: request.text("quality")?,
                width: request.int("width")?,
                height: request.int("height")?,
                cfg_scale: request.float("cfgScale")?,
                seed: request.int("seed")?,
            },
        })
    }

    fn decode_sync(&self, body: &[u8]) -> Result<InvocationResult, InvocationError> {
        let document = parse_document(body)?;
        check_error_field(&document, "Image Generation Error")?;
        let response: TitanImageResponse = extract(document)?;

        let images = response
            .images
            .iter()
            .map(String::as_str)
            .map(decode_base64)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(InvocationResult::Image(images))
    }
}
