//! Stability AI Stable Diffusion XL

use domain::{GenerationRequest, InvocationResult, ModelSelection};
use serde::{Deserialize, Serialize};

use super::{
    DEFAULT_IMAGE_PROMPT, ProviderCodec, decode_base64, extract, parse_document, to_payload,
};
use crate::error::InvocationError;
use crate::parameters::{ParameterSet, ParameterSpec};

/// Finish reasons that mean no usable image was produced
const FAILED_FINISH_REASONS: [&str; 2] = ["ERROR", "CONTENT_FILTERED"];

static PARAMETERS: ParameterSet = ParameterSet {
    model_id: "stability.stable-diffusion-xl-v1",
    prompt_label: "Question",
    prompt: DEFAULT_IMAGE_PROMPT,
    options: &[
        ParameterSpec::int("width", "1024"),
        ParameterSpec::int("height", "1024"),
        ParameterSpec::float("cfg_scale", "7"),
        ParameterSpec::int("seed", "0"),
        ParameterSpec::int("steps", "50"),
        ParameterSpec::text("style_preset", "photographic"),
        ParameterSpec::float("weight", "1.0"),
    ],
};

#[derive(Debug, Serialize)]
struct DiffusionRequest<'a> {
    text_prompts: [TextPrompt<'a>; 1],
    width: i64,
    height: i64,
    cfg_scale: f64,
    seed: i64,
    steps: i64,
    style_preset: &'a str,
}

#[derive(Debug, Serialize)]
struct TextPrompt<'a> {
    text: &'a str,
    weight: f64,
}

#[derive(Debug, Deserialize)]
struct DiffusionResponse {
    artifacts: Vec<Artifact>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Artifact {
    base64: String,
    #[serde(default)]
    finish_reason: Option<String>,
}

/// Codec for `stability.stable-diffusion-xl-*`
#[derive(Debug, Default, Clone, Copy)]
pub struct StableDiffusionCodec;

impl ProviderCodec for StableDiffusionCodec {
    fn selection(&self) -> ModelSelection {
        ModelSelection::StableDiffusion
    }

    fn parameters(&self) -> &'static ParameterSet {
        &PARAMETERS
    }

    fn encode(
        &self,
        request: &GenerationRequest,
        _streaming: bool,
    ) -> Result<Vec<u8>, InvocationError> {
        to_payload(&DiffusionRequest {
            text_prompts: [TextPrompt {
                text: request.prompt(),
                weight: request.float("weight")?,
            }],
            width: request.int("width")?,
            height: request.int("height")?,
            cfg_scale: request.float("cfg_scale")?,
            seed: request.int("seed")?,
            steps: request.int("steps")?,
            style_preset: request.text("style_preset")?,
        })
    }

    fn decode_sync(&self, body: &[u8]) -> Result<InvocationResult, InvocationError> {
        let response: DiffusionResponse = extract(parse_document(body)?)?;

        let mut images = Vec::with_capacity(response.artifacts.len());
        for artifact in response.artifacts {
            if let Some(reason) = artifact
                .finish_reason
                .as_deref()
                .filter(|reason| FAILED_FINISH_REASONS.contains(reason))
            {
                return Err(InvocationError::Model(format!(
                    "Error in Image Generation: {reason}"
                )));
            }
            images.push(decode_base64(&artifact.base64)?);
        }

        Ok(InvocationResult::Image(images))
    }
}
