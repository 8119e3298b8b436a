//! Terminal rendering of invocation results

use std::io::{self, Write};
use std::path::Path;

use ai_core::{FoundationModelSummary, generated_image_name};
use domain::{Embedding, InvocationResult, StreamEvent, TextGeneration};

/// Print a single-shot result
///
/// Images have already been written by the adapter; only their location is
/// reported here.
pub fn render_result(
    out: &mut impl Write,
    result: &InvocationResult,
    image_dir: &Path,
) -> io::Result<()> {
    match result {
        InvocationResult::Text(generations) => render_generations(out, generations),
        InvocationResult::Image(images) => {
            for (index, image) in images.iter().enumerate() {
                let path = image_dir.join(generated_image_name(index));
                writeln!(
                    out,
                    "Image written: {} ({} bytes)",
                    path.display(),
                    image.len()
                )?;
            }
            Ok(())
        },
        InvocationResult::Embedding(embedding) => render_embedding(out, embedding),
    }
}

fn render_generations(out: &mut impl Write, generations: &[TextGeneration]) -> io::Result<()> {
    let numbered = generations.len() > 1;
    for (index, generation) in generations.iter().enumerate() {
        if numbered {
            writeln!(out, "Generation {}:", index + 1)?;
        }
        writeln!(out, "Output text: {}", generation.text.trim())?;
        if let Some(count) = generation.token_count {
            writeln!(out, "Token count: {count}")?;
        }
        if let Some(reason) = &generation.finish_reason {
            writeln!(out, "Finish reason: {reason}")?;
        }
        if let Some(likelihood) = generation.likelihood {
            writeln!(out, "Likelihood: {likelihood}")?;
        }
        if let Some(count) = generation.input_token_count {
            writeln!(out, "Input token count: {count}")?;
        }
    }
    Ok(())
}

fn render_embedding(out: &mut impl Write, embedding: &Embedding) -> io::Result<()> {
    if let Some(id) = &embedding.id {
        writeln!(out, "Embedding id: {id}")?;
    }
    if let Some(kind) = &embedding.kind {
        writeln!(out, "Response type: {kind}")?;
    }
    if !embedding.texts.is_empty() {
        writeln!(out, "Input texts: {}", embedding.texts.join(", "))?;
    }
    if let Some(count) = embedding.input_token_count {
        writeln!(out, "Input token count: {count}")?;
    }
    writeln!(out, "Dimensions: {}", embedding.dimensions())?;
    writeln!(out, "Embedding: {:?}", embedding.values)
}

/// Print one stream fragment as soon as it arrives
pub fn render_event(out: &mut impl Write, event: &StreamEvent) -> io::Result<()> {
    write!(out, "{}", event.text)?;
    if event.is_final {
        writeln!(out)?;
        if let (Some(input), Some(output)) = (event.input_tokens, event.output_tokens) {
            writeln!(out, "Input tokens: {input}, output tokens: {output}")?;
        }
    }
    out.flush()
}

/// Print the foundation model listing
pub fn render_models(out: &mut impl Write, models: &[FoundationModelSummary]) -> io::Result<()> {
    writeln!(out, "Total Models: {}", models.len())?;
    for model in models {
        let streaming = match model.response_streaming_supported {
            Some(true) => "streaming",
            _ => "",
        };
        writeln!(
            out,
            "{:<45} {:<12} {} -> {} {}",
            model.model_id,
            model.provider_name.as_deref().unwrap_or("-"),
            model.input_modalities.join(","),
            model.output_modalities.join(","),
            streaming
        )?;
    }
    Ok(())
}
