//! Product name inference from an image

use tracing::info;

use crate::error::CopyError;
use crate::gateway::{GenerationParams, ModelGateway, ModelRequest, OutputContract, Part};
use crate::image::ImagePayload;

const NAME_PROMPT: &str = "Analise a imagem fornecida e crie um título descritivo para o produto/serviço exibido. O título deve ser claro, conciso e descrever exatamente o que é o produto, como se fosse para um catálogo de e-commerce. Inclua características principais visíveis na imagem. Forneça apenas o título, sem qualquer texto ou explicação adicional.";

const NAME_INSTRUCTIONS: &str = "Você é um especialista em catalogação de produtos para e-commerce. Sua principal habilidade é analisar imagens de produtos e criar títulos precisos, objetivos e descritivos que ajudem os clientes a entenderem exatamente o que estão vendo. Evite nomes criativos ou de marca, foque estritamente na descrição do item.";

/// Low temperature keeps titles literal
const NAME_TEMPERATURE: f32 = 0.4;

const NAME_FAILURE_MESSAGE: &str = "Failed to generate the product name. Please try again.";

/// Build the model request for a decoded image
pub fn build_name_request(image: ImagePayload) -> ModelRequest {
    ModelRequest {
        instructions: NAME_INSTRUCTIONS.to_string(),
        parts: vec![Part::Text(NAME_PROMPT.to_string()), Part::Image(image)],
        output: OutputContract::FreeText,
        params: GenerationParams {
            temperature: NAME_TEMPERATURE,
            top_p: None,
        },
    }
}

/// Trim and strip one layer of matching straight quotes
pub fn normalize_title(raw: &str) -> &str {
    let trimmed = raw.trim();
    for quote in ['"', '\''] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return &trimmed[1..trimmed.len() - 1];
        }
    }
    trimmed
}

/// Infer a catalog-style product title from an image data URI.
///
/// A malformed data URI fails with `InvalidInput` before the gateway is
/// called.
pub async fn infer_product_name(
    gateway: &dyn ModelGateway,
    image_data_uri: &str,
) -> Result<String, CopyError> {
    let image = ImagePayload::from_data_uri(image_data_uri)?;

    info!("Inferring product name from {} image", image.mime_type);

    let raw = gateway
        .invoke(build_name_request(image))
        .await
        .map_err(|e| e.into_generation(NAME_FAILURE_MESSAGE))?;

    let title = normalize_title(&raw);
    if title.is_empty() {
        return Err(
            CopyError::MalformedResponse("model returned an empty title".to_string())
                .into_generation(NAME_FAILURE_MESSAGE),
        );
    }

    info!("Inferred product name: {} chars", title.chars().count());
    Ok(title.to_string())
}
