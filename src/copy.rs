//! Copy generation
//!
//! Builds the copywriting prompt from the product name, trigger and optional
//! landing-page URL / image, asks the model for a JSON array of variants and
//! decodes it strictly.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::CopyError;
use crate::gateway::{GenerationParams, ModelGateway, ModelRequest, OutputContract, Part};
use crate::image::ImagePayload;
use crate::triggers::Trigger;

const COPY_INSTRUCTIONS: &str = "Você é um copywriter especialista em marketing digital e psicologia do consumidor. Seu objetivo é criar textos curtos, diretos e altamente persuasivos, considerando todos os materiais fornecidos (imagem, URL, nome do produto). Retorne os resultados exclusivamente no formato JSON especificado.";

/// Copywriting favours variety over literal extraction
const COPY_TEMPERATURE: f32 = 0.8;
const COPY_TOP_P: f32 = 0.9;

const COPY_FAILURE_MESSAGE: &str =
    "Failed to communicate with the model service. Please try again.";

/// One generated piece of short-form marketing copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyVariant {
    pub title: String,
    pub copy: String,
}

/// Everything the caller supplies for one generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub product_name: String,
    pub trigger: Trigger,
    pub ad_url: Option<String>,
    /// Image as a data URI; decoded leniently at generation time
    pub ad_image: Option<String>,
}

impl GenerationRequest {
    pub fn new(product_name: impl Into<String>, trigger: Trigger) -> Self {
        Self {
            product_name: product_name.into(),
            trigger,
            ad_url: None,
            ad_image: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.ad_url = Some(url.into());
        self
    }

    pub fn with_image(mut self, data_uri: impl Into<String>) -> Self {
        self.ad_image = Some(data_uri.into());
        self
    }

    fn url(&self) -> Option<&str> {
        self.ad_url.as_deref().filter(|u| !u.trim().is_empty())
    }

    fn image(&self) -> Option<&str> {
        self.ad_image.as_deref().filter(|i| !i.is_empty())
    }
}

/// JSON schema the model output must follow
pub fn copy_response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": {
                    "type": "STRING",
                    "description": "Um título curto e impactante para a copy (ex: Título de E-mail, Chamada para Anúncio)."
                },
                "copy": {
                    "type": "STRING",
                    "description": "O texto de copywriting gerado, com 2 a 4 frases."
                }
            },
            "required": ["title", "copy"]
        }
    })
}

/// Natural-language prompt for a request
pub fn build_copy_prompt(request: &GenerationRequest) -> String {
    let mut prompt = format!(
        "Gere 3 exemplos de copywriting curtos e persuasivos para o produto/serviço \"{}\", utilizando o gatilho mental de \"{}\".",
        request.product_name.trim(),
        request.trigger.prompt_name()
    );

    if let Some(url) = request.url() {
        prompt.push_str(&format!(
            " A página de destino do anúncio é: {}. Analise o conteúdo desta URL para extrair benefícios e características importantes.",
            url
        ));
    }
    // Keyed on the input being supplied, not on it decoding: a dropped image
    // still leaves this clause in place.
    if request.image().is_some() {
        prompt.push_str(
            " Analise a imagem fornecida e use elementos visuais e o sentimento que ela transmite na criação da copy.",
        );
    }

    prompt
}

/// Build the model request; a malformed image is dropped with a warning
pub fn build_copy_request(request: &GenerationRequest) -> ModelRequest {
    let mut parts = vec![Part::Text(build_copy_prompt(request))];

    if let Some(uri) = request.image() {
        match ImagePayload::from_data_uri(uri) {
            Ok(image) => parts.push(Part::Image(image)),
            Err(e) => warn!("Dropping ad image, continuing text-only: {}", e),
        }
    }

    ModelRequest {
        instructions: COPY_INSTRUCTIONS.to_string(),
        parts,
        output: OutputContract::Json {
            schema: copy_response_schema(),
        },
        params: GenerationParams {
            temperature: COPY_TEMPERATURE,
            top_p: Some(COPY_TOP_P),
        },
    }
}

/// Strictly decode the model reply into copy variants, preserving order
pub fn parse_copy_variants(raw: &str) -> Result<Vec<CopyVariant>, CopyError> {
    let value: serde_json::Value = serde_json::from_str(raw.trim())
        .map_err(|e| CopyError::MalformedResponse(format!("invalid JSON: {}", e)))?;

    let items = match value {
        serde_json::Value::Array(items) => items,
        _ => {
            return Err(CopyError::MalformedResponse(
                "response is not a valid array".to_string(),
            ))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let variant: CopyVariant = serde_json::from_value(item).map_err(|e| {
                CopyError::MalformedResponse(format!("item {} is not a copy variant: {}", index, e))
            })?;
            if variant.title.trim().is_empty() || variant.copy.trim().is_empty() {
                return Err(CopyError::MalformedResponse(format!(
                    "item {} has an empty title or copy",
                    index
                )));
            }
            Ok(variant)
        })
        .collect()
}

/// Generate persuasive copy variants for a product
pub async fn generate_copy(
    gateway: &dyn ModelGateway,
    request: &GenerationRequest,
) -> Result<Vec<CopyVariant>, CopyError> {
    if request.product_name.trim().is_empty() {
        return Err(CopyError::InvalidInput(
            "Product name must not be empty".to_string(),
        ));
    }

    let model_request = build_copy_request(request);
    info!(
        "Generating copy: trigger={} url={} image={}",
        request.trigger,
        request.url().is_some(),
        model_request.has_image()
    );

    let raw = gateway
        .invoke(model_request)
        .await
        .map_err(|e| e.into_generation(COPY_FAILURE_MESSAGE))?;

    let variants = parse_copy_variants(&raw)?;
    info!("Generated {} copy variants", variants.len());
    Ok(variants)
}
