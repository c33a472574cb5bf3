//! Prompt templates and their rendering.
//!
//! Templates use Handlebars syntax and are rendered without HTML escaping.
//! Defaults can be overridden by a YAML file (camelCase keys, every key
//! optional).

use intexta_core::{AppError, AppResult};
use handlebars::Handlebars;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DOCUMENT_SYSTEM: &str = "Eres Intexta, un asistente virtual experto. \
Tu trabajo es responder preguntas basándote ÚNICAMENTE en los documentos del usuario. \
Responde de forma clara, concisa y profesional. \
Si la información no está en los documentos, indica que no tienes esa información. \
Mantén las respuestas en máximo 3-4 frases.";

const DOCUMENT_CONTEXT: &str = "Documentos del usuario:\n\n{{context}}";

const INVENTORY_SYSTEM: &str = "Eres Intexta, un asistente de inventario.

- Responde en español de Chile, 1 a 5 líneas (máximo 1000 caracteres), directo y preciso.
- Usa solo datos del inventario (SKU, Nombre, Bodega, Caracteristica, Precio).
- Prioriza la respuesta por MARCA y UBICACIÓN cuando estén presentes.
- Si piden resumen por bodega: ítems, SKUs y valor total.
- Si no hay datos: \"No lo encuentro en tus documentos\".";

const INVENTORY_WELCOME: &str = "Soy Intexta. Puedo buscar por MARCA y UBICACIÓN (bodega/comuna), \
además de SKU, nombre, característica y rango de precio. \
También entrego resumen por bodega (ítems, SKUs, valor).";

const INVENTORY_CONTEXT: &str = "{{welcome}}

[RESUMEN_BODEGAS]
{{summary}}

[RESULTADOS_FILTRADOS]
{{results}}
";

/// Templates used to build generation requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PromptTemplates {
    /// System message for document questions
    pub document_system: String,

    /// Context message for document questions; receives `context`
    pub document_context: String,

    /// System message for inventory questions
    pub inventory_system: String,

    /// Introduction placed in the inventory context
    pub inventory_welcome: String,

    /// Context message for inventory questions; receives `welcome`,
    /// `summary` and `results`
    pub inventory_context: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            document_system: DOCUMENT_SYSTEM.to_string(),
            document_context: DOCUMENT_CONTEXT.to_string(),
            inventory_system: INVENTORY_SYSTEM.to_string(),
            inventory_welcome: INVENTORY_WELCOME.to_string(),
            inventory_context: INVENTORY_CONTEXT.to_string(),
        }
    }
}

impl PromptTemplates {
    /// Load templates from `path`, falling back to the defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            tracing::debug!("No prompt file at {:?}, using default prompts", path);
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Prompt(format!("Failed to read prompt file {:?}: {}", path, e))
        })?;

        let templates: PromptTemplates = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Prompt(format!("Failed to parse prompt YAML {:?}: {}", path, e))
        })?;

        templates.validate()?;
        tracing::info!("Loaded prompts from {:?}", path);
        Ok(templates)
    }

    fn validate(&self) -> AppResult<()> {
        let fields = [
            ("documentSystem", &self.document_system),
            ("documentContext", &self.document_context),
            ("inventorySystem", &self.inventory_system),
            ("inventoryContext", &self.inventory_context),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(AppError::Prompt(format!("Prompt {} cannot be empty", name)));
            }
        }
        Ok(())
    }
}

/// Render a Handlebars template with variables.
pub fn render_template<T: Serialize>(template: &str, variables: &T) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("prompt", variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}
