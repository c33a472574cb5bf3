//! Fixed end-user texts.

use intexta_core::text::normalize;
use intexta_llm::LlmError;

pub const HELP: &str = "Intexta - Asistente Virtual\n\n\
Puedo ayudarte a consultar información de tus documentos.\n\n\
Comandos:\n\
- /ayuda - Ver este mensaje\n\
- /reset - Reiniciar conversación\n\n\
Simplemente escribe tu pregunta y te responderé basándome en tus documentos.";

pub const INVENTORY_HELP: &str = "Intexta - Consultor de Inventario\n\n\
Pregunta por marca, bodega, SKU, característica o rango de precio, \
por ejemplo \"samsung en bodega centro hasta 300 mil\".\n\n\
Comandos:\n\
- /ayuda - Ver este mensaje\n\
- /reset - Reiniciar conversación";

pub const RESET: &str = "Conversación reiniciada. ¿En qué puedo ayudarte?";

pub const NO_DOCUMENTS: &str = "No tienes documentos procesados disponibles. \
Sube tus documentos para poder consultarlos.";

pub const NO_INVENTORY: &str = "No hay datos de inventario disponibles en este momento. \
Intenta de nuevo más tarde.";

pub const NO_MATCHES: &str = "Sin coincidencias para tu filtro.";

pub const TIMEOUT: &str =
    "La consulta está tardando más de lo esperado. Por favor, intenta de nuevo.";

pub const FAILURE: &str =
    "Lo siento, hubo un problema al procesar tu consulta. Intenta de nuevo más tarde.";

pub const MALFORMED: &str =
    "Hubo un error al procesar la respuesta. Por favor, intenta de nuevo.";

/// A chat command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Reset,
}

impl Command {
    pub fn parse(message: &str) -> Option<Self> {
        match normalize(message.trim()).as_str() {
            "/ayuda" | "ayuda" | "help" => Some(Self::Help),
            "/reset" | "reset" | "reiniciar" => Some(Self::Reset),
            _ => None,
        }
    }
}

/// User-facing text for a failed generation request.
pub fn apology(err: &LlmError) -> &'static str {
    match err {
        LlmError::Timeout => TIMEOUT,
        LlmError::MalformedResponse(_) => MALFORMED,
        LlmError::HttpStatus { .. } | LlmError::Transport(_) => FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands() {
        assert_eq!(Command::parse(" /AYUDA "), Some(Command::Help));
        assert_eq!(Command::parse("Reiniciar"), Some(Command::Reset));
        assert_eq!(Command::parse("ayuda con la garantía"), None);
    }

    #[test]
    fn test_apologies() {
        assert_eq!(apology(&LlmError::Timeout), TIMEOUT);
        assert_eq!(apology(&LlmError::Transport("dns".to_string())), FAILURE);
        assert_eq!(apology(&LlmError::MalformedResponse("x".to_string())), MALFORMED);
    }
}
