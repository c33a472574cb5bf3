//! Assistant behavior against a scripted generation service.

use crate::replies;
use crate::{
    DocumentAssistant, InMemorySessionStore, InventoryAssistant, PromptTemplates, ReplyKind,
    Responder, SessionStore,
};
use intexta_context::{Assembler, Budget, CorpusProvider, Document};
use intexta_core::{AppError, AppResult};
use intexta_filter::{parse_csv, DatasetCache, DatasetLoader, DatasetSnapshot, FilterSchema};
use intexta_llm::{LlmClient, LlmError, LlmRequest, LlmResponse, LlmUsage, Role};
use std::sync::{Arc, Mutex};

/// Replays scripted outcomes and records every request.
struct ScriptedLlm {
    outcomes: Mutex<Vec<Result<String, LlmError>>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl ScriptedLlm {
    fn new(outcomes: Vec<Result<String, LlmError>>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl LlmClient for ScriptedLlm {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        let mut outcomes = self.outcomes.lock().unwrap();
        let outcome = if outcomes.is_empty() {
            Ok("ok".to_string())
        } else {
            outcomes.remove(0)
        };
        outcome.map(|content| LlmResponse {
            content,
            model: request.model.clone(),
            usage: LlmUsage::new(10, 2),
        })
    }
}

struct StaticCorpus(Vec<Document>);

#[async_trait::async_trait]
impl CorpusProvider for StaticCorpus {
    async fn documents(&self, _user: &str) -> AppResult<Vec<Document>> {
        Ok(self.0.clone())
    }
}

struct BrokenCorpus;

#[async_trait::async_trait]
impl CorpusProvider for BrokenCorpus {
    async fn documents(&self, _user: &str) -> AppResult<Vec<Document>> {
        Err(AppError::Io(std::io::Error::other("disk gone")))
    }
}

fn policy() -> Document {
    Document::new(
        "politicas.txt",
        "politicas.txt",
        "La garantía cubre 12 meses desde la compra.\n\n\
         Las devoluciones se aceptan hasta 30 días después de recibir el producto.",
    )
}

fn document_assistant(
    corpus: Arc<dyn CorpusProvider>,
    llm: Arc<ScriptedLlm>,
    sessions: Arc<InMemorySessionStore>,
) -> DocumentAssistant {
    DocumentAssistant::new(
        corpus,
        Assembler::new(Budget::new(2000, 200)),
        Responder::new(llm, sessions, "deepseek-chat", 4),
        PromptTemplates::default(),
    )
}

#[tokio::test]
async fn test_document_reply_sends_context_and_records_history() {
    let llm = ScriptedLlm::new(vec![Ok("La garantía es de 12 meses.".to_string())]);
    let sessions = Arc::new(InMemorySessionStore::new());
    let assistant = document_assistant(
        Arc::new(StaticCorpus(vec![policy()])),
        Arc::clone(&llm),
        Arc::clone(&sessions),
    );

    let reply = assistant.reply("569111", "¿Cuánto dura la garantía?").await;
    assert_eq!(reply.kind, ReplyKind::Answer);
    assert_eq!(reply.text, "La garantía es de 12 meses.");
    assert!(reply.context_chars > 0);

    let requests = llm.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.max_tokens, Some(500));
    assert_eq!(request.temperature, Some(0.7));
    let roles: Vec<Role> = request.messages.iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::System, Role::System, Role::User]);
    assert!(request.messages[1].content.contains("--- politicas.txt ---"));

    assert_eq!(sessions.get("569111").unwrap().len(), 2);
}

#[tokio::test]
async fn test_history_is_sent_on_next_turn() {
    let llm = ScriptedLlm::new(vec![]);
    let sessions = Arc::new(InMemorySessionStore::new());
    let assistant = document_assistant(
        Arc::new(StaticCorpus(vec![policy()])),
        Arc::clone(&llm),
        sessions,
    );

    assistant.reply("u", "garantía").await;
    assistant.reply("u", "devoluciones").await;

    let second = &llm.requests()[1];
    let contents: Vec<&str> = second.messages.iter().skip(2).map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["garantía", "ok", "devoluciones"]);
}

#[tokio::test]
async fn test_commands_skip_generation() {
    let llm = ScriptedLlm::new(vec![]);
    let sessions = Arc::new(InMemorySessionStore::new());
    let assistant = document_assistant(
        Arc::new(StaticCorpus(vec![policy()])),
        Arc::clone(&llm),
        Arc::clone(&sessions),
    );

    assistant.reply("u", "garantía").await;
    let help = assistant.reply("u", "/ayuda").await;
    assert_eq!(help.text, replies::HELP);

    let reset = assistant.reply("u", "/reset").await;
    assert_eq!(reset.text, replies::RESET);
    assert!(sessions.get("u").is_none());
    assert_eq!(llm.requests().len(), 1);
}

#[tokio::test]
async fn test_generation_failures_become_apologies() {
    let llm = ScriptedLlm::new(vec![
        Err(LlmError::Timeout),
        Err(LlmError::HttpStatus {
            status: 500,
            body: "boom".to_string(),
        }),
    ]);
    let assistant = document_assistant(
        Arc::new(StaticCorpus(vec![policy()])),
        llm,
        Arc::new(InMemorySessionStore::new()),
    );

    let first = assistant.reply("u", "garantía").await;
    assert_eq!(first.kind, ReplyKind::Failed);
    assert_eq!(first.text, replies::TIMEOUT);

    let second = assistant.reply("u", "garantía").await;
    assert_eq!(second.text, replies::FAILURE);
}

#[tokio::test]
async fn test_missing_documents() {
    let llm = ScriptedLlm::new(vec![]);
    for corpus in [
        Arc::new(StaticCorpus(vec![])) as Arc<dyn CorpusProvider>,
        Arc::new(BrokenCorpus),
    ] {
        let assistant =
            document_assistant(corpus, Arc::clone(&llm), Arc::new(InMemorySessionStore::new()));
        let reply = assistant.reply("u", "garantía").await;
        assert_eq!(reply.kind, ReplyKind::NoData);
        assert_eq!(reply.text, replies::NO_DOCUMENTS);
    }
    assert!(llm.requests().is_empty());
}

const INVENTORY: &str = "\
Producto,Caracteristica,Precio,Bodega,SKU
Samsung Galaxy A54,negro,329990,Centro,SM-A54
Xiaomi Redmi 12,azul,149990,Maipú,XI-R12
Samsung Galaxy A14,azul,159990,Maipú,SM-A14
";

struct InlineCsv(Option<&'static str>);

#[async_trait::async_trait]
impl DatasetLoader for InlineCsv {
    fn source(&self) -> String {
        "inline".to_string()
    }

    async fn load(&self) -> AppResult<DatasetSnapshot> {
        match self.0 {
            Some(csv) => parse_csv(csv, &FilterSchema::inventory()),
            None => Err(AppError::Dataset("offline".to_string())),
        }
    }
}

fn inventory_assistant(source: Option<&'static str>, llm: Arc<ScriptedLlm>) -> InventoryAssistant {
    InventoryAssistant::new(
        Arc::new(DatasetCache::new(Box::new(InlineCsv(source)))),
        Responder::new(llm, Arc::new(InMemorySessionStore::new()), "deepseek-chat", 12),
        PromptTemplates::default(),
    )
}

#[tokio::test]
async fn test_inventory_context_has_summary_and_filtered_rows() {
    let llm = ScriptedLlm::new(vec![Ok("Hay 1 Samsung en Maipú.".to_string())]);
    let assistant = inventory_assistant(Some(INVENTORY), Arc::clone(&llm));

    let reply = assistant.reply("u", "samsung en maipu").await;
    assert_eq!(reply.kind, ReplyKind::Answer);

    let request = &llm.requests()[0];
    assert_eq!(request.max_tokens, Some(256));
    assert_eq!(request.temperature, Some(0.2));

    let context = &request.messages[1].content;
    assert!(context.contains("[RESUMEN_BODEGAS]\n- Maipú: 2 ítems"));
    assert!(context.contains("- Centro: 1 ítems"));
    let results = context.split("[RESULTADOS_FILTRADOS]").nth(1).unwrap();
    assert!(results.contains("SM-A14"));
    assert!(!results.contains("SM-A54"));
    assert!(!results.contains("XI-R12"));
}

#[tokio::test]
async fn test_inventory_context_is_capped() {
    let llm = ScriptedLlm::new(vec![]);
    let assistant =
        inventory_assistant(Some(INVENTORY), Arc::clone(&llm)).with_max_context_chars(50);

    assistant.reply("u", "todo").await;
    assert_eq!(llm.requests()[0].messages[1].content.chars().count(), 50);
}

#[tokio::test]
async fn test_inventory_without_data() {
    let llm = ScriptedLlm::new(vec![]);
    let assistant = inventory_assistant(None, Arc::clone(&llm));

    let reply = assistant.reply("u", "samsung").await;
    assert_eq!(reply.kind, ReplyKind::NoData);
    assert_eq!(reply.text, replies::NO_INVENTORY);
    assert!(llm.requests().is_empty());
}
