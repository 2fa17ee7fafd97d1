use super::*;
use crate::application::tooling::{
    CustomerLookup, CustomerRecord, KbArticle, KnowledgeBase, PlanTier, ToolInvokeError,
    ToolRegistry,
};
use crate::domain::{Ticket, TicketMessage};
use crate::model::{
    ModelError, ModelProvider, ModelRequest, ModelResponse, ModelRoute, ProviderChain,
    ProviderChainError,
};
use crate::types::{ChatMessage, MessageRole, TokenUsage, ToolCall};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

enum Scripted {
    Reply(ModelResponse),
    RateLimited,
    Broken,
}

#[derive(Clone)]
struct ScriptedProvider {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    recordings: Arc<Mutex<Vec<ModelRequest>>>,
}

impl ScriptedProvider {
    fn new(script: Vec<Scripted>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            recordings: Arc::new(Mutex::new(Vec::new())),
        }
    }

    async fn requests(&self) -> Vec<ModelRequest> {
        self.recordings.lock().await.clone()
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        self.recordings.lock().await.push(request.clone());
        let next = self.script.lock().await.pop_front();
        match next {
            Some(Scripted::Reply(response)) => Ok(response),
            Some(Scripted::RateLimited) => Err(ModelError::rate_limited(&request.provider, None)),
            Some(Scripted::Broken) => Err(ModelError::status(
                &request.provider,
                StatusCode::SERVICE_UNAVAILABLE,
                "upstream unavailable",
            )),
            None => Err(ModelError::invalid_response(
                &request.provider,
                "script exhausted",
            )),
        }
    }
}

struct StubCustomers;

#[async_trait]
impl CustomerLookup for StubCustomers {
    async fn find_by_email(&self, email: &str) -> Result<Option<CustomerRecord>, ToolInvokeError> {
        Ok((email == "ana@example.com").then(|| {
            json!({"email": email, "name": "Ana", "plan": "pro"})
                .as_object()
                .cloned()
                .unwrap_or_default()
        }))
    }

    async fn plan_tier(&self, _plan: &str) -> Result<Option<PlanTier>, ToolInvokeError> {
        Ok(None)
    }
}

struct EmptyKb;

#[async_trait]
impl KnowledgeBase for EmptyKb {
    async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<KbArticle>, ToolInvokeError> {
        Ok(Vec::new())
    }
}

fn ticket(id: &str, email: &str) -> Ticket {
    Ticket {
        ticket_id: id.into(),
        customer_email: email.into(),
        subject: Some("Cannot log in".into()),
        messages: vec![TicketMessage {
            timestamp: Some("2024-03-01T10:00:00Z".into()),
            content: "Login keeps failing since this morning.".into(),
        }],
    }
}

fn answer(ticket_id: &str, priority: Value) -> String {
    json!({
        "ticket_id": ticket_id,
        "analysis": {
            "urgency": "high",
            "sentiment": "frustrated",
            "issue_type": "account_access",
            "product_area": "login",
            "language": "en",
            "summary": "Customer cannot log in"
        },
        "action": {
            "action": "route_to_specialist",
            "suggested_reply": "We are looking into your login problem.",
            "reason": "Pro customer blocked from the product",
            "priority_score": priority,
            "routing_department": "identity"
        },
        "customer_context": {"plan": "pro"},
        "kb_articles_used": []
    })
    .to_string()
}

fn final_reply(content: &str, usage: Option<TokenUsage>) -> Scripted {
    Scripted::Reply(ModelResponse::new(
        ChatMessage::assistant(Some(content.to_string()), Vec::new()),
        Some("stop".into()),
        usage,
    ))
}

fn tool_reply(call_id: &str, name: &str, arguments: Value, usage: Option<TokenUsage>) -> Scripted {
    Scripted::Reply(ModelResponse::new(
        ChatMessage::assistant(
            None,
            vec![ToolCall::new(call_id, name, arguments.to_string())],
        ),
        Some("tool_calls".into()),
        usage,
    ))
}

fn agent(provider: ScriptedProvider, with_fallback: bool) -> TriageAgent<ScriptedProvider> {
    let mut chain = ProviderChain::new(provider, ModelRoute::new("openai", "gpt-4o-mini"));
    if with_fallback {
        chain = chain.with_fallback(ModelRoute::new("groq", "llama-3.1-8b-instant"));
    }
    let registry = ToolRegistry::new(Arc::new(StubCustomers), Arc::new(EmptyKb));
    TriageAgent::new(chain, Arc::new(registry), "You triage support tickets.")
}

#[tokio::test]
async fn final_answer_on_first_round() {
    let provider = ScriptedProvider::new(vec![final_reply(&answer("T-1", json!(6)), None)]);
    let agent = agent(provider.clone(), false);

    let response = agent
        .process_ticket(&ticket("T-1", "ana@example.com"))
        .await
        .expect("triaged");

    assert_eq!(response.rounds, 1);
    assert!(response.tool_traces.is_empty());
    assert_eq!(response.result.customer_context, r#"{"plan":"pro"}"#);

    let requests = provider.requests().await;
    assert_eq!(requests.len(), 1);
    let first = &requests[0];
    assert_eq!(first.tools.len(), 2);
    assert_eq!(first.messages.len(), 2);
    assert_eq!(first.messages[0].role, MessageRole::System);
    assert!(first.messages[1].text().starts_with("## Support Ticket: T-1"));
}

#[tokio::test]
async fn tool_results_are_fed_back_with_call_id() {
    let provider = ScriptedProvider::new(vec![
        tool_reply(
            "call_1",
            "fetch_customer_data",
            json!({"email": "ana@example.com"}),
            None,
        ),
        final_reply(&answer("T-1", json!(7)), None),
    ]);
    let agent = agent(provider.clone(), false);

    let response = agent
        .process_ticket(&ticket("T-1", "ana@example.com"))
        .await
        .expect("triaged");

    assert_eq!(response.rounds, 2);
    assert_eq!(response.tool_traces.len(), 1);
    let trace = &response.tool_traces[0];
    assert_eq!(trace.tool_name, "fetch_customer_data");
    assert_eq!(trace.arguments["email"], "ana@example.com");
    assert_eq!(trace.result["plan_details"]["priority"], "low");

    let requests = provider.requests().await;
    let second = &requests[1].messages;
    assert_eq!(second.len(), 4);
    assert_eq!(second[2].role, MessageRole::Assistant);
    assert_eq!(second[2].tool_calls[0].id, "call_1");
    assert_eq!(second[3].role, MessageRole::Tool);
    assert_eq!(second[3].tool_call_id.as_deref(), Some("call_1"));
    let fed_back: Value = serde_json::from_str(second[3].text()).expect("json content");
    assert_eq!(fed_back["name"], "Ana");
}

#[tokio::test]
async fn unknown_email_does_not_abort_the_run() {
    let provider = ScriptedProvider::new(vec![
        tool_reply(
            "call_1",
            "fetch_customer_data",
            json!({"email": "ghost@example.com"}),
            None,
        ),
        final_reply(&answer("T-9", json!(3)), None),
    ]);
    let agent = agent(provider, false);

    let response = agent
        .process_ticket(&ticket("T-9", "ghost@example.com"))
        .await
        .expect("triaged");

    let result = &response.tool_traces[0].result;
    assert_eq!(result["error"], "not_found");
    assert!(
        result["message"]
            .as_str()
            .is_some_and(|m| m.contains("ghost@example.com"))
    );
}

#[tokio::test]
async fn unknown_tool_is_reported_to_the_model() {
    let provider = ScriptedProvider::new(vec![
        tool_reply("call_1", "issue_refund", json!({"amount": 10}), None),
        final_reply(&answer("T-1", json!(5)), None),
    ]);
    let agent = agent(provider.clone(), false);

    let response = agent
        .process_ticket(&ticket("T-1", "ana@example.com"))
        .await
        .expect("triaged");

    assert_eq!(
        response.tool_traces[0].result,
        json!({"error": "Unknown tool: issue_refund"})
    );
    let requests = provider.requests().await;
    assert!(requests[1].messages[3].text().contains("Unknown tool: issue_refund"));
}

#[tokio::test]
async fn round_budget_is_enforced() {
    let script = (1..=6)
        .map(|n| {
            tool_reply(
                &format!("call_{n}"),
                "query_knowledge_base",
                json!({"query": "login"}),
                None,
            )
        })
        .collect();
    let provider = ScriptedProvider::new(script);
    let agent = agent(provider.clone(), false);

    let err = agent
        .process_ticket(&ticket("T-5", "ana@example.com"))
        .await
        .unwrap_err();

    match &err {
        AgentError::RoundsExceeded {
            ticket_id,
            max_rounds,
            traces,
        } => {
            assert_eq!(ticket_id, "T-5");
            assert_eq!(*max_rounds, MAX_TOOL_ROUNDS);
            assert_eq!(traces.len(), 5);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("T-5"));
    assert_eq!(provider.requests().await.len(), 5);
}

#[tokio::test]
async fn custom_round_budget_is_respected() {
    let provider = ScriptedProvider::new(vec![
        tool_reply("call_1", "query_knowledge_base", json!({"query": "a"}), None),
        tool_reply("call_2", "query_knowledge_base", json!({"query": "b"}), None),
    ]);
    let agent =
        agent(provider.clone(), false).with_options(AgentOptions::default().with_max_rounds(2));

    let err = agent
        .process_ticket(&ticket("T-2", "ana@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, AgentError::RoundsExceeded { max_rounds: 2, .. }));
    assert_eq!(provider.requests().await.len(), 2);
}

#[tokio::test]
async fn usage_sums_across_primary_and_fallback_rounds() {
    let provider = ScriptedProvider::new(vec![
        Scripted::RateLimited,
        tool_reply(
            "call_1",
            "query_knowledge_base",
            json!({"query": "login"}),
            Some(TokenUsage::new(100, 20, 120)),
        ),
        final_reply(&answer("T-1", json!(4)), Some(TokenUsage::new(150, 40, 190))),
    ]);
    let agent = agent(provider.clone(), true);

    let response = agent
        .process_ticket(&ticket("T-1", "ana@example.com"))
        .await
        .expect("triaged");

    assert_eq!(response.rounds, 2);
    assert_eq!(response.prompt_tokens, 250);
    assert_eq!(response.completion_tokens, 60);
    assert_eq!(response.total_tokens, 310);

    let requests = provider.requests().await;
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[1].provider, "groq");
    assert_eq!(requests[1].parallel_tool_calls, Some(false));
    // The next round goes back to the primary.
    assert_eq!(requests[2].provider, "openai");
    assert_eq!(requests[2].parallel_tool_calls, None);
}

#[tokio::test]
async fn failing_fallback_names_both_causes() {
    let provider = ScriptedProvider::new(vec![Scripted::RateLimited, Scripted::Broken]);
    let agent = agent(provider, true);

    let err = agent
        .process_ticket(&ticket("T-3", "ana@example.com"))
        .await
        .unwrap_err();

    match &err {
        AgentError::Provider { ticket_id, source } => {
            assert_eq!(ticket_id, "T-3");
            assert!(matches!(source, ProviderChainError::Exhausted { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    let message = format!("{err}");
    assert!(message.contains("rate limit"));
    assert!(message.contains("upstream unavailable"));
}

#[tokio::test]
async fn identical_tickets_get_isolated_conversations() {
    let provider = ScriptedProvider::new(vec![
        tool_reply(
            "call_1",
            "fetch_customer_data",
            json!({"email": "ana@example.com"}),
            None,
        ),
        final_reply(&answer("T-1", json!(6)), None),
        final_reply(&answer("T-1", json!(6)), None),
    ]);
    let agent = agent(provider.clone(), false);
    let ticket = ticket("T-1", "ana@example.com");

    let first = agent.process_ticket(&ticket).await.expect("first");
    let second = agent.process_ticket(&ticket).await.expect("second");

    assert_eq!(first.tool_traces.len(), 1);
    assert!(second.tool_traces.is_empty());
    let requests = provider.requests().await;
    assert_eq!(requests[2].messages.len(), 2);
    assert_eq!(requests[0].messages, requests[2].messages);
}

#[tokio::test]
async fn fenced_final_answer_is_accepted() {
    let fenced = format!("```json\n{}\n```", answer("T-1", json!(2)));
    let provider = ScriptedProvider::new(vec![final_reply(&fenced, None)]);
    let agent = agent(provider, false);

    let response = agent
        .process_ticket(&ticket("T-1", "ana@example.com"))
        .await
        .expect("triaged");
    assert_eq!(response.result.action.priority_score, 2);
}

#[tokio::test]
async fn empty_and_invalid_answers_fail_the_ticket() {
    let provider = ScriptedProvider::new(vec![
        final_reply("   ", None),
        final_reply(&answer("T-1", json!(11)), None),
    ]);
    let agent = agent(provider, false);
    let ticket = ticket("T-1", "ana@example.com");

    let err = agent.process_ticket(&ticket).await.unwrap_err();
    assert!(matches!(err, AgentError::EmptyResponse { .. }));

    let err = agent.process_ticket(&ticket).await.unwrap_err();
    match err {
        AgentError::Schema { source, .. } => assert_eq!(source.field, "action.priority_score"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn stop_with_pending_calls_is_treated_as_final() {
    let provider = ScriptedProvider::new(vec![Scripted::Reply(ModelResponse::new(
        ChatMessage::assistant(
            Some(answer("T-1", json!(5))),
            vec![ToolCall::new("call_1", "query_knowledge_base", "{}")],
        ),
        Some("stop".into()),
        None,
    ))]);
    let agent = agent(provider, false);

    let response = agent
        .process_ticket(&ticket("T-1", "ana@example.com"))
        .await
        .expect("triaged");
    assert_eq!(response.rounds, 1);
    assert!(response.tool_traces.is_empty());
}
