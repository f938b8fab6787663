    use super::*;
    use std::collections::VecDeque;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use codementor_config::MentorConfig;
    use codementor_core::prompts::{build_prompt, concept_prompt};
    use codementor_protocols::{
        ChatTurn, GatewayError, GenerateRequest, ModelGateway, ProblemContext, PromptTurn,
    };
    use parking_lot::Mutex;
    use tower::ServiceExt;

    use crate::http::handlers::{NOT_CONFIGURED_REPLY, OFF_TOPIC_REPLY};

    /// Gateway answering from a queue and recording each prompt.
    #[derive(Default)]
    struct FakeGateway {
        replies: Mutex<VecDeque<Result<String, GatewayError>>>,
        calls: Mutex<Vec<Vec<PromptTurn>>>,
    }

    impl FakeGateway {
        fn with(replies: Vec<Result<String, GatewayError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().len()
        }
    }

    #[async_trait]
    impl ModelGateway for FakeGateway {
        fn id(&self) -> &str {
            "fake"
        }

        async fn generate(&self, turns: &[PromptTurn]) -> Result<String, GatewayError> {
            self.calls.lock().push(turns.to_vec());
            self.replies
                .lock()
                .pop_front()
                .unwrap_or_else(|| Err(GatewayError::Network("no reply".to_string())))
        }
    }

    fn gone() -> Result<String, GatewayError> {
        Err(GatewayError::Status {
            status: 410,
            message: "model gone".to_string(),
        })
    }

    fn router(state: AppState) -> Router {
        create_router(Arc::new(state), &ServerConfig::default())
    }

    fn generate_request(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/generate")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn question() -> serde_json::Value {
        serde_json::json!({
            "contents": [{"role": "user", "parts": [{"text": "How should I handle duplicates?"}]}]
        })
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_generate_relays_reply() {
        let gateway = FakeGateway::with(vec![Ok("Consider a set.".to_string())]);
        let app = router(AppState::new("gpt2", Some(gateway.clone())));

        let response = app.oneshot(generate_request(question())).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, serde_json::json!({"text": "Consider a set."}));
        let calls = gateway.calls.lock();
        assert_eq!(calls[0][0].role, codementor_protocols::PromptRole::System);
        assert_eq!(calls[0][1], PromptTurn::user("How should I handle duplicates?"));
    }

    #[tokio::test]
    async fn test_missing_contents() {
        let app = router(AppState::new("gpt2", Some(FakeGateway::with(vec![]))));

        let response = app.oneshot(generate_request(serde_json::json!({}))).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, serde_json::json!({"error": "Missing contents"}));
    }

    #[tokio::test]
    async fn test_off_topic_is_refused_without_upstream_call() {
        let gateway = FakeGateway::with(vec![Ok("unused".to_string())]);
        let app = router(AppState::new("gpt2", Some(gateway.clone())));
        let body = serde_json::json!({
            "contents": [{"role": "user", "parts": [{"text": "What is the capital of France?"}]}]
        });

        let response = app.oneshot(generate_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["text"], OFF_TOPIC_REPLY);
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_problem_context_is_not_screened() {
        let gateway = FakeGateway::with(vec![
            Ok("Compare each letter's case.".to_string()),
            Ok("String".to_string()),
        ]);
        let state = Arc::new(AppState::new("gpt2", Some(gateway.clone())));
        let ctx = ProblemContext::new(
            "Detect Capital",
            "We define the usage of capitals in a word to be right when all letters are capitals.",
        );
        let history = vec![ChatTurn::user("how do I check the first letter?")];
        let chat = GenerateRequest::from_turns(&build_prompt(&history, &ctx, &MentorConfig::default()));
        let concept = GenerateRequest::from_turns(&[PromptTurn::user(concept_prompt("Detect Capital"))]);

        for (request, expected) in [(chat, "Compare each letter's case."), (concept, "String")] {
            let app = create_router(state.clone(), &ServerConfig::default());
            let response = app
                .oneshot(generate_request(serde_json::to_value(&request).unwrap()))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(json_body(response).await["text"], expected);
        }
        assert_eq!(gateway.call_count(), 2);
    }

    #[tokio::test]
    async fn test_off_topic_question_inside_context_is_refused() {
        let gateway = FakeGateway::with(vec![Ok("unused".to_string())]);
        let app = router(AppState::new("gpt2", Some(gateway.clone())));
        let ctx = ProblemContext::new("Two Sum", "Find two numbers adding to target.");
        let history = vec![ChatTurn::user("what is the capital of France?")];
        let request = GenerateRequest::from_turns(&build_prompt(&history, &ctx, &MentorConfig::default()));

        let response = app
            .oneshot(generate_request(serde_json::to_value(&request).unwrap()))
            .await
            .unwrap();

        assert_eq!(json_body(response).await["text"], OFF_TOPIC_REPLY);
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_not_configured() {
        let app = router(AppState::new("gpt2", None));

        let response = app.oneshot(generate_request(question())).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["text"], NOT_CONFIGURED_REPLY);
    }

    #[tokio::test]
    async fn test_upstream_error_maps_to_bad_gateway() {
        let gateway = FakeGateway::with(vec![Err(GatewayError::Status {
            status: 503,
            message: "loading".to_string(),
        })]);
        let app = router(AppState::new("gpt2", Some(gateway)));

        let response = app.oneshot(generate_request(question())).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({"error": "Model error 503", "detail": "loading"})
        );
    }

    #[tokio::test]
    async fn test_network_error_maps_to_internal_error() {
        let gateway = FakeGateway::with(vec![Err(GatewayError::Network("refused".to_string()))]);
        let app = router(AppState::new("gpt2", Some(gateway)));

        let response = app.oneshot(generate_request(question())).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await["error"], "internal server error");
    }

    #[tokio::test]
    async fn test_gone_model_switches_to_fallback_once() {
        let primary = FakeGateway::with(vec![gone()]);
        let fallback = FakeGateway::with(vec![Ok("first".to_string()), Ok("second".to_string())]);
        let state = Arc::new(
            AppState::new("big-model", Some(primary.clone())).with_fallback("gpt2", fallback.clone()),
        );
        let app = create_router(state.clone(), &ServerConfig::default());

        let response = app.clone().oneshot(generate_request(question())).await.unwrap();
        assert_eq!(json_body(response).await["text"], "first");
        assert_eq!(state.active_model(), "gpt2");

        let response = app.oneshot(generate_request(question())).await.unwrap();
        assert_eq!(json_body(response).await["text"], "second");
        assert_eq!(primary.call_count(), 1);
        assert_eq!(fallback.call_count(), 2);
    }

    #[tokio::test]
    async fn test_gone_model_without_fallback_is_reported() {
        let app = router(AppState::new("gpt2", Some(FakeGateway::with(vec![gone()]))));

        let response = app.oneshot(generate_request(question())).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(json_body(response).await["error"], "Model error 410");
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = router(AppState::new("gpt2", None));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["ok"], true);
        assert_eq!(json["model"], "gpt2");
    }

    #[tokio::test]
    async fn test_body_limit() {
        let config = ServerConfig {
            body_limit_kb: 1,
            ..ServerConfig::default()
        };
        let app = create_router(Arc::new(AppState::new("gpt2", None)), &config);
        let body = serde_json::json!({
            "contents": [{"role": "user", "parts": [{"text": "x".repeat(4096)}]}]
        });

        let response = app.oneshot(generate_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_cors_layer_accepts_origin_lists() {
        let _ = cors_layer(&["*".to_string()]);
        let _ = cors_layer(&["chrome-extension://abc".to_string(), "bad\norigin".to_string()]);
    }
