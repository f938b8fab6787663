    use super::*;
    use crate::testing::ScriptedGateway;
    use codementor_protocols::{GatewayError, Problem};

    const RECOMMENDATIONS: &str = r#"[
        {"title": "Contains Duplicate", "url": "https://leetcode.com/problems/contains-duplicate/"},
        {"title": "Valid Anagram", "url": "/problems/valid-anagram/"}
    ]"#;

    fn setup(gateway: ScriptedGateway) -> (Arc<ScriptedGateway>, MentorStores, RecommendationEngine) {
        let gateway = Arc::new(gateway);
        let stores = MentorStores::in_memory();
        let engine = RecommendationEngine::new(gateway.clone(), &stores);
        (gateway, stores, engine)
    }

    #[tokio::test]
    async fn test_recommend_adds_entry_and_notification() {
        let (gateway, stores, engine) =
            setup(ScriptedGateway::new().reply("Hash Table\n").reply(RECOMMENDATIONS));

        let outcome = engine.recommend("Two Sum").await;
        let RecommendationOutcome::Added(entry) = &outcome else {
            panic!("expected an added entry, got {outcome:?}");
        };
        assert_eq!(entry.concept, "Hash Table");
        assert_eq!(entry.source, "Two Sum");
        assert_eq!(
            entry.problems,
            vec![
                Problem::new("Contains Duplicate", "https://leetcode.com/problems/contains-duplicate/"),
                Problem::new("Valid Anagram", "https://leetcode.com/problems/valid-anagram/"),
            ]
        );
        assert_eq!(gateway.call_count(), 2);
        assert_eq!(stores.catalog.list().await.unwrap(), vec![entry.clone()]);
        assert!(stores.notifications.has_notification().await.unwrap());
        assert_eq!(stores.topics.get("Two Sum").await.unwrap().as_deref(), Some("Hash Table"));
    }

    #[tokio::test]
    async fn test_topic_cache_avoids_remote_call() {
        let (gateway, stores, engine) = setup(ScriptedGateway::new().reply(RECOMMENDATIONS));
        stores.topics.put_if_absent("Two Sum", "Hash Table").await.unwrap();

        assert!(engine.recommend("Two Sum").await.added());
        assert_eq!(gateway.call_count(), 1);
        let prompt = &gateway.calls()[0][0].text;
        assert!(prompt.contains("\"Hash Table\""));
    }

    #[tokio::test]
    async fn test_topic_is_cleaned() {
        let (_, _, engine) = setup(ScriptedGateway::new().reply("  \"Two Pointers.\"\nBecause..."));
        assert_eq!(engine.topic_for("3Sum").await.unwrap(), "Two Pointers");
    }

    #[tokio::test]
    async fn test_sentinel_title_is_skipped() {
        let (gateway, _, engine) = setup(ScriptedGateway::new());
        assert_eq!(engine.recommend(TITLE_NOT_FOUND).await, RecommendationOutcome::Skipped);
        assert_eq!(engine.recommend("  ").await, RecommendationOutcome::Skipped);
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unparsable_reply_leaves_catalog_unchanged() {
        let (_, stores, engine) = setup(
            ScriptedGateway::new()
                .reply("Hash Table")
                .reply("I would suggest practicing more hashing problems."),
        );
        let outcome = engine.recommend("Two Sum").await;
        assert_eq!(
            outcome,
            RecommendationOutcome::NoProblems {
                concept: "Hash Table".to_string()
            }
        );
        assert!(stores.catalog.list().await.unwrap().is_empty());
        assert!(!stores.notifications.has_notification().await.unwrap());
    }

    #[tokio::test]
    async fn test_source_problem_is_excluded() {
        let (_, _, engine) = setup(ScriptedGateway::new().reply("Hash Table").reply(
            r#"[{"title": "Two Sum"}, {"title": "Contains Duplicate"}]"#,
        ));
        let RecommendationOutcome::Added(entry) = engine.recommend("Two Sum").await else {
            panic!("expected an added entry");
        };
        assert_eq!(entry.problems.len(), 1);
        assert_eq!(entry.problems[0].title, "Contains Duplicate");
    }

    #[tokio::test]
    async fn test_duplicate_entry_is_rejected() {
        let (_, stores, engine) = setup(
            ScriptedGateway::new()
                .reply("Hash Table")
                .reply(RECOMMENDATIONS)
                .reply(RECOMMENDATIONS),
        );
        assert!(engine.recommend("Two Sum").await.added());
        stores.notifications.set_notification(false).await.unwrap();

        let outcome = engine.recommend("Two Sum").await;
        assert!(matches!(outcome, RecommendationOutcome::Duplicate(_)));
        assert_eq!(stores.catalog.list().await.unwrap().len(), 1);
        assert!(!stores.notifications.has_notification().await.unwrap());
    }

    #[tokio::test]
    async fn test_gateway_failure_is_reported() {
        let (_, stores, engine) = setup(ScriptedGateway::new().fail(GatewayError::Status {
            status: 500,
            message: "boom".to_string(),
        }));
        let outcome = engine.recommend("Two Sum").await;
        let RecommendationOutcome::Failed { reason } = outcome else {
            panic!("expected failure");
        };
        assert!(reason.contains("500"));
        assert!(stores.catalog.list().await.unwrap().is_empty());
        assert_eq!(stores.topics.get("Two Sum").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sentence_reply_is_not_cached_as_topic() {
        let refusal = "I can't help with general knowledge or news. \
I'm an on-problem coding mentor, please ask about the current LeetCode problem.";
        let (gateway, stores, engine) = setup(
            ScriptedGateway::new()
                .reply(refusal)
                .reply("Server not configured with HF_API_KEY. Please set it in environment.")
                .reply("String"),
        );

        assert_eq!(engine.topic_for("Detect Capital").await.unwrap(), "General");
        assert_eq!(engine.topic_for("Detect Capital").await.unwrap(), "General");
        assert_eq!(stores.topics.get("Detect Capital").await.unwrap(), None);

        assert_eq!(engine.topic_for("Detect Capital").await.unwrap(), "String");
        assert_eq!(
            stores.topics.get("Detect Capital").await.unwrap().as_deref(),
            Some("String")
        );
        assert_eq!(gateway.call_count(), 3);
    }

    #[test]
    fn test_concept_labels() {
        assert!(is_concept_label("Dynamic Programming"));
        assert!(is_concept_label("Breadth-First Search"));
        assert!(!is_concept_label("The most important concept here is a sliding window over the input"));
        assert!(!is_concept_label("Which one?"));
    }

    #[test]
    fn test_clean_topic_fallback() {
        assert_eq!(clean_topic("   "), "General");
        assert_eq!(clean_topic("`Binary Search`"), "Binary Search");
    }
