//! End-to-end tests for `ShoppingAssistant::search`: a mocked completion
//! service plans the query, mocked marketplaces answer the searches.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cartscout_agent::{
    AgentError, OpenAiCompletionClient, Pipeline, PipelineError, Role, RunOptions,
    ShoppingAssistant,
};
use cartscout_core::{DecodeError, Platform, StageName};
use cartscout_scraper::{AmazonAdapter, MarketplaceClient, PlatformAdapter, WalmartAdapter};

const PLAN: &str = "- **Thought:** Search both platforms and filter by price.\n\
- **Action:** necessary tools = {search_products : True, price_filter : True} | params = {query:\"white sneaker\", platform:\"all\", max_price:50}";

fn completion_reply(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    }))
}

async fn mount_completions(server: &MockServer, plan: &str) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Summarize the below Observation"))
        .respond_with(completion_reply("Cheapest: Walmart sneaker at $19.98."))
        .with_priority(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(completion_reply(plan))
        .with_priority(5)
        .mount(server)
        .await;
}

async fn mount_marketplaces(amazon: &MockServer, walmart: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("query", "white sneaker"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"products": [
                {
                    "asin": "B01",
                    "product_title": "Canvas Sneaker",
                    "product_price": "$39.99",
                    "product_url": "https://www.amazon.com/dp/B01",
                    "product_photo": "https://m.media-amazon.com/images/I/1.jpg"
                },
                {
                    "asin": "B02",
                    "product_title": "Leather Sneaker",
                    "product_price": "$89.00",
                    "product_url": "https://www.amazon.com/dp/B02",
                    "product_photo": "https://m.media-amazon.com/images/I/2.jpg"
                }
            ]}
        })))
        .mount(amazon)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "white sneaker"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "searchResult": [[
                {
                    "usItemId": "501",
                    "name": "Walmart Sneaker",
                    "price": 19.98,
                    "productLink": "https://www.walmart.com/ip/501",
                    "image": "https://i5.walmartimages.com/asr/501.jpeg"
                }
            ]]
        })))
        .mount(walmart)
        .await;
}

fn assistant(
    completions: &MockServer,
    amazon: &MockServer,
    walmart: &MockServer,
) -> ShoppingAssistant<OpenAiCompletionClient> {
    let service =
        OpenAiCompletionClient::new(&completions.uri(), "sk-test", "gpt-4o-mini", 5, "test")
            .unwrap();
    let client = MarketplaceClient::new("rapid-test", 5, "test", 0, 0).unwrap();
    let adapters: Vec<Arc<dyn PlatformAdapter>> = vec![
        Arc::new(AmazonAdapter::new(client.clone(), &amazon.uri()).unwrap()),
        Arc::new(WalmartAdapter::new(client, &walmart.uri()).unwrap()),
    ];
    ShoppingAssistant::new(service, Pipeline::new(adapters, Duration::from_secs(5)))
}

#[tokio::test]
async fn search_plans_runs_and_summarizes() {
    let (completions, amazon, walmart) = (
        MockServer::start().await,
        MockServer::start().await,
        MockServer::start().await,
    );
    mount_completions(&completions, PLAN).await;
    mount_marketplaces(&amazon, &walmart).await;

    let mut assistant = assistant(&completions, &amazon, &walmart);
    let outcome = assistant
        .search("White sneakers under $50?", RunOptions::seeded(1))
        .await
        .unwrap();

    assert!(outcome.intent.is_enabled(StageName::Search));
    assert!(outcome.intent.is_enabled(StageName::PriceFilter));
    assert!(!outcome.intent.is_enabled(StageName::PriceComparison));

    let amazon_products = &outcome.results.get(Platform::Amazon).unwrap().products;
    assert_eq!(amazon_products.len(), 1);
    assert_eq!(amazon_products[0].product_id, "B01");
    let walmart_products = &outcome.results.get(Platform::Walmart).unwrap().products;
    assert_eq!(walmart_products.len(), 1);

    assert_eq!(outcome.summary, "Cheapest: Walmart sneaker at $19.98.");

    let history = assistant.conversation().messages();
    assert_eq!(history.len(), 5);
    assert_eq!(history[3].role, Role::User);
    assert!(history[3].content.contains("\"amazon\""));
}

#[tokio::test]
async fn search_returns_decode_error_for_reply_without_action() {
    let (completions, amazon, walmart) = (
        MockServer::start().await,
        MockServer::start().await,
        MockServer::start().await,
    );
    mount_completions(&completions, "I can't help with that.").await;

    let mut assistant = assistant(&completions, &amazon, &walmart);
    let err = assistant
        .search("hello", RunOptions::seeded(1))
        .await
        .unwrap_err();

    assert!(
        matches!(err, AgentError::Decode(DecodeError::MissingActionLine)),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn search_returns_pipeline_error_for_unknown_platform() {
    let (completions, amazon, walmart) = (
        MockServer::start().await,
        MockServer::start().await,
        MockServer::start().await,
    );
    let plan = "- **Action:** necessary tools = {search_products : True} | params = {query:\"lamp\", platform:\"target\"}";
    mount_completions(&completions, plan).await;

    let mut assistant = assistant(&completions, &amazon, &walmart);
    let err = assistant
        .search("A lamp from Target", RunOptions::seeded(1))
        .await
        .unwrap_err();

    assert!(
        matches!(err, AgentError::Pipeline(PipelineError::Core(_))),
        "got: {err:?}"
    );
}
