use std::sync::Arc;
use std::time::Duration;

use nostr_articles::{
    unix_timestamp, ArticleProjection, ArticlePublisher, AuthorizedPublishers, CancellationToken,
    PublishArticleInput, RelayConfig, RelayExecutor,
};
use nostr_sdk::prelude::*;

#[tokio::test]
#[ignore]
async fn publish_and_fetch_article() {
    let relay = std::env::var("NOSTR_TEST_RELAY").expect("NOSTR_TEST_RELAY missing");
    let secret = std::env::var("NOSTR_TEST_KEY").expect("NOSTR_TEST_KEY missing");

    let keys = Keys::parse(&secret).expect("invalid secret key");
    let publishers = AuthorizedPublishers::from_hex([keys.public_key().to_hex()]);

    let executor = Arc::new(
        RelayExecutor::new(RelayConfig {
            relays: vec![relay],
            secret_key: Some(secret),
            min_acks: 1,
            query_timeout: Duration::from_secs(8),
            publish_timeout: Duration::from_secs(10),
        })
        .await
        .unwrap(),
    );

    let slug = format!("article-test-{}", unix_timestamp());
    let publisher = ArticlePublisher::new(executor.clone(), executor.clone(), publishers.clone());
    assert!(publisher.is_authorized());

    publisher
        .publish(PublishArticleInput {
            slug: slug.clone(),
            title: "Test Article".to_string(),
            summary: "Fixture published by the integration test".to_string(),
            content: "# Hello\n\nThis is a fixture.".to_string(),
            categories: vec!["test".to_string()],
            ..Default::default()
        })
        .await
        .unwrap();

    let projection = ArticleProjection::new(executor.clone(), publishers);
    let article = projection
        .get_article(&slug, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(article.map(|a| a.data.slug), Some(slug));
    executor.disconnect().await;
}
