use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::{FixedOffset, Utc};
use recipe_share_api::application::notification::{DispatcherSettings, NotificationDispatcher};
use recipe_share_api::data::memory::InMemoryStore;
use recipe_share_api::domain::mail::{MailMessage, MailSender};
use recipe_share_api::domain::user::{CreateUser, LoginRequest};
use recipe_share_api::presentation::handlers::AppState;
use recipe_share_api::presentation::middleware::JwtAuthMiddleware;
use recipe_share_api::presentation::routes::configure;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

#[macro_use]
mod common;

#[derive(Default)]
struct Outbox {
    delivered: Mutex<Vec<MailMessage>>,
    reject: Option<String>,
}

#[async_trait]
impl MailSender for Outbox {
    async fn send(&self, message: &MailMessage) -> Result<()> {
        if self.reject.as_ref().is_some_and(|r| message.to.contains(r)) {
            bail!("mailbox unavailable");
        }
        self.delivered.lock().unwrap().push(message.clone());
        Ok(())
    }
}

fn settings() -> DispatcherSettings {
    DispatcherSettings {
        offset: FixedOffset::east_opt(0).unwrap(),
        from: "noreply@recipes.local".to_string(),
        send_timeout: Duration::from_secs(1),
    }
}

macro_rules! like {
    ($app:expr, $token:expr, $id:expr) => {{
        let req = test::TestRequest::post()
            .uri(&format!("/api/recipes/{}/like", $id))
            .insert_header(("Authorization", format!("Bearer {}", $token)))
            .to_request();
        assert_eq!(
            test::call_service(&$app, req).await.status(),
            StatusCode::CREATED
        );
    }};
}

#[actix_web::test]
async fn test_two_likes_same_day_produce_one_notification() {
    let (app, store) = setup_test!();
    let (_, author) = signup!(app, "author");
    let (_, a) = signup!(app, "a");
    let (_, b) = signup!(app, "b");
    let id = create_recipe!(app, author, "Test Recipe");
    like!(app, a, id);
    like!(app, b, id);

    let outbox = Arc::new(Outbox::default());
    let dispatcher = NotificationDispatcher::new(store.clone(), outbox.clone(), settings());
    let summary = dispatcher.run_at(Utc::now()).await.unwrap();

    assert_eq!(summary.selected, 1);
    assert_eq!(summary.sent, vec![id]);
    let delivered = outbox.delivered.lock().unwrap();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].to, vec!["author@example.com".to_string()]);
    assert_eq!(delivered[0].body.matches("Test Recipe").count(), 1);
}

#[actix_web::test]
async fn test_failed_delivery_is_isolated() {
    let (app, store) = setup_test!();
    let (_, first) = signup!(app, "first");
    let (_, second) = signup!(app, "second");
    let (_, fan) = signup!(app, "fan");
    let r1 = create_recipe!(app, first, "R1");
    let r2 = create_recipe!(app, second, "R2");
    like!(app, fan, r1);
    like!(app, fan, r2);

    let outbox = Arc::new(Outbox {
        reject: Some("first@example.com".to_string()),
        ..Default::default()
    });
    let dispatcher = NotificationDispatcher::new(store.clone(), outbox.clone(), settings());
    let summary = dispatcher.run_at(Utc::now()).await.unwrap();

    assert_eq!(summary.selected, 2);
    assert_eq!(summary.sent, vec![r2]);
    assert_eq!(summary.failed, vec![r1]);
    let delivered = outbox.delivered.lock().unwrap();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].to, vec!["second@example.com".to_string()]);
}

#[actix_web::test]
async fn test_unliked_recipe_is_not_notified() {
    let (app, store) = setup_test!();
    let (_, author) = signup!(app, "author");
    let (_, fan) = signup!(app, "fan");
    let id = create_recipe!(app, author, "Test Recipe");
    like!(app, fan, id);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/recipes/{}/like", id))
        .insert_header(("Authorization", format!("Bearer {}", fan)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let outbox = Arc::new(Outbox::default());
    let dispatcher = NotificationDispatcher::new(store.clone(), outbox.clone(), settings());
    let summary = dispatcher.run_at(Utc::now()).await.unwrap();

    assert_eq!(summary.selected, 0);
    assert!(outbox.delivered.lock().unwrap().is_empty());
}
