#![allow(unused_macros)]

macro_rules! setup_test {
    () => {{
        let store = Arc::new(InMemoryStore::new());
        let jwt_secret = "test-secret-key-for-testing-only".to_string();
        let state = web::Data::new(AppState::new(store.clone(), jwt_secret.clone()));

        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .wrap(JwtAuthMiddleware::new(jwt_secret))
                .configure(configure),
        )
        .await;

        (app, store)
    }};
}

/// Registers `$name` and logs in. Yields `(user_id, access_token)`.
macro_rules! signup {
    ($app:expr, $name:expr) => {{
        let name: &str = $name;
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(&CreateUser {
                email: format!("{}@example.com", name),
                username: name.to_string(),
                password: "testpass".to_string(),
            })
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        let user_id: Uuid = body["id"].as_str().unwrap().parse().unwrap();

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(&LoginRequest {
                email: format!("{}@example.com", name),
                password: "testpass".to_string(),
            })
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&$app, req).await;
        (user_id, body["access_token"].as_str().unwrap().to_string())
    }};
}

/// Creates a recipe as the holder of `$token`. Yields its id.
macro_rules! create_recipe {
    ($app:expr, $token:expr, $title:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/recipes")
            .insert_header(("Authorization", format!("Bearer {}", $token)))
            .set_json(&serde_json::json!({
                "title": $title,
                "desc": "Delicious recipe",
                "cook_time": 30,
                "ingredients": "sugar, flour",
                "procedure": "mix ingredients",
                "category": "Dessert"
            }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        body["id"].as_str().unwrap().parse::<Uuid>().unwrap()
    }};
}
