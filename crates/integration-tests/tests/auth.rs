//! Integration tests for registration, login, logout, and route gating.

use reqwest::StatusCode;
use reviews_integration_tests::{TestApp, location};

#[tokio::test]
async fn test_register_then_login() {
    let app = TestApp::spawn().await;

    let resp = app.register("alice", "s3cret-pass").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/login"));

    let body = app.get("/login").await.text().await.unwrap();
    assert!(body.contains("Registration successful. Please log in."));

    let resp = app.login("alice", "s3cret-pass").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/"));

    let resp = app.get("/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Logged in successfully."));
    assert!(body.contains("alice"));
}

#[tokio::test]
async fn test_register_existing_username_rejected() {
    let app = TestApp::spawn().await;
    app.register("alice", "first-pass").await;

    let resp = app.register("alice", "second-pass").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Username already exists"));

    // The first registration's password still works
    let resp = app.login("alice", "first-pass").await;
    assert_eq!(location(&resp), Some("/"));
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::spawn().await;
    app.register("alice", "right-pass").await;

    let resp = app.login("alice", "wrong-pass").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.text()
            .await
            .unwrap()
            .contains("Invalid username or password")
    );

    // Still anonymous
    let resp = app.get("/").await;
    assert_eq!(location(&resp), Some("/login"));
}

#[tokio::test]
async fn test_login_unknown_user() {
    let app = TestApp::spawn().await;

    let resp = app.login("nobody", "whatever").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.text()
            .await
            .unwrap()
            .contains("Invalid username or password")
    );
}

#[tokio::test]
async fn test_gated_routes_redirect_to_login() {
    let app = TestApp::spawn().await;

    for path in ["/", "/add", "/delete", "/search?resName=x", "/logout"] {
        let resp = app.get(path).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&resp), Some("/login"), "{path}");
    }

    let body = app.get("/login").await.text().await.unwrap();
    assert!(body.contains("Please log in to access this page."));
}

#[tokio::test]
async fn test_gated_post_redirects_to_login() {
    let app = TestApp::spawn().await;

    let resp = app
        .post_form(
            "/deleteData",
            &[
                ("username", "alice"),
                ("restaurantName", "Taco Town"),
                ("cuisine", "Mexican"),
            ],
        )
        .await;
    assert_eq!(location(&resp), Some("/login"));
}

#[tokio::test]
async fn test_logout() {
    let app = TestApp::signed_in("alice").await;

    let resp = app.get("/logout").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/"));

    let resp = app.get("/").await;
    assert_eq!(location(&resp), Some("/login"));

    let body = app.get("/login").await.text().await.unwrap();
    assert!(body.contains("You have been logged out."));
}

#[tokio::test]
async fn test_form_credentials_authenticate_single_request() {
    let app = TestApp::spawn().await;
    app.register("alice", "s3cret-pass").await;
    app.seed("bob", "Sushi Zen", "Japanese").await;

    let resp = app
        .post_form("/", &[("username", "alice"), ("password", "s3cret-pass")])
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("Sushi Zen"));

    // No session was created
    let resp = app.get("/").await;
    assert_eq!(location(&resp), Some("/login"));
}

#[tokio::test]
async fn test_form_credentials_wrong_password_stays_anonymous() {
    let app = TestApp::spawn().await;
    app.register("alice", "s3cret-pass").await;

    let resp = app
        .post_form("/", &[("username", "alice"), ("password", "nope")])
        .await;
    assert_eq!(location(&resp), Some("/login"));
}
