use serde_json::json;

use crate::common::{DEMO_PASSWORD, TestApp, routes};

mod registration {
    use super::*;

    #[tokio::test]
    async fn new_user_can_register_with_valid_credentials() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::REGISTER,
                &json!({"username": "dave", "display_name": "Dave", "password": "securepass"}),
                None,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert!(res.body["id"].is_string());
        assert_eq!(res.body["username"], "dave");
        assert_eq!(res.body["display_name"], "Dave");
    }

    #[tokio::test]
    async fn display_name_defaults_to_username() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::REGISTER,
                &json!({"username": "dave", "password": "securepass"}),
                None,
            )
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["display_name"], "dave");
    }

    #[tokio::test]
    async fn cannot_register_a_seeded_username_in_any_case() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::REGISTER,
                &json!({"username": "Alice", "password": "securepass"}),
                None,
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "USERNAME_TAKEN");
    }

    #[tokio::test]
    async fn cannot_register_with_a_password_that_is_too_short() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::REGISTER,
                &json!({"username": "dave", "password": "short"}),
                None,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post(routes::REGISTER, &json!({"username": "dave"}), None)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn seeded_user_can_log_in_and_see_themselves() {
        let app = TestApp::spawn().await;
        let token = app.login("alice", DEMO_PASSWORD).await;

        let res = app.get(routes::ME, Some(&token)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["username"], "alice");
        assert_eq!(res.body["display_name"], "Alice");
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::LOGIN,
                &json!({"username": "alice", "password": "not-the-password"}),
                None,
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn unknown_user_is_rejected_the_same_way() {
        let app = TestApp::spawn().await;

        let res = app
            .post(
                routes::LOGIN,
                &json!({"username": "nobody", "password": "whatever1"}),
                None,
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }
}

mod tokens {
    use super::*;

    #[tokio::test]
    async fn me_requires_a_token() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::ME, None).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn garbage_token_is_invalid() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::ME, Some("not.a.jwt")).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn bad_token_on_an_optional_route_is_still_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .get(&routes::prediction(&app.season_id), Some("not.a.jwt"))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn token_for_a_vanished_user_cannot_write() {
        let app = TestApp::spawn().await;
        let token = app.token_for_unknown_user();
        let order = app.team_order().await;

        let me = app.get(routes::ME, Some(&token)).await;
        assert_eq!(me.status, 401);
        assert_eq!(me.body["code"], "TOKEN_INVALID");

        let create = app
            .post(
                &routes::prediction(&app.season_id),
                &json!({ "teams": order }),
                Some(&token),
            )
            .await;
        assert_eq!(create.status, 401, "{}", create.text);
        assert_eq!(create.body["code"], "TOKEN_INVALID");

        let view = app
            .get(&routes::prediction(&app.season_id), Some(&token))
            .await;
        assert_eq!(view.status, 401);

        let board = app.get(&routes::leaderboard(&app.season_id), None).await;
        assert_eq!(board.body["pagination"]["total"], 4);
    }
}
