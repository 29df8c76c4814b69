use chrono::TimeDelta;
use serde_json::json;

use crate::common::{DEMO_PASSWORD, TestApp, routes};

mod viewing {
    use super::*;

    #[tokio::test]
    async fn guest_sees_latest_table_read_only() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::prediction(&app.season_id), None).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["source"], "ROUND_STANDINGS");
        assert_eq!(res.body["access_mode"], "READONLY_GUEST");
        assert_eq!(res.body["is_readonly"], true);
        assert!(res.body["owner"].is_null());
        let rows = res.body["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 20);
        assert_eq!(rows[0]["position"], 1);
        assert!(rows[0]["team_name"].is_string());
        assert_eq!(rows[0]["actual_position"], 1);
        assert_eq!(rows[0]["next_fixture"]["round"], 8);
    }

    #[tokio::test]
    async fn guest_sees_baseline_before_any_round_is_complete() {
        let app = TestApp::spawn_at_first_round().await;

        let res = app.get(&routes::prediction(&app.season_id), None).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["source"], "SEASON_BASELINE");
        assert_eq!(res.body["access_mode"], "READONLY_GUEST");
        assert_eq!(res.body["rows"][0]["team_name"], "Northbridge Rovers");
        assert!(res.body["rows"][0]["actual_position"].is_null());
    }

    #[tokio::test]
    async fn new_user_without_prediction_can_create_entry() {
        let app = TestApp::spawn().await;
        let token = app.create_user("dave").await;

        let res = app
            .get(&routes::prediction(&app.season_id), Some(&token))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["access_mode"], "CAN_CREATE_ENTRY");
        assert_eq!(res.body["source"], "ROUND_STANDINGS");
        assert_eq!(res.body["is_readonly"], false);
    }

    #[tokio::test]
    async fn viewing_another_user_is_read_only() {
        let app = TestApp::spawn().await;
        let token = app.create_user("dave").await;

        let res = app
            .get(&routes::user_prediction(&app.season_id, "alice"), Some(&token))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["access_mode"], "READONLY_VIEWING_OTHER");
        assert_eq!(res.body["source"], "USER_PREDICTION");
        assert_eq!(res.body["owner"]["username"], "alice");
    }

    #[tokio::test]
    async fn viewing_yourself_by_username_is_your_own_view() {
        let app = TestApp::spawn().await;
        let token = app.login("demo", DEMO_PASSWORD).await;

        let res = app
            .get(&routes::user_prediction(&app.season_id, "demo"), Some(&token))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["access_mode"], "EDITABLE");
    }

    #[tokio::test]
    async fn unknown_user_falls_back_to_latest_table() {
        let app = TestApp::spawn().await;

        let res = app
            .get(&routes::user_prediction(&app.season_id, "nobody"), None)
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["access_mode"], "READONLY_USER_NOT_FOUND");
        assert_eq!(res.body["source"], "ROUND_STANDINGS");
    }

    #[tokio::test]
    async fn past_rounds_are_read_only_and_future_rounds_rejected() {
        let app = TestApp::spawn().await;
        let token = app.login("demo", DEMO_PASSWORD).await;
        let path = routes::prediction(&app.season_id);

        let past = app.get(&format!("{path}?round=5"), Some(&token)).await;
        assert_eq!(past.status, 200);
        assert_eq!(past.body["round"], 5);
        assert_eq!(past.body["is_current_round"], false);
        assert_eq!(past.body["access_mode"], "READONLY_COOLDOWN");

        let future = app.get(&format!("{path}?round=9"), Some(&token)).await;
        assert_eq!(future.status, 400);
        assert_eq!(future.body["code"], "VALIDATION_ERROR");
    }
}

mod creating {
    use super::*;

    #[tokio::test]
    async fn new_user_creates_a_prediction_and_can_edit() {
        let app = TestApp::spawn().await;
        let (token, order) = app.user_with_prediction("dave").await;

        let res = app
            .get(&routes::prediction(&app.season_id), Some(&token))
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["access_mode"], "EDITABLE");
        assert_eq!(res.body["source"], "USER_PREDICTION");
        assert_eq!(res.body["owner"]["username"], "dave");
        assert_eq!(res.team_at(1), order[0]);

        let status = app
            .get(&routes::swap_status(&app.season_id), Some(&token))
            .await;
        assert_eq!(status.body["can_swap"], true);
        assert_eq!(status.body["first_swap_bonus_available"], true);
        assert_eq!(status.body["swap_count"], 0);
    }

    #[tokio::test]
    async fn second_create_conflicts() {
        let app = TestApp::spawn().await;
        let (token, order) = app.user_with_prediction("dave").await;

        let res = app
            .post(
                &routes::prediction(&app.season_id),
                &json!({ "teams": order }),
                Some(&token),
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn incomplete_ranking_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.create_user("dave").await;
        let mut order = app.team_order().await;
        order.pop();

        let res = app
            .post(
                &routes::prediction(&app.season_id),
                &json!({ "teams": order }),
                Some(&token),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn creating_requires_login() {
        let app = TestApp::spawn().await;
        let order = app.team_order().await;

        let res = app
            .post(
                &routes::prediction(&app.season_id),
                &json!({ "teams": order }),
                None,
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }
}

mod swapping {
    use super::*;

    #[tokio::test]
    async fn bonus_swap_then_cooldown_then_allowed_again() {
        let app = TestApp::spawn().await;
        let (token, order) = app.user_with_prediction("dave").await;

        let res = app
            .post(
                &routes::swap(&app.season_id),
                &json!({
                    "team_a": order[4],
                    "team_b": order[8],
                    "position_a": 5,
                    "position_b": 9,
                }),
                Some(&token),
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.team_at(5), order[8]);
        assert_eq!(res.team_at(9), order[4]);
        assert_eq!(res.team_at(1), order[0]);
        assert_eq!(res.body["moved"].as_array().unwrap().len(), 2);
        assert_eq!(res.body["swap_status"]["swap_count"], 1);
        assert_eq!(res.body["swap_status"]["can_swap"], false);

        let view = app
            .get(&routes::prediction(&app.season_id), Some(&token))
            .await;
        assert_eq!(view.body["access_mode"], "READONLY_COOLDOWN");

        let blocked = app
            .post(
                &routes::swap(&app.season_id),
                &json!({ "team_a": order[0], "team_b": order[1] }),
                Some(&token),
            )
            .await;
        assert_eq!(blocked.status, 422);
        assert_eq!(blocked.body["code"], "COOLDOWN_ACTIVE");
        assert_eq!(blocked.retry_after.as_deref(), Some("86400"));

        app.advance(TimeDelta::hours(24));

        let status = app
            .get(&routes::swap_status(&app.season_id), Some(&token))
            .await;
        assert_eq!(status.body["can_swap"], true);

        let again = app
            .post(
                &routes::swap(&app.season_id),
                &json!({ "team_a": order[0], "team_b": order[1] }),
                Some(&token),
            )
            .await;
        assert_eq!(again.status, 200, "{}", again.text);
        assert_eq!(again.body["swap_status"]["swap_count"], 2);
    }

    #[tokio::test]
    async fn stale_position_is_rejected_without_changes() {
        let app = TestApp::spawn().await;
        let (token, order) = app.user_with_prediction("dave").await;

        let res = app
            .post(
                &routes::swap(&app.season_id),
                &json!({
                    "team_a": order[2],
                    "team_b": order[6],
                    "position_a": 4,
                }),
                Some(&token),
            )
            .await;
        assert_eq!(res.status, 422);
        assert_eq!(res.body["code"], "POSITION_MISMATCH");

        let status = app
            .get(&routes::swap_status(&app.season_id), Some(&token))
            .await;
        assert_eq!(status.body["swap_count"], 0);
        assert_eq!(status.body["first_swap_bonus_available"], true);
    }

    #[tokio::test]
    async fn unknown_team_and_same_team_are_rejected() {
        let app = TestApp::spawn().await;
        let (token, order) = app.user_with_prediction("dave").await;

        let unknown = app
            .post(
                &routes::swap(&app.season_id),
                &json!({
                    "team_a": order[0],
                    "team_b": "00000000-0000-4000-8000-000000000000",
                }),
                Some(&token),
            )
            .await;
        assert_eq!(unknown.status, 422);
        assert_eq!(unknown.body["code"], "TEAM_NOT_FOUND");

        let same = app
            .post(
                &routes::swap(&app.season_id),
                &json!({ "team_a": order[0], "team_b": order[0] }),
                Some(&token),
            )
            .await;
        assert_eq!(same.status, 400);
        assert_eq!(same.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn swap_without_prediction_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.create_user("dave").await;
        let order = app.team_order().await;

        let res = app
            .post(
                &routes::swap(&app.season_id),
                &json!({ "team_a": order[0], "team_b": order[1] }),
                Some(&token),
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn seeded_user_in_cooldown_is_blocked() {
        let app = TestApp::spawn().await;
        let token = app.login("bob", DEMO_PASSWORD).await;

        let status = app
            .get(&routes::swap_status(&app.season_id), Some(&token))
            .await;
        assert_eq!(status.body["can_swap"], false);
        assert!(status.body["next_eligible_at"].is_string());

        let view = app
            .get(&routes::prediction(&app.season_id), Some(&token))
            .await;
        assert_eq!(view.body["access_mode"], "READONLY_COOLDOWN");
    }
}

mod reordering {
    use super::*;

    #[tokio::test]
    async fn one_pair_is_accepted() {
        let app = TestApp::spawn().await;
        let (token, mut order) = app.user_with_prediction("dave").await;
        order.swap(10, 15);

        let res = app
            .put(
                &routes::prediction(&app.season_id),
                &json!({ "teams": order }),
                Some(&token),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.team_at(11), order[10]);
        assert_eq!(res.body["swap_status"]["swap_count"], 1);
    }

    #[tokio::test]
    async fn more_than_one_pair_is_rejected() {
        let app = TestApp::spawn().await;
        let (token, mut order) = app.user_with_prediction("dave").await;
        order.swap(0, 1);
        order.swap(1, 2);

        let res = app
            .put(
                &routes::prediction(&app.season_id),
                &json!({ "teams": order }),
                Some(&token),
            )
            .await;

        assert_eq!(res.status, 422);
        assert_eq!(res.body["code"], "TOO_MANY_CHANGES");
    }
}

mod demo_reset {
    use super::*;

    #[tokio::test]
    async fn seeded_user_gets_original_order_and_unlimited_changes() {
        let app = TestApp::spawn().await;
        let token = app.login("demo", DEMO_PASSWORD).await;
        let before = app
            .get(&routes::prediction(&app.season_id), Some(&token))
            .await;
        let original: Vec<String> = (1..=20).map(|p| before.team_at(p)).collect();

        let swap = app
            .post(
                &routes::swap(&app.season_id),
                &json!({ "team_a": original[0], "team_b": original[19] }),
                Some(&token),
            )
            .await;
        assert_eq!(swap.status, 200, "{}", swap.text);

        let reset = app
            .post(routes::DEMO_RESET, &json!({}), Some(&token))
            .await;
        assert_eq!(reset.status, 200, "{}", reset.text);
        assert_eq!(reset.body["outcome"], "RESTORED");
        assert_eq!(reset.body["swap_status"]["can_swap"], true);
        assert_eq!(reset.body["swap_status"]["swap_count"], 0);

        let after = app
            .get(&routes::prediction(&app.season_id), Some(&token))
            .await;
        let restored: Vec<String> = (1..=20).map(|p| after.team_at(p)).collect();
        assert_eq!(restored, original);

        let reversed: Vec<String> = original.iter().rev().cloned().collect();
        let reorder = app
            .put(
                &routes::prediction(&app.season_id),
                &json!({ "teams": reversed }),
                Some(&token),
            )
            .await;
        assert_eq!(reorder.status, 200, "{}", reorder.text);
    }

    #[tokio::test]
    async fn new_user_loses_prediction() {
        let app = TestApp::spawn().await;
        let (token, _) = app.user_with_prediction("dave").await;

        let reset = app
            .post(routes::DEMO_RESET, &json!({}), Some(&token))
            .await;
        assert_eq!(reset.body["outcome"], "CLEARED");

        let view = app
            .get(&routes::prediction(&app.season_id), Some(&token))
            .await;
        assert_eq!(view.body["access_mode"], "CAN_CREATE_ENTRY");
    }

    #[tokio::test]
    async fn disabled_reset_is_not_found() {
        let app = TestApp::spawn_without_reset().await;
        let token = app.login("demo", DEMO_PASSWORD).await;

        let res = app
            .post(routes::DEMO_RESET, &json!({}), Some(&token))
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}
