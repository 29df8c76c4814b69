use crate::common::{DEMO_PASSWORD, TestApp, routes};

mod season {
    use super::*;

    #[tokio::test]
    async fn current_season_is_in_round_eight() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::CURRENT_SEASON, None).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["id"], app.season_id.as_str());
        assert_eq!(res.body["name"], "2025/26");
        assert_eq!(res.body["current_round"], 8);
        assert_eq!(res.body["latest_completed_round"], 7);
        assert_eq!(res.body["total_rounds"], 38);
    }

    #[tokio::test]
    async fn twenty_teams_are_listed() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::TEAMS, None).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body.as_array().unwrap().len(), 20);
    }

    #[tokio::test]
    async fn unknown_season_is_not_found() {
        let app = TestApp::spawn().await;
        let missing = "00000000-0000-4000-8000-000000000000";

        let res = app.get(&routes::standings(missing), None).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn malformed_season_id_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::standings("not-a-uuid"), None).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod standings {
    use super::*;

    #[tokio::test]
    async fn default_table_is_after_the_latest_completed_round() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::standings(&app.season_id), None).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["round"], 7);
        let rows = res.body["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 20);
        assert_eq!(rows[0]["position"], 1);
        assert!(rows.iter().all(|r| r["played"] == 7));
        let points: Vec<u64> = rows.iter().map(|r| r["points"].as_u64().unwrap()).collect();
        assert!(points.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn earlier_round_can_be_requested() {
        let app = TestApp::spawn().await;

        let res = app
            .get(&format!("{}?round=3", routes::standings(&app.season_id)), None)
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["round"], 3);
        assert_eq!(res.body["rows"][0]["played"], 3);
    }

    #[tokio::test]
    async fn current_round_table_does_not_exist_yet() {
        let app = TestApp::spawn().await;

        let res = app
            .get(&format!("{}?round=8", routes::standings(&app.season_id)), None)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn out_of_range_round_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .get(&format!("{}?round=39", routes::standings(&app.season_id)), None)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod fixtures {
    use super::*;

    #[tokio::test]
    async fn current_round_fixtures_are_unplayed() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::fixtures(&app.season_id), None).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["round"], 8);
        let fixtures = res.body["fixtures"].as_array().unwrap();
        assert_eq!(fixtures.len(), 10);
        assert!(fixtures.iter().all(|f| f["result"].is_null()));
        assert!(fixtures.iter().all(|f| f["home"]["name"].is_string()));
    }

    #[tokio::test]
    async fn past_round_fixtures_have_results() {
        let app = TestApp::spawn().await;

        let res = app
            .get(&format!("{}?round=1", routes::fixtures(&app.season_id)), None)
            .await;

        assert_eq!(res.status, 200);
        let fixtures = res.body["fixtures"].as_array().unwrap();
        assert!(fixtures.iter().all(|f| f["result"]["home_goals"].is_number()));
    }

    #[tokio::test]
    async fn team_fixtures_start_at_the_current_round() {
        let app = TestApp::spawn().await;
        let team = app.team_order().await.remove(0);

        let res = app
            .get(
                &format!("{}?limit=3", routes::team_fixtures(&app.season_id, &team)),
                None,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["team"]["id"], team.as_str());
        let fixtures = res.body["fixtures"].as_array().unwrap();
        assert_eq!(fixtures.len(), 3);
        assert_eq!(fixtures[0]["round"], 8);
        assert!(
            fixtures
                .iter()
                .all(|f| f["home"]["id"] == team.as_str() || f["away"]["id"] == team.as_str())
        );
    }
}

mod leaderboard {
    use super::*;

    #[tokio::test]
    async fn seeded_players_are_ranked() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::leaderboard(&app.season_id), None).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["scored_round"], 7);
        assert_eq!(res.body["pagination"]["total"], 4);
        let data = res.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 4);
        assert_eq!(data[0]["rank"], 1);
        let points: Vec<u64> = data.iter().map(|e| e["points"].as_u64().unwrap()).collect();
        assert!(points.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn pagination_splits_entries() {
        let app = TestApp::spawn().await;

        let res = app
            .get(
                &format!("{}?page=2&per_page=3", routes::leaderboard(&app.season_id)),
                None,
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["data"].as_array().unwrap().len(), 1);
        assert_eq!(res.body["pagination"]["total_pages"], 2);
    }

    #[tokio::test]
    async fn huge_page_number_returns_an_empty_page() {
        let app = TestApp::spawn().await;

        let res = app
            .get(
                &format!(
                    "{}?page={}&per_page=100",
                    routes::leaderboard(&app.season_id),
                    u64::MAX
                ),
                None,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert!(res.body["data"].as_array().unwrap().is_empty());
        assert_eq!(res.body["pagination"]["total"], 4);
    }

    #[tokio::test]
    async fn new_entry_joins_the_leaderboard() {
        let app = TestApp::spawn().await;
        app.user_with_prediction("dave").await;

        let res = app.get(&routes::leaderboard(&app.season_id), None).await;

        assert_eq!(res.body["pagination"]["total"], 5);
        let names: Vec<&str> = res.body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["username"].as_str().unwrap())
            .collect();
        assert!(names.contains(&"dave"));
    }

    #[tokio::test]
    async fn reset_entry_leaves_the_leaderboard() {
        let app = TestApp::spawn().await;
        let (token, _) = app.user_with_prediction("dave").await;

        let reset = app
            .post(routes::DEMO_RESET, &serde_json::json!({}), Some(&token))
            .await;
        assert_eq!(reset.status, 200, "{}", reset.text);

        let res = app.get(&routes::leaderboard(&app.season_id), None).await;
        assert_eq!(res.body["pagination"]["total"], 4);

        // Seeded users keep their entry through a reset.
        let alice = app.login("alice", DEMO_PASSWORD).await;
        app.post(routes::DEMO_RESET, &serde_json::json!({}), Some(&alice))
            .await;
        let res = app.get(&routes::leaderboard(&app.season_id), None).await;
        assert_eq!(res.body["pagination"]["total"], 4);
    }
}
