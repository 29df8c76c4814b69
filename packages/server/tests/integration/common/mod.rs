use std::net::SocketAddr;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use reqwest::Client;
use serde_json::Value;

use server::clock::ManualClock;
use server::config::{
    AppConfig, AuthConfig, CorsConfig, DemoConfig, PredictionConfig, ServerConfig,
};
use server::repository::Repositories;
use server::seed;
use server::state::AppState;

pub const DEMO_PASSWORD: &str = "password123";
const JWT_SECRET: &str = "test-secret-for-integration-tests";

pub mod routes {
    pub const REGISTER: &str = "/api/v1/auth/register";
    pub const LOGIN: &str = "/api/v1/auth/login";
    pub const ME: &str = "/api/v1/auth/me";
    pub const TEAMS: &str = "/api/v1/teams";
    pub const CURRENT_SEASON: &str = "/api/v1/seasons/current";
    pub const DEMO_RESET: &str = "/api/v1/demo/reset";

    pub fn standings(season: &str) -> String {
        format!("/api/v1/seasons/{season}/standings")
    }

    pub fn fixtures(season: &str) -> String {
        format!("/api/v1/seasons/{season}/fixtures")
    }

    pub fn team_fixtures(season: &str, team: &str) -> String {
        format!("/api/v1/seasons/{season}/teams/{team}/fixtures")
    }

    pub fn leaderboard(season: &str) -> String {
        format!("/api/v1/seasons/{season}/leaderboard")
    }

    pub fn prediction(season: &str) -> String {
        format!("/api/v1/seasons/{season}/prediction")
    }

    pub fn swap(season: &str) -> String {
        format!("/api/v1/seasons/{season}/prediction/swap")
    }

    pub fn swap_status(season: &str) -> String {
        format!("/api/v1/seasons/{season}/prediction/swap-status")
    }

    pub fn user_prediction(season: &str, username: &str) -> String {
        format!("/api/v1/seasons/{season}/users/{username}/prediction")
    }
}

pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub clock: Arc<ManualClock>,
    pub repos: Repositories,
    /// Id of the seeded current season.
    pub season_id: String,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
    pub retry_after: Option<String>,
}

fn start_time() -> DateTime<Utc> {
    "2025-10-01T09:00:00Z".parse().expect("valid timestamp")
}

fn test_config(enable_reset: bool, current_round: u8) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors: CorsConfig {
                allow_origins: vec![],
                max_age: 3600,
            },
        },
        auth: AuthConfig {
            jwt_secret: JWT_SECRET.to_string(),
            token_ttl_hours: 1,
            // Cheap hashing keeps the suite fast.
            argon2_memory_kib: 8,
            argon2_iterations: 1,
        },
        prediction: PredictionConfig {
            swap_cooldown_minutes: 24 * 60,
        },
        demo: DemoConfig {
            enable_reset,
            current_round,
            password: DEMO_PASSWORD.to_string(),
            rng_seed: 42,
        },
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(test_config(true, 8)).await
    }

    pub async fn spawn_without_reset() -> Self {
        Self::spawn_with(test_config(false, 8)).await
    }

    /// A season that has just started: no round is complete yet.
    pub async fn spawn_at_first_round() -> Self {
        Self::spawn_with(test_config(true, 1)).await
    }

    async fn spawn_with(config: AppConfig) -> Self {
        let clock = Arc::new(ManualClock::new(start_time()));
        let repos = Repositories::in_memory();
        let summary = seed::seed_demo(&repos, &config.demo, &config.auth, start_time())
            .await
            .expect("Failed to seed demo data");

        let state = AppState {
            config,
            repos: repos.clone(),
            clock: clock.clone(),
        };
        let app = server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            clock,
            repos,
            season_id: summary.season_id.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn advance(&self, by: TimeDelta) {
        self.clock.advance(by);
    }

    async fn send(&self, req: reqwest::RequestBuilder, token: Option<&str>) -> TestResponse {
        let req = match token {
            Some(token) => req.header("Authorization", format!("Bearer {token}")),
            None => req,
        };
        let res = req.send().await.expect("Failed to send request");
        TestResponse::from_response(res).await
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.send(self.client.get(self.url(path)), token).await
    }

    pub async fn post(&self, path: &str, body: &Value, token: Option<&str>) -> TestResponse {
        self.send(self.client.post(self.url(path)).json(body), token)
            .await
    }

    pub async fn put(&self, path: &str, body: &Value, token: Option<&str>) -> TestResponse {
        self.send(self.client.put(self.url(path)).json(body), token)
            .await
    }

    /// Log in and return the bearer token.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let res = self
            .post(
                routes::LOGIN,
                &serde_json::json!({"username": username, "password": password}),
                None,
            )
            .await;
        assert_eq!(res.status, 200, "Login failed: {}", res.text);
        res.body["token"]
            .as_str()
            .expect("Login response should contain a token")
            .to_string()
    }

    /// A correctly signed token for a user the server has never stored, as
    /// held by a client across a restart with a fresh store.
    pub fn token_for_unknown_user(&self) -> String {
        server::utils::jwt::sign(uuid::Uuid::new_v4(), "ghost", JWT_SECRET, 1)
            .expect("Failed to sign token")
    }

    /// Register a fresh user, log in and return the auth token.
    pub async fn create_user(&self, username: &str) -> String {
        let body = serde_json::json!({
            "username": username,
            "password": "securepass",
        });
        let reg = self.post(routes::REGISTER, &body, None).await;
        assert_eq!(reg.status, 201, "Registration failed: {}", reg.text);
        self.login(username, "securepass").await
    }

    /// Every team id, in the order `GET /teams` lists them.
    pub async fn team_order(&self) -> Vec<String> {
        let res = self.get(routes::TEAMS, None).await;
        assert_eq!(res.status, 200, "Team list failed: {}", res.text);
        res.body
            .as_array()
            .expect("team list")
            .iter()
            .map(|team| team["id"].as_str().unwrap().to_string())
            .collect()
    }

    /// Register a user and submit every team, in listing order, as their
    /// prediction.
    pub async fn user_with_prediction(&self, username: &str) -> (String, Vec<String>) {
        let token = self.create_user(username).await;
        let order = self.team_order().await;
        let res = self
            .post(
                &routes::prediction(&self.season_id),
                &serde_json::json!({ "teams": order }),
                Some(&token),
            )
            .await;
        assert_eq!(res.status, 201, "Create prediction failed: {}", res.text);
        (token, order)
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let retry_after = res
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self {
            status,
            text,
            body,
            retry_after,
        }
    }

    /// Team id at a 1-based position of a ranking response.
    pub fn team_at(&self, position: usize) -> String {
        self.body["rows"][position - 1]["team_id"]
            .as_str()
            .expect("row should have a team_id")
            .to_string()
    }
}
