use async_trait::async_trait;
use common::{Team, TeamId};
use dashmap::DashMap;

#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn save(&self, team: Team);

    async fn find(&self, id: TeamId) -> Option<Team>;

    /// All teams, alphabetical by name.
    async fn list(&self) -> Vec<Team>;
}

#[derive(Default)]
pub struct InMemoryTeamRepository {
    teams: DashMap<TeamId, Team>,
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn save(&self, team: Team) {
        self.teams.insert(team.id, team);
    }

    async fn find(&self, id: TeamId) -> Option<Team> {
        self.teams.get(&id).map(|t| t.clone())
    }

    async fn list(&self) -> Vec<Team> {
        let mut teams: Vec<Team> = self.teams.iter().map(|t| t.value().clone()).collect();
        teams.sort_by(|a, b| a.name.cmp(&b.name));
        teams
    }
}
