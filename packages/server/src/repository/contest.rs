use async_trait::async_trait;
use common::{ContestId, MainContestEntry, UserId};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

#[async_trait]
pub trait ContestEntryRepository: Send + Sync {
    /// Store an entry unless the user already joined the contest.
    /// Returns `false` when one exists.
    async fn insert(&self, entry: MainContestEntry) -> bool;

    async fn find(&self, user_id: UserId, contest_id: ContestId) -> Option<MainContestEntry>;

    /// Entries of a contest, oldest first.
    async fn list_by_contest(&self, contest_id: ContestId) -> Vec<MainContestEntry>;

    async fn delete(&self, user_id: UserId, contest_id: ContestId) -> bool;
}

#[derive(Default)]
pub struct InMemoryContestEntryRepository {
    entries: DashMap<(UserId, ContestId), MainContestEntry>,
}

#[async_trait]
impl ContestEntryRepository for InMemoryContestEntryRepository {
    async fn insert(&self, entry: MainContestEntry) -> bool {
        match self.entries.entry((entry.user_id, entry.contest_id)) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(entry);
                true
            }
        }
    }

    async fn find(&self, user_id: UserId, contest_id: ContestId) -> Option<MainContestEntry> {
        self.entries.get(&(user_id, contest_id)).map(|e| e.clone())
    }

    async fn list_by_contest(&self, contest_id: ContestId) -> Vec<MainContestEntry> {
        let mut entries: Vec<MainContestEntry> = self
            .entries
            .iter()
            .filter(|e| e.contest_id == contest_id)
            .map(|e| e.value().clone())
            .collect();
        entries.sort_by_key(|e| (e.joined_at, e.id));
        entries
    }

    async fn delete(&self, user_id: UserId, contest_id: ContestId) -> bool {
        self.entries.remove(&(user_id, contest_id)).is_some()
    }
}
