//! In-memory social graph storage.

use parking_lot::RwLock;
use shared_types::{UserId, UserPair};
use std::collections::{HashMap, HashSet};

use crate::domain::{FriendRequest, FriendRequestId};
use crate::ports::SocialRepository;

#[derive(Default)]
struct Graph {
    friendships: HashSet<UserPair>,
    requests: HashMap<FriendRequestId, FriendRequest>,
    /// (blocker, blocked)
    blocks: HashSet<(UserId, UserId)>,
}

/// Process-local [`SocialRepository`]. One lock over the whole graph keeps
/// multi-step updates such as block-and-unfriend consistent.
#[derive(Default)]
pub struct InMemorySocialRepository {
    graph: RwLock<Graph>,
}

impl InMemorySocialRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored friendships.
    pub fn friendship_count(&self) -> usize {
        self.graph.read().friendships.len()
    }
}

impl SocialRepository for InMemorySocialRepository {
    fn insert_friendship(&self, pair: UserPair) -> bool {
        self.graph.write().friendships.insert(pair)
    }

    fn remove_friendship(&self, pair: UserPair) -> bool {
        self.graph.write().friendships.remove(&pair)
    }

    fn has_friendship(&self, pair: UserPair) -> bool {
        self.graph.read().friendships.contains(&pair)
    }

    fn friends_of(&self, user: UserId) -> HashSet<UserId> {
        self.graph
            .read()
            .friendships
            .iter()
            .filter_map(|pair| pair.other(user))
            .collect()
    }

    fn save_request(&self, request: FriendRequest) {
        self.graph.write().requests.insert(request.id, request);
    }

    fn get_request(&self, id: FriendRequestId) -> Option<FriendRequest> {
        self.graph.read().requests.get(&id).cloned()
    }

    fn requests_involving(&self, user: UserId) -> Vec<FriendRequest> {
        self.graph
            .read()
            .requests
            .values()
            .filter(|r| r.from == user || r.to == user)
            .cloned()
            .collect()
    }

    fn remove_requests(&self, pair: UserPair) -> usize {
        let mut graph = self.graph.write();
        let before = graph.requests.len();
        graph.requests.retain(|_, r| r.pair() != pair);
        before - graph.requests.len()
    }

    fn insert_block(&self, blocker: UserId, blocked: UserId) -> bool {
        self.graph.write().blocks.insert((blocker, blocked))
    }

    fn remove_block(&self, blocker: UserId, blocked: UserId) -> bool {
        self.graph.write().blocks.remove(&(blocker, blocked))
    }

    fn blocks_involving(&self, user: UserId) -> HashSet<UserId> {
        self.graph
            .read()
            .blocks
            .iter()
            .filter_map(|(blocker, blocked)| {
                if *blocker == user {
                    Some(*blocked)
                } else if *blocked == user {
                    Some(*blocker)
                } else {
                    None
                }
            })
            .collect()
    }
}
