//! Friendship graph rules.

use shared_types::UserId;
use std::collections::HashSet;

use super::FriendRequest;

/// Friends shared by two users.
#[must_use]
pub fn mutual_count(friends_a: &HashSet<UserId>, friends_b: &HashSet<UserId>) -> u32 {
    let shared = friends_a.intersection(friends_b).count();
    u32::try_from(shared).unwrap_or(u32::MAX)
}

/// Users never to recommend to `user`: friends, anyone with a pending
/// request either way, and anyone blocked either way.
#[must_use]
pub fn excluded_ids(
    user: UserId,
    friends: &HashSet<UserId>,
    requests: &[FriendRequest],
    blocked: &HashSet<UserId>,
) -> HashSet<UserId> {
    let pending = requests
        .iter()
        .filter(|r| r.is_pending())
        .filter_map(|r| r.pair().other(user));

    friends
        .iter()
        .copied()
        .chain(pending)
        .chain(blocked.iter().copied())
        .filter(|id| *id != user)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RequestStatus;

    #[test]
    fn test_mutual_count() {
        let (x, y, z) = (UserId::new(), UserId::new(), UserId::new());
        let a: HashSet<_> = [x, y].into();
        let b: HashSet<_> = [y, z].into();
        assert_eq!(mutual_count(&a, &b), 1);
        assert_eq!(mutual_count(&a, &HashSet::new()), 0);
    }

    #[test]
    fn test_excluded_ids_union() {
        let me = UserId::new();
        let friend = UserId::new();
        let incoming = UserId::new();
        let outgoing = UserId::new();
        let declined = UserId::new();
        let blocked = UserId::new();

        let mut old = FriendRequest::new(declined, me);
        old.answer(RequestStatus::Declined).unwrap();
        let requests = vec![
            FriendRequest::new(incoming, me),
            FriendRequest::new(me, outgoing),
            old,
        ];

        let excluded = excluded_ids(me, &[friend].into(), &requests, &[blocked].into());
        let expected: HashSet<_> = [friend, incoming, outgoing, blocked].into();
        assert_eq!(excluded, expected);
    }
}
