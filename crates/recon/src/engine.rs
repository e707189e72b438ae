use std::collections::{HashMap, HashSet};

use crate::model::{Account, Conflict, ReconReport};

/// Index a collection by id. On duplicate ids the last record wins,
/// deterministic in the caller's iteration order.
fn index_by_id(accounts: &[Account]) -> HashMap<&str, &Account> {
    let mut map = HashMap::with_capacity(accounts.len());
    for account in accounts {
        map.insert(account.id.as_str(), account);
    }
    map
}

fn fields_match(a: &Account, b: &Account) -> bool {
    a.name == b.name && a.number == b.number && a.account_type == b.account_type
}

/// Reconcile a local and a remote account collection by id.
///
/// Matching is id-only: number and name never participate in pairing, so the
/// result is order-independent and idempotent. Ids present on both sides are
/// compared field-by-field (`name`, `number`, `type`); any difference yields
/// one data-mismatch [`Conflict`]. Ids present on one side only land in
/// `additions` (local) or `remote_only` (remote), ordered by first appearance
/// of the id in the input; conflicts are ordered by first appearance of the
/// matched id in the local input.
///
/// Total over well-formed input: empty collections on either side are fine.
pub fn reconcile(local: &[Account], remote: &[Account]) -> ReconReport {
    let local_by_id = index_by_id(local);
    let remote_by_id = index_by_id(remote);

    let mut additions = Vec::new();
    let mut conflicts = Vec::new();
    let mut seen: HashSet<&str> = HashSet::with_capacity(local.len());

    for account in local {
        if !seen.insert(account.id.as_str()) {
            continue;
        }
        // The indexed record (last occurrence) is authoritative for the id;
        // only the position of the first occurrence is kept.
        let ours = local_by_id[account.id.as_str()];
        match remote_by_id.get(account.id.as_str()) {
            None => additions.push(ours.clone()),
            Some(theirs) => {
                if !fields_match(ours, theirs) {
                    conflicts.push(Conflict::data_mismatch(ours, theirs));
                }
            }
        }
    }

    let mut remote_only = Vec::new();
    let mut seen_remote: HashSet<&str> = HashSet::with_capacity(remote.len());

    for account in remote {
        if !seen_remote.insert(account.id.as_str()) {
            continue;
        }
        if !local_by_id.contains_key(account.id.as_str()) {
            remote_only.push(remote_by_id[account.id.as_str()].clone());
        }
    }

    ReconReport {
        additions,
        remote_only,
        conflicts,
    }
}

/// Count ids present in both collections whose `name`, `number` and `type`
/// all agree: the complement of the conflict set within matched ids.
pub fn count_matched(local: &[Account], remote: &[Account]) -> usize {
    let remote_by_id = index_by_id(remote);
    index_by_id(local)
        .values()
        .filter(|ours| {
            remote_by_id
                .get(ours.id.as_str())
                .is_some_and(|theirs| fields_match(ours, theirs))
        })
        .count()
}
