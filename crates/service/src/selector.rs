//! Least-loaded account selection.
//!
//! Screens are offered from the accounts that have the *fewest* available
//! screens left (but at least one), so nearly-full accounts fill up before
//! fresh ones are opened. Accounts with nothing available never take part.

use std::collections::BTreeMap;

use models::screen_subscription::Model as Screen;
use uuid::Uuid;

/// Available screens per account, keyed by account id.
pub fn available_counts(screens: &[Screen]) -> BTreeMap<Uuid, usize> {
    let mut counts = BTreeMap::new();
    for screen in screens.iter().filter(|s| s.is_available()) {
        *counts.entry(screen.account_id).or_insert(0) += 1;
    }
    counts
}

/// One available screen per least-loaded account, ordered by account id.
///
/// Within an account the representative is the oldest available screen
/// (`created_at`, then `id`). Returns an empty vec when nothing is available.
pub fn select_least_loaded(screens: &[Screen]) -> Vec<Screen> {
    let mut per_account: BTreeMap<Uuid, (usize, &Screen)> = BTreeMap::new();
    for screen in screens.iter().filter(|s| s.is_available()) {
        per_account
            .entry(screen.account_id)
            .and_modify(|(count, rep)| {
                *count += 1;
                if (screen.created_at, screen.id) < (rep.created_at, rep.id) {
                    *rep = screen;
                }
            })
            .or_insert((1, screen));
    }

    let Some(min_available) = per_account.values().map(|(count, _)| *count).min() else {
        return Vec::new();
    };

    per_account
        .into_values()
        .filter(|(count, _)| *count == min_available)
        .map(|(_, rep)| rep.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use models::screen_subscription::PaymentStatus;

    fn screen(account_id: Uuid, user_id: Option<Uuid>, is_active: bool, age_secs: i64) -> Screen {
        Screen {
            id: Uuid::new_v4(),
            account_id,
            user_id,
            is_active,
            payment_status: PaymentStatus::NotInitiated,
            created_at: (Utc::now() - Duration::seconds(age_secs)).into(),
        }
    }

    fn free(account_id: Uuid, n: usize) -> Vec<Screen> {
        (0..n).map(|i| screen(account_id, None, true, i as i64)).collect()
    }

    #[test]
    fn empty_input_selects_nothing() {
        assert!(select_least_loaded(&[]).is_empty());
    }

    #[test]
    fn smaller_pool_wins() {
        // Account X: 2 available of 4; account Y: 1 available of 2.
        let (x, y) = (Uuid::new_v4(), Uuid::new_v4());
        let mut rows = free(x, 2);
        rows.push(screen(x, Some(Uuid::new_v4()), true, 0));
        rows.push(screen(x, Some(Uuid::new_v4()), true, 0));
        rows.extend(free(y, 1));
        rows.push(screen(y, Some(Uuid::new_v4()), true, 0));

        let picked = select_least_loaded(&rows);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].account_id, y);
    }

    #[test]
    fn two_available_beats_three() {
        let (x, y) = (Uuid::new_v4(), Uuid::new_v4());
        let mut rows = free(x, 2);
        rows.extend(free(y, 3));

        let picked = select_least_loaded(&rows);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].account_id, x);
    }

    #[test]
    fn ties_return_one_per_account_in_account_order() {
        let mut accounts: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        let mut rows = Vec::new();
        for a in &accounts {
            rows.extend(free(*a, 2));
        }
        rows.extend(free(Uuid::new_v4(), 5));

        let picked = select_least_loaded(&rows);
        accounts.sort();
        assert_eq!(picked.iter().map(|s| s.account_id).collect::<Vec<_>>(), accounts);
    }

    #[test]
    fn exhausted_accounts_are_not_minimum() {
        let (full, open) = (Uuid::new_v4(), Uuid::new_v4());
        let mut rows = vec![
            screen(full, Some(Uuid::new_v4()), true, 0),
            screen(full, None, false, 0),
        ];
        rows.extend(free(open, 3));

        let picked = select_least_loaded(&rows);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].account_id, open);
        assert_eq!(available_counts(&rows).get(&full), None);
    }

    #[test]
    fn nothing_available_selects_nothing() {
        let a = Uuid::new_v4();
        let rows = vec![screen(a, Some(Uuid::new_v4()), true, 0), screen(a, None, false, 0)];
        assert!(select_least_loaded(&rows).is_empty());
    }

    #[test]
    fn representative_is_oldest_available_screen() {
        let a = Uuid::new_v4();
        let newest = screen(a, None, true, 1);
        let oldest = screen(a, None, true, 100);
        let taken_older = screen(a, Some(Uuid::new_v4()), true, 1000);
        let rows = vec![newest, oldest.clone(), taken_older];

        let picked = select_least_loaded(&rows);
        assert_eq!(picked, vec![oldest]);
    }
}
