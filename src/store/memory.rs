use std::collections::HashMap;

use futures::future::{BoxFuture, FutureExt};
use tokio::sync::RwLock;

use super::{GroupStore, Result};
use crate::schemas::{Expense, Group, UpdateOutcome, UserNick};

/// In-process store used for local runs and tests.
#[derive(Default)]
pub struct MemoryGroupStore {
    groups: RwLock<HashMap<String, Group>>,
}

impl MemoryGroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn update<F>(&self, guid: &str, apply: F) -> UpdateOutcome
    where
        F: FnOnce(&mut Group),
    {
        let mut groups = self.groups.write().await;
        match groups.get_mut(guid) {
            Some(group) => {
                apply(group);
                UpdateOutcome {
                    matched_count: 1,
                    modified_count: 1,
                }
            }
            None => UpdateOutcome {
                matched_count: 0,
                modified_count: 0,
            },
        }
    }
}

impl GroupStore for MemoryGroupStore {
    fn get<'a>(&'a self, guid: &'a str) -> BoxFuture<'a, Result<Option<Group>>> {
        async move { Ok(self.groups.read().await.get(guid).cloned()) }.boxed()
    }

    fn put<'a>(&'a self, group: &'a Group) -> BoxFuture<'a, Result<()>> {
        async move {
            self.groups
                .write()
                .await
                .insert(group.guid.clone(), group.clone());
            Ok(())
        }
        .boxed()
    }

    fn append_expense<'a>(
        &'a self,
        guid: &'a str,
        expense: &'a Expense,
    ) -> BoxFuture<'a, Result<UpdateOutcome>> {
        async move {
            let outcome = self
                .update(guid, |group| {
                    group
                        .expenses
                        .get_or_insert_with(Vec::new)
                        .push(expense.clone())
                })
                .await;
            Ok(outcome)
        }
        .boxed()
    }

    fn replace_members<'a>(
        &'a self,
        guid: &'a str,
        members: &'a [UserNick],
    ) -> BoxFuture<'a, Result<UpdateOutcome>> {
        async move {
            let outcome = self
                .update(guid, |group| group.members = Some(members.to_vec()))
                .await;
            Ok(outcome)
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(payer: &str, amount: f64) -> Expense {
        Expense {
            payer: payer.to_owned(),
            amount,
            desc: None,
            date: None,
            receivers: vec![],
        }
    }

    #[actix_web::test]
    async fn appends_accumulate_in_call_order() {
        let store = MemoryGroupStore::new();
        let group = Group::new("g".to_owned(), "trip".to_owned());
        store.put(&group).await.unwrap();

        for amount in [10.0, 20.0, 30.0] {
            let outcome = store.append_expense("g", &expense("alice", amount)).await.unwrap();
            assert_eq!(outcome.matched_count, 1);
        }

        let stored = store.get("g").await.unwrap().unwrap();
        let amounts: Vec<f64> = stored.expenses.unwrap().iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![10.0, 20.0, 30.0]);
    }

    #[actix_web::test]
    async fn replacing_members_discards_previous_ones() {
        let store = MemoryGroupStore::new();
        store
            .put(&Group::new("g".to_owned(), "trip".to_owned()))
            .await
            .unwrap();

        store
            .replace_members("g", &["alice".to_owned(), "bob".to_owned()])
            .await
            .unwrap();
        store.replace_members("g", &["carol".to_owned()]).await.unwrap();

        let stored = store.get("g").await.unwrap().unwrap();
        assert_eq!(stored.members, Some(vec!["carol".to_owned()]));
    }

    #[actix_web::test]
    async fn updates_do_not_create_missing_groups() {
        let store = MemoryGroupStore::new();
        let outcome = store
            .replace_members("missing", &["alice".to_owned()])
            .await
            .unwrap();
        assert_eq!(outcome.matched_count, 0);
        assert!(store.get("missing").await.unwrap().is_none());
    }
}
