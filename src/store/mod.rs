use futures::future::BoxFuture;

use crate::error::StoreError;
use crate::schemas::{Expense, Group, UpdateOutcome, UserNick};

mod memory;
mod mongo;

pub use memory::MemoryGroupStore;
pub use mongo::MongoGroupStore;

pub type Result<T> = std::result::Result<T, StoreError>;

/// The four operations the handlers need from the group collection.
///
/// One instance is built at startup and shared by every worker, so
/// implementations must be safe to call concurrently. Updates are single
/// store-side operations; callers never read a record to modify it.
pub trait GroupStore: Send + Sync {
    fn get<'a>(&'a self, guid: &'a str) -> BoxFuture<'a, Result<Option<Group>>>;

    fn put<'a>(&'a self, group: &'a Group) -> BoxFuture<'a, Result<()>>;

    /// Appends to `expenses`, creating the list when it is absent.
    fn append_expense<'a>(
        &'a self,
        guid: &'a str,
        expense: &'a Expense,
    ) -> BoxFuture<'a, Result<UpdateOutcome>>;

    /// Overwrites `members` entirely.
    fn replace_members<'a>(
        &'a self,
        guid: &'a str,
        members: &'a [UserNick],
    ) -> BoxFuture<'a, Result<UpdateOutcome>>;
}

/// Collection name for the deployment environment: `groups`, or
/// `groups-<env>` unless the environment is unset or `NONE`.
pub fn collection_name(env: Option<&str>) -> String {
    match env {
        Some(env) if !env.is_empty() && env != "NONE" => format!("groups-{}", env),
        _ => "groups".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_name_carries_the_environment() {
        assert_eq!(collection_name(None), "groups");
        assert_eq!(collection_name(Some("NONE")), "groups");
        assert_eq!(collection_name(Some("dev")), "groups-dev");
    }
}
