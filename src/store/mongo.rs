use futures::future::{BoxFuture, FutureExt};
use log::info;
use mongodb::{
    bson::doc,
    options::IndexOptions,
    results::UpdateResult,
    Client, Collection, IndexModel,
};

use super::{GroupStore, Result};
use crate::schemas::{Expense, Group, UpdateOutcome, UserNick};

pub struct MongoGroupStore {
    groups: Collection<Group>,
}

impl MongoGroupStore {
    /// Connects once and makes sure `guid` is unique in the collection.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        let groups = client.database(database).collection::<Group>(collection);

        let index = IndexModel::builder()
            .keys(doc! { "guid": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        groups.create_index(index, None).await?;
        info!("Using collection {}.{}", database, collection);

        Ok(MongoGroupStore { groups })
    }
}

fn outcome(result: UpdateResult) -> UpdateOutcome {
    UpdateOutcome {
        matched_count: result.matched_count,
        modified_count: result.modified_count,
    }
}

impl GroupStore for MongoGroupStore {
    fn get<'a>(&'a self, guid: &'a str) -> BoxFuture<'a, Result<Option<Group>>> {
        async move { Ok(self.groups.find_one(doc! { "guid": guid }, None).await?) }.boxed()
    }

    fn put<'a>(&'a self, group: &'a Group) -> BoxFuture<'a, Result<()>> {
        async move {
            self.groups.insert_one(group, None).await?;
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
            // $push creates the array when the field is absent
            let expense = bson::to_bson(expense)?;
            let result = self
                .groups
                .update_one(
                    doc! { "guid": guid },
                    doc! { "$push": { "expenses": expense } },
                    None,
                )
                .await?;
            Ok(outcome(result))
        }
        .boxed()
    }

    fn replace_members<'a>(
        &'a self,
        guid: &'a str,
        members: &'a [UserNick],
    ) -> BoxFuture<'a, Result<UpdateOutcome>> {
        async move {
            let result = self
                .groups
                .update_one(
                    doc! { "guid": guid },
                    doc! { "$set": { "members": members.to_vec() } },
                    None,
                )
                .await?;
            Ok(outcome(result))
        }
        .boxed()
    }
}
