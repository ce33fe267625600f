use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub type UserNick = String;

/// Largest absolute expense amount accepted. Keeps group balances far from
/// `f64` overflow.
pub const MAX_AMOUNT: f64 = 1e12;

/// A usable expense amount: finite, non-zero and within [`MAX_AMOUNT`].
/// Zero counts as a missing amount.
pub fn is_valid_amount(amount: f64) -> bool {
    amount.is_finite() && amount != 0.0 && amount.abs() <= MAX_AMOUNT
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub guid: String,
    pub group_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<UserNick>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expenses: Option<Vec<Expense>>,
}

impl Group {
    pub fn new(guid: String, group_name: String) -> Self {
        Group {
            guid,
            group_name,
            members: None,
            expenses: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Expense {
    pub payer: UserNick,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub receivers: Vec<UserNick>,
}

/// Echo of an update operation, independent of the backing store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub matched_count: u64,
    pub modified_count: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DataJson<T> {
    pub data: T,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GuidJson {
    pub guid: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupNameJson {
    pub group_name: Option<String>,
}

impl GroupNameJson {
    pub fn validate(self) -> Result<String, ApiError> {
        match self.group_name {
            Some(name) if !name.trim().is_empty() => Ok(name),
            _ => Err(ApiError::Validation("invalid group name".to_owned())),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MembersJson {
    pub members: Option<Vec<UserNick>>,
}

impl MembersJson {
    pub fn validate(self) -> Result<Vec<UserNick>, ApiError> {
        match self.members {
            Some(members) if !members.is_empty() => Ok(members),
            _ => Err(ApiError::Validation("invalid members".to_owned())),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ExpenseJson {
    pub expense: Option<ExpenseInput>,
}

#[derive(Debug, Deserialize)]
pub struct ExpenseInput {
    pub payer: Option<UserNick>,
    pub amount: Option<f64>,
    pub desc: Option<String>,
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub receivers: Vec<UserNick>,
}

impl ExpenseJson {
    pub fn validate(self) -> Result<Expense, ApiError> {
        let invalid = || ApiError::Validation("invalid expense object".to_owned());
        let input = self.expense.ok_or_else(invalid)?;
        let payer = input
            .payer
            .filter(|payer| !payer.trim().is_empty())
            .ok_or_else(invalid)?;
        let amount = input
            .amount
            .filter(|amount| is_valid_amount(*amount))
            .ok_or_else(invalid)?;
        Ok(Expense {
            payer,
            amount,
            desc: input.desc,
            date: input.date,
            receivers: input.receivers,
        })
    }
}
