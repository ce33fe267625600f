//! Input handling for the three screens of the front end.
//!
//! Each form owns its inputs and a [`FormState`]:
//!
//! ```text
//! Idle --submit(invalid)--> ErrorShown --edit--> Idle
//! Idle --submit(valid)--> Submitting --ok--> Idle (or the next step)
//!                                    --err--> ErrorShown
//! ```
//!
//! Invalid input never reaches the API.

use chrono::NaiveDate;
use log::debug;

use crate::client::GroupsApi;
use crate::schemas::{is_valid_amount, Expense, UserNick};

#[derive(Clone, Debug, PartialEq)]
pub enum FormError {
    Invalid(&'static str),
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Default)]
pub enum FormState {
    #[default]
    Idle,
    ErrorShown(FormError),
    Submitting,
}

impl FormState {
    fn edit(&mut self) {
        if let FormState::ErrorShown(_) = self {
            *self = FormState::Idle;
        }
    }

    /// Whether the input indicator is clear, as rendered in `data-valid`.
    pub fn is_valid(&self) -> bool {
        !matches!(self, FormState::ErrorShown(FormError::Invalid(_)))
    }
}

/// Where the front end goes after a successful submit.
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    AddMembers { guid: String },
    Expenses { guid: String },
}

pub const GROUP_NAME_REQUIRED: &str = "Please enter a group name.";
pub const MEMBERS_REQUIRED: &str = "Please add at least one member.";
pub const EXPENSE_INCOMPLETE: &str = "Please enter a payer and a numeric amount.";

#[derive(Debug, Default)]
pub struct CreateGroupForm {
    group_name: String,
    state: FormState,
}

impl CreateGroupForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn set_group_name(&mut self, value: impl Into<String>) {
        self.group_name = value.into();
        self.state.edit();
    }

    pub async fn submit<A: GroupsApi>(&mut self, api: &A) -> Option<Step> {
        let name = self.group_name.trim();
        if name.is_empty() {
            self.state = FormState::ErrorShown(FormError::Invalid(GROUP_NAME_REQUIRED));
            return None;
        }
        self.state = FormState::Submitting;
        match api.create_group(name).await {
            Ok(guid) => {
                self.state = FormState::Idle;
                Some(Step::AddMembers { guid })
            }
            Err(err) => {
                self.state = FormState::ErrorShown(FormError::Failed(err.to_string()));
                None
            }
        }
    }
}

#[derive(Debug)]
pub struct AddMembersForm {
    guid: String,
    members: Vec<UserNick>,
    state: FormState,
}

impl AddMembersForm {
    pub fn new(guid: impl Into<String>) -> Self {
        AddMembersForm {
            guid: guid.into(),
            members: Vec::new(),
            state: FormState::Idle,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn members(&self) -> &[UserNick] {
        &self.members
    }

    /// Blank and duplicate names are ignored.
    pub fn add_member(&mut self, name: &str) {
        let name = name.trim();
        if !name.is_empty() && !self.members.iter().any(|m| m == name) {
            self.members.push(name.to_owned());
        }
        self.state.edit();
    }

    pub fn remove_member(&mut self, name: &str) {
        self.members.retain(|m| m != name);
        self.state.edit();
    }

    pub async fn submit<A: GroupsApi>(&mut self, api: &A) -> Option<Step> {
        if self.members.is_empty() {
            self.state = FormState::ErrorShown(FormError::Invalid(MEMBERS_REQUIRED));
            return None;
        }
        self.state = FormState::Submitting;
        match api.replace_members(&self.guid, &self.members).await {
            Ok(_) => {
                self.state = FormState::Idle;
                Some(Step::Expenses {
                    guid: self.guid.clone(),
                })
            }
            Err(err) => {
                self.state = FormState::ErrorShown(FormError::Failed(err.to_string()));
                None
            }
        }
    }
}

#[derive(Debug)]
pub struct ExpenseForm {
    guid: String,
    payer: String,
    amount: String,
    desc: String,
    date: Option<NaiveDate>,
    receivers: Vec<UserNick>,
    state: FormState,
}

impl ExpenseForm {
    pub fn new(guid: impl Into<String>) -> Self {
        ExpenseForm {
            guid: guid.into(),
            payer: String::new(),
            amount: String::new(),
            desc: String::new(),
            date: None,
            receivers: Vec::new(),
            state: FormState::Idle,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn set_payer(&mut self, value: impl Into<String>) {
        self.payer = value.into();
        self.state.edit();
    }

    pub fn set_amount(&mut self, value: impl Into<String>) {
        self.amount = value.into();
        self.state.edit();
    }

    pub fn set_desc(&mut self, value: impl Into<String>) {
        self.desc = value.into();
        self.state.edit();
    }

    pub fn set_date(&mut self, value: Option<NaiveDate>) {
        self.date = value;
        self.state.edit();
    }

    /// Who shares the expense. Left empty, it is split among all members.
    pub fn set_receivers(&mut self, receivers: Vec<UserNick>) {
        self.receivers = receivers;
        self.state.edit();
    }

    fn expense(&self) -> Option<Expense> {
        let payer = self.payer.trim();
        let amount: f64 = self.amount.trim().parse().ok()?;
        if payer.is_empty() || !is_valid_amount(amount) {
            return None;
        }
        let desc = self.desc.trim();
        Some(Expense {
            payer: payer.to_owned(),
            amount,
            desc: (!desc.is_empty()).then(|| desc.to_owned()),
            date: self.date,
            receivers: self.receivers.clone(),
        })
    }

    /// On success the inputs are cleared for the next expense.
    pub async fn submit<A: GroupsApi>(&mut self, api: &A) -> Option<Expense> {
        let Some(expense) = self.expense() else {
            self.state = FormState::ErrorShown(FormError::Invalid(EXPENSE_INCOMPLETE));
            return None;
        };
        self.state = FormState::Submitting;
        match api.append_expense(&self.guid, &expense).await {
            Ok(outcome) => {
                debug!("expense stored, matched {}", outcome.matched_count);
                self.payer.clear();
                self.amount.clear();
                self.desc.clear();
                self.date = None;
                self.receivers.clear();
                self.state = FormState::Idle;
                Some(expense)
            }
            Err(err) => {
                self.state = FormState::ErrorShown(FormError::Failed(err.to_string()));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::client::{ClientError, Result};
    use crate::schemas::UpdateOutcome;

    #[derive(Default)]
    struct FakeApi {
        calls: Mutex<Vec<String>>,
        fail: bool,
    }

    impl FakeApi {
        fn failing() -> Self {
            FakeApi {
                fail: true,
                ..Default::default()
            }
        }

        fn record(&self, call: String) -> Result<()> {
            self.calls.lock().unwrap().push(call);
            if self.fail {
                return Err(ClientError::Api {
                    status: 500,
                    message: "boom".to_owned(),
                });
            }
            Ok(())
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    const UPDATED: UpdateOutcome = UpdateOutcome {
        matched_count: 1,
        modified_count: 1,
    };

    impl GroupsApi for FakeApi {
        async fn create_group(&self, group_name: &str) -> Result<String> {
            self.record(format!("create {}", group_name))?;
            Ok("guid-1".to_owned())
        }

        async fn replace_members(&self, guid: &str, members: &[UserNick]) -> Result<UpdateOutcome> {
            self.record(format!("members {} {}", guid, members.join(",")))?;
            Ok(UPDATED)
        }

        async fn append_expense(&self, guid: &str, expense: &Expense) -> Result<UpdateOutcome> {
            self.record(format!("expense {} {} {}", guid, expense.payer, expense.amount))?;
            Ok(UPDATED)
        }
    }

    #[actix_web::test]
    async fn blank_group_name_shows_error_without_calling_api() {
        let api = FakeApi::default();
        let mut form = CreateGroupForm::new();
        form.set_group_name("   ");

        assert_eq!(form.submit(&api).await, None);
        assert!(!form.state().is_valid());
        assert!(api.calls().is_empty());

        form.set_group_name("Jeju");
        assert_eq!(form.state(), &FormState::Idle);
        assert!(form.state().is_valid());
    }

    #[actix_web::test]
    async fn created_group_moves_on_to_members() {
        let api = FakeApi::default();
        let mut form = CreateGroupForm::new();
        form.set_group_name(" Jeju Trip ");

        let step = form.submit(&api).await;
        assert_eq!(
            step,
            Some(Step::AddMembers {
                guid: "guid-1".to_owned()
            })
        );
        assert_eq!(api.calls(), vec!["create Jeju Trip"]);
        assert!(form.state().is_valid());
    }

    #[actix_web::test]
    async fn api_failure_is_shown_but_input_stays_valid() {
        let api = FakeApi::failing();
        let mut form = CreateGroupForm::new();
        form.set_group_name("Jeju");

        assert_eq!(form.submit(&api).await, None);
        assert!(matches!(form.state(), FormState::ErrorShown(FormError::Failed(_))));
        assert!(form.state().is_valid());
    }

    #[actix_web::test]
    async fn members_form_requires_someone() {
        let api = FakeApi::default();
        let mut form = AddMembersForm::new("g");
        form.add_member("  ");

        assert_eq!(form.submit(&api).await, None);
        assert_eq!(
            form.state(),
            &FormState::ErrorShown(FormError::Invalid(MEMBERS_REQUIRED))
        );

        form.add_member("alice");
        form.add_member("bob");
        form.add_member("alice");
        form.remove_member("bob");
        form.add_member("carol");
        assert_eq!(form.members(), ["alice", "carol"]);

        let step = form.submit(&api).await;
        assert_eq!(step, Some(Step::Expenses { guid: "g".to_owned() }));
        assert_eq!(api.calls(), vec!["members g alice,carol"]);
    }

    #[actix_web::test]
    async fn expense_form_needs_payer_and_numeric_amount() {
        let api = FakeApi::default();
        let mut form = ExpenseForm::new("g");
        form.set_payer("alice");
        form.set_amount("ten");

        assert_eq!(form.submit(&api).await, None);
        assert!(!form.state().is_valid());

        form.set_amount("12.5");
        form.set_desc("taxi");
        let expense = form.submit(&api).await.unwrap();
        assert_eq!(expense.amount, 12.5);
        assert_eq!(expense.desc.as_deref(), Some("taxi"));
        assert_eq!(api.calls(), vec!["expense g alice 12.5"]);

        // inputs are cleared, so an immediate resubmit is invalid
        assert_eq!(form.submit(&api).await, None);
        assert!(!form.state().is_valid());
    }

    #[actix_web::test]
    async fn expense_form_rejects_amounts_beyond_the_cap() {
        let api = FakeApi::default();
        let mut form = ExpenseForm::new("g");
        form.set_payer("alice");

        for amount in ["1.7e308", "inf", "NaN", "-2e12"] {
            form.set_amount(amount);
            assert_eq!(form.submit(&api).await, None);
            assert_eq!(
                form.state(),
                &FormState::ErrorShown(FormError::Invalid(EXPENSE_INCOMPLETE))
            );
        }
        assert!(api.calls().is_empty());
    }

    #[actix_web::test]
    async fn expense_form_sends_chosen_receivers() {
        let api = FakeApi::default();
        let mut form = ExpenseForm::new("g");
        form.set_payer("alice");
        form.set_amount("30");
        form.set_receivers(vec!["bob".to_owned(), "carol".to_owned()]);

        let expense = form.submit(&api).await.unwrap();
        assert_eq!(expense.receivers, ["bob", "carol"]);

        form.set_payer("alice");
        form.set_amount("10");
        let expense = form.submit(&api).await.unwrap();
        assert!(expense.receivers.is_empty());
    }
}
