use std::collections::HashMap;

use crate::schemas::{Expense, Group, UserNick};

pub type Balance = HashMap<UserNick, f64>;

/// Who shares an expense: its explicit receivers, otherwise every member,
/// otherwise the payer alone.
pub fn receivers_of<'a>(group: &'a Group, expense: &'a Expense) -> &'a [UserNick] {
    if !expense.receivers.is_empty() {
        return &expense.receivers;
    }
    match group.members.as_deref() {
        Some(members) if !members.is_empty() => members,
        _ => std::slice::from_ref(&expense.payer),
    }
}

/// Net position of everyone involved in the group's expenses: what they
/// paid minus their share, split as [`receivers_of`] decides.
pub fn compute_balance_from_group(group: &Group) -> Balance {
    let mut balance = Balance::new();
    for member in group.members.iter().flatten() {
        balance.insert(member.clone(), 0.0);
    }
    for expense in group.expenses.iter().flatten() {
        let amount = expense.amount;
        *balance.entry(expense.payer.clone()).or_insert(0.0) += amount;

        let receivers = receivers_of(group, expense);
        let amount_per_receiver = amount / receivers.len() as f64;
        for receiver in receivers {
            *balance.entry(receiver.clone()).or_insert(0.0) -= amount_per_receiver;
        }
    }
    balance
}
