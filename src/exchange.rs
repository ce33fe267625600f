use crate::balance::{compute_balance_from_group, receivers_of};
use crate::schemas::{Group, UserNick};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::mem::swap;

// Balances below one cent are rounding residue
const EPSILON: f64 = 0.005;

#[derive(Clone, Debug)]
pub struct PersonalBalance {
    pub id: UserNick,
    pub balance: f64,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct UserPair {
    pub user1: UserNick,
    pub user2: UserNick,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub payer: UserNick,
    pub receiver: UserNick,
    pub amount: f64,
}

// The exchanges that will be made if no simplification happens
fn get_naive_exchanges(group: &Group) -> Vec<Exchange> {
    let mut balances_between_people: HashMap<UserPair, f64> = HashMap::new();

    for expense in group.expenses.iter().flatten() {
        let receivers = receivers_of(group, expense);
        let num_receivers = receivers.len() as f64;
        for receiver in receivers.iter().filter(|r| **r != expense.payer) {
            let mut pair = UserPair {
                user1: expense.payer.clone(),
                user2: receiver.clone(),
            };
            let mut amount = expense.amount / num_receivers;

            // Alphabetical order keeps both directions of a pair in one entry
            if pair.user1 > pair.user2 {
                swap(&mut pair.user1, &mut pair.user2);
                amount = -amount;
            }

            *balances_between_people.entry(pair).or_insert(0.0) += amount;
        }
    }

    // The ones that paid are now the receivers
    let mut exchanges = Vec::new();

    for (people_pair, balance) in balances_between_people {
        if !balance.is_finite() || balance.abs() < EPSILON {
            continue;
        }
        let mut payer = people_pair.user2;
        let mut receiver = people_pair.user1;
        if balance < 0.0 {
            swap(&mut payer, &mut receiver);
        }

        exchanges.push(Exchange {
            payer,
            receiver,
            amount: round_to_2_decimals(balance.abs()),
        });
    }

    exchanges
}

// Pairs the largest debtor with the largest creditor until one side runs out
fn get_simplified_balances(
    mut payers: Vec<PersonalBalance>,
    mut receivers: Vec<PersonalBalance>,
) -> Vec<Exchange> {
    payers.sort_by(|a, b| a.balance.total_cmp(&b.balance));
    receivers.sort_by(|a, b| a.balance.total_cmp(&b.balance));

    let mut exchanges: Vec<Exchange> = Vec::new();

    while let (Some(payer), Some(receiver)) = (payers.last_mut(), receivers.last_mut()) {
        let amount = payer.balance.min(receiver.balance);
        exchanges.push(Exchange {
            payer: payer.id.clone(),
            receiver: receiver.id.clone(),
            amount: round_to_2_decimals(amount),
        });
        payer.balance = round_to_2_decimals(payer.balance - amount);
        receiver.balance = round_to_2_decimals(receiver.balance - amount);

        // NaN never compares, so it is settled too
        if !(payer.balance >= EPSILON) {
            payers.pop();
        }
        if !(receiver.balance >= EPSILON) {
            receivers.pop();
        }
    }
    exchanges
}

fn round_to_2_decimals(n: f64) -> f64 {
    let cents = (n * 100.0).round();
    if cents.is_finite() {
        cents / 100.0
    } else {
        n
    }
}

pub fn get_exchanges_from_group(group: &Group) -> Vec<Exchange> {
    let people_balances = compute_balance_from_group(group);

    let mut payers = Vec::new();
    let mut receivers = Vec::new();

    for (id, balance) in people_balances {
        if !balance.is_finite() {
            warn!("Skipping {} with unsettleable balance {}", id, balance);
            continue;
        }
        if balance.abs() < EPSILON {
            continue;
        }
        let person = PersonalBalance {
            id,
            balance: balance.abs(),
        };
        if balance < 0.0 {
            payers.push(person);
        } else {
            receivers.push(person);
        }
    }

    let naive_exchanges = get_naive_exchanges(group);
    let simplified_exchanges = get_simplified_balances(payers, receivers);

    // The simplification must not end up longer than the naive exchanges
    if simplified_exchanges.len() < naive_exchanges.len() {
        simplified_exchanges
    } else {
        naive_exchanges
    }
}
