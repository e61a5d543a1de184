use std::collections::HashMap;

use mesa_types::{account::AccountValues, balance::BalanceAmounts};

use crate::{account::AccountTreeNode, primitives::AccountId};

/// An account-tree node annotated with its own figures and the figures of
/// its whole subtree.
#[derive(Debug, Clone)]
pub struct AnnotatedAccount {
    pub account: AccountValues,
    /// Figures from postings hitting this account directly.
    pub own: BalanceAmounts,
    /// `own` plus the rolled-up figures of every descendant.
    pub rolled_up: BalanceAmounts,
    pub children: Vec<AnnotatedAccount>,
}

/// Annotates a chart-of-accounts forest bottom-up. Accounts absent from
/// `amounts` count as zero, so annotating twice with the same inputs yields
/// the same figures.
pub(super) fn annotate_forest(
    forest: Vec<AccountTreeNode>,
    amounts: &HashMap<AccountId, BalanceAmounts>,
) -> Vec<AnnotatedAccount> {
    forest
        .into_iter()
        .map(|node| annotate_node(node, amounts))
        .collect()
}

fn annotate_node(
    node: AccountTreeNode,
    amounts: &HashMap<AccountId, BalanceAmounts>,
) -> AnnotatedAccount {
    let own = amounts.get(&node.account.id).copied().unwrap_or_default();
    let children: Vec<AnnotatedAccount> = node
        .children
        .into_iter()
        .map(|child| annotate_node(child, amounts))
        .collect();
    let mut rolled_up = own;
    for child in &children {
        rolled_up.accumulate(&child.rolled_up);
    }
    AnnotatedAccount {
        account: node.account,
        own,
        rolled_up,
        children,
    }
}
