use std::collections::HashMap;

use mesa_types::account::AccountValues;

use crate::primitives::AccountId;

/// Node in the chart-of-accounts forest. Aggregated figures are not stored
/// here; the balance aggregator annotates a copy of the tree instead.
#[derive(Clone, Debug)]
pub struct AccountTreeNode {
    pub account: AccountValues,
    pub children: Vec<AccountTreeNode>,
}

/// Assembles the forest from the flat account list. Accounts whose parent is
/// missing from the input are treated as roots. Siblings keep the input
/// (code) ordering.
pub(crate) fn build_forest(accounts: Vec<AccountValues>) -> Vec<AccountTreeNode> {
    let mut children_of: HashMap<AccountId, Vec<AccountValues>> = HashMap::new();
    let mut roots = Vec::new();
    let known: std::collections::HashSet<AccountId> = accounts.iter().map(|a| a.id).collect();

    for account in accounts {
        match account.parent_id {
            Some(parent_id) if known.contains(&parent_id) => {
                children_of.entry(parent_id).or_default().push(account);
            }
            _ => roots.push(account),
        }
    }

    roots
        .into_iter()
        .map(|account| attach_children(account, &mut children_of))
        .collect()
}

fn attach_children(
    account: AccountValues,
    children_of: &mut HashMap<AccountId, Vec<AccountValues>>,
) -> AccountTreeNode {
    let children = children_of
        .remove(&account.id)
        .unwrap_or_default()
        .into_iter()
        .map(|child| attach_children(child, children_of))
        .collect();
    AccountTreeNode { account, children }
}
