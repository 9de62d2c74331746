use crate::models::admin::AdminAccount;
use crate::wal::wal::{Wal, WalOperation};
use anyhow::Result;
use dashmap::DashMap;
use std::sync::Arc;

/// Administrator accounts keyed by username
pub struct AdminStore {
    accounts: DashMap<String, AdminAccount>,
    wal: Arc<Wal>,
}

impl AdminStore {
    pub fn new(wal: Arc<Wal>) -> Self {
        Self {
            accounts: DashMap::new(),
            wal,
        }
    }

    /// Add an account, replacing any with the same username
    pub fn add(&self, account: AdminAccount) -> Result<()> {
        self.wal.log_operation(&WalOperation::AddAdmin {
            username: account.username.clone(),
            password: account.password.clone(),
        })?;
        self.restore(account);
        Ok(())
    }

    pub fn get(&self, username: &str) -> Option<AdminAccount> {
        self.accounts.get(username).map(|entry| entry.value().clone())
    }

    /// Insert without logging; used for WAL replay
    pub fn restore(&self, account: AdminAccount) {
        self.accounts.insert(account.username.clone(), account);
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn snapshot(&self) -> Vec<WalOperation> {
        let mut accounts: Vec<AdminAccount> =
            self.accounts.iter().map(|entry| entry.value().clone()).collect();
        accounts.sort_by(|a, b| a.username.cmp(&b.username));

        accounts
            .into_iter()
            .map(|a| WalOperation::AddAdmin {
                username: a.username,
                password: a.password,
            })
            .collect()
    }
}
