//! Scripted dataset provider for coordinator and scheduler tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use tokio::sync::Notify;

use super::CountryDataSource;
use crate::models::{Country, Ipv4CountryBlock};

pub(crate) type Dataset = (Vec<Country>, Vec<Ipv4CountryBlock>);

/// Scripted provider: each `load` pops the next dataset (or failure).
#[derive(Default)]
pub(crate) struct ScriptedSource {
    pub(crate) script: Arc<Mutex<VecDeque<Result<Dataset, String>>>>,
    pub(crate) gate: Option<Arc<Notify>>,
    pub(crate) loads: Arc<AtomicUsize>,
    pub(crate) cleanups: Arc<AtomicUsize>,
    pub(crate) no_updates: bool,
    pub(crate) failing_cleanup: bool,
    /// Offset of `next_update_time` from now; 7 days when unset.
    pub(crate) update_in: Option<chrono::TimeDelta>,
    countries: Vec<Country>,
    blocks: Vec<Ipv4CountryBlock>,
}

impl ScriptedSource {
    pub(crate) fn new(script: Vec<Result<Dataset, String>>) -> Self {
        ScriptedSource {
            script: Arc::new(Mutex::new(script.into())),
            ..Default::default()
        }
    }

    pub(crate) fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }
}

impl CountryDataSource for ScriptedSource {
    async fn load(&mut self) -> anyhow::Result<()> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.loads.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok((countries, blocks))) => {
                self.countries = countries;
                self.blocks = blocks;
                Ok(())
            }
            Some(Err(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("script exhausted")),
        }
    }

    fn countries(&self) -> &[Country] {
        &self.countries
    }

    fn ipv4_blocks(&self) -> &[Ipv4CountryBlock] {
        &self.blocks
    }

    fn supports_updates(&self) -> bool {
        !self.no_updates
    }

    fn next_update_time(&self) -> DateTime<Utc> {
        Utc::now() + self.update_in.unwrap_or(chrono::TimeDelta::days(7))
    }

    fn cleanup(&mut self) -> anyhow::Result<()> {
        self.cleanups.fetch_add(1, Ordering::SeqCst);
        self.countries.clear();
        self.blocks.clear();
        if self.failing_cleanup {
            return Err(anyhow!("cleanup failed"));
        }
        Ok(())
    }
}

