//! Two-level ordered interval index over IPv4 ranges.
//!
//! The outer map is keyed by range start, each inner map by range end, and the
//! values are country copies taken at build time. A generation is built once
//! from a dataset snapshot and never mutated afterwards.

use std::collections::{BTreeMap, HashMap};

use log::warn;

use crate::models::{Country, Ipv4CountryBlock};
use crate::utils::ipv4_to_string;

/// One immutable generation of the country range index.
#[derive(Debug, Clone, Default)]
pub struct CountryRangeIndex {
    tree: BTreeMap<u32, BTreeMap<u32, Country>>,
    countries: usize,
    ranges: usize,
}

impl CountryRangeIndex {
    /// Builds an index from a flat dataset.
    ///
    /// Duplicate country ids keep the last record seen. Ranges that refer to an
    /// unknown country are skipped. Ranges sharing both start and end collapse
    /// to the last one in `ranges` order. Each of these conditions logs a
    /// warning; none of them fails the build.
    pub fn build(countries: &[Country], ranges: &[Ipv4CountryBlock]) -> Self {
        let mut country_by_id: HashMap<u64, &Country> = HashMap::with_capacity(countries.len());
        for country in countries {
            if country_by_id.insert(country.id, country).is_some() {
                warn!("duplicate country id: {}, replacing", country.id);
            }
        }

        let mut tree: BTreeMap<u32, BTreeMap<u32, Country>> = BTreeMap::new();
        for block in ranges {
            let Some(country) = country_by_id.get(&block.country_id) else {
                warn!("country with country id {} does not exist", block.country_id);
                continue;
            };
            let replaced = tree
                .entry(block.start_ip)
                .or_default()
                .insert(block.end_ip, (*country).clone());
            if let Some(previous) = replaced {
                warn!(
                    "duplicate range {}-{}: country {} replaced by {}",
                    ipv4_to_string(block.start_ip),
                    ipv4_to_string(block.end_ip),
                    previous.id,
                    block.country_id
                );
            }
        }

        let ranges = tree.values().map(BTreeMap::len).sum();
        CountryRangeIndex {
            tree,
            countries: country_by_id.len(),
            ranges,
        }
    }

    /// Enumerates every range containing `ip`, in scan order.
    ///
    /// Groups are visited by descending start and every group with
    /// `start <= ip` is visited, even after an earlier group produced a match.
    /// Within a group, ends `>= ip` are visited ascending.
    pub fn candidates(&self, ip: u32) -> impl Iterator<Item = &Country> + '_ {
        self.tree
            .range(..=ip)
            .rev()
            .flat_map(move |(_, ends)| ends.range(ip..).map(|(_, country)| country))
    }

    /// Returns the country owning `ip`, if any range contains it.
    ///
    /// With several candidates the first one in [`candidates`](Self::candidates)
    /// order wins: the largest qualifying start, then the smallest qualifying
    /// end within that group.
    pub fn find_country(&self, ip: u32) -> Option<&Country> {
        let mut candidates = self.candidates(ip);
        let first = candidates.next()?;
        let rest = candidates.count();
        if rest > 0 {
            warn!(
                "found {} country candidates for ip {}",
                rest + 1,
                ipv4_to_string(ip)
            );
        }
        Some(first)
    }

    /// Number of distinct countries the generation was built from.
    pub fn countries_len(&self) -> usize {
        self.countries
    }

    /// Number of `(start, end)` entries retained.
    pub fn ranges_len(&self) -> usize {
        self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}
