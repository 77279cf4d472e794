// crates/cities-light-core/src/store/prefix.rs
use crate::error::{GeoError, Result};
use crate::model::{CityId, CityNamePrefix, PrefixId};
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Default)]
struct Entries {
    by_text: HashMap<String, PrefixId>,
    /// `texts[i]` is the prefix with id `i + 1`.
    texts: Vec<String>,
}

#[derive(Debug, Default)]
struct Links {
    by_city: HashMap<CityId, BTreeSet<PrefixId>>,
    by_prefix: HashMap<PrefixId, BTreeSet<CityId>>,
    count: usize,
}

/// Deduplicated prefix dictionary plus the city <-> prefix association set.
///
/// All operations take `&self`; concurrent writers never produce two entries
/// for the same text nor two copies of the same link.
#[derive(Debug, Default)]
pub struct PrefixDictionary {
    entries: RwLock<Entries>,
    links: RwLock<Links>,
}

impl PrefixDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, text: &str) -> Option<CityNamePrefix> {
        self.entries.read().by_text.get(text).map(|&id| CityNamePrefix {
            id,
            prefix: text.to_owned(),
        })
    }

    pub fn get_or_create(&self, text: &str) -> Result<CityNamePrefix> {
        if let Some(found) = self.get(text) {
            return Ok(found);
        }

        let mut entries = self.entries.write();
        // Re-check under the write lock: another writer may have inserted
        // `text` since the read above. Finding it here counts as success.
        if let Some(&id) = entries.by_text.get(text) {
            return Ok(CityNamePrefix {
                id,
                prefix: text.to_owned(),
            });
        }

        let next = u32::try_from(entries.texts.len() + 1)
            .map_err(|_| GeoError::InvalidData("prefix ids exhausted".into()))?;
        let id = PrefixId(next);
        entries.texts.push(text.to_owned());
        entries.by_text.insert(text.to_owned(), id);
        Ok(CityNamePrefix {
            id,
            prefix: text.to_owned(),
        })
    }

    pub fn contains_id(&self, id: PrefixId) -> bool {
        let n = self.entries.read().texts.len();
        (1..=n).contains(&(id.get() as usize))
    }

    /// Adds the `city`-`prefix` link. Returns `false` if it was already there.
    pub fn associate(&self, city: CityId, prefix: PrefixId) -> bool {
        let mut links = self.links.write();
        let inserted = links.by_city.entry(city).or_default().insert(prefix);
        if inserted {
            links.by_prefix.entry(prefix).or_default().insert(city);
            links.count += 1;
        }
        inserted
    }

    /// Drops the links of `city` to prefixes outside `keep`.
    pub fn retain_links(&self, city: CityId, keep: &BTreeSet<PrefixId>) -> usize {
        let mut guard = self.links.write();
        let links = &mut *guard;
        let Some(current) = links.by_city.get_mut(&city) else {
            return 0;
        };
        let stale: Vec<PrefixId> = current.difference(keep).copied().collect();
        for prefix in &stale {
            current.remove(prefix);
            if let Some(members) = links.by_prefix.get_mut(prefix) {
                members.remove(&city);
                if members.is_empty() {
                    links.by_prefix.remove(prefix);
                }
            }
        }
        if current.is_empty() {
            links.by_city.remove(&city);
        }
        links.count -= stale.len();
        stale.len()
    }

    /// Cities linked to the entry whose text is exactly `text`.
    pub fn members(&self, text: &str) -> Vec<CityId> {
        let Some(id) = self.entries.read().by_text.get(text).copied() else {
            return Vec::new();
        };
        self.links
            .read()
            .by_prefix
            .get(&id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Prefix texts linked to `city`, in id order.
    pub fn prefixes_of(&self, city: CityId) -> Vec<String> {
        let ids: Vec<PrefixId> = self
            .links
            .read()
            .by_city
            .get(&city)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        let entries = self.entries.read();
        ids.into_iter()
            .filter_map(|id| {
                (id.get() as usize)
                    .checked_sub(1)
                    .and_then(|i| entries.texts.get(i))
                    .cloned()
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn link_count(&self) -> usize {
        self.links.read().count
    }

    /// Every entry, in id order.
    pub fn entries(&self) -> Vec<CityNamePrefix> {
        self.entries
            .read()
            .texts
            .iter()
            .enumerate()
            .map(|(i, text)| CityNamePrefix {
                id: PrefixId(i as u32 + 1),
                prefix: text.clone(),
            })
            .collect()
    }

    /// Every link as `(city, prefix)`.
    pub fn links(&self) -> Vec<(CityId, PrefixId)> {
        let links = self.links.read();
        let mut out: Vec<_> = links
            .by_city
            .iter()
            .flat_map(|(&city, set)| set.iter().map(move |&p| (city, p)))
            .collect();
        out.sort_unstable();
        out
    }

    /// Rebuilds a dictionary from saved entries and links.
    pub fn from_parts(
        mut entries: Vec<CityNamePrefix>,
        links: Vec<(CityId, PrefixId)>,
    ) -> Result<Self> {
        entries.sort_by_key(|e| e.id);
        let dict = PrefixDictionary::new();
        {
            let mut e = dict.entries.write();
            for (i, entry) in entries.into_iter().enumerate() {
                if entry.id.get() as usize != i + 1 {
                    return Err(GeoError::InvalidData(format!(
                        "prefix ids are not contiguous at #{}",
                        entry.id
                    )));
                }
                if e.by_text.insert(entry.prefix.clone(), entry.id).is_some() {
                    return Err(GeoError::InvalidData(format!(
                        "prefix {:?} appears twice",
                        entry.prefix
                    )));
                }
                e.texts.push(entry.prefix);
            }
        }
        for (city, prefix) in links {
            if !dict.contains_id(prefix) {
                return Err(GeoError::InvalidData(format!(
                    "link to unknown prefix #{prefix}"
                )));
            }
            dict.associate(city, prefix);
        }
        Ok(dict)
    }
}
