// crates/cities-light-core/src/store/table.rs
use crate::error::{GeoError, Result};
use crate::unique::{CompositeKey, Keyed, UniqueIndex};
use std::collections::BTreeMap;

/// Rows of one entity type, keyed by id, with every declared unique index.
#[derive(Debug)]
pub struct Table<T> {
    rows: BTreeMap<u32, T>,
    next_id: u32,
    index: UniqueIndex,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Table {
            rows: BTreeMap::new(),
            next_id: 0,
            index: UniqueIndex::default(),
        }
    }
}

impl<T: Keyed> Table<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a table (and its indexes) from previously committed rows.
    pub fn from_rows(rows: Vec<T>) -> Result<Self> {
        let mut table = Table::new();
        for row in rows {
            let id = row.row_id().ok_or_else(|| {
                GeoError::InvalidData(format!("{} row without id", T::KIND))
            })?;
            if table.rows.contains_key(&id) {
                return Err(GeoError::InvalidData(format!(
                    "{} id {id} appears twice",
                    T::KIND
                )));
            }
            let keys = table.index.check(&row)?;
            table.index.insert(id, keys);
            table.rows.insert(id, row);
            table.next_id = table.next_id.max(id);
        }
        Ok(table)
    }

    /// Inserts (no id) or replaces (id set) `record`.
    ///
    /// All constraints are checked before anything changes, so a rejected
    /// write leaves rows and indexes as they were.
    pub fn commit(&mut self, mut record: T) -> Result<u32> {
        let keys = self.index.check(&record)?;

        let id = match record.row_id() {
            Some(id) => {
                let previous = self.rows.get(&id).ok_or_else(|| {
                    GeoError::NotFound(format!("{} #{id}", T::KIND))
                })?;
                self.index.remove(id, previous);
                id
            }
            None => {
                self.next_id = self
                    .next_id
                    .checked_add(1)
                    .ok_or_else(|| GeoError::InvalidData(format!("{} ids exhausted", T::KIND)))?;
                self.next_id
            }
        };

        record.set_row_id(id);
        self.index.insert(id, keys);
        self.rows.insert(id, record);
        Ok(id)
    }

    pub fn get(&self, id: u32) -> Option<&T> {
        self.rows.get(&id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.rows.contains_key(&id)
    }

    /// Row currently holding `key` under the named constraint.
    pub fn find(&self, constraint: &str, key: &CompositeKey) -> Option<&T> {
        self.index
            .find(constraint, key)
            .and_then(|id| self.rows.get(&id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Continent, Country, CountryId};
    use crate::unique::{KeyPart, COUNTRY_CODE2, COUNTRY_NAME};

    #[test]
    fn insert_assigns_sequential_ids() {
        let mut t = Table::new();
        let a = t.commit(Country::new("France", Continent::Europe)).unwrap();
        let b = t.commit(Country::new("Spain", Continent::Europe)).unwrap();
        assert_eq!((a, b), (1, 2));
        assert_eq!(t.get(a).unwrap().id, Some(CountryId(1)));
    }

    #[test]
    fn rejected_update_keeps_previous_row() {
        let mut t = Table::new();
        t.commit(Country::new("France", Continent::Europe).with_codes("FR", "FRA"))
            .unwrap();
        let spain = t
            .commit(Country::new("Spain", Continent::Europe).with_codes("ES", "ESP"))
            .unwrap();

        let mut clash = t.get(spain).unwrap().clone();
        clash.code2 = Some("FR".into());
        let err = t.commit(clash).unwrap_err();
        assert_eq!(err.constraint(), Some(COUNTRY_CODE2));

        let stored = t.get(spain).unwrap();
        assert_eq!(stored.code2.as_deref(), Some("ES"));
        let key = vec![KeyPart::Text("ES".into())];
        assert_eq!(t.find(COUNTRY_CODE2, &key).map(|c| c.name.as_str()), Some("Spain"));
    }

    #[test]
    fn update_moves_keys() {
        let mut t = Table::new();
        let id = t.commit(Country::new("Zaire", Continent::Africa)).unwrap();
        let mut renamed = t.get(id).unwrap().clone();
        renamed.name = "DR Congo".into();
        t.commit(renamed).unwrap();

        assert!(t.find(COUNTRY_NAME, &vec![KeyPart::Text("Zaire".into())]).is_none());
        assert!(t.find(COUNTRY_NAME, &vec![KeyPart::Text("DR Congo".into())]).is_some());
        // the old name is free again
        assert!(t.commit(Country::new("Zaire", Continent::Africa)).is_ok());
    }

    #[test]
    fn update_of_unknown_id_is_not_found() {
        let mut t: Table<Country> = Table::new();
        let mut c = Country::new("Ghost", Continent::Europe);
        c.id = Some(CountryId(42));
        assert!(matches!(t.commit(c), Err(GeoError::NotFound(_))));
        assert!(t.is_empty());
    }

    #[test]
    fn from_rows_rejects_duplicates() {
        let mut a = Country::new("France", Continent::Europe);
        a.id = Some(CountryId(1));
        let mut b = Country::new("France", Continent::Europe);
        b.id = Some(CountryId(2));
        assert!(Table::from_rows(vec![a.clone()]).is_ok());
        assert!(Table::from_rows(vec![a, b]).is_err());
    }
}
