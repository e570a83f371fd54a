use crate::{
    error::{Error, Result},
    sql::types::Value,
    storage::{Catalog, Storage},
};

use super::{Executor, ResultSet};

/// Nested Loop Join executor - equality join on normalized key values
///
/// Keys match when they are equal after trimming, lowercasing and
/// removing diacritics ("José" joins "jose"). A matched pair merges into
/// one row and right-hand fields override left-hand fields of the same
/// name.
pub struct NestedLoopJoin<S: Storage> {
    left: Box<dyn Executor<S>>,
    right: Box<dyn Executor<S>>,
    left_key: String,
    right_key: String,
}

impl<S: Storage> NestedLoopJoin<S> {
    pub fn new(
        left: Box<dyn Executor<S>>,
        right: Box<dyn Executor<S>>,
        left_key: String,
        right_key: String,
    ) -> Box<Self> {
        Box::new(Self {
            left,
            right,
            left_key,
            right_key,
        })
    }
}

impl<S: Storage> Executor<S> for NestedLoopJoin<S> {
    fn execute(self: Box<Self>, catalog: &mut Catalog<S>) -> Result<ResultSet> {
        // Execute left side first
        let (lcols, lrows) = match self.left.execute(catalog)? {
            ResultSet::Scan { columns, rows } => (columns, rows),
            _ => return Err(Error::Internal("Unexpected result set".into())),
        };
        let (rcols, rrows) = match self.right.execute(catalog)? {
            ResultSet::Scan { columns, rows } => (columns, rows),
            _ => return Err(Error::Internal("Unexpected result set".into())),
        };

        // `ON o.customer = c.name` names the right table first
        let (left_key, right_key) = if lcols.contains(&self.left_key) {
            (self.left_key, self.right_key)
        } else if lcols.contains(&self.right_key) && rcols.contains(&self.left_key) {
            (self.right_key, self.left_key)
        } else {
            return Err(Error::NotFound(format!(
                "join column {} does not exist",
                self.left_key
            )));
        };
        if !rcols.contains(&right_key) {
            return Err(Error::NotFound(format!(
                "join column {} does not exist",
                right_key
            )));
        }

        let mut new_cols = lcols;
        for col in rcols {
            if !new_cols.contains(&col) {
                new_cols.push(col);
            }
        }

        let rkeys: Vec<String> = rrows
            .iter()
            .map(|row| row.get(&right_key).map_or_else(String::new, Value::normalized))
            .collect();

        // Nested loop: for each left row, iterate through all right rows
        let mut new_rows = Vec::new();
        for lrow in &lrows {
            let lkey = lrow.get(&left_key).map_or_else(String::new, Value::normalized);
            for (rrow, rkey) in rrows.iter().zip(&rkeys) {
                if lkey == *rkey {
                    let mut row = lrow.clone();
                    row.extend(rrow.clone());
                    new_rows.push(row);
                }
            }
        }

        Ok(ResultSet::Scan {
            columns: new_cols,
            rows: new_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::NestedLoopJoin;
    use crate::{
        error::Result,
        sql::{
            executor::{Executor, ResultSet, query::Scan},
            schema::Column,
            types::{ColumnType, DataType, Row, Value},
        },
        storage::{Catalog, MemoryStorage},
    };

    fn insert(catalog: &mut Catalog<MemoryStorage>, table: &str, rows: &[&[(&str, &str)]]) -> Result<()> {
        let mut data = catalog.load_table("shop", table)?;
        for pairs in rows {
            let row: Row = pairs
                .iter()
                .map(|(k, v)| (k.to_string(), Value::from(*v)))
                .collect();
            data.rows.push(row);
        }
        catalog.save_table("shop", table, &data)
    }

    fn setup() -> Result<Catalog<MemoryStorage>> {
        let mut catalog = Catalog::new(MemoryStorage::new());
        catalog.create_database("shop")?;
        let text = |name: &str| Column::new(name, ColumnType::new(DataType::Text));
        catalog.create_table("shop", "customers", vec![text("name"), text("city")])?;
        catalog.create_table("shop", "orders", vec![text("customer"), text("total"), text("city")])?;
        insert(
            &mut catalog,
            "customers",
            &[&[("name", "Ana"), ("city", "Lima")], &[("name", "José"), ("city", "Quito")]],
        )?;
        insert(
            &mut catalog,
            "orders",
            &[
                &[("customer", " ana "), ("total", "10"), ("city", "Cusco")],
                &[("customer", "jose"), ("total", "5"), ("city", "Quito")],
                &[("customer", "Luis"), ("total", "7"), ("city", "Lima")],
            ],
        )?;
        Ok(catalog)
    }

    fn join(left_key: &str, right_key: &str) -> Box<NestedLoopJoin<MemoryStorage>> {
        NestedLoopJoin::new(
            Scan::new("shop".into(), "customers".into()),
            Scan::new("shop".into(), "orders".into()),
            left_key.into(),
            right_key.into(),
        )
    }

    #[test]
    fn test_join_normalized_keys() -> Result<()> {
        let mut catalog = setup()?;
        match join("name", "customer").execute(&mut catalog)? {
            ResultSet::Scan { columns, rows } => {
                assert_eq!(columns, vec!["name", "city", "customer", "total"]);
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0].get("total"), Some(&Value::from("10")));
                // Right-hand value wins on collision
                assert_eq!(rows[0].get("city"), Some(&Value::from("Cusco")));
                assert_eq!(rows[1].get("name"), Some(&Value::from("José")));
            }
            other => panic!("unexpected result {:?}", other),
        }

        // Keys written in reverse order resolve the same way
        match join("customer", "name").execute(&mut catalog)? {
            ResultSet::Scan { rows, .. } => assert_eq!(rows.len(), 2),
            other => panic!("unexpected result {:?}", other),
        }
        assert!(join("nope", "customer").execute(&mut catalog).is_err());
        Ok(())
    }
}
