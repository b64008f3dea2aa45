use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RaggedColumns;

/// One of the five free-text inputs of the rating form, in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingField {
    Name,
    Beer,
    Wine,
    Whiskey,
    Username,
}

impl RatingField {
    pub const ALL: [RatingField; 5] = [
        RatingField::Name,
        RatingField::Beer,
        RatingField::Wine,
        RatingField::Whiskey,
        RatingField::Username,
    ];

    pub fn key(self) -> &'static str {
        match self {
            RatingField::Name => "name",
            RatingField::Beer => "beer",
            RatingField::Wine => "wine",
            RatingField::Whiskey => "whiskey",
            RatingField::Username => "username",
        }
    }
}

impl fmt::Display for RatingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Drink {
    Beer,
    Wine,
    Whiskey,
}

impl Drink {
    pub const ALL: [Drink; 3] = [Drink::Beer, Drink::Wine, Drink::Whiskey];

    pub fn label(self) -> &'static str {
        match self {
            Drink::Beer => "Beer",
            Drink::Wine => "Wine",
            Drink::Whiskey => "Whiskey",
        }
    }
}

/// Raw column-oriented layout shared by [`Batch`] and [`RatingTable`].
///
/// This is also the persisted layout: one array per key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingColumns {
    pub name: Vec<String>,
    pub beer: Vec<i64>,
    pub wine: Vec<i64>,
    pub whiskey: Vec<i64>,
    pub username: Vec<String>,
}

impl RatingColumns {
    pub fn lengths(&self) -> ColumnLengths {
        ColumnLengths {
            name: self.name.len(),
            beer: self.beer.len(),
            wine: self.wine.len(),
            whiskey: self.whiskey.len(),
            username: self.username.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLengths {
    pub name: usize,
    pub beer: usize,
    pub wine: usize,
    pub whiskey: usize,
    pub username: usize,
}

impl ColumnLengths {
    pub fn get(&self, field: RatingField) -> usize {
        match field {
            RatingField::Name => self.name,
            RatingField::Beer => self.beer,
            RatingField::Wine => self.wine,
            RatingField::Whiskey => self.whiskey,
            RatingField::Username => self.username,
        }
    }

    pub fn is_uniform(&self) -> bool {
        RatingField::ALL
            .iter()
            .all(|field| self.get(*field) == self.name)
    }
}

impl fmt::Display for ColumnLengths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for field in RatingField::ALL {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{field}={}", self.get(field))?;
        }
        Ok(())
    }
}

/// Equal-length columns parsed from one form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    columns: RatingColumns,
}

impl Batch {
    pub fn new(columns: RatingColumns) -> Result<Self, RaggedColumns> {
        let lengths = columns.lengths();
        if !lengths.is_uniform() {
            return Err(RaggedColumns(lengths));
        }
        Ok(Self { columns })
    }

    pub fn len(&self) -> usize {
        self.columns.name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn columns(&self) -> &RatingColumns {
        &self.columns
    }
}

/// The full record of drink ratings.
///
/// Columns are private so every mutation goes through [`RatingTable::append`],
/// which keeps the five columns index-aligned. Deserializing a snapshot whose
/// columns disagree in length fails instead of producing a ragged table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RatingColumns", into = "RatingColumns")]
pub struct RatingTable {
    columns: RatingColumns,
}

impl RatingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.columns.name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn columns(&self) -> &RatingColumns {
        &self.columns
    }

    /// Concatenates `batch` onto the end of every column, leaving existing
    /// entries untouched.
    pub fn append(&mut self, batch: Batch) {
        let RatingColumns {
            name,
            beer,
            wine,
            whiskey,
            username,
        } = batch.columns;
        self.columns.name.extend(name);
        self.columns.beer.extend(beer);
        self.columns.wine.extend(wine);
        self.columns.whiskey.extend(whiskey);
        self.columns.username.extend(username);
    }

    pub fn rows(&self) -> impl Iterator<Item = RatingEntry<'_>> + '_ {
        (0..self.len()).map(move |index| RatingEntry {
            index,
            name: &self.columns.name[index],
            beer: self.columns.beer[index],
            wine: self.columns.wine[index],
            whiskey: self.columns.whiskey[index],
            username: &self.columns.username[index],
        })
    }
}

impl TryFrom<RatingColumns> for RatingTable {
    type Error = RaggedColumns;

    fn try_from(columns: RatingColumns) -> Result<Self, Self::Error> {
        let lengths = columns.lengths();
        if !lengths.is_uniform() {
            return Err(RaggedColumns(lengths));
        }
        Ok(Self { columns })
    }
}

impl From<RatingTable> for RatingColumns {
    fn from(table: RatingTable) -> Self {
        table.columns
    }
}

/// Row view over one index of a [`RatingTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingEntry<'a> {
    pub index: usize,
    pub name: &'a str,
    pub beer: i64,
    pub wine: i64,
    pub whiskey: i64,
    pub username: &'a str,
}

impl RatingEntry<'_> {
    pub fn score(&self, drink: Drink) -> i64 {
        match drink {
            Drink::Beer => self.beer,
            Drink::Wine => self.wine,
            Drink::Whiskey => self.whiskey,
        }
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
