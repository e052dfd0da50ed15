//! Training-time category tables for the categorical features.
//!
//! The model was trained on integer codes assigned to each category of the
//! four categorical columns. Those codes are fixed: a category always maps to
//! the same code, regardless of what else is in the request. The tables are
//! loaded from TOML where each column is an ordered list and a category's
//! code is its index in that list.

use crate::error::{RatingError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

const BUILTIN_ENCODINGS: &str = include_str!("../config/encodings.toml");

/// Categorical input columns, in the order they appear in the feature vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoricalColumn {
    Location,
    Type,
    Cuisine,
    Service,
}

impl CategoricalColumn {
    pub const ALL: [CategoricalColumn; 4] = [
        CategoricalColumn::Location,
        CategoricalColumn::Type,
        CategoricalColumn::Cuisine,
        CategoricalColumn::Service,
    ];

    /// Request field name for this column
    pub fn field(&self) -> &'static str {
        match self {
            CategoricalColumn::Location => "restaurant_location",
            CategoricalColumn::Type => "restaurant_type",
            CategoricalColumn::Cuisine => "cuisine_types",
            CategoricalColumn::Service => "restaurant_service",
        }
    }
}

#[derive(Debug, Deserialize)]
struct EncodingFile {
    restaurant_location: Vec<String>,
    restaurant_type: Vec<String>,
    cuisine_types: Vec<String>,
    restaurant_service: Vec<String>,
}

#[derive(Debug, Clone)]
struct ColumnEncoding {
    categories: Vec<String>,
    codes: HashMap<String, usize>,
}

impl ColumnEncoding {
    fn build(column: CategoricalColumn, categories: Vec<String>) -> Result<Self> {
        if categories.is_empty() {
            return Err(RatingError::model_load(
                "encodings",
                format!("no categories listed for {}", column.field()),
            ));
        }

        let mut codes = HashMap::with_capacity(categories.len());
        for (code, category) in categories.iter().enumerate() {
            if category.trim().is_empty() {
                return Err(RatingError::model_load(
                    "encodings",
                    format!("empty category at position {} of {}", code, column.field()),
                ));
            }
            if codes.insert(category.clone(), code).is_some() {
                return Err(RatingError::model_load(
                    "encodings",
                    format!("duplicate category {:?} in {}", category, column.field()),
                ));
            }
        }

        Ok(Self { categories, codes })
    }
}

/// Fixed category → code mapping for every categorical column
#[derive(Debug, Clone)]
pub struct EncodingTable {
    columns: HashMap<CategoricalColumn, ColumnEncoding>,
}

impl EncodingTable {
    /// Table compiled into the binary (same contents as `config/encodings.toml`)
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_ENCODINGS, "builtin")
    }

    /// Load the table from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| RatingError::model_load(path.display().to_string(), e.to_string()))?;

        let table = Self::from_toml_str(&contents, &path.display().to_string())?;
        info!(
            path = %path.display(),
            categories = table.category_count(),
            "Encoding table loaded"
        );
        Ok(table)
    }

    fn from_toml_str(contents: &str, origin: &str) -> Result<Self> {
        let file: EncodingFile = toml::from_str(contents)
            .map_err(|e| RatingError::model_load(origin, e.to_string()))?;

        let mut columns = HashMap::new();
        let lists = [
            (CategoricalColumn::Location, file.restaurant_location),
            (CategoricalColumn::Type, file.restaurant_type),
            (CategoricalColumn::Cuisine, file.cuisine_types),
            (CategoricalColumn::Service, file.restaurant_service),
        ];
        for (column, categories) in lists {
            let encoding = ColumnEncoding::build(column, categories).map_err(|e| match e {
                RatingError::ModelLoad { message, .. } => RatingError::model_load(origin, message),
                other => other,
            })?;
            columns.insert(column, encoding);
        }

        Ok(Self { columns })
    }

    /// Code assigned to `value` at training time, if the category is known
    pub fn code(&self, column: CategoricalColumn, value: &str) -> Option<usize> {
        self.columns
            .get(&column)
            .and_then(|encoding| encoding.codes.get(value).copied())
    }

    /// Known categories for a column, in code order
    pub fn categories(&self, column: CategoricalColumn) -> &[String] {
        self.columns
            .get(&column)
            .map(|encoding| encoding.categories.as_slice())
            .unwrap_or(&[])
    }

    /// Total number of categories across all columns
    pub fn category_count(&self) -> usize {
        self.columns.values().map(|e| e.categories.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_sizes() {
        let table = EncodingTable::builtin().unwrap();
        assert_eq!(table.categories(CategoricalColumn::Location).len(), 93);
        assert_eq!(table.categories(CategoricalColumn::Type).len(), 65);
        assert_eq!(table.categories(CategoricalColumn::Cuisine).len(), 6);
        assert_eq!(table.categories(CategoricalColumn::Service).len(), 7);
        assert_eq!(table.category_count(), 171);
    }

    #[test]
    fn test_builtin_training_codes() {
        let table = EncodingTable::builtin().unwrap();
        assert_eq!(table.code(CategoricalColumn::Location, "BTM"), Some(0));
        assert_eq!(table.code(CategoricalColumn::Location, "Indiranagar"), Some(27));
        assert_eq!(table.code(CategoricalColumn::Type, "Cafe"), Some(11));
        assert_eq!(
            table.code(CategoricalColumn::Cuisine, "Chinese, Mughlai"),
            Some(1)
        );
        assert_eq!(table.code(CategoricalColumn::Service, "Dine-out"), Some(4));
        assert_eq!(table.code(CategoricalColumn::Service, "Pubs and bars"), Some(6));
    }

    #[test]
    fn test_unknown_category() {
        let table = EncodingTable::builtin().unwrap();
        assert_eq!(table.code(CategoricalColumn::Location, "Atlantis"), None);
        assert_eq!(table.code(CategoricalColumn::Service, "dine-out"), None);
    }

    #[test]
    fn test_codes_follow_list_order() {
        let toml = r#"
            restaurant_location = ["Zeta", "Alpha"]
            restaurant_type = ["Cafe"]
            cuisine_types = ["Thai"]
            restaurant_service = ["Buffet", "Delivery"]
        "#;
        let table = EncodingTable::from_toml_str(toml, "inline").unwrap();
        assert_eq!(table.code(CategoricalColumn::Location, "Zeta"), Some(0));
        assert_eq!(table.code(CategoricalColumn::Location, "Alpha"), Some(1));
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let toml = r#"
            restaurant_location = ["BTM", "BTM"]
            restaurant_type = ["Cafe"]
            cuisine_types = ["Thai"]
            restaurant_service = ["Buffet"]
        "#;
        let err = EncodingTable::from_toml_str(toml, "inline").unwrap_err();
        assert_eq!(err.kind(), "model_load");
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_empty_column_rejected() {
        let toml = r#"
            restaurant_location = ["BTM"]
            restaurant_type = []
            cuisine_types = ["Thai"]
            restaurant_service = ["Buffet"]
        "#;
        assert!(EncodingTable::from_toml_str(toml, "inline").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = EncodingTable::load("/nonexistent/encodings.toml").unwrap_err();
        assert_eq!(err.kind(), "model_load");
    }
}
