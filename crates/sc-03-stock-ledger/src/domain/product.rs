//! # Product Catalog
//!
//! Dispatches and sales name a product; only active products may be moved.
//! Product codes are unique across the catalog, including deactivated rows.

use super::errors::{LedgerError, LedgerResult};
use serde::{Deserialize, Serialize};
use shared_types::{ProductId, Timestamp, UserId, ValidationError};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    #[default]
    SteelRod,
    TmtBar,
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SteelRod => "steel_rod",
            Self::TmtBar => "tmt_bar",
        })
    }
}

impl FromStr for ProductCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "steel_rod" => Ok(Self::SteelRod),
            "tmt_bar" => Ok(Self::TmtBar),
            other => Err(ValidationError::Invalid {
                field: "category",
                reason: format!("unknown category {other:?}"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductUnit {
    #[default]
    Kg,
    Ton,
    Piece,
    Meter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub product_code: String,
    pub product_name: String,
    pub category: ProductCategory,
    pub thickness_inch: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_per_unit: Option<f64>,
    pub unit: ProductUnit,
    pub price_per_unit: f64,
    pub is_active: bool,
    pub created_by: UserId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Create request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub product_code: String,
    pub product_name: String,
    #[serde(default)]
    pub category: ProductCategory,
    pub thickness_inch: f64,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub weight_per_unit: Option<f64>,
    #[serde(default)]
    pub unit: ProductUnit,
    pub price_per_unit: f64,
}

impl NewProduct {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.product_code.trim().is_empty() {
            return Err(ValidationError::MissingField("productCode"));
        }
        if self.product_name.trim().is_empty() {
            return Err(ValidationError::MissingField("productName"));
        }
        non_negative("thicknessInch", self.thickness_inch)?;
        non_negative("pricePerUnit", self.price_per_unit)?;
        if let Some(length) = self.length {
            non_negative("length", length)?;
        }
        if let Some(weight) = self.weight_per_unit {
            non_negative("weightPerUnit", weight)?;
        }
        Ok(())
    }
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductUpdate {
    pub product_name: Option<String>,
    pub category: Option<ProductCategory>,
    pub thickness_inch: Option<f64>,
    pub grade: Option<String>,
    pub length: Option<f64>,
    pub weight_per_unit: Option<f64>,
    pub unit: Option<ProductUnit>,
    pub price_per_unit: Option<f64>,
    pub is_active: Option<bool>,
}

/// List filter. The default lists active products of every category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductFilter {
    pub category: Option<ProductCategory>,
    pub include_inactive: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub created: Vec<Product>,
    pub skipped: Vec<String>,
}

impl SeedReport {
    pub fn message(&self) -> String {
        format!("{} sample products created", self.created.len())
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::Invalid {
            field,
            reason: format!("{value} is not a non-negative number"),
        })
    }
}

#[derive(Debug, Default)]
pub struct ProductCatalog {
    products: HashMap<ProductId, Product>,
    by_code: HashMap<String, ProductId>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, req: NewProduct, admin: UserId, now: Timestamp) -> LedgerResult<Product> {
        req.validate()?;
        let code = req.product_code.trim().to_string();
        if self.by_code.contains_key(&code) {
            return Err(LedgerError::DuplicateProductCode(code));
        }
        let product = Product {
            id: ProductId::new(),
            product_code: code.clone(),
            product_name: req.product_name.trim().to_string(),
            category: req.category,
            thickness_inch: req.thickness_inch,
            grade: req.grade.map(|g| g.trim().to_string()).filter(|g| !g.is_empty()),
            length: req.length,
            weight_per_unit: req.weight_per_unit,
            unit: req.unit,
            price_per_unit: req.price_per_unit,
            is_active: true,
            created_by: admin,
            created_at: now,
            updated_at: now,
        };
        self.by_code.insert(code, product.id);
        self.products.insert(product.id, product.clone());
        Ok(product)
    }

    pub fn get(&self, id: ProductId) -> LedgerResult<&Product> {
        self.products.get(&id).ok_or(LedgerError::ProductNotFound(id))
    }

    /// Looks up a product that stock may currently move against.
    pub fn active(&self, id: ProductId) -> LedgerResult<&Product> {
        let product = self.get(id)?;
        if !product.is_active {
            return Err(LedgerError::ProductInactive(id));
        }
        Ok(product)
    }

    /// Sorted by product name.
    pub fn list(&self, filter: ProductFilter) -> Vec<Product> {
        let mut out: Vec<Product> = self
            .products
            .values()
            .filter(|p| filter.include_inactive || p.is_active)
            .filter(|p| filter.category.map_or(true, |c| p.category == c))
            .cloned()
            .collect();
        out.sort_by(|a, b| a.product_name.cmp(&b.product_name));
        out
    }

    pub fn update(&mut self, id: ProductId, patch: ProductUpdate, now: Timestamp) -> LedgerResult<Product> {
        for (field, value) in [
            ("thicknessInch", patch.thickness_inch),
            ("pricePerUnit", patch.price_per_unit),
            ("length", patch.length),
            ("weightPerUnit", patch.weight_per_unit),
        ] {
            if let Some(v) = value {
                non_negative(field, v)?;
            }
        }
        if patch.product_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(ValidationError::MissingField("productName").into());
        }

        let product = self
            .products
            .get_mut(&id)
            .ok_or(LedgerError::ProductNotFound(id))?;
        if let Some(name) = patch.product_name {
            product.product_name = name.trim().to_string();
        }
        if let Some(category) = patch.category {
            product.category = category;
        }
        if let Some(t) = patch.thickness_inch {
            product.thickness_inch = t;
        }
        if let Some(grade) = patch.grade {
            product.grade = Some(grade.trim().to_string()).filter(|g| !g.is_empty());
        }
        if patch.length.is_some() {
            product.length = patch.length;
        }
        if patch.weight_per_unit.is_some() {
            product.weight_per_unit = patch.weight_per_unit;
        }
        if let Some(unit) = patch.unit {
            product.unit = unit;
        }
        if let Some(price) = patch.price_per_unit {
            product.price_per_unit = price;
        }
        if let Some(active) = patch.is_active {
            product.is_active = active;
        }
        product.updated_at = now;
        Ok(product.clone())
    }

    /// Soft delete. Historical dispatches and sales keep their reference.
    pub fn deactivate(&mut self, id: ProductId, now: Timestamp) -> LedgerResult<Product> {
        self.update(
            id,
            ProductUpdate {
                is_active: Some(false),
                ..ProductUpdate::default()
            },
            now,
        )
    }

    /// Inserts the standard rod and TMT bar range, skipping codes already present.
    pub fn seed_samples(&mut self, admin: UserId, now: Timestamp) -> LedgerResult<SeedReport> {
        let mut report = SeedReport::default();
        for sample in sample_products() {
            if self.by_code.contains_key(&sample.product_code) {
                report.skipped.push(sample.product_code);
                continue;
            }
            report.created.push(self.create(sample, admin, now)?);
        }
        Ok(report)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// The ten catalog entries every fresh deployment starts with.
pub fn sample_products() -> Vec<NewProduct> {
    const ROWS: [(&str, &str, ProductCategory, f64, &str, f64, f64); 10] = [
        ("STL-001", "Steel Rod 6mm", ProductCategory::SteelRod, 0.236, "Fe 415", 2.2, 65.0),
        ("STL-002", "Steel Rod 8mm", ProductCategory::SteelRod, 0.315, "Fe 415", 3.9, 115.0),
        ("STL-003", "Steel Rod 10mm", ProductCategory::SteelRod, 0.394, "Fe 415", 6.1, 180.0),
        ("STL-004", "Steel Rod 12mm", ProductCategory::SteelRod, 0.472, "Fe 415", 8.9, 262.0),
        ("STL-005", "Steel Rod 16mm", ProductCategory::SteelRod, 0.63, "Fe 415", 15.8, 465.0),
        ("STL-006", "TMT Bar 8mm", ProductCategory::TmtBar, 0.315, "Fe 500", 3.9, 125.0),
        ("STL-007", "TMT Bar 10mm", ProductCategory::TmtBar, 0.394, "Fe 500", 6.1, 195.0),
        ("STL-008", "TMT Bar 12mm", ProductCategory::TmtBar, 0.472, "Fe 500", 8.9, 285.0),
        ("STL-009", "TMT Bar 16mm", ProductCategory::TmtBar, 0.63, "Fe 500", 15.8, 495.0),
        ("STL-010", "TMT Bar 20mm", ProductCategory::TmtBar, 0.787, "Fe 500", 24.7, 770.0),
    ];
    ROWS.iter()
        .map(|&(code, name, category, thickness, grade, weight, price)| NewProduct {
            product_code: code.to_string(),
            product_name: name.to_string(),
            category,
            thickness_inch: thickness,
            grade: Some(grade.to_string()),
            length: Some(12.0),
            weight_per_unit: Some(weight),
            unit: ProductUnit::Kg,
            price_per_unit: price,
        })
        .collect()
}
