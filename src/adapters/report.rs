//! Listing output for the CLI: aligned text tables, CSV and JSON.

use crate::domain::model::{Order, Rider, Warehouse, Zone};
use crate::utils::error::{AdminError, Result};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(format!("unsupported format '{}', use table, csv or json", other)),
        }
    }
}

/// 1-based page of `items`; an empty slice when the page is past the end.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> Result<&[T]> {
    if page == 0 || per_page == 0 {
        return Err(AdminError::validation("page", "page and page size start at 1"));
    }
    let start = (page - 1).saturating_mul(per_page).min(items.len());
    let end = start.saturating_add(per_page).min(items.len());
    Ok(&items[start..end])
}

pub fn page_count(total: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(per_page)
}

pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Table => Ok(self.render_text()),
            OutputFormat::Csv => self.render_csv(),
            OutputFormat::Json => {
                let records: Vec<serde_json::Map<String, serde_json::Value>> = self
                    .rows
                    .iter()
                    .map(|row| {
                        self.headers
                            .iter()
                            .cloned()
                            .zip(row.iter().map(|v| serde_json::Value::String(v.clone())))
                            .collect()
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&records)?)
            }
        }
    }

    fn render_text(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }

        let line = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(c, w)| format!("{:<width$}", c, width = w))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut out = vec![line(self.headers.as_slice())];
        out.push(
            widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("  "),
        );
        out.extend(self.rows.iter().map(|r| line(r.as_slice())));
        out.join("\n")
    }

    fn render_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| AdminError::IoError(e.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

pub fn orders_table(orders: &[&Order]) -> Table {
    let mut table = Table::new(&[
        "id", "type", "status", "zone", "rider", "customer", "phone", "created_at",
    ]);
    for o in orders {
        table.push(vec![
            o.id.clone(),
            o.order_type.label().to_string(),
            o.status.label().to_string(),
            o.zone_id.clone().unwrap_or_else(|| "-".to_string()),
            o.rider_id.clone().unwrap_or_else(|| "-".to_string()),
            o.customer_name.clone(),
            o.customer_phone.clone(),
            o.created_at.to_rfc3339(),
        ]);
    }
    table
}

pub fn zones_table(zones: &[Zone]) -> Table {
    let mut table = Table::new(&["id", "name", "warehouses", "vertices"]);
    for z in zones {
        table.push(vec![
            z.id.clone(),
            z.name.clone(),
            z.warehouse_ids.join(","),
            z.polygon.outer_ring().len().saturating_sub(1).to_string(),
        ]);
    }
    table
}

pub fn riders_table(riders: &[&Rider]) -> Table {
    let mut table = Table::new(&["id", "name", "phone", "active", "warehouse"]);
    for r in riders {
        table.push(vec![
            r.id.clone(),
            r.full_name.clone(),
            r.phone.clone(),
            r.is_active.to_string(),
            r.warehouse_id.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table
}

pub fn warehouses_table(warehouses: &[Warehouse]) -> Table {
    let mut table = Table::new(&["id", "name", "address", "lat", "lng"]);
    for w in warehouses {
        table.push(vec![
            w.id.clone(),
            w.name.clone(),
            w.short_national_address.clone(),
            format!("{:.4}", w.lat),
            format!("{:.4}", w.lng),
        ]);
    }
    table
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
