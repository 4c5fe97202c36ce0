//! Cell service over the REST transport
//!
//! Writes go through `Cubes('x')/tm1.Update` with element bindings, reads
//! through `ExecuteMDX`. Both need the cube's dimension order, which is
//! fetched per call.

use super::types::{CellSet, CellUpdate, CellValue};
use super::CellService;
use crate::core::transport::Transport;
use crate::utils::error::{Result, Tm1Error};
use crate::utils::escape_odata_key;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use tracing::{debug, warn};

const EXECUTE_MDX_PATH: &str = "ExecuteMDX?$expand=Axes($expand=Tuples($expand=Members($select=Name))),Cells($select=Ordinal,Value)";

/// [`CellService`] backed by any [`Transport`]
#[derive(Debug, Clone)]
pub struct RestCellService<T> {
    transport: T,
}

impl<T: Transport> RestCellService<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Dimension names of a cube, in cube order
    pub async fn dimension_names(&self, cube: &str) -> Result<Vec<String>> {
        let path = format!("Cubes('{}')/Dimensions?$select=Name", escape_odata_key(cube));
        let response = self.transport.get(&path).await?;

        let names: Vec<String> = response
            .values()
            .iter()
            .filter_map(|d| d.get("Name").and_then(Value::as_str))
            .map(str::to_string)
            .collect();

        if names.is_empty() {
            return Err(Tm1Error::parsing(format!(
                "Cube '{}' reported no dimensions",
                cube
            )));
        }
        Ok(names)
    }

    /// Value to send for `cell`
    ///
    /// Increments build on `written`, the values already resolved earlier in
    /// the same request, and only read the server for cells not seen yet.
    async fn resolve_value(
        &self,
        cube: &str,
        dimensions: &[String],
        cell: &CellUpdate,
        written: &HashMap<Vec<String>, CellValue>,
    ) -> Result<CellValue> {
        if !cell.increment {
            return Ok(cell.value.clone());
        }

        let delta = cell.value.as_f64().ok_or_else(|| {
            Tm1Error::invalid_request(format!(
                "Cannot increment cell {:?} in '{}' by a string value",
                cell.coordinates, cube
            ))
        })?;
        let current = match written.get(&cell.coordinates) {
            Some(value) => value.as_f64().unwrap_or(0.0),
            None => {
                let mdx = cell_mdx(cube, dimensions, &cell.coordinates);
                self.execute_mdx(&mdx)
                    .await?
                    .first_value()
                    .and_then(CellValue::as_f64)
                    .unwrap_or(0.0)
            }
        };

        Ok(CellValue::Number(current + delta))
    }
}

#[async_trait]
impl<T: Transport> CellService for RestCellService<T> {
    async fn write_values(&self, target: &str, cells: &[CellUpdate]) -> Result<()> {
        if cells.is_empty() {
            return Ok(());
        }

        let dimensions = self.dimension_names(target).await?;
        let mut updates = Vec::with_capacity(cells.len());
        let mut written: HashMap<Vec<String>, CellValue> = HashMap::new();
        for cell in cells {
            check_arity(target, &dimensions, &cell.coordinates)?;
            let value = self
                .resolve_value(target, &dimensions, cell, &written)
                .await?;
            updates.push(json!({
                "Cells": [{ "Tuple@odata.bind": tuple_bindings(&dimensions, &cell.coordinates) }],
                "Value": value.to_json(),
            }));
            written.insert(cell.coordinates.clone(), value);
        }

        debug!(cube = target, cells = cells.len(), "Writing cells");
        let path = format!("Cubes('{}')/tm1.Update", escape_odata_key(target));
        self.transport.post(&path, Value::Array(updates)).await?;
        Ok(())
    }

    async fn get_value(&self, target: &str, coordinates: &[String]) -> Result<Option<CellValue>> {
        let dimensions = self.dimension_names(target).await?;
        check_arity(target, &dimensions, coordinates)?;

        let cellset = self
            .execute_mdx(&cell_mdx(target, &dimensions, coordinates))
            .await?;
        Ok(cellset.first_value().cloned())
    }

    async fn execute_mdx(&self, mdx: &str) -> Result<CellSet> {
        let response = self
            .transport
            .post(EXECUTE_MDX_PATH, json!({ "MDX": mdx }))
            .await?;
        let cellset = CellSet::from_json(&response.body);

        if let Some(id) = &cellset.id {
            let path = format!("Cellsets('{}')", escape_odata_key(id));
            if let Err(e) = self.transport.delete(&path).await {
                warn!(cellset = %id, "Failed to delete cellset: {}", e);
            }
        }

        Ok(cellset)
    }
}

fn check_arity(cube: &str, dimensions: &[String], coordinates: &[String]) -> Result<()> {
    if dimensions.len() != coordinates.len() {
        return Err(Tm1Error::invalid_request(format!(
            "Cube '{}' has {} dimensions but {} coordinates were given",
            cube,
            dimensions.len(),
            coordinates.len()
        )));
    }
    Ok(())
}

/// `Tuple@odata.bind` entries addressing one cell
fn tuple_bindings(dimensions: &[String], coordinates: &[String]) -> Vec<String> {
    dimensions
        .iter()
        .zip(coordinates)
        .map(|(dimension, element)| {
            let dimension = escape_odata_key(dimension);
            format!(
                "Dimensions('{}')/Hierarchies('{}')/Elements('{}')",
                dimension,
                dimension,
                escape_odata_key(element)
            )
        })
        .collect()
}

fn mdx_name(name: &str) -> String {
    format!("[{}]", name.replace(']', "]]"))
}

/// MDX selecting exactly one cell
fn cell_mdx(cube: &str, dimensions: &[String], coordinates: &[String]) -> String {
    let members: Vec<String> = dimensions
        .iter()
        .zip(coordinates)
        .map(|(dimension, element)| {
            let dimension = mdx_name(dimension);
            format!("{}.{}.{}", dimension, dimension, mdx_name(element))
        })
        .collect();
    format!(
        "SELECT {{({})}} ON 0 FROM {}",
        members.join(", "),
        mdx_name(cube)
    )
}
