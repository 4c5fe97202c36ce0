//! Cell read/write access
//!
//! [`CellService`] is the unit of work the bulk engine drives: write a set of
//! cells into one cube, read one cell, or run an MDX query.

mod rest;
mod types;

pub use rest::RestCellService;
pub use types::{Axis, Cell, CellQuery, CellSet, CellUpdate, CellValue};

use crate::utils::error::Result;
use async_trait::async_trait;

/// Cell writer and reader for a TM1 server
#[async_trait]
pub trait CellService: Send + Sync {
    /// Write all `cells` into `target` as one request
    async fn write_values(&self, target: &str, cells: &[CellUpdate]) -> Result<()>;

    /// Read one cell; `None` when the cell holds no value
    async fn get_value(&self, target: &str, coordinates: &[String]) -> Result<Option<CellValue>>;

    /// Run an MDX query
    async fn execute_mdx(&self, mdx: &str) -> Result<CellSet>;
}

#[async_trait]
impl<C: CellService + ?Sized> CellService for std::sync::Arc<C> {
    async fn write_values(&self, target: &str, cells: &[CellUpdate]) -> Result<()> {
        (**self).write_values(target, cells).await
    }

    async fn get_value(&self, target: &str, coordinates: &[String]) -> Result<Option<CellValue>> {
        (**self).get_value(target, coordinates).await
    }

    async fn execute_mdx(&self, mdx: &str) -> Result<CellSet> {
        (**self).execute_mdx(mdx).await
    }
}
