// src/export/logic.rs

use crate::db::appointments::{list_with_client_in_range, services_for_appointment};
use crate::db::log::record;
use crate::db::pool::DbPool;
use crate::db::{clients, invoices, services};
use crate::errors::{AppError, AppResult};
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::{AppointmentExport, ClientExport, InvoiceExport, ServiceExport};
use crate::export::{ExportFormat, ExportTarget};
use crate::ui::messages::warning;
use crate::utils::date::{parse_range, range_bounds};
use serde::Serialize;
use std::path::Path;

pub struct ExportLogic;

impl ExportLogic {
    /// Export one table to `file`.
    ///
    /// `range` (`YYYY`, `YYYY-MM`, `YYYY-MM-DD` or `a:b`, `all` = no filter)
    /// applies to appointments (by start) and invoices (by creation);
    /// clients and services are always exported whole.
    ///
    /// Returns the number of rows written.
    pub fn export(
        pool: &DbPool,
        target: ExportTarget,
        format: ExportFormat,
        file: &str,
        range: Option<&str>,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);
        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "Output file path must be absolute: {file}"
            )));
        }

        ensure_writable(path, force)?;

        let bounds = match range {
            None => None,
            Some(r) if r.eq_ignore_ascii_case("all") => None,
            Some(r) => {
                let (from, to) = parse_range(r)?;
                Some(range_bounds(from, to)?)
            }
        };

        let written = match target {
            ExportTarget::Clients => {
                let rows: Vec<ClientExport> = clients::list_clients(&pool.conn)?
                    .iter()
                    .map(ClientExport::from)
                    .collect();
                write_rows(&rows, format, path)?
            }
            ExportTarget::Services => {
                let rows: Vec<ServiceExport> = services::list_all(&pool.conn)?
                    .iter()
                    .map(ServiceExport::from)
                    .collect();
                write_rows(&rows, format, path)?
            }
            ExportTarget::Appointments => {
                let (start, end) = bounds.unwrap_or((i64::MIN, i64::MAX));
                let mut rows = Vec::new();
                for entry in list_with_client_in_range(&pool.conn, start, end)? {
                    let names: Vec<String> = services_for_appointment(&pool.conn, entry.appointment.id)?
                        .into_iter()
                        .map(|s| s.name)
                        .collect();
                    rows.push(AppointmentExport::new(&entry, &names));
                }
                write_rows(&rows, format, path)?
            }
            ExportTarget::Invoices => {
                let list = match bounds {
                    Some((start, end)) => invoices::list_by_range(&pool.conn, start, end)?,
                    None => invoices::list_all(&pool.conn)?,
                };
                let rows: Vec<InvoiceExport> = list.iter().map(InvoiceExport::from).collect();
                write_rows(&rows, format, path)?
            }
        };

        if written > 0 {
            record(
                &pool.conn,
                "export",
                target.as_str(),
                &format!("{} row(s) to {} ({})", written, path.display(), format.as_str()),
            );
        }
        Ok(written)
    }
}

fn write_rows<T: Serialize>(rows: &[T], format: ExportFormat, path: &Path) -> AppResult<usize> {
    if rows.is_empty() {
        warning("No rows found for the selected range. Nothing to export.");
        return Ok(0);
    }

    match format {
        ExportFormat::Csv => export_csv(rows, path)?,
        ExportFormat::Json => export_json(rows, path)?,
    }
    Ok(rows.len())
}
