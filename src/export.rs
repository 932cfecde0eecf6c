//! Excel export functionality.

use std::path::{Path, PathBuf};

use chrono::Local;
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, Worksheet};
use tracing::info;

use crate::error::Result;
use crate::models::reference::option_name;
use crate::models::{DropdownOption, Employee, LeaveRequest};

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x4472C4))
        .set_font_color(Color::White)
        .set_border(FormatBorder::Thin)
}

/// Write the header row, widths, autofilter and frozen top row.
fn prepare_sheet(worksheet: &mut Worksheet, headers: &[(&str, f64)], rows: usize) -> Result<()> {
    let format = header_format();
    for (col, (header, width)) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &format)?;
        worksheet.set_column_width(col as u16, *width)?;
    }

    if rows > 0 {
        worksheet.autofilter(0, 0, rows as u32, (headers.len() - 1) as u16)?;
    }
    worksheet.set_freeze_panes(1, 0)?;
    Ok(())
}

/// Export the employee directory to Excel file.
pub fn export_employees_to_excel(employees: &[Employee], departments: &[DropdownOption], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Employees")?;

    prepare_sheet(
        worksheet,
        &[
            ("Employee Code", 15.0),
            ("Full Name", 30.0),
            ("Email", 30.0),
            ("Phone", 15.0),
            ("Department", 25.0),
            ("Joining Date", 12.0),
            ("Active", 8.0),
        ],
        employees.len(),
    )?;

    for (idx, emp) in employees.iter().enumerate() {
        let row = (idx + 1) as u32;

        worksheet.write_string(row, 0, &emp.employee_code)?;
        worksheet.write_string(row, 1, emp.full_name())?;
        worksheet.write_string(row, 2, &emp.email)?;
        worksheet.write_string(row, 3, emp.phone.as_deref().unwrap_or(""))?;

        let dept_name = match emp.department_id {
            Some(_) => option_name(departments, emp.department_id),
            None => "",
        };
        worksheet.write_string(row, 4, dept_name)?;

        match emp.joining_date {
            Some(date) => worksheet.write_string(row, 5, date.to_string())?,
            None => worksheet.write_string(row, 5, "")?,
        };
        worksheet.write_string(row, 6, if emp.is_active { "Yes" } else { "No" })?;
    }

    workbook.save(path)?;
    info!("Exported {} employees to {}", employees.len(), path.display());
    Ok(())
}

/// Export leave requests to Excel file, one row per request.
pub fn export_leave_requests_to_excel(requests: &[LeaveRequest], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Leave Requests")?;

    prepare_sheet(
        worksheet,
        &[
            ("Request ID", 10.0),
            ("Employee", 30.0),
            ("Leave Type", 20.0),
            ("Start Date", 12.0),
            ("End Date", 12.0),
            ("Days", 8.0),
            ("Reason", 40.0),
            ("Status", 10.0),
            ("Decision Note", 30.0),
            ("Submitted", 18.0),
        ],
        requests.len(),
    )?;

    let days_format = Format::new().set_num_format("0.0");

    for (idx, request) in requests.iter().enumerate() {
        let row = (idx + 1) as u32;

        worksheet.write_number(row, 0, request.id as f64)?;
        worksheet.write_string(row, 1, request.employee_name.as_deref().unwrap_or(""))?;
        worksheet.write_string(row, 2, request.leave_type_label())?;
        worksheet.write_string(row, 3, request.start_date.to_string())?;
        worksheet.write_string(row, 4, request.end_date.to_string())?;
        worksheet.write_number_with_format(row, 5, request.day_count(), &days_format)?;
        worksheet.write_string(row, 6, &request.reason)?;
        worksheet.write_string(row, 7, request.status.label())?;
        worksheet.write_string(row, 8, request.approval_reason.as_deref().unwrap_or(""))?;

        // Convert UTC to local time for display
        let submitted = request.created_at.with_timezone(&Local);
        worksheet.write_string(row, 9, submitted.format("%Y-%m-%d %H:%M").to_string())?;
    }

    workbook.save(path)?;
    info!("Exported {} leave requests to {}", requests.len(), path.display());
    Ok(())
}

/// Open save file dialog and return selected path.
pub fn show_save_dialog(default_name: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_file_name(default_name)
        .add_filter("Excel Files", &["xlsx"])
        .save_file()
}

/// Generate default filename for export.
pub fn generate_export_filename(prefix: &str) -> String {
    let now = Local::now();
    format!("{prefix}_{ts}.xlsx", ts = now.format("%Y%m%d_%H%M%S"))
}
