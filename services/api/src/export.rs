//! services/api/src/export.rs
//!
//! Renders the waitlist as an Excel workbook.

use launchpad_core::domain::NewsletterSignup;
use rust_xlsxwriter::{Workbook, XlsxError};

pub const WORKSHEET_NAME: &str = "Waitlist";
pub const EXPORT_FILE_NAME: &str = "waitlist.xlsx";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const HEADERS: [&str; 5] = ["id", "name", "email", "telegramUsername", "createdAt"];

/// Writes one header row followed by one row per signup.
pub fn waitlist_workbook(signups: &[NewsletterSignup]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(WORKSHEET_NAME)?;

    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }

    for (index, signup) in signups.iter().enumerate() {
        let row = index as u32 + 1;
        sheet.write_number(row, 0, f64::from(signup.id))?;
        sheet.write_string(row, 1, &signup.name)?;
        sheet.write_string(row, 2, &signup.email)?;
        sheet.write_string(row, 3, signup.telegram_username.as_deref().unwrap_or(""))?;
        sheet.write_string(row, 4, signup.created_at.to_rfc3339())?;
    }

    workbook.save_to_buffer()
}
