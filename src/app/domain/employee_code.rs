use time::OffsetDateTime;

use super::CompanyId;

/// Generate a human-readable employee code: company id, first letter of the
/// name uppercased, then a second-resolution timestamp. Not globally unique
/// on its own; the `employee_code` unique constraint is the real guarantee,
/// and a collision surfaces as a duplicate-value conflict.
pub fn generate(company_id: CompanyId, full_name: &str, now: OffsetDateTime) -> String {
    let initial = full_name
        .trim()
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_else(|| "X".to_string());

    format!(
        "{}{}{:04}{:02}{:02}{:02}{:02}{:02}",
        company_id.as_i64(),
        initial,
        now.year(),
        u8::from(now.month()),
        now.day(),
        now.hour(),
        now.minute(),
        now.second()
    )
}
