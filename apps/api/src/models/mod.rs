pub mod job;
pub mod profile;
pub mod roadmap;
pub mod role;

/// Query-string values arrive as `Some("")` when a parameter is present but
/// blank (`?mobility=`). Those are treated as if the parameter were absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
