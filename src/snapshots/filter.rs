use crate::models::PositionSnapshot;

/// Keep snapshots whose owner is on the allow-list (ASCII case-insensitive).
/// An empty allow-list keeps everything.
pub fn filter_by_owners(
    snapshots: Vec<PositionSnapshot>,
    allow_list: &[String],
) -> Vec<PositionSnapshot> {
    if allow_list.is_empty() {
        return snapshots;
    }
    snapshots
        .into_iter()
        .filter(|s| allow_list.iter().any(|a| a.eq_ignore_ascii_case(&s.owner)))
        .collect()
}
