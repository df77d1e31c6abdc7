use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct OrderUpdate {
    pub category_id: String,
    pub order: i32,
}

/// Move the entry at `from` to `to` and number the whole sequence from 0.
///
/// `None` means nothing to write: same position, or an index outside the list
/// (a drop that landed on no target).
pub fn reorder(ordered_ids: &[String], from: usize, to: usize) -> Option<Vec<OrderUpdate>> {
    if from == to || from >= ordered_ids.len() || to >= ordered_ids.len() {
        return None;
    }

    let mut ids: Vec<&String> = ordered_ids.iter().collect();
    let moved = ids.remove(from);
    ids.insert(to, moved);

    ids.into_iter()
        .enumerate()
        .map(|(idx, id)| {
            i32::try_from(idx).ok().map(|order| OrderUpdate {
                category_id: id.clone(),
                order,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn moving_up_shifts_the_rest_down() {
        let updates = reorder(&ids(&["a", "b", "c", "d"]), 3, 1).unwrap();
        let order: Vec<&str> = updates.iter().map(|u| u.category_id.as_str()).collect();
        assert_eq!(order, ["a", "d", "b", "c"]);
        assert!(updates.iter().enumerate().all(|(i, u)| u.order == i as i32));
    }

    #[test]
    fn empty_list_is_a_no_op() {
        assert_eq!(reorder(&[], 0, 0), None);
        assert_eq!(reorder(&[], 0, 1), None);
    }
}
