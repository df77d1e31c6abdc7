use menu_order_api::reorder::{OrderUpdate, reorder};

fn ids(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

fn update(id: &str, order: i32) -> OrderUpdate {
    OrderUpdate {
        category_id: id.into(),
        order,
    }
}

#[test]
fn moving_first_to_last() {
    let updates = reorder(&ids(&["A", "B", "C"]), 0, 2).unwrap();
    assert_eq!(updates, vec![update("B", 0), update("C", 1), update("A", 2)]);
}

#[test]
fn orders_are_a_permutation_of_zero_to_n() {
    let list = ids(&["a", "b", "c", "d", "e"]);
    for from in 0..list.len() {
        for to in 0..list.len() {
            let Some(updates) = reorder(&list, from, to) else {
                assert_eq!(from, to);
                continue;
            };
            let mut orders: Vec<i32> = updates.iter().map(|u| u.order).collect();
            orders.sort_unstable();
            assert_eq!(orders, [0, 1, 2, 3, 4]);
            assert_eq!(updates[to].category_id, list[from]);
        }
    }
}

#[test]
fn same_position_or_outside_the_list_is_a_no_op() {
    let list = ids(&["A", "B", "C"]);
    assert!(reorder(&list, 1, 1).is_none());
    assert!(reorder(&list, 0, 3).is_none());
    assert!(reorder(&list, 7, 0).is_none());
}
