use proptest::prelude::*;
use strataview_layers::{intersect_available_values, DetachedItem, SettingType, SettingValue};

use crate::support::{self, local, text, ChoiceProvider, ScriptedQueryClient};

const KEY: SettingType = SettingType::SurfaceName;

#[tokio::test]
async fn test_shared_setting_intersects_layer_choices() {
    local(async {
        let client = ScriptedQueryClient::new();
        let manager = support::manager(&client);
        let group = manager
            .append_child(manager.root(), DetachedItem::group("Surfaces"))
            .unwrap();
        let shared = manager
            .append_child(group, DetachedItem::shared_setting(KEY))
            .unwrap();

        let layers: Vec<_> = [&["A", "B", "C"][..], &["B", "C", "D"][..], &["B", "C"][..]]
            .into_iter()
            .map(|choices| {
                manager
                    .append_child(group, manager.create_layer_with(ChoiceProvider::new(choices)))
                    .unwrap()
            })
            .collect();

        assert_eq!(manager.available_values(shared, KEY).unwrap(), text(&["B", "C"]));
        assert_eq!(manager.setting_value(shared, KEY).unwrap(), SettingValue::from("B"));
        for layer in layers {
            assert_eq!(manager.setting_value(layer, KEY).unwrap(), SettingValue::from("B"));
            assert!(manager.is_setting_overridden(layer, KEY).unwrap());
        }
    })
    .await;
}

#[tokio::test]
async fn test_nearest_shared_setting_wins() {
    local(async {
        let client = ScriptedQueryClient::new();
        let manager = support::manager(&client);
        let root = manager.root();
        let outer_shared = manager
            .append_child(root, DetachedItem::shared_setting(KEY))
            .unwrap();
        let group = manager.append_child(root, DetachedItem::group("g")).unwrap();
        let inner_shared = manager
            .append_child(group, DetachedItem::shared_setting(KEY))
            .unwrap();
        let layer = manager
            .append_child(group, manager.create_layer_with(ChoiceProvider::new(&["A", "B", "C"])))
            .unwrap();

        manager.set_setting_value(layer, KEY, "B").unwrap();
        manager.set_setting_value(inner_shared, KEY, "C").unwrap();
        assert_eq!(manager.setting_value(layer, KEY).unwrap(), SettingValue::from("C"));

        manager.detach(inner_shared).unwrap();
        assert_eq!(
            manager.setting_value(layer, KEY).unwrap(),
            manager.setting_value(outer_shared, KEY).unwrap()
        );
        assert!(manager.is_setting_overridden(layer, KEY).unwrap());
    })
    .await;
}

#[tokio::test]
async fn test_null_shared_value_keeps_local_value() {
    local(async {
        let client = ScriptedQueryClient::new();
        let manager = support::manager(&client);
        let root = manager.root();
        let shared = manager
            .append_child(root, DetachedItem::shared_setting(KEY))
            .unwrap();
        let layer = manager
            .append_child(root, manager.create_layer_with(ChoiceProvider::new(&["A", "B"])))
            .unwrap();
        manager.set_setting_value(layer, KEY, "B").unwrap();
        assert_eq!(manager.setting_value(layer, KEY).unwrap(), SettingValue::from("A"));

        manager.set_setting_value(shared, KEY, SettingValue::Null).unwrap();

        assert!(!manager.is_setting_overridden(layer, KEY).unwrap());
        assert_eq!(manager.setting_value(layer, KEY).unwrap(), SettingValue::from("B"));
    })
    .await;
}

#[tokio::test]
async fn test_removing_shared_setting_clears_override() {
    local(async {
        let client = ScriptedQueryClient::new();
        let manager = support::manager(&client);
        let root = manager.root();
        let shared = manager
            .append_child(root, DetachedItem::shared_setting(KEY))
            .unwrap();
        let layer = manager
            .append_child(root, manager.create_layer_with(ChoiceProvider::new(&["A", "B"])))
            .unwrap();
        manager.set_setting_value(shared, KEY, "B").unwrap();
        assert!(manager.is_setting_overridden(layer, KEY).unwrap());

        manager.detach(shared).unwrap();

        assert!(!manager.is_setting_overridden(layer, KEY).unwrap());
        assert_eq!(manager.setting_value(layer, KEY).unwrap(), SettingValue::from("A"));
    })
    .await;
}

#[tokio::test]
async fn test_shared_setting_of_other_type_is_ignored() {
    local(async {
        let client = ScriptedQueryClient::new();
        let manager = support::manager(&client);
        let root = manager.root();
        let shared = manager
            .append_child(root, DetachedItem::shared_setting(SettingType::Realization))
            .unwrap();
        let layer = manager
            .append_child(root, manager.create_layer_with(ChoiceProvider::new(&["A"])))
            .unwrap();

        assert!(manager.available_values(shared, SettingType::Realization).unwrap().is_empty());
        assert!(!manager.is_setting_overridden(layer, KEY).unwrap());
    })
    .await;
}

fn integer_lists() -> impl Strategy<Value = Vec<Vec<SettingValue>>> {
    prop::collection::vec(
        prop::collection::vec((0i64..6).prop_map(SettingValue::Integer), 0..6),
        1..5,
    )
}

proptest! {
    #[test]
    fn intersection_membership_does_not_depend_on_order(lists in integer_lists()) {
        let forward = intersect_available_values(lists.iter().map(Vec::as_slice));
        let backward = intersect_available_values(lists.iter().rev().map(Vec::as_slice));

        for value in &forward {
            prop_assert!(backward.contains(value));
            for list in &lists {
                prop_assert!(list.contains(value));
            }
        }
        for value in &backward {
            prop_assert!(forward.contains(value));
        }
    }

    #[test]
    fn intersection_keeps_values_common_to_all(lists in integer_lists()) {
        let result = intersect_available_values(lists.iter().map(Vec::as_slice));
        for value in &lists[0] {
            let everywhere = lists.iter().all(|list| list.contains(value));
            prop_assert_eq!(everywhere, result.contains(value));
        }
    }
}
