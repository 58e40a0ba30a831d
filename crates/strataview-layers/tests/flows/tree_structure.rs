use std::cell::Cell;
use std::rc::Rc;

use strataview_core::StructuralError;
use strataview_layers::{DetachedItem, LayerKind, ManagerTopic, SettingType};

use crate::support::{self, local, ChoiceProvider, ScriptedQueryClient};

#[tokio::test]
async fn test_existing_child_is_moved_not_copied() {
    local(async {
        let client = ScriptedQueryClient::new();
        let manager = support::manager(&client);
        let root = manager.root();
        let group_a = manager.append_child(root, DetachedItem::group("A")).unwrap();
        let group_b = manager.append_child(root, DetachedItem::group("B")).unwrap();
        let layer = manager
            .append_child(group_a, manager.create_layer_with(ChoiceProvider::new(&["x"])))
            .unwrap();

        manager.append_child(group_b, layer).unwrap();

        assert!(manager.children(group_a).unwrap().is_empty());
        assert_eq!(manager.children(group_b).unwrap(), vec![layer]);
        assert_eq!(manager.parent(layer), Some(group_b));
        assert_eq!(
            manager.with_node(layer, |node| node.item.manager()).unwrap(),
            Some(manager.id())
        );
    })
    .await;
}

#[tokio::test]
async fn test_reorder_within_same_group() {
    local(async {
        let client = ScriptedQueryClient::new();
        let manager = support::manager(&client);
        let root = manager.root();
        let a = manager.append_child(root, DetachedItem::group("a")).unwrap();
        let b = manager.append_child(root, DetachedItem::group("b")).unwrap();
        let c = manager.append_child(root, DetachedItem::group("c")).unwrap();

        manager.insert_child(root, c, 0).unwrap();
        assert_eq!(manager.children(root).unwrap(), vec![c, a, b]);

        manager.append_child(root, c).unwrap();
        assert_eq!(manager.children(root).unwrap(), vec![a, b, c]);

        manager.move_child(root, a, 1).unwrap();
        assert_eq!(manager.children(root).unwrap(), vec![b, a, c]);
    })
    .await;
}

#[tokio::test]
async fn test_index_errors() {
    local(async {
        let client = ScriptedQueryClient::new();
        let manager = support::manager(&client);
        let root = manager.root();

        let err = manager
            .insert_child(root, DetachedItem::group("late"), 5)
            .unwrap_err();
        assert_eq!(err, StructuralError::InvalidIndex { index: 5, len: 0 });

        let first = manager.append_child(root, DetachedItem::group("first")).unwrap();
        manager.append_child(root, DetachedItem::group("second")).unwrap();

        let err = manager.move_child(root, first, 2).unwrap_err();
        assert_eq!(err, StructuralError::InvalidIndex { index: 2, len: 2 });
        assert_eq!(manager.children(root).unwrap()[0], first);
    })
    .await;
}

#[tokio::test]
async fn test_cycles_and_root_are_rejected() {
    local(async {
        let client = ScriptedQueryClient::new();
        let manager = support::manager(&client);
        let root = manager.root();
        let outer = manager.append_child(root, DetachedItem::group("outer")).unwrap();
        let inner = manager.append_child(outer, DetachedItem::group("inner")).unwrap();

        assert_eq!(
            manager.append_child(inner, outer).unwrap_err(),
            StructuralError::CycleDetected {
                item: outer,
                target: inner
            }
        );
        assert!(matches!(
            manager.append_child(outer, outer),
            Err(StructuralError::CycleDetected { .. })
        ));
        assert_eq!(
            manager.append_child(inner, root).unwrap_err(),
            StructuralError::RootImmutable
        );
        assert_eq!(manager.detach(root).unwrap_err(), StructuralError::RootImmutable);
        assert_eq!(manager.parent(inner), Some(outer));
    })
    .await;
}

#[tokio::test]
async fn test_remove_child_requires_parent() {
    local(async {
        let client = ScriptedQueryClient::new();
        let manager = support::manager(&client);
        let root = manager.root();
        let group = manager.append_child(root, DetachedItem::group("g")).unwrap();
        let layer = manager
            .append_child(root, manager.create_layer_with(ChoiceProvider::new(&["x"])))
            .unwrap();

        assert_eq!(
            manager.remove_child(group, layer).unwrap_err(),
            StructuralError::NotAChild { item: layer, group }
        );

        let detached = manager.remove_child(root, layer).unwrap();
        assert_eq!(detached.id(), layer);
        assert_eq!(manager.find_descendant_by_id(root, layer), None);
        assert_eq!(detached.root_node().unwrap().item.manager(), None);
        assert_eq!(detached.root_node().unwrap().item.parent(), None);
    })
    .await;
}

#[tokio::test]
async fn test_detached_subtree_moves_to_another_manager() {
    local(async {
        let client = ScriptedQueryClient::new();
        let first = support::manager(&client);
        let second = support::manager(&client);

        let group = first
            .append_child(first.root(), DetachedItem::group("carry"))
            .unwrap();
        let layer = first
            .append_child(group, first.create_layer_with(ChoiceProvider::new(&["x"])))
            .unwrap();

        let detached = first.detach(group).unwrap();
        assert_eq!(detached.len(), 2);
        let group = second.attach(second.root(), detached).unwrap();

        assert!(first.layers().is_empty());
        assert_eq!(second.layers(), vec![layer]);
        assert_eq!(
            second.with_node(layer, |node| node.item.manager()).unwrap(),
            Some(second.id())
        );
        assert_eq!(second.parent(layer), Some(group));
    })
    .await;
}

#[tokio::test]
async fn test_new_items_get_unique_names() {
    local(async {
        let client = ScriptedQueryClient::new();
        let manager = support::manager(&client);
        let root = manager.root();

        let a = manager
            .append_child(root, manager.create_layer(LayerKind::RealizationGrid))
            .unwrap();
        let b = manager
            .append_child(root, manager.create_layer(LayerKind::RealizationGrid))
            .unwrap();

        assert_eq!(manager.name(a).unwrap(), "Realization Grid layer");
        assert_eq!(manager.name(b).unwrap(), "Realization Grid layer (1)");
    })
    .await;
}

#[tokio::test]
async fn test_reparenting_keeps_one_subscription_per_topic() {
    local(async {
        let client = ScriptedQueryClient::new();
        let manager = support::manager(&client);
        let root = manager.root();
        let left = manager.append_child(root, DetachedItem::group("left")).unwrap();
        let right = manager.append_child(root, DetachedItem::group("right")).unwrap();
        let shared = manager
            .append_child(left, DetachedItem::shared_setting(SettingType::SurfaceName))
            .unwrap();

        for target in [right, left, root, right] {
            manager.append_child(target, shared).unwrap();
        }

        for topic in [
            ManagerTopic::ItemsChanged,
            ManagerTopic::SettingsChanged,
            ManagerTopic::AvailableSettingsChanged,
        ] {
            assert_eq!(manager.subscription_count(shared, topic), 1);
            assert_eq!(manager.publisher().subscriber_count(topic), 1);
        }

        let detached = manager.detach(shared).unwrap();
        let node = detached.root_node().unwrap();
        assert_eq!(node.subscription_count(ManagerTopic::ItemsChanged), 0);
        assert_eq!(manager.publisher().subscriber_count(ManagerTopic::ItemsChanged), 0);
    })
    .await;
}

#[tokio::test]
async fn test_items_changed_once_per_operation() {
    local(async {
        let client = ScriptedQueryClient::new();
        let manager = support::manager(&client);
        let root = manager.root();
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        let _subscription = manager
            .publisher()
            .subscribe(ManagerTopic::ItemsChanged, move || seen.set(seen.get() + 1));

        let group = manager.append_child(root, DetachedItem::group("g")).unwrap();
        assert_eq!(count.get(), 1);

        manager.detach(group).unwrap();
        assert_eq!(count.get(), 2);
    })
    .await;
}
