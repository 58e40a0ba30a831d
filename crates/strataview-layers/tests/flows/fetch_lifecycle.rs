use std::cell::Cell;
use std::rc::Rc;

use strataview_core::FetchError;
use strataview_layers::{
    ContextTopic, LayerData, LayerStatus, ManagerTopic, QueryKey, SettingType, SettingValue,
};

use crate::support::{
    self, local, settle, surface_data_json, ChoiceProvider, ScriptedQueryClient, CHOICE_ENDPOINT,
};

const KEY: SettingType = SettingType::SurfaceName;

fn choice_key(value: &str) -> QueryKey {
    QueryKey::new(CHOICE_ENDPOINT, vec![SettingValue::from(value)])
}

fn line_name(data: &LayerData) -> &str {
    match data {
        LayerData::Surface(surface) => &surface.lines[0].name,
        other => panic!("unexpected data {:?}", other),
    }
}

#[tokio::test]
async fn test_superseded_fetch_result_is_ignored() {
    local(async {
        let client = ScriptedQueryClient::new();
        let manager = support::manager(&client);
        let layer = manager
            .append_child(manager.root(), manager.create_layer_with(ChoiceProvider::new(&["A", "B"])))
            .unwrap();
        settle().await;
        assert_eq!(manager.layer_status(layer).unwrap(), LayerStatus::Loading);
        assert_eq!(client.pending_keys(), vec![choice_key("A")]);

        manager.set_setting_value(layer, KEY, "B").unwrap();
        settle().await;
        assert_eq!(client.cancelled(), vec![choice_key("A")]);

        assert!(client.resolve(&choice_key("A"), Ok(surface_data_json("A"))));
        settle().await;
        assert_eq!(manager.layer_status(layer).unwrap(), LayerStatus::Loading);
        assert!(manager.layer_data(layer).unwrap().is_none());

        assert!(client.resolve(&choice_key("B"), Ok(surface_data_json("B"))));
        settle().await;
        assert_eq!(manager.layer_status(layer).unwrap(), LayerStatus::Success);
        let data = manager.layer_data(layer).unwrap().unwrap();
        assert_eq!(line_name(&data), "B");
    })
    .await;
}

#[tokio::test]
async fn test_success_bumps_data_revision() {
    local(async {
        let client = ScriptedQueryClient::new();
        let manager = support::manager(&client);
        let revisions = Rc::new(Cell::new(0));
        let seen = Rc::clone(&revisions);
        let _subscription = manager
            .publisher()
            .subscribe(ManagerTopic::LayerDataRevision, move || seen.set(seen.get() + 1));

        let layer = manager
            .append_child(manager.root(), manager.create_layer_with(ChoiceProvider::new(&["A"])))
            .unwrap();
        settle().await;
        assert_eq!(manager.data_revision(), 0);

        client.resolve_endpoint(CHOICE_ENDPOINT, Ok(surface_data_json("A")));
        settle().await;

        assert_eq!(manager.data_revision(), 1);
        assert_eq!(revisions.get(), 1);
        let visible = manager.visible_layer_data();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].0, layer);
        assert_eq!(visible[0].1, "Choice layer");

        manager.set_visible(layer, false).unwrap();
        assert_eq!(manager.data_revision(), 2);
        assert!(manager.visible_layer_data().is_empty());
    })
    .await;
}

#[tokio::test]
async fn test_fetch_error_is_prefixed_with_layer_name() {
    local(async {
        let client = ScriptedQueryClient::new();
        let manager = support::manager(&client);
        let layer = manager
            .append_child(manager.root(), manager.create_layer_with(ChoiceProvider::new(&["A"])))
            .unwrap();
        settle().await;

        client.resolve_endpoint(
            CHOICE_ENDPOINT,
            Err(FetchError::Service {
                status: 500,
                message: "boom".into(),
            }),
        );
        settle().await;

        assert_eq!(manager.layer_status(layer).unwrap(), LayerStatus::Error);
        assert_eq!(
            manager.layer_error(layer).unwrap().as_deref(),
            Some("Choice layer: Service error 500: boom")
        );
    })
    .await;
}

#[tokio::test]
async fn test_failed_refetch_keeps_previous_data() {
    local(async {
        let client = ScriptedQueryClient::new();
        let manager = support::manager(&client);
        let layer = manager
            .append_child(manager.root(), manager.create_layer_with(ChoiceProvider::new(&["A"])))
            .unwrap();
        settle().await;
        client.resolve_endpoint(CHOICE_ENDPOINT, Ok(surface_data_json("A")));
        settle().await;

        manager.refetch_layer(layer).unwrap();
        settle().await;
        assert_eq!(manager.layer_status(layer).unwrap(), LayerStatus::Loading);
        client.resolve_endpoint(CHOICE_ENDPOINT, Err(FetchError::Decode("truncated".into())));
        settle().await;

        assert_eq!(manager.layer_status(layer).unwrap(), LayerStatus::Error);
        assert!(manager.layer_data(layer).unwrap().is_some());
    })
    .await;
}

#[tokio::test]
async fn test_invalid_settings_never_fetch() {
    local(async {
        let client = ScriptedQueryClient::new();
        let manager = support::manager(&client);
        let layer = manager
            .append_child(manager.root(), manager.create_layer_with(ChoiceProvider::new(&[])))
            .unwrap();
        settle().await;

        assert_eq!(manager.layer_status(layer).unwrap(), LayerStatus::InvalidSettings);
        assert!(client.requests().is_empty());
    })
    .await;
}

#[tokio::test]
async fn test_cancelled_fetch_returns_to_idle() {
    local(async {
        let client = ScriptedQueryClient::new();
        let manager = support::manager(&client);
        let layer = manager
            .append_child(manager.root(), manager.create_layer_with(ChoiceProvider::new(&["A"])))
            .unwrap();
        settle().await;

        client.resolve_endpoint(CHOICE_ENDPOINT, Err(FetchError::Cancelled));
        settle().await;
        assert_eq!(manager.layer_status(layer).unwrap(), LayerStatus::Idle);
        assert_eq!(manager.layer_error(layer).unwrap(), None);

        manager.refresh_all();
        settle().await;
        assert_eq!(manager.layer_status(layer).unwrap(), LayerStatus::Loading);
        assert_eq!(client.requests().len(), 2);
    })
    .await;
}

#[tokio::test]
async fn test_result_for_detached_layer_is_dropped() {
    local(async {
        let client = ScriptedQueryClient::new();
        let manager = support::manager(&client);
        let layer = manager
            .append_child(manager.root(), manager.create_layer_with(ChoiceProvider::new(&["A"])))
            .unwrap();
        settle().await;

        let detached = manager.detach(layer).unwrap();
        client.resolve_endpoint(CHOICE_ENDPOINT, Ok(surface_data_json("A")));
        settle().await;

        assert_eq!(manager.data_revision(), 0);
        assert!(detached.root_node().unwrap().as_layer().unwrap().data().is_none());
        assert_eq!(client.cancelled(), vec![choice_key("A")]);
    })
    .await;
}

#[tokio::test]
async fn test_repeated_refresh_publishes_nothing() {
    local(async {
        let client = ScriptedQueryClient::new();
        let manager = support::manager(&client);
        let layer = manager
            .append_child(manager.root(), manager.create_layer_with(ChoiceProvider::new(&["A", "B"])))
            .unwrap();
        settle().await;

        let changes = Rc::new(Cell::new(0));
        let seen = Rc::clone(&changes);
        let _subscription = manager
            .context_publisher(layer)
            .unwrap()
            .subscribe(ContextTopic::SettingsChanged, move || seen.set(seen.get() + 1));

        manager.refresh_all();
        manager.refresh_all();
        settle().await;

        assert_eq!(changes.get(), 0);
        assert_eq!(client.requests().len(), 1);
        assert_eq!(manager.setting_value(layer, KEY).unwrap(), SettingValue::from("A"));
    })
    .await;
}
