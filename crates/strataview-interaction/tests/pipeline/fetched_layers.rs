use std::rc::Rc;

use serde_json::json;
use strataview_interaction::{InteractionHandler, Point2, Viewport};
use strataview_layers::{
    EnsembleIdent, InMemoryQueryClient, LayerKind, LayerManager, LayerStatus, QueryKey,
    SettingValue, StaticEnsembleSession,
};
use strataview_settings::Config;
use uuid::Uuid;

fn ensemble() -> EnsembleIdent {
    EnsembleIdent::new(Uuid::from_u128(0xd011), "pred-0")
}

fn identity_viewport() -> Viewport {
    let mut viewport = Viewport::new(800.0, 600.0);
    viewport.set_pan(0.0, 0.0);
    viewport
}

async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}

#[test]
fn test_config_file_feeds_interaction() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("strataview.toml");
    let mut config = Config::default();
    config.interaction.readout_max_items = 1;
    config.save_to_file(&path).unwrap();

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
    let interaction = InteractionHandler::new(loaded.interaction, identity_viewport());
    assert!(!interaction.readout_visible());
}

#[tokio::test]
async fn test_fetched_wellbore_is_hoverable() {
    tokio::task::LocalSet::new()
        .run_until(async {
            let client = Rc::new(InMemoryQueryClient::new());
            client.insert(
                QueryKey::new(
                    "well/drilled_wellbore_headers",
                    vec![SettingValue::Ensemble(ensemble())],
                ),
                Ok(json!([
                    { "wellbore_uuid": "wb-1", "unique_wellbore_identifier": "NO 15/9-F-11" }
                ])),
            );
            client.insert(
                QueryKey::new(
                    "well/wellbore_trajectory_intersection",
                    vec![SettingValue::Ensemble(ensemble()), SettingValue::from("NO 15/9-F-11")],
                ),
                Ok(json!({
                    "wellbore_uuid": "wb-1",
                    "unique_wellbore_identifier": "NO 15/9-F-11",
                    "points": [[0.0, 1000.0], [0.0, 1200.0]],
                    "md_arr": [1030.0, 1230.0]
                })),
            );

            let session = StaticEnsembleSession::new().with_ensemble(ensemble(), vec![0, 1]);
            let manager = LayerManager::new(client.clone(), Rc::new(session), Config::default());
            let layer = manager
                .append_child(manager.root(), manager.create_layer(LayerKind::WellborePath))
                .unwrap();
            settle().await;
            assert_eq!(manager.layer_status(layer).unwrap(), LayerStatus::Success);

            let interaction = InteractionHandler::new(Config::default().interaction, identity_viewport());
            assert!(interaction.sync_with_manager(&manager));
            assert!(!interaction.sync_with_manager(&manager));

            let hits = interaction.pointer_move(Point2::new(3.0, 1100.0));
            assert_eq!(hits.len(), 1);
            assert_eq!(hits[0].md, Some(1130.0));
            assert_eq!(
                interaction.readout_text(),
                "NO 15/9-F-11\nMD: 1130.00\nX: 0.00, Y: 1100.00"
            );
        })
        .await;
}
