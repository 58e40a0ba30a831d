use std::cell::Cell;
use std::rc::Rc;

use strataview_core::{ItemId, SnapshotExt};
use strataview_interaction::{
    HighlightMarker, InteractionHandler, IntersectionHandler, IntersectionItem, IntersectionTopic,
    Intersections, Point2, Shape, ShapeData, Viewport,
};
use strataview_layers::{
    FenceMeshSection, GridIntersectionData, LayerData, WellborePathData, WellborePick,
};
use strataview_settings::InteractionSettings;

/// Pixels equal world coordinates.
fn identity_viewport() -> Viewport {
    let mut viewport = Viewport::new(800.0, 600.0);
    viewport.set_pan(0.0, 0.0);
    viewport
}

fn interaction() -> InteractionHandler {
    InteractionHandler::new(InteractionSettings::default(), identity_viewport())
}

fn point_item(id: &str, x: f64, y: f64) -> IntersectionItem {
    IntersectionItem::new(id, ShapeData::Point(Point2::new(x, y)))
}

fn section(length: f64, vertices: Vec<f64>, polys: Vec<u32>, props: Vec<f64>) -> FenceMeshSection {
    FenceMeshSection {
        vertices_uz_arr: vertices,
        poly_source_cell_indices_arr: (0..props.len() as u32).collect(),
        polys_arr: polys,
        poly_props_arr: props,
        start_utm_x: 0.0,
        start_utm_y: 0.0,
        end_utm_x: length,
        end_utm_y: 0.0,
    }
}

fn two_section_grid() -> LayerData {
    let first = section(
        30.0,
        vec![0.0, 0.0, 30.0, 0.0, 30.0, 10.0, 0.0, 10.0],
        vec![4, 0, 1, 2, 3],
        vec![0.3],
    );
    let second = section(
        20.0,
        vec![0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 10.0, 20.0, 0.0, 20.0, 10.0],
        vec![4, 0, 1, 2, 3, 4, 1, 4, 5, 2],
        vec![0.5, 0.7],
    );
    LayerData::Grid(GridIntersectionData {
        fence_mesh_sections: vec![first, second],
        grid_dimensions: Some([2, 1, 1]),
        min_grid_prop_value: 0.3,
        max_grid_prop_value: 0.7,
        min_z: 0.0,
        max_z: 10.0,
    })
}

fn wellbore_with_picks(pick_count: usize) -> LayerData {
    LayerData::WellborePath(WellborePathData {
        wellbore_uuid: "wb-1".into(),
        unique_wellbore_identifier: "NO 15/9-F-11".into(),
        points: vec![[0.0, 0.0], [0.0, 100.0]],
        md_arr: vec![25.0, 125.0],
        picks: (0..pick_count)
            .map(|index| WellborePick {
                pick_identifier: format!("Pick {}", index),
                md: 75.0,
                point: [0.0, 50.0],
            })
            .collect(),
    })
}

#[test]
fn test_threshold_is_strict_in_pixels() {
    let handler = IntersectionHandler::new(InteractionSettings::default());
    handler.add_intersection_item(&point_item("pick", 100.0, 100.0));
    let mut viewport = identity_viewport();
    viewport.set_zoom(2.0);

    // the point sits at pixel (200, 200)
    assert_eq!(handler.handle_pointer_move(Point2::new(209.0, 200.0), &viewport).len(), 1);
    assert!(handler
        .handle_pointer_move(Point2::new(210.0, 200.0), &viewport)
        .is_empty());
}

#[test]
fn test_hits_follow_registration_order() {
    let handler = IntersectionHandler::new(InteractionSettings::default());
    handler.add_intersection_item(&point_item("b", 10.0, 10.0));
    handler.add_intersection_item(&IntersectionItem::new(
        "a",
        ShapeData::Polygon(vec![
            Point2::new(0.0, 0.0),
            Point2::new(20.0, 0.0),
            Point2::new(20.0, 20.0),
            Point2::new(0.0, 20.0),
        ]),
    ));
    // replacing "b" keeps its place
    handler.add_intersection_item(&point_item("b", 11.0, 10.0));

    let hits = handler.handle_pointer_move(Point2::new(10.0, 10.0), &identity_viewport());
    let ids: Vec<&str> = hits.iter().map(|hit| hit.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
    assert_eq!(hits[0].result.point, Point2::new(11.0, 10.0));
    assert_eq!(hits[1].result.shape(), Shape::Polygon);
}

#[test]
fn test_empty_hit_list_is_published() {
    let handler = Rc::new(IntersectionHandler::new(InteractionSettings::default()));
    handler.add_intersection_item(&point_item("pick", 10.0, 10.0));
    let notified = Rc::new(Cell::new(0));
    let seen = Rc::new(Cell::new(usize::MAX));
    let _subscription = handler.publisher().subscribe(IntersectionTopic::Intersection, {
        let notified = notified.clone();
        let seen = seen.clone();
        let handler = Rc::downgrade(&handler);
        move || {
            notified.set(notified.get() + 1);
            if let Some(handler) = handler.upgrade() {
                seen.set((*handler).get_snapshot::<Intersections>().len());
            }
        }
    });

    handler.handle_pointer_move(Point2::new(10.0, 10.0), &identity_viewport());
    assert_eq!((notified.get(), seen.get()), (1, 1));

    handler.handle_pointer_move(Point2::new(400.0, 400.0), &identity_viewport());
    assert_eq!((notified.get(), seen.get()), (2, 0));
}

#[test]
fn test_removed_item_is_not_hit() {
    let handler = IntersectionHandler::new(InteractionSettings::default());
    handler.add_intersection_item(&point_item("pick", 10.0, 10.0));
    assert!(handler.remove_intersection_item("pick"));
    assert!(!handler.remove_intersection_item("pick"));
    assert!(handler
        .handle_pointer_move(Point2::new(10.0, 10.0), &identity_viewport())
        .is_empty());
}

#[test]
fn test_grid_polygon_index_counts_earlier_sections() {
    let interaction = interaction();
    interaction.add_layer(ItemId::new(), &two_section_grid());

    // second cell of the second section, which starts at u = 30
    interaction.pointer_move(Point2::new(45.0, 5.0));
    let items = interaction.readout_items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].label, "Fence mesh section 2");
    assert_eq!(items[0].polygon_index, Some(2));
    assert_eq!(items[0].property, Some(0.7));
    assert_eq!(items[0].md, None);

    let text = interaction.readout_text();
    assert!(text.contains("Polygon index: 2"));
    assert!(text.contains("Property value: 0.70"));
}

#[test]
fn test_readout_lists_three_and_summarises_the_rest() {
    let interaction = interaction();
    interaction.add_layer(ItemId::new(), &wellbore_with_picks(5));

    let hits = interaction.pointer_move(Point2::new(0.0, 50.0));
    assert_eq!(hits.len(), 6);
    // every hit gets a depth along the wellbore
    assert!(hits.iter().all(|hit| hit.md == Some(75.0)));

    let entries = interaction.readout_entries();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].lines[0], "NO 15/9-F-11");
    assert_eq!(entries[0].lines[1], "MD: 75.00");
    // picks do not show depth
    assert_eq!(entries[1].lines, vec!["Pick 0", "X: 0.00, Y: 50.00"]);
    assert_eq!(interaction.readout_summary().as_deref(), Some("... and 3 more"));
}

#[test]
fn test_readout_hidden_without_hits() {
    let interaction = interaction();
    interaction.add_layer(ItemId::new(), &wellbore_with_picks(1));
    interaction.pointer_move(Point2::new(0.0, 50.0));
    assert!(interaction.readout_visible());

    interaction.pointer_leave();
    assert!(!interaction.readout_visible());
    assert!(interaction.hits().is_empty());
    assert!(interaction.highlight_markers().is_empty());
}

#[test]
fn test_highlight_hidden_while_dragging_and_on_rescale() {
    let interaction = interaction();
    interaction.add_layer(ItemId::new(), &wellbore_with_picks(1));

    interaction.pointer_move(Point2::new(0.0, 50.0));
    assert!(interaction.highlight_visible());
    match &interaction.highlight_markers()[1] {
        HighlightMarker::Circle { center, radius, color } => {
            assert_eq!(*center, Point2::new(0.0, 50.0));
            assert_eq!(*radius, 5.0);
            assert_eq!(color, "rgb(255, 0, 0)");
        }
        other => panic!("unexpected marker {:?}", other),
    }

    interaction.pointer_down();
    interaction.pointer_move(Point2::new(0.0, 52.0));
    assert!(!interaction.highlight_visible());
    assert!(interaction.highlight_markers().is_empty());

    interaction.pointer_up();
    assert!(interaction.highlight_visible());

    interaction.rescale(|viewport| viewport.zoom_in());
    assert!(!interaction.highlight_visible());
    // readout is unaffected by rescale
    assert!(interaction.readout_visible());
}

#[test]
fn test_remove_layer_drops_its_items() {
    let interaction = interaction();
    let grid = ItemId::new();
    let wellbore = ItemId::new();
    interaction.add_layer(grid, &two_section_grid());
    interaction.add_layer(wellbore, &wellbore_with_picks(2));
    assert_eq!(interaction.layer_ids(), vec![grid, wellbore]);
    assert_eq!(interaction.intersection_handler().item_ids().len(), 5);

    interaction.remove_layer(wellbore);
    assert_eq!(interaction.layer_ids(), vec![grid]);
    assert_eq!(interaction.intersection_handler().item_ids().len(), 2);
    // no wellbore left, so hits carry no depth
    let hits = interaction.pointer_move(Point2::new(45.0, 5.0));
    assert_eq!(hits[0].md, None);
}
