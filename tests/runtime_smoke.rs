use std::time::Duration;

use recgrid::{
    controller::RecordGridController,
    error::GridError,
    event::GridEvent,
    record::{RecordDraft, Value},
    runtime::handle::{spawn_grid, RuntimeConfig, RuntimeError},
    schema::{FieldSpec, Schema},
    types::{DeleteKind, FilterMode},
};

fn grid() -> RecordGridController {
    let schema = Schema::new(vec![
        FieldSpec::text("name").required().searchable(),
        FieldSpec::text("city"),
    ])
    .expect("schema");
    let records = ["Ann", "Ben", "Cid"]
        .into_iter()
        .map(|n| RecordDraft::new().with("name", n).with("city", "Oslo"));
    RecordGridController::new(schema, records)
}

#[tokio::test]
async fn commands_apply_in_order_and_events_are_broadcast() {
    let handle = spawn_grid(grid(), RuntimeConfig::default());
    let mut sub = handle.subscribe();

    let id = handle
        .add_record(RecordDraft::new().with("name", "Dee"))
        .await
        .expect("add");
    handle.update_edit_field("city", "Bergen").await.expect("update");
    let patch = handle.commit_edit().await.expect("commit");
    assert_eq!(patch.fields.get("city"), Some(&Value::from("Bergen")));

    handle.soft_delete(id).await.expect("soft delete");

    let mut seen = Vec::new();
    for _ in 0..16 {
        let evt = tokio::time::timeout(Duration::from_secs(1), sub.recv())
            .await
            .expect("event")
            .expect("recv");
        let last = matches!(evt, GridEvent::RecordDeleted { .. });
        seen.push(evt);
        if last {
            break;
        }
    }

    assert_eq!(seen[0], GridEvent::RecordAdded { id });
    assert!(seen.contains(&GridEvent::EditStarted { id }));
    assert!(seen.iter().any(|e| matches!(e, GridEvent::RecordUpdated { id: u, .. } if *u == id)));
    assert_eq!(
        seen.last(),
        Some(&GridEvent::RecordDeleted {
            id,
            kind: DeleteKind::Soft
        })
    );

    let records = handle.shutdown().await.expect("shutdown");
    assert_eq!(records.len(), 4);
    assert!(records[3].is_disabled());
}

#[tokio::test]
async fn grid_errors_surface_through_handle() {
    let handle = spawn_grid(grid(), RuntimeConfig::default());

    let err = handle.soft_delete(99).await.unwrap_err();
    assert!(matches!(err, RuntimeError::Grid(GridError::NotFound(99))));

    handle.start_edit(1).await.expect("start");
    handle.update_edit_field("name", " ").await.expect("update");
    let err = handle.commit_edit().await.unwrap_err();
    assert!(matches!(err, RuntimeError::Grid(GridError::Validation(_))));

    handle.shutdown().await.expect("shutdown");
    let err = handle.go_to_page(1).await.unwrap_err();
    assert!(matches!(err, RuntimeError::ChannelClosed));
}

#[tokio::test]
async fn view_queries_and_closures_run_on_writer_task() {
    let handle = spawn_grid(grid(), RuntimeConfig::default());

    assert!(handle.set_search("ben").await.expect("search"));
    let view = handle.page_view().await.expect("view");
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.search_term, "ben");

    handle.toggle_select(2).await.expect("select");
    let report = handle.bulk_soft_delete(None).await.expect("bulk");
    assert_eq!(report.changed, vec![2]);

    assert!(handle
        .set_filter_mode(FilterMode::ShowDisabled)
        .await
        .expect("filter"));
    let disabled = handle
        .with_grid(|g| g.visible_records().len())
        .await
        .expect("closure");
    assert_eq!(disabled, 1);

    let snapshot = handle.snapshot().await.expect("snapshot");
    assert_eq!(snapshot.records.len(), 3);
    handle.shutdown().await.expect("shutdown");
}
