use std::collections::BTreeSet;

use proptest::prelude::*;

use recgrid::{
    controller::RecordGridController,
    record::{Record, RecordDraft},
    schema::{FieldSpec, Schema},
    types::{FilterMode, RecordId},
};

#[derive(Debug, Clone)]
enum Action {
    Add { name_idx: u8 },
    SoftDelete { target: u8 },
    Restore { target: u8 },
    HardDelete { target: u8 },
    ToggleFilter,
    Search { name_idx: u8 },
    ClearSearch,
    GoToPage { page: u8 },
    SetPageSize { size: u8 },
    ToggleSelect { target: u8 },
    SelectPage,
    BulkSoftDeleteSelected,
    EditName { target: u8, name_idx: u8 },
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        (0u8..16).prop_map(|name_idx| Action::Add { name_idx }),
        (0u8..32).prop_map(|target| Action::SoftDelete { target }),
        (0u8..32).prop_map(|target| Action::Restore { target }),
        (0u8..32).prop_map(|target| Action::HardDelete { target }),
        Just(Action::ToggleFilter),
        (0u8..16).prop_map(|name_idx| Action::Search { name_idx }),
        Just(Action::ClearSearch),
        (0u8..12).prop_map(|page| Action::GoToPage { page }),
        (0u8..30).prop_map(|size| Action::SetPageSize { size }),
        (0u8..32).prop_map(|target| Action::ToggleSelect { target }),
        Just(Action::SelectPage),
        Just(Action::BulkSoftDeleteSelected),
        (0u8..32, 0u8..16).prop_map(|(target, name_idx)| Action::EditName { target, name_idx }),
    ]
}

fn schema() -> Schema {
    Schema::new(vec![FieldSpec::text("name").required().searchable()]).expect("schema")
}

fn pick(grid: &RecordGridController, target: u8) -> Option<RecordId> {
    let ids: Vec<RecordId> = grid.records().iter().map(Record::id).collect();
    if ids.is_empty() {
        None
    } else {
        Some(ids[usize::from(target) % ids.len()])
    }
}

fn ids_in(grid: &mut RecordGridController, mode: FilterMode) -> BTreeSet<RecordId> {
    let prev = grid.filter_mode();
    grid.set_filter_mode(mode);
    let out = grid.visible_records().into_iter().map(Record::id).collect();
    grid.set_filter_mode(prev);
    out
}

proptest! {
    #[test]
    fn random_sequences_keep_page_bounds_and_id_invariants(
        seed_len in 0usize..12,
        actions in prop::collection::vec(action_strategy(), 1..150),
    ) {
        let drafts = (0..seed_len).map(|i| RecordDraft::new().with("name", format!("N{}", i % 16)));
        let mut grid = RecordGridController::new(schema(), drafts);

        for action in actions {
            match action {
                Action::Add { name_idx } => {
                    let _ = grid.add_record(RecordDraft::new().with("name", format!("N{name_idx}")));
                }
                Action::SoftDelete { target } => {
                    if let Some(id) = pick(&grid, target) {
                        let _ = grid.soft_delete(id);
                    }
                }
                Action::Restore { target } => {
                    if let Some(id) = pick(&grid, target) {
                        let _ = grid.restore(id);
                    }
                }
                Action::HardDelete { target } => {
                    if let Some(id) = pick(&grid, target) {
                        let _ = grid.hard_delete(id);
                    }
                }
                Action::ToggleFilter => {
                    grid.toggle_filter();
                }
                Action::Search { name_idx } => {
                    grid.set_search(&format!("n{name_idx}"));
                }
                Action::ClearSearch => {
                    grid.clear_search();
                }
                Action::GoToPage { page } => {
                    grid.go_to_page(usize::from(page));
                }
                Action::SetPageSize { size } => {
                    grid.set_page_size(usize::from(size));
                }
                Action::ToggleSelect { target } => {
                    if let Some(id) = pick(&grid, target) {
                        let _ = grid.toggle_select(id);
                    }
                }
                Action::SelectPage => {
                    grid.select_all_on_page();
                }
                Action::BulkSoftDeleteSelected => {
                    grid.bulk_soft_delete_selected();
                    prop_assert!(grid.selected_ids().is_empty());
                }
                Action::EditName { target, name_idx } => {
                    if let Some(id) = pick(&grid, target) {
                        let before_disabled = grid.record(id).map(Record::is_disabled);
                        grid.start_edit(id).expect("start edit");
                        grid.update_edit_field("name", format!("N{name_idx}")).expect("update");
                        grid.commit_edit().expect("commit");
                        prop_assert_eq!(grid.record(id).map(Record::is_disabled), before_disabled);
                    }
                }
            }

            let visible = grid.visible_len();
            let total = visible.div_ceil(grid.page_size()).max(1);
            prop_assert!(grid.page() >= 1);
            prop_assert!(grid.page() <= total, "page {} of {}", grid.page(), total);
            prop_assert_eq!(grid.total_pages(), total);
            prop_assert!(grid.page_size() >= 1 && grid.page_size() <= 20);
            prop_assert!(grid.page_records().len() <= grid.page_size());

            let ids: Vec<RecordId> = grid.records().iter().map(Record::id).collect();
            let unique: BTreeSet<RecordId> = ids.iter().copied().collect();
            prop_assert_eq!(unique.len(), ids.len());

            for id in grid.selected_ids() {
                prop_assert!(grid.record(id).is_some());
            }
            if let Some(id) = grid.editing_id() {
                prop_assert!(grid.record(id).is_some());
            }
        }
    }

    #[test]
    fn enabled_and_disabled_views_partition_records(
        flags in prop::collection::vec(any::<bool>(), 0..40),
    ) {
        let drafts = flags
            .iter()
            .enumerate()
            .map(|(i, d)| RecordDraft::new().with("name", format!("R{i}")).disabled(*d));
        let mut grid = RecordGridController::new(schema(), drafts);

        let enabled = ids_in(&mut grid, FilterMode::ShowEnabled);
        let disabled = ids_in(&mut grid, FilterMode::ShowDisabled);
        let all: BTreeSet<RecordId> = grid.records().iter().map(Record::id).collect();

        prop_assert!(enabled.is_disjoint(&disabled));
        prop_assert_eq!(enabled.union(&disabled).copied().collect::<BTreeSet<_>>(), all);
    }

    #[test]
    fn selection_survives_filter_and_search_changes(
        count in 1usize..30,
        pick_idx in 0usize..30,
        term_idx in 0u8..10,
    ) {
        let drafts = (0..count).map(|i| RecordDraft::new().with("name", format!("R{i}")));
        let mut grid = RecordGridController::new(schema(), drafts);
        let id = grid.records()[pick_idx % count].id();
        grid.toggle_select(id).expect("select");

        grid.toggle_filter();
        grid.set_search(&format!("r{term_idx}"));
        grid.toggle_filter();
        grid.clear_search();
        grid.set_page_size(3);

        prop_assert_eq!(grid.selected_ids(), vec![id]);
    }
}
