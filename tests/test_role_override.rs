//! Every role override taken during generation is given back.

extern crate utter;

mod tree_util;

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;

use tree_util::{build_table_with, named, presenter_with, Fixture};
use utter::runner::ds::{Context, FormatMode, OutputChannel, Role, Snapshot, StateSet};
use utter::runner::format::FormatTable;
use utter::runner::plugin::{GeneratorBinding, GeneratorRegistry};

const OVERRIDING: &[&str] = &[
    "realTableCell",
    "cellCheckedState",
    "tableCell2ChildToggle",
    "tableCell2ChildLabel",
    "tableCellRow",
    "checkedState",
];

const ROLES: &[Role] = &[
    Role::CheckBox,
    Role::RealTableCell,
    Role::TableCell,
    Role::ListItem,
    Role::PushButton,
];

#[derive(Debug, Clone, PartialEq)]
struct Observation {
    role_before: Option<Role>,
    role_after: Option<Role>,
    balance_before: (usize, usize),
    balance_after: (usize, usize),
}

/// Nest `roles` as scoped overrides, bailing out at depth `fail_at`.
fn nest(ctx: &mut Context, roles: &[Role], fail_at: usize, depth: usize) -> Result<(), ()> {
    if depth == roles.len() {
        return Ok(());
    }
    let mut guard = ctx.scoped_role(roles[depth]);
    if depth == fail_at {
        return Err(());
    }
    nest(&mut guard, roles, fail_at, depth + 1)
}

/// A registry whose `observed` generator wraps `inner` and records the
/// override state around the call.
fn observing_registry(inner: &'static str, log: Rc<RefCell<Vec<Observation>>>) -> GeneratorRegistry {
    let mut registry = GeneratorRegistry::with_core();
    registry.register(GeneratorBinding::plugin("observed", "test", move |presenter, obj, ctx| {
        let role_before = ctx.role_override();
        let balance_before = ctx.override_balance();
        let result = match presenter.generators().get(inner) {
            Some(binding) => binding.func.call(presenter, obj, ctx),
            None => Ok(Default::default()),
        };
        log.borrow_mut().push(Observation {
            role_before,
            role_after: ctx.role_override(),
            balance_before,
            balance_after: ctx.override_balance(),
        });
        result
    }));
    registry
}

fn cell_fixture(toggle: bool, checked: bool, two_children: bool) -> Fixture {
    let fixture = Fixture::new();
    build_table_with(&fixture, 3, 2, |row, column, snapshot| {
        if (row, column) != (1, 0) {
            return snapshot;
        }
        let mut cell = Snapshot::new(Role::TableCell);
        if toggle {
            cell = cell.with_actions(&["toggle"]);
        }
        if checked {
            cell = cell.add_states(StateSet::CHECKABLE | StateSet::CHECKED);
        }
        cell
    });
    if two_children {
        fixture.add(
            "cell_toggle",
            Some("cell_1_0"),
            Snapshot::new(Role::CheckBox).with_actions(&["toggle"]),
        );
        fixture.add("cell_label", Some("cell_1_0"), named(Role::Label, "Done"));
    }
    fixture
}

proptest! {
    #[test]
    fn proptest_scoped_roles_restore_on_every_path(
        roles in prop::collection::vec(prop::sample::select(ROLES), 0..8),
        fail_at in 0usize..10,
        initial in prop::option::of(prop::sample::select(ROLES)),
    ) {
        let mut ctx = Context::new(FormatMode::Focused, OutputChannel::Speech);
        if let Some(role) = initial {
            ctx.override_role(role);
        }
        let before = ctx.override_balance();

        let _ = nest(&mut ctx, &roles, fail_at, 0);

        let after = ctx.override_balance();
        prop_assert_eq!(ctx.role_override(), initial);
        prop_assert_eq!(after.0 - before.0, after.1 - before.1);
    }

    #[test]
    fn proptest_generators_leave_role_unchanged(
        inner in prop::sample::select(OVERRIDING),
        toggle in any::<bool>(),
        checked in any::<bool>(),
        two_children in any::<bool>(),
        outer in prop::option::of(Just(Role::TableCell)),
    ) {
        let fixture = cell_fixture(toggle, checked, two_children);
        let log = Rc::new(RefCell::new(vec![]));
        let table = FormatTable::new()
            .with_role("table_cell", "focused", "observed")
            .with_role("real_table_cell", "focused", "name + observed");
        let presenter = presenter_with(
            OutputChannel::Speech,
            table,
            observing_registry(inner, log.clone()),
        );

        presenter.generate(&fixture.get("cell_1_0"), FormatMode::Focused, outer);

        let log = log.borrow();
        prop_assert!(!log.is_empty());
        for observation in log.iter() {
            prop_assert_eq!(observation.role_after, observation.role_before);
            let overrides = observation.balance_after.0 - observation.balance_before.0;
            let restores = observation.balance_after.1 - observation.balance_before.1;
            prop_assert_eq!(overrides, restores);
        }
    }
}

#[test]
fn test_role_override_is_not_visible_after_generate() {
    let fixture = Fixture::new();
    fixture.add("ok", None, named(Role::PushButton, "OK"));
    let log = Rc::new(RefCell::new(vec![]));
    let table = FormatTable::new()
        .with_role("check_box", "focused", "observed")
        .with_role("push_button", "focused", "observed");
    let presenter = presenter_with(
        OutputChannel::Speech,
        table,
        observing_registry("checkedState", log.clone()),
    );

    presenter.generate(&fixture.get("ok"), FormatMode::Focused, Some(Role::CheckBox));
    presenter.generate(&fixture.get("ok"), FormatMode::Focused, None);

    let log = log.borrow();
    assert_eq!(log.len(), 2);
    // The override is consumed as the frame role, not left pending.
    assert_eq!(log[0].role_before, None);
    assert_eq!(log[1].role_before, None);
}
