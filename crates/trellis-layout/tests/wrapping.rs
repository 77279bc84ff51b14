// crates/trellis-layout/tests/wrapping.rs
use glam::Vec2;
use trellis_layout::{ContainerFlags, ControlKey, LayoutContext, LayoutFlags, Spacing};

fn wrapping_row(width: f32, flags: ContainerFlags, widths: &[f32]) -> (LayoutContext, ControlKey, Vec<ControlKey>) {
    let mut ctx = LayoutContext::new();
    let row = ctx.create_child(ControlKey::ROOT).unwrap();
    ctx.set_container_flags(row, ContainerFlags::ROW | ContainerFlags::WRAP | flags).unwrap();
    ctx.set_size(row, Vec2::new(width, -1.0)).unwrap();
    let children = widths
        .iter()
        .map(|&w| {
            let key = ctx.create_child(row).unwrap();
            ctx.set_size(key, Vec2::new(w, 10.0)).unwrap();
            key
        })
        .collect();
    (ctx, row, children)
}

fn positions(ctx: &LayoutContext, keys: &[ControlKey]) -> Vec<(f32, f32)> {
    keys.iter()
        .map(|&key| {
            let rect = ctx.rect(key).unwrap();
            (rect.position.x, rect.position.y)
        })
        .collect()
}

#[test]
fn test_runs_break_at_overflow() {
    let (mut ctx, row, children) = wrapping_row(120.0, ContainerFlags::ALIGN_START, &[60.0, 50.0, 40.0, 70.0, 30.0]);
    ctx.update();

    assert_eq!(
        positions(&ctx, &children),
        vec![(0.0, 0.0), (60.0, 0.0), (0.0, 10.0), (40.0, 10.0), (0.0, 20.0)]
    );
    assert_eq!(ctx.rect(row).unwrap().size.y, 30.0);
    let breaks: Vec<_> = children
        .iter()
        .map(|&key| ctx.layout_flags(key).unwrap().contains(LayoutFlags::BREAK))
        .collect();
    assert_eq!(breaks, vec![false, false, true, false, true]);
}

#[test]
fn test_epsilon_tolerates_float_noise() {
    let (mut ctx, _, children) = wrapping_row(100.0, ContainerFlags::ALIGN_START, &[50.05, 50.0]);
    ctx.update();
    assert_eq!(ctx.rect(children[1]).unwrap().position.y, 0.0);

    let (mut ctx, _, children) = wrapping_row(100.0, ContainerFlags::ALIGN_START, &[50.2, 50.0]);
    ctx.update();
    assert_eq!(ctx.rect(children[1]).unwrap().position.y, 10.0);
}

#[test]
fn test_margins_count_towards_a_run() {
    let (mut ctx, _, children) = wrapping_row(100.0, ContainerFlags::ALIGN_START, &[45.0, 45.0]);
    ctx.set_margins(children[1], Spacing::new(6.0, 0.0, 6.0, 0.0)).unwrap();
    ctx.update();
    assert_eq!(positions(&ctx, &children), vec![(0.0, 0.0), (6.0, 10.0)]);
}

#[test]
fn test_justify_stretches_every_run_but_the_last() {
    let (mut ctx, _, children) =
        wrapping_row(100.0, ContainerFlags::ALIGN_JUSTIFY, &[30.0, 30.0, 50.0, 40.0, 20.0, 20.0]);
    ctx.set_layout_flags(children[4], LayoutFlags::FORCE_BREAK).unwrap();
    ctx.update();

    assert_eq!(
        positions(&ctx, &children),
        vec![
            // Natural break: stretched.
            (0.0, 0.0),
            (70.0, 0.0),
            // Ended by a forced break: stretched as well.
            (0.0, 10.0),
            (60.0, 10.0),
            // Last run: left as is.
            (0.0, 20.0),
            (20.0, 20.0),
        ]
    );
}

#[test]
fn test_forced_break_on_first_child_is_ignored() {
    let (mut ctx, _, children) = wrapping_row(100.0, ContainerFlags::ALIGN_START, &[30.0, 30.0]);
    ctx.set_layout_flags(children[0], LayoutFlags::FORCE_BREAK).unwrap();
    ctx.update();
    assert_eq!(positions(&ctx, &children), vec![(0.0, 0.0), (30.0, 0.0)]);
    assert!(!ctx.layout_flags(children[0]).unwrap().contains(LayoutFlags::BREAK));
}

#[test]
fn test_breaks_are_recomputed_every_update() {
    let (mut ctx, row, children) = wrapping_row(100.0, ContainerFlags::ALIGN_START, &[80.0, 80.0, 80.0]);
    ctx.update();
    assert_eq!(ctx.rect(row).unwrap().size.y, 30.0);

    ctx.set_size(row, Vec2::new(200.0, -1.0)).unwrap();
    ctx.update();
    assert_eq!(positions(&ctx, &children), vec![(0.0, 0.0), (80.0, 0.0), (0.0, 10.0)]);
    assert_eq!(ctx.rect(row).unwrap().size.y, 20.0);

    ctx.set_size(row, Vec2::new(400.0, -1.0)).unwrap();
    ctx.update();
    assert!(children
        .iter()
        .all(|&key| !ctx.layout_flags(key).unwrap().contains(LayoutFlags::BREAK)));
    assert_eq!(ctx.rect(row).unwrap().size.y, 10.0);
}

#[test]
fn test_cross_axis_run_height_is_tallest_child() {
    let (mut ctx, _, children) = wrapping_row(100.0, ContainerFlags::ALIGN_START, &[40.0, 40.0, 40.0]);
    ctx.set_size(children[1], Vec2::new(40.0, 30.0)).unwrap();
    ctx.set_layout_flags(children[0], LayoutFlags::ANCHOR_BOTTOM).unwrap();
    ctx.update();

    // Run 1 is 30 high; the short child sits at its bottom.
    assert_eq!(positions(&ctx, &children), vec![(0.0, 20.0), (40.0, 0.0), (0.0, 30.0)]);
}

#[test]
fn test_floating_children_do_not_take_run_space() {
    let (mut ctx, row, children) = wrapping_row(100.0, ContainerFlags::ALIGN_START, &[50.0, 50.0]);
    let overlay = ctx.create();
    ctx.insert_after(children[0], overlay).unwrap();
    ctx.set_size(overlay, Vec2::new(80.0, 80.0)).unwrap();
    ctx.set_layout_flags(overlay, LayoutFlags::FLOATING).unwrap();
    ctx.update();

    assert_eq!(positions(&ctx, &children), vec![(0.0, 0.0), (50.0, 0.0)]);
    assert_eq!(ctx.rect(overlay).unwrap().position, Vec2::ZERO);
    // Still counted by the size pass.
    assert_eq!(ctx.rect(row).unwrap().size.y, 80.0);
}

#[test]
fn test_wrapping_column_width_comes_from_its_runs() {
    let mut ctx = LayoutContext::new();
    let outer = ctx.create_child(ControlKey::ROOT).unwrap();
    ctx.set_container_flags(outer, ContainerFlags::ROW | ContainerFlags::ALIGN_START).unwrap();
    ctx.set_size(outer, Vec2::new(300.0, 100.0)).unwrap();

    let column = ctx.create_child(outer).unwrap();
    ctx.set_container_flags(column, ContainerFlags::COLUMN | ContainerFlags::WRAP | ContainerFlags::ALIGN_START)
        .unwrap();
    ctx.set_size(column, Vec2::new(-1.0, 100.0)).unwrap();
    ctx.set_padding(column, Spacing::new(5.0, 0.0, 5.0, 0.0)).unwrap();
    let items: Vec<_> = (0..4)
        .map(|_| {
            let key = ctx.create_child(column).unwrap();
            ctx.set_size(key, Vec2::new(25.0, 40.0)).unwrap();
            key
        })
        .collect();
    ctx.update();

    // Two items per run, two runs side by side.
    assert_eq!(
        positions(&ctx, &items),
        vec![(5.0, 0.0), (5.0, 40.0), (30.0, 0.0), (30.0, 40.0)]
    );
    assert_eq!(ctx.rect(column).unwrap().size.x, 60.0);
    assert_eq!(ctx.computed_content_size(column).unwrap().x, 60.0);
}

#[test]
fn test_sibling_after_wrapping_column_starts_past_its_runs() {
    let mut ctx = LayoutContext::new();
    let outer = ctx.create_child(ControlKey::ROOT).unwrap();
    ctx.set_container_flags(outer, ContainerFlags::ROW | ContainerFlags::ALIGN_START).unwrap();
    ctx.set_size(outer, Vec2::new(300.0, 100.0)).unwrap();

    let column = ctx.create_child(outer).unwrap();
    ctx.set_container_flags(column, ContainerFlags::COLUMN | ContainerFlags::WRAP | ContainerFlags::ALIGN_START)
        .unwrap();
    ctx.set_size(column, Vec2::new(-1.0, 100.0)).unwrap();
    let items: Vec<_> = (0..4)
        .map(|_| {
            let key = ctx.create_child(column).unwrap();
            ctx.set_size(key, Vec2::new(25.0, 40.0)).unwrap();
            key
        })
        .collect();
    let sibling = ctx.create_child(outer).unwrap();
    ctx.set_size(sibling, Vec2::new(30.0, 30.0)).unwrap();
    ctx.update();

    assert_eq!(ctx.rect(column).unwrap().size, Vec2::new(50.0, 100.0));
    assert_eq!(ctx.rect(sibling).unwrap().position, Vec2::new(50.0, 35.0));
    assert_eq!(
        positions(&ctx, &items),
        vec![(0.0, 0.0), (0.0, 40.0), (25.0, 0.0), (25.0, 40.0)]
    );

    let first = ctx.store().rects().to_vec();
    ctx.update();
    assert_eq!(ctx.store().rects(), first.as_slice());
}

#[test]
fn test_wrapping_row_inside_wrapping_column_grows_with_its_runs() {
    let mut ctx = LayoutContext::new();
    let column = ctx.create_child(ControlKey::ROOT).unwrap();
    ctx.set_container_flags(column, ContainerFlags::COLUMN | ContainerFlags::WRAP | ContainerFlags::ALIGN_START)
        .unwrap();
    ctx.set_size(column, Vec2::new(-1.0, 300.0)).unwrap();
    let (row, children) = {
        let row = ctx.create_child(column).unwrap();
        ctx.set_container_flags(row, ContainerFlags::ROW | ContainerFlags::WRAP | ContainerFlags::ALIGN_START)
            .unwrap();
        ctx.set_size(row, Vec2::new(100.0, -1.0)).unwrap();
        let children: Vec<_> = (0..3)
            .map(|_| {
                let key = ctx.create_child(row).unwrap();
                ctx.set_size(key, Vec2::new(60.0, 10.0)).unwrap();
                key
            })
            .collect();
        (row, children)
    };
    ctx.update();

    // One child per run, so the row is three runs high and holds all of them.
    assert_eq!(ctx.rect(row).unwrap().size, Vec2::new(100.0, 30.0));
    assert_eq!(positions(&ctx, &children), vec![(0.0, 0.0), (0.0, 10.0), (0.0, 20.0)]);
    assert_eq!(ctx.rect(column).unwrap().size.x, 100.0);
}
