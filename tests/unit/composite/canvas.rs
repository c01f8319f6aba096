use super::*;
use crate::foundation::core::LoopCount;

const RED: Rgba8 = [255, 0, 0, 255];
const GREEN: Rgba8 = [0, 255, 0, 255];
const BLUE: Rgba8 = [0, 0, 255, 255];
const GRAY: Rgba8 = [128, 128, 128, 255];

fn identity_plan(w: u32, h: u32) -> ResizePlan {
    ResizePlan {
        width: w,
        height: h,
        width_ratio: 1.0,
        height_ratio: 1.0,
    }
}

fn opaque_palette() -> Palette {
    Palette::new(vec![RED, GREEN, BLUE])
}

fn palette_with_hole() -> Palette {
    Palette::new(vec![RED, GREEN, BLUE, TRANSPARENT])
}

fn anim(frames: Vec<Frame>) -> Animation {
    Animation {
        width: 4,
        height: 4,
        frames,
        global_palette: Some(Palette::new(vec![GRAY])),
        background_index: 0,
        loop_count: LoopCount::Forever,
    }
}

fn px(img: &RgbaImage, x: u32, y: u32) -> Rgba8 {
    img.get_pixel(x, y).0
}

#[test]
fn canvas_starts_transparent_and_partial_frames_pile_up() {
    let a = anim(vec![
        Frame::filled(Rect::from_size(4, 4), opaque_palette(), 0),
        Frame::filled(Rect::new(1, 1, 3, 3), opaque_palette(), 1),
    ]);
    let snaps: Vec<_> = CanvasCompositor::new(&a, identity_plan(4, 4)).collect();
    assert_eq!(snaps.len(), 2);
    assert_eq!(px(&snaps[0].canvas, 0, 0), RED);
    assert_eq!(px(&snaps[1].canvas, 0, 0), RED);
    assert_eq!(px(&snaps[1].canvas, 1, 1), GREEN);
    assert_eq!(px(&snaps[1].canvas, 3, 3), RED);

    let empty = anim(vec![]);
    let c = CanvasCompositor::new(&empty, identity_plan(4, 4));
    assert!(c.canvas().pixels().all(|p| p.0 == TRANSPARENT));
}

#[test]
fn transparent_pixels_keep_what_is_underneath() {
    let mut hole = Frame::filled(Rect::from_size(4, 4), palette_with_hole(), 3);
    hole.indices[0] = 2;
    let a = anim(vec![
        Frame::filled(Rect::from_size(4, 4), opaque_palette(), 0),
        hole,
    ]);
    let snaps: Vec<_> = CanvasCompositor::new(&a, identity_plan(4, 4)).collect();
    assert_eq!(px(&snaps[1].canvas, 0, 0), BLUE);
    assert_eq!(px(&snaps[1].canvas, 1, 0), RED);
}

#[test]
fn background_disposal_clears_exactly_the_frame_rect() {
    let a = anim(vec![
        Frame::filled(Rect::from_size(4, 4), opaque_palette(), 0),
        Frame::filled(Rect::new(0, 0, 2, 2), opaque_palette(), 1)
            .with_disposal(DisposalMethod::Background),
        Frame::filled(Rect::new(3, 3, 4, 4), opaque_palette(), 2),
    ]);
    let snaps: Vec<_> = CanvasCompositor::new(&a, identity_plan(4, 4)).collect();

    // the Background frame itself is shown painted
    assert_eq!(px(&snaps[1].canvas, 0, 0), GREEN);

    let next = &snaps[2].canvas;
    for (x, y, p) in next.enumerate_pixels() {
        let expected = if x < 2 && y < 2 {
            GRAY
        } else if (x, y) == (3, 3) {
            BLUE
        } else {
            RED
        };
        assert_eq!(p.0, expected, "pixel ({x}, {y})");
    }
}

#[test]
fn background_disposal_uses_transparent_when_palette_has_one() {
    let a = anim(vec![
        Frame::filled(Rect::from_size(4, 4), opaque_palette(), 0),
        Frame::filled(Rect::new(2, 2, 4, 4), palette_with_hole(), 1)
            .with_disposal(DisposalMethod::Background),
        Frame::filled(Rect::new(0, 0, 1, 1), opaque_palette(), 2),
    ]);
    let snaps: Vec<_> = CanvasCompositor::new(&a, identity_plan(4, 4)).collect();
    assert_eq!(px(&snaps[2].canvas, 2, 2), TRANSPARENT);
    assert_eq!(px(&snaps[2].canvas, 3, 3), TRANSPARENT);
    assert_eq!(px(&snaps[2].canvas, 1, 1), RED);
    assert_eq!(px(&snaps[2].canvas, 0, 0), BLUE);
}

#[test]
fn background_without_global_palette_is_transparent() {
    let mut a = anim(vec![
        Frame::filled(Rect::from_size(4, 4), opaque_palette(), 0)
            .with_disposal(DisposalMethod::Background),
        Frame::filled(Rect::new(0, 0, 1, 1), opaque_palette(), 1),
    ]);
    a.global_palette = None;
    let snaps: Vec<_> = CanvasCompositor::new(&a, identity_plan(4, 4)).collect();
    assert_eq!(px(&snaps[1].canvas, 0, 0), GREEN);
    assert_eq!(px(&snaps[1].canvas, 2, 2), TRANSPARENT);
}

#[test]
fn previous_disposal_restores_pre_paint_state() {
    let a = anim(vec![
        Frame::filled(Rect::from_size(4, 4), opaque_palette(), 0),
        Frame::filled(Rect::new(0, 0, 3, 3), opaque_palette(), 1)
            .with_disposal(DisposalMethod::Previous),
        Frame::filled(Rect::new(3, 0, 4, 1), opaque_palette(), 2),
    ]);
    let snaps: Vec<_> = CanvasCompositor::new(&a, identity_plan(4, 4)).collect();

    assert_eq!(px(&snaps[1].canvas, 1, 1), GREEN);

    let after = &snaps[2].canvas;
    assert_eq!(px(after, 1, 1), RED);
    assert_eq!(px(after, 0, 0), RED);
    assert_eq!(px(after, 3, 0), BLUE);
}

#[test]
fn consecutive_previous_frames_each_undo_their_own_paint() {
    let a = anim(vec![
        Frame::filled(Rect::from_size(4, 4), opaque_palette(), 0),
        Frame::filled(Rect::new(0, 0, 1, 1), opaque_palette(), 1)
            .with_disposal(DisposalMethod::Previous),
        Frame::filled(Rect::new(1, 1, 2, 2), opaque_palette(), 2)
            .with_disposal(DisposalMethod::Previous),
        Frame::filled(Rect::new(3, 3, 4, 4), opaque_palette(), 1),
    ]);
    let snaps: Vec<_> = CanvasCompositor::new(&a, identity_plan(4, 4)).collect();
    assert_eq!(px(&snaps[2].canvas, 0, 0), RED);
    assert_eq!(px(&snaps[2].canvas, 1, 1), BLUE);
    assert_eq!(px(&snaps[3].canvas, 0, 0), RED);
    assert_eq!(px(&snaps[3].canvas, 1, 1), RED);
    assert_eq!(px(&snaps[3].canvas, 3, 3), GREEN);
}

#[test]
fn unspecified_disposal_behaves_like_none() {
    let a = anim(vec![
        Frame::filled(Rect::new(0, 0, 2, 2), opaque_palette(), 2)
            .with_disposal(DisposalMethod::Unspecified),
        Frame::filled(Rect::new(2, 2, 4, 4), opaque_palette(), 1),
    ]);
    let snaps: Vec<_> = CanvasCompositor::new(&a, identity_plan(4, 4)).collect();
    assert_eq!(px(&snaps[1].canvas, 0, 0), BLUE);
    assert_eq!(px(&snaps[1].canvas, 3, 3), GREEN);
}

#[test]
fn earlier_snapshots_are_not_touched_by_later_frames() {
    let a = anim(vec![
        Frame::filled(Rect::from_size(4, 4), opaque_palette(), 0)
            .with_disposal(DisposalMethod::Background),
        Frame::filled(Rect::from_size(4, 4), opaque_palette(), 1),
    ]);
    let mut c = CanvasCompositor::new(&a, identity_plan(4, 4));
    let first = c.next().unwrap();
    let _second = c.next().unwrap();
    assert!(c.next().is_none());
    assert!(first.canvas.pixels().all(|p| p.0 == RED));
    assert!(c.canvas().pixels().all(|p| p.0 == GREEN));
}

#[test]
fn snapshots_carry_index_palette_and_scaled_dest() {
    let a = anim(vec![
        Frame::filled(Rect::from_size(4, 4), opaque_palette(), 0),
        Frame::filled(Rect::new(1, 1, 3, 4), palette_with_hole(), 1),
    ]);
    let plan = ResizePlan {
        width: 8,
        height: 2,
        width_ratio: 2.0,
        height_ratio: 0.5,
    };
    let c = CanvasCompositor::new(&a, plan);
    assert_eq!(c.len(), 2);
    let snaps: Vec<_> = c.collect();
    assert_eq!(snaps[1].index, 1);
    assert_eq!(snaps[1].dest, Rect::new(2, 1, 6, 2));
    assert_eq!(snaps[1].palette, palette_with_hole());
    assert_eq!(snaps[1].canvas.dimensions(), (4, 4));
}

#[test]
fn frames_past_the_canvas_edge_are_clipped() {
    let mut wide = Frame::filled(Rect::new(2, 2, 6, 6), opaque_palette(), 1);
    wide.indices[0] = 2;
    let a = anim(vec![wide]);
    let snaps: Vec<_> = CanvasCompositor::new(&a, identity_plan(4, 4)).collect();
    assert_eq!(px(&snaps[0].canvas, 2, 2), BLUE);
    assert_eq!(px(&snaps[0].canvas, 3, 3), GREEN);
    assert_eq!(px(&snaps[0].canvas, 1, 1), TRANSPARENT);
}
