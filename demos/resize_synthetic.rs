use animscale::{
    Animation, CancelToken, DisposalMethod, Frame, LoopCount, Palette, Parallelism, Rect,
    ResizeConfig, resize_with_stats,
};

/// A bouncing square drawn as partial-update frames over a static backdrop.
fn bouncing_square() -> Animation {
    let palette = Palette::from_rgb(
        &[[240, 240, 240], [220, 40, 40], [30, 30, 30], [0, 0, 0]],
        Some(3),
    );

    let mut anim = Animation::new(120, 80);
    anim.global_palette = Some(palette.clone());
    anim.background_index = 0;
    anim.loop_count = LoopCount::Forever;

    anim.frames
        .push(Frame::filled(Rect::from_size(120, 80), palette.clone(), 0).with_delay(4));
    for step in 0..10u32 {
        let x = step * 10;
        let y = if step % 2 == 0 { 10 } else { 40 };
        anim.frames.push(
            Frame::filled(Rect::from_origin_size(x, y, 20, 20), palette.clone(), 1)
                .with_disposal(DisposalMethod::Background)
                .with_delay(6),
        );
    }
    anim
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let anim = bouncing_square();
    let cfg = ResizeConfig::default().with_parallelism(Parallelism::from_limit(4));
    let (out, stats) = resize_with_stats(&anim, 60, 0, &cfg, &CancelToken::new())?;

    println!(
        "resized {}x{} -> {}x{} ({} frames, peak {} in flight)",
        anim.width,
        anim.height,
        out.width,
        out.height,
        out.frames.len(),
        stats.scale.peak_in_flight
    );
    for (i, frame) in out.frames.iter().enumerate() {
        println!(
            "frame {i:2}: rect {:?} delay {} disposal {:?}",
            frame.rect, frame.delay, frame.disposal
        );
    }
    Ok(())
}
