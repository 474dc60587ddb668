use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use loggs_core::motion::{Section, WheelDelta};
use loggs_core::views::{
    CardBoard, HorizontalScroll, KeyholeReveal, LayerScroller, PageLoader, Timeline,
    TimelineLayout,
};
use loggs_core::{AppConfig, Catalog, FrameScheduler, Viewport};

use crate::SampleView;

/// Logical viewport the headless views are laid out in
const SAMPLE_WIDTH: f64 = 1280.0;
const SAMPLE_HEIGHT: f64 = 800.0;

pub struct SampleOptions {
    pub view: SampleView,
    pub frames: usize,
    pub dt: f64,
    pub scroll: f64,
}

#[derive(Serialize)]
struct SampleLine<T: Serialize> {
    frame: usize,
    time: f64,
    data: T,
}

fn emit<T: Serialize>(out: &mut impl Write, frame: usize, time: f64, data: T) -> Result<()> {
    serde_json::to_writer(&mut *out, &SampleLine { frame, time, data })?;
    writeln!(out)?;
    Ok(())
}

pub fn run(
    config: &AppConfig,
    catalog: &Catalog,
    options: SampleOptions,
    out: &mut impl Write,
) -> Result<()> {
    if !(options.dt > 0.0 && options.dt.is_finite()) {
        anyhow::bail!("--dt must be a positive finite number, got {}", options.dt);
    }
    tracing::debug!(view = ?options.view, frames = options.frames, "Sampling view");

    let mut sched = FrameScheduler::new();
    let mut viewport = Viewport::new(SAMPLE_WIDTH, SAMPLE_HEIGHT);

    match options.view {
        SampleView::Layers => {
            let mut layers = LayerScroller::new(config, catalog.works.len())?;
            layers.set_viewport_height(SAMPLE_HEIGHT);
            layers.mount(&mut sched);
            layers.on_wheel(WheelDelta::pixels(options.scroll));
            for i in 0..options.frames {
                for fired in sched.advance(options.dt) {
                    layers.handle(&fired, &mut sched);
                }
                layers.tick(options.dt);
                emit(out, i, sched.now(), layers.compute())?;
            }
            layers.unmount(&mut sched);
        }
        SampleView::Carousel => {
            let mut carousel = HorizontalScroll::new(
                config.carousel.clone(),
                config.spring,
                catalog.gallery.len(),
                viewport.scroll_reader(),
            )?;
            let section = Section {
                top: SAMPLE_HEIGHT,
                height: SAMPLE_HEIGHT * config.carousel.section_screens,
            };
            viewport.set_page_height(section.top + section.height + SAMPLE_HEIGHT);
            carousel.mount(&mut viewport, section.top);
            viewport.scroll_to(options.scroll);
            for i in 0..options.frames {
                sched.advance(options.dt);
                carousel.tick(options.dt, sched.now(), &viewport);
                emit(out, i, sched.now(), carousel.compute())?;
            }
            carousel.unmount(&mut viewport);
        }
        SampleView::Timeline => {
            let layout = TimelineLayout {
                top: SAMPLE_HEIGHT * 0.5,
                ..TimelineLayout::default()
            };
            let mut timeline = Timeline::new(catalog.timeline.len(), layout, viewport.scroll_reader());
            timeline.set_viewport_height(SAMPLE_HEIGHT);
            let section = timeline.section();
            viewport.set_page_height(section.top + section.height + SAMPLE_HEIGHT);
            viewport.scroll_to(options.scroll);
            for i in 0..options.frames {
                sched.advance(options.dt);
                timeline.tick(options.dt);
                emit(out, i, sched.now(), timeline.compute())?;
            }
        }
        SampleView::Cards => {
            let mut board = CardBoard::new(catalog.cards.clone());
            board.set_viewport_width(SAMPLE_WIDTH);
            board.mount(&mut sched);
            for i in 0..options.frames {
                for fired in sched.advance(options.dt) {
                    board.handle(&fired);
                }
                board.tick(options.dt);
                emit(out, i, sched.now(), board.compute())?;
            }
            board.unmount(&mut sched);
        }
        SampleView::Keyhole => {
            let mut keyhole = KeyholeReveal::new(viewport.scroll_reader());
            let section = Section {
                top: 0.0,
                height: SAMPLE_HEIGHT * 1.5,
            };
            keyhole.set_section(section);
            keyhole.set_viewport_height(SAMPLE_HEIGHT);
            viewport.set_page_height(section.height + SAMPLE_HEIGHT);
            viewport.scroll_to(options.scroll);
            keyhole.mount(&mut sched);
            for i in 0..options.frames {
                for fired in sched.advance(options.dt) {
                    keyhole.handle(&fired, &mut sched);
                }
                emit(out, i, sched.now(), keyhole.compute())?;
            }
            keyhole.unmount(&mut sched);
        }
        SampleView::Loader => {
            let mut loader = PageLoader::default();
            loader.mount(&mut sched);
            for i in 0..options.frames {
                for fired in sched.advance(options.dt) {
                    loader.handle(&fired);
                }
                loader.tick(options.dt);
                emit(out, i, sched.now(), loader.compute())?;
            }
            loader.unmount(&mut sched);
        }
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(view: SampleView, frames: usize, scroll: f64) -> Vec<serde_json::Value> {
        let mut config = AppConfig::default();
        config.auto_play.enabled = false;
        let catalog = Catalog::builtin().unwrap();
        let mut buf = Vec::new();
        run(
            &config,
            &catalog,
            SampleOptions {
                view,
                frames,
                dt: 0.05,
                scroll,
            },
            &mut buf,
        )
        .unwrap();
        String::from_utf8(buf)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_one_line_per_frame() {
        let lines = sample(SampleView::Cards, 12, 0.0);
        assert_eq!(lines.len(), 12);
        assert_eq!(lines[0]["frame"], 0);
        assert_eq!(lines[11]["frame"], 11);
        assert_eq!(lines[11]["data"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_layers_follow_scroll() {
        let lines = sample(SampleView::Layers, 200, 100.0);
        let last = &lines[199]["data"];
        // 100 px of wheel at sensitivity 0.5
        assert_eq!(last["offset"].as_f64().unwrap(), 50.0);
        assert_eq!(last["layers"].as_array().unwrap().len(), 20);
    }

    #[test]
    fn test_carousel_reaches_section_progress() {
        // Section starts one screen down and pins for two screens
        let lines = sample(SampleView::Carousel, 200, SAMPLE_HEIGHT * 2.0);
        let progress = lines[199]["data"]["progress"].as_f64().unwrap();
        assert!((progress - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_keyhole_half_open_halfway() {
        // Reveal spans the last half screen of a 1.5 screen section
        let lines = sample(SampleView::Keyhole, 2, SAMPLE_HEIGHT * 0.25);
        let data = &lines[1]["data"];
        assert!((data["progress"].as_f64().unwrap() - 0.5).abs() < 1e-12);
        assert_eq!(data["arrow_opacity"].as_f64().unwrap(), 0.0);
    }

    #[test]
    fn test_loader_hides_after_hold() {
        // 60 frames of 0.05 s is three seconds
        let lines = sample(SampleView::Loader, 60, 0.0);
        assert_eq!(lines[10]["data"]["visible"], true);
        assert_eq!(lines[59]["data"]["visible"], false);
    }

    #[test]
    fn test_rejects_invalid_dt() {
        let config = AppConfig::default();
        let catalog = Catalog::builtin().unwrap();
        for dt in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            let mut buf = Vec::new();
            let options = SampleOptions {
                view: SampleView::Layers,
                frames: 1,
                dt,
                scroll: 100.0,
            };
            assert!(run(&config, &catalog, options, &mut buf).is_err(), "dt = {dt}");
            assert!(buf.is_empty());
        }
    }
}
