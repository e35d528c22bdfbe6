//! Headless scene runner: a fixed-rate frame loop over [`HeadlessBackend`].

use std::io::Write;
use std::rc::Rc;

use orrery_common::{OrreryError, Result, SceneEvent};
use orrery_config::SceneConfig;
use orrery_engine::perf::TimingStats;
use orrery_engine::{
    Capabilities, FixedClock, HeadlessBackend, LayerSnapshot, Orchestrator, RecordingHost,
    SystemClock, WallClock,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::ResizeAt;

/// Everything a run needs besides the scene.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub frames: u32,
    pub fps: f64,
    pub viewport: orrery_common::Viewport,
    pub resizes: Vec<ResizeAt>,
    /// Pinned wall-clock start, RFC 3339.
    pub at: Option<String>,
    pub accelerated: bool,
    pub stats: bool,
}

#[derive(Serialize)]
struct FrameLine<'a> {
    frame: u32,
    elapsed: f64,
    faults: Vec<String>,
    layers: &'a [LayerSnapshot],
}

#[derive(Serialize)]
struct StatsLine {
    stats: TimingStats,
}

fn json_err(e: serde_json::Error) -> OrreryError {
    OrreryError::Other(format!("failed to encode frame: {e}"))
}

fn write_line(out: &mut impl Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer(&mut *out, value).map_err(json_err)?;
    writeln!(out)?;
    Ok(())
}

/// Run `scene` for `options.frames` frames, one JSON line per frame.
pub fn run(scene: &SceneConfig, options: &RunOptions, out: &mut impl Write) -> Result<()> {
    let fixed = match &options.at {
        Some(at) => Some(Rc::new(FixedClock::from_rfc3339(at).ok_or_else(|| {
            OrreryError::Other(format!("--at expects an RFC 3339 time, got '{at}'"))
        })?)),
        None => None,
    };
    let clock: Rc<dyn WallClock> = match &fixed {
        Some(fixed) => Rc::clone(fixed) as Rc<dyn WallClock>,
        None => Rc::new(SystemClock),
    };
    let capabilities = if options.accelerated {
        Capabilities::accelerated()
    } else {
        Capabilities::software()
    }
    .with_detected_cores();

    let mut orchestrator = Orchestrator::builder()
        .backend(HeadlessBackend::new(options.viewport))
        .host(RecordingHost::new())
        .clock(clock)
        .capabilities(capabilities)
        .build()?;
    let mut events = orchestrator.events().subscribe();

    let summary = orchestrator.init(scene)?;
    for repair in &summary.repairs {
        warn!("repaired: {repair}");
    }

    let dt = 1.0 / options.fps;
    let step = chrono::Duration::microseconds((dt * 1e6).round() as i64);
    for frame in 1..=options.frames {
        for resize in options.resizes.iter().filter(|r| r.frame == frame) {
            set_viewport(&mut orchestrator, resize.viewport);
            orchestrator.on_resize();
        }
        if let Some(fixed) = &fixed {
            fixed.advance(step);
        }
        let report = orchestrator.on_frame(dt);
        let layers = orchestrator.snapshot();
        write_line(
            out,
            &FrameLine {
                frame,
                elapsed: report.elapsed,
                faults: report.faults.iter().map(ToString::to_string).collect(),
                layers: &layers,
            },
        )?;
    }

    if options.stats {
        write_line(
            out,
            &StatsLine {
                stats: orchestrator.timer().stats(),
            },
        )?;
    }

    orchestrator.dispose();
    let degraded = std::iter::from_fn(|| events.try_recv().ok())
        .filter(|e| {
            matches!(
                e,
                SceneEvent::LayerSkipped { .. } | SceneEvent::FeatureDisabled { .. }
            )
        })
        .count();
    info!(
        frames = options.frames,
        layers = summary.layers,
        degraded,
        "run complete"
    );
    Ok(())
}

fn set_viewport(orchestrator: &mut Orchestrator, viewport: orrery_common::Viewport) {
    match orchestrator
        .backend_mut()
        .as_any_mut()
        .downcast_mut::<HeadlessBackend>()
    {
        Some(backend) => backend.set_viewport(viewport),
        None => warn!("backend does not support resizing"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_common::Viewport;
    use orrery_config::toml_loader::load_from_str;

    fn options(frames: u32) -> RunOptions {
        RunOptions {
            frames,
            fps: 2.0,
            viewport: Viewport::new(2048.0, 2048.0),
            resizes: Vec::new(),
            at: Some("2024-03-01T12:00:00Z".into()),
            accelerated: false,
            stats: false,
        }
    }

    fn lines(scene: &SceneConfig, options: &RunOptions) -> Vec<serde_json::Value> {
        let mut out = Vec::new();
        run(scene, options, &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    fn spinner() -> SceneConfig {
        load_from_str(
            r#"
[[layers]]
id = "gear-1"
image_ref = "gear.png"
spin_rpm = 30
"#,
        )
        .unwrap()
    }

    #[test]
    fn prints_one_line_per_frame() {
        let out = lines(&spinner(), &options(2));
        assert_eq!(out.len(), 2);
        assert_eq!(out[1]["frame"], 2);
        assert!((out[1]["elapsed"].as_f64().unwrap() - 1.0).abs() < 1e-9);
        let layer = &out[1]["layers"][0];
        assert_eq!(layer["id"], "gear-1");
        let rotation = layer["rotation"].as_f64().unwrap();
        assert!((rotation - std::f64::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn resize_applies_before_the_frame() {
        let mut opts = options(2);
        opts.resizes.push(ResizeAt {
            frame: 2,
            viewport: Viewport::new(1024.0, 1024.0),
        });
        let out = lines(&spinner(), &opts);
        let first = &out[0]["layers"][0];
        let second = &out[1]["layers"][0];
        assert!((first["x"].as_f64().unwrap() - 1024.0).abs() < 1e-9);
        assert!((second["x"].as_f64().unwrap() - 512.0).abs() < 1e-9);
    }

    #[test]
    fn stats_line_comes_last() {
        let mut opts = options(3);
        opts.stats = true;
        let out = lines(&spinner(), &opts);
        assert_eq!(out.len(), 4);
        assert_eq!(out[3]["stats"]["samples"], 3);
    }

    #[test]
    fn bad_pinned_time_is_an_error() {
        let mut opts = options(1);
        opts.at = Some("noon".into());
        let mut out = Vec::new();
        assert!(run(&spinner(), &opts, &mut out).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn invalid_scene_is_an_error() {
        let scene = load_from_str(
            r#"
[[layers]]
id = "a"
[[layers]]
id = "a"
"#,
        )
        .unwrap();
        let mut out = Vec::new();
        assert!(run(&scene, &options(1), &mut out).is_err());
    }
}
