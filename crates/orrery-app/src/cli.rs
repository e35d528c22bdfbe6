use std::path::PathBuf;

use clap::Parser;
use orrery_common::Viewport;

/// Orrery: drive an animated layer scene headlessly and print what moves.
#[derive(Parser, Debug)]
#[command(name = "orrery", version, about)]
pub struct Args {
    /// Scene file (TOML, or JSON with a .json extension). Defaults to the
    /// platform config location.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 60)]
    pub frames: u32,

    /// Simulated frame rate.
    #[arg(long, default_value_t = 60.0, value_parser = parse_fps)]
    pub fps: f64,

    /// Viewport size, WIDTHxHEIGHT.
    #[arg(long, default_value = "2048x2048", value_parser = parse_viewport)]
    pub viewport: Viewport,

    /// Resize the viewport before a frame, FRAME:WIDTHxHEIGHT. Repeatable.
    #[arg(long = "resize-at", value_parser = parse_resize)]
    pub resize_at: Vec<ResizeAt>,

    /// Pin the wall clock to an RFC 3339 time; it advances with the frames.
    #[arg(long)]
    pub at: Option<String>,

    /// Pretend the renderer is GPU accelerated.
    #[arg(long)]
    pub accelerated: bool,

    /// Only validate the scene and report problems.
    #[arg(long)]
    pub check: bool,

    /// Print tick timing statistics after the run.
    #[arg(long)]
    pub stats: bool,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

/// A scheduled viewport change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeAt {
    pub frame: u32,
    pub viewport: Viewport,
}

pub fn parse() -> Args {
    Args::parse()
}

/// Slowest accepted rate: one frame every fifteen minutes.
const MIN_FPS: f64 = 1.0 / 900.0;

fn parse_fps(s: &str) -> Result<f64, String> {
    let fps: f64 = s.trim().parse().map_err(|e| format!("invalid fps '{s}': {e}"))?;
    if fps.is_finite() && fps >= MIN_FPS {
        Ok(fps)
    } else {
        Err(format!("fps must be at least {MIN_FPS}, got {s}"))
    }
}

fn parse_viewport(s: &str) -> Result<Viewport, String> {
    let (w, h) = s
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let parse = |v: &str| -> Result<f64, String> {
        let n: f64 = v
            .trim()
            .parse()
            .map_err(|e| format!("invalid size '{v}': {e}"))?;
        if n.is_finite() && n > 0.0 {
            Ok(n)
        } else {
            Err(format!("size must be positive, got {v}"))
        }
    };
    Ok(Viewport::new(parse(w)?, parse(h)?))
}

fn parse_resize(s: &str) -> Result<ResizeAt, String> {
    let (frame, size) = s
        .split_once(':')
        .ok_or_else(|| format!("expected FRAME:WIDTHxHEIGHT, got '{s}'"))?;
    let frame = frame
        .trim()
        .parse()
        .map_err(|e| format!("invalid frame '{frame}': {e}"))?;
    Ok(ResizeAt {
        frame,
        viewport: parse_viewport(size)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["orrery"]).unwrap();
        assert_eq!(args.frames, 60);
        assert_eq!(args.viewport, Viewport::new(2048.0, 2048.0));
        assert!(args.resize_at.is_empty());
        assert!(!args.check);
    }

    #[test]
    fn viewport_and_resizes() {
        let args = Args::try_parse_from([
            "orrery",
            "--viewport",
            "1280x720",
            "--resize-at",
            "10:640x360",
            "--resize-at",
            "20:1024X1024",
        ])
        .unwrap();
        assert_eq!(args.viewport, Viewport::new(1280.0, 720.0));
        assert_eq!(
            args.resize_at,
            vec![
                ResizeAt {
                    frame: 10,
                    viewport: Viewport::new(640.0, 360.0)
                },
                ResizeAt {
                    frame: 20,
                    viewport: Viewport::new(1024.0, 1024.0)
                },
            ]
        );
    }

    #[test]
    fn rejects_bad_values() {
        assert!(parse_viewport("1280").is_err());
        assert!(parse_viewport("0x720").is_err());
        assert!(parse_resize("ten:10x10").is_err());
        assert!(parse_fps("-5").is_err());
        assert!(Args::try_parse_from(["orrery", "--fps", "0"]).is_err());
    }

    #[test]
    fn vanishing_fps_is_rejected() {
        assert!(parse_fps("1e-300").is_err());
        assert!(Args::try_parse_from(["orrery", "--fps", "1e-300"]).is_err());
        assert_eq!(parse_fps("0.01"), Ok(0.01));
    }
}
